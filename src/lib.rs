//! portfolio-backdrop: animated glyph backdrop for a portfolio site.
//!
//! This crate provides a WASM-based canvas component that fills the viewport
//! with slowly drifting currency signs, payment icons or labelled tech markers
//! behind the page content.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::particle_field::{
	Backdrop, BackdropConfig, BackdropError, FieldVariant, ParticleBackdrop, ParticleField,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("portfolio-backdrop: logging initialized");
}

/// Parse and validate a backdrop configuration, falling back to the default
/// rising field when the JSON is malformed or describes an unusable palette.
pub fn parse_config(json_text: &str) -> BackdropConfig {
	let config = match serde_json::from_str::<BackdropConfig>(json_text) {
		Ok(config) => config,
		Err(e) => {
			warn!("portfolio-backdrop: failed to parse config: {}", e);
			return BackdropConfig::default();
		}
	};
	match config.validate() {
		Ok(()) => {
			info!("portfolio-backdrop: loaded {:?} config", config.variant);
			config
		}
		Err(e) => {
			warn!("portfolio-backdrop: invalid config, using defaults: {}", e);
			BackdropConfig::default()
		}
	}
}

/// Load the backdrop configuration from a script element with id="backdrop-config".
fn load_config() -> Option<BackdropConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("backdrop-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;
	Some(parse_config(&json_text))
}

/// Use the page's configuration, or warn and fall back to the default.
fn config_or_default(found: Option<BackdropConfig>) -> BackdropConfig {
	found.unwrap_or_else(|| {
		warn!("portfolio-backdrop: no #backdrop-config element, using defaults");
		BackdropConfig::default()
	})
}

/// Main application component.
/// Loads the backdrop configuration from the DOM and renders it behind the page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = config_or_default(load_config());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Portfolio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<ParticleBackdrop config=config />
	}
}
