//! Leptos component wrapping the backdrop canvas.
//!
//! The component renders a fixed, full-viewport canvas behind the page
//! content. Once the canvas is mounted it starts a [`Backdrop`]; when the
//! component is disposed the backdrop is stopped so its frame loop and window
//! listeners do not outlive the view.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use leptos::prelude::*;
use log::error;
use web_sys::HtmlCanvasElement;

use super::driver::Backdrop;
use super::types::BackdropConfig;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
	// Cleanup callbacks must be Send, the running backdrop is not, so it is
	// parked here and looked up by id.
	static RUNNING: RefCell<HashMap<u64, Backdrop>> = RefCell::new(HashMap::new());
}

fn park(id: u64, backdrop: Backdrop) {
	let previous = RUNNING.with(|running| running.borrow_mut().insert(id, backdrop));
	if let Some(mut previous) = previous {
		previous.stop();
	}
}

fn release(id: u64) {
	let backdrop = RUNNING.with(|running| running.borrow_mut().remove(&id));
	if let Some(mut backdrop) = backdrop {
		backdrop.stop();
	}
}

/// Renders the animated glyph backdrop on a full-viewport canvas.
///
/// The canvas ignores pointer events so the page stays interactive; the
/// bouncing variant tracks the pointer through window listeners instead.
#[component]
pub fn ParticleBackdrop(
	#[prop(default = BackdropConfig::default())] config: BackdropConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		match Backdrop::start(canvas, &config) {
			Ok(backdrop) => park(id, backdrop),
			Err(e) => error!("portfolio-backdrop: failed to start: {}", e),
		}
	});

	on_cleanup(move || release(id));

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-backdrop"
			aria-hidden="true"
			style="position: fixed; top: 0; left: 0; width: 100vw; height: 100vh; z-index: 0; pointer-events: none; display: block;"
		/>
	}
}
