//! Error types for configuring and starting the backdrop.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while validating configuration or attaching to the page.
///
/// None of these reach the visitor: the component logs them and the page
/// simply renders without a backdrop.
#[derive(Debug, Error, PartialEq)]
pub enum BackdropError {
	#[error("palette has no glyphs")]
	EmptyPalette,
	#[error("particle count must be at least 1")]
	ZeroCount,
	#[error("palette entry {0} has an empty glyph")]
	EmptyGlyph(usize),
	#[error("icon glyph {0:?} must be a single character")]
	InvalidIcon(String),
	#[error("invalid css color {0:?}")]
	InvalidColor(String),
	#[error("{0} must be a finite number in range")]
	InvalidSetting(&'static str),
	#[error("no browser window available")]
	NoWindow,
	#[error("canvas has no 2d rendering context")]
	NoContext,
	#[error("javascript error: {0}")]
	Js(String),
}

impl From<JsValue> for BackdropError {
	fn from(value: JsValue) -> Self {
		BackdropError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
