//! Animated glyph particle backdrop.
//!
//! Draws a field of floating glyphs on an HTML canvas behind the page:
//! - Seeded, reproducible particle placement
//! - Two motion styles: rising glyphs recycled at the edges, or bouncing
//!   labels that lean toward the pointer and link to close neighbours
//! - Pulsing data points and chart strokes behind the bouncing labels
//! - A `requestAnimationFrame` loop with explicit start/stop
//!
//! # Example
//!
//! ```ignore
//! use portfolio_backdrop::{BackdropConfig, FieldVariant, ParticleBackdrop};
//!
//! let config = BackdropConfig {
//!     variant: FieldVariant::Bouncing,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//!
//! view! { <ParticleBackdrop config=config /> }
//! ```

mod component;
mod decor;
mod driver;
mod error;
mod particles;
mod render;
mod surface;
pub mod theme;
mod types;

pub use component::ParticleBackdrop;
pub use decor::{ChartLine, DataPoint, Decor, DecorStyle};
pub use driver::Backdrop;
pub use error::BackdropError;
pub use particles::{
	BoundaryPolicy, Bounds, FieldSettings, GlyphOrder, MotionStyle, Particle, ParticleField,
};
pub use render::render;
pub use surface::Surface;
pub use theme::{Color, Glyph, GlyphKind, Palette};
pub use types::{BackdropConfig, FieldVariant, GlyphSpec};
