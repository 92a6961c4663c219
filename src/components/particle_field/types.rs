//! Configuration structures accepted by the backdrop component.

use serde::Deserialize;

use super::error::BackdropError;
use super::theme::{Color, Glyph, LinkStyle, Palette};

/// Which of the two motion styles the field uses.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldVariant {
	/// Glyphs drift upward and are recycled at the bottom after leaving the top.
	#[default]
	Rising,
	/// Labelled markers bounce off the viewport edges and lean toward the pointer.
	Bouncing,
}

/// Glyph entry as written in the JSON config.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GlyphSpec {
	Text {
		value: String,
		color: String,
		font: String,
	},
	/// `value` holds exactly one character, typically an icon-font codepoint.
	Icon {
		value: String,
		color: String,
		font: String,
	},
}

impl GlyphSpec {
	fn to_glyph(&self, index: usize) -> Result<Glyph, BackdropError> {
		match self {
			GlyphSpec::Text { value, color, font } => {
				if value.trim().is_empty() {
					return Err(BackdropError::EmptyGlyph(index));
				}
				Ok(Glyph::text(value, color.parse::<Color>()?, font))
			}
			GlyphSpec::Icon { value, color, font } => {
				let mut chars = value.chars();
				match (chars.next(), chars.next()) {
					(None, _) => Err(BackdropError::EmptyGlyph(index)),
					(Some(c), None) => Ok(Glyph::icon(c, color.parse::<Color>()?, font)),
					(Some(_), Some(_)) => Err(BackdropError::InvalidIcon(value.clone())),
				}
			}
		}
	}
}

/// Largest accepted margin, pointer radius or link distance, in px.
const MAX_DISTANCE: f64 = 10_000.0;

/// User-facing backdrop configuration.
///
/// Every field is optional in JSON; unset fields take the variant's defaults.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BackdropConfig {
	pub variant: FieldVariant,
	/// Number of particles. Defaults to 18 (rising) or the palette size (bouncing).
	pub count: Option<usize>,
	/// How far past an edge a particle may travel before it is relocated.
	pub margin: f64,
	/// Fixed RNG seed for reproducible layouts. Random when unset.
	pub seed: Option<u64>,
	/// Radius within which the pointer attracts particles (bouncing only).
	pub pointer_radius: f64,
	/// Pull per frame at the pointer itself, between 0 and 1.
	pub pointer_strength: f64,
	/// Link distance override. Defaults to 150 (bouncing) or off (rising).
	pub link_distance: Option<f64>,
	/// Custom glyphs replacing the variant's built-in palette.
	pub palette: Option<Vec<GlyphSpec>>,
}

impl Default for BackdropConfig {
	fn default() -> Self {
		Self {
			variant: FieldVariant::Rising,
			count: None,
			margin: 40.0,
			seed: None,
			pointer_radius: 100.0,
			pointer_strength: 0.01,
			link_distance: None,
			palette: None,
		}
	}
}

impl BackdropConfig {
	/// Resolve the palette, falling back to the variant's built-in one.
	pub fn palette(&self) -> Result<Palette, BackdropError> {
		let palette = match &self.palette {
			Some(specs) => Palette {
				glyphs: specs
					.iter()
					.enumerate()
					.map(|(i, spec)| spec.to_glyph(i))
					.collect::<Result<_, _>>()?,
			},
			None => match self.variant {
				FieldVariant::Rising => Palette::fintech(),
				FieldVariant::Bouncing => Palette::tech(),
			},
		};
		if palette.is_empty() {
			return Err(BackdropError::EmptyPalette);
		}
		Ok(palette)
	}

	pub fn count(&self, palette: &Palette) -> usize {
		self.count.unwrap_or(match self.variant {
			FieldVariant::Rising => 18,
			FieldVariant::Bouncing => palette.len(),
		})
	}

	pub fn links(&self) -> LinkStyle {
		match (self.link_distance, self.variant) {
			(Some(d), _) if d > 0.0 => LinkStyle::cyan(d),
			(Some(_), _) | (None, FieldVariant::Rising) => LinkStyle::disabled(),
			(None, FieldVariant::Bouncing) => LinkStyle::cyan(150.0),
		}
	}

	/// Check the whole configuration once, before the frame loop starts.
	pub fn validate(&self) -> Result<(), BackdropError> {
		let palette = self.palette()?;
		if self.count(&palette) == 0 {
			return Err(BackdropError::ZeroCount);
		}
		check("margin", self.margin, 0.0, MAX_DISTANCE)?;
		check("pointerRadius", self.pointer_radius, 0.0, MAX_DISTANCE)?;
		check("pointerStrength", self.pointer_strength, 0.0, 1.0)?;
		if let Some(distance) = self.link_distance {
			check("linkDistance", distance, 0.0, MAX_DISTANCE)?;
		}
		Ok(())
	}
}

fn check(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), BackdropError> {
	if value.is_finite() && (min..=max).contains(&value) {
		Ok(())
	} else {
		Err(BackdropError::InvalidSetting(name))
	}
}
