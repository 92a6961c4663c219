//! Visual theming for the particle backdrop.
//!
//! Provides colors, glyph styles and the two built-in glyph palettes.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use super::error::BackdropError;
use super::surface::Surface;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

impl FromStr for Color {
	type Err = BackdropError;

	/// Parses hex (`#RGB`, `#RRGGBB`) and `rgb()`/`rgba()` functional notation.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || BackdropError::InvalidColor(s.to_string());
		let s_trim = s.trim();

		if let Some(hex) = s_trim.strip_prefix('#') {
			if !hex.is_ascii() {
				return Err(invalid());
			}
			let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| invalid());
			return match hex.len() {
				3 => {
					let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
					Ok(Color::rgb(expand(0)?, expand(1)?, expand(2)?))
				}
				6 => Ok(Color::rgb(
					channel(&hex[0..2])?,
					channel(&hex[2..4])?,
					channel(&hex[4..6])?,
				)),
				_ => Err(invalid()),
			};
		}

		let body = s_trim
			.strip_prefix("rgba(")
			.or_else(|| s_trim.strip_prefix("rgb("))
			.and_then(|rest| rest.strip_suffix(')'))
			.ok_or_else(invalid)?;
		let parts: Vec<&str> = body.split(',').map(str::trim).collect();
		if parts.len() != 3 && parts.len() != 4 {
			return Err(invalid());
		}
		let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid());
		let a = match parts.get(3) {
			Some(p) => p
				.parse::<f64>()
				.ok()
				.filter(|a| (0.0..=1.0).contains(a))
				.ok_or_else(invalid)?,
			None => 1.0,
		};
		Ok(Color::rgba(
			channel(parts[0])?,
			channel(parts[1])?,
			channel(parts[2])?,
			a,
		))
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_css())
	}
}

/// What a glyph draws: literal text or a single icon-font codepoint.
#[derive(Clone, Debug, PartialEq)]
pub enum GlyphKind {
	/// Plain text such as a currency sign or a short label.
	Text(String),
	/// A private-use codepoint rendered through an icon font.
	Icon(char),
}

/// Immutable visual style of a particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
	pub kind: GlyphKind,
	pub color: Color,
	/// CSS font shorthand, e.g. `bold 36px JetBrains Mono`.
	pub font: String,
}

impl Glyph {
	pub fn text(value: &str, color: Color, font: &str) -> Self {
		Self {
			kind: GlyphKind::Text(value.to_string()),
			color,
			font: font.to_string(),
		}
	}

	pub fn icon(codepoint: char, color: Color, font: &str) -> Self {
		Self {
			kind: GlyphKind::Icon(codepoint),
			color,
			font: font.to_string(),
		}
	}

	/// Draws the glyph centered on `(x, y)`, with its font size multiplied
	/// by `size`.
	pub fn paint<S: Surface + ?Sized>(
		&self,
		surface: &mut S,
		x: f64,
		y: f64,
		alpha: f64,
		size: f64,
	) {
		let font = scaled_font(&self.font, size);
		match &self.kind {
			GlyphKind::Text(value) => surface.fill_text(value, &font, self.color, alpha, x, y),
			GlyphKind::Icon(codepoint) => {
				let mut buf = [0u8; 4];
				surface.fill_text(codepoint.encode_utf8(&mut buf), &font, self.color, alpha, x, y)
			}
		}
	}
}

/// Multiplies the first `<n>px` size in a CSS font shorthand by `factor`.
/// Fonts without a pixel size are returned unchanged.
fn scaled_font(font: &str, factor: f64) -> Cow<'_, str> {
	if factor == 1.0 || !factor.is_finite() || factor <= 0.0 {
		return Cow::Borrowed(font);
	}
	let mut start = 0;
	for token in font.split(' ') {
		if let Some(px) = token.strip_suffix("px").and_then(|n| n.parse::<f64>().ok()) {
			let size = (px * factor * 10.0).round() / 10.0;
			let end = start + token.len();
			return Cow::Owned(format!("{}{}px{}", &font[..start], size, &font[end..]));
		}
		start += token.len() + 1;
	}
	Cow::Borrowed(font)
}

const FA_FONT_30: &str = "900 30px \"Font Awesome 6 Free\"";
const FA_FONT_28: &str = "900 28px \"Font Awesome 6 Free\"";
const FA_FONT_24: &str = "900 24px \"Font Awesome 6 Free\"";
const LABEL_FONT: &str = "16px 'Courier New', monospace";

const CYAN: Color = Color::rgb(0, 212, 255);
const WHITE: Color = Color::rgb(255, 255, 255);
const INDIGO: Color = Color::rgb(102, 126, 234);

/// Sky, emerald, red, amber and violet, shared by data points and chart lines.
pub const CHART_COLORS: [Color; 5] = [
	Color::rgb(56, 189, 248),
	Color::rgb(16, 185, 129),
	Color::rgb(248, 113, 113),
	Color::rgb(251, 191, 36),
	Color::rgb(139, 92, 246),
];

/// Pointer trail marker color.
pub const TRAIL: Color = Color::rgb(56, 189, 248);

/// An ordered set of glyphs particles pick their style from.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub glyphs: Vec<Glyph>,
}

impl Palette {
	/// Rupee signs and payment icons in cyan, white and indigo.
	pub fn fintech() -> Self {
		Self {
			glyphs: vec![
				Glyph::text("₹", CYAN, "bold 36px JetBrains Mono"),
				Glyph::text("₹", WHITE, "bold 28px JetBrains Mono"),
				Glyph::text("₹", INDIGO, "bold 32px JetBrains Mono"),
				Glyph::icon('\u{f09d}', CYAN, FA_FONT_30),  // credit-card
				Glyph::icon('\u{f53a}', WHITE, FA_FONT_28), // money-check-alt
				Glyph::icon('\u{f4c0}', CYAN, FA_FONT_28),  // rupee-sign
				Glyph::icon('\u{f555}', WHITE, FA_FONT_28), // hand-holding-usd
				Glyph::icon('\u{f3d1}', INDIGO, FA_FONT_28), // wallet
				Glyph::icon('\u{f09d}', WHITE, FA_FONT_24), // credit-card
			],
		}
	}

	/// Labelled tech/finance markers, one per particle in the bouncing field.
	pub fn tech() -> Self {
		let label = |text: &str, color: Color| Glyph::text(text, color, LABEL_FONT);
		Self {
			glyphs: vec![
				label("📊 Analytics", Color::rgb(56, 189, 248)),
				label("📈 Growth", Color::rgb(16, 185, 129)),
				label("💾 Big Data", Color::rgb(248, 113, 113)),
				label("💰 Revenue", Color::rgb(251, 191, 36)),
				label("⚡ Innovation", Color::rgb(139, 92, 246)),
				label("📊 Metrics", Color::rgb(236, 72, 153)),
				label("🏢 Strategy", Color::rgb(5, 150, 105)),
				label("🔒 Security", Color::rgb(249, 115, 22)),
				label("📊 KPIs", Color::rgb(14, 165, 233)),
				label("📈 Performance", Color::rgb(168, 85, 247)),
				label("💾 Insights", Color::rgb(236, 72, 153)),
				label("💰 ROI", Color::rgb(245, 158, 11)),
				label("⚡ AI/ML", Color::rgb(6, 182, 212)),
				label("📊 Dashboard", Color::rgb(139, 92, 246)),
				label("🏢 Scale", Color::rgb(5, 150, 105)),
				label("🔒 Blockchain", Color::rgb(249, 115, 22)),
			],
		}
	}

	pub fn len(&self) -> usize {
		self.glyphs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.glyphs.is_empty()
	}

	/// Glyph at `index`, wrapping around the palette.
	///
	/// # Panics
	///
	/// Panics if the palette is empty.
	pub fn get(&self, index: usize) -> &Glyph {
		&self.glyphs[index % self.glyphs.len()]
	}
}

/// Link line configuration for fields that connect nearby particles.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Particles closer than this are connected. Zero disables links.
	pub distance: f64,
	pub color: Color,
	pub width: f64,
}

impl LinkStyle {
	pub fn disabled() -> Self {
		Self {
			distance: 0.0,
			color: Color::rgba(0, 0, 0, 0.0),
			width: 0.0,
		}
	}

	pub fn cyan(distance: f64) -> Self {
		Self {
			distance,
			color: CYAN.with_alpha(0.1),
			width: 1.0,
		}
	}

	pub fn enabled(&self) -> bool {
		self.distance > 0.0 && self.width > 0.0
	}
}
