//! Drawing target abstraction.
//!
//! The simulator only ever paints through [`Surface`], so the browser canvas
//! and test doubles are interchangeable.

use web_sys::CanvasRenderingContext2d;

use super::theme::Color;

/// A 2D target the backdrop paints onto each frame.
pub trait Surface {
	/// Erase the whole `width` x `height` area.
	fn clear(&mut self, width: f64, height: f64);

	/// Draw `text` centered on `(x, y)`.
	fn fill_text(&mut self, text: &str, font: &str, color: Color, alpha: f64, x: f64, y: f64);

	/// Stroke a straight line segment.
	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64);

	/// Fill a circle. Opacity comes from `color`'s alpha.
	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_text(&mut self, text: &str, font: &str, color: Color, alpha: f64, x: f64, y: f64) {
		self.save();
		self.set_global_alpha(alpha);
		self.set_font(font);
		self.set_fill_style_str(&color.to_css());
		self.set_text_align("center");
		self.set_text_baseline("middle");
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
		self.restore();
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64) {
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}

	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color) {
		self.set_fill_style_str(&color.to_css());
		self.begin_path();
		let _ = self.arc(center.0, center.1, radius, 0.0, std::f64::consts::TAU);
		self.fill();
	}
}

/// Records draw calls instead of painting; used by the render tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
	pub ops: Vec<DrawOp>,
}

/// A single recorded draw call.
#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
	Text {
		text: String,
		font: String,
		color: Color,
		alpha: f64,
		x: f64,
		y: f64,
	},
	Line {
		from: (f64, f64),
		to: (f64, f64),
		color: Color,
	},
	Circle {
		center: (f64, f64),
		radius: f64,
		color: Color,
	},
}

#[cfg(test)]
impl Surface for RecordingSurface {
	fn clear(&mut self, _width: f64, _height: f64) {
		self.ops.clear();
	}

	fn fill_text(&mut self, text: &str, font: &str, color: Color, alpha: f64, x: f64, y: f64) {
		self.ops.push(DrawOp::Text {
			text: text.to_string(),
			font: font.to_string(),
			color,
			alpha,
			x,
			y,
		});
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, _width: f64) {
		self.ops.push(DrawOp::Line { from, to, color });
	}

	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color) {
		self.ops.push(DrawOp::Circle {
			center,
			radius,
			color,
		});
	}
}
