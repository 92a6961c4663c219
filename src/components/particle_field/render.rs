//! Frame rendering for the particle backdrop.
//!
//! Each frame starts from a cleared surface and draws back to front:
//! 1. Link lines between nearby particles (when enabled)
//! 2. Pointer trail
//! 3. Glyphs at their current positions
//! 4. Chart lines, then data points

use super::particles::ParticleField;
use super::surface::Surface;
use super::theme::TRAIL;

/// Renders the field onto `surface`. Without a surface the frame is skipped.
pub fn render<S: Surface + ?Sized>(field: &ParticleField, surface: Option<&mut S>) {
	let Some(surface) = surface else {
		return;
	};
	let bounds = field.bounds();
	surface.clear(bounds.width, bounds.height);

	draw_links(field, surface);
	draw_trail(field, surface);
	draw_glyphs(field, surface);
	draw_decor(field, surface);
}

fn draw_links<S: Surface + ?Sized>(field: &ParticleField, surface: &mut S) {
	let style = field.link_style();
	field.visit_links(|a, b| {
		surface.line((a.x, a.y), (b.x, b.y), style.color, style.width);
	});
}

fn draw_trail<S: Surface + ?Sized>(field: &ParticleField, surface: &mut S) {
	let decor = field.decor();
	let Some(pointer) = field.pointer().filter(|_| decor.has_trail()) else {
		return;
	};
	// Soft halo, then the brighter core.
	let radius = decor.trail_radius();
	surface.fill_circle(pointer, radius, TRAIL.with_alpha(0.1));
	surface.fill_circle(pointer, radius * 0.7, TRAIL.with_alpha(0.6));
}

fn draw_glyphs<S: Surface + ?Sized>(field: &ParticleField, surface: &mut S) {
	let palette = field.palette();
	for p in field.particles() {
		palette
			.get(p.glyph)
			.paint(surface, p.x, p.y, p.alpha, field.glyph_size(p));
	}
}

fn draw_decor<S: Surface + ?Sized>(field: &ParticleField, surface: &mut S) {
	let decor = field.decor();
	for line in decor.chart_lines() {
		let (alpha, width) = decor.line_look(line);
		surface.line((line.x, line.y), line.end(), line.color.with_alpha(alpha), width);
	}
	for point in decor.data_points() {
		let (alpha, radius) = decor.point_look(point);
		surface.fill_circle((point.x, point.y), radius, point.color.with_alpha(alpha));
	}
}
