//! Dashboard-style decorations for the bouncing field.
//!
//! Pulsing data points, glowing chart strokes and a marker that follows the
//! pointer. None of them move; they only breathe in opacity and size on
//! their own clocks.

use std::f64::consts::TAU;

use rand::Rng;
use rand::rngs::SmallRng;

use super::particles::Bounds;
use super::theme::{CHART_COLORS, Color};

const FRAMES_PER_SECOND: f64 = 60.0;

/// Data point radius (6 px across) before pulsing.
const POINT_RADIUS: f64 = 3.0;
/// Chart stroke thickness.
const CHART_WIDTH: f64 = 3.0;
/// Trail marker radius before its wobble.
const TRAIL_RADIUS: f64 = 10.0;

/// How many decorations a field carries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorStyle {
	pub data_points: usize,
	pub chart_lines: usize,
	pub pointer_trail: bool,
}

impl DecorStyle {
	pub fn none() -> Self {
		Self {
			data_points: 0,
			chart_lines: 0,
			pointer_trail: false,
		}
	}

	/// 80 data points, 25 chart lines and a pointer trail.
	pub fn dashboard() -> Self {
		Self {
			data_points: 80,
			chart_lines: 25,
			pointer_trail: true,
		}
	}
}

/// A small dot pulsing between 0.3 and 0.8 opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
	pub x: f64,
	pub y: f64,
	pub color: Color,
	/// Pulse period in frames (2 to 4 seconds).
	pub period: f64,
}

/// A straight stroke glowing between 0.2 and 0.6 opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLine {
	pub x: f64,
	pub y: f64,
	/// 100 to 300 px.
	pub length: f64,
	/// Radians, clockwise from the positive x axis.
	pub angle: f64,
	pub color: Color,
	/// Glow period in frames (3 to 5 seconds).
	pub period: f64,
}

impl ChartLine {
	pub fn end(&self) -> (f64, f64) {
		(
			self.x + self.length * self.angle.cos(),
			self.y + self.length * self.angle.sin(),
		)
	}
}

/// Static decorations plus the clock that drives their animation.
#[derive(Clone, Debug)]
pub struct Decor {
	points: Vec<DataPoint>,
	lines: Vec<ChartLine>,
	trail: bool,
	/// Frames elapsed since creation.
	clock: f64,
}

impl Decor {
	pub fn new(style: &DecorStyle, bounds: &Bounds, rng: &mut SmallRng) -> Self {
		let points = (0..style.data_points)
			.map(|_| DataPoint {
				x: rng.gen_range(0.0..bounds.width),
				y: rng.gen_range(0.0..bounds.height),
				color: CHART_COLORS[rng.gen_range(0..CHART_COLORS.len())],
				period: rng.gen_range(2.0..4.0) * FRAMES_PER_SECOND,
			})
			.collect();
		let lines = (0..style.chart_lines)
			.map(|_| ChartLine {
				x: rng.gen_range(0.0..bounds.width),
				y: rng.gen_range(0.0..bounds.height),
				length: rng.gen_range(100.0..300.0),
				angle: rng.gen_range(0.0..TAU),
				color: CHART_COLORS[rng.gen_range(0..CHART_COLORS.len())],
				period: rng.gen_range(3.0..5.0) * FRAMES_PER_SECOND,
			})
			.collect();

		Self {
			points,
			lines,
			trail: style.pointer_trail,
			clock: 0.0,
		}
	}

	pub fn data_points(&self) -> &[DataPoint] {
		&self.points
	}

	pub fn chart_lines(&self) -> &[ChartLine] {
		&self.lines
	}

	pub fn has_trail(&self) -> bool {
		self.trail
	}

	/// `dt` is already sanitized by the field.
	pub fn tick(&mut self, dt: f64) {
		self.clock += dt;
	}

	/// Opacity and radius of a data point at the current clock.
	pub fn point_look(&self, point: &DataPoint) -> (f64, f64) {
		let k = pulse(self.clock, point.period);
		(0.3 + 0.5 * k, POINT_RADIUS * (1.0 + 0.2 * k))
	}

	/// Opacity and stroke width of a chart line at the current clock.
	pub fn line_look(&self, line: &ChartLine) -> (f64, f64) {
		(0.2 + 0.4 * pulse(self.clock, line.period), CHART_WIDTH)
	}

	/// Trail radius, wobbling by up to 20% about once a second.
	pub fn trail_radius(&self) -> f64 {
		let millis = self.clock * 1000.0 / FRAMES_PER_SECOND;
		TRAIL_RADIUS * (1.0 + (millis * 0.01).sin() * 0.2)
	}
}

/// 0 at the start and end of each period, 1 halfway through.
fn pulse(clock: f64, period: f64) -> f64 {
	if period <= 0.0 {
		return 0.0;
	}
	0.5 - 0.5 * (TAU * clock / period).cos()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;

	fn dashboard(seed: u64) -> Decor {
		let bounds = Bounds::new(1280.0, 720.0, 40.0);
		Decor::new(
			&DecorStyle::dashboard(),
			&bounds,
			&mut SmallRng::seed_from_u64(seed),
		)
	}

	#[test]
	fn test_dashboard_counts_and_ranges() {
		let decor = dashboard(4);
		assert_eq!(decor.data_points().len(), 80);
		assert_eq!(decor.chart_lines().len(), 25);
		assert!(decor.has_trail());

		for p in decor.data_points() {
			assert!((0.0..1280.0).contains(&p.x) && (0.0..720.0).contains(&p.y));
			assert!((120.0..240.0).contains(&p.period));
			assert!(CHART_COLORS.contains(&p.color));
		}
		for l in decor.chart_lines() {
			assert!((0.0..1280.0).contains(&l.x) && (0.0..720.0).contains(&l.y));
			assert!((100.0..300.0).contains(&l.length));
			assert!((0.0..TAU).contains(&l.angle));
			assert!((180.0..300.0).contains(&l.period));
			let (ex, ey) = l.end();
			let drawn = ((ex - l.x).powi(2) + (ey - l.y).powi(2)).sqrt();
			assert!((drawn - l.length).abs() < 1e-9);
		}
	}

	#[test]
	fn test_none_is_empty() {
		let decor = Decor::new(
			&DecorStyle::none(),
			&Bounds::new(800.0, 600.0, 40.0),
			&mut SmallRng::seed_from_u64(1),
		);
		assert!(decor.data_points().is_empty());
		assert!(decor.chart_lines().is_empty());
		assert!(!decor.has_trail());
	}

	#[test]
	fn test_pulse_stays_in_keyframe_range() {
		let mut decor = dashboard(9);
		for _ in 0..600 {
			decor.tick(1.0);
			for p in decor.data_points() {
				let (alpha, radius) = decor.point_look(p);
				assert!((0.3 - 1e-9..=0.8 + 1e-9).contains(&alpha));
				assert!((3.0 - 1e-9..=3.6 + 1e-9).contains(&radius));
			}
			for l in decor.chart_lines() {
				let (alpha, width) = decor.line_look(l);
				assert!((0.2 - 1e-9..=0.6 + 1e-9).contains(&alpha));
				assert_eq!(width, 3.0);
			}
			let r = decor.trail_radius();
			assert!((8.0 - 1e-9..=12.0 + 1e-9).contains(&r));
		}
	}

	#[test]
	fn test_pulse_peaks_halfway() {
		let mut decor = dashboard(2);
		let point = decor.data_points()[0].clone();
		assert!((decor.point_look(&point).0 - 0.3).abs() < 1e-9);
		decor.tick(point.period / 2.0);
		assert!((decor.point_look(&point).0 - 0.8).abs() < 1e-9);
		decor.tick(point.period / 2.0);
		assert!((decor.point_look(&point).0 - 0.3).abs() < 1e-9);
	}
}
