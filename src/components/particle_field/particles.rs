//! Floating glyph particles and their per-frame update rule.
//!
//! A [`ParticleField`] owns a fixed set of particles created once from a
//! seeded RNG. Particles are never removed: the boundary policy either
//! recycles them to the opposite edge or reflects them off the edges.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::decor::{Decor, DecorStyle};
use super::error::BackdropError;
use super::theme::{LinkStyle, Palette};
use super::types::{BackdropConfig, FieldVariant};

/// Upper bound on speed in the bouncing field, so a pointer resting near a
/// particle cannot accelerate it indefinitely.
const MAX_BOUNCE_SPEED: f64 = 1.5;

/// A single floating glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Index into the field's palette.
	pub glyph: usize,
	pub alpha: f64,
	/// Speed multiplier. Also enlarges the glyph when the field's style
	/// scales glyphs.
	pub scale: f64,
}

/// Viewport extent plus the margin particles may travel past each edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
	pub margin: f64,
}

impl Bounds {
	/// Dimensions are clamped to at least one unit so random placement never
	/// samples an empty range.
	pub fn new(width: f64, height: f64, margin: f64) -> Self {
		let dim = |v: f64| if v.is_finite() { v.max(1.0) } else { 1.0 };
		Self {
			width: dim(width),
			height: dim(height),
			margin: if margin.is_finite() { margin.max(0.0) } else { 0.0 },
		}
	}

	/// Whether `(x, y)` lies inside the extended box `[-margin, dim + margin]`.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		let m = self.margin;
		(-m..=self.width + m).contains(&x) && (-m..=self.height + m).contains(&y)
	}
}

/// What happens when a particle reaches the viewport edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryPolicy {
	/// Relocate to the opposite edge once the particle has fully left.
	Recycle,
	/// Reflect velocity at the edges and drift toward a nearby pointer.
	Bounce {
		pointer_radius: f64,
		pointer_strength: f64,
	},
}

/// How particles are assigned palette entries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GlyphOrder {
	/// Each particle samples the palette uniformly.
	Random,
	/// Particle `i` takes entry `i % palette.len()`, so every entry shows up
	/// once the count reaches the palette size.
	Cycle,
}

/// Sampling ranges used when particles are created.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionStyle {
	pub vx: (f64, f64),
	pub vy: (f64, f64),
	pub alpha: (f64, f64),
	pub scale: (f64, f64),
	pub policy: BoundaryPolicy,
	pub glyphs: GlyphOrder,
	/// Whether `scale` multiplies the glyph's font size as well as its speed.
	pub scale_glyphs: bool,
}

impl MotionStyle {
	/// Slow upward drift with a little sideways wander.
	pub fn rising() -> Self {
		Self {
			vx: (-0.2, 0.2),
			vy: (-0.8, -0.3),
			alpha: (0.18, 0.40),
			scale: (1.0, 1.7),
			policy: BoundaryPolicy::Recycle,
			glyphs: GlyphOrder::Random,
			scale_glyphs: false,
		}
	}

	/// Omnidirectional wander, reflected at the edges. Labels are drawn at
	/// 16 to 24 px.
	pub fn bouncing(pointer_radius: f64, pointer_strength: f64) -> Self {
		Self {
			vx: (-0.25, 0.25),
			vy: (-0.25, 0.25),
			alpha: (0.4, 0.7),
			scale: (1.0, 1.5),
			policy: BoundaryPolicy::Bounce {
				pointer_radius,
				pointer_strength,
			},
			glyphs: GlyphOrder::Cycle,
			scale_glyphs: true,
		}
	}

	pub fn from_config(config: &BackdropConfig) -> Self {
		match config.variant {
			FieldVariant::Rising => Self::rising(),
			FieldVariant::Bouncing => {
				Self::bouncing(config.pointer_radius, config.pointer_strength)
			}
		}
	}
}

/// Samples `[lo, hi)`, or returns `lo` for a degenerate range.
fn sample(rng: &mut SmallRng, (lo, hi): (f64, f64)) -> f64 {
	if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Everything needed to lay out a new field.
#[derive(Clone, Debug)]
pub struct FieldSettings {
	pub width: f64,
	pub height: f64,
	pub count: usize,
	/// Must not be empty.
	pub palette: Palette,
	pub style: MotionStyle,
	pub links: LinkStyle,
	pub decor: DecorStyle,
	pub margin: f64,
	pub seed: u64,
}

impl FieldSettings {
	/// Settings for `config`'s variant with its palette already resolved.
	pub fn from_config(
		config: &BackdropConfig,
		width: f64,
		height: f64,
		seed: u64,
	) -> Result<Self, BackdropError> {
		let palette = config.palette()?;
		let count = config.count(&palette);
		if count == 0 {
			return Err(BackdropError::ZeroCount);
		}
		Ok(Self {
			width,
			height,
			count,
			palette,
			style: MotionStyle::from_config(config),
			links: config.links(),
			decor: match config.variant {
				FieldVariant::Rising => DecorStyle::none(),
				FieldVariant::Bouncing => DecorStyle::dashboard(),
			},
			margin: config.margin,
			seed,
		})
	}
}

/// Owns the particles, the palette they draw from and the current bounds.
pub struct ParticleField {
	particles: Vec<Particle>,
	palette: Palette,
	links: LinkStyle,
	policy: BoundaryPolicy,
	scale_glyphs: bool,
	decor: Decor,
	bounds: Bounds,
	pointer: Option<(f64, f64)>,
	rng: SmallRng,
}

impl ParticleField {
	/// Scatter `settings.count` particles over the viewport.
	///
	/// The palette must not be empty: rendering looks glyphs up by index.
	/// [`from_config`](Self::from_config) rejects empty palettes up front.
	pub fn new(settings: FieldSettings) -> Self {
		let FieldSettings {
			width,
			height,
			count,
			palette,
			style,
			links,
			decor,
			margin,
			seed,
		} = settings;
		debug_assert!(!palette.is_empty(), "particle field needs at least one glyph");

		let bounds = Bounds::new(width, height, margin);
		let mut rng = SmallRng::seed_from_u64(seed);
		let glyph_count = palette.len().max(1);

		let particles = (0..count)
			.map(|i| Particle {
				x: rng.gen_range(0.0..bounds.width),
				y: rng.gen_range(0.0..bounds.height),
				vx: sample(&mut rng, style.vx),
				vy: sample(&mut rng, style.vy),
				glyph: match style.glyphs {
					GlyphOrder::Random => rng.gen_range(0..glyph_count),
					GlyphOrder::Cycle => i % glyph_count,
				},
				alpha: sample(&mut rng, style.alpha),
				scale: sample(&mut rng, style.scale),
			})
			.collect();
		let decor = Decor::new(&decor, &bounds, &mut rng);

		Self {
			particles,
			palette,
			links,
			policy: style.policy,
			scale_glyphs: style.scale_glyphs,
			decor,
			bounds,
			pointer: None,
			rng,
		}
	}

	/// Build a field straight from a validated configuration.
	pub fn from_config(
		config: &BackdropConfig,
		width: f64,
		height: f64,
		seed: u64,
	) -> Result<Self, BackdropError> {
		FieldSettings::from_config(config, width, height, seed).map(Self::new)
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	pub fn link_style(&self) -> &LinkStyle {
		&self.links
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	pub fn decor(&self) -> &Decor {
		&self.decor
	}

	pub fn pointer(&self) -> Option<(f64, f64)> {
		self.pointer
	}

	/// Font size multiplier for `p`'s glyph.
	pub fn glyph_size(&self, p: &Particle) -> f64 {
		if self.scale_glyphs { p.scale } else { 1.0 }
	}

	/// Advance every particle by `dt` frames (1.0 = one 60 Hz refresh).
	pub fn advance(&mut self, dt: f64) {
		let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
		let bounds = self.bounds;
		self.decor.tick(dt);

		for p in &mut self.particles {
			p.x += p.vx * p.scale * dt;
			p.y += p.vy * p.scale * dt;

			match self.policy {
				BoundaryPolicy::Recycle => recycle(p, &bounds, &mut self.rng),
				BoundaryPolicy::Bounce {
					pointer_radius,
					pointer_strength,
				} => {
					if let Some(pointer) = self.pointer {
						attract(p, pointer, pointer_radius, pointer_strength * dt);
					}
					bounce(p, &bounds);
				}
			}
		}
	}

	/// Update the bounds used by [`advance`](Self::advance). Particles are
	/// left where they are and drift back into view on their own.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.bounds = Bounds::new(width, height, self.bounds.margin);
	}

	/// Latest pointer position in canvas coordinates, or `None` once it leaves.
	pub fn set_pointer(&mut self, pointer: Option<(f64, f64)>) {
		self.pointer = pointer.filter(|(x, y)| x.is_finite() && y.is_finite());
	}

	/// Call `f` once for each unordered pair closer than the link distance.
	pub fn visit_links<F: FnMut(&Particle, &Particle)>(&self, mut f: F) {
		if !self.links.enabled() {
			return;
		}
		let max_sq = self.links.distance * self.links.distance;
		for (i, a) in self.particles.iter().enumerate() {
			for b in &self.particles[i + 1..] {
				let (dx, dy) = (a.x - b.x, a.y - b.y);
				if dx * dx + dy * dy < max_sq {
					f(a, b);
				}
			}
		}
	}
}

fn recycle(p: &mut Particle, bounds: &Bounds, rng: &mut SmallRng) {
	let (w, h, m) = (bounds.width, bounds.height, bounds.margin);

	if p.y < -m {
		p.y = h + m;
		p.x = rng.gen_range(0.0..w);
	} else if p.y > h + m && p.vy > 0.0 {
		p.y = -m;
		p.x = rng.gen_range(0.0..w);
	}

	if p.x < -m {
		p.x = w + m;
	} else if p.x > w + m {
		p.x = -m;
	}
}

fn attract(p: &mut Particle, (px, py): (f64, f64), radius: f64, strength: f64) {
	let (dx, dy) = (px - p.x, py - p.y);
	let distance = (dx * dx + dy * dy).sqrt();
	if distance <= f64::EPSILON || distance >= radius {
		return;
	}
	let force = (radius - distance) / radius;
	p.vx += dx / distance * force * strength;
	p.vy += dy / distance * force * strength;

	let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
	if !speed.is_finite() {
		p.vx = 0.0;
		p.vy = 0.0;
	} else if speed > MAX_BOUNCE_SPEED {
		p.vx *= MAX_BOUNCE_SPEED / speed;
		p.vy *= MAX_BOUNCE_SPEED / speed;
	}
}

fn bounce(p: &mut Particle, bounds: &Bounds) {
	if p.x <= 0.0 {
		p.vx = p.vx.abs();
	} else if p.x >= bounds.width {
		p.vx = -p.vx.abs();
	}
	if p.y <= 0.0 {
		p.vy = p.vy.abs();
	} else if p.y >= bounds.height {
		p.vy = -p.vy.abs();
	}
	p.x = p.x.clamp(0.0, bounds.width);
	p.y = p.y.clamp(0.0, bounds.height);
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rising(width: f64, height: f64, count: usize, seed: u64) -> ParticleField {
		ParticleField::new(FieldSettings {
			width,
			height,
			count,
			palette: Palette::fintech(),
			style: MotionStyle::rising(),
			links: LinkStyle::disabled(),
			decor: DecorStyle::none(),
			margin: 40.0,
			seed,
		})
	}

	fn bouncing(width: f64, height: f64, count: usize, seed: u64) -> ParticleField {
		ParticleField::new(FieldSettings {
			width,
			height,
			count,
			palette: Palette::tech(),
			style: MotionStyle::bouncing(100.0, 0.01),
			links: LinkStyle::cyan(150.0),
			decor: DecorStyle::none(),
			margin: 40.0,
			seed,
		})
	}

	fn assert_in_bounds(field: &ParticleField) {
		let bounds = field.bounds();
		for p in field.particles() {
			assert!(
				bounds.contains(p.x, p.y),
				"particle at ({}, {}) escaped {:?}",
				p.x,
				p.y,
				bounds
			);
		}
	}

	#[test]
	fn test_initial_ranges() {
		let field = rising(800.0, 600.0, 200, 1);
		assert_eq!(field.particles().len(), 200);
		for p in field.particles() {
			assert!((0.0..800.0).contains(&p.x));
			assert!((0.0..600.0).contains(&p.y));
			assert!((-0.2..0.2).contains(&p.vx));
			assert!((-0.8..-0.3).contains(&p.vy));
			assert!((0.18..0.40).contains(&p.alpha));
			assert!((1.0..1.7).contains(&p.scale));
			assert!(p.glyph < field.palette().len());
		}
	}

	#[test]
	fn test_recycle_keeps_particles_in_bounds() {
		for seed in 0..8 {
			let mut field = rising(1280.0, 720.0, 40, seed);
			for frame in 0..5_000 {
				field.advance(if frame % 3 == 0 { 2.5 } else { 1.0 });
				assert_in_bounds(&field);
			}
		}
	}

	#[test]
	fn test_bounce_keeps_particles_in_bounds() {
		let mut field = bouncing(640.0, 480.0, 16, 3);
		field.set_pointer(Some((320.0, 240.0)));
		for _ in 0..5_000 {
			field.advance(1.0);
			assert_in_bounds(&field);
		}
	}

	#[test]
	fn test_count_is_conserved() {
		let mut field = rising(300.0, 200.0, 18, 9);
		for _ in 0..2_000 {
			field.advance(1.0);
		}
		assert_eq!(field.particles().len(), 18);
	}

	#[test]
	fn test_same_seed_same_positions() {
		let run = || {
			let mut field = rising(1024.0, 768.0, 30, 42);
			for _ in 0..500 {
				field.advance(1.0);
			}
			field
				.particles()
				.iter()
				.map(|p| (p.x.to_bits(), p.y.to_bits()))
				.collect::<Vec<_>>()
		};
		assert_eq!(run(), run());
	}

	#[test]
	fn test_different_seeds_differ() {
		let a = rising(1024.0, 768.0, 10, 1);
		let b = rising(1024.0, 768.0, 10, 2);
		assert_ne!(a.particles(), b.particles());
	}

	#[test]
	fn test_exits_top_and_respawns_at_bottom() {
		let mut field = rising(800.0, 600.0, 1, 5);
		field.particles[0] = Particle {
			x: 400.0,
			y: -39.8,
			vx: 0.0,
			vy: -0.5,
			glyph: 0,
			alpha: 0.3,
			scale: 1.0,
		};
		field.advance(1.0);

		let p = &field.particles()[0];
		assert_eq!(p.y, 640.0);
		assert!((0.0..800.0).contains(&p.x));
	}

	#[test]
	fn test_partially_visible_particle_is_not_recycled() {
		let mut field = rising(800.0, 600.0, 1, 5);
		field.particles[0].x = 400.0;
		field.particles[0].y = -10.0;
		field.particles[0].vx = 0.0;
		field.particles[0].vy = -0.5;
		field.particles[0].scale = 1.0;
		field.advance(1.0);

		let p = &field.particles()[0];
		assert_eq!((p.x, p.y), (400.0, -10.5));
	}

	#[test]
	fn test_horizontal_wrap() {
		let mut field = rising(800.0, 600.0, 2, 5);
		for p in &mut field.particles {
			p.y = 300.0;
			p.vy = 0.0;
			p.scale = 1.0;
		}
		field.particles[0].x = -39.9;
		field.particles[0].vx = -0.2;
		field.particles[1].x = 839.9;
		field.particles[1].vx = 0.2;
		field.advance(1.0);

		assert_eq!(field.particles()[0].x, 840.0);
		assert_eq!(field.particles()[1].x, -40.0);
	}

	#[test]
	fn test_shrinking_viewport_recovers() {
		let mut field = rising(1920.0, 1080.0, 50, 11);
		field.resize(320.0, 240.0);
		// Slowest particle climbs 0.3 px/frame; the worst case starts ~800 px low.
		for _ in 0..3_000 {
			field.advance(1.0);
			for p in field.particles() {
				assert!(p.x.is_finite() && p.y.is_finite());
			}
		}
		assert_in_bounds(&field);
	}

	#[test]
	fn test_resize_does_not_move_particles() {
		let mut field = rising(800.0, 600.0, 10, 2);
		let before = field.particles().to_vec();
		field.resize(100.0, 100.0);
		assert_eq!(field.particles(), &before[..]);
		assert_eq!(field.bounds().width, 100.0);
	}

	#[test]
	fn test_zero_size_viewport() {
		let mut field = rising(0.0, 0.0, 10, 4);
		assert_eq!(field.bounds().width, 1.0);
		field.resize(f64::NAN, -5.0);
		for _ in 0..1_000 {
			field.advance(1.0);
		}
		for p in field.particles() {
			assert!(p.x.is_finite() && p.y.is_finite());
		}
		assert_in_bounds(&field);
	}

	#[test]
	fn test_non_finite_dt_is_ignored() {
		let mut field = rising(800.0, 600.0, 5, 8);
		let before = field.particles().to_vec();
		field.advance(f64::NAN);
		field.advance(-1.0);
		assert_eq!(field.particles(), &before[..]);
	}

	#[test]
	fn test_bounce_reflects_at_edge() {
		let mut field = bouncing(800.0, 600.0, 1, 1);
		field.particles[0] = Particle {
			x: 799.9,
			y: 0.1,
			vx: 0.25,
			vy: -0.25,
			glyph: 0,
			alpha: 0.5,
			scale: 1.0,
		};
		field.advance(1.0);

		let p = &field.particles()[0];
		assert_eq!((p.x, p.y), (800.0, 0.0));
		assert_eq!((p.vx, p.vy), (-0.25, 0.25));
	}

	#[test]
	fn test_pointer_attracts_nearby_particle() {
		let mut field = bouncing(800.0, 600.0, 1, 1);
		field.particles[0].x = 400.0;
		field.particles[0].y = 300.0;
		field.particles[0].vx = 0.0;
		field.particles[0].vy = 0.0;

		field.set_pointer(Some((450.0, 300.0)));
		field.advance(1.0);
		let p = &field.particles()[0];
		assert!(p.vx > 0.0);
		assert_eq!(p.vy, 0.0);
	}

	#[test]
	fn test_distant_or_coincident_pointer_has_no_effect() {
		let mut field = bouncing(800.0, 600.0, 1, 1);
		field.particles[0].x = 400.0;
		field.particles[0].y = 300.0;
		field.particles[0].vx = 0.1;
		field.particles[0].vy = 0.0;

		field.set_pointer(Some((700.0, 300.0)));
		field.advance(1.0);
		assert_eq!(field.particles()[0].vx, 0.1);

		let (x, y) = (field.particles()[0].x, field.particles()[0].y);
		field.set_pointer(Some((x + 0.1, y)));
		field.particles[0].vx = 0.0;
		field.advance(1.0);
		assert!(field.particles()[0].vx.is_finite());
	}

	#[test]
	fn test_pointer_speed_is_capped() {
		let mut field = bouncing(800.0, 600.0, 1, 1);
		field.set_pointer(Some((400.0, 300.0)));
		for _ in 0..10_000 {
			field.advance(1.0);
			let p = &field.particles()[0];
			assert!((p.vx * p.vx + p.vy * p.vy).sqrt() <= MAX_BOUNCE_SPEED + 1e-9);
		}
	}

	#[test]
	fn test_huge_pointer_strength_stays_finite() {
		let mut field = ParticleField::new(FieldSettings {
			style: MotionStyle::bouncing(100.0, 1e308),
			..FieldSettings::from_config(
				&BackdropConfig {
					variant: FieldVariant::Bouncing,
					..Default::default()
				},
				800.0,
				600.0,
				1,
			)
			.unwrap()
		});
		field.particles[0].x = 400.0;
		field.particles[0].y = 300.0;
		field.set_pointer(Some((410.0, 300.0)));
		for _ in 0..100 {
			field.advance(3.0);
			for p in field.particles() {
				assert!(p.vx.is_finite() && p.vy.is_finite(), "{p:?}");
			}
			assert_in_bounds(&field);
		}
	}

	#[test]
	fn test_bouncing_field_shows_every_label() {
		for seed in 0..16 {
			let config = BackdropConfig {
				variant: FieldVariant::Bouncing,
				..Default::default()
			};
			let field = ParticleField::from_config(&config, 800.0, 600.0, seed).unwrap();
			let mut glyphs: Vec<usize> = field.particles().iter().map(|p| p.glyph).collect();
			glyphs.sort_unstable();
			assert_eq!(glyphs, (0..16).collect::<Vec<_>>());
		}
	}

	#[test]
	fn test_cycled_glyphs_wrap_past_palette() {
		let field = bouncing(800.0, 600.0, 20, 1);
		let glyphs: Vec<usize> = field.particles().iter().map(|p| p.glyph).collect();
		assert_eq!(&glyphs[14..], &[14, 15, 0, 1, 2, 3]);
	}

	#[test]
	fn test_bouncing_labels_are_sized() {
		let field = bouncing(800.0, 600.0, 200, 6);
		for p in field.particles() {
			assert!((1.0..1.5).contains(&p.scale));
			assert_eq!(field.glyph_size(p), p.scale);
		}
		let still = rising(800.0, 600.0, 10, 6);
		for p in still.particles() {
			assert_eq!(still.glyph_size(p), 1.0);
		}
	}

	#[test]
	fn test_links_between_close_pairs() {
		let mut field = bouncing(800.0, 600.0, 3, 1);
		field.particles[0].x = 100.0;
		field.particles[0].y = 100.0;
		field.particles[1].x = 200.0;
		field.particles[1].y = 100.0;
		field.particles[2].x = 600.0;
		field.particles[2].y = 500.0;

		let mut pairs = 0;
		field.visit_links(|a, b| {
			pairs += 1;
			assert_eq!((a.x, b.x), (100.0, 200.0));
		});
		assert_eq!(pairs, 1);

		let mut none = 0;
		rising(800.0, 600.0, 30, 1).visit_links(|_, _| none += 1);
		assert_eq!(none, 0);
	}

	#[test]
	fn test_from_config() {
		let config = BackdropConfig {
			variant: FieldVariant::Bouncing,
			..Default::default()
		};
		let field = ParticleField::from_config(&config, 800.0, 600.0, 1).unwrap();
		assert_eq!(field.particles().len(), 16);
		assert!(field.link_style().enabled());
		assert_eq!(field.decor().data_points().len(), 80);
		assert_eq!(field.decor().chart_lines().len(), 25);

		let plain =
			ParticleField::from_config(&BackdropConfig::default(), 800.0, 600.0, 1).unwrap();
		assert_eq!(plain.particles().len(), 18);
		assert!(plain.decor().data_points().is_empty());
		assert!(!plain.decor().has_trail());

		let zero = BackdropConfig {
			count: Some(0),
			..Default::default()
		};
		assert!(ParticleField::from_config(&zero, 800.0, 600.0, 1).is_err());
	}
}
