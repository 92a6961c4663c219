//! Browser frame loop and event wiring for a running backdrop.
//!
//! [`Backdrop::start`] sizes the canvas, builds the particle field and
//! schedules a `requestAnimationFrame` callback that reschedules itself each
//! frame. [`Backdrop::stop`] cancels the pending frame, removes the window
//! listeners and drops the closures so nothing outlives the host view.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::error::BackdropError;
use super::particles::ParticleField;
use super::render;
use super::types::{BackdropConfig, FieldVariant};

/// Length of one display refresh at 60 Hz, in milliseconds.
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Largest step taken after a stall (e.g. a background tab), in frames.
const MAX_FRAME_STEP: f64 = 3.0;

/// Everything the frame callback touches.
struct Scene {
	field: ParticleField,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	last_frame: Option<f64>,
}

impl Scene {
	fn frame(&mut self, timestamp: f64) {
		let dt = frame_step(self.last_frame, timestamp);
		self.last_frame = Some(timestamp);
		self.field.advance(dt);

		// A detached canvas is retried on the next frame.
		let surface = self.canvas.is_connected().then_some(&mut self.ctx);
		render::render(&self.field, surface);
	}

	fn resize(&mut self, width: f64, height: f64) {
		self.canvas.set_width(width as u32);
		self.canvas.set_height(height as u32);
		self.field.resize(width, height);
	}
}

/// Converts the gap between two animation timestamps into frames.
fn frame_step(last: Option<f64>, now: f64) -> f64 {
	match last {
		Some(prev) => ((now - prev) / FRAME_MS).clamp(0.0, MAX_FRAME_STEP),
		None => 1.0,
	}
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(dim(window.inner_width()), dim(window.inner_height()))
}

fn random_seed() -> u64 {
	(js_sys::Math::random() * (1u64 << 53) as f64) as u64 ^ js_sys::Date::now() as u64
}

/// A running particle backdrop bound to one canvas.
///
/// Dropping the handle stops it.
pub struct Backdrop {
	window: Window,
	scene: Rc<RefCell<Option<Scene>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	frame_id: Rc<Cell<Option<i32>>>,
	on_resize: Option<Closure<dyn FnMut()>>,
	on_pointer_move: Option<Closure<dyn FnMut(MouseEvent)>>,
	on_pointer_out: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl Backdrop {
	/// Validate `config`, attach to `canvas` and start animating.
	pub fn start(canvas: HtmlCanvasElement, config: &BackdropConfig) -> Result<Self, BackdropError> {
		config.validate()?;
		let window = web_sys::window().ok_or(BackdropError::NoWindow)?;

		let (w, h) = viewport_size(&window);
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or(BackdropError::NoContext)?
			.dyn_into()
			.map_err(|_| BackdropError::NoContext)?;

		let seed = config.seed.unwrap_or_else(random_seed);
		let field = ParticleField::from_config(config, w, h, seed)?;
		info!(
			"portfolio-backdrop: starting {:?} field with {} particles (seed {})",
			config.variant,
			field.particles().len(),
			seed
		);

		let mut scene = Scene {
			field,
			canvas,
			ctx,
			last_frame: None,
		};
		scene.resize(w, h);

		let mut backdrop = Self {
			window,
			scene: Rc::new(RefCell::new(Some(scene))),
			animate: Rc::new(RefCell::new(None)),
			frame_id: Rc::new(Cell::new(None)),
			on_resize: None,
			on_pointer_move: None,
			on_pointer_out: None,
		};

		if let Err(e) = backdrop.attach(config.variant) {
			backdrop.stop();
			return Err(e);
		}
		Ok(backdrop)
	}

	fn attach(&mut self, variant: FieldVariant) -> Result<(), BackdropError> {
		let scene_resize = self.scene.clone();
		let on_resize = Closure::<dyn FnMut()>::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = viewport_size(&win);
			if let Some(ref mut scene) = *scene_resize.borrow_mut() {
				scene.resize(nw, nh);
				debug!("portfolio-backdrop: resized to {}x{}", nw, nh);
			}
		});
		self.window
			.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
		self.on_resize = Some(on_resize);

		if variant == FieldVariant::Bouncing {
			let scene_move = self.scene.clone();
			let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
				if let Some(ref mut scene) = *scene_move.borrow_mut() {
					scene
						.field
						.set_pointer(Some((ev.client_x() as f64, ev.client_y() as f64)));
				}
			});
			self.window
				.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
			self.on_pointer_move = Some(on_move);

			let scene_out = self.scene.clone();
			let on_out = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
				// Only a mouseout without a destination means the pointer left the page.
				if ev.related_target().is_some() {
					return;
				}
				if let Some(ref mut scene) = *scene_out.borrow_mut() {
					scene.field.set_pointer(None);
				}
			});
			self.window
				.add_event_listener_with_callback("mouseout", on_out.as_ref().unchecked_ref())?;
			self.on_pointer_out = Some(on_out);
		}

		let (scene_anim, animate_inner, frame_anim) = (
			self.scene.clone(),
			self.animate.clone(),
			self.frame_id.clone(),
		);
		*self.animate.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			frame_anim.set(None);
			if let Some(ref mut scene) = *scene_anim.borrow_mut() {
				scene.frame(timestamp);
			} else {
				return;
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				frame_anim.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *self.animate.borrow() {
			let id = self.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
			self.frame_id.set(Some(id));
		}
		Ok(())
	}

	/// Whether the frame loop is still scheduled.
	pub fn is_running(&self) -> bool {
		self.scene.borrow().is_some()
	}

	/// Cancel the frame loop, detach listeners and release the canvas.
	/// Calling it again is a no-op.
	pub fn stop(&mut self) {
		if let Some(id) = self.frame_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		// Breaks the callback's reference to itself.
		self.animate.borrow_mut().take();

		detach(&self.window, "resize", self.on_resize.take());
		detach(&self.window, "mousemove", self.on_pointer_move.take());
		detach(&self.window, "mouseout", self.on_pointer_out.take());

		if let Some(scene) = self.scene.borrow_mut().take() {
			let bounds = scene.field.bounds();
			scene.ctx.clear_rect(0.0, 0.0, bounds.width, bounds.height);
			info!("portfolio-backdrop: stopped");
		}
	}
}

fn detach<T: ?Sized>(window: &Window, event: &str, callback: Option<Closure<T>>) {
	if let Some(cb) = callback {
		let _ = window.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
	}
}

impl Drop for Backdrop {
	fn drop(&mut self) {
		self.stop();
	}
}
