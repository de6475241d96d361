//! Pan/zoom transform shared by hit-testing and drawing.
//!
//! Screen coordinates are CSS pixels relative to the canvas; graph coordinates
//! are the layout space vertices live in:
//!
//! `screen = translate + graph * scale`

use super::edge::{Point, Rect};

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug)]
pub struct Viewport {
	/// Zoom factor (1.0 = 100%).
	pub scale: f64,
	pub translate: Point,
	/// Canvas size in CSS pixels.
	pub width: f64,
	pub height: f64,
	pub device_pixel_ratio: f64,
	/// Size the content was last rescaled for. Resizes that do not rescale
	/// leave it alone, so a later rescale is relative to this size.
	layout_size: (f64, f64),
}

impl Viewport {
	pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
		Self {
			scale: 1.0,
			translate: Point::default(),
			width,
			height,
			device_pixel_ratio,
			layout_size: (width, height),
		}
	}

	pub fn to_screen(&self, p: Point) -> Point {
		Point::new(
			self.translate.x + p.x * self.scale,
			self.translate.y + p.y * self.scale,
		)
	}

	pub fn to_graph(&self, p: Point) -> Point {
		Point::new(
			(p.x - self.translate.x) / self.scale,
			(p.y - self.translate.y) / self.scale,
		)
	}

	/// Graph-space rectangle as it appears on screen.
	pub fn screen_rect(&self, r: &Rect) -> Rect {
		let origin = self.to_screen(Point::new(r.x, r.y));
		Rect {
			x: origin.x,
			y: origin.y,
			width: r.width * self.scale,
			height: r.height * self.scale,
		}
	}

	/// Multiply the zoom by `factor`, keeping `anchor` (screen space) fixed.
	/// Returns whether the scale changed.
	pub fn zoom_at(&mut self, anchor: Point, factor: f64, min: f64, max: f64) -> bool {
		let new_scale = (self.scale * factor).clamp(min, max);
		if (new_scale - self.scale).abs() < f64::EPSILON {
			return false;
		}
		let ratio = new_scale / self.scale;
		self.translate.x = anchor.x - (anchor.x - self.translate.x) * ratio;
		self.translate.y = anchor.y - (anchor.y - self.translate.y) * ratio;
		self.scale = new_scale;
		true
	}

	/// Shift the view by a screen-space delta, keeping `content` (graph space)
	/// overlapping the central half of the viewport.
	pub fn pan_by(&mut self, dx: f64, dy: f64, content: Option<Rect>) {
		self.translate.x += dx;
		self.translate.y += dy;
		if let Some(content) = content {
			self.clamp_to(&content);
		}
	}

	fn clamp_to(&mut self, content: &Rect) {
		let b = self.screen_rect(content);
		let (lo_x, hi_x) = (self.width / 4.0, self.width * 3.0 / 4.0);
		let (lo_y, hi_y) = (self.height / 4.0, self.height * 3.0 / 4.0);

		if b.right() < lo_x {
			self.translate.x += lo_x - b.right();
		} else if b.x > hi_x {
			self.translate.x -= b.x - hi_x;
		}
		if b.bottom() < lo_y {
			self.translate.y += lo_y - b.bottom();
		} else if b.y > hi_y {
			self.translate.y -= b.y - hi_y;
		}
	}

	/// Adopt a new canvas size.
	///
	/// With `rescale` set to the `(min, max)` scale bounds, content follows the
	/// size change relative to the last rescaled size so the layout keeps its
	/// proportions; the factor is folded into `scale` rather than vertex
	/// positions. Without it only the canvas size changes.
	pub fn resize(
		&mut self,
		width: f64,
		height: f64,
		device_pixel_ratio: f64,
		rescale: Option<(f64, f64)>,
	) {
		let (layout_w, layout_h) = self.layout_size;
		let r#unsized = layout_w <= 0.0 || layout_h <= 0.0;
		match rescale {
			Some((min, max)) if !r#unsized => {
				let factor = (width / layout_w).min(height / layout_h);
				if factor.is_finite() && factor > 0.0 {
					let scale = (self.scale * factor).clamp(min, max);
					let applied = scale / self.scale;
					self.scale = scale;
					self.translate.x *= applied;
					self.translate.y *= applied;
				}
				self.layout_size = (width, height);
			}
			_ if r#unsized => self.layout_size = (width, height),
			_ => {}
		}
		self.width = width;
		self.height = height;
		self.device_pixel_ratio = device_pixel_ratio;
	}

	/// Backing store size of the canvas in device pixels.
	pub fn pixel_size(&self) -> (u32, u32) {
		(
			(self.width * self.device_pixel_ratio).floor() as u32,
			(self.height * self.device_pixel_ratio).floor() as u32,
		)
	}

	/// CSS transform equivalent to this viewport, for DOM overlays.
	pub fn css_transform(&self) -> String {
		format!(
			"translate({}px, {}px) scale({})",
			self.translate.x, self.translate.y, self.scale
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_graph_round_trip() {
		let mut vp = Viewport::new(800.0, 600.0, 1.0);
		vp.scale = 2.0;
		vp.translate = Point::new(10.0, -20.0);
		let p = Point::new(35.0, 12.5);
		let s = vp.to_screen(p);
		assert_eq!(s, Point::new(80.0, 5.0));
		assert_eq!(vp.to_graph(s), p);
	}

	#[test]
	fn zoom_keeps_anchor_fixed_and_clamps() {
		let mut vp = Viewport::new(800.0, 600.0, 1.0);
		let anchor = Point::new(200.0, 100.0);
		let before = vp.to_graph(anchor);
		assert!(vp.zoom_at(anchor, 1.5, 0.05, 5.0));
		let after = vp.to_graph(anchor);
		assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);

		for _ in 0..100 {
			vp.zoom_at(anchor, 2.0, 0.05, 5.0);
		}
		assert_eq!(vp.scale, 5.0);
		assert!(!vp.zoom_at(anchor, 2.0, 0.05, 5.0));
	}

	#[test]
	fn pan_keeps_content_near_center() {
		let mut vp = Viewport::new(800.0, 600.0, 1.0);
		let content = Rect {
			x: 300.0,
			y: 200.0,
			width: 100.0,
			height: 100.0,
		};
		vp.pan_by(-5000.0, 0.0, Some(content));
		let b = vp.screen_rect(&content);
		assert!((b.right() - 200.0).abs() < 1e-9);

		vp.pan_by(10_000.0, 10_000.0, Some(content));
		let b = vp.screen_rect(&content);
		assert!((b.x - 600.0).abs() < 1e-9);
		assert!((b.y - 450.0).abs() < 1e-9);
	}

	#[test]
	fn pan_without_content_is_free() {
		let mut vp = Viewport::new(800.0, 600.0, 1.0);
		vp.pan_by(-5000.0, 40.0, None);
		assert_eq!(vp.translate, Point::new(-5000.0, 40.0));
	}

	#[test]
	fn resize_composes_into_scale() {
		let mut vp = Viewport::new(1000.0, 800.0, 1.0);
		vp.translate = Point::new(100.0, 50.0);
		vp.resize(500.0, 800.0, 2.0, Some(BOUNDS));
		assert_eq!(vp.scale, 0.5);
		assert_eq!(vp.translate, Point::new(50.0, 25.0));
		assert_eq!(vp.pixel_size(), (1000, 1600));

		vp.resize(1000.0, 800.0, 2.0, None);
		assert_eq!(vp.scale, 0.5);
		assert_eq!(vp.width, 1000.0);
	}

	const BOUNDS: (f64, f64) = (0.05, 5.0);

	#[test]
	fn skipped_resize_does_not_move_the_reference() {
		let mut vp = Viewport::new(1200.0, 800.0, 1.0);
		vp.resize(600.0, 400.0, 1.0, None);
		assert_eq!((vp.width, vp.height), (600.0, 400.0));
		vp.resize(1200.0, 800.0, 1.0, Some(BOUNDS));
		assert_eq!(vp.scale, 1.0);
	}

	#[test]
	fn resize_respects_scale_bounds() {
		let mut vp = Viewport::new(1000.0, 1000.0, 1.0);
		vp.scale = 5.0;
		vp.translate = Point::new(10.0, 20.0);
		vp.resize(3000.0, 3000.0, 1.0, Some(BOUNDS));
		assert_eq!(vp.scale, 5.0);
		assert_eq!(vp.translate, Point::new(10.0, 20.0));

		vp.scale = 0.1;
		vp.resize(300.0, 300.0, 1.0, Some(BOUNDS));
		assert_eq!(vp.scale, 0.05);
		assert_eq!(vp.translate, Point::new(5.0, 10.0));
	}

	#[test]
	fn first_size_becomes_the_reference() {
		let mut vp = Viewport::new(0.0, 0.0, 1.0);
		vp.resize(400.0, 700.0, 1.0, None);
		vp.resize(800.0, 1400.0, 1.0, Some(BOUNDS));
		assert_eq!(vp.scale, 2.0);
	}

	#[test]
	fn css_transform_matches_numbers() {
		let mut vp = Viewport::new(800.0, 600.0, 1.0);
		vp.translate = Point::new(12.0, -3.5);
		vp.scale = 0.25;
		assert_eq!(vp.css_transform(), "translate(12px, -3.5px) scale(0.25)");
	}
}
