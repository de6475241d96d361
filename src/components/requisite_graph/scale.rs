//! Zoom-dependent sizing for edges, arrowheads and card labels.
//!
//! Cards and edges are drawn in screen space from rectangles that already
//! include the viewport transform, so anything that should track the cards
//! when zooming has to be multiplied by the zoom level `k`.
//!
//! # Scaling Behaviors
//!
//! - [`ScaleBehavior::World`]: Scales with zoom, like the cards themselves.
//! - [`ScaleBehavior::Screen`]: Constant pixel size regardless of zoom.
//! - [`ScaleBehavior::Clamped`]: Scales with zoom but stays within min/max
//!   screen sizes.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "Screen variant completes the API for users customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	/// Tracks the zoom level.
	World,
	/// Constant screen-space size (pixels).
	Screen,
	/// Tracks zoom, clamped to `(min_screen, max_screen)` pixels.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Screen-space value for a base size at zoom level `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base * k,
			ScaleBehavior::Screen => base,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => (base * k).clamp(*min_screen, *max_screen),
		}
	}
}

/// Configuration for edge strokes and routing.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Stroke width at zoom 1.
	pub line_width: f64,
	pub line_behavior: ScaleBehavior,
	/// Arrowhead barb length at zoom 1.
	pub arrow_length: f64,
	pub arrow_behavior: ScaleBehavior,
	/// Prerequisite edges closer than this horizontally are drawn straight.
	pub straight_threshold: f64,
	/// Vertical offset of Bezier control points, one card height.
	pub curve_offset: f64,
}

/// Configuration for card label text.
#[derive(Clone, Debug)]
pub struct LabelScaleConfig {
	/// Course code font size at zoom 1.
	pub title_size: f64,
	/// Course name font size at zoom 1.
	pub subtitle_size: f64,
	/// Labels smaller than this many pixels are not drawn.
	pub min_visible: f64,
}

/// Complete scale configuration.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub edge: EdgeScaleConfig,
	pub label: LabelScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			edge: EdgeScaleConfig {
				line_width: 1.0,
				line_behavior: ScaleBehavior::World,
				arrow_length: 10.0,
				arrow_behavior: ScaleBehavior::World,
				straight_threshold: 32.0,
				curve_offset: 72.0,
			},
			label: LabelScaleConfig {
				title_size: 16.0,
				subtitle_size: 12.0,
				min_visible: 4.0,
			},
		}
	}
}

/// Pre-computed sizes for a specific zoom level.
///
/// Create this once per draw pass and pass it to routing and card drawing.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	pub line_width: f64,
	pub arrow_length: f64,
	pub straight_threshold: f64,
	pub curve_offset: f64,
	/// Title font, `None` when too small to read.
	pub title_font: Option<String>,
	/// Subtitle font, `None` when too small to read.
	pub subtitle_font: Option<String>,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let font = |size: f64| {
			let px = size * k;
			(px >= config.label.min_visible).then(|| format!("{}px sans-serif", px))
		};

		Self {
			k,
			line_width: config.edge.line_behavior.apply(config.edge.line_width, k),
			arrow_length: config.edge.arrow_behavior.apply(config.edge.arrow_length, k),
			straight_threshold: config.edge.straight_threshold * k,
			curve_offset: config.edge.curve_offset * k,
			title_font: font(config.label.title_size),
			subtitle_font: font(config.label.subtitle_size),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn behaviors() {
		assert_eq!(ScaleBehavior::World.apply(10.0, 0.5), 5.0);
		assert_eq!(ScaleBehavior::Screen.apply(10.0, 0.5), 10.0);
		let clamped = ScaleBehavior::Clamped {
			min_screen: 2.0,
			max_screen: 8.0,
		};
		assert_eq!(clamped.apply(10.0, 0.1), 2.0);
		assert_eq!(clamped.apply(10.0, 5.0), 8.0);
	}

	#[test]
	fn labels_disappear_when_zoomed_far_out() {
		let config = ScaleConfig::default();
		let near = ScaledValues::new(&config, 1.0);
		assert_eq!(near.title_font.as_deref(), Some("16px sans-serif"));
		let far = ScaledValues::new(&config, 0.05);
		assert!(far.title_font.is_none());
		assert!(far.subtitle_font.is_none());
		assert!((far.arrow_length - 0.5).abs() < 1e-9);
	}
}
