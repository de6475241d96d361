//! Layout and interaction tuning.

use super::scale::ScaleConfig;

/// Card geometry and spacing used by the traversal layout, in graph units.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	pub card_width: f64,
	pub card_height: f64,
	/// Space kept around cards and at the viewport edges.
	pub margin: f64,
	/// Horizontal space between sibling prerequisite cards.
	pub gutter: f64,
}

impl LayoutConfig {
	/// Vertical distance between successive traversal depths.
	pub fn row_height(&self) -> f64 {
		self.card_height + 2.0 * self.margin
	}
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			card_width: 128.0,
			card_height: 72.0,
			margin: 16.0,
			gutter: 16.0,
		}
	}
}

/// Pan and zoom response.
#[derive(Clone, Debug)]
pub struct GestureConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Zoom factor per wheel notch towards the user (`deltaY < 0`).
	pub wheel_zoom_in: f64,
	/// Zoom factor per wheel notch away from the user.
	pub wheel_zoom_out: f64,
	/// Divides the relative pinch distance change; larger is less sensitive.
	pub pinch_damping: f64,
	/// Mouse pans by this fraction of the offset from the press point on
	/// every move. Touch pans 1:1.
	pub mouse_pan_damping: f64,
	/// Below this viewport width (CSS px) a resize does not rescale content.
	pub min_resize_width: f64,
}

impl Default for GestureConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.05,
			max_scale: 5.0,
			wheel_zoom_in: 1.1,
			wheel_zoom_out: 0.9,
			pinch_damping: 10.0,
			mouse_pan_damping: 0.05,
			min_resize_width: 840.0,
		}
	}
}

/// Everything a [`RequisiteGraph`](super::state::RequisiteGraph) can be tuned with.
#[derive(Clone, Debug, Default)]
pub struct GraphConfig {
	pub layout: LayoutConfig,
	pub gesture: GestureConfig,
	pub scale: ScaleConfig,
}
