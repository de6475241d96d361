//! Pointer, touch and wheel handling for the graph.
//!
//! The graph is in exactly one [`Gesture`] at a time, so background panning,
//! pinch zoom and card dragging can never overlap. Inputs arrive as
//! [`PointerInput`] values from whatever event source owns the canvas, which
//! keeps the state machine independent of the browser.

use log::debug;

use super::edge::Point;
use super::render::Surface;
use super::state::RequisiteGraph;
use super::types::CourseId;
use super::vertex::CardHit;

/// Which device started a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
	Mouse,
	Touch,
}

/// Current interaction mode.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
	Idle,
	/// Dragging the empty canvas. `anchor` is the press point for the mouse
	/// and the last sample for touch.
	PanningBackground { pointer: PointerKind, anchor: Point },
	/// A card is following the pointer.
	DraggingVertex { id: CourseId, pointer: PointerKind },
	/// Two-finger zoom; distance sampled when the second finger landed.
	Pinching { start_distance: f64 },
}

impl Gesture {
	pub fn dragged_vertex(&self) -> Option<&CourseId> {
		match self {
			Gesture::DraggingVertex { id, .. } => Some(id),
			_ => None,
		}
	}

	fn pointer(&self) -> Option<PointerKind> {
		match self {
			Gesture::PanningBackground { pointer, .. } | Gesture::DraggingVertex { pointer, .. } => {
				Some(*pointer)
			}
			Gesture::Pinching { .. } => Some(PointerKind::Touch),
			Gesture::Idle => None,
		}
	}
}

/// Input events in canvas-relative CSS pixels. Touch variants carry every
/// touch point still on the surface.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
	MouseDown(Point),
	MouseMove(Point),
	MouseUp,
	MouseLeave,
	DoubleClick(Point),
	TouchStart(Vec<Point>),
	TouchMove(Vec<Point>),
	TouchEnd(Vec<Point>),
	Wheel { at: Point, delta_y: f64 },
}

/// Card actions the host has to carry out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardAction {
	Open(CourseId),
	Delete(CourseId),
	Select(CourseId),
}

impl<S: Surface> RequisiteGraph<S> {
	/// Feed one input event through the gesture state machine. Redraws when
	/// anything visible changed.
	pub fn handle_input(&mut self, input: PointerInput) -> Option<CardAction> {
		match input {
			PointerInput::MouseDown(p) => {
				if self.gesture != Gesture::Idle {
					return None;
				}
				self.press(p, PointerKind::Mouse)
			}
			PointerInput::MouseMove(p) => {
				match self.gesture.pointer() {
					Some(PointerKind::Mouse) => self.track(p, PointerKind::Mouse),
					None => self.hover(p),
					Some(PointerKind::Touch) => {}
				}
				None
			}
			PointerInput::MouseUp => {
				if self.gesture.pointer() == Some(PointerKind::Mouse) {
					self.release();
				}
				None
			}
			PointerInput::MouseLeave => {
				if self.gesture.pointer() == Some(PointerKind::Mouse) {
					self.release();
				}
				if self.hovered.take().is_some() {
					self.draw();
				}
				None
			}
			PointerInput::DoubleClick(p) => match self.vertex_at(p) {
				Some((id, CardHit::Body)) => Some(CardAction::Select(id)),
				_ => None,
			},
			PointerInput::TouchStart(points) => self.touch_start(&points),
			PointerInput::TouchMove(points) => {
				self.touch_move(&points);
				None
			}
			PointerInput::TouchEnd(remaining) => {
				self.touch_end(&remaining);
				None
			}
			PointerInput::Wheel { at, delta_y } => {
				// A drag offset is only valid for the scale it was taken at.
				if delta_y != 0.0 && self.gesture.dragged_vertex().is_none() {
					let g = &self.config.gesture;
					let factor = if delta_y < 0.0 {
						g.wheel_zoom_in
					} else {
						g.wheel_zoom_out
					};
					self.zoom(at, factor);
				}
				None
			}
		}
	}

	/// Multiply the zoom around a screen point, within the configured bounds.
	pub fn zoom(&mut self, at: Point, factor: f64) {
		let (min, max) = (self.config.gesture.min_scale, self.config.gesture.max_scale);
		if self.viewport.zoom_at(at, factor, min, max) {
			self.draw();
		}
	}

	fn press(&mut self, p: Point, pointer: PointerKind) -> Option<CardAction> {
		match self.vertex_at(p) {
			Some((id, CardHit::Open)) => Some(CardAction::Open(id)),
			Some((id, CardHit::Delete)) => Some(CardAction::Delete(id)),
			Some((id, CardHit::Body)) => {
				let scale = self.viewport.scale;
				if let Some(v) = self.vertex_mut(&id) {
					v.begin_drag(p, scale);
				}
				debug!("prereq-graph: dragging {}", id);
				self.gesture = Gesture::DraggingVertex { id, pointer };
				self.draw();
				None
			}
			None => {
				self.gesture = Gesture::PanningBackground { pointer, anchor: p };
				None
			}
		}
	}

	/// Pointer moved while a single-pointer gesture is active.
	fn track(&mut self, p: Point, pointer: PointerKind) {
		match self.gesture.clone() {
			Gesture::DraggingVertex { id, .. } => {
				let scale = self.viewport.scale;
				let moved = self.vertex_mut(&id).is_some_and(|v| v.drag_to(p, scale));
				if moved {
					self.draw();
				}
			}
			Gesture::PanningBackground { anchor, .. } => {
				let (dx, dy) = match pointer {
					PointerKind::Mouse => {
						let damping = self.config.gesture.mouse_pan_damping;
						((p.x - anchor.x) * damping, (p.y - anchor.y) * damping)
					}
					PointerKind::Touch => {
						self.gesture = Gesture::PanningBackground { pointer, anchor: p };
						(p.x - anchor.x, p.y - anchor.y)
					}
				};
				let content = self.content_bounds();
				self.viewport.pan_by(dx, dy, content);
				self.draw();
			}
			Gesture::Idle | Gesture::Pinching { .. } => {}
		}
	}

	fn hover(&mut self, p: Point) {
		let hovered = self.vertex_at(p).map(|(id, _)| id);
		if hovered != self.hovered {
			self.hovered = hovered;
			self.draw();
		}
	}

	/// Return to idle, ending any card drag.
	fn release(&mut self) {
		let previous = std::mem::replace(&mut self.gesture, Gesture::Idle);
		if let Gesture::DraggingVertex { id, .. } = previous {
			if let Some(v) = self.vertex_mut(&id) {
				v.end_drag();
			}
			self.draw();
		}
	}

	fn touch_start(&mut self, points: &[Point]) -> Option<CardAction> {
		let idle = self.gesture == Gesture::Idle;
		let panning = matches!(self.gesture, Gesture::PanningBackground { .. });
		match points {
			[p] if idle => self.press(*p, PointerKind::Touch),
			[a, b, ..] if idle || panning => {
				self.gesture = Gesture::Pinching {
					start_distance: a.distance(*b).max(1.0),
				};
				None
			}
			// A second finger during a card drag is ignored.
			_ => None,
		}
	}

	fn touch_move(&mut self, points: &[Point]) {
		match self.gesture {
			Gesture::Pinching { start_distance } => {
				if let [a, b, ..] = points {
					let ratio = a.distance(*b) / start_distance;
					let factor = (ratio - 1.0) / self.config.gesture.pinch_damping + 1.0;
					if factor > 0.0 {
						self.zoom(a.midpoint(*b), factor);
					}
				}
			}
			_ if self.gesture.pointer() == Some(PointerKind::Touch) => {
				if let Some(p) = points.first() {
					self.track(*p, PointerKind::Touch);
				}
			}
			_ => {}
		}
	}

	/// A single-finger drag or pan ends as soon as any finger lifts, since the
	/// remaining touches are not the one that started it.
	fn touch_end(&mut self, remaining: &[Point]) {
		match self.gesture {
			Gesture::Pinching { .. } if remaining.len() < 2 => self.release(),
			Gesture::Pinching { .. } => {}
			_ if self.gesture.pointer() == Some(PointerKind::Touch) => self.release(),
			_ => {}
		}
	}
}
