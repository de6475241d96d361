//! Course cards placed on the graph.
//!
//! A [`Vertex`] owns its logical position in graph space and its drag state;
//! drawing is left to the render surface. [`VertexHandle`] is the weak,
//! non-owning way to reach back into the graph that holds a vertex.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::config::LayoutConfig;
use super::edge::{Point, Rect};
use super::render::Surface;
use super::state::RequisiteGraph;
use super::types::CourseId;

/// Size of the open/delete action squares, in graph units at zoom 1.
const ACTION_SIZE: f64 = 20.0;
const ACTION_INSET: f64 = 4.0;

/// Part of a card under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardHit {
	Body,
	Open,
	Delete,
}

/// Action zones in the top-right corner of a card rectangle, `(open, delete)`.
///
/// Works for graph-space rectangles with `k = 1` and for screen rectangles
/// with the current zoom.
pub fn action_rects(card: &Rect, k: f64) -> (Rect, Rect) {
	let size = ACTION_SIZE * k;
	let inset = ACTION_INSET * k;
	let delete = Rect {
		x: card.right() - inset - size,
		y: card.y + inset,
		width: size,
		height: size,
	};
	let open = Rect {
		x: delete.x - inset - size,
		..delete
	};
	(open, delete)
}

/// A course card.
#[derive(Clone, Debug)]
pub struct Vertex {
	id: CourseId,
	pub name: String,
	pub desc: Option<String>,
	position: Point,
	/// Press offset in graph space while dragging.
	drag_offset: Option<Point>,
}

impl Vertex {
	pub fn new(id: CourseId, name: impl Into<String>, desc: Option<String>, x: f64, y: f64) -> Self {
		Self {
			id,
			name: name.into(),
			desc,
			position: Point::new(x, y),
			drag_offset: None,
		}
	}

	pub fn id(&self) -> &CourseId {
		&self.id
	}

	/// Top-left corner in graph space.
	pub fn position(&self) -> Point {
		self.position
	}

	pub fn set_position(&mut self, position: Point) {
		self.position = position;
	}

	pub fn card_rect(&self, layout: &LayoutConfig) -> Rect {
		Rect {
			x: self.position.x,
			y: self.position.y,
			width: layout.card_width,
			height: layout.card_height,
		}
	}

	/// Which part of the card a graph-space point falls on.
	pub fn hit(&self, p: Point, layout: &LayoutConfig) -> Option<CardHit> {
		let rect = self.card_rect(layout);
		if !rect.contains(p) {
			return None;
		}
		let (open, delete) = action_rects(&rect, 1.0);
		Some(if delete.contains(p) {
			CardHit::Delete
		} else if open.contains(p) {
			CardHit::Open
		} else {
			CardHit::Body
		})
	}

	pub fn is_dragging(&self) -> bool {
		self.drag_offset.is_some()
	}

	/// Record the press offset. Screen coordinates are divided by the zoom so
	/// the card tracks the pointer at any scale.
	pub fn begin_drag(&mut self, screen: Point, scale: f64) {
		self.drag_offset = Some(Point::new(
			self.position.x - screen.x / scale,
			self.position.y - screen.y / scale,
		));
	}

	/// Follow the pointer. Returns false when no drag is active.
	pub fn drag_to(&mut self, screen: Point, scale: f64) -> bool {
		let Some(offset) = self.drag_offset else {
			return false;
		};
		self.position = Point::new(screen.x / scale + offset.x, screen.y / scale + offset.y);
		true
	}

	pub fn end_drag(&mut self) {
		self.drag_offset = None;
	}
}

/// Non-owning reference to a vertex inside a shared graph.
///
/// Holding a handle never keeps the graph alive; once the graph is dropped
/// every operation becomes a no-op.
pub struct VertexHandle<S: Surface> {
	id: CourseId,
	graph: Weak<RefCell<RequisiteGraph<S>>>,
}

impl<S: Surface> VertexHandle<S> {
	pub fn new(graph: &Rc<RefCell<RequisiteGraph<S>>>, id: CourseId) -> Self {
		Self {
			id,
			graph: Rc::downgrade(graph),
		}
	}

	pub fn id(&self) -> &CourseId {
		&self.id
	}

	/// Current position, if both the graph and the vertex still exist.
	pub fn position(&self) -> Option<Point> {
		let graph = self.graph.upgrade()?;
		let graph = graph.try_borrow().ok()?;
		graph.vertex(&self.id).map(Vertex::position)
	}

	/// Cascading removal, see [`RequisiteGraph::remove`].
	pub fn remove(&self) -> bool {
		self.with_graph(|g| g.remove(&self.id))
	}

	/// Prune sibling alternatives, see [`RequisiteGraph::select`].
	pub fn select(&self) -> bool {
		self.with_graph(|g| g.select(&self.id))
	}

	fn with_graph(&self, f: impl FnOnce(&mut RequisiteGraph<S>) -> bool) -> bool {
		let Some(graph) = self.graph.upgrade() else {
			return false;
		};
		let Ok(mut graph) = graph.try_borrow_mut() else {
			return false;
		};
		f(&mut graph)
	}
}
