//! The requisite graph: vertices, the edge multimap, the viewport and redraw.
//!
//! Edges are keyed by their source course. An edge whose endpoints are not
//! both present is left in place until the next [`draw`](RequisiteGraph::draw),
//! which is the only place stale edges are collected.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{GraphConfig, LayoutConfig};
use super::edge::{Edge, Point, Rect, route};
use super::gesture::Gesture;
use super::render::{CardView, Surface};
use super::scale::ScaledValues;
use super::theme::Color;
use super::types::{CourseId, RequisiteKind};
use super::vertex::{CardHit, Vertex};
use super::viewport::Viewport;

/// Fired when the graph gains its first vertex or loses its last one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphChange {
	pub has_vertices: bool,
}

/// Interactive course-requisite graph drawing onto a [`Surface`].
pub struct RequisiteGraph<S: Surface> {
	vertices: BTreeMap<CourseId, Vertex>,
	edges: HashMap<CourseId, Vec<Edge>>,
	pub viewport: Viewport,
	pub(super) gesture: Gesture,
	pub(super) hovered: Option<CourseId>,
	pub(super) config: GraphConfig,
	rng: StdRng,
	surface: S,
	on_change: Option<Box<dyn FnMut(GraphChange)>>,
}

impl<S: Surface> RequisiteGraph<S> {
	pub fn new(surface: S, width: f64, height: f64, seed: u64) -> Self {
		Self::with_config(surface, width, height, seed, GraphConfig::default())
	}

	pub fn with_config(surface: S, width: f64, height: f64, seed: u64, config: GraphConfig) -> Self {
		Self {
			vertices: BTreeMap::new(),
			edges: HashMap::new(),
			viewport: Viewport::new(width, height, 1.0),
			gesture: Gesture::Idle,
			hovered: None,
			config,
			rng: StdRng::seed_from_u64(seed),
			surface,
			on_change: None,
		}
	}

	/// Register the `graph:change` listener.
	pub fn set_on_change(&mut self, f: impl FnMut(GraphChange) + 'static) {
		self.on_change = Some(Box::new(f));
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn surface_mut(&mut self) -> &mut S {
		&mut self.surface
	}

	pub fn layout(&self) -> &LayoutConfig {
		&self.config.layout
	}

	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	pub fn len(&self) -> usize {
		self.vertices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty()
	}

	pub fn contains(&self, id: &CourseId) -> bool {
		self.vertices.contains_key(id)
	}

	pub fn vertex(&self, id: &CourseId) -> Option<&Vertex> {
		self.vertices.get(id)
	}

	pub(super) fn vertex_mut(&mut self, id: &CourseId) -> Option<&mut Vertex> {
		self.vertices.get_mut(id)
	}

	pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
		self.vertices.values()
	}

	/// All stored edges, including stale ones not yet collected by a draw.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.values().flatten()
	}

	pub fn edges_from(&self, id: &CourseId) -> &[Edge] {
		self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn edge_count(&self) -> usize {
		self.edges.values().map(Vec::len).sum()
	}

	/// Insert a vertex unless one with the same course id exists.
	pub fn add_vertex(&mut self, vertex: Vertex) -> bool {
		if self.vertices.contains_key(vertex.id()) {
			return false;
		}
		let was_empty = self.is_empty();
		self.vertices.insert(vertex.id().clone(), vertex);
		self.notify(was_empty);
		true
	}

	/// Insert an edge; corequisites also get their reciprocal. Identical
	/// edges are stored once.
	pub fn add_edge(&mut self, edge: Edge) {
		if edge.kind == RequisiteKind::Coreq {
			self.insert_edge(edge.reciprocal());
		}
		self.insert_edge(edge);
	}

	fn insert_edge(&mut self, edge: Edge) {
		let list = self.edges.entry(edge.u.clone()).or_default();
		if !list.contains(&edge) {
			list.push(edge);
		}
	}

	/// A random light color not yet used by any edge leaving `source`, so
	/// each requisite OR-set of a course is distinguishable.
	pub fn fresh_color(&mut self, source: &CourseId) -> Color {
		loop {
			let mut channel = || ((200 + self.rng.random_range(0..255u32)) / 2) as u8;
			let color = Color::rgb(channel(), channel(), channel());
			if !self.edges_from(source).iter().any(|e| e.color == color) {
				return color;
			}
		}
	}

	/// Uniform sample in `[0, 1)`.
	pub(super) fn random_unit(&mut self) -> f64 {
		self.rng.random::<f64>()
	}

	/// Move a vertex down by `dy` graph units without touching x.
	pub(super) fn nudge_down(&mut self, id: &CourseId, dy: f64) {
		if let Some(v) = self.vertices.get_mut(id) {
			let p = v.position();
			v.set_position(Point::new(p.x, p.y + dy));
		}
	}

	/// Remove a vertex and cascade to dependents left without any satisfying
	/// link in the OR-set that required it.
	///
	/// Every incident edge is dropped. Then, for each course `s` that had an
	/// edge of color `c` into a removed vertex, `s` is removed as well when
	/// none of its remaining `c` edges reaches a present vertex.
	pub fn remove(&mut self, id: &CourseId) -> bool {
		if !self.contains(id) {
			return false;
		}
		let was_empty = self.is_empty();
		let removed = self.cascade(vec![id.clone()]);
		debug!("prereq-graph: removed {} vertices starting at {}", removed, id);
		self.notify(was_empty);
		self.draw();
		true
	}

	/// Commit to this course within every OR-set it belongs to: every other
	/// member of those sets is dropped and removed with the usual cascade.
	///
	/// Returns false when there was nothing to prune.
	pub fn select(&mut self, id: &CourseId) -> bool {
		if !self.contains(id) {
			return false;
		}

		let mut pruned: Vec<(CourseId, CourseId, Color)> = Vec::new();
		for (parent, list) in &self.edges {
			if parent == id {
				continue;
			}
			for link in list.iter().filter(|e| &e.v == id) {
				for sibling in list.iter().filter(|e| e.color == link.color && &e.v != id) {
					pruned.push((parent.clone(), sibling.v.clone(), sibling.color));
				}
			}
		}
		if pruned.is_empty() {
			return false;
		}

		for (parent, sibling, color) in &pruned {
			if let Some(list) = self.edges.get_mut(parent) {
				list.retain(|e| !(&e.v == sibling && e.color == *color));
			}
		}
		let was_empty = self.is_empty();
		let roots: Vec<CourseId> = pruned
			.into_iter()
			.map(|(_, sibling, _)| sibling)
			.filter(|s| self.contains(s))
			.collect();
		let removed = self.cascade(roots);
		debug!("prereq-graph: selecting {} removed {} vertices", id, removed);
		self.notify(was_empty);
		self.draw();
		true
	}

	/// Worklist removal. Returns the number of vertices removed.
	fn cascade(&mut self, mut worklist: Vec<CourseId>) -> usize {
		let mut removed = 0;
		while let Some(current) = worklist.pop() {
			if self.vertices.remove(&current).is_none() {
				continue;
			}
			removed += 1;
			if self.gesture.dragged_vertex() == Some(&current) {
				self.gesture = Gesture::Idle;
			}
			if self.hovered.as_ref() == Some(&current) {
				self.hovered = None;
			}

			let mut dependents: Vec<(CourseId, Color)> = Vec::new();
			for (source, list) in &self.edges {
				if source == &current {
					continue;
				}
				for e in list.iter().filter(|e| e.v == current) {
					let entry = (source.clone(), e.color);
					if !dependents.contains(&entry) {
						dependents.push(entry);
					}
				}
			}

			self.edges.remove(&current);
			for list in self.edges.values_mut() {
				list.retain(|e| e.v != current);
			}
			self.edges.retain(|_, list| !list.is_empty());

			for (source, color) in dependents {
				if !self.vertices.contains_key(&source) {
					continue;
				}
				let satisfied = self
					.edges_from(&source)
					.iter()
					.any(|e| e.color == color && self.vertices.contains_key(&e.v));
				if !satisfied {
					worklist.push(source);
				}
			}
		}
		removed
	}

	/// Remove every vertex and edge without cascading.
	pub fn clear(&mut self) {
		let was_empty = self.is_empty();
		self.vertices.clear();
		self.edges.clear();
		self.gesture = Gesture::Idle;
		self.hovered = None;
		self.notify(was_empty);
		self.draw();
	}

	fn notify(&mut self, was_empty: bool) {
		let has_vertices = !self.is_empty();
		if was_empty == has_vertices {
			if let Some(f) = self.on_change.as_mut() {
				f(GraphChange { has_vertices });
			}
		}
	}

	/// Graph-space bounding box of all cards.
	pub fn content_bounds(&self) -> Option<Rect> {
		self.vertices
			.values()
			.map(|v| v.card_rect(&self.config.layout))
			.reduce(|a, b| a.union(&b))
	}

	/// Topmost card under a screen-space point.
	pub fn vertex_at(&self, screen: Point) -> Option<(CourseId, CardHit)> {
		let p = self.viewport.to_graph(screen);
		self.vertices
			.values()
			.rev()
			.find_map(|v| v.hit(p, &self.config.layout).map(|hit| (v.id().clone(), hit)))
	}

	/// Adopt a new canvas size. Content is rescaled only on wide viewports.
	pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
		let g = &self.config.gesture;
		let rescale = (width >= g.min_resize_width).then_some((g.min_scale, g.max_scale));
		self.viewport.resize(width, height, device_pixel_ratio, rescale);
		self.surface.resize(&self.viewport);
		self.draw();
	}

	/// Drop stale edges, then repaint every edge and card.
	pub fn draw(&mut self) {
		self.collect_stale_edges();

		let scaled = ScaledValues::new(&self.config.scale, self.viewport.scale);
		let layout = &self.config.layout;
		let viewport = &self.viewport;
		let screen_rect = |v: &Vertex| viewport.screen_rect(&v.card_rect(layout));

		self.surface.clear(viewport);
		for list in self.edges.values() {
			for edge in list {
				if edge.kind == RequisiteKind::Coreq && edge.u > edge.v {
					let reciprocal = edge.reciprocal();
					if self.edges.get(&edge.v).is_some_and(|l| l.contains(&reciprocal)) {
						continue;
					}
				}
				let (Some(u), Some(v)) = (self.vertices.get(&edge.u), self.vertices.get(&edge.v)) else {
					continue;
				};
				self.surface
					.draw_edge(&route(edge, &screen_rect(u), &screen_rect(v), &scaled));
			}
		}
		for vertex in self.vertices.values() {
			let raised = vertex.is_dragging() || self.hovered.as_ref() == Some(vertex.id());
			self.surface.draw_card(&CardView {
				id: vertex.id(),
				name: &vertex.name,
				rect: screen_rect(vertex),
				raised,
				scale: &scaled,
			});
		}
	}

	fn collect_stale_edges(&mut self) {
		let vertices = &self.vertices;
		self.edges.retain(|_, list| {
			list.retain(|e| vertices.contains_key(&e.u) && vertices.contains_key(&e.v));
			!list.is_empty()
		});
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::super::render::RecordingSurface;
	use super::*;

	fn graph() -> RequisiteGraph<RecordingSurface> {
		RequisiteGraph::new(RecordingSurface::default(), 1200.0, 800.0, 7)
	}

	fn id(code: &str) -> CourseId {
		CourseId::new(code)
	}

	fn add(g: &mut RequisiteGraph<RecordingSurface>, code: &str, x: f64, y: f64) {
		g.add_vertex(Vertex::new(id(code), code, None, x, y));
	}

	fn link(g: &mut RequisiteGraph<RecordingSurface>, u: &str, v: &str, color: Color, kind: RequisiteKind) {
		g.add_edge(Edge::new(id(u), id(v), color, kind));
	}

	const RED: Color = Color::rgb(200, 100, 100);
	const BLUE: Color = Color::rgb(100, 100, 200);

	#[test]
	fn duplicate_vertices_are_rejected() {
		let mut g = graph();
		assert!(g.add_vertex(Vertex::new(id("CMPUT 174"), "Intro", None, 0.0, 0.0)));
		assert!(!g.add_vertex(Vertex::new(id("CMPUT 174"), "Other", None, 50.0, 50.0)));
		assert_eq!(g.len(), 1);
		assert_eq!(g.vertex(&id("CMPUT 174")).unwrap().name, "Intro");
	}

	#[test]
	fn coreq_edges_are_reciprocal_and_deduplicated() {
		let mut g = graph();
		link(&mut g, "A 1", "B 1", RED, RequisiteKind::Coreq);
		link(&mut g, "A 1", "B 1", RED, RequisiteKind::Coreq);
		assert_eq!(g.edge_count(), 2);
		assert!(g.edges_from(&id("B 1")).iter().any(|e| e.v == id("A 1") && e.kind == RequisiteKind::Coreq));
	}

	#[test]
	fn stale_edges_are_only_collected_by_draw() {
		let mut g = graph();
		add(&mut g, "A 1", 0.0, 0.0);
		link(&mut g, "A 1", "MISSING 1", RED, RequisiteKind::Prereq);
		assert_eq!(g.edge_count(), 1);
		g.draw();
		assert_eq!(g.edge_count(), 0);
		assert!(g.surface().edges.is_empty());
	}

	#[test]
	fn reciprocal_coreq_is_stroked_once() {
		let mut g = graph();
		add(&mut g, "A 1", 0.0, 0.0);
		add(&mut g, "B 1", 300.0, 0.0);
		link(&mut g, "A 1", "B 1", RED, RequisiteKind::Coreq);
		g.draw();
		assert_eq!(g.edge_count(), 2);
		assert_eq!(g.surface().edges.len(), 1);
		assert_eq!(g.surface().edges[0].arrowheads.len(), 2);
		assert_eq!(g.surface().cards.len(), 2);
	}

	#[test]
	fn removing_sole_requisite_cascades_to_dependent() {
		// C needs A; D needs (A or B).
		let mut g = graph();
		for code in ["A 1", "B 1", "C 1", "D 1"] {
			add(&mut g, code, 0.0, 0.0);
		}
		link(&mut g, "C 1", "A 1", RED, RequisiteKind::Prereq);
		link(&mut g, "D 1", "A 1", BLUE, RequisiteKind::Prereq);
		link(&mut g, "D 1", "B 1", BLUE, RequisiteKind::Prereq);

		let before = g.len() + g.edge_count();
		assert!(g.remove(&id("A 1")));
		assert!(!g.contains(&id("A 1")));
		assert!(!g.contains(&id("C 1")));
		assert!(g.contains(&id("D 1")));
		assert!(g.contains(&id("B 1")));
		assert!(g.len() + g.edge_count() < before);
		assert!(g.edges().all(|e| !e.touches(&id("A 1"))));
	}

	#[test]
	fn cascade_is_scoped_to_the_or_set() {
		// E needs A (red) and B (blue). Removing A orphans the red set even
		// though a blue edge remains.
		let mut g = graph();
		for code in ["A 1", "B 1", "E 1"] {
			add(&mut g, code, 0.0, 0.0);
		}
		link(&mut g, "E 1", "A 1", RED, RequisiteKind::Prereq);
		link(&mut g, "E 1", "B 1", BLUE, RequisiteKind::Prereq);
		g.remove(&id("A 1"));
		assert!(!g.contains(&id("E 1")));
		assert!(g.contains(&id("B 1")));
	}

	#[test]
	fn cascade_terminates_on_cycles() {
		let mut g = graph();
		for code in ["A 1", "B 1", "C 1"] {
			add(&mut g, code, 0.0, 0.0);
		}
		link(&mut g, "A 1", "B 1", RED, RequisiteKind::Prereq);
		link(&mut g, "B 1", "C 1", RED, RequisiteKind::Prereq);
		link(&mut g, "C 1", "A 1", RED, RequisiteKind::Prereq);
		assert!(g.remove(&id("B 1")));
		assert!(g.is_empty());
		assert_eq!(g.edge_count(), 0);
		assert!(!g.remove(&id("B 1")));
	}

	#[test]
	fn select_prunes_alternatives_and_is_idempotent() {
		let mut g = graph();
		for code in ["P 1", "A 1", "B 1", "C 1", "X 1"] {
			add(&mut g, code, 0.0, 0.0);
		}
		link(&mut g, "P 1", "A 1", RED, RequisiteKind::Prereq);
		link(&mut g, "P 1", "B 1", RED, RequisiteKind::Prereq);
		link(&mut g, "P 1", "C 1", RED, RequisiteKind::Prereq);
		link(&mut g, "P 1", "X 1", BLUE, RequisiteKind::Prereq);

		assert!(g.select(&id("A 1")));
		assert!(g.contains(&id("P 1")));
		assert!(g.contains(&id("A 1")));
		assert!(g.contains(&id("X 1")));
		assert!(!g.contains(&id("B 1")));
		assert!(!g.contains(&id("C 1")));
		assert_eq!(g.edges_from(&id("P 1")).len(), 2);

		let snapshot = (g.len(), g.edge_count());
		assert!(!g.select(&id("A 1")));
		assert_eq!((g.len(), g.edge_count()), snapshot);
	}

	#[test]
	fn change_events_fire_on_empty_transitions_only() {
		let events = Rc::new(RefCell::new(Vec::new()));
		let mut g = graph();
		let sink = events.clone();
		g.set_on_change(move |change| sink.borrow_mut().push(change.has_vertices));

		add(&mut g, "A 1", 0.0, 0.0);
		add(&mut g, "B 1", 0.0, 0.0);
		g.remove(&id("A 1"));
		g.clear();
		g.clear();
		assert_eq!(*events.borrow(), vec![true, false]);
	}

	#[test]
	fn clear_is_bulk() {
		let mut g = graph();
		add(&mut g, "A 1", 0.0, 0.0);
		add(&mut g, "B 1", 0.0, 0.0);
		link(&mut g, "A 1", "B 1", RED, RequisiteKind::Prereq);
		g.clear();
		assert!(g.is_empty());
		assert_eq!(g.edge_count(), 0);
	}

	#[test]
	fn fresh_colors_differ_per_source() {
		let mut g = graph();
		let a = g.fresh_color(&id("A 1"));
		link(&mut g, "A 1", "B 1", a, RequisiteKind::Prereq);
		for _ in 0..50 {
			let c = g.fresh_color(&id("A 1"));
			assert_ne!(c, a);
			assert!(c.r >= 100 && c.g >= 100 && c.b >= 100);
		}
	}

	#[test]
	fn vertex_at_respects_viewport() {
		let mut g = graph();
		add(&mut g, "A 1", 100.0, 100.0);
		assert_eq!(g.vertex_at(Point::new(110.0, 150.0)), Some((id("A 1"), CardHit::Body)));
		g.viewport.scale = 2.0;
		assert_eq!(g.vertex_at(Point::new(110.0, 150.0)), None);
		assert_eq!(g.vertex_at(Point::new(210.0, 250.0)), Some((id("A 1"), CardHit::Body)));
	}

	#[test]
	fn content_bounds_cover_all_cards() {
		let mut g = graph();
		assert!(g.content_bounds().is_none());
		add(&mut g, "A 1", 0.0, 0.0);
		add(&mut g, "B 1", 200.0, 100.0);
		let b = g.content_bounds().unwrap();
		assert_eq!((b.x, b.y, b.right(), b.bottom()), (0.0, 0.0, 328.0, 172.0));
	}

	#[test]
	fn narrow_resize_keeps_scale() {
		let mut g = graph();
		g.resize(600.0, 800.0, 2.0);
		assert_eq!(g.viewport.scale, 1.0);
		assert_eq!(g.surface().resizes, 1);
		g.resize(1200.0, 800.0, 1.0);
		assert_eq!(g.viewport.scale, 1.0);
		g.resize(2400.0, 1600.0, 1.0);
		assert_eq!(g.viewport.scale, 2.0);
	}

	#[test]
	fn narrow_then_wide_resize_restores_layout() {
		let mut g = graph();
		g.resize(600.0, 400.0, 1.0);
		assert_eq!(g.viewport.scale, 1.0);
		g.resize(1200.0, 800.0, 1.0);
		assert_eq!(g.viewport.scale, 1.0);
		assert_eq!(g.viewport.translate, Point::default());
	}

	#[test]
	fn resize_stays_within_zoom_bounds() {
		let mut g = graph();
		g.viewport.scale = 5.0;
		g.resize(3600.0, 2400.0, 1.0);
		assert_eq!(g.viewport.scale, 5.0);
	}
}
