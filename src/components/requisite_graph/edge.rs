//! Requisite edges and their screen-space routing.
//!
//! An [`Edge`] points from a dependent course to one of its requisites. All
//! members of one requisite OR-set share a color, which is how the cascade
//! logic in the graph knows which links satisfy the same requirement.
//!
//! [`route`] turns an edge plus the two cards' screen rectangles into an
//! [`EdgePath`]: a straight line or cubic Bezier with arrowheads.

use std::f64::consts::FRAC_PI_6;

use super::scale::ScaledValues;
use super::theme::Color;
use super::types::{CourseId, RequisiteKind};

/// Directed, colored requisite link `u -> v`.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Dependent course.
	pub u: CourseId,
	/// Requisite course.
	pub v: CourseId,
	pub color: Color,
	pub kind: RequisiteKind,
}

impl Edge {
	pub fn new(u: CourseId, v: CourseId, color: Color, kind: RequisiteKind) -> Self {
		Self { u, v, color, kind }
	}

	/// The `v -> u` edge inserted alongside every corequisite edge.
	pub fn reciprocal(&self) -> Self {
		Self {
			u: self.v.clone(),
			v: self.u.clone(),
			color: self.color,
			kind: self.kind,
		}
	}

	pub fn touches(&self, id: &CourseId) -> bool {
		&self.u == id || &self.v == id
	}
}

/// A point in screen or graph space, depending on context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
	}

	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
	}

	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}

	pub fn center_x(&self) -> f64 {
		self.x + self.width / 2.0
	}

	pub fn center_y(&self) -> f64 {
		self.y + self.height / 2.0
	}

	/// Smallest rectangle covering both.
	pub fn union(&self, other: &Rect) -> Rect {
		let x = self.x.min(other.x);
		let y = self.y.min(other.y);
		Rect {
			x,
			y,
			width: self.right().max(other.right()) - x,
			height: self.bottom().max(other.bottom()) - y,
		}
	}
}

/// Stroke geometry of one edge.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
	Line {
		from: Point,
		to: Point,
	},
	Bezier {
		from: Point,
		c1: Point,
		c2: Point,
		to: Point,
	},
}

/// Two barbs meeting at `tip`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrowhead {
	pub tip: Point,
	pub left: Point,
	pub right: Point,
}

impl Arrowhead {
	/// Barbs pointing back along `angle` from `tip`. `sign` is -1 for an
	/// arrow at the end of a segment and +1 for one at its start.
	fn at(tip: Point, angle: f64, length: f64, sign: f64) -> Self {
		let barb = |a: f64| Point::new(tip.x + sign * length * a.cos(), tip.y + sign * length * a.sin());
		Self {
			tip,
			left: barb(angle - FRAC_PI_6),
			right: barb(angle + FRAC_PI_6),
		}
	}
}

/// Everything the renderer needs to stroke an edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgePath {
	pub segment: Segment,
	pub arrowheads: Vec<Arrowhead>,
	pub line_width: f64,
	pub color: Color,
}

/// Route an edge between two rendered cards.
///
/// Prerequisites run from the bottom-center of `from` to the top-center of
/// `to`, bending into an S-curve when the cards are horizontally apart.
/// Corequisites join the facing sides at mid-height with arrowheads on both
/// ends.
pub fn route(edge: &Edge, from: &Rect, to: &Rect, scale: &ScaledValues) -> EdgePath {
	let (segment, arrowheads) = match edge.kind {
		RequisiteKind::Prereq => {
			let start = Point::new(from.center_x(), from.bottom());
			let end = Point::new(to.center_x(), to.y);
			let angle = std::f64::consts::FRAC_PI_2;
			let segment = if (end.x - start.x).abs() < scale.straight_threshold {
				Segment::Line {
					from: start,
					to: end,
				}
			} else {
				Segment::Bezier {
					from: start,
					c1: Point::new(start.x, start.y + scale.curve_offset),
					c2: Point::new(end.x, end.y - scale.curve_offset),
					to: end,
				}
			};
			(segment, vec![Arrowhead::at(end, angle, scale.arrow_length, -1.0)])
		}
		RequisiteKind::Coreq => {
			let (mut x1, mut x2) = (from.x, to.x);
			if x1 < x2 {
				x1 = from.right();
			} else {
				x2 = to.right();
			}
			let start = Point::new(x1, from.center_y());
			let end = Point::new(x2, to.center_y());
			let angle = (end.y - start.y).atan2(end.x - start.x);
			(
				Segment::Line {
					from: start,
					to: end,
				},
				vec![
					Arrowhead::at(start, angle, scale.arrow_length, 1.0),
					Arrowhead::at(end, angle, scale.arrow_length, -1.0),
				],
			)
		}
	};

	EdgePath {
		segment,
		arrowheads,
		line_width: scale.line_width,
		color: edge.color,
	}
}
