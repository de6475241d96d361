//! Expands a course's requisite tree into positioned vertices and edges.
//!
//! Traversal is depth-first over an explicit stack so cyclic or very deep
//! requisite data cannot exhaust the call stack. A course's depth is the
//! distance at which it was first discovered from the seed; x positions
//! spread each course's resolvable requisites around the parent's x.

use std::collections::HashSet;

use log::{debug, info};

use super::edge::Edge;
use super::render::Surface;
use super::state::RequisiteGraph;
use super::types::{CourseId, Dataset, RequisiteKind, normalize_query};
use super::vertex::Vertex;

/// Result of a user query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
	/// The course was found and its requisites were added.
	Found(CourseId),
	/// The course is already on the graph; nothing was searched.
	AlreadyPresent(CourseId),
	NotFound(CourseId),
	/// Blank query.
	Empty,
}

/// Normalize a raw query and search it unless it is already on the graph.
pub fn query<S: Surface>(graph: &mut RequisiteGraph<S>, raw: &str, dataset: &Dataset) -> SearchOutcome {
	let Some(id) = normalize_query(raw) else {
		return SearchOutcome::Empty;
	};
	if graph.contains(&id) {
		return SearchOutcome::AlreadyPresent(id);
	}
	if search(graph, id.as_str(), dataset) {
		SearchOutcome::Found(id)
	} else {
		SearchOutcome::NotFound(id)
	}
}

/// Add `code` and everything it requires to the graph.
///
/// Returns whether `code` exists in the dataset. Unknown requisites are still
/// linked by an edge but never become vertices. Redraws once when done.
pub fn search<S: Surface>(graph: &mut RequisiteGraph<S>, code: &str, dataset: &Dataset) -> bool {
	let layout = graph.layout().clone();
	let width = graph.viewport.width;
	let seed = CourseId::canonical(code);
	let x0 = width / 3.0 + graph.random_unit() * width / 3.0;

	let min_x = layout.margin;
	let max_x = (width - layout.card_width - layout.margin).max(min_x);

	let mut explored: HashSet<CourseId> = HashSet::from([seed.clone()]);
	let mut stack: Vec<(CourseId, f64, usize)> = vec![(seed.clone(), x0, 0)];
	let mut found = false;

	while let Some((code, x, depth)) = stack.pop() {
		let Some(course) = dataset.get(&code) else {
			debug!("prereq-graph: {} not in dataset", code);
			continue;
		};

		let created = graph.add_vertex(Vertex::new(
			code.clone(),
			course.name.clone(),
			course.desc.clone(),
			x,
			depth as f64 * layout.row_height() + layout.margin,
		));
		if !created {
			graph.nudge_down(&code, layout.row_height());
		}
		found = true;

		for kind in RequisiteKind::ALL {
			let Some(requisites) = course.requisites(kind) else {
				continue;
			};
			let mut sets: Vec<Vec<CourseId>> = requisites
				.iter()
				.map(|set| {
					let mut set = set.clone();
					set.sort();
					set.dedup();
					set
				})
				.collect();
			sets.sort();

			let reqlen = sets
				.iter()
				.flatten()
				.filter(|r| !explored.contains(*r) && dataset.contains(r))
				.count();
			let spacing = match kind {
				RequisiteKind::Prereq => layout.card_width + layout.gutter,
				RequisiteKind::Coreq if reqlen > 0 => (width - 2.0 * layout.margin) / reqlen as f64,
				RequisiteKind::Coreq => 0.0,
			};
			let half = (reqlen / 2) as f64;

			let mut i = 0usize;
			for set in sets {
				let color = graph.fresh_color(&code);
				for requisite in set {
					graph.add_edge(Edge::new(code.clone(), requisite.clone(), color, kind));
					if !explored.insert(requisite.clone()) || !dataset.contains(&requisite) {
						continue;
					}
					let new_x = (x + (i as f64 - half) * spacing).clamp(min_x, max_x);
					stack.push((requisite, new_x, depth + 1));
					i += 1;
				}
			}
		}
	}

	info!(
		"prereq-graph: search {} found={} ({} vertices, {} edges)",
		seed,
		found,
		graph.len(),
		graph.edge_count()
	);
	graph.draw();
	found
}

#[cfg(test)]
mod tests {
	use super::super::config::LayoutConfig;
	use super::super::render::RecordingSurface;
	use super::super::types::{CourseRecord, RequisiteExpr};
	use super::*;

	fn dataset(courses: &[(&str, &[&[&str]], &[&[&str]])]) -> Dataset {
		let mut data = Dataset::default();
		for (code, prereqs, coreqs) in courses {
			let expr = |sets: &[&[&str]]| -> Option<RequisiteExpr> {
				(!sets.is_empty()).then(|| {
					sets.iter()
						.map(|set| set.iter().map(|c| CourseId::new(*c)).collect())
						.collect()
				})
			};
			data.insert(
				&CourseId::new(*code),
				CourseRecord {
					name: code.to_string(),
					desc: None,
					prereqs: expr(prereqs),
					coreqs: expr(coreqs),
				},
			);
		}
		data
	}

	fn graph() -> RequisiteGraph<RecordingSurface> {
		RequisiteGraph::new(RecordingSurface::default(), 1200.0, 800.0, 42)
	}

	#[test]
	fn seed_lands_in_middle_third() {
		let data = dataset(&[("A 1", &[], &[])]);
		for seed in 0..20 {
			let mut g = RequisiteGraph::new(RecordingSurface::default(), 900.0, 800.0, seed);
			assert!(search(&mut g, "A 1", &data));
			let p = g.vertex(&CourseId::new("A 1")).unwrap().position();
			assert!((300.0..600.0).contains(&p.x), "x = {}", p.x);
			assert_eq!(p.y, 16.0);
		}
	}

	#[test]
	fn depth_sets_rows_and_siblings_spread() {
		let data = dataset(&[
			("ROOT 1", &[&["A 1"], &["B 1"]], &[]),
			("A 1", &[&["C 1"]], &[]),
			("B 1", &[], &[]),
			("C 1", &[], &[]),
		]);
		let mut g = graph();
		assert!(search(&mut g, "ROOT 1", &data));
		let pos = |c: &str| g.vertex(&CourseId::new(c)).unwrap().position();
		let layout = LayoutConfig::default();
		let row = |depth: f64| depth * layout.row_height() + layout.margin;
		assert_eq!(pos("ROOT 1").y, row(0.0));
		assert_eq!(pos("A 1").y, row(1.0));
		assert_eq!(pos("B 1").y, row(1.0));
		assert_eq!(pos("C 1").y, row(2.0));
		// Two siblings: offsets -1 and 0 card slots from the parent.
		assert!((pos("A 1").x - (pos("ROOT 1").x - 144.0)).abs() < 1e-9);
		assert!((pos("B 1").x - pos("ROOT 1").x).abs() < 1e-9);
		// Each OR-set gets its own color.
		let edges = g.edges_from(&CourseId::new("ROOT 1"));
		assert_eq!(edges.len(), 2);
		assert_ne!(edges[0].color, edges[1].color);
	}

	#[test]
	fn or_set_members_share_a_color() {
		let data = dataset(&[
			("ROOT 1", &[&["A 1", "B 1"]], &[]),
			("A 1", &[], &[]),
			("B 1", &[], &[]),
		]);
		let mut g = graph();
		search(&mut g, "ROOT 1", &data);
		let edges = g.edges_from(&CourseId::new("ROOT 1"));
		assert_eq!(edges.len(), 2);
		assert_eq!(edges[0].color, edges[1].color);
	}

	#[test]
	fn diamond_converges() {
		let data = dataset(&[
			("ROOT 1", &[&["A 1"], &["B 1"]], &[]),
			("A 1", &[&["C 1"]], &[]),
			("B 1", &[&["C 1"]], &[]),
			("C 1", &[], &[]),
		]);
		let mut g = graph();
		search(&mut g, "ROOT 1", &data);
		assert_eq!(g.len(), 4);
		assert_eq!(g.edge_count(), 4);
		let into_c = g.edges().filter(|e| e.v == CourseId::new("C 1")).count();
		assert_eq!(into_c, 2);
	}

	#[test]
	fn cycles_terminate() {
		let data = dataset(&[("A 1", &[&["B 1"]], &[]), ("B 1", &[&["A 1"]], &[])]);
		let mut g = graph();
		assert!(search(&mut g, "A 1", &data));
		assert_eq!(g.len(), 2);
		assert_eq!(g.edge_count(), 2);
	}

	#[test]
	fn unknown_requisites_are_linked_but_not_expanded() {
		let data = dataset(&[("ROOT 1", &[&["GONE 1", "GONE 2"]], &[])]);
		let mut g = graph();
		assert!(search(&mut g, "ROOT 1", &data));
		assert_eq!(g.len(), 1);
		// Edges survive until a draw collects them; search draws at the end.
		assert_eq!(g.edge_count(), 0);
		assert!(g.surface().edges.is_empty());
	}

	#[test]
	fn coreqs_spread_across_width_and_link_both_ways() {
		let data = dataset(&[
			("ROOT 1", &[], &[&["A 1"], &["B 1"]]),
			("A 1", &[], &[]),
			("B 1", &[], &[]),
		]);
		let mut g = graph();
		search(&mut g, "ROOT 1", &data);
		let root = CourseId::new("ROOT 1");
		for other in ["A 1", "B 1"] {
			let other = CourseId::new(other);
			assert!(g.edges_from(&root).iter().any(|e| e.v == other && e.kind == RequisiteKind::Coreq));
			assert!(g.edges_from(&other).iter().any(|e| e.v == root && e.kind == RequisiteKind::Coreq));
		}
		let a = g.vertex(&CourseId::new("A 1")).unwrap().position().x;
		let b = g.vertex(&CourseId::new("B 1")).unwrap().position().x;
		// (1200 - 32) / 2 apart unless clamped at an edge.
		let gap = (b - a).abs();
		assert!(gap <= 584.0 + 1e-9 && gap > 0.0);
	}

	#[test]
	fn query_outcomes() {
		let data = dataset(&[("CMPUT 174", &[], &[])]);
		let mut g = graph();
		assert_eq!(query(&mut g, "  ", &data), SearchOutcome::Empty);
		assert_eq!(
			query(&mut g, "xyz999", &data),
			SearchOutcome::NotFound(CourseId::new("XYZ 999"))
		);
		assert_eq!(
			query(&mut g, "cmput174", &data),
			SearchOutcome::Found(CourseId::new("CMPUT 174"))
		);
		let y = g.vertex(&CourseId::new("CMPUT 174")).unwrap().position().y;
		assert_eq!(
			query(&mut g, "CMPUT 174", &data),
			SearchOutcome::AlreadyPresent(CourseId::new("CMPUT 174"))
		);
		assert_eq!(g.vertex(&CourseId::new("CMPUT 174")).unwrap().position().y, y);
	}

	#[test]
	fn spacing_variants_share_one_vertex() {
		let data = dataset(&[("CMPUT 174", &[&["MATH 30"]], &[]), ("MATH 30", &[], &[])]);
		let mut g = graph();
		assert_eq!(
			query(&mut g, "math  30", &data),
			SearchOutcome::Found(CourseId::new("MATH 30"))
		);
		assert!(search(&mut g, "CMPUT 174", &data));
		assert!(search(&mut g, " MATH   30 ", &data));
		let ids: Vec<_> = g.vertices().map(|v| v.id().as_str().to_string()).collect();
		assert_eq!(ids, ["CMPUT 174", "MATH 30"]);
	}

		#[test]
	fn zero_width_viewport_does_not_panic() {
		let data = dataset(&[("ROOT 1", &[&["A 1"]], &[&["B 1"]]), ("A 1", &[], &[]), ("B 1", &[], &[])]);
		let mut g = RequisiteGraph::new(RecordingSurface::default(), 0.0, 0.0, 3);
		assert!(search(&mut g, "ROOT 1", &data));
		assert_eq!(g.len(), 3);
	}
}
