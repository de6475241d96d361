//! prereq-graph: Interactive course requisite graph.
//!
//! This crate provides a WASM-based component that lays out a course and
//! everything it transitively requires as cards on a canvas, with pan, zoom,
//! pinch and card dragging.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::requisite_graph::{
	CourseId, Dataset, RequisiteGraph, RequisiteGraphCanvas, SearchOutcome, query, search,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("prereq-graph: logging initialized");
}

/// Load course data from a script element with id="course-data".
/// Expected format: `{ DEPT: { NUMBER: course } }`, optionally wrapped as
/// `{ name, courses }`.
fn load_dataset() -> Option<Dataset> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("course-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match Dataset::from_json(&json_text) {
		Ok(data) => {
			info!("prereq-graph: loaded {} courses", data.len());
			Some(data)
		}
		Err(e) => {
			warn!("prereq-graph: failed to load course data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads course data from the DOM and renders the requisite graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let dataset = load_dataset().unwrap_or_default();
	let dataset_signal = Signal::derive(move || dataset.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Course Requisite Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<RequisiteGraphCanvas dataset=dataset_signal />
			<div class="graph-overlay">
				<h1>"Course Requisites"</h1>
				<p class="subtitle">"Search a course to see what it requires. Double-click a card to pick it among alternatives."</p>
			</div>
		</div>
	}
}
