//! Leptos component wrapping the requisite graph canvas.
//!
//! The component owns the shared [`RequisiteGraph`] and translates DOM mouse,
//! touch and wheel events into [`PointerInput`]s. There is no animation loop:
//! the graph redraws itself whenever it changes. Card actions returned by the
//! gesture machine are carried out here, after the graph borrow is released.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, TouchEvent, TouchList, WheelEvent,
	Window,
};

use super::edge::Point;
use super::gesture::{CardAction, Gesture, PointerInput};
use super::render::CanvasSurface;
use super::search::{SearchOutcome, query};
use super::state::RequisiteGraph;
use super::types::Dataset;
use super::vertex::VertexHandle;

type SharedGraph = Rc<RefCell<RequisiteGraph<CanvasSurface>>>;

const DEFAULT_CATALOGUE_URL: &str = "https://apps.ualberta.ca/catalogue/course";

/// Renders the requisite graph on a full-window canvas with a search bar.
///
/// Typing a course code and pressing enter adds the course and everything it
/// requires. Cards link to `catalogue_url/<DEPT>/<NUMBER>`.
#[component]
pub fn RequisiteGraphCanvas(
	#[prop(into)] dataset: Signal<Dataset>,
	#[prop(into, default = DEFAULT_CATALOGUE_URL.to_string())] catalogue_url: String,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let input_ref = NodeRef::<leptos::html::Input>::new();
	let (has_vertices, set_has_vertices) = signal(false);
	let (status, set_status) = signal(None::<&'static str>);
	let (dark, set_dark) = signal(false);

	let graph: SharedGraph = Rc::new(RefCell::new(RequisiteGraph::new(
		CanvasSurface::default(),
		0.0,
		0.0,
		js_sys::Date::now() as u64,
	)));
	graph
		.borrow_mut()
		.set_on_change(move |change| set_has_vertices.set(change.has_vertices));

	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (graph_init, resize_cb_init) = (graph.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			return;
		};

		if let Ok(mut g) = graph_init.try_borrow_mut() {
			g.surface_mut().attach(canvas, ctx);
			let (w, h) = window_size(&window);
			g.resize(w, h, window.device_pixel_ratio());
		}

		let graph_resize = graph_init.clone();
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (w, h) = window_size(&win);
			if let Ok(mut g) = graph_resize.try_borrow_mut() {
				g.resize(w, h, win.device_pixel_ratio());
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	let dispatch = {
		let graph = graph.clone();
		let catalogue_url = catalogue_url.clone();
		move |input: PointerInput| {
			let Some(canvas) = canvas_ref.get_untracked() else {
				return;
			};
			let canvas: HtmlCanvasElement = canvas.into();
			let action = {
				let Ok(mut g) = graph.try_borrow_mut() else {
					return;
				};
				let action = g.handle_input(input);
				set_cursor(&canvas, g.gesture(), g.hovered.is_some());
				action
			};
			if let Some(action) = action {
				run_action(&graph, action, &catalogue_url);
			}
		}
	};

	let d = dispatch.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(p) = mouse_point(canvas_ref, &ev) {
			d(PointerInput::MouseDown(p));
		}
	};
	let d = dispatch.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(p) = mouse_point(canvas_ref, &ev) {
			d(PointerInput::MouseMove(p));
		}
	};
	let d = dispatch.clone();
	let on_mouseup = move |_: MouseEvent| d(PointerInput::MouseUp);
	let d = dispatch.clone();
	let on_mouseleave = move |_: MouseEvent| d(PointerInput::MouseLeave);
	let d = dispatch.clone();
	let on_dblclick = move |ev: MouseEvent| {
		if let Some(p) = mouse_point(canvas_ref, &ev) {
			d(PointerInput::DoubleClick(p));
		}
	};
	let d = dispatch.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(at) = mouse_point(canvas_ref, &ev) {
			d(PointerInput::Wheel {
				at,
				delta_y: ev.delta_y(),
			});
		}
	};
	let d = dispatch.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		d(PointerInput::TouchStart(touch_points(canvas_ref, &ev.touches())));
	};
	let d = dispatch.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		d(PointerInput::TouchMove(touch_points(canvas_ref, &ev.touches())));
	};
	let d = dispatch.clone();
	let on_touchend = move |ev: TouchEvent| {
		ev.prevent_default();
		d(PointerInput::TouchEnd(touch_points(canvas_ref, &ev.touches())));
	};
	let d = dispatch;
	let on_touchcancel = move |ev: TouchEvent| {
		d(PointerInput::TouchEnd(touch_points(canvas_ref, &ev.touches())));
	};

	let graph_search = graph.clone();
	let on_search = move |ev: Event| {
		let raw = event_target_value(&ev);
		let outcome = {
			let Ok(mut g) = graph_search.try_borrow_mut() else {
				return;
			};
			dataset.with_untracked(|data| query(&mut *g, &raw, data))
		};
		match outcome {
			SearchOutcome::Found(id) => {
				debug!("prereq-graph: added {}", id);
				set_status.set(None);
				if let Some(input) = input_ref.get_untracked() {
					input.set_value("");
				}
			}
			SearchOutcome::AlreadyPresent(_) => set_status.set(Some("Course is already in graph")),
			SearchOutcome::NotFound(_) => set_status.set(Some("Course not found")),
			SearchOutcome::Empty => set_status.set(None),
		}
	};

	let graph_clear = graph.clone();
	let on_clear = move |_: MouseEvent| {
		let confirmed = web_sys::window()
			.and_then(|w| w.confirm_with_message("Remove every course from the graph?").ok())
			.unwrap_or(false);
		if !confirmed {
			return;
		}
		if let Ok(mut g) = graph_clear.try_borrow_mut() {
			g.clear();
		}
		set_status.set(None);
	};

	let graph_theme = graph;
	let on_theme = move |_: MouseEvent| {
		let Ok(mut g) = graph_theme.try_borrow_mut() else {
			return;
		};
		let theme = g.surface().theme.toggled();
		set_dark.set(theme.name == "dark");
		g.surface_mut().theme = theme;
		g.draw();
	};

	view! {
		<div class="requisite-graph">
			<canvas
				node_ref=canvas_ref
				class="requisite-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:dblclick=on_dblclick
				on:wheel=on_wheel
				on:touchstart=on_touchstart
				on:touchmove=on_touchmove
				on:touchend=on_touchend
				on:touchcancel=on_touchcancel
				style="display: block; width: 100vw; height: 100vh; touch-action: none; cursor: grab;"
			/>
			<div class="graph-toolbar">
				<input
					node_ref=input_ref
					type="text"
					class="graph-search"
					placeholder="Search a course, e.g. CMPUT 174"
					on:change=on_search
				/>
				<button
					class="graph-clear"
					style:display=move || if has_vertices.get() { "inline-block" } else { "none" }
					on:click=on_clear
				>
					"Clear"
				</button>
				<button class="graph-theme" on:click=on_theme>
					{move || if dark.get() { "Light" } else { "Dark" }}
				</button>
				{move || status.get().map(|text| view! { <p class="graph-status">{text}</p> })}
			</div>
		</div>
	}
}

/// Execute a card action against the shared graph.
fn run_action(graph: &SharedGraph, action: CardAction, catalogue_url: &str) {
	match action {
		CardAction::Open(id) => {
			let url = format!("{}/{}", catalogue_url.trim_end_matches('/'), id.catalogue_path());
			info!("prereq-graph: opening {}", url);
			if let Some(window) = web_sys::window() {
				let _ = window.open_with_url_and_target(&url, "_blank");
			}
		}
		CardAction::Delete(id) => {
			VertexHandle::new(graph, id).remove();
		}
		CardAction::Select(id) => {
			VertexHandle::new(graph, id).select();
		}
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(dim(window.inner_width()), dim(window.inner_height()))
}

fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

fn mouse_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	Some(canvas_point(&canvas, ev.client_x(), ev.client_y()))
}

fn touch_points(canvas_ref: NodeRef<leptos::html::Canvas>, touches: &TouchList) -> Vec<Point> {
	let Some(canvas) = canvas_ref.get_untracked() else {
		return Vec::new();
	};
	let canvas: HtmlCanvasElement = canvas.into();
	(0..touches.length())
		.filter_map(|i| touches.get(i))
		.map(|t| canvas_point(&canvas, t.client_x(), t.client_y()))
		.collect()
}

fn set_cursor(canvas: &HtmlCanvasElement, gesture: &Gesture, hovering: bool) {
	let cursor = match gesture {
		Gesture::DraggingVertex { .. } | Gesture::PanningBackground { .. } => "grabbing",
		_ if hovering => "pointer",
		_ => "grab",
	};
	// Leptos' `ElementExt::style` shadows the DOM getter.
	let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", cursor);
}
