//! Interactive course requisite graph.
//!
//! Searching a course lays out it and everything it transitively requires as
//! cards on an HTML canvas:
//! - Depth-first expansion of prerequisite and corequisite AND-of-OR sets
//! - One edge color per OR-set, so alternatives read as a group
//! - Cascading removal and "select this alternative" pruning
//! - Pan, zoom, pinch and card dragging through a single gesture state machine
//!
//! The engine ([`RequisiteGraph`]) draws through the [`Surface`] trait and never
//! touches the DOM itself; [`RequisiteGraphCanvas`] is the Leptos wrapper.
//!
//! # Example
//!
//! ```ignore
//! use prereq_graph::components::requisite_graph::{Dataset, RequisiteGraphCanvas};
//!
//! let dataset = Dataset::from_json(&json_text)?;
//! view! { <RequisiteGraphCanvas dataset=dataset /> }
//! ```

mod component;
pub mod config;
mod edge;
mod gesture;
mod render;
pub mod scale;
mod search;
mod state;
pub mod theme;
mod types;
mod vertex;
mod viewport;

pub use component::RequisiteGraphCanvas;
pub use config::{GestureConfig, GraphConfig, LayoutConfig};
pub use edge::{Arrowhead, Edge, EdgePath, Point, Rect, Segment};
pub use gesture::{CardAction, Gesture, PointerInput, PointerKind};
pub use render::{CanvasSurface, CardView, Surface};
pub use scale::ScaleConfig;
pub use search::{SearchOutcome, query, search};
pub use state::{GraphChange, RequisiteGraph};
pub use theme::{Color, Theme};
pub use types::{CourseId, CourseRecord, Dataset, DatasetError, RequisiteExpr, RequisiteKind, normalize_query};
pub use vertex::{CardHit, Vertex, VertexHandle};
pub use viewport::Viewport;
