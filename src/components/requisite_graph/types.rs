//! Course dataset structures consumed by the traversal engine.
//!
//! The dataset is produced by an external scraper as JSON: a mapping from
//! department to course number to [`CourseRecord`]. Course identifiers are
//! `"DEPT NUMBER"` strings where the rightmost whitespace-separated token is
//! the number, so departments may themselves contain spaces.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Identifier of a course, e.g. `"CMPUT 174"` or `"ART HISTORY 101"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
	pub fn new(code: impl Into<String>) -> Self {
		Self(code.into())
	}

	/// Canonical id for typed or scraped text: trimmed, with every run of
	/// whitespace collapsed to a single space.
	pub fn canonical(code: &str) -> Self {
		Self(code.split_whitespace().collect::<Vec<_>>().join(" "))
	}

	/// Join a department and number with a single space.
	pub fn from_parts(department: &str, number: &str) -> Self {
		Self::canonical(&format!("{} {}", department, number))
	}

	/// Split on the rightmost space into `(department, number)`.
	///
	/// A code without any space yields an empty department.
	pub fn split(&self) -> (&str, &str) {
		match self.0.rfind(' ') {
			Some(i) => (self.0[..i].trim(), self.0[i + 1..].trim()),
			None => ("", self.0.trim()),
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Catalogue path segment, `ART_HISTORY/101` for `ART HISTORY 101`.
	pub fn catalogue_path(&self) -> String {
		let (department, number) = self.split();
		format!("{}/{}", department.replace(' ', "_"), number)
	}
}

impl fmt::Display for CourseId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for CourseId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for CourseId {
	fn from(code: &str) -> Self {
		Self::new(code)
	}
}

/// AND of ORs: every inner set must be satisfied by one of its members.
pub type RequisiteExpr = Vec<Vec<CourseId>>;

/// One course as emitted by the scraper.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CourseRecord {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub desc: Option<String>,
	#[serde(default)]
	pub prereqs: Option<RequisiteExpr>,
	#[serde(default)]
	pub coreqs: Option<RequisiteExpr>,
}

/// Which requisite list an edge came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequisiteKind {
	Prereq,
	Coreq,
}

impl RequisiteKind {
	pub const ALL: [RequisiteKind; 2] = [RequisiteKind::Prereq, RequisiteKind::Coreq];
}

impl CourseRecord {
	pub fn requisites(&self, kind: RequisiteKind) -> Option<&RequisiteExpr> {
		match kind {
			RequisiteKind::Prereq => self.prereqs.as_ref(),
			RequisiteKind::Coreq => self.coreqs.as_ref(),
		}
	}
}

/// Failure to read a dataset from JSON.
#[derive(Debug, Error)]
pub enum DatasetError {
	#[error("invalid course data: {0}")]
	Json(#[from] serde_json::Error),
	#[error("course data contains no departments")]
	Empty,
}

/// Department -> course number -> record.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
	departments: HashMap<String, HashMap<String, CourseRecord>>,
}

impl Dataset {
	/// Parse either a bare dataset or a university document with a `courses`
	/// field. Scraper output wraps the dataset with university metadata, which
	/// is ignored.
	pub fn from_json(text: &str) -> Result<Self, DatasetError> {
		let document: serde_json::Value = serde_json::from_str(text)?;
		let dataset = match document.get("courses") {
			Some(courses) => Dataset::deserialize(courses)?,
			None => Dataset::deserialize(&document)?,
		};
		if dataset.departments.is_empty() {
			return Err(DatasetError::Empty);
		}
		Ok(dataset)
	}

	pub fn insert(&mut self, id: &CourseId, record: CourseRecord) {
		let (department, number) = id.split();
		self.departments
			.entry(department.to_string())
			.or_default()
			.insert(number.to_string(), record);
	}

	pub fn get(&self, id: &CourseId) -> Option<&CourseRecord> {
		let (department, number) = id.split();
		self.departments.get(department)?.get(number)
	}

	pub fn contains(&self, id: &CourseId) -> bool {
		self.get(id).is_some()
	}

	/// Total number of courses across all departments.
	pub fn len(&self) -> usize {
		self.departments.values().map(HashMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Normalize a typed query: uppercase, trim, and insert a space before the
/// first digit when the query has none (`"cmput174"` -> `"CMPUT 174"`).
pub fn normalize_query(query: &str) -> Option<CourseId> {
	let query = CourseId::canonical(&query.to_uppercase()).0;
	if query.is_empty() {
		return None;
	}
	if query.contains(' ') {
		return Some(CourseId(query));
	}
	match query.find(|c: char| c.is_ascii_digit()) {
		Some(i) if i > 0 => Some(CourseId::from_parts(&query[..i], &query[i..])),
		_ => Some(CourseId::new(query)),
	}
}
