use serde::{Deserialize, Serialize};

use crate::catalog::TableId;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
	/// The relation yields at most one target row
	One,
	/// The relation yields a list of target rows
	Many,
}

/// A named, directed edge from an owning table to a target table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationDefinition {
	/// Assigned from the relation's key when the schema is loaded
	#[serde(skip)]
	pub name: String,
	pub kind: RelationKind,
	/// The name of the target table
	pub target: String,
	/// The columns on the owning table which join this relation
	#[serde(default)]
	pub fields: Vec<String>,
	/// The columns on the target table matching `fields`, pairwise
	#[serde(default)]
	pub references: Vec<String>,
	/// Resolved from `target` when the schema is loaded
	#[serde(skip)]
	pub target_id: Option<TableId>,
}

impl RelationDefinition {
	pub fn one(target: impl Into<String>) -> Self {
		Self::new(RelationKind::One, target)
	}

	pub fn many(target: impl Into<String>) -> Self {
		Self::new(RelationKind::Many, target)
	}

	fn new(kind: RelationKind, target: impl Into<String>) -> Self {
		Self {
			name: String::new(),
			kind,
			target: target.into(),
			fields: Vec::new(),
			references: Vec::new(),
			target_id: None,
		}
	}

	/// Sets the join description of the relation
	pub fn on<S: Into<String>>(
		mut self,
		fields: impl IntoIterator<Item = S>,
		references: impl IntoIterator<Item = S>,
	) -> Self {
		self.fields = fields.into_iter().map(Into::into).collect();
		self.references = references.into_iter().map(Into::into).collect();
		self
	}
}
