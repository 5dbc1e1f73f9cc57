use serde::{Deserialize, Serialize};

/// What to generate for a schema
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GqlConfig {
	/// Whether insert, update and delete fields are generated
	pub mutations: bool,
	/// How many levels of relation fields are generated below each table.
	///
	/// `None` is unlimited apart from cycles, which are never expanded more
	/// than once. `Some(0)` generates no relation fields at all.
	pub relations_depth_limit: Option<u32>,
}

impl Default for GqlConfig {
	fn default() -> Self {
		Self {
			mutations: true,
			relations_depth_limit: None,
		}
	}
}

impl GqlConfig {
	pub fn with_mutations(mut self, mutations: bool) -> Self {
		self.mutations = mutations;
		self
	}

	pub fn with_depth_limit(mut self, limit: impl Into<Option<u32>>) -> Self {
		self.relations_depth_limit = limit.into();
		self
	}
}
