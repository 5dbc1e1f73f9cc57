//! Generation of a GraphQL schema from a [`Catalog`] and resolution of
//! requests against a [`Storage`] implementation.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::store::Storage;

pub mod cache;
pub mod compile;
pub mod config;
pub mod error;
pub mod naming;
pub mod relations;
pub mod remap;
pub mod resolvers;
pub mod schema;
mod tables;
pub mod types;
pub mod utils;

pub use cache::SchemaCache;
pub use config::GqlConfig;
pub use error::GqlError;
pub use remap::{Conversions, CustomType};
pub use schema::generate_schema;

/// Everything generated resolvers need at request time
#[derive(Clone, Debug)]
pub struct GqlEnv {
	pub catalog: Arc<Catalog>,
	pub conversions: Arc<Conversions>,
	pub storage: Arc<dyn Storage>,
}

impl GqlEnv {
	/// An environment with the default conversions
	pub fn new(catalog: Arc<Catalog>, storage: Arc<dyn Storage>) -> Self {
		Self {
			catalog,
			conversions: Arc::new(Conversions::default()),
			storage,
		}
	}

	pub fn with_conversions(mut self, conversions: Conversions) -> Self {
		self.conversions = Arc::new(conversions);
		self
	}
}
