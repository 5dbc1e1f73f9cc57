use async_graphql::dynamic::{Object, Schema};

use super::GqlEnv;
use super::cache::TypeCache;
use super::config::GqlConfig;
use super::error::{GqlError, schema_error};
use super::relations::Walker;
use super::tables::{process_table_mutations, process_table_queries};
use super::types::TypeSet;
use crate::cnf::{GRAPHQL_MAX_COMPLEXITY, GRAPHQL_MAX_DEPTH};

/// Generates the GraphQL schema of every table in the environment's catalog
pub fn generate_schema(env: &GqlEnv, config: &GqlConfig) -> Result<Schema, GqlError> {
	if env.catalog.tables().next().is_none() {
		return Err(schema_error("no tables found in schema"));
	}

	let mut cache = TypeCache::default();
	let mut types = TypeSet::default();
	let mut walker = Walker {
		catalog: &env.catalog,
		conv: &env.conversions,
		cache: &mut cache,
		types: &mut types,
		depth_limit: config.relations_depth_limit,
	};

	trace!(?config, "generating schema");

	let mut query = Object::new("Query");
	let mut mutation = config.mutations.then(|| Object::new("Mutation"));
	for table in env.catalog.tables() {
		query = process_table_queries(env, &mut walker, table, query)?;
		if let Some(m) = mutation.take() {
			mutation = Some(process_table_mutations(env, &mut walker, table, m)?);
		}
	}

	trace!("current Query object for schema: {:?}", query);

	let mut schema =
		Schema::build("Query", mutation.as_ref().map(|_| "Mutation"), None).register(query);
	if let Some(mutation) = mutation {
		schema = schema.register(mutation);
	}
	for ty in types.into_types() {
		trace!("adding type: {ty:?}");
		schema = schema.register(ty);
	}

	schema
		.limit_depth(*GRAPHQL_MAX_DEPTH)
		.limit_complexity(*GRAPHQL_MAX_COMPLEXITY)
		.finish()
		.map_err(|e| schema_error(e.to_string()))
}
