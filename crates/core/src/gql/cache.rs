use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_graphql::dynamic::{InputObject, InputValue, Object, Schema, TypeRef};
use indexmap::IndexMap;
use parking_lot::RwLock;

use super::GqlEnv;
use super::config::GqlConfig;
use super::error::GqlError;
use super::naming::{INNER_ORDER, TableNames};
use super::remap::Conversions;
use super::schema::generate_schema;
use super::types::{Nullability, TypeSet, Usage, column_filters, column_type, register_order_types};
use super::utils::value_field;
use crate::catalog::{TableDefinition, TableId};

/// The types derived from a single table, independent of its relations
#[derive(Debug)]
pub struct TableTypes {
	pub table: TableId,
	pub names: TableNames,
	/// The output type of each column
	pub columns: IndexMap<String, TypeRef>,
	/// The insert input type of each column
	pub insert: IndexMap<String, TypeRef>,
	/// The update input type of each column
	pub update: IndexMap<String, TypeRef>,
}

/// Memoises [`TableTypes`] by table identity for the lifetime of one schema
/// generation
#[derive(Debug, Default)]
pub struct TypeCache {
	tables: BTreeMap<TableId, Arc<TableTypes>>,
}

impl TypeCache {
	pub fn get(&self, table: TableId) -> Option<Arc<TableTypes>> {
		self.tables.get(&table).cloned()
	}

	/// Derives and registers the types of a table on first use, and returns
	/// the cached result on every later use
	pub fn derive(
		&mut self,
		table: &TableDefinition,
		conv: &Conversions,
		types: &mut TypeSet,
	) -> Result<Arc<TableTypes>, GqlError> {
		if let Some(cached) = self.tables.get(&table.id) {
			return Ok(cached.clone());
		}
		trace!("deriving types for table `{}`", table.name);
		let derived = Arc::new(derive_table(table, conv, types)?);
		self.tables.insert(table.id, derived.clone());
		Ok(derived)
	}
}

fn derive_table(
	table: &TableDefinition,
	conv: &Conversions,
	types: &mut TypeSet,
) -> Result<TableTypes, GqlError> {
	let names = TableNames::new(&table.name);
	register_order_types(types);

	let mut columns = IndexMap::with_capacity(table.columns.len());
	let mut insert = IndexMap::with_capacity(table.columns.len());
	let mut update = IndexMap::with_capacity(table.columns.len());
	let mut filters = InputObject::new(&names.filters);
	let mut order_by = InputObject::new(&names.order_by);

	for (name, column) in &table.columns {
		columns.insert(
			name.clone(),
			column_type(&names, column, conv, Usage::Output, Nullability::Strict, types)?,
		);
		insert.insert(
			name.clone(),
			column_type(&names, column, conv, Usage::Input, Nullability::DefaultTolerant, types)?,
		);
		update.insert(
			name.clone(),
			column_type(&names, column, conv, Usage::Input, Nullability::Optional, types)?,
		);
		let column_filters = column_filters(&names, column, conv, types)?;
		filters = filters.field(InputValue::new(name, TypeRef::named(column_filters)));
		order_by = order_by.field(InputValue::new(name, TypeRef::named(INNER_ORDER)));
	}
	filters = filters.field(InputValue::new("OR", TypeRef::named_nn_list(&names.filters)));

	types.register(names.filters.clone(), || filters.into());
	types.register(names.order_by.clone(), || order_by.into());
	types.register(names.insert_input.clone(), || {
		insert
			.iter()
			.fold(InputObject::new(&names.insert_input), |obj, (name, ty)| {
				obj.field(InputValue::new(name, ty.clone()))
			})
			.into()
	});
	types.register(names.update_input.clone(), || {
		update
			.iter()
			.fold(InputObject::new(&names.update_input), |obj, (name, ty)| {
				obj.field(InputValue::new(name, ty.clone()))
			})
			.into()
	});
	types.register(names.item.clone(), || {
		columns
			.iter()
			.fold(Object::new(&names.item), |obj, (name, ty)| {
				obj.field(value_field(name, ty.clone()))
			})
			.into()
	});

	Ok(TableTypes {
		table: table.id,
		names,
		columns,
		insert,
		update,
	})
}

/// Generated schemas, keyed by the configuration they were generated with
#[derive(Clone)]
pub struct SchemaCache {
	inner: Arc<RwLock<BTreeMap<GqlConfig, Schema>>>,
	pub env: GqlEnv,
}

impl Debug for SchemaCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SchemaCache")
			.field("configs", &self.inner.read().keys().collect::<Vec<_>>())
			.field("env", &self.env)
			.finish()
	}
}

impl SchemaCache {
	pub fn new(env: GqlEnv) -> Self {
		SchemaCache {
			inner: Default::default(),
			env,
		}
	}

	pub fn get_schema(&self, config: &GqlConfig) -> Result<Schema, GqlError> {
		if let Some(schema) = self.inner.read().get(config) {
			return Ok(schema.clone());
		}

		let schema = generate_schema(&self.env, config)?;

		self.inner.write().insert(config.clone(), schema.clone());

		Ok(schema)
	}
}
