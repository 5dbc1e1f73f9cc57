//! Expansion of relation fields over the table graph.
//!
//! Every table reachable through relations gets a nested object type named
//! after the path it was reached through. The walk stops at tables already on
//! the current path, and at the configured depth limit.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_graphql::dynamic::{Field, InputValue, Object, TypeRef};

use super::cache::{TableTypes, TypeCache};
use super::error::GqlError;
use super::naming::relation_type;
use super::remap::Conversions;
use super::types::TypeSet;
use super::utils::value_field;
use crate::catalog::{Catalog, RelationKind, TableDefinition, TableId};

/// A relation field exposed on a selectable object type
#[derive(Clone, Debug)]
pub struct RelationField {
	pub name: String,
	pub kind: RelationKind,
	pub target: TableId,
	/// The nested object type of the relation
	pub type_name: String,
	/// The filter input type of the target table
	pub filters: String,
	/// The order input type of the target table, for plural relations
	pub order_by: Option<String>,
}

/// The fields of a selectable object type
#[derive(Clone, Debug)]
pub struct Selectable {
	pub types: Arc<TableTypes>,
	/// The order input type, when ordering applies at this level
	pub order_by: Option<String>,
	pub relations: Vec<RelationField>,
}

impl Selectable {
	/// Builds the object type of this selection, with its own columns and its
	/// relation fields
	pub fn object(&self, name: &str) -> Object {
		let mut obj = Object::new(name);
		for (column, ty) in &self.types.columns {
			obj = obj.field(value_field(column, ty.clone()));
		}
		for rel in &self.relations {
			obj = obj.field(rel.field());
		}
		obj
	}
}

impl RelationField {
	fn field(&self) -> Field {
		let field = match self.kind {
			RelationKind::One => value_field(&self.name, TypeRef::named(&self.type_name)),
			RelationKind::Many => {
				value_field(&self.name, TypeRef::named_nn_list_nn(&self.type_name))
			}
		};
		let mut field = field.argument(InputValue::new("where", TypeRef::named(&self.filters)));
		if let RelationKind::Many = self.kind {
			if let Some(order_by) = &self.order_by {
				field = field.argument(InputValue::new("orderBy", TypeRef::named(order_by)));
			}
			field = field
				.argument(InputValue::new("offset", TypeRef::named(TypeRef::INT)))
				.argument(InputValue::new("limit", TypeRef::named(TypeRef::INT)));
		}
		field
	}
}

/// Walks the relation graph, deriving and registering the types it reaches
pub struct Walker<'a> {
	pub catalog: &'a Catalog,
	pub conv: &'a Conversions,
	pub cache: &'a mut TypeCache,
	pub types: &'a mut TypeSet,
	pub depth_limit: Option<u32>,
}

impl Walker<'_> {
	/// Derives the selectable fields of `table`.
	///
	/// Relation fields are generated unless `table` is in `visited`, `depth`
	/// has reached the depth limit or the table has no relations. Each
	/// relation's target is walked with its own copy of `visited`, extended
	/// by `table`, so sibling branches never see each other's tables.
	pub fn derive_selectable(
		&mut self,
		table: &TableDefinition,
		prefix: &str,
		include_order: bool,
		depth: u32,
		visited: &BTreeSet<TableId>,
	) -> Result<Selectable, GqlError> {
		let types = self.cache.derive(table, self.conv, self.types)?;
		let order_by = include_order.then(|| types.names.order_by.clone());
		let mut selectable = Selectable {
			types,
			order_by,
			relations: Vec::new(),
		};

		if visited.contains(&table.id) {
			trace!("stopping at `{prefix}`, table `{}` was already visited", table.name);
			return Ok(selectable);
		}
		if self.depth_limit.is_some_and(|limit| depth >= limit) {
			trace!("stopping at `{prefix}`, depth limit reached");
			return Ok(selectable);
		}

		let mut visited = visited.clone();
		visited.insert(table.id);

		for rel in self.catalog.relations(table.id) {
			let target = self.catalog.target(rel)?;
			let type_name = relation_type(prefix, &rel.name);
			let many = rel.kind == RelationKind::Many;
			let nested = self.derive_selectable(target, &type_name, many, depth + 1, &visited)?;
			self.types.register(type_name.clone(), || nested.object(&type_name).into());
			selectable.relations.push(RelationField {
				name: rel.name.clone(),
				kind: rel.kind,
				target: target.id,
				filters: nested.types.names.filters.clone(),
				order_by: nested.order_by.clone(),
				type_name,
			});
		}

		Ok(selectable)
	}
}
