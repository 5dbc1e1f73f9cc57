//! The relational schema a GraphQL surface is generated from.
//!
//! A [`SchemaDefinition`] is the serialisable description supplied by a
//! caller. Loading it into a [`Catalog`] validates it, assigns every table a
//! stable [`TableId`] in declaration order and resolves relation targets.
//! A catalog is immutable once loaded.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::gql::error::{GqlError, schema_error};

mod column;
mod relation;
mod table;

pub use self::column::{ColumnDefault, ColumnDefinition, Kind};
pub use self::relation::{RelationDefinition, RelationKind};
pub use self::table::{TableDefinition, TableId};

/// The columns of a table, as they appear in a schema description
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TableSource {
	pub columns: IndexMap<String, ColumnDefinition>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
	pub tables: IndexMap<String, TableSource>,
	/// Table name to relation name to relation
	#[serde(default)]
	pub relations: IndexMap<String, IndexMap<String, RelationDefinition>>,
}

impl SchemaDefinition {
	pub fn table(
		mut self,
		name: impl Into<String>,
		columns: impl IntoIterator<Item = ColumnDefinition>,
	) -> Self {
		let columns = columns.into_iter().map(|c| (c.name.clone(), c)).collect();
		self.tables.insert(
			name.into(),
			TableSource {
				columns,
			},
		);
		self
	}

	pub fn relation(
		mut self,
		owner: impl Into<String>,
		name: impl Into<String>,
		relation: RelationDefinition,
	) -> Self {
		self.relations.entry(owner.into()).or_default().insert(name.into(), relation);
		self
	}
}

/// A validated schema, indexed by [`TableId`]
#[derive(Clone, Debug)]
pub struct Catalog {
	tables: Vec<TableDefinition>,
	names: BTreeMap<String, TableId>,
	relations: Vec<IndexMap<String, RelationDefinition>>,
}

impl Catalog {
	pub fn from_json(json: &str) -> Result<Self, GqlError> {
		let def: SchemaDefinition = serde_json::from_str(json)
			.map_err(|e| schema_error(format!("invalid schema description: {e}")))?;
		Self::new(def)
	}

	pub fn new(def: SchemaDefinition) -> Result<Self, GqlError> {
		if def.tables.is_empty() {
			return Err(schema_error("no tables found in schema"));
		}

		let mut tables = Vec::with_capacity(def.tables.len());
		let mut names = BTreeMap::new();
		for (i, (name, source)) in def.tables.into_iter().enumerate() {
			let id = TableId(i as u32);
			let mut columns = IndexMap::with_capacity(source.columns.len());
			for (column_name, mut column) in source.columns {
				column.normalise(&column_name);
				if column.kind == Kind::Array && column.base_column.is_none() {
					return Err(schema_error(format!(
						"array column `{name}.{column_name}` has no base column"
					)));
				}
				columns.insert(column_name, column);
			}
			if columns.is_empty() {
				return Err(schema_error(format!("table `{name}` has no columns")));
			}
			trace!("loaded table `{name}` as {id:?}");
			names.insert(name.clone(), id);
			tables.push(TableDefinition {
				id,
				name,
				columns,
			});
		}

		let mut relations = vec![IndexMap::new(); tables.len()];
		for (owner, rels) in def.relations {
			let Some(owner_id) = names.get(&owner).copied() else {
				return Err(schema_error(format!(
					"relations were declared for table `{owner}` which does not exist"
				)));
			};
			for (rel_name, mut rel) in rels {
				let Some(target_id) = names.get(&rel.target).copied() else {
					return Err(schema_error(format!(
						"relation `{owner}.{rel_name}` references table `{}` which does not exist",
						rel.target
					)));
				};
				if rel.fields.len() != rel.references.len() {
					return Err(schema_error(format!(
						"relation `{owner}.{rel_name}` joins {} fields onto {} references",
						rel.fields.len(),
						rel.references.len()
					)));
				}
				let owner_tb = &tables[owner_id.0 as usize];
				if let Some(f) = rel.fields.iter().find(|f| owner_tb.column(f).is_none()) {
					return Err(schema_error(format!(
						"relation `{owner}.{rel_name}` joins on unknown column `{owner}.{f}`"
					)));
				}
				let target_tb = &tables[target_id.0 as usize];
				if let Some(r) = rel.references.iter().find(|r| target_tb.column(r).is_none()) {
					return Err(schema_error(format!(
						"relation `{owner}.{rel_name}` references unknown column `{}.{r}`",
						rel.target
					)));
				}
				rel.name = rel_name.clone();
				rel.target_id = Some(target_id);
				relations[owner_id.0 as usize].insert(rel_name, rel);
			}
		}

		Ok(Self {
			tables,
			names,
			relations,
		})
	}

	/// All tables, in declaration order
	pub fn tables(&self) -> impl Iterator<Item = &TableDefinition> {
		self.tables.iter()
	}

	pub fn table(&self, id: TableId) -> Option<&TableDefinition> {
		self.tables.get(id.0 as usize)
	}

	pub fn table_by_name(&self, name: &str) -> Option<&TableDefinition> {
		self.names.get(name).and_then(|id| self.table(*id))
	}

	/// The relations owned by a table, in declaration order
	pub fn relations(&self, id: TableId) -> impl Iterator<Item = &RelationDefinition> {
		self.relations.get(id.0 as usize).into_iter().flat_map(|r| r.values())
	}

	pub fn relation(&self, id: TableId, name: &str) -> Option<&RelationDefinition> {
		self.relations.get(id.0 as usize).and_then(|r| r.get(name))
	}

	/// The table a relation points at
	pub fn target(&self, rel: &RelationDefinition) -> Result<&TableDefinition, GqlError> {
		rel.target_id
			.and_then(|id| self.table(id))
			.ok_or_else(|| schema_error(format!("relation target `{}` not found", rel.target)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn users() -> Vec<ColumnDefinition> {
		vec![
			ColumnDefinition::new("id", Kind::Number, "PgInteger").primary(),
			ColumnDefinition::new("name", Kind::String, "PgText").not_null(),
		]
	}

	#[test]
	fn assigns_ids_in_declaration_order() {
		let def = SchemaDefinition::default()
			.table("users", users())
			.table("posts", [ColumnDefinition::new("authorId", Kind::Number, "PgInteger")])
			.relation("users", "posts", RelationDefinition::many("posts").on(["id"], ["authorId"]));
		let catalog = Catalog::new(def).unwrap();
		assert_eq!(catalog.table_by_name("users").map(|t| t.id), Some(TableId(0)));
		assert_eq!(catalog.table_by_name("posts").map(|t| t.id), Some(TableId(1)));
		let rel = catalog.relation(TableId(0), "posts").unwrap();
		assert_eq!(rel.name, "posts");
		assert_eq!(rel.target_id, Some(TableId(1)));
		assert_eq!(catalog.relations(TableId(1)).count(), 0);
	}

	#[test]
	fn rejects_empty_schema() {
		let err = Catalog::new(SchemaDefinition::default()).unwrap_err();
		assert_eq!(err.to_string(), "Error generating schema: no tables found in schema");
	}

	#[test]
	fn rejects_missing_relation_target() {
		let def = SchemaDefinition::default()
			.table("users", users())
			.relation("users", "posts", RelationDefinition::many("posts"));
		let err = Catalog::new(def).unwrap_err();
		assert!(matches!(err, GqlError::SchemaError(_)));
		assert!(err.to_string().contains("table `posts` which does not exist"));
	}

	#[test]
	fn rejects_unknown_join_column() {
		let def = SchemaDefinition::default()
			.table("users", users())
			.relation("users", "self", RelationDefinition::one("users").on(["bestie"], ["id"]));
		let err = Catalog::new(def).unwrap_err();
		assert!(err.to_string().contains("unknown column `users.bestie`"));
	}

	#[test]
	fn loads_from_json() {
		let catalog = Catalog::from_json(
			r#"{
				"tables": {
					"users": {
						"columns": {
							"id": { "kind": "number", "type": "PgSerial", "primary": true },
							"tags": { "kind": "array", "type": "PgArray", "baseColumn": { "kind": "string", "type": "PgText" } }
						}
					}
				}
			}"#,
		)
		.unwrap();
		let users = catalog.table_by_name("users").unwrap();
		assert_eq!(users.columns.len(), 2);
		assert!(users.column("id").unwrap().not_null);
		assert_eq!(users.column("tags").unwrap().base_column.as_ref().unwrap().kind, Kind::String);
	}
}
