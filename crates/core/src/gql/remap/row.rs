//! Conversion of whole rows, including nested relation payloads.

use async_graphql::{Name, Value as GqlValue};

use super::Conversions;
use crate::catalog::{Catalog, TableDefinition};
use crate::gql::error::{GqlError, internal_error};
use crate::gql::utils::{GqlObject, value_to_gql};
use crate::val::{Object, Value};

impl Conversions {
	/// Converts one field of a stored row.
	///
	/// A key naming one of the table's relations is converted as the nested
	/// row (or rows) of the relation's target table, otherwise the key is
	/// converted as a column.
	pub fn field_to_wire(
		&self,
		catalog: &Catalog,
		table: &TableDefinition,
		key: &str,
		value: Value,
	) -> Result<GqlValue, GqlError> {
		if let Some(rel) = catalog.relation(table.id, key) {
			let target = catalog.target(rel)?;
			return match value {
				Value::Array(rows) => Ok(GqlValue::List(
					rows.into_iter()
						.map(|row| match row {
							Value::Object(o) => self.row_to_wire(catalog, target, o),
							v => Err(internal_error(format!(
								"expected rows for relation `{}.{key}`, found {v}",
								table.name
							))),
						})
						.collect::<Result<_, _>>()?,
				)),
				Value::Object(o) => self.row_to_wire(catalog, target, o),
				v if v.is_nullish() => Ok(GqlValue::Null),
				v => Err(internal_error(format!(
					"expected a row for relation `{}.{key}`, found {v}",
					table.name
				))),
			};
		}
		match table.column(key) {
			Some(column) => self.to_wire(value, column),
			None => value_to_gql(value),
		}
	}

	/// Converts a stored row, omitting every null or absent field
	pub fn row_to_wire(
		&self,
		catalog: &Catalog,
		table: &TableDefinition,
		row: Object,
	) -> Result<GqlValue, GqlError> {
		let mut out = GqlObject::with_capacity(row.len());
		for (key, value) in row {
			if value.is_nullish() {
				continue;
			}
			let value = self.field_to_wire(catalog, table, &key, value)?;
			out.insert(Name::new(key), value);
		}
		Ok(GqlValue::Object(out))
	}

	pub fn rows_to_wire(
		&self,
		catalog: &Catalog,
		table: &TableDefinition,
		rows: Vec<Object>,
	) -> Result<GqlValue, GqlError> {
		rows.into_iter()
			.map(|row| self.row_to_wire(catalog, table, row))
			.collect::<Result<Vec<_>, _>>()
			.map(GqlValue::List)
	}

	/// Converts an input object into a storage row.
	///
	/// A null provided for a non-nullable column is treated as no value at
	/// all, while a null for a nullable column is kept.
	pub fn row_from_wire(
		&self,
		table: &TableDefinition,
		input: &GqlObject,
	) -> Result<Object, GqlError> {
		let mut out = Object::default();
		for (key, value) in input {
			let Some(column) = table.column(key.as_str()) else {
				return Err(GqlError::UnknownField(key.to_string()));
			};
			if matches!(value, GqlValue::Null) && column.not_null {
				continue;
			}
			out.insert(key.to_string(), self.from_wire(value, column)?);
		}
		Ok(out)
	}
}
