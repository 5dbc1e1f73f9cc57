//! Derivation of wire types from column definitions.

use std::collections::BTreeSet;
use std::fmt;

use async_graphql::dynamic::{Enum, EnumItem, InputObject, InputValue, Type, TypeRef};

use super::error::GqlError;
use super::naming::{INNER_ORDER, ORDER_DIRECTION, TableNames, enum_member};
use super::remap::Conversions;
use crate::catalog::{ColumnDefinition, Kind};

/// The named types registered while generating a schema, each at most once
#[derive(Default)]
pub struct TypeSet {
	names: BTreeSet<String>,
	types: Vec<Type>,
}

impl fmt::Debug for TypeSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(&self.names).finish()
	}
}

impl TypeSet {
	/// Registers the type built by `make` unless a type of the same name
	/// exists already, returning whether it was registered
	pub fn register(&mut self, name: impl Into<String>, make: impl FnOnce() -> Type) -> bool {
		let name = name.into();
		if self.names.contains(&name) {
			return false;
		}
		trace!("registering type `{name}`");
		self.types.push(make());
		self.names.insert(name);
		true
	}

	pub fn contains(&self, name: &str) -> bool {
		self.names.contains(name)
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	pub fn into_types(self) -> Vec<Type> {
		self.types
	}
}

/// Which side of the wire a derived type sits on
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Usage {
	Output,
	Input,
}

/// How the nullability of a column maps onto its derived type
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Nullability {
	/// Non-null exactly when the column is
	Strict,
	/// Always nullable, for filter and order arguments
	Optional,
	/// Nullable when the column is, or when storage can fill in a default
	DefaultTolerant,
}

/// Derives the wire type of a column
pub fn column_type(
	names: &TableNames,
	column: &ColumnDefinition,
	conv: &Conversions,
	usage: Usage,
	nullability: Nullability,
	types: &mut TypeSet,
) -> Result<TypeRef, GqlError> {
	let base = base_type(names, column, conv, usage, types)?;
	let nullable = match nullability {
		Nullability::Strict => !column.not_null,
		Nullability::Optional => true,
		Nullability::DefaultTolerant => !column.not_null || column.has_default,
	};
	Ok(match nullable {
		true => base,
		false => TypeRef::NonNull(Box::new(base)),
	})
}

/// Derives the wire type of a column, before nullability is applied
pub fn base_type(
	names: &TableNames,
	column: &ColumnDefinition,
	conv: &Conversions,
	usage: Usage,
	types: &mut TypeSet,
) -> Result<TypeRef, GqlError> {
	if let Some(custom) = conv.custom(column) {
		(custom.register)(types);
		return Ok(match usage {
			Usage::Output => custom.output.clone(),
			Usage::Input => custom.input.clone(),
		});
	}
	let ty = match column.kind {
		Kind::Boolean => TypeRef::named(TypeRef::BOOLEAN),
		Kind::Json | Kind::Date | Kind::Bigint => TypeRef::named(TypeRef::STRING),
		Kind::String => match column.enum_values() {
			Some(values) => {
				let name = names.column_enum(&column.name);
				types.register(name.clone(), || enum_type(&name, values).into());
				TypeRef::named(name)
			}
			None => TypeRef::named(TypeRef::STRING),
		},
		Kind::Number if conv.is_integer(column) => TypeRef::named(TypeRef::INT),
		Kind::Number => TypeRef::named(TypeRef::FLOAT),
		Kind::Buffer => TypeRef::named_nn_list(TypeRef::INT),
		Kind::Array => match column.base_column.as_deref() {
			Some(base) => {
				let inner = base_type(names, base, conv, usage, types)?;
				TypeRef::List(Box::new(TypeRef::NonNull(Box::new(inner))))
			}
			None => return Err(mapping_error(column)),
		},
		Kind::Custom => return Err(mapping_error(column)),
	};
	Ok(ty)
}

fn mapping_error(column: &ColumnDefinition) -> GqlError {
	GqlError::TypeMapping {
		column: column.name.clone(),
		kind: column.kind,
		column_type: column.column_type.clone(),
	}
}

fn enum_type(name: &str, values: &[String]) -> Enum {
	Enum::new(name).items(values.iter().enumerate().map(|(i, v)| {
		EnumItem::new(enum_member(i, v)).description(format!("Value: {v}"))
	}))
}

/// Registers the filter input type of one column, returning its name.
///
/// Comparison operators take the column's own input type, pattern operators
/// take strings and `OR` takes a list of the same filter type.
pub fn column_filters(
	names: &TableNames,
	column: &ColumnDefinition,
	conv: &Conversions,
	types: &mut TypeSet,
) -> Result<String, GqlError> {
	let name = names.column_filters(&column.name);
	if types.contains(&name) {
		return Ok(name);
	}
	let base = base_type(names, column, conv, Usage::Input, types)?;
	let list = TypeRef::List(Box::new(TypeRef::NonNull(Box::new(base.clone()))));
	let mut filters = InputObject::new(&name);
	for op in ["eq", "ne", "lt", "lte", "gt", "gte"] {
		filters = filters.field(InputValue::new(op, base.clone()));
	}
	for op in ["like", "notLike", "ilike", "notIlike"] {
		filters = filters.field(InputValue::new(op, TypeRef::named(TypeRef::STRING)));
	}
	for op in ["inArray", "notInArray"] {
		filters = filters
			.field(InputValue::new(op, list.clone()).description("Array<value>"));
	}
	for op in ["isNull", "isNotNull"] {
		filters = filters.field(InputValue::new(op, TypeRef::named(TypeRef::BOOLEAN)));
	}
	filters = filters.field(InputValue::new("OR", TypeRef::named_nn_list(&name)));
	types.register(name.clone(), || filters.into());
	Ok(name)
}

/// Registers the order direction enum and the per-column order input shared
/// by every table
pub fn register_order_types(types: &mut TypeSet) {
	types.register(ORDER_DIRECTION, || {
		Enum::new(ORDER_DIRECTION)
			.description("Order by direction")
			.item(EnumItem::new("asc").description("Ascending order"))
			.item(EnumItem::new("desc").description("Descending order"))
			.into()
	});
	types.register(INNER_ORDER, || {
		InputObject::new(INNER_ORDER)
			.field(InputValue::new("direction", TypeRef::named_nn(ORDER_DIRECTION)))
			.field(
				InputValue::new("priority", TypeRef::named_nn(TypeRef::INT))
					.description("Priority of current field"),
			)
			.into()
	});
}
