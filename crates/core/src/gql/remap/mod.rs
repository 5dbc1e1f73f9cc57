//! Bidirectional conversion of column values between their wire and storage
//! representations.
//!
//! Conversions are looked up in two tiers. A conversion registered for the
//! column's storage type tag always wins; otherwise the default conversion of
//! the column's [`Kind`](crate::catalog::Kind) applies. Registering a
//! [`CustomType`] is the only way to extend the set of supported columns.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use async_graphql::Value as GqlValue;
use async_graphql::dynamic::TypeRef;

use super::error::GqlError;
use super::types::TypeSet;
use crate::catalog::ColumnDefinition;
use crate::val::Value;

mod custom;
mod kind;
mod row;

/// Converts a stored value into its wire representation
pub type ToWire = fn(&Conversions, Value, &ColumnDefinition) -> Result<GqlValue, GqlError>;

/// Converts a wire value into its stored representation
pub type FromWire = fn(&Conversions, &GqlValue, &ColumnDefinition) -> Result<Value, GqlError>;

/// Registers any types a custom conversion refers to
pub type RegisterTypes = fn(&mut TypeSet);

/// The full description of a storage specific column type
#[derive(Clone)]
pub struct CustomType {
	/// The output type, before nullability is applied
	pub output: TypeRef,
	/// The input type, before nullability is applied
	pub input: TypeRef,
	pub register: RegisterTypes,
	pub to_wire: ToWire,
	pub from_wire: FromWire,
}

impl fmt::Debug for CustomType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CustomType")
			.field("output", &self.output.to_string())
			.field("input", &self.input.to_string())
			.finish_non_exhaustive()
	}
}

/// The registry of conversions, keyed by storage type tag
#[derive(Clone, Debug)]
pub struct Conversions {
	custom: BTreeMap<String, CustomType>,
	integers: BTreeSet<String>,
}

/// Number column tags stored as integers
const INTEGER_TAGS: &[&str] = &[
	"PgInteger",
	"PgSmallInt",
	"PgSerial",
	"PgSmallSerial",
	"MySqlInt",
	"MySqlSmallInt",
	"MySqlTinyInt",
	"MySqlMediumInt",
	"MySqlSerial",
	"SQLiteInteger",
];

impl Default for Conversions {
	fn default() -> Self {
		let mut conv = Self::empty();
		for tag in INTEGER_TAGS {
			conv.register_integer(*tag);
		}
		custom::register_builtin(&mut conv);
		conv
	}
}

impl Conversions {
	/// A registry with no storage specific conversions at all
	pub fn empty() -> Self {
		Self {
			custom: BTreeMap::new(),
			integers: BTreeSet::new(),
		}
	}

	/// Registers a conversion for a storage type tag, returning any
	/// conversion it replaced
	pub fn register(&mut self, tag: impl Into<String>, ty: CustomType) -> Option<CustomType> {
		self.custom.insert(tag.into(), ty)
	}

	/// Marks a number column tag as stored as an integer
	pub fn register_integer(&mut self, tag: impl Into<String>) {
		self.integers.insert(tag.into());
	}

	/// The conversion registered for a column's type tag
	pub fn custom(&self, column: &ColumnDefinition) -> Option<&CustomType> {
		self.custom.get(&column.column_type)
	}

	pub fn is_integer(&self, column: &ColumnDefinition) -> bool {
		self.integers.contains(&column.column_type)
	}

	/// Converts one stored column value into its wire representation
	pub fn to_wire(&self, value: Value, column: &ColumnDefinition) -> Result<GqlValue, GqlError> {
		if value.is_nullish() {
			return Ok(GqlValue::Null);
		}
		match self.custom(column) {
			Some(custom) => (custom.to_wire)(self, value, column),
			None => kind::to_wire(self, value, column),
		}
	}

	/// Converts one wire column value into its stored representation
	pub fn from_wire(&self, value: &GqlValue, column: &ColumnDefinition) -> Result<Value, GqlError> {
		if let GqlValue::Null = value {
			return Ok(Value::Null);
		}
		match self.custom(column) {
			Some(custom) => (custom.from_wire)(self, value, column),
			None => kind::from_wire(self, value, column),
		}
	}
}
