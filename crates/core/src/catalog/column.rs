use std::fmt;

use serde::{Deserialize, Serialize};

/// The logical data kind of a column
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
	Boolean,
	Json,
	Date,
	String,
	Bigint,
	Number,
	Buffer,
	Array,
	/// A storage specific type, only usable through a registered conversion
	Custom,
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Kind::Boolean => "boolean",
			Kind::Json => "json",
			Kind::Date => "date",
			Kind::String => "string",
			Kind::Bigint => "bigint",
			Kind::Number => "number",
			Kind::Buffer => "buffer",
			Kind::Array => "array",
			Kind::Custom => "custom",
		})
	}
}

/// A value or generator applied by storage when a column is not provided
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDefault {
	/// The next value of a per-table sequence
	Increment,
	/// The current time
	Now,
	Literal(serde_json::Value),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
	/// Assigned from the column's key when the schema is loaded
	#[serde(skip)]
	pub name: String,
	pub kind: Kind,
	/// The storage specific type tag, such as `PgInteger` or `PgVector`
	#[serde(rename = "type", default)]
	pub column_type: String,
	#[serde(default)]
	pub not_null: bool,
	#[serde(default)]
	pub has_default: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default: Option<ColumnDefault>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enum_values: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub base_column: Option<Box<ColumnDefinition>>,
	#[serde(default)]
	pub primary: bool,
}

impl ColumnDefinition {
	pub fn new(name: impl Into<String>, kind: Kind, column_type: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind,
			column_type: column_type.into(),
			not_null: false,
			has_default: false,
			default: None,
			enum_values: None,
			base_column: None,
			primary: false,
		}
	}

	pub fn not_null(mut self) -> Self {
		self.not_null = true;
		self
	}

	/// Marks the column as a primary key, which implies not-null
	pub fn primary(mut self) -> Self {
		self.primary = true;
		self.not_null = true;
		self
	}

	pub fn with_default(mut self, default: ColumnDefault) -> Self {
		self.default = Some(default);
		self.has_default = true;
		self
	}

	pub fn with_enum<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
		self.enum_values = Some(values.into_iter().map(Into::into).collect());
		self
	}

	pub fn array_of(mut self, base: ColumnDefinition) -> Self {
		self.base_column = Some(Box::new(base));
		self
	}

	/// The declared enum values, when the column has a non-empty set of them
	pub fn enum_values(&self) -> Option<&[String]> {
		self.enum_values.as_deref().filter(|v| !v.is_empty())
	}

	pub(crate) fn normalise(&mut self, name: &str) {
		self.name = name.to_owned();
		if self.default.is_some() {
			self.has_default = true;
		}
		if self.primary {
			self.not_null = true;
		}
		if let Some(base) = self.base_column.as_mut() {
			base.normalise(name);
		}
	}
}
