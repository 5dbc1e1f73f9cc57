//! Names of the generated GraphQL types and fields.

/// Uppercases the first character of a string
pub fn capitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Lowercases the first character of a string
pub fn uncapitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// The shared ordering input type used by every column
pub const INNER_ORDER: &str = "InnerOrder";
/// The direction enum of [`INNER_ORDER`]
pub const ORDER_DIRECTION: &str = "OrderDirection";

/// Every name derived from a single table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableNames {
	/// The capitalised table name, used as a prefix for type names
	pub type_name: String,
	pub query_many: String,
	pub query_single: String,
	pub insert_many: String,
	pub insert_single: String,
	pub update: String,
	pub delete: String,
	pub select_item: String,
	pub item: String,
	pub insert_input: String,
	pub update_input: String,
	pub filters: String,
	pub order_by: String,
}

impl TableNames {
	pub fn new(table: &str) -> Self {
		let type_name = capitalize(table);
		let query_many = uncapitalize(table);
		Self {
			query_single: format!("{query_many}Single"),
			insert_many: format!("insertInto{type_name}"),
			insert_single: format!("insertInto{type_name}Single"),
			update: format!("update{type_name}"),
			delete: format!("deleteFrom{type_name}"),
			select_item: format!("{type_name}SelectItem"),
			item: format!("{type_name}Item"),
			insert_input: format!("{type_name}InsertInput"),
			update_input: format!("{type_name}UpdateInput"),
			filters: format!("{type_name}Filters"),
			order_by: format!("{type_name}OrderBy"),
			query_many,
			type_name,
		}
	}

	/// The filter input type of one column
	pub fn column_filters(&self, column: &str) -> String {
		format!("{}{}Filters", self.type_name, capitalize(column))
	}

	/// The enum type generated for a column with declared values
	pub fn column_enum(&self, column: &str) -> String {
		format!("{}{}Enum", self.type_name, capitalize(column))
	}
}

/// The member name of the enum value at `index`.
///
/// Values which are not valid GraphQL names fall back to a positional name.
pub fn enum_member(index: usize, value: &str) -> String {
	let valid = value.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
		&& value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
		&& !matches!(value, "true" | "false" | "null");
	match valid {
		true => value.to_owned(),
		false => format!("Option{index}"),
	}
}

/// The object type of a relation field nested below `prefix`
pub fn relation_type(prefix: &str, relation: &str) -> String {
	format!("{prefix}{}Relation", capitalize(relation))
}
