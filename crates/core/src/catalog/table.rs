use indexmap::IndexMap;

use crate::catalog::ColumnDefinition;

/// A stable identity assigned to every table when a schema is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableId(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub struct TableDefinition {
	pub id: TableId,
	pub name: String,
	/// The columns of the table, in declaration order
	pub columns: IndexMap<String, ColumnDefinition>,
}

impl TableDefinition {
	pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
		self.columns.get(name)
	}

	/// The first declared column
	pub fn first_column(&self) -> Option<&ColumnDefinition> {
		self.columns.first().map(|(_, c)| c)
	}

	/// The columns which form the primary key
	pub fn primary_key(&self) -> impl Iterator<Item = &ColumnDefinition> {
		self.columns.values().filter(|c| c.primary)
	}
}
