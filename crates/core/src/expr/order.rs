use std::fmt;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum OrderDirection {
	#[default]
	Ascending,
	Descending,
}

/// A single column ordering
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Order {
	pub column: String,
	pub direction: OrderDirection,
}

impl Order {
	pub fn asc(column: impl Into<String>) -> Self {
		Self {
			column: column.into(),
			direction: OrderDirection::Ascending,
		}
	}

	pub fn desc(column: impl Into<String>) -> Self {
		Self {
			column: column.into(),
			direction: OrderDirection::Descending,
		}
	}
}

impl fmt::Display for Order {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.direction {
			OrderDirection::Ascending => write!(f, "{} ASC", self.column),
			OrderDirection::Descending => write!(f, "{} DESC", self.column),
		}
	}
}
