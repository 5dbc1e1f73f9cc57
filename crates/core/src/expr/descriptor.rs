use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;

use crate::expr::{Expr, Order};

/// The set of selected columns, each mapped to `true`
pub type Columns = BTreeMap<String, bool>;

/// A normalised, backend agnostic description of one read.
///
/// Descriptors are built fresh for every request and nest through `with`
/// for each selected relation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryDescriptor {
	pub columns: Columns,
	pub cond: Option<Expr>,
	pub order: Option<Vec<Order>>,
	pub start: Option<u64>,
	pub limit: Option<u64>,
	/// Relation name to the descriptor of the related rows
	pub with: IndexMap<String, QueryDescriptor>,
}

impl fmt::Display for QueryDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("SELECT ")?;
		for (i, c) in self.columns.keys().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			f.write_str(c)?;
		}
		for (name, nested) in self.with.iter() {
			write!(f, ", {name}: ({nested})")?;
		}
		if let Some(cond) = &self.cond {
			write!(f, " WHERE {cond}")?;
		}
		if let Some(order) = self.order.as_ref().filter(|o| !o.is_empty()) {
			f.write_str(" ORDER BY ")?;
			for (i, o) in order.iter().enumerate() {
				if i > 0 {
					f.write_str(", ")?;
				}
				write!(f, "{o}")?;
			}
		}
		if let Some(limit) = self.limit {
			write!(f, " LIMIT {limit}")?;
		}
		if let Some(start) = self.start {
			write!(f, " START {start}")?;
		}
		Ok(())
	}
}
