//! The storage capability the generated resolvers call into.

use std::fmt::Debug;

use anyhow::Result;

use crate::catalog::TableDefinition;
use crate::expr::{Columns, Expr, QueryDescriptor};
use crate::val::Object;

pub mod mem;

/// Executes compiled reads and writes against a storage engine.
///
/// Every resolver invocation performs exactly one call on this trait. Rows
/// returned from reads carry the selected columns, plus one field per
/// relation named in [`QueryDescriptor::with`], holding an object (or null)
/// for singular relations and a list of objects for plural ones.
#[async_trait::async_trait]
pub trait Storage: Debug + Send + Sync + 'static {
	/// Fetches every row matching the descriptor
	async fn find_many(&self, table: &TableDefinition, query: &QueryDescriptor)
	-> Result<Vec<Object>>;

	/// Fetches the first row matching the descriptor
	async fn find_one(&self, table: &TableDefinition, query: &QueryDescriptor)
	-> Result<Option<Object>>;

	/// Inserts rows, returning the requested columns of each inserted row.
	///
	/// Rows which conflict with an existing primary key are skipped, so fewer
	/// rows than were provided may be returned.
	async fn insert(
		&self,
		table: &TableDefinition,
		rows: Vec<Object>,
		returning: &Columns,
	) -> Result<Vec<Object>>;

	/// Applies `set` to every row matching `cond`, returning the updated rows
	async fn update(
		&self,
		table: &TableDefinition,
		cond: Option<&Expr>,
		set: Object,
		returning: &Columns,
	) -> Result<Vec<Object>>;

	/// Removes every row matching `cond`, returning the removed rows
	async fn delete(
		&self,
		table: &TableDefinition,
		cond: Option<&Expr>,
		returning: &Columns,
	) -> Result<Vec<Object>>;
}
