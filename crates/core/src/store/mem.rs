//! An in-memory [`Storage`] implementation.
//!
//! Rows live in per-table vectors behind a single lock. Relations are joined
//! through the `fields` and `references` columns of their definition.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use parking_lot::RwLock;

use crate::catalog::{
	Catalog, ColumnDefault, RelationDefinition, RelationKind, TableDefinition, TableId,
};
use crate::expr::{Columns, Expr, QueryDescriptor, compare_rows};
use crate::store::Storage;
use crate::val::{Number, Object, Value};

#[derive(Debug, Default)]
struct Tables {
	rows: BTreeMap<TableId, Vec<Object>>,
	/// The last value handed out for each incrementing column
	sequences: BTreeMap<(TableId, String), i64>,
}

#[derive(Debug)]
pub struct MemStore {
	catalog: Arc<Catalog>,
	data: RwLock<Tables>,
}

impl MemStore {
	pub fn new(catalog: Arc<Catalog>) -> Self {
		Self {
			catalog,
			data: RwLock::new(Tables::default()),
		}
	}

	/// Stores rows exactly as given, without defaults or key checks
	pub fn load(&self, table: &str, rows: impl IntoIterator<Item = Object>) -> Result<()> {
		let tb = self.table(table)?;
		// Acquire the write lock
		let mut data = self.data.write();
		data.rows.entry(tb.id).or_default().extend(rows);
		Ok(())
	}

	/// A snapshot of every row currently stored in a table
	pub fn rows(&self, table: &str) -> Result<Vec<Object>> {
		let tb = self.table(table)?;
		// Acquire the read lock
		let data = self.data.read();
		Ok(data.rows.get(&tb.id).cloned().unwrap_or_default())
	}

	fn table(&self, name: &str) -> Result<&TableDefinition> {
		self.catalog.table_by_name(name).ok_or_else(|| anyhow!("table `{name}` does not exist"))
	}

	fn select(
		&self,
		data: &Tables,
		table: &TableDefinition,
		query: &QueryDescriptor,
		rows: Vec<&Object>,
	) -> Result<Vec<Object>> {
		let mut matched = Vec::with_capacity(rows.len());
		for row in rows {
			if matches(query.cond.as_ref(), row)? {
				matched.push(row);
			}
		}
		if let Some(order) = &query.order {
			matched.sort_by(|a, b| compare_rows(order, a, b));
		}
		let start = query.start.unwrap_or(0) as usize;
		let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);

		let mut out = Vec::new();
		for row in matched.into_iter().skip(start).take(limit) {
			let mut obj = row.project(query.columns.keys());
			for (name, nested) in query.with.iter() {
				let rel = self.catalog.relation(table.id, name).ok_or_else(|| {
					anyhow!("relation `{name}` does not exist on table `{}`", table.name)
				})?;
				let target = self.catalog.target(rel)?;
				let candidates = data
					.rows
					.get(&target.id)
					.map(|rs| rs.iter().filter(|t| joins(rel, row, t)).collect())
					.unwrap_or_default();
				let related = self.select(data, target, nested, candidates)?;
				let value = match rel.kind {
					RelationKind::One => {
						related.into_iter().next().map(Value::Object).unwrap_or(Value::Null)
					}
					RelationKind::Many => {
						Value::Array(related.into_iter().map(Value::Object).collect())
					}
				};
				obj.insert(name.clone(), value);
			}
			out.push(obj);
		}
		Ok(out)
	}
}

fn matches(cond: Option<&Expr>, row: &Object) -> Result<bool> {
	match cond {
		Some(cond) => cond.evaluate(row),
		None => Ok(true),
	}
}

fn joins(rel: &RelationDefinition, row: &Object, target: &Object) -> bool {
	!rel.fields.is_empty()
		&& rel.fields.iter().zip(rel.references.iter()).all(|(f, r)| {
			match (row.get(f), target.get(r)) {
				(Some(a), Some(b)) => a.equal(b),
				_ => false,
			}
		})
}

/// The last value handed out for an incrementing column, starting from the
/// largest value already stored
fn sequence<'a>(
	sequences: &'a mut BTreeMap<(TableId, String), i64>,
	rows: &[Object],
	table: TableId,
	column: &str,
) -> &'a mut i64 {
	sequences.entry((table, column.to_owned())).or_insert_with(|| {
		rows.iter()
			.filter_map(|r| match r.get(column) {
				Some(Value::Number(n)) => n.as_int(),
				_ => None,
			})
			.max()
			.unwrap_or(0)
	})
}

#[async_trait::async_trait]
impl Storage for MemStore {
	async fn find_many(
		&self,
		table: &TableDefinition,
		query: &QueryDescriptor,
	) -> Result<Vec<Object>> {
		// Acquire the read lock
		let data = self.data.read();
		let rows = data.rows.get(&table.id).map(|r| r.iter().collect()).unwrap_or_default();
		self.select(&data, table, query, rows)
	}

	async fn find_one(
		&self,
		table: &TableDefinition,
		query: &QueryDescriptor,
	) -> Result<Option<Object>> {
		let query = QueryDescriptor {
			limit: Some(1),
			..query.clone()
		};
		Ok(self.find_many(table, &query).await?.into_iter().next())
	}

	async fn insert(
		&self,
		table: &TableDefinition,
		rows: Vec<Object>,
		returning: &Columns,
	) -> Result<Vec<Object>> {
		// Acquire the write lock
		let mut data = self.data.write();
		let Tables {
			rows: stored,
			sequences,
		} = &mut *data;
		let stored = stored.entry(table.id).or_default();
		let mut inserted = Vec::with_capacity(rows.len());
		for mut row in rows {
			// Fill in any declared defaults
			for column in table.columns.values() {
				if let Some(v) = row.get(&column.name).filter(|v| !v.is_nullish()) {
					// Explicit values move the sequence forward
					if let (Some(ColumnDefault::Increment), Value::Number(n)) =
						(&column.default, v)
					{
						if let Some(n) = n.as_int() {
							let seq = sequence(sequences, stored, table.id, &column.name);
							*seq = (*seq).max(n);
						}
					}
					continue;
				}
				let value = match &column.default {
					Some(ColumnDefault::Increment) => {
						let seq = sequence(sequences, stored, table.id, &column.name);
						*seq += 1;
						Value::Number(Number::Int(*seq))
					}
					Some(ColumnDefault::Now) => Value::Datetime(Utc::now()),
					Some(ColumnDefault::Literal(v)) => Value::from_json(v.clone()),
					None if column.not_null => bail!(
						"null value in column \"{}\" of table \"{}\" violates not-null constraint",
						column.name,
						table.name
					),
					None => continue,
				};
				row.insert(column.name.clone(), value);
			}
			// Skip rows conflicting on the primary key
			let pk: Vec<_> = table.primary_key().collect();
			if !pk.is_empty() {
				let conflict = stored.iter().any(|existing| {
					pk.iter().all(|c| match (existing.get(&c.name), row.get(&c.name)) {
						(Some(a), Some(b)) => a.equal(b),
						_ => false,
					})
				});
				if conflict {
					debug!("skipping row conflicting on the primary key of `{}`", table.name);
					continue;
				}
			}
			inserted.push(row.project(returning.keys()));
			stored.push(row);
		}
		Ok(inserted)
	}

	async fn update(
		&self,
		table: &TableDefinition,
		cond: Option<&Expr>,
		set: Object,
		returning: &Columns,
	) -> Result<Vec<Object>> {
		// Acquire the write lock
		let mut data = self.data.write();
		let rows = data.rows.entry(table.id).or_default();
		let hits = rows.iter().map(|r| matches(cond, r)).collect::<Result<Vec<_>>>()?;
		let mut updated = Vec::new();
		for (row, hit) in rows.iter_mut().zip(hits) {
			if hit {
				for (k, v) in set.iter() {
					row.insert(k.clone(), v.clone());
				}
				updated.push(row.project(returning.keys()));
			}
		}
		Ok(updated)
	}

	async fn delete(
		&self,
		table: &TableDefinition,
		cond: Option<&Expr>,
		returning: &Columns,
	) -> Result<Vec<Object>> {
		// Acquire the write lock
		let mut data = self.data.write();
		let rows = data.rows.entry(table.id).or_default();
		let hits = rows.iter().map(|r| matches(cond, r)).collect::<Result<Vec<_>>>()?;
		let mut kept = Vec::with_capacity(rows.len());
		let mut deleted = Vec::new();
		for (row, hit) in rows.drain(..).zip(hits) {
			if hit {
				deleted.push(row.project(returning.keys()));
			} else {
				kept.push(row);
			}
		}
		*rows = kept;
		Ok(deleted)
	}
}
