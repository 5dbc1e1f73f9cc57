//! Resolvers of the generated query and mutation fields.
//!
//! Every resolver captures its selection, parses it into an [`Operation`],
//! performs exactly one storage call and converts the result back to the
//! wire. Failures of any kind reach the client as a query error carrying the
//! failure's message.

use async_graphql::Value as GqlValue;
use async_graphql::dynamic::{FieldFuture, ResolverContext};

use super::GqlEnv;
use super::compile::{Selection, compile_filters, compile_query, extract_columns};
use super::error::{GqlError, internal_error, validation_error};
use super::utils::{GqlValueUtils, to_field_value};
use crate::catalog::{TableDefinition, TableId};
use crate::expr::{Columns, Expr, QueryDescriptor};
use crate::val::Object;

/// Which generated field a resolver serves
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationKind {
	SelectMany,
	SelectOne,
	Insert,
	InsertSingle,
	Update,
	Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectArgs {
	pub query: QueryDescriptor,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InsertArgs {
	pub rows: Vec<Object>,
	pub returning: Columns,
	/// Whether a single row, rather than a list, is returned
	pub single: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateArgs {
	pub set: Object,
	pub cond: Option<Expr>,
	pub returning: Columns,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeleteArgs {
	pub cond: Option<Expr>,
	pub returning: Columns,
}

/// A parsed request against one table
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
	SelectMany(SelectArgs),
	SelectOne(SelectArgs),
	Insert(InsertArgs),
	Update(UpdateArgs),
	Delete(DeleteArgs),
}

impl Operation {
	/// Parses the arguments and selection of a request, checking everything
	/// that can fail before storage is called
	pub fn parse(
		env: &GqlEnv,
		table: &TableDefinition,
		kind: OperationKind,
		selection: &Selection,
	) -> Result<Self, GqlError> {
		let conv = env.conversions.as_ref();
		let cond = || match selection.arg("where") {
			Some(GqlValue::Object(filters)) => compile_filters(conv, table, filters),
			Some(_) => Err(validation_error("`where` must be an object")),
			None => Ok(None),
		};
		let op = match kind {
			OperationKind::SelectMany => Operation::SelectMany(SelectArgs {
				query: compile_query(&env.catalog, conv, table, selection)?,
			}),
			OperationKind::SelectOne => {
				let mut query = compile_query(&env.catalog, conv, table, selection)?;
				query.limit = None;
				Operation::SelectOne(SelectArgs {
					query,
				})
			}
			OperationKind::Insert | OperationKind::InsertSingle => {
				let single = kind == OperationKind::InsertSingle;
				let values = match selection.arg("values") {
					Some(GqlValue::List(values)) if !single => values.iter().collect(),
					Some(value @ GqlValue::Object(_)) if single => vec![value],
					Some(_) => return Err(validation_error("`values` has the wrong shape")),
					None => Vec::new(),
				};
				if values.is_empty() {
					return Err(GqlError::EmptyInput);
				}
				let rows = values
					.into_iter()
					.map(|v| match v.as_object() {
						Some(o) => conv.row_from_wire(table, o),
						None => Err(validation_error("`values` must only contain objects")),
					})
					.collect::<Result<_, _>>()?;
				Operation::Insert(InsertArgs {
					rows,
					returning: extract_columns(table, selection),
					single,
				})
			}
			OperationKind::Update => {
				let set = match selection.arg("set").and_then(GqlValueUtils::as_object) {
					Some(set) => conv.row_from_wire(table, set)?,
					None => Object::default(),
				};
				if set.is_empty() {
					return Err(GqlError::EmptyUpdate);
				}
				Operation::Update(UpdateArgs {
					set,
					cond: cond()?,
					returning: extract_columns(table, selection),
				})
			}
			OperationKind::Delete => Operation::Delete(DeleteArgs {
				cond: cond()?,
				returning: extract_columns(table, selection),
			}),
		};
		Ok(op)
	}

	/// Performs the operation's storage call, returning the wire result
	pub async fn execute(self, env: &GqlEnv, table: &TableDefinition) -> Result<GqlValue, GqlError> {
		let conv = env.conversions.as_ref();
		let storage = env.storage.as_ref();
		match self {
			Operation::SelectMany(args) => {
				trace!("compiled query on `{}`: {}", table.name, args.query);
				let rows = storage.find_many(table, &args.query).await?;
				conv.rows_to_wire(&env.catalog, table, rows)
			}
			Operation::SelectOne(args) => {
				trace!("compiled query on `{}`: {}", table.name, args.query);
				match storage.find_one(table, &args.query).await? {
					Some(row) => conv.row_to_wire(&env.catalog, table, row),
					None => Ok(GqlValue::Null),
				}
			}
			Operation::Insert(args) => {
				let rows = storage.insert(table, args.rows, &args.returning).await?;
				match args.single {
					true => match rows.into_iter().next() {
						Some(row) => conv.row_to_wire(&env.catalog, table, row),
						None => Ok(GqlValue::Null),
					},
					false => conv.rows_to_wire(&env.catalog, table, rows),
				}
			}
			Operation::Update(args) => {
				let rows =
					storage.update(table, args.cond.as_ref(), args.set, &args.returning).await?;
				conv.rows_to_wire(&env.catalog, table, rows)
			}
			Operation::Delete(args) => {
				let rows = storage.delete(table, args.cond.as_ref(), &args.returning).await?;
				conv.rows_to_wire(&env.catalog, table, rows)
			}
		}
	}
}

/// Parses and executes one request
pub async fn resolve(
	env: &GqlEnv,
	table: TableId,
	kind: OperationKind,
	selection: &Selection,
) -> Result<GqlValue, GqlError> {
	let table = env
		.catalog
		.table(table)
		.ok_or_else(|| internal_error(format!("table {table:?} is not in the catalog")))?;
	trace!("received {kind:?} request on `{}` with args: {:?}", table.name, selection.arguments);
	let op = Operation::parse(env, table, kind, selection)?;
	op.execute(env, table).await
}

/// Builds the resolver of one generated field
pub fn make_resolver(
	env: GqlEnv,
	table: TableId,
	kind: OperationKind,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static {
	move |ctx: ResolverContext| {
		let env = env.clone();
		FieldFuture::new(async move {
			let selection = Selection::from_field(ctx.ctx.field())
				.map_err(|e| async_graphql::Error::new(e.to_string()))?;
			match resolve(&env, table, kind, &selection).await {
				Ok(GqlValue::Null) => Ok(None),
				Ok(out) => Ok(Some(to_field_value(out))),
				Err(e) => {
					debug!("{kind:?} request failed: {e}");
					Err(async_graphql::Error::new(e.to_string()))
				}
			}
		})
	}
}
