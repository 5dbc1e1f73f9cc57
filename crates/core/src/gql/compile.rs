//! Compilation of requested selections and their arguments into
//! [`QueryDescriptor`]s.

use async_graphql::dynamic::indexmap::IndexMap;
use async_graphql::{Name, SelectionField, Value as GqlValue};

use super::error::{GqlError, filter_error, resolver_error, validation_error};
use super::remap::Conversions;
use super::utils::{GqlObject, GqlValueUtils};
use crate::catalog::{Catalog, ColumnDefinition, TableDefinition};
use crate::expr::{BinaryOperator, Columns, Expr, Order, OrderDirection, QueryDescriptor};
use crate::val::Value;

/// An owned copy of a requested field, its arguments and its sub-selection
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
	pub name: String,
	pub arguments: GqlObject,
	pub fields: Vec<Selection>,
}

impl Selection {
	/// Captures a field from the executing request. Variables in arguments
	/// are resolved, and fragments are flattened into the sub-selection.
	pub fn from_field(field: SelectionField<'_>) -> Result<Self, GqlError> {
		let arguments = field
			.arguments()
			.map_err(|e| resolver_error(e.message))?
			.into_iter()
			.collect();
		let fields = field.selection_set().map(Selection::from_field).collect::<Result<_, _>>()?;
		Ok(Self {
			name: field.name().to_owned(),
			arguments,
			fields,
		})
	}

	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	pub fn argument(mut self, name: &str, value: GqlValue) -> Self {
		self.arguments.insert(Name::new(name), value);
		self
	}

	pub fn field(mut self, field: Selection) -> Self {
		self.fields.push(field);
		self
	}

	pub fn fields<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
		self.fields.extend(names.into_iter().map(Selection::new));
		self
	}

	/// The first sub-selection of the given field
	pub fn get(&self, name: &str) -> Option<&Selection> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// A non-null argument
	pub fn arg(&self, name: &str) -> Option<&GqlValue> {
		self.arguments.get(name).and_then(GqlValueUtils::non_null)
	}
}

/// The selected columns of a table.
///
/// Falls back to the first column of the table when only relation fields
/// were selected, since storage needs at least one column to read.
pub fn extract_columns(table: &TableDefinition, selection: &Selection) -> Columns {
	let mut columns: Columns = selection
		.fields
		.iter()
		.filter(|f| table.column(&f.name).is_some())
		.map(|f| (f.name.clone(), true))
		.collect();
	if columns.is_empty() {
		if let Some(first) = table.first_column() {
			columns.insert(first.name.clone(), true);
		}
	}
	columns
}

/// Compiles an order argument into a column ordering, highest priority
/// first. Columns of equal priority keep the order they were given in.
pub fn compile_order(table: &TableDefinition, order: &GqlObject) -> Result<Vec<Order>, GqlError> {
	let mut entries = Vec::with_capacity(order.len());
	for (key, config) in order {
		let Some(config) = config.non_null() else {
			continue;
		};
		if table.column(key.as_str()).is_none() {
			return Err(GqlError::UnknownField(key.to_string()));
		}
		let config = config.as_object();
		let direction = config
			.and_then(|c| c.get("direction"))
			.and_then(GqlValueUtils::as_string)
			.and_then(|d| match d.as_str() {
				"asc" => Some(OrderDirection::Ascending),
				"desc" => Some(OrderDirection::Descending),
				_ => None,
			});
		let priority = config.and_then(|c| c.get("priority")).and_then(GqlValueUtils::as_i64);
		let (Some(direction), Some(priority)) = (direction, priority) else {
			return Err(validation_error(format!("Invalid order for column '{key}'")));
		};
		entries.push((
			priority,
			Order {
				column: key.to_string(),
				direction,
			},
		));
	}
	entries.sort_by(|a, b| b.0.cmp(&a.0));
	Ok(entries.into_iter().map(|(_, order)| order).collect())
}

/// Splits the `OR` entry from the populated entries of a filter object. An
/// empty `OR` list counts as absent.
fn split_or(filters: &GqlObject) -> (Option<&GqlValue>, usize) {
	let or = filters
		.get("OR")
		.and_then(GqlValueUtils::non_null)
		.filter(|v| v.as_list().is_none_or(|l| !l.is_empty()));
	let populated =
		filters.iter().filter(|(k, v)| k.as_str() != "OR" && v.non_null().is_some()).count();
	(or, populated)
}

fn alternatives<'a>(
	or: &'a GqlValue,
	context: &str,
) -> Result<impl Iterator<Item = Result<&'a GqlObject, GqlError>>, GqlError> {
	let list = or
		.as_list()
		.ok_or_else(|| filter_error(format!("WHERE {context}: 'OR' must be a list of filters!")))?;
	let context = context.to_owned();
	Ok(list.iter().map(move |alt| {
		alt.as_object()
			.ok_or_else(|| filter_error(format!("WHERE {context}: 'OR' must be a list of filters!")))
	}))
}

/// Compiles the filter argument of a table
pub fn compile_filters(
	conv: &Conversions,
	table: &TableDefinition,
	filters: &GqlObject,
) -> Result<Option<Expr>, GqlError> {
	let (or, populated) = split_or(filters);
	if let Some(or) = or {
		if populated > 0 {
			return Err(filter_error(format!(
				"WHERE {}: Cannot specify both fields and 'OR' in table filters!",
				table.name
			)));
		}
		let mut exprs = Vec::new();
		for alt in alternatives(or, &table.name)? {
			if let Some(expr) = compile_filters(conv, table, alt?)? {
				exprs.push(expr);
			}
		}
		return Ok(Expr::or(exprs));
	}

	let mut exprs = Vec::new();
	for (key, ops) in filters {
		let Some(ops) = ops.non_null() else {
			continue;
		};
		let Some(column) = table.column(key.as_str()) else {
			return Err(GqlError::UnknownField(key.to_string()));
		};
		let Some(ops) = ops.as_object() else {
			return Err(filter_error(format!("WHERE {key}: Expected an object of operators!")));
		};
		if let Some(expr) = compile_column_filters(conv, column, ops)? {
			exprs.push(expr);
		}
	}
	Ok(Expr::and(exprs))
}

/// Compiles the operators given for one column
pub fn compile_column_filters(
	conv: &Conversions,
	column: &ColumnDefinition,
	ops: &GqlObject,
) -> Result<Option<Expr>, GqlError> {
	let name = &column.name;
	let (or, populated) = split_or(ops);
	if let Some(or) = or {
		if populated > 0 {
			return Err(filter_error(format!(
				"WHERE {name}: Cannot specify both fields and 'OR' in column operators!"
			)));
		}
		let mut exprs = Vec::new();
		for alt in alternatives(or, name)? {
			if let Some(expr) = compile_column_filters(conv, column, alt?)? {
				exprs.push(expr);
			}
		}
		return Ok(Expr::or(exprs));
	}

	let mut exprs = Vec::new();
	for (op, value) in ops {
		// null and false both leave the operator unrequested
		let Some(value) = value.non_null().filter(|v| !matches!(v, GqlValue::Boolean(false))) else {
			continue;
		};
		let expr = match op.as_str() {
			"eq" => binary(conv, column, BinaryOperator::Equal, value)?,
			"ne" => binary(conv, column, BinaryOperator::NotEqual, value)?,
			"lt" => binary(conv, column, BinaryOperator::LessThan, value)?,
			"lte" => binary(conv, column, BinaryOperator::LessThanEqual, value)?,
			"gt" => binary(conv, column, BinaryOperator::MoreThan, value)?,
			"gte" => binary(conv, column, BinaryOperator::MoreThanEqual, value)?,
			"like" => pattern(column, BinaryOperator::Like, value)?,
			"notLike" => pattern(column, BinaryOperator::NotLike, value)?,
			"ilike" => pattern(column, BinaryOperator::ILike, value)?,
			"notIlike" => pattern(column, BinaryOperator::NotILike, value)?,
			op @ ("inArray" | "notInArray") => {
				let items = value.as_list().ok_or_else(|| {
					filter_error(format!("WHERE {name}: Operator {op} expects an array!"))
				})?;
				if items.is_empty() {
					return Err(filter_error(format!(
						"WHERE {name}: Unable to use operator {op} with an empty array!"
					)));
				}
				let values =
					items.iter().map(|v| conv.from_wire(v, column)).collect::<Result<_, _>>()?;
				match op {
					"inArray" => Expr::Inside {
						column: name.clone(),
						values,
					},
					_ => Expr::NotInside {
						column: name.clone(),
						values,
					},
				}
			}
			"isNull" => Expr::IsNull(name.clone()),
			"isNotNull" => Expr::IsNotNull(name.clone()),
			op => {
				return Err(filter_error(format!("WHERE {name}: Unknown operator {op}!")));
			}
		};
		exprs.push(expr);
	}
	Ok(Expr::and(exprs))
}

fn binary(
	conv: &Conversions,
	column: &ColumnDefinition,
	op: BinaryOperator,
	value: &GqlValue,
) -> Result<Expr, GqlError> {
	Ok(Expr::binary(&column.name, op, conv.from_wire(value, column)?))
}

fn pattern(column: &ColumnDefinition, op: BinaryOperator, value: &GqlValue) -> Result<Expr, GqlError> {
	match value.as_string() {
		Some(s) => Ok(Expr::binary(&column.name, op, Value::Strand(s))),
		None => Err(filter_error(format!("WHERE {}: Operator {op} expects a string!", column.name))),
	}
}

fn pagination(selection: &Selection, key: &str) -> Result<Option<u64>, GqlError> {
	let Some(value) = selection.arg(key) else {
		return Ok(None);
	};
	value
		.as_i64()
		.and_then(|v| u64::try_from(v).ok())
		.map(Some)
		.ok_or_else(|| resolver_error(format!("`{key}` must be a non-negative integer")))
}

/// Compiles a selection of `table` and its arguments into a descriptor,
/// recursing into every selected relation
pub fn compile_query(
	catalog: &Catalog,
	conv: &Conversions,
	table: &TableDefinition,
	selection: &Selection,
) -> Result<QueryDescriptor, GqlError> {
	let order = match selection.arg("orderBy") {
		Some(GqlValue::Object(order)) => Some(compile_order(table, order)?),
		Some(_) => return Err(validation_error("`orderBy` must be an object")),
		None => None,
	};
	let cond = match selection.arg("where") {
		Some(GqlValue::Object(filters)) => compile_filters(conv, table, filters)?,
		Some(_) => return Err(validation_error("`where` must be an object")),
		None => None,
	};
	Ok(QueryDescriptor {
		columns: extract_columns(table, selection),
		cond,
		order: order.filter(|o| !o.is_empty()),
		start: pagination(selection, "offset")?,
		limit: pagination(selection, "limit")?,
		with: extract_relations(catalog, conv, table, selection)?,
	})
}

/// Compiles the selected relation fields of `table`. Relations which were
/// not selected are left out entirely.
pub fn extract_relations(
	catalog: &Catalog,
	conv: &Conversions,
	table: &TableDefinition,
	selection: &Selection,
) -> Result<IndexMap<String, QueryDescriptor>, GqlError> {
	let mut with = IndexMap::new();
	for rel in catalog.relations(table.id) {
		let Some(field) = selection.get(&rel.name) else {
			continue;
		};
		let target = catalog.target(rel)?;
		with.insert(rel.name.clone(), compile_query(catalog, conv, target, field)?);
	}
	Ok(with)
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use serde_json::json;

	use super::*;
	use crate::catalog::{Kind, RelationDefinition, SchemaDefinition};

	fn catalog() -> Catalog {
		let def = SchemaDefinition::default()
			.table(
				"users",
				[
					ColumnDefinition::new("id", Kind::Number, "PgInteger").primary(),
					ColumnDefinition::new("name", Kind::String, "PgText").not_null(),
					ColumnDefinition::new("age", Kind::Number, "PgInteger"),
					ColumnDefinition::new("born", Kind::Date, "PgDate"),
					ColumnDefinition::new("active", Kind::Boolean, "PgBoolean"),
				],
			)
			.table(
				"posts",
				[
					ColumnDefinition::new("id", Kind::Number, "PgInteger").primary(),
					ColumnDefinition::new("authorId", Kind::Number, "PgInteger"),
					ColumnDefinition::new("title", Kind::String, "PgText"),
				],
			)
			.relation("users", "posts", RelationDefinition::many("posts").on(["id"], ["authorId"]));
		Catalog::new(def).unwrap()
	}

	fn object(json: serde_json::Value) -> GqlObject {
		match GqlValue::from_json(json).unwrap() {
			GqlValue::Object(o) => o,
			v => panic!("expected an object, found {v}"),
		}
	}

	fn column_filters(json: serde_json::Value) -> Result<Option<Expr>, GqlError> {
		let catalog = catalog();
		let age = catalog.table_by_name("users").unwrap().column("age").unwrap().clone();
		compile_column_filters(&Conversions::default(), &age, &object(json))
	}

	#[test]
	fn columns_fall_back_to_first() {
		let catalog = catalog();
		let users = catalog.table_by_name("users").unwrap();
		let selection = Selection::new("users").fields(["name", "__typename"]);
		assert_eq!(extract_columns(users, &selection), Columns::from([("name".into(), true)]));
		let selection = Selection::new("users").field(Selection::new("posts").fields(["title"]));
		assert_eq!(extract_columns(users, &selection), Columns::from([("id".into(), true)]));
	}

	#[test]
	fn order_by_descending_priority() {
		let catalog = catalog();
		let users = catalog.table_by_name("users").unwrap();
		let order = object(json!({
			"name": { "direction": "asc", "priority": 1 },
			"age": { "direction": "desc", "priority": 5 },
			"id": null,
		}));
		assert_eq!(compile_order(users, &order).unwrap(), [Order::desc("age"), Order::asc("name")]);
	}

	#[test]
	fn order_ties_keep_given_order() {
		let catalog = catalog();
		let users = catalog.table_by_name("users").unwrap();
		let mut order = GqlObject::new();
		for column in ["born", "id", "name"] {
			let mut config = GqlObject::new();
			config.insert(Name::new("direction"), GqlValue::Enum(Name::new("asc")));
			config.insert(Name::new("priority"), GqlValue::Number(1.into()));
			order.insert(Name::new(column), GqlValue::Object(config));
		}
		assert_eq!(
			compile_order(users, &order).unwrap(),
			[Order::asc("born"), Order::asc("id"), Order::asc("name")]
		);
	}

	#[rstest]
	#[case::eq(json!({ "eq": 5 }), "age = 5")]
	#[case::several(json!({ "gte": 18, "lt": 65 }), "(age >= 18 AND age < 65)")]
	#[case::skipped(json!({ "eq": null, "isNull": false }), "")]
	#[case::is_null(json!({ "isNull": true }), "age IS NULL")]
	#[case::in_array(json!({ "inArray": [1, 2] }), "age IN [1, 2]")]
	#[case::not_in_array(json!({ "notInArray": [3] }), "age NOT IN [3]")]
	#[case::or_alone(json!({ "OR": [{ "eq": 5 }] }), "age = 5")]
	#[case::or_many(json!({ "OR": [{ "eq": 5 }, { "gt": 10 }, {}] }), "(age = 5 OR age > 10)")]
	#[case::or_empty(json!({ "OR": [{ "eq": null }] }), "")]
	#[case::or_null(json!({ "OR": null, "eq": 1 }), "age = 1")]
	#[case::or_empty_list(json!({ "eq": 5, "OR": [] }), "age = 5")]
	fn column_filter_cases(#[case] filters: serde_json::Value, #[case] expected: &str) {
		let compiled = column_filters(filters).unwrap();
		assert_eq!(compiled.map(|e| e.to_string()).unwrap_or_default(), expected);
	}

	#[rstest]
	#[case::eq_true(json!({ "eq": true }), "active = true")]
	#[case::false_skipped(json!({ "eq": false, "like": false }), "")]
	#[case::false_beside_true(json!({ "ne": false, "isNotNull": true }), "active IS NOT NULL")]
	fn boolean_filter_cases(#[case] filters: serde_json::Value, #[case] expected: &str) {
		let catalog = catalog();
		let active = catalog.table_by_name("users").unwrap().column("active").unwrap().clone();
		let compiled = compile_column_filters(&Conversions::default(), &active, &object(filters));
		assert_eq!(compiled.unwrap().map(|e| e.to_string()).unwrap_or_default(), expected);
	}

	#[test]
	fn empty_table_or_is_absent() {
		let catalog = catalog();
		let users = catalog.table_by_name("users").unwrap();
		let filters = object(json!({ "age": { "gt": 1 }, "OR": [] }));
		let compiled = compile_filters(&Conversions::default(), users, &filters).unwrap();
		assert_eq!(compiled.unwrap().to_string(), "age > 1");
	}

	#[rstest]
	#[case::fields_and_or(
		json!({ "eq": 5, "OR": [{ "eq": 6 }] }),
		"WHERE age: Cannot specify both fields and 'OR' in column operators!"
	)]
	#[case::empty_in(json!({ "inArray": [] }), "WHERE age: Unable to use operator inArray with an empty array!")]
	#[case::empty_not_in(
		json!({ "notInArray": [] }),
		"WHERE age: Unable to use operator notInArray with an empty array!"
	)]
	fn column_filter_errors(#[case] filters: serde_json::Value, #[case] message: &str) {
		let err = column_filters(filters).unwrap_err();
		assert!(matches!(err, GqlError::InvalidFilter(_)));
		assert_eq!(err.to_string(), message);
	}

	#[test]
	fn filter_values_are_converted() {
		let catalog = catalog();
		let users = catalog.table_by_name("users").unwrap();
		let conv = Conversions::default();
		let filters = object(json!({ "born": { "gt": "2000-01-01" } }));
		let compiled = compile_filters(&conv, users, &filters).unwrap().unwrap();
		assert_eq!(compiled.to_string(), r#"born > d"2000-01-01T00:00:00Z""#);
		let filters = object(json!({ "born": { "gt": "soon" } }));
		assert!(matches!(compile_filters(&conv, users, &filters), Err(GqlError::Validation(_))));
	}

	#[test]
	fn table_filters() {
		let catalog = catalog();
		let users = catalog.table_by_name("users").unwrap();
		let conv = Conversions::default();
		let filters = object(json!({ "age": { "gte": 18 }, "name": { "like": "A%" } }));
		let compiled = compile_filters(&conv, users, &filters).unwrap().unwrap();
		assert_eq!(compiled.to_string(), "(age >= 18 AND name LIKE \"A%\")");

		let filters = object(json!({ "OR": [{ "age": { "lt": 5 } }, { "age": { "gt": 90 } }] }));
		let compiled = compile_filters(&conv, users, &filters).unwrap().unwrap();
		assert_eq!(compiled.to_string(), "(age < 5 OR age > 90)");

		let filters = object(json!({ "age": { "lt": 5 }, "OR": [{ "age": { "gt": 90 } }] }));
		let err = compile_filters(&conv, users, &filters).unwrap_err();
		assert_eq!(err.to_string(), "WHERE users: Cannot specify both fields and 'OR' in table filters!");

		let filters = object(json!({ "email": { "eq": "x" } }));
		let err = compile_filters(&conv, users, &filters).unwrap_err();
		assert_eq!(err.to_string(), "Unknown column: email");
	}

	#[test]
	fn compiles_nested_relations() {
		let catalog = catalog();
		let users = catalog.table_by_name("users").unwrap();
		let conv = Conversions::default();
		let selection = Selection::new("users")
			.argument("where", GqlValue::from_json(json!({ "age": { "gte": 18 } })).unwrap())
			.argument(
				"orderBy",
				GqlValue::from_json(json!({ "name": { "direction": "asc", "priority": 1 } }))
					.unwrap(),
			)
			.argument("limit", GqlValue::Number(2.into()))
			.fields(["id", "name"])
			.field(
				Selection::new("posts")
					.argument("limit", GqlValue::Number(1.into()))
					.argument("offset", GqlValue::Null)
					.fields(["title"]),
			);
		let query = compile_query(&catalog, &conv, users, &selection).unwrap();
		assert_eq!(
			query.to_string(),
			"SELECT id, name, posts: (SELECT title LIMIT 1) WHERE age >= 18 ORDER BY name ASC LIMIT 2"
		);
		let unselected = Selection::new("users").fields(["id"]);
		assert!(compile_query(&catalog, &conv, users, &unselected).unwrap().with.is_empty());
	}

	#[test]
	fn negative_pagination_fails() {
		let catalog = catalog();
		let users = catalog.table_by_name("users").unwrap();
		let selection = Selection::new("users").argument("offset", GqlValue::Number((-1).into()));
		let err = compile_query(&catalog, &Conversions::default(), users, &selection).unwrap_err();
		assert_eq!(err.to_string(), "Error resolving request: `offset` must be a non-negative integer");
	}
}
