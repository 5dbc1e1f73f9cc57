use std::collections::BTreeSet;

use async_graphql::dynamic::{Field, InputValue, Object, TypeRef};

use super::GqlEnv;
use super::error::GqlError;
use super::naming::TableNames;
use super::relations::Walker;
use super::resolvers::{OperationKind, make_resolver};
use crate::catalog::TableDefinition;

macro_rules! offset_input {
	() => {
		InputValue::new("offset", TypeRef::named(TypeRef::INT))
	};
}

macro_rules! limit_input {
	() => {
		InputValue::new("limit", TypeRef::named(TypeRef::INT))
	};
}

macro_rules! where_input {
	($names:expr) => {
		InputValue::new("where", TypeRef::named(&$names.filters))
	};
}

/// Adds the query fields of a table, registering its selectable types
pub fn process_table_queries(
	env: &GqlEnv,
	walker: &mut Walker<'_>,
	table: &TableDefinition,
	query: Object,
) -> Result<Object, GqlError> {
	trace!("adding queries for table `{}`", table.name);
	let selectable =
		walker.derive_selectable(table, &TableNames::new(&table.name).type_name, true, 0, &BTreeSet::new())?;
	let names = &selectable.types.names;
	walker.types.register(names.select_item.clone(), || selectable.object(&names.select_item).into());

	let query = query
		.field(
			Field::new(
				&names.query_many,
				TypeRef::named_nn_list_nn(&names.select_item),
				make_resolver(env.clone(), table.id, OperationKind::SelectMany),
			)
			.argument(offset_input!())
			.argument(limit_input!())
			.argument(InputValue::new("orderBy", TypeRef::named(&names.order_by)))
			.argument(where_input!(names)),
		)
		.field(
			Field::new(
				&names.query_single,
				TypeRef::named(&names.select_item),
				make_resolver(env.clone(), table.id, OperationKind::SelectOne),
			)
			.argument(offset_input!())
			.argument(InputValue::new("orderBy", TypeRef::named(&names.order_by)))
			.argument(where_input!(names)),
		);
	Ok(query)
}

/// Adds the mutation fields of a table. The table's types must have been
/// derived already.
pub fn process_table_mutations(
	env: &GqlEnv,
	walker: &mut Walker<'_>,
	table: &TableDefinition,
	mutation: Object,
) -> Result<Object, GqlError> {
	trace!("adding mutations for table `{}`", table.name);
	let types = walker.cache.derive(table, walker.conv, walker.types)?;
	let names = &types.names;

	let mutation = mutation
		.field(
			Field::new(
				&names.insert_many,
				TypeRef::named_nn_list_nn(&names.item),
				make_resolver(env.clone(), table.id, OperationKind::Insert),
			)
			.argument(InputValue::new("values", TypeRef::named_nn_list_nn(&names.insert_input))),
		)
		.field(
			Field::new(
				&names.insert_single,
				TypeRef::named(&names.item),
				make_resolver(env.clone(), table.id, OperationKind::InsertSingle),
			)
			.argument(InputValue::new("values", TypeRef::named_nn(&names.insert_input))),
		)
		.field(
			Field::new(
				&names.update,
				TypeRef::named_nn_list_nn(&names.item),
				make_resolver(env.clone(), table.id, OperationKind::Update),
			)
			.argument(InputValue::new("set", TypeRef::named_nn(&names.update_input)))
			.argument(where_input!(names)),
		)
		.field(
			Field::new(
				&names.delete,
				TypeRef::named_nn_list_nn(&names.item),
				make_resolver(env.clone(), table.id, OperationKind::Delete),
			)
			.argument(where_input!(names)),
		);
	Ok(mutation)
}
