//! Conversions for storage specific column types.

use async_graphql::dynamic::{InputObject, InputValue, Object, TypeRef};
use async_graphql::{Name, Value as GqlValue};

use super::{Conversions, CustomType};
use crate::catalog::ColumnDefinition;
use crate::gql::error::{GqlError, validation_error};
use crate::gql::types::TypeSet;
use crate::gql::utils::{GqlObject, GqlValueUtils, value_field, value_to_gql};
use crate::val::{Number, Value};

pub const PG_GEOMETRY_OBJECT: &str = "PgGeometryObject";
pub const PG_GEOMETRY_OBJECT_INPUT: &str = "PgGeometryObjectInput";

pub(super) fn register_builtin(conv: &mut Conversions) {
	conv.register(
		"PgVector",
		CustomType {
			output: TypeRef::named_nn_list(TypeRef::FLOAT),
			input: TypeRef::named_nn_list(TypeRef::FLOAT),
			register: |_| {},
			to_wire: |_, v, _| value_to_gql(v),
			from_wire: |_, v, c| float_list(v, c).map(Value::Array),
		},
	);
	conv.register(
		"PgGeometry",
		CustomType {
			output: TypeRef::named_nn_list(TypeRef::FLOAT),
			input: TypeRef::named_nn_list(TypeRef::FLOAT),
			register: |_| {},
			to_wire: |_, v, _| match v {
				Value::Object(o) => value_to_gql(Value::Array(vec![
					o.get("x").cloned().unwrap_or_default(),
					o.get("y").cloned().unwrap_or_default(),
				])),
				v => value_to_gql(v),
			},
			from_wire: |_, v, c| match float_list(v, c)? {
				tuple if tuple.len() == 2 => Ok(Value::Array(tuple)),
				_ => Err(tuple_error(c)),
			},
		},
	);
	conv.register(
		PG_GEOMETRY_OBJECT,
		CustomType {
			output: TypeRef::named(PG_GEOMETRY_OBJECT),
			input: TypeRef::named(PG_GEOMETRY_OBJECT_INPUT),
			register: register_point,
			to_wire: |_, v, _| match v {
				Value::Array(mut a) if a.len() == 2 => {
					let y = a.pop().unwrap_or_default();
					let x = a.pop().unwrap_or_default();
					value_to_gql(Value::Object(object! { "x" => x, "y" => y }))
				}
				v => value_to_gql(v),
			},
			from_wire: |_, v, c| {
				let point = v.as_object().and_then(|o| Some((coord(o, "x")?, coord(o, "y")?)));
				match point {
					Some((x, y)) => Ok(Value::Object(object! { "x" => x, "y" => y })),
					None => Err(validation_error(format!(
						"Field '{}' is not a point with numeric x and y!",
						c.name
					))),
				}
			},
		},
	);
}

fn register_point(types: &mut TypeSet) {
	types.register(PG_GEOMETRY_OBJECT, || {
		Object::new(PG_GEOMETRY_OBJECT)
			.field(value_field("x", TypeRef::named_nn(TypeRef::FLOAT)))
			.field(value_field("y", TypeRef::named_nn(TypeRef::FLOAT)))
			.into()
	});
	types.register(PG_GEOMETRY_OBJECT_INPUT, || {
		InputObject::new(PG_GEOMETRY_OBJECT_INPUT)
			.field(InputValue::new("x", TypeRef::named_nn(TypeRef::FLOAT)))
			.field(InputValue::new("y", TypeRef::named_nn(TypeRef::FLOAT)))
			.into()
	});
}

fn coord(o: &GqlObject, key: &str) -> Option<f64> {
	o.get(&Name::new(key)).and_then(GqlValueUtils::as_f64)
}

fn float_list(v: &GqlValue, column: &ColumnDefinition) -> Result<Vec<Value>, GqlError> {
	let Some(items) = v.as_list() else {
		return Err(validation_error(format!("Field '{}' is not an array!", column.name)));
	};
	items
		.iter()
		.map(|i| i.as_f64().map(|f| Value::Number(Number::Float(f))))
		.collect::<Option<Vec<_>>>()
		.ok_or_else(|| tuple_error(column))
}

fn tuple_error(column: &ColumnDefinition) -> GqlError {
	validation_error(format!("Invalid float tuple in field '{}'", column.name))
}
