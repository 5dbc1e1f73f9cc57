use async_graphql::dynamic::indexmap::IndexMap;
use async_graphql::dynamic::{Field, FieldFuture, FieldValue, ResolverContext, TypeRef};
use async_graphql::{Name, Number as GqlNumber, Value as GqlValue};
use chrono::SecondsFormat;

use super::error::{GqlError, resolver_error};
use crate::val::{Number, Object, Value};

/// An input or output object on the wire
pub type GqlObject = IndexMap<Name, GqlValue>;

pub(crate) trait GqlValueUtils {
	fn as_i64(&self) -> Option<i64>;
	fn as_f64(&self) -> Option<f64>;
	fn as_bool(&self) -> Option<bool>;
	fn as_string(&self) -> Option<String>;
	fn as_list(&self) -> Option<&Vec<GqlValue>>;
	fn as_object(&self) -> Option<&GqlObject>;
	/// Treats an explicit null the same as an absent value
	fn non_null(&self) -> Option<&GqlValue>;
}

impl GqlValueUtils for GqlValue {
	fn as_i64(&self) -> Option<i64> {
		if let GqlValue::Number(n) = self {
			n.as_i64()
		} else {
			None
		}
	}

	fn as_f64(&self) -> Option<f64> {
		if let GqlValue::Number(n) = self {
			n.as_f64()
		} else {
			None
		}
	}

	fn as_bool(&self) -> Option<bool> {
		if let GqlValue::Boolean(b) = self {
			Some(*b)
		} else {
			None
		}
	}

	fn as_string(&self) -> Option<String> {
		match self {
			GqlValue::String(s) => Some(s.to_owned()),
			GqlValue::Enum(e) => Some(e.to_string()),
			_ => None,
		}
	}

	fn as_list(&self) -> Option<&Vec<GqlValue>> {
		if let GqlValue::List(a) = self {
			Some(a)
		} else {
			None
		}
	}

	fn as_object(&self) -> Option<&GqlObject> {
		if let GqlValue::Object(o) = self {
			Some(o)
		} else {
			None
		}
	}

	fn non_null(&self) -> Option<&GqlValue> {
		match self {
			GqlValue::Null => None,
			v => Some(v),
		}
	}
}

/// Converts a storage value into a wire value, structurally
pub fn value_to_gql(v: Value) -> Result<GqlValue, GqlError> {
	let out = match v {
		Value::None | Value::Null => GqlValue::Null,
		Value::Bool(b) => GqlValue::Boolean(b),
		Value::Number(Number::Int(i)) => GqlValue::Number(i.into()),
		Value::Number(Number::Float(f)) => GqlValue::Number(
			GqlNumber::from_f64(f)
				.ok_or_else(|| resolver_error("unimplemented: graceful NaN and Inf handling"))?,
		),
		Value::BigInt(i) => GqlValue::String(i.to_string()),
		Value::Strand(s) => GqlValue::String(s),
		Value::Datetime(d) => GqlValue::String(d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
		Value::Bytes(b) => GqlValue::List(b.into_iter().map(|b| GqlValue::Number(b.into())).collect()),
		Value::Array(a) => GqlValue::List(a.into_iter().map(value_to_gql).collect::<Result<_, _>>()?),
		Value::Object(o) => object_to_gql(o)?,
	};
	Ok(out)
}

fn object_to_gql(o: Object) -> Result<GqlValue, GqlError> {
	let mut out = GqlObject::with_capacity(o.len());
	for (k, v) in o {
		out.insert(Name::new(k), value_to_gql(v)?);
	}
	Ok(GqlValue::Object(out))
}

/// Converts a wire value into a storage value, structurally
pub fn gql_to_value(v: &GqlValue) -> Value {
	match v {
		GqlValue::Null => Value::Null,
		GqlValue::Boolean(b) => Value::Bool(*b),
		GqlValue::Number(n) => match n.as_i64() {
			Some(i) => Value::Number(Number::Int(i)),
			None => Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN))),
		},
		GqlValue::String(s) => Value::Strand(s.clone()),
		GqlValue::Enum(e) => Value::Strand(e.to_string()),
		GqlValue::Binary(b) => Value::Bytes(b.to_vec()),
		GqlValue::List(l) => Value::Array(l.iter().map(gql_to_value).collect()),
		GqlValue::Object(o) => {
			Value::Object(o.iter().map(|(k, v)| (k.to_string(), gql_to_value(v))).collect())
		}
	}
}

/// Wraps a resolved wire value, turning lists into lists of field values so
/// that object items resolve their own fields
pub fn to_field_value<'a>(v: GqlValue) -> FieldValue<'a> {
	match v {
		GqlValue::List(items) => FieldValue::list(items.into_iter().map(to_field_value)),
		v => FieldValue::value(v),
	}
}

/// A field resolving to the entry of the same name in its parent object
pub fn value_field(name: impl Into<String>, ty: impl Into<TypeRef>) -> Field {
	let name = name.into();
	let key = name.clone();
	Field::new(name, ty, move |ctx: ResolverContext| {
		let key = key.clone();
		FieldFuture::new(async move {
			let parent = ctx.parent_value.try_to_value()?;
			let Some(obj) = parent.as_object() else {
				return Err(internal_error_for(&key, parent).into());
			};
			Ok(obj.get(key.as_str()).and_then(GqlValueUtils::non_null).cloned().map(to_field_value))
		})
	})
}

fn internal_error_for(key: &str, parent: &GqlValue) -> GqlError {
	super::error::internal_error(format!("expected an object to resolve `{key}` from, found {parent}"))
}
