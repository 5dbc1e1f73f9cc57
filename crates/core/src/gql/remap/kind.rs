//! The default conversion of each column kind.

use async_graphql::{Name, Value as GqlValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use super::Conversions;
use crate::catalog::{ColumnDefinition, Kind};
use crate::gql::error::{GqlError, resolver_error, validation_error};
use crate::gql::naming::enum_member;
use crate::gql::utils::{GqlValueUtils, gql_to_value, value_to_gql};
use crate::val::{Number, Value};

pub(super) fn to_wire(
	conv: &Conversions,
	value: Value,
	column: &ColumnDefinition,
) -> Result<GqlValue, GqlError> {
	match (column.kind, value) {
		(Kind::Date, Value::Datetime(d)) => {
			Ok(GqlValue::String(d.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
		}
		(Kind::Buffer, Value::Bytes(b)) => {
			Ok(GqlValue::List(b.into_iter().map(|b| GqlValue::Number(b.into())).collect()))
		}
		(Kind::Bigint, Value::BigInt(i)) => Ok(GqlValue::String(i.to_string())),
		(Kind::Bigint, Value::Number(Number::Int(i))) => Ok(GqlValue::String(i.to_string())),
		(Kind::Json, v) => serde_json::to_string(&v.into_json())
			.map(GqlValue::String)
			.map_err(|e| resolver_error(format!("Unable to serialise field '{}': {e}", column.name))),
		(Kind::Array, Value::Array(items)) => match column.base_column.as_deref() {
			Some(base) => Ok(GqlValue::List(
				items.into_iter().map(|v| conv.to_wire(v, base)).collect::<Result<_, _>>()?,
			)),
			None => value_to_gql(Value::Array(items)),
		},
		(Kind::String, Value::Strand(s)) => match column.enum_values() {
			Some(values) => match values.iter().position(|v| *v == s) {
				Some(i) => Ok(GqlValue::Enum(Name::new(enum_member(i, &s)))),
				None => Err(resolver_error(format!(
					"Value '{s}' of field '{}' is not one of its enum values",
					column.name
				))),
			},
			None => Ok(GqlValue::String(s)),
		},
		(_, v) => value_to_gql(v),
	}
}

pub(super) fn from_wire(
	_conv: &Conversions,
	value: &GqlValue,
	column: &ColumnDefinition,
) -> Result<Value, GqlError> {
	let name = &column.name;
	match column.kind {
		Kind::Date => parse_date(value)
			.map(Value::Datetime)
			.ok_or_else(|| validation_error(format!("Field '{name}' is not a valid date!"))),
		Kind::Buffer => {
			let Some(items) = value.as_list() else {
				return Err(validation_error(format!("Field '{name}' is not an array!")));
			};
			items
				.iter()
				.map(|b| b.as_i64().and_then(|b| u8::try_from(b).ok()))
				.collect::<Option<Vec<u8>>>()
				.map(Value::Bytes)
				.ok_or_else(|| validation_error(format!("Field '{name}' is not an array of bytes!")))
		}
		Kind::Json => match value {
			GqlValue::String(s) => serde_json::from_str(s)
				.map(Value::from_json)
				.map_err(|e| validation_error(format!("Invalid JSON in field '{name}':\n{e}"))),
			v => Ok(gql_to_value(v)),
		},
		Kind::Array => match value {
			GqlValue::List(_) => Ok(gql_to_value(value)),
			_ => Err(validation_error(format!("Field '{name}' is not an array!"))),
		},
		Kind::Bigint => {
			let parsed = match value {
				GqlValue::String(s) => s.trim().parse::<i128>().ok(),
				v => v.as_i64().map(i128::from),
			};
			parsed
				.map(Value::BigInt)
				.ok_or_else(|| validation_error(format!("Field '{name}' is not a BigInt!")))
		}
		Kind::String => match (column.enum_values(), value.as_string()) {
			(Some(values), Some(member)) => values
				.iter()
				.enumerate()
				.find(|(i, v)| enum_member(*i, v) == member || **v == member)
				.map(|(_, v)| Value::Strand(v.clone()))
				.ok_or_else(|| {
					validation_error(format!("Field '{name}' has no enum value '{member}'"))
				}),
			_ => Ok(gql_to_value(value)),
		},
		_ => Ok(gql_to_value(value)),
	}
}

/// Accepts RFC 3339 timestamps, plain dates, naive timestamps read as UTC and
/// milliseconds since the epoch
fn parse_date(value: &GqlValue) -> Option<DateTime<Utc>> {
	match value {
		GqlValue::String(s) => {
			let s = s.trim();
			if let Ok(d) = DateTime::parse_from_rfc3339(s) {
				return Some(d.with_timezone(&Utc));
			}
			for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
				if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
					return Some(d.and_utc());
				}
			}
			NaiveDate::parse_from_str(s, "%Y-%m-%d")
				.ok()
				.and_then(|d| d.and_hms_opt(0, 0, 0))
				.map(|d| d.and_utc())
		}
		v => v.as_i64().and_then(DateTime::from_timestamp_millis),
	}
}
