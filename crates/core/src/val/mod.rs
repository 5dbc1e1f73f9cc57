use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

pub mod number;
pub mod object;

pub use self::number::Number;
pub use self::object::Object;

/// A value in its storage representation.
///
/// This is what rows handed to and returned from a
/// [`Storage`](crate::store::Storage) implementation are made of.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
	/// The field is absent
	#[default]
	None,
	Null,
	Bool(bool),
	Number(Number),
	BigInt(i128),
	Strand(String),
	Datetime(DateTime<Utc>),
	Bytes(Vec<u8>),
	Array(Vec<Value>),
	Object(Object),
}

impl Value {
	/// Check if this Value is NONE or NULL
	pub fn is_nullish(&self) -> bool {
		matches!(self, Value::None | Value::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Strand(s) => Some(s),
			_ => None,
		}
	}

	/// Builds a value from parsed JSON, keeping integers as integers
	pub fn from_json(json: serde_json::Value) -> Value {
		match json {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Number(Number::Int(i)),
				None => match n.as_u64() {
					Some(u) => Value::BigInt(u as i128),
					None => Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN))),
				},
			},
			serde_json::Value::String(s) => Value::Strand(s),
			serde_json::Value::Array(a) => Value::Array(a.into_iter().map(Value::from_json).collect()),
			serde_json::Value::Object(o) => {
				Value::Object(o.into_iter().map(|(k, v)| (k, Value::from_json(v))).collect())
			}
		}
	}

	pub fn into_json(self) -> serde_json::Value {
		match self {
			Value::None | Value::Null => serde_json::Value::Null,
			Value::Bool(b) => b.into(),
			Value::Number(n) => n.to_json(),
			Value::BigInt(i) => match i64::try_from(i) {
				Ok(v) => v.into(),
				Err(_) => i.to_string().into(),
			},
			Value::Strand(s) => s.into(),
			Value::Datetime(d) => d.to_rfc3339_opts(SecondsFormat::AutoSi, true).into(),
			Value::Bytes(b) => b.into_iter().map(serde_json::Value::from).collect(),
			Value::Array(a) => a.into_iter().map(Value::into_json).collect(),
			Value::Object(o) => o.into_json(),
		}
	}

	/// Compares two values the way a database compares column values.
	///
	/// Returns `None` when the values are not comparable, which includes
	/// every comparison involving NONE or NULL.
	pub fn compare(&self, other: &Value) -> Option<Ordering> {
		match (self, other) {
			(Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
			(Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
			(Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
			(Value::BigInt(a), Value::Number(b)) => match b {
				Number::Int(b) => Some(a.cmp(&(*b as i128))),
				Number::Float(b) => (*a as f64).partial_cmp(b),
			},
			(Value::Number(_), Value::BigInt(_)) => other.compare(self).map(Ordering::reverse),
			(Value::Strand(a), Value::Strand(b)) => Some(a.cmp(b)),
			(Value::Datetime(a), Value::Datetime(b)) => Some(a.cmp(b)),
			(Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
			(Value::Array(a), Value::Array(b)) => {
				for (x, y) in a.iter().zip(b.iter()) {
					match x.compare(y)? {
						Ordering::Equal => continue,
						o => return Some(o),
					}
				}
				Some(a.len().cmp(&b.len()))
			}
			(Value::Object(a), Value::Object(b)) if a == b => Some(Ordering::Equal),
			_ => None,
		}
	}

	/// Checks equality the way a database checks column equality
	pub fn equal(&self, other: &Value) -> bool {
		self.compare(other) == Some(Ordering::Equal)
	}

	/// A total ordering used for sorting, which places NONE and NULL first
	pub fn sort_cmp(&self, other: &Value) -> Ordering {
		match (self.is_nullish(), other.is_nullish()) {
			(true, true) => Ordering::Equal,
			(true, false) => Ordering::Less,
			(false, true) => Ordering::Greater,
			(false, false) => self.compare(other).unwrap_or_else(|| self.rank().cmp(&other.rank())),
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Value::None => 0,
			Value::Null => 1,
			Value::Bool(_) => 2,
			Value::Number(_) | Value::BigInt(_) => 3,
			Value::Strand(_) => 4,
			Value::Datetime(_) => 5,
			Value::Bytes(_) => 6,
			Value::Array(_) => 7,
			Value::Object(_) => 8,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Value::None => f.write_str("NONE"),
			Value::Null => f.write_str("NULL"),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Number(n) => write!(f, "{n}"),
			Value::BigInt(i) => write!(f, "{i}n"),
			Value::Strand(s) => write!(f, "{s:?}"),
			Value::Datetime(d) => write!(f, "d\"{}\"", d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
			Value::Bytes(b) => write!(f, "b{b:?}"),
			Value::Array(a) => {
				f.write_str("[")?;
				for (i, v) in a.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{v}")?;
				}
				f.write_str("]")
			}
			Value::Object(o) => write!(f, "{o}"),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<Number> for Value {
	fn from(v: Number) -> Self {
		Value::Number(v)
	}
}

macro_rules! from_number {
	($($t:ty),*) => {
		$(
			impl From<$t> for Value {
				fn from(v: $t) -> Self {
					Value::Number(Number::from(v))
				}
			}
		)*
	};
}

from_number!(i8, i16, i32, i64, u8, u16, u32, f32, f64);

impl From<i128> for Value {
	fn from(v: i128) -> Self {
		Value::BigInt(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Strand(v.to_owned())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Strand(v)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(v: DateTime<Utc>) -> Self {
		Value::Datetime(v)
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Value::Array(v)
	}
}

impl From<Object> for Value {
	fn from(v: Object) -> Self {
		Value::Object(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		match v {
			Some(v) => v.into(),
			None => Value::Null,
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use serde_json::json;

	use super::*;

	#[rstest]
	#[case::int_float(Value::from(2), Value::from(2.0), Some(Ordering::Equal))]
	#[case::bigint_int(Value::BigInt(10), Value::from(3), Some(Ordering::Greater))]
	#[case::int_bigint(Value::from(3), Value::BigInt(10), Some(Ordering::Less))]
	#[case::strings(Value::from("a"), Value::from("b"), Some(Ordering::Less))]
	#[case::null(Value::Null, Value::Null, None)]
	#[case::none_int(Value::None, Value::from(1), None)]
	#[case::mismatch(Value::from("1"), Value::from(1), None)]
	fn compare(#[case] a: Value, #[case] b: Value, #[case] expected: Option<Ordering>) {
		assert_eq!(a.compare(&b), expected);
	}

	#[test]
	fn sort_places_nulls_first() {
		let mut values = vec![Value::from(3), Value::Null, Value::from(1), Value::None];
		values.sort_by(Value::sort_cmp);
		assert!(values[0].is_nullish());
		assert!(values[1].is_nullish());
		assert_eq!(values[2], Value::from(1));
		assert_eq!(values[3], Value::from(3));
	}

	#[test]
	fn json_conversion_keeps_integers() {
		let json = json!({ "a": 1, "b": [1.5, "x", null], "c": { "d": true } });
		let value = Value::from_json(json.clone());
		let Value::Object(ref obj) = value else {
			panic!("expected an object, found {value}");
		};
		assert_eq!(obj.get("a"), Some(&Value::Number(Number::Int(1))));
		assert_eq!(value.into_json(), json);
	}
}
