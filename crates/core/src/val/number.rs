use std::cmp::Ordering;
use std::fmt;

/// A numeric storage value
#[derive(Clone, Copy, Debug)]
pub enum Number {
	Int(i64),
	Float(f64),
}

impl Default for Number {
	fn default() -> Self {
		Number::Int(0)
	}
}

impl Number {
	pub fn as_f64(&self) -> f64 {
		match self {
			Number::Int(v) => *v as f64,
			Number::Float(v) => *v,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Number::Int(v) => Some(*v),
			Number::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
			Number::Float(_) => None,
		}
	}

	pub fn is_int(&self) -> bool {
		matches!(self, Number::Int(_))
	}

	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Number::Int(v) => (*v).into(),
			Number::Float(v) => serde_json::Number::from_f64(*v)
				.map(serde_json::Value::Number)
				.unwrap_or(serde_json::Value::Null),
		}
	}
}

impl PartialEq for Number {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Number::Int(a), Number::Int(b)) => a == b,
			(a, b) => a.as_f64() == b.as_f64(),
		}
	}
}

impl PartialOrd for Number {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		match (self, other) {
			(Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
			(a, b) => a.as_f64().partial_cmp(&b.as_f64()),
		}
	}
}

impl fmt::Display for Number {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Number::Int(v) => write!(f, "{v}"),
			Number::Float(v) => {
				if v.is_finite() && v.fract() == 0.0 {
					write!(f, "{v:.1}")
				} else {
					write!(f, "{v}")
				}
			}
		}
	}
}

macro_rules! from_int {
	($($t:ty),*) => {
		$(
			impl From<$t> for Number {
				fn from(v: $t) -> Self {
					Number::Int(v as i64)
				}
			}
		)*
	};
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Number {
	fn from(v: f32) -> Self {
		Number::Float(v as f64)
	}
}

impl From<f64> for Number {
	fn from(v: f64) -> Self {
		Number::Float(v)
	}
}
