use std::cmp::Ordering;

use anyhow::{Result, bail};
use regex::RegexBuilder;

use crate::expr::{BinaryOperator, Expr, Order, OrderDirection};
use crate::val::{Object, Value};

impl Expr {
	/// Evaluates the predicate against a single row.
	///
	/// Comparisons follow SQL semantics: any comparison involving NULL is false.
	pub fn evaluate(&self, row: &Object) -> Result<bool> {
		let get = |column: &str| row.get(column).unwrap_or(&Value::None);
		match self {
			Expr::Binary {
				column,
				op,
				value,
			} => binary(get(column), *op, value),
			Expr::Inside {
				column,
				values,
			} => {
				let v = get(column);
				Ok(!v.is_nullish() && values.iter().any(|x| v.equal(x)))
			}
			Expr::NotInside {
				column,
				values,
			} => {
				let v = get(column);
				Ok(!v.is_nullish() && !values.iter().any(|x| v.equal(x)))
			}
			Expr::IsNull(column) => Ok(get(column).is_nullish()),
			Expr::IsNotNull(column) => Ok(!get(column).is_nullish()),
			Expr::And(exprs) => {
				for e in exprs {
					if !e.evaluate(row)? {
						return Ok(false);
					}
				}
				Ok(true)
			}
			Expr::Or(exprs) => {
				for e in exprs {
					if e.evaluate(row)? {
						return Ok(true);
					}
				}
				Ok(false)
			}
		}
	}
}

fn binary(lhs: &Value, op: BinaryOperator, rhs: &Value) -> Result<bool> {
	if lhs.is_nullish() || rhs.is_nullish() {
		return Ok(false);
	}
	let res = match op {
		BinaryOperator::Equal => lhs.equal(rhs) || lhs == rhs,
		BinaryOperator::NotEqual => !(lhs.equal(rhs) || lhs == rhs),
		BinaryOperator::LessThan => lhs.compare(rhs) == Some(Ordering::Less),
		BinaryOperator::LessThanEqual => {
			matches!(lhs.compare(rhs), Some(Ordering::Less | Ordering::Equal))
		}
		BinaryOperator::MoreThan => lhs.compare(rhs) == Some(Ordering::Greater),
		BinaryOperator::MoreThanEqual => {
			matches!(lhs.compare(rhs), Some(Ordering::Greater | Ordering::Equal))
		}
		BinaryOperator::Like => like(lhs, rhs, false)?,
		BinaryOperator::NotLike => !like(lhs, rhs, false)?,
		BinaryOperator::ILike => like(lhs, rhs, true)?,
		BinaryOperator::NotILike => !like(lhs, rhs, true)?,
	};
	Ok(res)
}

/// Matches a value against a SQL LIKE pattern, where `%` matches any
/// sequence and `_` matches a single character
fn like(value: &Value, pattern: &Value, insensitive: bool) -> Result<bool> {
	let (Some(value), Some(pattern)) = (value.as_str(), pattern.as_str()) else {
		bail!("LIKE can only compare strings, found {value} and {pattern}");
	};
	let mut re = String::with_capacity(pattern.len() + 2);
	re.push('^');
	let mut buf = [0u8; 4];
	for c in pattern.chars() {
		match c {
			'%' => re.push_str(".*"),
			'_' => re.push('.'),
			c => re.push_str(&regex::escape(c.encode_utf8(&mut buf))),
		}
	}
	re.push('$');
	let re = RegexBuilder::new(&re).case_insensitive(insensitive).dot_matches_new_line(true).build()?;
	Ok(re.is_match(value))
}

/// Compares two rows by an ordering list
pub fn compare_rows(order: &[Order], a: &Object, b: &Object) -> Ordering {
	for o in order {
		let x = a.get(&o.column).unwrap_or(&Value::None);
		let y = b.get(&o.column).unwrap_or(&Value::None);
		let res = match o.direction {
			OrderDirection::Ascending => x.sort_cmp(y),
			OrderDirection::Descending => y.sort_cmp(x),
		};
		if res != Ordering::Equal {
			return res;
		}
	}
	Ordering::Equal
}
