use std::fmt;

use crate::expr::BinaryOperator;
use crate::val::Value;

/// A compiled predicate over the columns of a single table
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
	Binary {
		column: String,
		op: BinaryOperator,
		value: Value,
	},
	Inside {
		column: String,
		values: Vec<Value>,
	},
	NotInside {
		column: String,
		values: Vec<Value>,
	},
	IsNull(String),
	IsNotNull(String),
	And(Vec<Expr>),
	Or(Vec<Expr>),
}

impl Expr {
	pub fn binary(column: impl Into<String>, op: BinaryOperator, value: impl Into<Value>) -> Self {
		Expr::Binary {
			column: column.into(),
			op,
			value: value.into(),
		}
	}

	/// Combines predicates with AND, collapsing zero or one of them
	pub fn and(mut exprs: Vec<Expr>) -> Option<Expr> {
		match exprs.len() {
			0 => None,
			1 => exprs.pop(),
			_ => Some(Expr::And(exprs)),
		}
	}

	/// Combines predicates with OR, collapsing zero or one of them
	pub fn or(mut exprs: Vec<Expr>) -> Option<Expr> {
		match exprs.len() {
			0 => None,
			1 => exprs.pop(),
			_ => Some(Expr::Or(exprs)),
		}
	}
}

fn write_list(f: &mut fmt::Formatter, values: &[Value]) -> fmt::Result {
	f.write_str("[")?;
	for (i, v) in values.iter().enumerate() {
		if i > 0 {
			f.write_str(", ")?;
		}
		write!(f, "{v}")?;
	}
	f.write_str("]")
}

fn write_joined(f: &mut fmt::Formatter, exprs: &[Expr], sep: &str) -> fmt::Result {
	f.write_str("(")?;
	for (i, e) in exprs.iter().enumerate() {
		if i > 0 {
			write!(f, " {sep} ")?;
		}
		write!(f, "{e}")?;
	}
	f.write_str(")")
}

impl fmt::Display for Expr {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Expr::Binary {
				column,
				op,
				value,
			} => write!(f, "{column} {op} {value}"),
			Expr::Inside {
				column,
				values,
			} => {
				write!(f, "{column} IN ")?;
				write_list(f, values)
			}
			Expr::NotInside {
				column,
				values,
			} => {
				write!(f, "{column} NOT IN ")?;
				write_list(f, values)
			}
			Expr::IsNull(column) => write!(f, "{column} IS NULL"),
			Expr::IsNotNull(column) => write!(f, "{column} IS NOT NULL"),
			Expr::And(exprs) => write_joined(f, exprs, "AND"),
			Expr::Or(exprs) => write_joined(f, exprs, "OR"),
		}
	}
}
