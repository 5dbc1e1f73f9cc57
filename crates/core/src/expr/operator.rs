use std::fmt;

/// A comparison between a column and a single value
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
	/// `=`
	Equal,
	/// `!=`
	NotEqual,
	/// `<`
	LessThan,
	/// `<=`
	LessThanEqual,
	/// `>`
	MoreThan,
	/// `>=`
	MoreThanEqual,
	/// `LIKE`
	Like,
	/// `NOT LIKE`
	NotLike,
	/// `ILIKE`
	ILike,
	/// `NOT ILIKE`
	NotILike,
}

impl fmt::Display for BinaryOperator {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Equal => f.write_str("="),
			Self::NotEqual => f.write_str("!="),
			Self::LessThan => f.write_str("<"),
			Self::LessThanEqual => f.write_str("<="),
			Self::MoreThan => f.write_str(">"),
			Self::MoreThanEqual => f.write_str(">="),
			Self::Like => f.write_str("LIKE"),
			Self::NotLike => f.write_str("NOT LIKE"),
			Self::ILike => f.write_str("ILIKE"),
			Self::NotILike => f.write_str("NOT ILIKE"),
		}
	}
}
