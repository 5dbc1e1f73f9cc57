//! The query descriptor produced by the argument compiler and consumed by
//! storage implementations.

mod cond;
mod descriptor;
mod eval;
mod operator;
mod order;

pub use self::cond::Expr;
pub use self::descriptor::{Columns, QueryDescriptor};
pub use self::eval::compare_rows;
pub use self::operator::BinaryOperator;
pub use self::order::{Order, OrderDirection};
