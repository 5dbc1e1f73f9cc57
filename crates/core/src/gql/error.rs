use thiserror::Error;

use crate::catalog::Kind;

#[derive(Debug, Error)]
pub enum GqlError {
	#[error("Database error: {0}")]
	DbError(anyhow::Error),
	#[error("Error generating schema: {0}")]
	SchemaError(String),
	#[error("No conversion found for column `{column}` of kind {kind} with type `{column_type}`")]
	TypeMapping {
		column: String,
		kind: Kind,
		column_type: String,
	},
	#[error("{0}")]
	InvalidFilter(String),
	#[error("{0}")]
	Validation(String),
	#[error("Unknown column: {0}")]
	UnknownField(String),
	#[error("No values were provided!")]
	EmptyInput,
	#[error("Unable to update with no values specified!")]
	EmptyUpdate,
	#[error("Error resolving request: {0}")]
	ResolverError(String),
	#[error("Internal Error: {0}")]
	InternalError(String),
}

pub fn schema_error(msg: impl Into<String>) -> GqlError {
	GqlError::SchemaError(msg.into())
}

pub fn resolver_error(msg: impl Into<String>) -> GqlError {
	GqlError::ResolverError(msg.into())
}

pub fn internal_error(msg: impl Into<String>) -> GqlError {
	let msg = msg.into();
	error!("{}", msg);
	GqlError::InternalError(msg)
}

pub fn filter_error(msg: impl Into<String>) -> GqlError {
	GqlError::InvalidFilter(msg.into())
}

pub fn validation_error(msg: impl Into<String>) -> GqlError {
	GqlError::Validation(msg.into())
}

impl From<anyhow::Error> for GqlError {
	fn from(value: anyhow::Error) -> Self {
		GqlError::DbError(value)
	}
}
