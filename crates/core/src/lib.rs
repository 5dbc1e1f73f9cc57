//! # Tablegql Core
//!
//! This crate derives a complete GraphQL surface from a relational schema
//! description. Given a set of tables, their columns and the relations between
//! them, it generates object, input, filter and ordering types, and binds
//! query and mutation resolvers which compile client arguments into a
//! backend-agnostic [`QueryDescriptor`](expr::QueryDescriptor) handed to a
//! [`Storage`](store::Storage) implementation.
//!
//! The crate never talks to a database itself. An in-memory storage
//! implementation is provided in [`store::mem`] for tests and tooling.

#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

pub mod catalog;
pub mod cnf;
pub mod expr;
pub mod gql;
pub mod store;
pub mod val;
