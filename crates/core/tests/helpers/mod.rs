#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_graphql::dynamic::Schema;
use async_graphql::{Request, Variables};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{Value as Json, json};
use tablegql_core::catalog::{
	Catalog, ColumnDefault, ColumnDefinition, Kind, RelationDefinition, SchemaDefinition,
	TableDefinition,
};
use tablegql_core::expr::{Columns, Expr, QueryDescriptor};
use tablegql_core::gql::{GqlConfig, GqlEnv, generate_schema};
use tablegql_core::store::Storage;
use tablegql_core::store::mem::MemStore;
use tablegql_core::val::{Object, Value};

/// `users` has many `posts`, each post has one `author`, and each user may
/// have been invited by another user
pub fn definition() -> SchemaDefinition {
	SchemaDefinition::default()
		.table(
			"users",
			[
				ColumnDefinition::new("id", Kind::Number, "PgSerial")
					.primary()
					.with_default(ColumnDefault::Increment),
				ColumnDefinition::new("name", Kind::String, "PgText").not_null(),
				ColumnDefinition::new("age", Kind::Number, "PgInteger"),
				ColumnDefinition::new("role", Kind::String, "PgEnumColumn")
					.with_enum(["admin", "user"])
					.with_default(ColumnDefault::Literal(json!("user"))),
				ColumnDefinition::new("invitedBy", Kind::Number, "PgInteger"),
			],
		)
		.table(
			"posts",
			[
				ColumnDefinition::new("id", Kind::Number, "PgSerial")
					.primary()
					.with_default(ColumnDefault::Increment),
				ColumnDefinition::new("authorId", Kind::Number, "PgInteger").not_null(),
				ColumnDefinition::new("title", Kind::String, "PgText").not_null(),
				ColumnDefinition::new("publishedAt", Kind::Date, "PgTimestamp"),
				ColumnDefinition::new("pinned", Kind::Boolean, "PgBoolean"),
			],
		)
		.relation("users", "posts", RelationDefinition::many("posts").on(["id"], ["authorId"]))
		.relation("users", "inviter", RelationDefinition::one("users").on(["invitedBy"], ["id"]))
		.relation("posts", "author", RelationDefinition::one("users").on(["authorId"], ["id"]))
}

pub fn catalog() -> Arc<Catalog> {
	Arc::new(Catalog::new(definition()).unwrap())
}

/// Wraps a [`MemStore`], recording every call made to it
#[derive(Debug)]
pub struct RecordingStore {
	pub inner: MemStore,
	pub calls: Mutex<Vec<String>>,
}

impl RecordingStore {
	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}

	fn record(&self, call: String) {
		self.calls.lock().push(call);
	}
}

fn cond_str(cond: Option<&Expr>) -> String {
	cond.map(|c| c.to_string()).unwrap_or_default()
}

#[async_trait::async_trait]
impl Storage for RecordingStore {
	async fn find_many(
		&self,
		table: &TableDefinition,
		query: &QueryDescriptor,
	) -> Result<Vec<Object>> {
		self.record(format!("find_many {}: {query}", table.name));
		self.inner.find_many(table, query).await
	}

	async fn find_one(
		&self,
		table: &TableDefinition,
		query: &QueryDescriptor,
	) -> Result<Option<Object>> {
		self.record(format!("find_one {}: {query}", table.name));
		self.inner.find_one(table, query).await
	}

	async fn insert(
		&self,
		table: &TableDefinition,
		rows: Vec<Object>,
		returning: &Columns,
	) -> Result<Vec<Object>> {
		self.record(format!("insert {}: {} rows", table.name, rows.len()));
		self.inner.insert(table, rows, returning).await
	}

	async fn update(
		&self,
		table: &TableDefinition,
		cond: Option<&Expr>,
		set: Object,
		returning: &Columns,
	) -> Result<Vec<Object>> {
		self.record(format!("update {}: {set} WHERE {}", table.name, cond_str(cond)));
		self.inner.update(table, cond, set, returning).await
	}

	async fn delete(
		&self,
		table: &TableDefinition,
		cond: Option<&Expr>,
		returning: &Columns,
	) -> Result<Vec<Object>> {
		self.record(format!("delete {}: WHERE {}", table.name, cond_str(cond)));
		self.inner.delete(table, cond, returning).await
	}
}

/// A seeded store and the schema generated over it
pub struct Harness {
	pub store: Arc<RecordingStore>,
	pub schema: Schema,
}

impl Harness {
	pub fn new(config: &GqlConfig) -> Self {
		let catalog = catalog();
		let inner = MemStore::new(catalog.clone());
		inner
			.load(
				"users",
				[
					object(json!({ "id": 1, "name": "A", "age": 20, "role": "admin" })),
					object(json!({ "id": 2, "name": "B", "age": 15, "role": "user", "invitedBy": 1 })),
				],
			)
			.unwrap();
		let published = Value::Datetime(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
		let mut first = object(json!({ "id": 10, "authorId": 1, "title": "first", "pinned": true }));
		first.insert("publishedAt".into(), published);
		inner
			.load(
				"posts",
				[
					first,
					object(json!({ "id": 11, "authorId": 1, "title": "second" })),
					object(json!({ "id": 12, "authorId": 2, "title": "third" })),
				],
			)
			.unwrap();
		let store = Arc::new(RecordingStore {
			inner,
			calls: Mutex::new(Vec::new()),
		});
		let env = GqlEnv::new(catalog, store.clone());
		let schema = generate_schema(&env, config).unwrap();
		Self {
			store,
			schema,
		}
	}

	/// Executes a request, returning its data and error messages as JSON
	pub async fn execute(&self, query: &str, variables: Json) -> Json {
		let request = Request::new(query).variables(Variables::from_json(variables));
		let response = self.schema.execute(request).await;
		let errors: Vec<_> = response.errors.iter().map(|e| e.message.clone()).collect();
		let data = response.data.into_json().unwrap();
		match errors.is_empty() {
			true => json!({ "data": data }),
			false => json!({ "data": data, "errors": errors }),
		}
	}

	/// The field names of a named type, through introspection
	pub async fn fields_of(&self, ty: &str) -> Option<Vec<String>> {
		let res = self
			.execute(
				"query($name: String!) { __type(name: $name) { fields { name } inputFields { name } } }",
				json!({ "name": ty }),
			)
			.await;
		let ty = res["data"]["__type"].as_object()?;
		let fields = match &ty["fields"] {
			Json::Array(fields) => fields,
			_ => ty["inputFields"].as_array()?,
		};
		Some(fields.iter().filter_map(|f| f["name"].as_str().map(str::to_owned)).collect())
	}
}

pub fn object(json: Json) -> Object {
	match Value::from_json(json) {
		Value::Object(o) => o,
		v => panic!("expected an object, found {v}"),
	}
}
