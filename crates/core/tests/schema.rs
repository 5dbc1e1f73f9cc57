//! Tests for the types and fields of generated schemas

#![allow(clippy::unwrap_used)]

mod helpers;

use std::sync::Arc;

use helpers::{Harness, catalog, definition};
use serde_json::json;
use tablegql_core::catalog::{Catalog, ColumnDefinition, Kind, SchemaDefinition};
use tablegql_core::gql::{GqlConfig, GqlEnv, GqlError, SchemaCache, generate_schema};
use tablegql_core::store::mem::MemStore;

fn env(catalog: Arc<Catalog>) -> GqlEnv {
	GqlEnv::new(catalog.clone(), Arc::new(MemStore::new(catalog)))
}

#[test_log::test(tokio::test)]
async fn generates_table_fields() {
	let h = Harness::new(&GqlConfig::default());
	let query = h.fields_of("Query").await.unwrap();
	assert_eq!(query, ["users", "usersSingle", "posts", "postsSingle"]);
	let mutation = h.fields_of("Mutation").await.unwrap();
	assert_eq!(
		mutation,
		[
			"insertIntoUsers",
			"insertIntoUsersSingle",
			"updateUsers",
			"deleteFromUsers",
			"insertIntoPosts",
			"insertIntoPostsSingle",
			"updatePosts",
			"deleteFromPosts",
		]
	);
}

#[test_log::test(tokio::test)]
async fn generates_table_types() {
	let h = Harness::new(&GqlConfig::default());
	assert_eq!(
		h.fields_of("UsersSelectItem").await.unwrap(),
		["id", "name", "age", "role", "invitedBy", "posts", "inviter"]
	);
	assert_eq!(h.fields_of("UsersItem").await.unwrap(), ["id", "name", "age", "role", "invitedBy"]);
	assert_eq!(
		h.fields_of("UsersFilters").await.unwrap(),
		["id", "name", "age", "role", "invitedBy", "OR"]
	);
	assert_eq!(
		h.fields_of("UsersAgeFilters").await.unwrap(),
		[
			"eq",
			"ne",
			"lt",
			"lte",
			"gt",
			"gte",
			"like",
			"notLike",
			"ilike",
			"notIlike",
			"inArray",
			"notInArray",
			"isNull",
			"isNotNull",
			"OR",
		]
	);
	assert_eq!(h.fields_of("InnerOrder").await.unwrap(), ["direction", "priority"]);
	assert!(h.fields_of("UsersInsertInput").await.is_some());
	assert!(h.fields_of("UsersUpdateInput").await.is_some());
	assert!(h.fields_of("UsersOrderBy").await.is_some());
}

#[test_log::test(tokio::test)]
async fn field_nullability() {
	let h = Harness::new(&GqlConfig::default());
	let res = h
		.execute(
			r#"{
				item: __type(name: "UsersItem") { fields { name type { kind name } } }
				insert: __type(name: "UsersInsertInput") { inputFields { name type { kind name } } }
				update: __type(name: "UsersUpdateInput") { inputFields { name type { kind name } } }
			}"#,
			json!({}),
		)
		.await;
	let kinds = |ty: &str, list: &str| -> Vec<String> {
		res["data"][ty][list]
			.as_array()
			.unwrap()
			.iter()
			.map(|f| format!("{}:{}", f["name"].as_str().unwrap(), f["type"]["kind"].as_str().unwrap()))
			.collect()
	};
	assert_eq!(
		kinds("item", "fields"),
		["id:NON_NULL", "name:NON_NULL", "age:SCALAR", "role:ENUM", "invitedBy:SCALAR"]
	);
	assert_eq!(
		kinds("insert", "inputFields"),
		["id:SCALAR", "name:NON_NULL", "age:SCALAR", "role:ENUM", "invitedBy:SCALAR"]
	);
	assert_eq!(
		kinds("update", "inputFields"),
		["id:SCALAR", "name:SCALAR", "age:SCALAR", "role:ENUM", "invitedBy:SCALAR"]
	);
}

#[test_log::test(tokio::test)]
async fn enum_members_describe_their_values() {
	let h = Harness::new(&GqlConfig::default());
	let res = h
		.execute(r#"{ __type(name: "UsersRoleEnum") { enumValues { name description } } }"#, json!({}))
		.await;
	assert_eq!(
		res["data"]["__type"]["enumValues"],
		json!([
			{ "name": "admin", "description": "Value: admin" },
			{ "name": "user", "description": "Value: user" },
		])
	);
}

#[test_log::test(tokio::test)]
async fn relation_arguments() {
	let h = Harness::new(&GqlConfig::default());
	let res = h
		.execute(
			r#"{ __type(name: "UsersSelectItem") { fields { name args { name type { name } } } } }"#,
			json!({}),
		)
		.await;
	let fields = res["data"]["__type"]["fields"].as_array().unwrap();
	let args = |name: &str| {
		fields.iter().find(|f| f["name"] == name).unwrap()["args"].clone()
	};
	assert_eq!(
		args("posts"),
		json!([
			{ "name": "where", "type": { "name": "PostsFilters" } },
			{ "name": "orderBy", "type": { "name": "PostsOrderBy" } },
			{ "name": "offset", "type": { "name": "Int" } },
			{ "name": "limit", "type": { "name": "Int" } },
		])
	);
	assert_eq!(args("inviter"), json!([{ "name": "where", "type": { "name": "UsersFilters" } }]));
}

#[test_log::test(tokio::test)]
async fn depth_limit_zero_has_no_relations() {
	let h = Harness::new(&GqlConfig::default().with_depth_limit(0));
	assert_eq!(
		h.fields_of("UsersSelectItem").await.unwrap(),
		["id", "name", "age", "role", "invitedBy"]
	);
	assert_eq!(h.fields_of("UsersPostsRelation").await, None);
}

#[test_log::test(tokio::test)]
async fn depth_limit_one_stops_at_children() {
	let h = Harness::new(&GqlConfig::default().with_depth_limit(1));
	assert_eq!(
		h.fields_of("UsersPostsRelation").await.unwrap(),
		["id", "authorId", "title", "publishedAt", "pinned"]
	);
	assert_eq!(h.fields_of("UsersPostsRelationAuthorRelation").await, None);
}

#[test_log::test(tokio::test)]
async fn self_reference_expands_once() {
	let h = Harness::new(&GqlConfig::default());
	assert_eq!(
		h.fields_of("UsersInviterRelation").await.unwrap(),
		["id", "name", "age", "role", "invitedBy"]
	);
	assert_eq!(
		h.fields_of("UsersPostsRelationAuthorRelation").await.unwrap(),
		["id", "name", "age", "role", "invitedBy"]
	);
	assert!(h.fields_of("PostsAuthorRelation").await.unwrap().contains(&"posts".to_owned()));
	assert_eq!(
		h.fields_of("PostsAuthorRelationPostsRelation").await.unwrap(),
		["id", "authorId", "title", "publishedAt", "pinned"]
	);
}

#[test_log::test(tokio::test)]
async fn mutations_can_be_disabled() {
	let h = Harness::new(&GqlConfig::default().with_mutations(false));
	assert_eq!(h.fields_of("Mutation").await, None);
	assert_eq!(h.fields_of("UsersItem").await.unwrap().len(), 5);
	assert!(!h.schema.sdl().contains("type Mutation"));
}

#[test]
fn unregistered_custom_type_fails() {
	let def = definition()
		.table("shapes", [ColumnDefinition::new("outline", Kind::Custom, "PgPolygon")]);
	let err = generate_schema(&env(Arc::new(Catalog::new(def).unwrap())), &GqlConfig::default())
		.unwrap_err();
	assert!(matches!(err, GqlError::TypeMapping { .. }), "{err}");
}

#[test]
fn missing_tables_fail() {
	let err = Catalog::new(SchemaDefinition::default()).unwrap_err();
	assert!(matches!(err, GqlError::SchemaError(_)));
}

#[test]
fn sdl_names() {
	let schema = generate_schema(&env(catalog()), &GqlConfig::default()).unwrap();
	let sdl = schema.sdl();
	for name in [
		"type UsersSelectItem",
		"type UsersItem",
		"input UsersInsertInput",
		"input UsersUpdateInput",
		"input UsersFilters",
		"input UsersRoleFilters",
		"input UsersOrderBy",
		"input InnerOrder",
		"enum OrderDirection",
		"enum UsersRoleEnum",
		"type PostsAuthorRelation",
	] {
		assert!(sdl.contains(name), "missing `{name}` in\n{sdl}");
	}
}

#[test]
fn schema_cache_reuses_schemas() {
	let cache = SchemaCache::new(env(catalog()));
	let config = GqlConfig::default().with_depth_limit(1);
	let first = cache.get_schema(&config).unwrap().sdl();
	let second = cache.get_schema(&config).unwrap().sdl();
	assert_eq!(first, second);
	let unlimited = cache.get_schema(&GqlConfig::default()).unwrap().sdl();
	assert_ne!(first, unlimited);
}
