use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use async_graphql::{Request, Value as GqlValue, Variables};
use clap::Args;
use tablegql_core::catalog::Catalog;
use tablegql_core::gql::{Conversions, GqlEnv, generate_schema};
use tablegql_core::store::mem::MemStore;

use super::SchemaArguments;

#[derive(Args, Debug)]
pub struct QueryCommandArguments {
	#[command(flatten)]
	pub schema: SchemaArguments,
	#[arg(help = "Path to a JSON object of table names to the rows they start with")]
	#[arg(short, long)]
	data: Option<PathBuf>,
	#[arg(help = "A JSON object of variables for the request")]
	#[arg(short, long)]
	variables: Option<String>,
	#[arg(help = "The GraphQL request to run")]
	query: String,
}

/// Seeds a store with rows given in their wire representation, so that
/// dates and enums are read the same way request arguments are
fn seed(catalog: &Catalog, conv: &Conversions, store: &MemStore, json: &str) -> Result<()> {
	let data: serde_json::Map<String, serde_json::Value> =
		serde_json::from_str(json).context("seed data must be a JSON object")?;
	for (name, rows) in data {
		let table = catalog
			.table_by_name(&name)
			.ok_or_else(|| anyhow!("seed data names unknown table `{name}`"))?;
		let serde_json::Value::Array(rows) = rows else {
			bail!("seed data for `{name}` must be a list of rows");
		};
		let mut parsed = Vec::with_capacity(rows.len());
		for row in rows {
			let GqlValue::Object(row) = GqlValue::from_json(row)? else {
				bail!("seed data for `{name}` must only contain objects");
			};
			parsed.push(conv.row_from_wire(table, &row)?);
		}
		debug!("seeding {} rows into `{name}`", parsed.len());
		store.load(&name, parsed)?;
	}
	Ok(())
}

pub async fn init(args: QueryCommandArguments) -> Result<()> {
	let QueryCommandArguments {
		schema,
		data,
		variables,
		query,
	} = args;
	let (catalog, config) = schema.load().await?;
	let conversions = Conversions::default();
	let store = MemStore::new(catalog.clone());
	if let Some(path) = data {
		let json = tokio::fs::read_to_string(&path)
			.await
			.with_context(|| format!("reading `{}`", path.display()))?;
		seed(&catalog, &conversions, &store, &json)?;
	}
	let env = GqlEnv::new(catalog, Arc::new(store)).with_conversions(conversions);
	let schema = generate_schema(&env, &config)?;

	let mut request = Request::new(query);
	if let Some(variables) = variables {
		let json = serde_json::from_str(&variables).context("variables must be valid JSON")?;
		request = request.variables(Variables::from_json(json));
	}
	let response = schema.execute(request).await;
	let failed = response.errors.len();
	println!("{}", serde_json::to_string_pretty(&response)?);
	if failed > 0 {
		bail!("the request failed with {failed} errors");
	}
	Ok(())
}
