use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tablegql_core::gql::{GqlEnv, generate_schema};
use tablegql_core::store::mem::MemStore;

use super::SchemaArguments;

#[derive(Args, Debug)]
pub struct SdlCommandArguments {
	#[command(flatten)]
	pub schema: SchemaArguments,
}

pub async fn init(args: SdlCommandArguments) -> Result<()> {
	let (catalog, config) = args.schema.load().await?;
	let env = GqlEnv::new(catalog.clone(), Arc::new(MemStore::new(catalog)));
	let schema = generate_schema(&env, &config)?;
	println!("{}", schema.sdl());
	Ok(())
}
