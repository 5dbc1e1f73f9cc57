mod query;
mod sdl;
mod version;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tablegql_core::catalog::Catalog;
use tablegql_core::gql::GqlConfig;

use crate::cnf::{DEFAULT_LOG_LEVEL, PKG_NAME};
use crate::telemetry;

const INFO: &str = "
Generates a GraphQL API from a description of relational tables and the
relations between them, and runs requests against it.
";

#[derive(Parser, Debug)]
#[command(name = PKG_NAME, about = INFO, before_help = INFO, disable_version_flag = true, arg_required_else_help = true)]
struct Cli {
	#[arg(help = "The logging level for the command-line tool")]
	#[arg(env = "TABLEGQL_LOG", short = 'l', long = "log", global = true)]
	#[arg(default_value = DEFAULT_LOG_LEVEL)]
	log: String,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[command(about = "Print the SDL of the schema generated for a table description")]
	Sdl(sdl::SdlCommandArguments),
	#[command(about = "Run a GraphQL request against in-memory tables")]
	Query(query::QueryCommandArguments),
	#[command(about = "Output the command-line tool version information")]
	Version,
}

/// Where the table description and generation options are read from
#[derive(Args, Debug)]
pub struct SchemaArguments {
	#[arg(help = "Path to the JSON description of tables and relations")]
	#[arg(short, long)]
	schema: PathBuf,
	#[arg(help = "Path to a TOML file of generation options")]
	#[arg(short, long)]
	config: Option<PathBuf>,
	#[arg(help = "Leave mutation fields out of the schema")]
	#[arg(long)]
	no_mutations: bool,
	#[arg(help = "How many levels of relations are nested into selectable types")]
	#[arg(long)]
	depth_limit: Option<u32>,
}

impl SchemaArguments {
	/// Reads the catalog and the generation options, applying flags on top
	/// of the configuration file
	pub async fn load(&self) -> Result<(Arc<Catalog>, GqlConfig)> {
		let json = read(&self.schema).await?;
		let catalog = Catalog::from_json(&json)
			.with_context(|| format!("loading `{}`", self.schema.display()))?;
		let mut config = match &self.config {
			Some(path) => toml::from_str::<GqlConfig>(&read(path).await?)
				.with_context(|| format!("parsing `{}`", path.display()))?,
			None => GqlConfig::default(),
		};
		if self.no_mutations {
			config = config.with_mutations(false);
		}
		if let Some(limit) = self.depth_limit {
			config = config.with_depth_limit(limit);
		}
		debug!(?config, "loaded {} tables", catalog.tables().count());
		Ok((Arc::new(catalog), config))
	}
}

async fn read(path: &Path) -> Result<String> {
	tokio::fs::read_to_string(path).await.with_context(|| format!("reading `{}`", path.display()))
}

pub async fn init() -> ExitCode {
	// Parse the CLI arguments
	let args = Cli::parse();
	// Initialize logging
	if let Err(e) = telemetry::builder().with_log_level(&args.log).init() {
		eprintln!("{e:#}");
		return ExitCode::FAILURE;
	}
	// Run the subcommand
	let output = match args.command {
		Commands::Sdl(args) => sdl::init(args).await,
		Commands::Query(args) => query::init(args).await,
		Commands::Version => version::init(),
	};
	// Error and exit the programme
	match output {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{e:#}");
			ExitCode::FAILURE
		}
	}
}
