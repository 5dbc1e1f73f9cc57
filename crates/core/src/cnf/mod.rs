use std::sync::LazyLock;

/// The maximum query depth accepted by a generated schema
pub static GRAPHQL_MAX_DEPTH: LazyLock<usize> =
	lazy_env_parse!("TABLEGQL_GRAPHQL_MAX_DEPTH", usize, 32);

/// The maximum query complexity accepted by a generated schema
pub static GRAPHQL_MAX_COMPLEXITY: LazyLock<usize> =
	lazy_env_parse!("TABLEGQL_GRAPHQL_MAX_COMPLEXITY", usize, 2048);
