/// Engram system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum depth walked along `superseded_by` pointers before a chain is
/// declared corrupt. Chains are forests, so any walk longer than this is a bug.
pub const MAX_CHAIN_DEPTH: usize = 50;

/// Maximum number of candidates fetched per retrieval signal, regardless of config.
pub const MAX_POOL_SIZE: usize = 500;

/// Maximum batch size for bulk fetches.
pub const MAX_BULK_BATCH_SIZE: usize = 1000;
