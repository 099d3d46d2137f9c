//! AuthorMaps Common Library
//!
//! Shared code for the AuthorMaps front-ends and the network core:
//! - Error types and handling
//! - Configuration management
//! - Flat-file cache for remote lookups
//! - PubMed E-utilities client and the publication source abstraction
//! - Metrics and tracing setup

pub mod cache;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod pubmed;
pub mod telemetry;

// Re-export commonly used types
pub use cache::FileCache;
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use pubmed::{MemorySource, PubMedClient, PubMedSource, PublicationSource};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound on publications accepted for a target author
pub const DEFAULT_MAX_PUBLICATIONS: usize = 1000;

/// Pause after every successful remote fetch, in milliseconds
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 400;
