//! # Fuzzmatch Shared Rust Library
//!
//! Host-side infrastructure around [`fuzzmatch_core`]:
//! - **config**: JSON configuration files for the match engine
//! - **error**: Common error types
//! - **tracing**: Logging setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fuzzmatch::config::engine_from_file;
//!
//! fuzzmatch::tracing::init();
//! let engine = engine_from_file("fuzzmatch.json")?;
//! let result = engine.compare("Apple Inc.", "Apple Incorporated")?;
//! ```

pub mod config;
pub mod error;
pub mod tracing;

// Re-export commonly used items at crate root
pub use config::{engine_from_file, load_config, load_from_env, parse_config};
pub use error::{Error, Result};
pub use fuzzmatch_core::{
    Algorithm, Comparison, EngineConfig, EntityProfile, MatchEngine, MatchError,
};
