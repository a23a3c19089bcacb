//! # prisma-ts-cli
//!
//! Binary side of the prisma-ts generator.
//!
//! Started by the Prisma CLI without arguments, the binary serves the
//! generator host protocol over stdio. The offline subcommands run the same
//! pass against a DMMF JSON file.
//!
//! ## Architecture
//!
//! - [`host`] - JSON-RPC request loop for the Prisma CLI
//! - [`input`] - DMMF file loading for offline runs
//! - [`error`] - Error types and handling

pub mod error;
pub mod host;
pub mod input;

// Re-export main types for convenience
pub use error::{CliError, CliResult};
pub use host::serve;
pub use input::load_options;

/// Whether an existing output file matches freshly generated content.
///
/// Surrounding whitespace is ignored.
pub fn is_up_to_date(existing: &str, generated: &str) -> bool {
    existing.trim() == generated.trim()
}
