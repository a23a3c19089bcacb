//! # prisma-ts
//!
//! Generate TypeScript declarations from a Prisma datamodel.
//!
//! Every model becomes an interface holding its scalar and enum fields, and
//! every enum becomes an `as const` object plus a type alias for the union
//! of its values:
//!
//! ```text
//! export interface User {
//!   id: number;
//!   email: string | null;
//!   tags: string[];
//! }
//!
//! export const Role = { ADMIN: "ADMIN", USER: "USER" } as const;
//! export type Role = (typeof Role)[keyof typeof Role];
//! ```
//!
//! ## Architecture
//!
//! - [`dmmf`] - Datamodel types deserialized from the schema engine payload
//! - [`type_mapper`] - Scalar to TypeScript type mapping
//! - [`emitter`] - Text emission per declaration kind
//! - [`format`] - Normalization pass over the emitted text
//! - [`writer`] - File output and dry-run support
//! - [`config`] - Generator options and their resolution
//! - [`validate`] - Duplicate name checks
//! - [`generator`] - The `manifest` and `generate` hooks
//! - [`error`] - Error types and handling

pub mod config;
pub mod dmmf;
pub mod emitter;
pub mod error;
pub mod format;
pub mod generator;
pub mod type_mapper;
pub mod validate;
pub mod writer;

// Re-export main types for convenience
pub use config::{CliArgs, GeneratorConfig, GeneratorOptions};
pub use dmmf::{Datamodel, DatamodelEnum, Field, FieldKind, Model};
pub use error::{GenerateError, GenerateResult};
pub use format::{FormatOptions, Formatter};
pub use generator::{generate, manifest, GeneratedOutput, Manifest, TypesGenerator};
pub use writer::{FileWriter, WriteResult};
