//! Multi-target source emitter for introspected service API models.
//!
//! A [`Model`] describes the declarations and controllers of every origin
//! (service). The [`Generator`] runs the configured emitters over it and
//! returns one module per origin and emission:
//!
//! - structural TypeScript declarations (interfaces, string enums)
//! - schema factories that build input/output object types once per name
//! - per-controller schema objects wired to request builders, plus the
//!   Query/Mutation roots
//! - request builders for every controller method
//!
//! Type references between files go through the [`resolve`] module, schema
//! names through the run-wide [`NameRegistry`]. The [`runtime`] module models
//! what the generated schema code does at request time.

#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

pub mod config;
pub mod context;
pub mod emit;
pub mod emitters;
pub mod error;
pub mod generator;
pub mod model;
pub mod names;
pub mod naming;
pub mod paths;
pub mod resolve;
pub mod runtime;
#[cfg(test)]
mod test_support;
pub mod ts;

pub use config::{EmitterConfig, FormatConfig, GeneratorConfig, LintConfig, SideOrigin, SupportConfig};
pub use context::GenerationContext;
pub use emit::{Connection, Emit, EmitMap};
pub use emitters::{Emitter, EmitterKind, EmitterRegistry};
pub use error::{Error, Result};
pub use generator::{GeneratedFiles, Generator};
pub use model::{Model, TypeDescriptor, TypeKind};
pub use names::{NameRegistry, NameRequest};
pub use naming::Naming;
pub use resolve::{Representation, TypeRequest, TypeResolver};
pub use runtime::MatchPolicy;
