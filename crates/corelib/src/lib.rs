//! Core library: field fractions, constraint API, gadgets, and the bounded
//! commitment-driven selection of iris artifacts.

pub mod backend;
pub mod circuit;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod fraction;
pub mod gadgets;
pub mod identity;
pub mod proof;
pub mod selection;

pub use circuit::{Api, Circuit, CircuitBuilder, ConstraintSystem, Evaluator, Witness};
pub use config::{EngineConfig, SelectionConfig, Settings};
pub use crypto::field::Fr;
pub use errors::{ArithError, CircuitError, CompileError, ConfigError, ProofError};
pub use fraction::FieldFraction;
pub use identity::{IdentityCircuit, IrisArtifact};
pub use selection::{select_index, Selection, SelectionCircuit};

/// Version helper for CLI
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
