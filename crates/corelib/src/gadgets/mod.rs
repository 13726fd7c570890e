//! Gadgets written once against `circuit::Api`.

pub mod bits;
pub mod fraction;
pub mod hash;
pub mod mux;
pub mod range;

pub use fraction::FractionVar;
pub use hash::HashGadget;
pub use range::reduce;
