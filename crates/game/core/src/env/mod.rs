//! Traits describing read-only catalog data.
//!
//! Oracles expose microgame metadata and conversion method records supplied by
//! the definition loader. The core never fetches these itself; it only looks
//! them up through the traits below.
mod methods;
mod microgames;

pub use methods::{MethodOracle, MethodTable};
pub use microgames::{MicrogameOracle, MicrogameTable};
