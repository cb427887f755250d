//! Bindings for the external DEX programs

pub mod pair;
pub mod router;
