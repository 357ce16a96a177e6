//! Shared types and models for CuacaMap
//!
//! This crate contains the BMKG forecast model, the village model and the
//! hazard alert engine, shared between the backend and the browser (via WASM).

pub mod alerts;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
