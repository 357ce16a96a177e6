//! HTTP request handlers

pub mod health;
pub mod village;
pub mod weather;

pub use health::*;
pub use village::*;
pub use weather::*;
