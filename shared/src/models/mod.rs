//! Domain models for CuacaMap

mod alert;
mod forecast;
mod village;

pub use alert::*;
pub use forecast::*;
pub use village::*;
