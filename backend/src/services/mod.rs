//! Business logic services for CuacaMap

pub mod village;
pub mod weather;

pub use village::VillageDirectory;
pub use weather::WeatherService;
