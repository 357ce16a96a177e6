//! External API integrations

pub mod bmkg;

pub use bmkg::BmkgClient;
