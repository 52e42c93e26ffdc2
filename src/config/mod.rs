pub mod app;

pub use app::{AppConfig, OracleConfig, OracleProvider, ReviewsConfig};
