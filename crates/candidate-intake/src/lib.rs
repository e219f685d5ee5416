pub mod config;
pub mod csrf;
pub mod error;
pub mod intake;
pub mod lookup;
pub mod postal;
pub mod telemetry;
