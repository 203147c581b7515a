pub mod aggregate;
pub mod awards;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod games;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod pitch;
pub mod preprocess;
pub mod scoring;
pub mod snapshot;
pub mod text;
pub mod zones;
