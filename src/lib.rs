// Library interface for the cellrs modules
// This allows integration tests to access the core functionality

pub mod capacity;
pub mod config;
pub mod datasets;
pub mod eol;
pub mod error;
pub mod export;
pub mod health;
pub mod import;
pub mod logging;
pub mod models;
pub mod regression;
pub mod report;
pub mod soh;
pub mod statistics;

// Re-export commonly used types for convenience
pub use models::*;
pub use capacity::{CapacityFadeAnalysis, CapacityFadeAnalyzer};
pub use config::AppConfig;
pub use datasets::NominalCapacityTable;
pub use eol::{EolConfig, EolEstimate, EolEstimator, EolMethod};
pub use error::{CellRsError, Result};
pub use health::{HealthAssessment, HealthAssessor, HealthStatus};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use report::{BatteryAnalyzer, BatteryReport, BatterySummary, RulReporter};
pub use soh::{SohSeries, SohSeriesBuilder};
pub use statistics::{StatisticalSummarizer, StatisticalSummary};
