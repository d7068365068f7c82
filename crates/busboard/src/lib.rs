//! `busboard` - An offline fleet board for bus stations
//!
//! This library provides the core functionality for tracking a daily bus
//! roster, persisting end-of-day logs, and mining the history for
//! suggestions, anomalies, forecasts, and narrative summaries.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod roster;
pub mod store;

pub use analytics::{Anomaly, AnomalyKind, Forecast, Severity, Suggestion, Trend};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use roster::{BusRecord, Complaint, DayLog, Template};
pub use store::Store;
