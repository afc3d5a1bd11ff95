pub mod config;
pub mod error;
pub mod risk;

pub use config::MoodcheckConfig;
pub use error::{MoodcheckError, Result};
pub use risk::{is_high_risk, RiskSignal};
