//! Wellspring Engine - On-device health trend analysis and transformation planning
//!
//! The engine turns timestamped biometric test results into per-domain trend
//! reports and builds multi-month transformation plans from a health snapshot.
//!
//! ## Modules
//!
//! - **Domain analyzers**: sleep, hearing, vision, tactile, tongue, cognitive,
//!   journal and medical records → summary, trend and recommendations
//! - **Planner**: health snapshot → goals, phases, milestones and daily plans

pub mod config;
pub mod domains;
pub mod error;
pub mod pipeline;
pub mod planner;
pub mod trend;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::PlannerConfig;
pub use domains::{analyze_all_json, analyze_domain_json, DomainAnalyzer, DomainProfile};
pub use error::EngineError;
pub use pipeline::{analyze_domain, generate_daily_plans, generate_plan};
pub use planner::{HealthSnapshot, LongTermPlan, LongTermPlanner, PlanDuration, UrgencyLevel};
pub use trend::{classify, classify_windowed, Polarity, TrendConfig};
pub use types::{Domain, DomainReport, DomainSummary, Recommendation, TrendDirection};

/// Engine version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "wellspring-engine";
