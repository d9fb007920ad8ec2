pub mod companies_handler;
pub mod fixed_shifts_handler;
pub mod health;
pub mod members_handler;
pub mod metrics;
pub mod notices_handler;
pub mod schedules_handler;
pub mod swaps_handler;

pub use health::health_check;
pub use metrics::{metrics_handler, setup_metrics_recorder, MetricsState};
