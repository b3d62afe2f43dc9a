//! Metrics and monitoring for the game-night service
//!
//! Prometheus counters and histograms for engine computations, store
//! mutations and HTTP traffic. They are served on `/metrics` by the HTTP layer.

pub mod collector;

pub use collector::{EngineMetrics, MetricsCollector, MetricsTimer, ServiceMetrics, StoreMetrics};
