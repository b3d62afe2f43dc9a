//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the game-night service using
//! Prometheus metrics.

use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec,
    Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the game-night service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Rating engine metrics
    engine_metrics: EngineMetrics,

    /// Score store metrics
    store_metrics: StoreMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// HTTP requests handled, by route and status class
    pub http_requests_total: IntCounterVec,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,
}

/// Rating engine metrics
#[derive(Clone)]
pub struct EngineMetrics {
    /// Skill lookups by mode (game or leaderboard)
    pub skill_requests_total: IntCounterVec,

    /// Leaderboard computations
    pub leaderboard_computations_total: IntCounter,

    /// Team generations by team count
    pub team_generations_total: IntCounterVec,

    /// Players placed into teams
    pub players_assigned_total: IntCounter,

    /// Duration of engine operations
    pub computation_duration: HistogramVec,

    /// Distribution of team sizes handed to the balancer
    pub roster_size: Histogram,
}

/// Score store metrics
#[derive(Clone)]
pub struct StoreMetrics {
    /// Scores appended
    pub scores_recorded_total: IntCounter,

    /// Entity mutations by kind
    pub entity_mutations_total: IntCounterVec,

    /// Store operation failures by operation
    pub store_errors_total: IntCounterVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let engine_metrics = EngineMetrics::new(&registry)?;
        let store_metrics = StoreMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            engine_metrics,
            store_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get engine metrics
    pub fn engine(&self) -> &EngineMetrics {
        &self.engine_metrics
    }

    /// Get store metrics
    pub fn store(&self) -> &StoreMetrics {
        &self.store_metrics
    }

    /// Record a skill lookup
    pub fn record_skill_request(&self, leaderboard_mode: bool, duration: Duration) {
        let mode = if leaderboard_mode { "leaderboard" } else { "game" };

        self.engine_metrics
            .skill_requests_total
            .with_label_values(&[mode])
            .inc();

        self.record_engine_operation("skill", duration);
    }

    /// Record a leaderboard computation
    pub fn record_leaderboard(&self, duration: Duration) {
        self.engine_metrics.leaderboard_computations_total.inc();
        self.record_engine_operation("leaderboard", duration);
    }

    /// Record a team generation
    pub fn record_team_generation(&self, team_count: usize, players: usize, duration: Duration) {
        self.engine_metrics
            .team_generations_total
            .with_label_values(&[team_count.to_string().as_str()])
            .inc();

        self.engine_metrics
            .players_assigned_total
            .inc_by(players as u64);

        self.engine_metrics.roster_size.observe(players as f64);

        self.record_engine_operation("teams", duration);
    }

    /// Record engine operation duration
    pub fn record_engine_operation(&self, operation: &str, duration: Duration) {
        self.engine_metrics
            .computation_duration
            .with_label_values(&[operation])
            .observe(duration.as_secs_f64());
    }

    /// Record a score being appended
    pub fn record_score_recorded(&self) {
        self.store_metrics.scores_recorded_total.inc();
    }

    /// Record a player or game mutation
    pub fn record_entity_mutation(&self, kind: &str) {
        self.store_metrics
            .entity_mutations_total
            .with_label_values(&[kind])
            .inc();
    }

    /// Record a failed store operation
    pub fn record_store_error(&self, operation: &str) {
        self.store_metrics
            .store_errors_total
            .with_label_values(&[operation])
            .inc();
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, route: &str, status: u16) {
        let class = match status {
            200..=299 => "2xx",
            400..=499 => "4xx",
            500..=599 => "5xx",
            _ => "other",
        };

        self.service_metrics
            .http_requests_total
            .with_label_values(&[route, class])
            .inc();
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let http_requests_total = IntCounterVec::new(
            Opts::new("game_night_http_requests_total", "Total HTTP requests"),
            &["route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let health_status = IntGauge::new(
            "game_night_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("game_night_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        Ok(Self {
            http_requests_total,
            health_status,
            component_health,
        })
    }
}

impl EngineMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let skill_requests_total = IntCounterVec::new(
            Opts::new("game_night_skill_requests_total", "Total skill lookups"),
            &["mode"],
        )?;
        registry.register(Box::new(skill_requests_total.clone()))?;

        let leaderboard_computations_total = IntCounter::new(
            "game_night_leaderboard_computations_total",
            "Total leaderboard computations",
        )?;
        registry.register(Box::new(leaderboard_computations_total.clone()))?;

        let team_generations_total = IntCounterVec::new(
            Opts::new("game_night_team_generations_total", "Total team generations"),
            &["team_count"],
        )?;
        registry.register(Box::new(team_generations_total.clone()))?;

        let players_assigned_total = IntCounter::new(
            "game_night_players_assigned_total",
            "Total players placed into teams",
        )?;
        registry.register(Box::new(players_assigned_total.clone()))?;

        let computation_duration = HistogramVec::new(
            HistogramOpts::new(
                "game_night_computation_duration_seconds",
                "Engine computation duration",
            )
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
            &["operation"],
        )?;
        registry.register(Box::new(computation_duration.clone()))?;

        let roster_size = Histogram::with_opts(
            HistogramOpts::new("game_night_roster_size", "Players per team generation")
                .buckets(vec![2.0, 4.0, 6.0, 8.0, 12.0, 16.0, 24.0, 32.0]),
        )?;
        registry.register(Box::new(roster_size.clone()))?;

        Ok(Self {
            skill_requests_total,
            leaderboard_computations_total,
            team_generations_total,
            players_assigned_total,
            computation_duration,
            roster_size,
        })
    }
}

impl StoreMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let scores_recorded_total =
            IntCounter::new("game_night_scores_recorded_total", "Total scores recorded")?;
        registry.register(Box::new(scores_recorded_total.clone()))?;

        let entity_mutations_total = IntCounterVec::new(
            Opts::new(
                "game_night_entity_mutations_total",
                "Player and game mutations",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(entity_mutations_total.clone()))?;

        let store_errors_total = IntCounterVec::new(
            Opts::new("game_night_store_errors_total", "Store operation failures"),
            &["operation"],
        )?;
        registry.register(Box::new(store_errors_total.clone()))?;

        Ok(Self {
            scores_recorded_total,
            entity_mutations_total,
            store_errors_total,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}
