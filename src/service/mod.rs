//! Service layer for the game-night service
//!
//! This module contains the application state, the HTTP API and the health
//! checks backing the operational endpoints.

pub mod app;
pub mod health;
pub mod http;

pub use app::{AppState, ServiceContext, ServiceError};
pub use health::{HealthCheck, HealthStatus};
pub use http::{router, Account, ACCOUNT_HEADER};
