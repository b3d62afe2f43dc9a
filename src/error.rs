//! Error types for the game-night service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application. Callers that need to react to a specific failure
//! downcast to [`GameNightError`].

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific game-night scenarios
#[derive(Debug, thiserror::Error)]
pub enum GameNightError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Username already taken: {username}")]
    UsernameTaken { username: String },

    #[error("Game not found: {game_id}")]
    GameNotFound { game_id: u64 },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl GameNightError {
    /// Shorthand for an [`GameNightError::InvalidArgument`] error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}
