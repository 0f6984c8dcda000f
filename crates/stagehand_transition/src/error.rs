//! Transition error types

use thiserror::Error;

/// Invalid transition options
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Duration must be a positive, finite number of milliseconds
    #[error("Invalid transition duration: {0}ms")]
    InvalidDuration(f32),

    /// Threshold must be a non-negative, finite number of pixels
    #[error("Invalid animation threshold: {0}px")]
    InvalidThreshold(f32),
}

/// Failures reported by a [`DomRuntime`](crate::runtime::DomRuntime)
///
/// The controller never propagates these out of a hook; they are logged and
/// the affected element goes without animation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The element is not part of the document (or never was)
    #[error("Element is detached: {0}")]
    Detached(String),

    /// The insertion would make a node its own ancestor
    #[error("Invalid hierarchy: {0}")]
    Hierarchy(String),

    /// The runtime refused to play the keyframes
    #[error("Animation rejected: {0}")]
    AnimationRejected(String),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
