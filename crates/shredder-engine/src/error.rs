//! Error taxonomy of the render loop.
//!
//! Only `ClockError` is fatal to a running loop. Every other failure is
//! reported at the tick boundary and the loop keeps going.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::coords::SurfaceSize;

/// The time source could not be read.
#[derive(Debug, Clone, Error)]
#[error("clock unavailable: {reason}")]
pub struct ClockError {
    pub reason: String,
}

impl ClockError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// The host could not report its viewport size.
#[derive(Debug, Clone, Error)]
#[error("viewport size unavailable: {reason}")]
pub struct ViewportQueryError {
    pub reason: String,
}

impl ViewportQueryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// The host rejected a surface size.
#[derive(Debug, Clone, Error)]
#[error("cannot resize surface to {}x{}: {reason}", .requested.width, .requested.height)]
pub struct ResizeError {
    pub requested: SurfaceSize,
    pub reason: String,
}

impl ResizeError {
    pub fn new(requested: SurfaceSize, reason: impl Into<String>) -> Self {
        Self {
            requested,
            reason: reason.into(),
        }
    }
}

/// The host refused to schedule the next tick.
#[derive(Debug, Clone, Error)]
#[error("failed to schedule next tick: {0}")]
pub struct ScheduleError(pub String);

/// Opaque failure raised by a render engine's `update` or `render`.
#[derive(Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl EngineError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineError")
            .field("message", &self.message)
            .field("source", &self.source.as_ref().map(|s| s.to_string()))
            .finish()
    }
}

/// Invalid loop configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("target frame rate must be finite and positive, got {0}")]
    InvalidFrameRate(f64),
}

/// Failure while constructing a render loop.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Clock(#[from] ClockError),
}
