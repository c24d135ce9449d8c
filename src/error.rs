//! Error types for inputflow.

use thiserror::Error;

/// Errors raised by engines, configuration and device adapters.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input is not declared by the engine's input enumeration.
    #[error("invalid input '{input}' for '{engine}'")]
    InvalidInput { input: String, engine: &'static str },

    /// A name or loosely typed value could not be mapped to an input or native id.
    #[error("unable to interpret '{value}' as {target}")]
    Conversion { value: String, target: &'static str },

    /// Amplitude is zero or not finite; normalization would divide by it.
    #[error("invalid amplitude {amplitude} for input '{input}'")]
    InvalidAmplitude { input: String, amplitude: f32 },

    #[error("invalid offset {offset} for input '{input}'")]
    InvalidOffset { input: String, offset: f32 },

    /// Smoothing epsilon must be finite and non-negative.
    #[error("invalid smoothing epsilon {0}")]
    InvalidSmoothing(f32),

    /// A device was found but is not in the known preset registry.
    #[error("unknown device configuration for '{0}'")]
    UnknownDevice(String),

    #[error("no input device found")]
    NoDevice,

    /// The adapter's event feed was closed.
    #[error("device '{0}' disconnected")]
    Disconnected(String),

    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "hid")]
    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub(crate) fn conversion(value: impl Into<String>, target: &'static str) -> Self {
        EngineError::Conversion {
            value: value.into(),
            target,
        }
    }
}
