//! Error types for scene construction.
//!
//! Configuration errors surface through `Result` at build time. The rendering
//! hot path never returns errors; numerical degeneracies become zero-density
//! or black-spectrum sentinel values instead.

use thiserror::Error;

/// Errors raised while building a scene or its plugins.
#[derive(Error, Debug)]
pub enum Error {
    /// A required parameter was not supplied.
    #[error("missing required parameter '{0}'")]
    MissingParam(String),

    /// A parameter was supplied with an incompatible type.
    #[error("parameter '{0}' has the wrong type")]
    ParamType(String),

    /// No plugin is registered under the given type identifier.
    #[error("unknown plugin type '{0}'")]
    UnknownPlugin(String),

    /// Supplied data is internally inconsistent (e.g. mismatched array sizes).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// An operation was invoked on a component that cannot support it (e.g.
    /// querying a position density from a delta light). Signals a programming
    /// error, not a recoverable runtime condition.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Failure writing the output image.
    #[error("image output failed: {0}")]
    Output(String),
}

/// Convenience result alias for build-time operations.
pub type Result<T> = std::result::Result<T, Error>;
