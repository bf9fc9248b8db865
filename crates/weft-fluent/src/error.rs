#![forbid(unsafe_code)]

//! Error types for bundle compilation and message formatting.
//!
//! There are exactly two error kinds in the pipeline, and both mark
//! authoring or programming defects rather than recoverable runtime
//! conditions:
//!
//! - [`CompileError`]: the concatenated message resource is malformed. The
//!   bundle container treats this as fatal at the point of compilation.
//! - [`FormatError`]: formatting a known message with resolved arguments
//!   reported errors. The message accessor treats a non-empty error list as
//!   fatal rather than degrading to partial output.
//!
//! A key missing from the active locale's bundle is **not** an error: it is
//! the defined fallback path to the English bundle.

use fluent_bundle::FluentError;
use fluent_syntax::parser::ParserError;
use thiserror::Error;

/// The message resource text could not be compiled into a bundle.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The resource text contains Fluent syntax errors.
    #[error("message resource failed to parse ({} error(s)): {errors:?}", .errors.len())]
    Parse {
        /// Parser errors with byte-range positions into the resource text.
        errors: Vec<ParserError>,
    },

    /// The parsed resource could not be added to the bundle (e.g. a message
    /// id is defined twice across concatenated blocks).
    #[error("compiled resource rejected by bundle ({} error(s)): {errors:?}", .errors.len())]
    Resource {
        errors: Vec<FluentError>,
    },
}

/// Formatting a message pattern with resolved arguments reported errors.
#[derive(Debug, Error)]
#[error("formatting message `{key}` reported {} error(s): {errors:?}", .errors.len())]
pub struct FormatError {
    /// The message key being formatted.
    pub key: String,
    /// Resolver errors collected during formatting.
    pub errors: Vec<FluentError>,
}
