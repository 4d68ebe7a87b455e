//! Error types for brailleplot operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, laying out or rasterizing diagrams.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG decoding error.
    #[error("PNG decoding error: {0}")]
    PngDecoding(#[from] png::DecodingError),

    /// Malformed line in a properties source.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// A property key is unknown or its value fails validation.
    #[error("invalid configuration value '{value}' for '{key}': {message}")]
    ConfigInvalid {
        /// The fully qualified property key.
        key: String,
        /// The offending value.
        value: String,
        /// Why the value was rejected.
        message: String,
    },

    /// Required properties are absent after merging all sources.
    #[error("missing required properties in '{namespace}': {}", keys.join(", "))]
    ConfigMissing {
        /// Namespace the properties belong to (e.g. `printer`, `format.A4`).
        namespace: String,
        /// Keys that were not provided.
        keys: Vec<String>,
    },

    /// A format name was requested that the configuration does not define.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// A rectangle carve asked for more than the rectangle holds.
    #[error("out of space: requested {requested}, available {available}")]
    OutOfSpace {
        /// Requested strip size.
        requested: f64,
        /// Extent left on that side.
        available: f64,
    },

    /// The diagram cannot be laid out in the area the canvas provides.
    #[error("insufficient rendering area: {message}")]
    InsufficientArea {
        /// Diagnostic naming required vs. available space.
        message: String,
        /// Lower-level failure that triggered this one, if any.
        #[source]
        source: Option<Box<Error>>,
    },

    /// The canvas cell geometry is not a 6-dot or 8-dot braille raster.
    #[error("rasterizer requires a 6-dot or 8-dot braille raster, got {cell_width}x{cell_height} cells")]
    InvalidRaster {
        /// Cell width in dots.
        cell_width: usize,
        /// Cell height in dots.
        cell_height: usize,
    },

    /// No rasterizer or plotter is registered for the renderable kind.
    #[error("no {stage} registered for renderable kind '{kind}'")]
    NoRasterizer {
        /// Name of the renderable kind.
        kind: &'static str,
        /// `rasterizer` or `plotter`.
        stage: &'static str,
    },

    /// A handler was invoked with a renderable of the wrong kind.
    #[error("handler for '{expected}' cannot process renderable '{found}'")]
    RenderableMismatch {
        /// Kind the handler was registered for.
        expected: &'static str,
        /// Kind that was passed in.
        found: &'static str,
    },

    /// Invalid dimensions for a page or image.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: usize,
        /// Height value.
        height: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// The braille table has no pattern for a character.
    #[error("no braille pattern for symbol '{0}'")]
    UnknownBrailleCharacter(String),
}

impl Error {
    /// Create an insufficient-area error without an underlying cause.
    pub fn insufficient_area(message: impl Into<String>) -> Self {
        Self::InsufficientArea { message: message.into(), source: None }
    }

    /// Wrap a lower-level failure (usually [`Error::OutOfSpace`]) as insufficient area.
    pub fn insufficient_area_from(message: impl Into<String>, source: Error) -> Self {
        Self::InsufficientArea { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Whether a caller can retry with a smaller layout (fewer categories, shorter text).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientArea { .. } | Self::OutOfSpace { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions { width: 0, height: 100 };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_missing_properties_lists_keys() {
        let err = Error::ConfigMissing {
            namespace: "format.A4".to_string(),
            keys: vec!["page.width".to_string(), "margin.top".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("format.A4"));
        assert!(msg.contains("page.width, margin.top"));
    }

    #[test]
    fn test_insufficient_area_keeps_source() {
        use std::error::Error as _;
        let err = Error::insufficient_area_from(
            "bar chart layout",
            Error::OutOfSpace { requested: 3.0, available: 1.0 },
        );
        assert!(err.is_recoverable());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_precondition_not_recoverable() {
        let err = Error::InvalidRaster { cell_width: 3, cell_height: 3 };
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("3x3"));
    }
}
