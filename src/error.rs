//! Error types for the register codec.

use std::io;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while decoding register blocks.
///
/// Only structural errors ([`UnknownType`](CodecError::UnknownType),
/// [`InvalidTemplate`](CodecError::InvalidTemplate), ...) ever leave
/// [`decode`](crate::decode). Data-level errors
/// ([`TruncatedChunk`](CodecError::TruncatedChunk) and
/// [`MalformedBuffer`](CodecError::MalformedBuffer)) are turned into
/// placeholder records by the record builder.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Template references a type name outside the fixed registry.
    #[error("Unknown data type '{name}'")]
    UnknownType {
        /// The name that failed to resolve.
        name: String,
    },

    /// Fewer bytes were available than the data type requires.
    #[error("Truncated chunk for {data_type}: expected {expected} bytes, got {actual}")]
    TruncatedChunk {
        /// Name of the data type being decoded.
        data_type: &'static str,
        /// Declared byte width.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// The bytes are present but cannot be interpreted as the data type.
    #[error("Malformed buffer for {data_type}: {reason}")]
    MalformedBuffer {
        /// Name of the data type being decoded.
        data_type: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// Template shape does not fit the block being decoded.
    #[error("Invalid template: {reason}")]
    InvalidTemplate {
        /// Description of the template error.
        reason: String,
    },

    /// Named template is absent from a template set.
    #[error("Template '{name}' not found")]
    TemplateNotFound {
        /// Requested template name.
        name: String,
    },

    /// Invalid parameter provided.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        parameter: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// Invalid response received from the register source.
    #[error("Invalid response: {reason}")]
    InvalidResponse {
        /// Description of the response error.
        reason: String,
    },

    /// Device answered with a Modbus exception response.
    #[error("Exception response 0x{code:02X}: {}", exception_name(.code))]
    Exception {
        /// Modbus exception code.
        code: u8,
    },

    /// I/O error while reading a template file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML template could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// JSON template could not be parsed or records could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Creates a new `UnknownType` error.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::CodecError;
    ///
    /// let err = CodecError::unknown_type("B24_UINT");
    /// assert_eq!(err.to_string(), "Unknown data type 'B24_UINT'");
    /// ```
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    /// Creates a new `TruncatedChunk` error.
    pub fn truncated(data_type: &'static str, expected: usize, actual: usize) -> Self {
        Self::TruncatedChunk {
            data_type,
            expected,
            actual,
        }
    }

    /// Creates a new `MalformedBuffer` error.
    pub fn malformed(data_type: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedBuffer {
            data_type,
            reason: reason.into(),
        }
    }

    /// Creates a new `InvalidTemplate` error.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::CodecError;
    ///
    /// let err = CodecError::invalid_template("B16_UINT is not a 1-bit type");
    /// ```
    pub fn invalid_template(reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            reason: reason.into(),
        }
    }

    /// Creates a new `TemplateNotFound` error.
    pub fn template_not_found(name: impl Into<String>) -> Self {
        Self::TemplateNotFound { name: name.into() }
    }

    /// Creates a new `InvalidParameter` error.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::CodecError;
    ///
    /// let err = CodecError::invalid_parameter("register_size", "must be greater than 0");
    /// ```
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `InvalidResponse` error.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    /// Returns whether the error only affects a single template entry.
    ///
    /// Recoverable errors become placeholder records; everything else aborts
    /// the decode call.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::CodecError;
    ///
    /// assert!(CodecError::truncated("B32_UINT", 4, 2).is_recoverable());
    /// assert!(!CodecError::unknown_type("B24_UINT").is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::TruncatedChunk { .. } | Self::MalformedBuffer { .. }
        )
    }
}

/// Returns the name of a Modbus exception code.
///
/// # Example
///
/// ```
/// use modbus_regcodec::exception_description;
///
/// assert_eq!(exception_description(0x02), "IllegalAddress");
/// assert_eq!(exception_description(0x7F), "Unknown exception");
/// ```
pub fn exception_description(code: u8) -> &'static str {
    match code {
        0x01 => "IllegalFunction",
        0x02 => "IllegalAddress",
        0x03 => "IllegalValue",
        0x04 => "SlaveFailure",
        0x05 => "Acknowledge",
        0x06 => "SlaveBusy",
        0x08 => "MemoryParityError",
        0x0A => "GatewayPathUnavailable",
        0x0B => "GatewayNoResponse",
        _ => "Unknown exception",
    }
}

fn exception_name(code: &u8) -> &'static str {
    exception_description(*code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_display() {
        let err = CodecError::unknown_type("B128_UINT");
        assert_eq!(err.to_string(), "Unknown data type 'B128_UINT'");
    }

    #[test]
    fn test_truncated_display() {
        let err = CodecError::truncated("B32_FLOAT", 4, 1);
        assert_eq!(
            err.to_string(),
            "Truncated chunk for B32_FLOAT: expected 4 bytes, got 1"
        );
    }

    #[test]
    fn test_exception_display() {
        let err = CodecError::Exception { code: 0x02 };
        assert_eq!(err.to_string(), "Exception response 0x02: IllegalAddress");
    }

    #[test]
    fn test_template_not_found_display() {
        let err = CodecError::template_not_found("meter");
        assert_eq!(err.to_string(), "Template 'meter' not found");
    }

    #[test]
    fn test_recoverable() {
        assert!(CodecError::malformed("B64_STRING", "invalid utf-8").is_recoverable());
        assert!(!CodecError::invalid_template("bad").is_recoverable());
        assert!(!CodecError::Exception { code: 1 }.is_recoverable());
    }

    #[test]
    fn test_exception_descriptions() {
        assert_eq!(exception_description(0x01), "IllegalFunction");
        assert_eq!(exception_description(0x0B), "GatewayNoResponse");
        assert_eq!(exception_description(0x07), "Unknown exception");
    }
}
