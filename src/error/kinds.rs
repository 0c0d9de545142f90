use std::{fmt, io};

/// Crate-wide `Result` type using [`BsonconvError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used by the command-line front end and configuration code.
pub type Result<T> = std::result::Result<T, BsonconvError>;

/// Errors produced by the codec itself.
///
/// Every conversion call returns one of these instead of panicking, so a
/// bad input never takes down the caller's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Structural corruption in binary input: truncation, bad length
    /// prefixes, unterminated strings, unknown type tags, excessive nesting.
    MalformedBson(String),

    /// Syntax errors in JSON input or malformed extended JSON wrappers.
    InvalidJson(String),

    /// A value that has no BSON representation.
    UnsupportedValue(String),
}

/// Top-level error type for the command-line front end.
///
/// This type wraps the codec errors together with everything the caller
/// does around them (file I/O, configuration, input checks).
#[derive(Debug)]
pub enum BsonconvError {
    /// Codec errors.
    Conversion(ConversionError),

    /// Configuration errors.
    Config(ConfigError),

    /// Input rejected before it reached the codec.
    Input(InputError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Errors about the input handed to the front end.
#[derive(Debug)]
pub enum InputError {
    /// Input exceeds the configured size ceiling.
    TooLarge { size: u64, limit: u64 },

    /// Conversion direction could not be derived from the file name.
    UnknownDirection(String),

    /// Output would overwrite the input file.
    SameOutput(String),
}

impl ConversionError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::MalformedBson(_) => "MalformedBson",
            ConversionError::InvalidJson(_) => "InvalidJson",
            ConversionError::UnsupportedValue(_) => "UnsupportedValue",
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        ConversionError::MalformedBson(msg.into())
    }

    pub(crate) fn invalid_json(msg: impl Into<String>) -> Self {
        ConversionError::InvalidJson(msg.into())
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        ConversionError::UnsupportedValue(msg.into())
    }
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::MalformedBson(msg) => write!(f, "Malformed BSON: {msg}"),
            ConversionError::InvalidJson(msg) => write!(f, "Invalid JSON: {msg}"),
            ConversionError::UnsupportedValue(msg) => write!(f, "Unsupported value: {msg}"),
        }
    }
}

impl fmt::Display for BsonconvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BsonconvError::Conversion(e) => write!(f, "{e}"),
            BsonconvError::Config(e) => write!(f, "Configuration error: {e}"),
            BsonconvError::Input(e) => write!(f, "Input error: {e}"),
            BsonconvError::Io(e) => write!(f, "I/O error: {e}"),
            BsonconvError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::TooLarge { size, limit } => {
                write!(f, "input is {size} bytes, limit is {limit} bytes")
            }
            InputError::UnknownDirection(path) => write!(
                f,
                "cannot tell conversion direction for '{path}' (expected .bson or .json, or pass --to)"
            ),
            InputError::SameOutput(path) => {
                write!(f, "output path '{path}' is the input file")
            }
        }
    }
}

impl std::error::Error for ConversionError {}
impl std::error::Error for BsonconvError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for InputError {}

/* ========================= Conversions to BsonconvError ========================= */

impl From<io::Error> for BsonconvError {
    fn from(err: io::Error) -> Self {
        BsonconvError::Io(err)
    }
}

impl From<ConversionError> for BsonconvError {
    fn from(err: ConversionError) -> Self {
        BsonconvError::Conversion(err)
    }
}

impl From<ConfigError> for BsonconvError {
    fn from(err: ConfigError) -> Self {
        BsonconvError::Config(err)
    }
}

impl From<InputError> for BsonconvError {
    fn from(err: InputError) -> Self {
        BsonconvError::Input(err)
    }
}

impl From<String> for BsonconvError {
    fn from(msg: String) -> Self {
        BsonconvError::Generic(msg)
    }
}

impl From<&str> for BsonconvError {
    fn from(msg: &str) -> Self {
        BsonconvError::Generic(msg.to_owned())
    }
}
