use rev_mapper::{DecodeError, EncodeError};

/// Error types for reading and writing mapped documents.
#[derive(Debug)]
pub enum SerdeError {
    /// JSON syntax error or JSON writer failure
    Json(serde_json::Error),

    /// XML syntax error or XML writer failure
    #[cfg(feature = "xml")]
    Xml(quick_xml::Error),

    /// IO error while reading or writing a document
    Io(std::io::Error),

    /// The parsed tree could not be bound to the requested entity
    Decode(DecodeError),

    /// The entity could not be turned into a tree
    Encode(EncodeError),

    /// Custom error message
    Custom(String),
}

impl std::fmt::Display for SerdeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerdeError::Json(e) => write!(f, "JSON error: {}", e),
            #[cfg(feature = "xml")]
            SerdeError::Xml(e) => write!(f, "XML error: {}", e),
            SerdeError::Io(e) => write!(f, "IO error: {}", e),
            SerdeError::Decode(e) => write!(f, "decode error: {}", e),
            SerdeError::Encode(e) => write!(f, "encode error: {}", e),
            SerdeError::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SerdeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerdeError::Json(e) => Some(e),
            #[cfg(feature = "xml")]
            SerdeError::Xml(e) => Some(e),
            SerdeError::Io(e) => Some(e),
            SerdeError::Decode(e) => Some(e),
            SerdeError::Encode(e) => Some(e),
            SerdeError::Custom(_) => None,
        }
    }
}

impl From<serde_json::Error> for SerdeError {
    fn from(err: serde_json::Error) -> Self {
        SerdeError::Json(err)
    }
}

#[cfg(feature = "xml")]
impl From<quick_xml::Error> for SerdeError {
    fn from(err: quick_xml::Error) -> Self {
        SerdeError::Xml(err)
    }
}

impl From<std::io::Error> for SerdeError {
    fn from(err: std::io::Error) -> Self {
        SerdeError::Io(err)
    }
}

impl From<DecodeError> for SerdeError {
    fn from(err: DecodeError) -> Self {
        SerdeError::Decode(err)
    }
}

impl From<EncodeError> for SerdeError {
    fn from(err: EncodeError) -> Self {
        SerdeError::Encode(err)
    }
}

impl From<String> for SerdeError {
    fn from(msg: String) -> Self {
        SerdeError::Custom(msg)
    }
}

impl From<&str> for SerdeError {
    fn from(msg: &str) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}

/// Result type alias for document reading and writing
pub type Result<T> = std::result::Result<T, SerdeError>;
