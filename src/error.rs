/// Result type for seqnet operations
pub type Result<T> = std::result::Result<T, SeqnetError>;

/// Main error type for the seqnet library
#[derive(Debug, thiserror::Error)]
pub enum SeqnetError {
    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// A layer inside a sequential container failed
    #[error("Layer {index} ({name}) failed: {source}")]
    Layer {
        index: usize,
        name: &'static str,
        #[source]
        source: Box<SeqnetError>,
    },

    /// A block of an architecture description failed to build
    #[error("Block {index} failed: {source}")]
    Block {
        index: usize,
        #[source]
        source: Box<SeqnetError>,
    },

    /// Malformed architecture description
    #[error("Config error: {0}")]
    Config(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SeqnetError {
    fn from(err: serde_json::Error) -> Self {
        SeqnetError::Config(err.to_string())
    }
}

impl From<ndarray::ShapeError> for SeqnetError {
    fn from(err: ndarray::ShapeError) -> Self {
        SeqnetError::DimensionMismatch {
            expected: "compatible array shape".to_string(),
            actual: err.to_string(),
        }
    }
}

// Helper functions for common error patterns
impl SeqnetError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        SeqnetError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        SeqnetError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an error raised by the layer at `index` of a container
    pub fn in_layer(self, index: usize, name: &'static str) -> Self {
        SeqnetError::Layer {
            index,
            name,
            source: Box::new(self),
        }
    }

    /// Wrap an error raised while building block `index` of an architecture
    pub fn in_block(self, index: usize) -> Self {
        SeqnetError::Block {
            index,
            source: Box::new(self),
        }
    }
}
