use std::fmt;

pub type Result<T> = std::result::Result<T, HierarchyError>;

/// Express whether the error is about what the caller asked for or about the
/// data we were handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLayer {
    /// The request itself can't be satisfied, like an identifier that doesn't
    /// look like a WNID or a synset name.
    BadInput,
    /// The run configuration is inconsistent.  These are raised before any
    /// traversal happens.
    ConfigLayer,
    /// The lexical database or a dataset file doesn't contain what we expected.
    DataLayer,
    /// Reading or writing a file failed.
    IoLayer,
}

/// Details about what went wrong for investigation purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub layer: ErrorLayer,
    /// Stringified version of the lower level error or a description of the
    /// problem.
    pub message: String,
}

impl ErrorDetails {
    pub fn new(layer: ErrorLayer, message: impl Into<String>) -> Self {
        ErrorDetails {
            layer,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// An identifier (usually the root) is absent from the taxonomy.  Fatal for
    /// the invocation.
    NotFound(ErrorDetails),
    /// A bottom-up input leaf couldn't be resolved.  The builders skip these
    /// and report them in their summary; this variant exists for callers that
    /// want to turn the summary into a hard failure.
    UnresolvedLeaf(ErrorDetails),
    /// Options that can never produce a meaningful traversal.
    InvalidConfiguration(ErrorDetails),
    /// Malformed input files.
    DataProblem(ErrorDetails),
}

impl HierarchyError {
    pub fn not_found(id: &str) -> Self {
        HierarchyError::NotFound(ErrorDetails::new(
            ErrorLayer::DataLayer,
            format!("identifier {id} is not in the taxonomy"),
        ))
    }

    pub fn unresolved_leaf(id: &str) -> Self {
        HierarchyError::UnresolvedLeaf(ErrorDetails::new(
            ErrorLayer::BadInput,
            format!("leaf {id} could not be resolved"),
        ))
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        HierarchyError::InvalidConfiguration(ErrorDetails::new(ErrorLayer::ConfigLayer, message))
    }

    pub fn bad_data(message: impl Into<String>) -> Self {
        HierarchyError::DataProblem(ErrorDetails::new(ErrorLayer::DataLayer, message))
    }

    pub fn details(&self) -> &ErrorDetails {
        match self {
            HierarchyError::NotFound(details)
            | HierarchyError::UnresolvedLeaf(details)
            | HierarchyError::InvalidConfiguration(details)
            | HierarchyError::DataProblem(details) => details,
        }
    }
}

impl fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            HierarchyError::NotFound(_) => "not found",
            HierarchyError::UnresolvedLeaf(_) => "unresolved leaf",
            HierarchyError::InvalidConfiguration(_) => "invalid configuration",
            HierarchyError::DataProblem(_) => "data problem",
        };
        write!(f, "{}: {}", kind, self.details().message)
    }
}

impl std::error::Error for HierarchyError {}

// Parse errors are data problems; the caller handed us a file we can't use.
impl From<serde_json::Error> for HierarchyError {
    fn from(err: serde_json::Error) -> HierarchyError {
        HierarchyError::bad_data(err.to_string())
    }
}

impl From<serde_yaml::Error> for HierarchyError {
    fn from(err: serde_yaml::Error) -> HierarchyError {
        HierarchyError::bad_data(err.to_string())
    }
}

impl From<toml::de::Error> for HierarchyError {
    fn from(err: toml::de::Error) -> HierarchyError {
        HierarchyError::bad_data(err.to_string())
    }
}

impl From<std::io::Error> for HierarchyError {
    fn from(err: std::io::Error) -> HierarchyError {
        HierarchyError::DataProblem(ErrorDetails::new(ErrorLayer::IoLayer, err.to_string()))
    }
}

#[test]
fn test_error_display() {
    let err = HierarchyError::not_found("dog.n.99");
    assert_eq!(
        err.to_string(),
        "not found: identifier dog.n.99 is not in the taxonomy"
    );
    assert_eq!(err.details().layer, ErrorLayer::DataLayer);

    let err = HierarchyError::invalid_config("max_depth must be at least 1");
    assert!(matches!(err, HierarchyError::InvalidConfiguration(_)));
    assert_eq!(err.details().layer, ErrorLayer::ConfigLayer);
}
