use std::fmt;
use thiserror::Error as ThisError;

///
/// CodecError
///
/// Structured codec error with a stable classification.
/// Every failure surfaced by resolution, encoding, extraction, successor
/// computation, and range construction flows through this type.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct CodecError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl CodecError {
    /// Construct a CodecError without structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach structured detail to an existing error.
    #[must_use]
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Construct an index-definition error naming the offending path.
    pub(crate) fn definition(path: impl Into<String>, message: impl fmt::Display) -> Self {
        let path = path.into();

        Self::new(
            ErrorClass::Definition,
            ErrorOrigin::Resolver,
            format!("invalid index field '{path}': {message}"),
        )
        .with_detail(ErrorDetail::Field { path })
    }

    /// Construct an index-level definition error not tied to one path.
    pub(crate) fn index_definition(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Definition, ErrorOrigin::Resolver, message)
    }

    /// Construct a type-mismatch error for one slot of an index key.
    pub(crate) fn type_mismatch(
        origin: ErrorOrigin,
        position: usize,
        path: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        let path = path.into();

        Self::new(
            ErrorClass::TypeMismatch,
            origin,
            format!("type mismatch for index field '{path}': {message}"),
        )
        .with_detail(ErrorDetail::Slot { position, path })
    }

    /// Construct a per-row resource-limit error.
    pub(crate) fn resource_limit(index: &str, limit: usize, produced: usize) -> Self {
        Self::new(
            ErrorClass::ResourceLimit,
            ErrorOrigin::Extractor,
            format!(
                "row produces at least {produced} keys for index '{index}' (limit {limit})"
            ),
        )
        .with_detail(ErrorDetail::Limit { limit, produced })
    }

    /// Construct a malformed-key error.
    pub(crate) fn malformed(message: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::MalformedKey,
            ErrorOrigin::Serializer,
            format!("malformed index key: {message}"),
        )
    }

    /// Construct an invalid-range error.
    pub(crate) fn invalid_range(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidRange, ErrorOrigin::Range, message)
    }

    /// Construct an unsupported-operation error.
    pub(crate) fn unsupported(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, origin, message)
    }

    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self.class, ErrorClass::TypeMismatch)
    }

    #[must_use]
    pub const fn is_resource_limit(&self) -> bool {
        matches!(self.class, ErrorClass::ResourceLimit)
    }

    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self.class, ErrorClass::MalformedKey)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured context carried by [`CodecError`].
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ErrorDetail {
    #[error("field '{path}'")]
    Field { path: String },

    #[error("slot {position} ('{path}')")]
    Slot { position: usize, path: String },

    #[error("{produced} keys exceed limit {limit}")]
    Limit { limit: usize, produced: usize },
}

///
/// ErrorClass
/// Error taxonomy for codec failures.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ErrorClass {
    Definition,
    TypeMismatch,
    ResourceLimit,
    MalformedKey,
    InvalidRange,
    Unsupported,
}

impl ErrorClass {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::TypeMismatch => "type_mismatch",
            Self::ResourceLimit => "resource_limit",
            Self::MalformedKey => "malformed_key",
            Self::InvalidRange => "invalid_range",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

///
/// ErrorOrigin
/// Codec component that raised the error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Resolver,
    Encoder,
    Serializer,
    Extractor,
    Successor,
    Range,
    Projector,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Resolver => "resolver",
            Self::Encoder => "encoder",
            Self::Serializer => "serializer",
            Self::Extractor => "extractor",
            Self::Successor => "successor",
            Self::Range => "range",
            Self::Projector => "projector",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
