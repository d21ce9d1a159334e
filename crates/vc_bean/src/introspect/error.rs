use thiserror::Error;

/// Failure to build an [`IntrospectionRecord`](crate::introspect::IntrospectionRecord).
///
/// Never cached: the next request for the type builds again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IntrospectionError {
    #[error("type `{0}` is not a bean")]
    NotABean(&'static str),
    #[error("bean `{0}` declares no properties")]
    NoProperties(&'static str),
    #[error("bean `{type_path}` declares property `{name}` more than once")]
    DuplicateProperty {
        type_path: &'static str,
        name: &'static str,
    },
}

/// Failure raised by an accessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AccessorError {
    /// The accessor was invoked on a value of another type.
    #[error("accessor of `{expected}` invoked on a value of type `{found}`")]
    Receiver {
        expected: &'static str,
        found: &'static str,
    },
    /// The setter received a value of the wrong type.
    #[error("expected a value of type `{expected}`, found `{found}`")]
    Value {
        expected: &'static str,
        found: &'static str,
    },
    #[error("property is not readable")]
    NotReadable,
    #[error("property is not writable")]
    NotWritable,
    /// The setter rejected the value.
    #[error("{0}")]
    Failed(String),
}
