use core::fmt;

use thiserror::Error;
use vc_bean::introspect::IntrospectionError;
use vc_bean::path::canonical_name;
use vc_convert::ConversionError;

// -----------------------------------------------------------------------------
// BindError

/// Failure to read or write a property path.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    #[error("type `{type_path}` has no property `{property}` (path `{path}`)")]
    UnknownProperty {
        path: String,
        property: String,
        type_path: &'static str,
    },
    #[error("property `{path}` is not readable")]
    NotReadable { path: String },
    #[error("property `{path}` is not writable")]
    NotWritable { path: String },
    #[error("cannot access `{path}`: an intermediate value is absent")]
    NullIntermediate { path: String },
    #[error("index {index} of `{path}` is out of range, length is {len}")]
    IndexOutOfRange { path: String, index: usize, len: usize },
    #[error("key `{key}` of `{path}` cannot be applied to a value of type `{found}`")]
    InvalidPropertyKind {
        path: String,
        key: String,
        found: &'static str,
    },
    #[error("failed to convert property `{path}`: {source}")]
    TypeConversion { path: String, source: ConversionError },
    /// The accessor itself failed.
    #[error("accessor of `{path}` failed: {message}")]
    Invocation { path: String, message: String },
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),
    #[error(transparent)]
    Aggregated(#[from] AggregatedError),
}

impl BindError {
    /// The path the error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::UnknownProperty { path, .. }
            | Self::NotReadable { path }
            | Self::NotWritable { path }
            | Self::NullIntermediate { path }
            | Self::IndexOutOfRange { path, .. }
            | Self::InvalidPropertyKind { path, .. }
            | Self::TypeConversion { path, .. }
            | Self::Invocation { path, .. } => Some(path),
            Self::Introspection(_) | Self::Aggregated(_) => None,
        }
    }

    /// Whether the path cannot be used on the value, as opposed to the
    /// value being unacceptable.
    ///
    /// Batch assignment skips these errors when asked to ignore invalid
    /// fields.
    pub fn is_invalid_path(&self) -> bool {
        matches!(
            self,
            Self::NotReadable { .. }
                | Self::NotWritable { .. }
                | Self::NullIntermediate { .. }
                | Self::IndexOutOfRange { .. }
                | Self::InvalidPropertyKind { .. }
        )
    }

    /// Whether auto-grow could have avoided the error.
    pub(crate) fn is_growable(&self) -> bool {
        matches!(self, Self::NullIntermediate { .. } | Self::IndexOutOfRange { .. })
    }

    pub(crate) fn conversion(path: &str, source: ConversionError) -> Self {
        Self::TypeConversion {
            path: path.to_owned(),
            source,
        }
    }
}

// -----------------------------------------------------------------------------
// AggregatedError

/// The failures of a batch assignment, one per failed entry.
///
/// Each failure is filed under the canonical form of the path that was
/// submitted, which may be longer than the path inside the error: a bad
/// index in `items[2].city` fails at `items` but is filed as
/// `items[2].city`.
#[derive(Debug, Error)]
pub struct AggregatedError {
    entries: Vec<(String, BindError)>,
}

impl AggregatedError {
    #[inline]
    pub(crate) fn new(entries: Vec<(String, BindError)>) -> Self {
        Self { entries }
    }

    /// The submitted paths with their errors, in submission order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &BindError)> {
        self.entries.iter().map(|(path, err)| (path.as_str(), err))
    }

    pub fn errors(&self) -> impl ExactSizeIterator<Item = &BindError> {
        self.entries.iter().map(|(_, err)| err)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The error of the entry submitted for `path`.
    ///
    /// `path` is compared in canonical form, so `map['a']` finds `map[a]`.
    pub fn get(&self, path: &str) -> Option<&BindError> {
        let path = canonical_name(path);
        self.entries
            .iter()
            .find_map(|(submitted, err)| (*submitted == path).then_some(err))
    }

    #[inline]
    pub fn into_entries(self) -> Vec<(String, BindError)> {
        self.entries
    }
}

impl fmt::Display for AggregatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} property assignment(s) failed", self.entries.len())?;
        for (path, err) in &self.entries {
            write!(f, "\n- `{path}`: {err}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use vc_convert::ConversionError;

    use super::{AggregatedError, BindError};

    #[test]
    fn aggregated_message_lists_every_failure() {
        let errors = AggregatedError::new(vec![
            (
                String::from("age"),
                BindError::conversion("age", ConversionError::from_types("alloc::string::String", "i32")),
            ),
            (
                String::from("id"),
                BindError::NotWritable {
                    path: String::from("id"),
                },
            ),
            (
                String::from("scores[a].value"),
                BindError::NullIntermediate {
                    path: String::from("scores[a]"),
                },
            ),
        ]);

        let message = errors.to_string();
        assert!(message.starts_with("3 property assignment(s) failed"));
        assert!(message.contains("`age`"));
        assert!(message.contains("property `id` is not writable"));
        assert!(message.contains("- `scores[a].value`: "));
        assert!(errors.get("id").is_some_and(BindError::is_invalid_path));
        assert!(errors.get("age").is_some_and(|err| !err.is_invalid_path()));
        assert!(errors.get("scores['a'].value").is_some());
        assert!(errors.get("scores[a]").is_none());
        assert!(errors.get("name").is_none());
        assert_eq!(errors.iter().map(|(path, _)| path).collect::<Vec<_>>(), ["age", "id", "scores[a].value"]);
    }
}
