use core::error::Error;
use core::fmt;

use vc_bean::Reflect;
use vc_bean::info::TypeDescriptor;

type BoxedCause = Box<dyn Error + Send + Sync + 'static>;

/// A value could not be converted to the required type.
///
/// Carries the source and target type paths, the property path being
/// converted (if any), the name of the converter that failed (if any)
/// and a human readable reason.
#[derive(Debug, thiserror::Error)]
#[error(
    "cannot convert value of type `{source_type}` to required type `{target_type}`{}{}",
    fmt_path(.path),
    fmt_reason(.converter, .reason)
)]
pub struct ConversionError {
    source_type: &'static str,
    target_type: &'static str,
    path: Option<String>,
    converter: Option<String>,
    reason: Option<String>,
    #[source]
    cause: Option<BoxedCause>,
}

impl ConversionError {
    /// A failure to convert `value` to `target`.
    pub fn new(value: &dyn Reflect, target: TypeDescriptor) -> Self {
        Self::from_types(value.reflect_type_info().type_path(), target.type_path())
    }

    pub fn from_types(source_type: &'static str, target_type: &'static str) -> Self {
        Self {
            source_type,
            target_type,
            path: None,
            converter: None,
            reason: None,
            cause: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<BoxedCause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Sets the property path unless one is already recorded.
    pub fn with_path(mut self, path: Option<&str>) -> Self {
        if self.path.is_none() {
            self.path = path.map(String::from);
        }
        self
    }

    /// Sets the converter name unless one is already recorded.
    pub fn with_converter(mut self, converter: impl Into<String>) -> Self {
        if self.converter.is_none() {
            self.converter = Some(converter.into());
        }
        self
    }

    #[inline]
    pub fn source_type(&self) -> &'static str {
        self.source_type
    }

    #[inline]
    pub fn target_type(&self) -> &'static str {
        self.target_type
    }

    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    #[inline]
    pub fn converter(&self) -> Option<&str> {
        self.converter.as_deref()
    }

    #[inline]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

struct Suffix<'a>(&'static str, Option<&'a str>, &'static str);

impl fmt::Display for Suffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.1 {
            Some(text) => write!(f, "{}{text}{}", self.0, self.2),
            None => Ok(()),
        }
    }
}

fn fmt_path(path: &Option<String>) -> Suffix<'_> {
    Suffix(" for property `", path.as_deref(), "`")
}

fn fmt_reason<'a>(converter: &'a Option<String>, reason: &'a Option<String>) -> impl fmt::Display + 'a {
    struct Detail<'a>(Option<&'a str>, Option<&'a str>);

    impl fmt::Display for Detail<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match (self.0, self.1) {
                (Some(converter), Some(reason)) => write!(f, ": converter `{converter}` failed: {reason}"),
                (Some(converter), None) => write!(f, ": converter `{converter}` failed"),
                (None, Some(reason)) => write!(f, ": {reason}"),
                (None, None) => f.write_str(": no matching converter or conversion strategy found"),
            }
        }
    }

    Detail(converter.as_deref(), reason.as_deref())
}

#[cfg(test)]
mod tests {
    use vc_bean::info::TypeDescriptor;

    use super::ConversionError;

    #[test]
    fn message_layout() {
        let plain = ConversionError::new(&String::from("x"), TypeDescriptor::of::<u8>());
        assert_eq!(
            plain.to_string(),
            "cannot convert value of type `alloc::string::String` to required type `u8`: \
             no matching converter or conversion strategy found"
        );

        let detailed = ConversionError::from_types("a", "b")
            .with_path(Some("items[0]"))
            .with_path(Some("ignored"))
            .with_converter("Upper")
            .with_reason("boom");
        assert_eq!(detailed.path(), Some("items[0]"));
        assert_eq!(
            detailed.to_string(),
            "cannot convert value of type `a` to required type `b` for property `items[0]`: \
             converter `Upper` failed: boom"
        );
    }

    #[test]
    fn cause_is_the_error_source() {
        use core::error::Error;

        let parse = "q".parse::<i32>().unwrap_err();
        let err = ConversionError::from_types("a", "b").with_cause(parse);
        assert!(err.source().is_some());
        assert!(err.cause().is_some());
    }
}
