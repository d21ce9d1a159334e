use serde::{Deserialize, Serialize};
use vc_bean::introspect::ScopeId;

/// Options of a [`PropertyNavigator`](crate::PropertyNavigator).
///
/// Deserializable so that callers can load it from their own
/// configuration format; absent fields keep their defaults.
///
/// ```
/// use vc_bind::BindConfig;
///
/// let config: BindConfig = serde_json::from_str(r#"{ "auto_grow_nested_paths": true }"#).unwrap();
/// assert!(config.auto_grow_nested_paths);
/// assert_eq!(config.auto_grow_collection_limit, usize::MAX);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Create absent intermediate values, list elements and map entries
    /// while writing.
    pub auto_grow_nested_paths: bool,
    /// Lists only grow to indices below this limit.
    pub auto_grow_collection_limit: usize,
    /// Pass the current value of a property to its converter.
    pub extract_old_value_before_convert: bool,
    /// Scope of the introspection records built by the navigator.
    #[serde(skip)]
    pub scope: Option<ScopeId>,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            auto_grow_nested_paths: false,
            auto_grow_collection_limit: usize::MAX,
            extract_old_value_before_convert: false,
            scope: None,
        }
    }
}

impl BindConfig {
    /// Enables auto-grow with the given collection limit.
    #[inline]
    pub fn auto_grow(mut self, limit: usize) -> Self {
        self.auto_grow_nested_paths = true;
        self.auto_grow_collection_limit = limit;
        self
    }

    #[inline]
    pub fn with_scope(mut self, scope: ScopeId) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Whether a list may grow so that `index` becomes valid.
    #[inline]
    pub(crate) fn can_grow_to(&self, index: usize) -> bool {
        self.auto_grow_nested_paths && index < self.auto_grow_collection_limit
    }
}

#[cfg(test)]
mod tests {
    use vc_bean::introspect::ScopeId;

    use super::BindConfig;

    #[test]
    fn json_round_trip_skips_scope() {
        let config = BindConfig::default().auto_grow(10).with_scope(ScopeId::next());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("scope"));

        let back: BindConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.auto_grow_collection_limit, 10);
        assert!(back.auto_grow_nested_paths);
        assert_eq!(back.scope, None);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: BindConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BindConfig::default());

        let config: BindConfig =
            serde_json::from_str(r#"{ "extract_old_value_before_convert": true }"#).unwrap();
        assert!(config.extract_old_value_before_convert);
        assert!(!config.auto_grow_nested_paths);
    }

    #[test]
    fn grow_limit() {
        let config = BindConfig::default();
        assert!(!config.can_grow_to(0));

        let config = config.auto_grow(3);
        assert!(config.can_grow_to(2));
        assert!(!config.can_grow_to(3));
    }
}
