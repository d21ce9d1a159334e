use core::fmt;

use vc_utils::vec::FastVec;

// -----------------------------------------------------------------------------
// Segment

/// One dot-separated part of a path: a property name and its keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    name: String,
    keys: Box<[String]>,
}

impl Segment {
    /// A segment without keys.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Box::default(),
        }
    }

    /// A segment with keys, given without quotes.
    pub fn with_keys(name: impl Into<String>, keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            keys: keys.into_iter().collect(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The keys in order, with quotes stripped.
    #[inline]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        !self.keys.is_empty()
    }

    fn parse(raw: &str) -> Self {
        let Some(open) = raw.find('[') else {
            return Self::new(raw);
        };

        let mut keys: Vec<String> = Vec::new();
        let mut rest = &raw[open..];
        while let Some(start) = rest.find('[') {
            let Some(len) = matching_bracket(&rest[start..]) else {
                // Unterminated: the whole segment is a literal name.
                return Self::new(raw);
            };
            let key = &rest[start + 1..start + len];
            keys.push(unquote(key).to_owned());
            rest = &rest[start + len + 1..];
        }

        Self::with_keys(&raw[..open], keys)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for key in &self.keys {
            match quote_for(key) {
                Some(q) => write!(f, "[{q}{key}{q}]")?,
                None => write!(f, "[{key}]")?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// PropertyPath

/// A parsed property path.
///
/// Rendering with `Display` yields the canonical name, and
/// `tokenize(&path.to_string()) == path` holds for every path.
///
/// ```
/// use vc_bean::path::tokenize;
///
/// let path = tokenize("settings['a.b'].values[0]");
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.segments()[0].keys(), ["a.b"]);
/// assert_eq!(path.to_string(), "settings[a.b].values[0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Box<[Segment]>,
}

impl PropertyPath {
    /// Parses a path, see [`tokenize`].
    #[inline]
    pub fn parse(path: &str) -> Self {
        tokenize(path)
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the path has more than one segment or any key.
    pub fn is_nested_or_indexed(&self) -> bool {
        self.segments.len() > 1 || self.segments.iter().any(Segment::is_indexed)
    }

    /// The canonical name of the first `len` segments.
    pub fn prefix(&self, len: usize) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().take(len).enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            fmt::Display::fmt(segment, f)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tokenizer

/// Parses a property path.
///
/// An empty string has no segments.
pub fn tokenize(path: &str) -> PropertyPath {
    if path.is_empty() {
        return PropertyPath {
            segments: Box::default(),
        };
    }

    let mut vec: FastVec<Segment, 8> = FastVec::new();
    let data = vec.get();

    let mut depth = 0_usize;
    let mut start = 0;
    for (i, c) in path.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                data.push(Segment::parse(&path[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    data.push(Segment::parse(&path[start..]));

    PropertyPath {
        segments: vec.into_boxed_slice(),
    }
}

/// Length up to the bracket closing the one at `text[0]`.
///
/// Returns the byte offset of the closing `]`, or `None` if unterminated.
pub(crate) fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth = 0_usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn unquote(key: &str) -> &str {
    for q in ['\'', '"'] {
        if key.len() >= 2 && key.starts_with(q) && key.ends_with(q) {
            return &key[1..key.len() - 1];
        }
    }
    key
}

/// The quote needed to render `key` so that it parses back unchanged.
fn quote_for(key: &str) -> Option<char> {
    if unquote(key).len() == key.len() {
        return None;
    }
    if key.starts_with('\'') { Some('"') } else { Some('\'') }
}

// -----------------------------------------------------------------------------
// Tests
