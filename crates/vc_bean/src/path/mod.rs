//! Property paths.
//!
//! A path addresses a location in an object graph:
//!
//! ```text
//! path     = segment { "." segment } ;
//! segment  = name { key } ;
//! key      = "[" keytext "]" ;
//! ```
//!
//! Keys may be quoted with `'` or `"`; one layer of matching quotes is
//! stripped, so `map['a']` and `map[a]` are the same location. Dots
//! inside brackets do not split segments.
//!
//! Tokenizing never fails. A segment with an unterminated bracket is kept
//! as a literal name without keys.
//!
//! ## Menu
//!
//! - [`PropertyPath`] / [`Segment`]: the parsed form, see [`tokenize`].
//! - [`canonical_name`]: the quote-free rendering used as a cache key.
//! - String helpers used by converter lookup, such as [`strip_keys`] and
//!   [`stripped_variants`].

// -----------------------------------------------------------------------------
// Modules

mod tokenizer;
mod utils;

// -----------------------------------------------------------------------------
// Exports

pub use tokenizer::{PropertyPath, Segment, tokenize};
pub use utils::{canonical_name, first_nested_separator, is_nested_or_indexed};
pub use utils::{last_nested_separator, matches_property, property_name};
pub use utils::{strip_keys, stripped_variants};
