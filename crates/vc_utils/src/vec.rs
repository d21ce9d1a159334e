//! Re-exports [`fastvec`]'s containers.
//!
//! Used where a short-lived buffer usually holds a handful of items, such as
//! the segments of a property path.

pub use fastvec::{FastVec, fast_vec};
