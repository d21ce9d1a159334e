//! [`Reflect`](crate::Reflect) and [`Typed`](crate::info::Typed)
//! implementations for std types.
//!
//! - `bool`, `char`, every integer and float primitive, `String`
//! - `Vec<T>`, `VecDeque<T>`
//! - `HashSet<T, S>`, `BTreeSet<T>`
//! - `HashMap<K, V, S>`, `BTreeMap<K, V>`
//!
//! Scalars carry a default and a `FromStr` constructor, containers carry
//! a default constructor.

mod list;
mod map;
mod scalar;
mod set;
