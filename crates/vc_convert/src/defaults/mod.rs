//! The converters every [`EditorRegistry`](crate::registry::EditorRegistry)
//! falls back to while its defaults are active.
//!
//! - [`NumberConverter`]: every primitive integer and float, from strings
//!   (decimal or `0x` / `#` hex) and from other numbers with range checks.
//! - [`BoolConverter`]: `true` / `on` / `yes` / `1` and their negations.
//! - [`CharConverter`]: a single character or a `\uXXXX` escape.

// -----------------------------------------------------------------------------
// Modules

mod boolean;
mod character;
mod number;

// -----------------------------------------------------------------------------
// Exports

pub use boolean::BoolConverter;
pub use character::CharConverter;
pub use number::{Number, NumberConverter, Numeric};

use std::sync::LazyLock;

use vc_bean::info::TypeDescriptor;
use vc_utils::TypeIdMap;

use crate::converter::ConverterHandle;

static DEFAULTS: LazyLock<TypeIdMap<ConverterHandle>> = LazyLock::new(|| {
    let mut defaults = TypeIdMap::new();

    macro_rules! numbers {
        ($($ty:ty),*) => {$(
            defaults.insert_type::<$ty>(ConverterHandle::pure(NumberConverter::<$ty>::new()));
        )*};
    }

    numbers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
    defaults.insert_type::<bool>(ConverterHandle::pure(BoolConverter));
    defaults.insert_type::<char>(ConverterHandle::pure(CharConverter));
    defaults
});

/// The built-in converter for `target`, if any.
pub fn default_converter(target: TypeDescriptor) -> Option<ConverterHandle> {
    DEFAULTS.get(&target.type_id()).cloned()
}
