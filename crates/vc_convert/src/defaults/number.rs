use core::marker::PhantomData;

use vc_bean::Reflect;
use vc_bean::info::Typed;

use crate::ConversionError;
use crate::context::ConversionContext;
use crate::converter::Converter;

// -----------------------------------------------------------------------------
// Numeric

/// A primitive number widened to its family's largest type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Signed(i128),
    Unsigned(u128),
    Float(f64),
}

impl Numeric {
    /// Widens `value` if it is a primitive number.
    pub fn of(value: &dyn Reflect) -> Option<Self> {
        macro_rules! widen {
            ($($variant:ident($wide:ty): $($ty:ty),*;)*) => {$($(
                if let Some(number) = value.downcast_ref::<$ty>() {
                    return Some(Numeric::$variant(*number as $wide));
                }
            )*)*};
        }

        widen! {
            Signed(i128): i8, i16, i32, i64, i128, isize;
            Unsigned(u128): u8, u16, u32, u64, u128, usize;
            Float(f64): f32, f64;
        }
        None
    }

    /// Parses an integer literal: an optional sign followed by decimal
    /// digits or a `0x`, `0X` or `#` prefixed hex number.
    pub fn parse_integer(text: &str) -> Result<Self, String> {
        let text = text.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (digits, radix) = match hex_digits(unsigned) {
            Some(digits) => (digits, 16),
            None => (unsigned, 10),
        };
        if digits.is_empty() || digits.starts_with(['+', '-']) {
            return Err(format!("`{text}` is not a number"));
        }

        let magnitude = u128::from_str_radix(digits, radix)
            .map_err(|err| format!("`{text}` is not a number: {err}"))?;
        if negative {
            0_i128
                .checked_sub_unsigned(magnitude)
                .map(Numeric::Signed)
                .ok_or_else(|| format!("`{text}` is out of range"))
        } else {
            Ok(Numeric::Unsigned(magnitude))
        }
    }
}

fn hex_digits(text: &str) -> Option<&str> {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('#'))
}

// -----------------------------------------------------------------------------
// Number

/// A primitive number the [`NumberConverter`] can produce.
pub trait Number: Reflect + Typed + Copy {
    /// Parses trimmed text.
    fn parse_text(text: &str) -> Result<Self, String>;

    /// Narrows `value`, returning `None` when it does not fit.
    fn from_numeric(value: Numeric) -> Option<Self>;
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {$(
        impl Number for $ty {
            fn parse_text(text: &str) -> Result<Self, String> {
                let number = Numeric::parse_integer(text)?;
                Self::from_numeric(number)
                    .ok_or_else(|| format!("`{}` is out of range for `{}`", text.trim(), stringify!($ty)))
            }

            fn from_numeric(value: Numeric) -> Option<Self> {
                match value {
                    Numeric::Signed(n) => <$ty>::try_from(n).ok(),
                    Numeric::Unsigned(n) => <$ty>::try_from(n).ok(),
                    Numeric::Float(n) => Self::from_numeric(truncate(n)?),
                }
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Drops the fractional part, `None` for NaN, infinities and values
/// beyond the 128 bit range.
fn truncate(value: f64) -> Option<Numeric> {
    if !value.is_finite() {
        return None;
    }
    let whole = value.trunc();
    if whole >= 0.0 {
        (whole < u128::MAX as f64).then(|| Numeric::Unsigned(whole as u128))
    } else {
        (whole >= i128::MIN as f64).then(|| Numeric::Signed(whole as i128))
    }
}

impl Number for f64 {
    fn parse_text(text: &str) -> Result<Self, String> {
        let text = text.trim();
        text.parse::<f64>()
            .map_err(|err| format!("`{text}` is not a number: {err}"))
    }

    fn from_numeric(value: Numeric) -> Option<Self> {
        Some(match value {
            Numeric::Signed(n) => n as f64,
            Numeric::Unsigned(n) => n as f64,
            Numeric::Float(n) => n,
        })
    }
}

impl Number for f32 {
    fn parse_text(text: &str) -> Result<Self, String> {
        let text = text.trim();
        text.parse::<f32>()
            .map_err(|err| format!("`{text}` is not a number: {err}"))
    }

    fn from_numeric(value: Numeric) -> Option<Self> {
        match value {
            Numeric::Signed(n) => Some(n as f32),
            Numeric::Unsigned(n) => Some(n as f32),
            Numeric::Float(n) if n.is_finite() && n.abs() > f64::from(f32::MAX) => None,
            Numeric::Float(n) => Some(n as f32),
        }
    }
}

// -----------------------------------------------------------------------------
// NumberConverter

/// Converts strings and other primitive numbers to `N`.
pub struct NumberConverter<N>(PhantomData<fn() -> N>);

impl<N: Number> NumberConverter<N> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<N: Number> Default for NumberConverter<N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Number> Converter for NumberConverter<N> {
    fn convert(
        &self,
        value: &dyn Reflect,
        ctx: &ConversionContext<'_>,
    ) -> Result<Box<dyn Reflect>, ConversionError> {
        if let Some(text) = value.downcast_ref::<String>() {
            return match N::parse_text(text) {
                Ok(number) => Ok(Box::new(number)),
                Err(reason) => Err(ConversionError::new(value, ctx.target()).with_reason(reason)),
            };
        }

        let Some(number) = Numeric::of(value) else {
            return Err(ConversionError::new(value, ctx.target()).with_reason("not a number"));
        };
        match N::from_numeric(number) {
            Some(number) => Ok(Box::new(number)),
            None => Err(ConversionError::new(value, ctx.target()).with_reason("value is out of range")),
        }
    }

    fn name(&self) -> &str {
        "NumberConverter"
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_bean::info::TypeDescriptor;

    use super::{Number, NumberConverter, Numeric};
    use crate::context::ConversionContext;
    use crate::converter::Converter;

    #[test]
    fn integer_literals() {
        assert_eq!(i32::parse_text(" 42 "), Ok(42));
        assert_eq!(i32::parse_text("+7"), Ok(7));
        assert_eq!(i64::parse_text("-0x10"), Ok(-16));
        assert_eq!(u8::parse_text("#FF"), Ok(255));
        assert_eq!(u16::parse_text("0XfF"), Ok(255));
        assert_eq!(i128::parse_text("-170141183460469231731687303715884105728"), Ok(i128::MIN));

        assert!(u8::parse_text("256").is_err());
        assert!(u8::parse_text("-1").is_err());
        assert!(i32::parse_text("abc").is_err());
        assert!(i32::parse_text("").is_err());
        assert!(i32::parse_text("--1").is_err());
        assert!(i32::parse_text("0x").is_err());
        assert!(i32::parse_text("1.5").is_err());
    }

    #[test]
    fn float_literals() {
        assert_eq!(f64::parse_text("2.5"), Ok(2.5));
        assert_eq!(f32::parse_text(" -1e3 "), Ok(-1000.0));
        assert!(f64::parse_text("x").is_err());
    }

    #[test]
    fn numeric_narrowing() {
        assert_eq!(Numeric::of(&300_u16), Some(Numeric::Unsigned(300)));
        assert_eq!(Numeric::of(&-3_i8), Some(Numeric::Signed(-3)));
        assert_eq!(Numeric::of(&String::new()), None);

        assert_eq!(u8::from_numeric(Numeric::Unsigned(300)), None);
        assert_eq!(i8::from_numeric(Numeric::Signed(-128)), Some(-128));
        assert_eq!(i32::from_numeric(Numeric::Float(7.9)), Some(7));
        assert_eq!(u32::from_numeric(Numeric::Float(-1.0)), None);
        assert_eq!(u32::from_numeric(Numeric::Float(f64::NAN)), None);
        assert_eq!(f32::from_numeric(Numeric::Float(1e300)), None);
        assert_eq!(f64::from_numeric(Numeric::Unsigned(5)), Some(5.0));
    }

    #[test]
    fn converter_reports_the_reason() {
        let ctx = ConversionContext::new(TypeDescriptor::of::<u8>());
        let converter = NumberConverter::<u8>::new();

        let ok = converter.convert(&String::from("12"), &ctx).unwrap();
        assert_eq!(ok.downcast_ref::<u8>(), Some(&12));
        let widened = converter.convert(&12_i64, &ctx).unwrap();
        assert_eq!(widened.downcast_ref::<u8>(), Some(&12));

        let err = converter.convert(&String::from("300"), &ctx).unwrap_err();
        assert!(err.reason().unwrap().contains("out of range"));
        let err = converter.convert(&true, &ctx).unwrap_err();
        assert_eq!(err.reason(), Some("not a number"));
    }
}
