use vc_bean::Reflect;

use crate::ConversionError;
use crate::context::ConversionContext;
use crate::converter::Converter;

/// Converts text to `bool`.
///
/// Accepts `true`, `on`, `yes`, `1` and `false`, `off`, `no`, `0`,
/// ignoring case and surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConverter;

impl BoolConverter {
    pub fn parse(text: &str) -> Option<bool> {
        const TRUE: [&str; 4] = ["true", "on", "yes", "1"];
        const FALSE: [&str; 4] = ["false", "off", "no", "0"];

        let text = text.trim();
        if TRUE.iter().any(|word| word.eq_ignore_ascii_case(text)) {
            Some(true)
        } else if FALSE.iter().any(|word| word.eq_ignore_ascii_case(text)) {
            Some(false)
        } else {
            None
        }
    }
}

impl Converter for BoolConverter {
    fn convert(
        &self,
        value: &dyn Reflect,
        ctx: &ConversionContext<'_>,
    ) -> Result<Box<dyn Reflect>, ConversionError> {
        let Some(text) = value.downcast_ref::<String>() else {
            return Err(ConversionError::new(value, ctx.target()).with_reason("not a string"));
        };
        match Self::parse(text) {
            Some(flag) => Ok(Box::new(flag)),
            None => Err(ConversionError::new(value, ctx.target())
                .with_reason(format!("invalid boolean value `{text}`"))),
        }
    }

    fn name(&self) -> &str {
        "BoolConverter"
    }
}

#[cfg(test)]
mod tests {
    use super::BoolConverter;

    #[test]
    fn accepted_words() {
        for word in ["true", "ON", " Yes ", "1"] {
            assert_eq!(BoolConverter::parse(word), Some(true), "{word}");
        }
        for word in ["False", "off", "NO", "0"] {
            assert_eq!(BoolConverter::parse(word), Some(false), "{word}");
        }
        assert_eq!(BoolConverter::parse(""), None);
        assert_eq!(BoolConverter::parse("2"), None);
        assert_eq!(BoolConverter::parse("yess"), None);
    }
}
