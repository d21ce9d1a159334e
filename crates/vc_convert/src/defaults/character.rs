use vc_bean::Reflect;

use crate::ConversionError;
use crate::context::ConversionContext;
use crate::converter::Converter;

/// Converts text to `char`.
///
/// The text must be a single character or a `\uXXXX` escape.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharConverter;

impl CharConverter {
    pub fn parse(text: &str) -> Result<char, String> {
        if let Some(hex) = text.strip_prefix("\\u")
            && hex.len() == 4
        {
            let code = u32::from_str_radix(hex, 16)
                .map_err(|err| format!("invalid unicode escape `{text}`: {err}"))?;
            return char::from_u32(code).ok_or_else(|| format!("`{text}` is not a valid character"));
        }

        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(format!(
                "`{text}` with length {} cannot be converted to a character",
                text.chars().count()
            )),
        }
    }
}

impl Converter for CharConverter {
    fn convert(
        &self,
        value: &dyn Reflect,
        ctx: &ConversionContext<'_>,
    ) -> Result<Box<dyn Reflect>, ConversionError> {
        let Some(text) = value.downcast_ref::<String>() else {
            return Err(ConversionError::new(value, ctx.target()).with_reason("not a string"));
        };
        Self::parse(text)
            .map(|c| Box::new(c) as Box<dyn Reflect>)
            .map_err(|reason| ConversionError::new(value, ctx.target()).with_reason(reason))
    }

    fn name(&self) -> &str {
        "CharConverter"
    }
}

#[cfg(test)]
mod tests {
    use super::CharConverter;

    #[test]
    fn single_characters_and_escapes() {
        assert_eq!(CharConverter::parse("x"), Ok('x'));
        assert_eq!(CharConverter::parse("é"), Ok('é'));
        assert_eq!(CharConverter::parse("\\u0041"), Ok('A'));
        assert!(CharConverter::parse("\\uD800").is_err());
        assert!(CharConverter::parse("\\uZZZZ").is_err());
        assert!(CharConverter::parse("").is_err());
        assert!(CharConverter::parse("ab").is_err());
    }
}
