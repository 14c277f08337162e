//! Format specifier translation.
//!
//! Turns the part of a replacement field after `:` into the regex fragment
//! that matches a rendered value and the converter that reads it back.
//!
//! | type          | pattern                                  | value            |
//! |---------------|------------------------------------------|------------------|
//! | none, `s`     | `.*?`                                    | string           |
//! | `d`           | `[0-9]+?`                                | base-10 integer  |
//! | `b`           | `[0-1]+?`                                | base-2 integer   |
//! | `o`           | `[0-7]+?`                                | base-8 integer   |
//! | `x` / `X`     | `[0-9a-f]+?` / `[0-9A-F]+?`              | base-16 integer  |
//! | `e` `E` `g` `G` | `[0-9]+\.?[0-9]+(?:[eE][-+]?[0-9]+)?` | float            |
//! | `f` `F`       | `[0-9]+\.?[0-9]+`                        | float            |
//! | `%`           | `[0-9]+\.?[0-9]+%`                       | float / 100      |
//!
//! Only the sign, `#` and the type change the pattern. Fill, alignment,
//! width, grouping and precision are accepted and ignored.

pub mod patterns;

use num_bigint::BigInt;

use crate::error::TemplateSyntaxError;
use crate::models::Value;
use patterns::FORMAT_SPEC;

/// Type letter of a format specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// No type letter.
    Default,
    String,
    Decimal,
    Binary,
    Octal,
    HexLower,
    HexUpper,
    ExponentLower,
    ExponentUpper,
    FixedLower,
    FixedUpper,
    GeneralLower,
    GeneralUpper,
    Percent,
}

impl FormatType {
    pub fn from_letter(letter: Option<&str>) -> Result<Self, TemplateSyntaxError> {
        Ok(match letter {
            None => FormatType::Default,
            Some("s") => FormatType::String,
            Some("d") => FormatType::Decimal,
            Some("b") => FormatType::Binary,
            Some("o") => FormatType::Octal,
            Some("x") => FormatType::HexLower,
            Some("X") => FormatType::HexUpper,
            Some("e") => FormatType::ExponentLower,
            Some("E") => FormatType::ExponentUpper,
            Some("f") => FormatType::FixedLower,
            Some("F") => FormatType::FixedUpper,
            Some("g") => FormatType::GeneralLower,
            Some("G") => FormatType::GeneralUpper,
            Some("%") => FormatType::Percent,
            Some(other) => return Err(TemplateSyntaxError::InvalidFormatType(other.to_string())),
        })
    }

    /// The type letter, `s` for the default.
    pub fn letter(self) -> &'static str {
        match self {
            FormatType::Default | FormatType::String => "s",
            FormatType::Decimal => "d",
            FormatType::Binary => "b",
            FormatType::Octal => "o",
            FormatType::HexLower => "x",
            FormatType::HexUpper => "X",
            FormatType::ExponentLower => "e",
            FormatType::ExponentUpper => "E",
            FormatType::FixedLower => "f",
            FormatType::FixedUpper => "F",
            FormatType::GeneralLower => "g",
            FormatType::GeneralUpper => "G",
            FormatType::Percent => "%",
        }
    }

    /// Pattern matching an unsigned rendered value.
    pub fn pattern(self) -> &'static str {
        match self {
            FormatType::Default | FormatType::String => ".*?",
            FormatType::Decimal => "[0-9]+?",
            FormatType::Binary => "[0-1]+?",
            FormatType::Octal => "[0-7]+?",
            FormatType::HexLower => "[0-9a-f]+?",
            FormatType::HexUpper => "[0-9A-F]+?",
            FormatType::ExponentLower
            | FormatType::ExponentUpper
            | FormatType::GeneralLower
            | FormatType::GeneralUpper => r"[0-9]+\.?[0-9]+(?:[eE][-+]?[0-9]+)?",
            FormatType::FixedLower | FormatType::FixedUpper => r"[0-9]+\.?[0-9]+",
            FormatType::Percent => r"[0-9]+\.?[0-9]+%",
        }
    }

    pub fn converter(self) -> Converter {
        match self {
            FormatType::Default | FormatType::String => Converter::Text,
            FormatType::Decimal => Converter::Integer { radix: 10 },
            FormatType::Binary => Converter::Integer { radix: 2 },
            FormatType::Octal => Converter::Integer { radix: 8 },
            FormatType::HexLower | FormatType::HexUpper => Converter::Integer { radix: 16 },
            FormatType::ExponentLower
            | FormatType::ExponentUpper
            | FormatType::FixedLower
            | FormatType::FixedUpper
            | FormatType::GeneralLower
            | FormatType::GeneralUpper => Converter::Float,
            FormatType::Percent => Converter::Percent,
        }
    }

    /// Literal written before the digits by the `#` alternate form.
    pub fn radix_prefix(self) -> Option<&'static str> {
        match self {
            FormatType::Binary => Some("0b"),
            FormatType::Octal => Some("0o"),
            FormatType::HexLower => Some("0x"),
            FormatType::HexUpper => Some("0X"),
            _ => None,
        }
    }
}

/// Sign option of a format specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    /// `-` or absent: only negative values carry a sign.
    #[default]
    Negative,
    /// `+`: every value carries a sign.
    Always,
    /// ` `: positive values carry a leading space.
    Space,
}

impl Sign {
    pub fn from_char(ch: char) -> Result<Self, TemplateSyntaxError> {
        match ch {
            '-' => Ok(Sign::Negative),
            '+' => Ok(Sign::Always),
            ' ' => Ok(Sign::Space),
            other => Err(TemplateSyntaxError::InvalidSign(other)),
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Sign::Negative => "[-]?",
            Sign::Always => "[-+]",
            Sign::Space => r"[\-\x20]",
        }
    }
}

/// Converts a captured substring into a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    Text,
    Integer { radix: u32 },
    Float,
    Percent,
}

impl Converter {
    pub fn convert(self, raw: &str) -> Result<Value, String> {
        match self {
            Converter::Text => Ok(Value::Str(raw.to_string())),
            Converter::Integer { radix } => parse_integer(raw, radix).map(Value::Int),
            Converter::Float => parse_float(raw).map(Value::Float),
            Converter::Percent => {
                let number = raw
                    .trim()
                    .strip_suffix('%')
                    .ok_or_else(|| "missing '%' suffix".to_string())?;
                parse_float(number).map(|f| Value::Float(f / 100.0))
            }
        }
    }
}

fn parse_integer(raw: &str, radix: u32) -> Result<BigInt, String> {
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let prefix = match radix {
        2 => Some(['b', 'B']),
        8 => Some(['o', 'O']),
        16 => Some(['x', 'X']),
        _ => None,
    };
    let digits = prefix
        .and_then(|p| unsigned.strip_prefix('0')?.strip_prefix(p))
        .unwrap_or(unsigned);

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix)
        .filter(|_| !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix)))
        .ok_or_else(|| format!("invalid base {} integer", radix))?;

    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_float(raw: &str) -> Result<f64, String> {
    raw.trim().parse::<f64>().map_err(|e| e.to_string())
}

/// Regex fragment and converter produced for one format specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub format_type: FormatType,
    pub pattern: String,
    pub converter: Converter,
}

impl Translation {
    /// Translation used for fields without a format specifier.
    pub fn string() -> Self {
        let format_type = FormatType::Default;
        Self {
            format_type,
            pattern: format_type.pattern().to_string(),
            converter: format_type.converter(),
        }
    }
}

/// Translate a format specifier into a pattern and converter.
pub fn translate(spec: &str) -> Result<Translation, TemplateSyntaxError> {
    let caps = FORMAT_SPEC
        .captures(spec)
        .ok_or_else(|| TemplateSyntaxError::InvalidFormatSpec(spec.to_string()))?;

    let format_type = FormatType::from_letter(caps.name("type").map(|m| m.as_str()))?;

    let sign = match caps.name("sign").and_then(|m| m.as_str().chars().next()) {
        Some(ch) => Sign::from_char(ch)?,
        None => Sign::default(),
    };

    let mut pattern = String::from(sign.pattern());
    if caps.name("alternate").is_some() {
        let prefix = format_type.radix_prefix().ok_or_else(|| {
            TemplateSyntaxError::AlternateFormNotAllowed(format_type.letter().to_string())
        })?;
        pattern.push_str(prefix);
    }
    pattern.push_str(format_type.pattern());

    Ok(Translation {
        format_type,
        pattern,
        converter: format_type.converter(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_and_string() {
        assert_eq!(translate("").unwrap().pattern, "[-]?.*?");
        assert_eq!(
            translate("s").unwrap(),
            Translation {
                format_type: FormatType::String,
                pattern: "[-]?.*?".into(),
                converter: Converter::Text,
            }
        );
        assert_eq!(Translation::string().pattern, ".*?");
        assert_eq!(Translation::string().converter, Converter::Text);
    }

    #[test]
    fn test_sign_prefixes() {
        assert_eq!(translate("d").unwrap().pattern, "[-]?[0-9]+?");
        assert_eq!(translate("-d").unwrap().pattern, "[-]?[0-9]+?");
        assert_eq!(translate("+d").unwrap().pattern, "[-+][0-9]+?");
        assert_eq!(translate(" d").unwrap().pattern, r"[\-\x20][0-9]+?");
    }

    #[test]
    fn test_alternate_form() {
        assert_eq!(translate("#x").unwrap().pattern, "[-]?0x[0-9a-f]+?");
        assert_eq!(translate("#X").unwrap().pattern, "[-]?0X[0-9A-F]+?");
        assert_eq!(translate("#o").unwrap().pattern, "[-]?0o[0-7]+?");
        assert_eq!(translate("+#b").unwrap().pattern, "[-+]0b[0-1]+?");

        assert!(matches!(
            translate("#d"),
            Err(TemplateSyntaxError::AlternateFormNotAllowed(t)) if t == "d"
        ));
        assert!(matches!(
            translate("#s"),
            Err(TemplateSyntaxError::AlternateFormNotAllowed(t)) if t == "s"
        ));
    }

    #[test]
    fn test_ignored_parts() {
        assert_eq!(translate(">10d").unwrap().pattern, "[-]?[0-9]+?");
        assert_eq!(translate("x<8s").unwrap().pattern, "[-]?.*?");
        assert_eq!(translate(",.2f").unwrap().converter, Converter::Float);
    }

    #[test]
    fn test_invalid_specs() {
        assert!(matches!(translate("c"), Err(TemplateSyntaxError::InvalidFormatType(_))));
        assert!(matches!(translate("dd"), Err(TemplateSyntaxError::InvalidFormatType(_))));
        assert!(matches!(translate("*d"), Err(TemplateSyntaxError::InvalidSign('*'))));
        assert!(matches!(translate("()d"), Err(TemplateSyntaxError::InvalidFormatSpec(_))));
    }

    #[test]
    fn test_integer_conversion() {
        let int = |raw: &str, radix| Converter::Integer { radix }.convert(raw).unwrap();

        assert_eq!(int("42", 10), Value::from(42));
        assert_eq!(int("-42", 10), Value::from(-42));
        assert_eq!(int(" 42", 10), Value::from(42));
        assert_eq!(int("+101010", 2), Value::from(42));
        assert_eq!(int("-0b101010", 2), Value::from(-42));
        assert_eq!(int("0o52", 8), Value::from(42));
        assert_eq!(int("-0X2A", 16), Value::from(-42));
        assert_eq!(int("2a", 16), Value::from(42));
        assert!(Converter::Integer { radix: 2 }.convert("12").is_err());
    }

    #[test]
    fn test_integer_has_no_ceiling() {
        let value = Converter::Integer { radix: 10 }
            .convert("10000000000000000000000000000000000000000")
            .unwrap();
        assert_eq!(value.as_i64(), None);
        assert_eq!(value.to_string(), "10000000000000000000000000000000000000000");
    }

    #[test]
    fn test_float_conversion() {
        assert_eq!(Converter::Float.convert("4.212300e-09").unwrap(), Value::Float(42.123e-10));
        assert_eq!(Converter::Float.convert("-42.123").unwrap(), Value::Float(-42.123));
        assert_eq!(Converter::Percent.convert("4200.000000%").unwrap(), Value::Float(42.0));
        assert!(Converter::Percent.convert("42").is_err());
    }
}
