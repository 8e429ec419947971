use crate::data::WaveValue;
use crate::error::*;

use rug::Integer;
use std::str::FromStr;

/// Display radix of a variable. View state only, never written to a VCD file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Binary,
    Decimal,
    Hexadecimal,
}

impl Default for Format {
    fn default() -> Self {
        Format::Decimal
    }
}

impl Format {
    /// Default display format for a freshly decoded variable of width `size`.
    pub fn for_size(size: u32) -> Self {
        if size > 1 {
            Format::Hexadecimal
        } else {
            Format::Binary
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "b" | "bin" | "binary" => Ok(Format::Binary),
            "d" | "dec" | "decimal" => Ok(Format::Decimal),
            "h" | "x" | "hex" | "hexadecimal" => Ok(Format::Hexadecimal),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

pub fn format_to_radix(format: Format) -> u32 {
    match format {
        Format::Binary => 2,
        Format::Decimal => 10,
        Format::Hexadecimal => 16,
    }
}

pub fn format_from_radix(radix: u32) -> Result<Format> {
    match radix {
        2 => Ok(Format::Binary),
        10 => Ok(Format::Decimal),
        16 => Ok(Format::Hexadecimal),
        _ => Err(Error::InvalidRadix(radix)),
    }
}

/// Render a sample in the given display format.
///
/// Sentinel values (`x`, `z`, mixed bit strings, reals) have no representation in another base
/// and are passed through unchanged.
pub fn value_to_string(value: &WaveValue, format: Format) -> String {
    match value {
        WaveValue::Numeric(n) => n.to_string_radix(format_to_radix(format) as i32),
        WaveValue::Sentinel(s) => s.clone(),
    }
}

fn is_sentinel_char(c: char) -> bool {
    matches!(c, 'x' | 'X' | 'z' | 'Z' | 'u' | 'U' | 'w' | 'W' | '-')
}

/// Interpret text typed into a value editor.
///
/// * `text` - Digits in `radix`, or a run of sentinel characters (`x`, `z`, `u`, `w`, `-`)
/// * `radix` - One of 2, 10 or 16
pub fn parse_value(text: &str, radix: u32) -> Result<WaveValue> {
    format_from_radix(radix)?;

    let text = text.trim();
    if !text.is_empty() && text.chars().all(is_sentinel_char) {
        return Ok(WaveValue::Sentinel(text.to_lowercase()));
    }

    match Integer::from_str_radix(text, radix as i32) {
        Ok(n) if n >= 0 => Ok(WaveValue::Numeric(n)),
        _ => Err(Error::InvalidValue(text.to_string(), radix)),
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test_case(Format::Hexadecimal, "a")]
    #[test_case(Format::Binary, "1010")]
    #[test_case(Format::Decimal, "10")]
    fn test_numeric_value_to_string(format: Format, expected: &str) {
        let ten = WaveValue::from(10u32);
        assert_eq!(expected, value_to_string(&ten, format));
    }

    #[test_case(Format::Hexadecimal)]
    #[test_case(Format::Binary)]
    #[test_case(Format::Decimal)]
    fn test_sentinel_passes_through(format: Format) {
        let x = WaveValue::Sentinel("x".to_string());
        assert_eq!("x", value_to_string(&x, format));
    }

    #[test]
    fn test_wide_vector() {
        let wide = WaveValue::Numeric(Integer::from(1) << 100u32);
        assert_eq!("10000000000000000000000000", value_to_string(&wide, Format::Hexadecimal));
    }

    #[test]
    fn test_radix_mapping() {
        for format in [Format::Binary, Format::Decimal, Format::Hexadecimal] {
            assert_eq!(format, format_from_radix(format_to_radix(format)).unwrap());
        }

        assert!(matches!(format_from_radix(8), Err(Error::InvalidRadix(8))));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(WaveValue::from(255u32), parse_value("ff", 16).unwrap());
        assert_eq!(WaveValue::from(5u32), parse_value(" 101 ", 2).unwrap());
        assert_eq!(WaveValue::Sentinel("xz".to_string()), parse_value("XZ", 16).unwrap());

        assert!(matches!(parse_value("12", 3), Err(Error::InvalidRadix(3))));
        assert!(matches!(parse_value("102", 2), Err(Error::InvalidValue(_, 2))));
        assert!(matches!(parse_value("-4", 10), Err(Error::InvalidValue(_, 10))));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(Format::Hexadecimal, "hex".parse().unwrap());
        assert_eq!(Format::Binary, "BIN".parse().unwrap());
        assert!("octal".parse::<Format>().is_err());
    }
}
