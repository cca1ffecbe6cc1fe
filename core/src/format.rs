//! printf-style number formats for numeric glyph labels.
//!
//! A format holds literal text around exactly one floating point
//! conversion, `%[flags][width][.precision]` followed by one of `e E f g G`.
//! `%%` writes a literal percent sign. Output follows the C conventions,
//! so `%+.4e` renders `1.0` as `+1.0000e+00`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest accepted field width or precision.
pub const MAXIMUM_FIELD_SIZE: usize = 100;

/// Digits in the integer part of the largest finite `f64`.
const MAXIMUM_INTEGER_DIGITS: usize = 309;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("number format '{0}' has no conversion")]
    NoConversion(String),

    #[error("number format '{0}' has more than one conversion")]
    MultipleConversions(String),

    #[error("number format '{format}' has unsupported conversion '{conversion}'")]
    UnsupportedConversion { format: String, conversion: char },

    #[error("number format '{format}' field size {size} exceeds {MAXIMUM_FIELD_SIZE}")]
    FieldTooLarge { format: String, size: usize },

    #[error("number format '{0}' ends inside a conversion")]
    Truncated(String),
}

pub type FormatResult<T> = Result<T, FormatError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Exponent { upper: bool },
    Fixed,
    General { upper: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Flags {
    left_align: bool,
    plus: bool,
    space: bool,
    zero_pad: bool,
    alternate: bool,
}

/// A validated number format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    source: String,
    prefix: String,
    suffix: String,
    flags: Flags,
    width: usize,
    precision: usize,
    conversion: Conversion,
}

impl NumberFormat {
    pub fn parse(format: &str) -> FormatResult<Self> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut conversion = None;
        let mut flags = Flags::default();
        let mut width = 0;
        let mut precision = 6;

        let mut chars = format.chars().peekable();
        while let Some(c) = chars.next() {
            let literal = if conversion.is_some() { &mut suffix } else { &mut prefix };
            if c != '%' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }
            if conversion.is_some() {
                return Err(FormatError::MultipleConversions(format.to_string()));
            }

            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => flags.left_align = true,
                    '+' => flags.plus = true,
                    ' ' => flags.space = true,
                    '0' => flags.zero_pad = true,
                    '#' => flags.alternate = true,
                    _ => break,
                }
                chars.next();
            }
            width = take_number(&mut chars, format)?.unwrap_or(0);
            if chars.peek() == Some(&'.') {
                chars.next();
                precision = take_number(&mut chars, format)?.unwrap_or(0);
            }
            conversion = Some(match chars.next() {
                Some('e') => Conversion::Exponent { upper: false },
                Some('E') => Conversion::Exponent { upper: true },
                Some('f') | Some('F') => Conversion::Fixed,
                Some('g') => Conversion::General { upper: false },
                Some('G') => Conversion::General { upper: true },
                Some(other) => {
                    return Err(FormatError::UnsupportedConversion {
                        format: format.to_string(),
                        conversion: other,
                    });
                }
                None => return Err(FormatError::Truncated(format.to_string())),
            });
        }

        let Some(conversion) = conversion else {
            return Err(FormatError::NoConversion(format.to_string()));
        };
        Ok(Self {
            source: format.to_string(),
            prefix,
            suffix,
            flags,
            width,
            precision,
            conversion,
        })
    }

    /// The format string this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Upper bound on the length of any string [`NumberFormat::format`] returns.
    pub fn maximum_formatted_len(&self) -> usize {
        let number = match self.conversion {
            // sign, leading digit, point, exponent marker, exponent sign and three digits
            Conversion::Exponent { .. } | Conversion::General { .. } => self.precision + 8,
            Conversion::Fixed => MAXIMUM_INTEGER_DIGITS + self.precision + 2,
        };
        self.prefix.len() + self.suffix.len() + number.max(self.width)
    }

    pub fn format(&self, value: f64) -> String {
        let body = if value.is_finite() {
            let magnitude = value.abs();
            match self.conversion {
                Conversion::Exponent { upper } => {
                    exponent_form(magnitude, self.precision, upper, self.flags.alternate)
                }
                Conversion::Fixed => fixed_form(magnitude, self.precision, self.flags.alternate),
                Conversion::General { upper } => {
                    general_form(magnitude, self.precision, upper, self.flags.alternate)
                }
            }
        } else {
            let upper = matches!(
                self.conversion,
                Conversion::Exponent { upper: true } | Conversion::General { upper: true }
            );
            let text = if value.is_nan() { "nan" } else { "inf" };
            if upper { text.to_uppercase() } else { text.to_string() }
        };

        let sign = if value.is_sign_negative() && !value.is_nan() {
            "-"
        } else if self.flags.plus {
            "+"
        } else if self.flags.space {
            " "
        } else {
            ""
        };

        let length = sign.len() + body.len();
        let padding = self.width.saturating_sub(length);
        let number = if padding == 0 {
            format!("{sign}{body}")
        } else if self.flags.left_align {
            format!("{sign}{body}{}", " ".repeat(padding))
        } else if self.flags.zero_pad && value.is_finite() {
            format!("{sign}{}{body}", "0".repeat(padding))
        } else {
            format!("{}{sign}{body}", " ".repeat(padding))
        };
        format!("{}{number}{}", self.prefix, self.suffix)
    }
}

impl FromStr for NumberFormat {
    type Err = FormatError;

    fn from_str(format: &str) -> FormatResult<Self> {
        Self::parse(format)
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Validate `format` and return the buffer size needed to hold any number it formats.
pub fn numerical_format_string_size(format: &str) -> FormatResult<usize> {
    NumberFormat::parse(format).map(|format| format.maximum_formatted_len())
}

fn take_number(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    format: &str,
) -> FormatResult<Option<usize>> {
    let mut number: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        let value = number.unwrap_or(0) * 10 + digit as usize;
        if value > MAXIMUM_FIELD_SIZE {
            return Err(FormatError::FieldTooLarge {
                format: format.to_string(),
                size: value,
            });
        }
        number = Some(value);
    }
    Ok(number)
}

/// Split Rust's `d.ddde-5` output into mantissa and exponent.
fn rust_exponent(magnitude: f64, precision: usize) -> (String, i32) {
    let text = format!("{magnitude:.precision$e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_string(), exponent.parse().unwrap_or(0)),
        None => (text, 0),
    }
}

fn exponent_form(magnitude: f64, precision: usize, upper: bool, alternate: bool) -> String {
    let (mut mantissa, exponent) = rust_exponent(magnitude, precision);
    if alternate && !mantissa.contains('.') {
        mantissa.push('.');
    }
    c_exponent(&mantissa, exponent, upper)
}

fn c_exponent(mantissa: &str, exponent: i32, upper: bool) -> String {
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{marker}{sign}{:02}", exponent.unsigned_abs())
}

fn fixed_form(magnitude: f64, precision: usize, alternate: bool) -> String {
    let mut text = format!("{magnitude:.precision$}");
    if alternate && !text.contains('.') {
        text.push('.');
    }
    text
}

fn general_form(magnitude: f64, precision: usize, upper: bool, alternate: bool) -> String {
    let significant = precision.max(1);
    let (mantissa, exponent) = rust_exponent(magnitude, significant - 1);
    if exponent < -4 || exponent >= significant as i32 {
        let mantissa = if alternate { mantissa } else { strip_zeros(&mantissa) };
        return c_exponent(&mantissa, exponent, upper);
    }
    let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
    let mut text = format!("{magnitude:.decimals$}");
    if alternate {
        if !text.contains('.') {
            text.push('.');
        }
        text
    } else {
        strip_zeros(&text)
    }
}

fn strip_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}
