//! IEEE 754-2008 128-bit decimal (BID encoding).
//!
//! The value is kept as the 16 little-endian bytes found on the wire. The
//! string conversions follow the BSON Decimal128 specification, which makes
//! `parse(to_string(d)) == d` hold for every canonical encoding.

use std::fmt;
use std::str::FromStr;

use crate::error::ConversionError;

const EXPONENT_BIAS: i64 = 6176;
const EXPONENT_MIN: i64 = -6176;
const EXPONENT_MAX: i64 = 6111;
const MAX_DIGITS: usize = 34;
const MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999_999;
const COEFFICIENT_MASK: u128 = (1 << 113) - 1;

/// BSON Decimal128 stored as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal128([u8; 16]);

enum Parts {
    NaN,
    Infinity { negative: bool },
    Finite {
        negative: bool,
        exponent: i64,
        coefficient: u128,
    },
}

impl Decimal128 {
    pub const NAN: Decimal128 = Decimal128(0x7C00_0000_0000_0000_0000_0000_0000_0000u128.to_le_bytes());
    pub const INFINITY: Decimal128 = Decimal128(0x7800_0000_0000_0000_0000_0000_0000_0000u128.to_le_bytes());
    pub const NEG_INFINITY: Decimal128 = Decimal128(0xF800_0000_0000_0000_0000_0000_0000_0000u128.to_le_bytes());

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 16] {
        self.0
    }

    pub fn is_nan(&self) -> bool {
        matches!(self.parts(), Parts::NaN)
    }

    fn from_parts(negative: bool, exponent: i64, coefficient: u128) -> Self {
        let mut bits = coefficient & COEFFICIENT_MASK;
        bits |= ((exponent + EXPONENT_BIAS) as u128) << 113;
        if negative {
            bits |= 1 << 127;
        }
        Self(bits.to_le_bytes())
    }

    fn parts(&self) -> Parts {
        let bits = u128::from_le_bytes(self.0);
        let negative = bits >> 127 == 1;
        let combination = (bits >> 122) & 0x1F;

        if combination == 0x1F {
            return Parts::NaN;
        }
        if combination == 0x1E {
            return Parts::Infinity { negative };
        }

        let (biased, coefficient) = if (bits >> 125) & 0b11 == 0b11 {
            // Implicit 0b100 prefix puts the coefficient above 10^34.
            (((bits >> 111) & 0x3FFF) as i64, 0)
        } else {
            let coefficient = bits & COEFFICIENT_MASK;
            let coefficient = if coefficient > MAX_COEFFICIENT {
                0
            } else {
                coefficient
            };
            (((bits >> 113) & 0x3FFF) as i64, coefficient)
        };

        Parts::Finite {
            negative,
            exponent: biased - EXPONENT_BIAS,
            coefficient,
        }
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (negative, exponent, coefficient) = match self.parts() {
            Parts::NaN => return f.write_str("NaN"),
            Parts::Infinity { negative: false } => return f.write_str("Infinity"),
            Parts::Infinity { negative: true } => return f.write_str("-Infinity"),
            Parts::Finite {
                negative,
                exponent,
                coefficient,
            } => (negative, exponent, coefficient),
        };

        let digits = coefficient.to_string();
        let adjusted = exponent + digits.len() as i64 - 1;
        let mut out = String::with_capacity(digits.len() + 8);
        if negative {
            out.push('-');
        }

        if exponent <= 0 && adjusted >= -6 {
            if exponent == 0 {
                out.push_str(&digits);
            } else {
                let point = digits.len() as i64 + exponent;
                if point > 0 {
                    let (int_part, frac_part) = digits.split_at(point as usize);
                    out.push_str(int_part);
                    out.push('.');
                    out.push_str(frac_part);
                } else {
                    out.push_str("0.");
                    out.extend(std::iter::repeat_n('0', (-point) as usize));
                    out.push_str(&digits);
                }
            }
        } else {
            let (first, rest) = digits.split_at(1);
            out.push_str(first);
            if !rest.is_empty() {
                out.push('.');
                out.push_str(rest);
            }
            out.push('E');
            if adjusted >= 0 {
                out.push('+');
            }
            out.push_str(&adjusted.to_string());
        }

        f.write_str(&out)
    }
}

impl FromStr for Decimal128 {
    type Err = ConversionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| {
            ConversionError::invalid_json(format!("Decimal128 '{input}': {reason}"))
        };

        let (negative, body) = match input.as_bytes().first() {
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            _ => (false, input),
        };

        match body.to_ascii_lowercase().as_str() {
            "inf" | "infinity" => {
                return Ok(if negative {
                    Self::NEG_INFINITY
                } else {
                    Self::INFINITY
                });
            }
            "nan" => return Ok(Self::NAN),
            _ => {}
        }

        let (mantissa, exp) = match body.find(['e', 'E']) {
            Some(pos) => {
                let exp_str = &body[pos + 1..];
                let exp = exp_str
                    .parse::<i64>()
                    .map_err(|_| invalid("bad exponent"))?;
                (&body[..pos], exp)
            }
            None => (body, 0),
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("no digits"));
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid("not a decimal number"));
        }

        let mut exponent = exp
            .checked_sub(frac_part.len() as i64)
            .ok_or_else(|| invalid("exponent out of range"))?;

        let mut significant: String = int_part
            .chars()
            .chain(frac_part.chars())
            .skip_while(|c| *c == '0')
            .collect();
        while significant.len() > MAX_DIGITS && significant.ends_with('0') {
            significant.pop();
            exponent = exponent.saturating_add(1);
        }
        if significant.len() > MAX_DIGITS {
            return Err(invalid("more than 34 significant digits"));
        }

        let mut coefficient: u128 = if significant.is_empty() {
            0
        } else {
            significant
                .parse()
                .map_err(|_| invalid("not a decimal number"))?
        };

        if coefficient == 0 {
            exponent = exponent.clamp(EXPONENT_MIN, EXPONENT_MAX);
        } else {
            while exponent > EXPONENT_MAX {
                match coefficient.checked_mul(10) {
                    Some(c) if c <= MAX_COEFFICIENT => {
                        coefficient = c;
                        exponent -= 1;
                    }
                    _ => return Err(invalid("exponent overflow")),
                }
            }
            while exponent < EXPONENT_MIN {
                if coefficient % 10 != 0 {
                    return Err(invalid("exponent underflow"));
                }
                coefficient /= 10;
                exponent += 1;
            }
        }

        Ok(Self::from_parts(negative, exponent, coefficient))
    }
}
