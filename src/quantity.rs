//! Kubernetes resource quantities.
//!
//! Values are held as an exact integer count of nano-units so that sums across
//! containers are precise. Formatting follows the API server's canonical form:
//! binary quantities stay binary (`192Mi`), decimal ones use the largest SI
//! suffix that represents them exactly (`150m`, `2k`).

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const NANOS_PER_UNIT: i128 = 1_000_000_000;

const BINARY_SUFFIXES: [(&str, u32); 6] = [
    ("Ki", 10),
    ("Mi", 20),
    ("Gi", 30),
    ("Ti", 40),
    ("Pi", 50),
    ("Ei", 60),
];

const DECIMAL_SUFFIXES: [(&str, i32); 10] = [
    ("n", -9),
    ("u", -6),
    ("m", -3),
    ("", 0),
    ("k", 3),
    ("M", 6),
    ("G", 9),
    ("T", 12),
    ("P", 15),
    ("E", 18),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,
    #[error("invalid number in quantity {0:?}")]
    InvalidNumber(String),
    #[error("unknown suffix {suffix:?} in quantity {quantity:?}")]
    UnknownSuffix { quantity: String, suffix: String },
    #[error("quantity {0:?} is out of range")]
    OutOfRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    BinarySI,
    DecimalSI,
    DecimalExponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedQuantity {
    nanos: i128,
    format: Format,
}

impl ParsedQuantity {
    pub fn zero(format: Format) -> Self {
        Self { nanos: 0, format }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Sum of two quantities. A zero left side takes the format of the right.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        let format = if self.nanos == 0 { other.format } else { self.format };
        Some(Self {
            nanos: self.nanos.checked_add(other.nanos)?,
            format,
        })
    }

    /// Whole units, rounded up; bytes for memory and storage.
    pub fn as_integer(&self) -> Option<i64> {
        let whole = self.nanos.div_euclid(NANOS_PER_UNIT);
        let whole = if self.nanos.rem_euclid(NANOS_PER_UNIT) != 0 {
            whole + 1
        } else {
            whole
        };
        i64::try_from(whole).ok()
    }

    fn write_decimal(&self, f: &mut fmt::Formatter<'_>, exponent_form: bool) -> fmt::Result {
        if self.nanos == 0 {
            return f.write_str("0");
        }
        for (suffix, exp) in DECIMAL_SUFFIXES.iter().rev() {
            let divisor = 10i128.pow((exp + 9) as u32);
            if self.nanos % divisor == 0 {
                let value = self.nanos / divisor;
                return if exponent_form {
                    if *exp == 0 {
                        write!(f, "{}", value)
                    } else {
                        write!(f, "{}e{}", value, exp)
                    }
                } else {
                    write!(f, "{}{}", value, suffix)
                };
            }
        }
        // nanos are always divisible by 10^0
        write!(f, "{}n", self.nanos)
    }
}

impl fmt::Display for ParsedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            Format::BinarySI if self.nanos % NANOS_PER_UNIT == 0 => {
                let value = self.nanos / NANOS_PER_UNIT;
                for (suffix, shift) in BINARY_SUFFIXES.iter().rev() {
                    let unit = 1i128 << shift;
                    if value != 0 && value % unit == 0 {
                        return write!(f, "{}{}", value / unit, suffix);
                    }
                }
                write!(f, "{}", value)
            }
            // Fractional binary values have no exact binary suffix.
            Format::BinarySI | Format::DecimalSI => self.write_decimal(f, false),
            Format::DecimalExponent => self.write_decimal(f, true),
        }
    }
}

impl FromStr for ParsedQuantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(QuantityError::Empty);
        }

        let number_end = s
            .char_indices()
            .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '+' || *c == '-'))))
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(number_end);

        let (negative, digits) = match number.as_bytes().first() {
            Some(b'-') => (true, &number[1..]),
            Some(b'+') => (false, &number[1..]),
            _ => (false, number),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(QuantityError::InvalidNumber(s.to_string()));
        }
        let mantissa: i128 = format!("{}{}", int_part, frac_part)
            .parse()
            .map_err(|_| QuantityError::InvalidNumber(s.to_string()))?;
        let scale = frac_part.len() as i32;

        let (shift, exponent, format) = parse_suffix(s, suffix)?;

        let out_of_range = || QuantityError::OutOfRange(s.to_string());
        let mut value = mantissa.checked_mul(1i128 << shift).ok_or_else(out_of_range)?;
        let power = 9 + exponent - scale;
        if power >= 0 {
            let factor = 10i128.checked_pow(power as u32).ok_or_else(out_of_range)?;
            value = value.checked_mul(factor).ok_or_else(out_of_range)?;
        } else {
            let divisor = 10i128.checked_pow((-power) as u32).ok_or_else(out_of_range)?;
            // Sub-nano precision rounds up, like the API server does.
            let rounded_up = value % divisor != 0;
            value /= divisor;
            if rounded_up {
                value += 1;
            }
        }

        Ok(Self {
            nanos: if negative { -value } else { value },
            format,
        })
    }
}

/// Returns (binary shift, decimal exponent, format) for a quantity suffix.
fn parse_suffix(quantity: &str, suffix: &str) -> Result<(u32, i32, Format), QuantityError> {
    if let Some((_, shift)) = BINARY_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok((*shift, 0, Format::BinarySI));
    }
    if let Some((_, exp)) = DECIMAL_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok((0, *exp, Format::DecimalSI));
    }
    if let Some(exp) = suffix
        .strip_prefix('e')
        .or_else(|| suffix.strip_prefix('E'))
        .and_then(|e| e.parse::<i32>().ok())
        && (-40..=40).contains(&exp)
    {
        return Ok((0, exp, Format::DecimalExponent));
    }
    Err(QuantityError::UnknownSuffix {
        quantity: quantity.to_string(),
        suffix: suffix.to_string(),
    })
}

pub fn parse(quantity: &Quantity) -> Result<ParsedQuantity, QuantityError> {
    quantity.0.parse()
}

/// Canonical string form of a quantity; unparseable values are kept verbatim.
pub fn canonical(quantity: &Quantity) -> String {
    match parse(quantity) {
        Ok(q) => q.to_string(),
        Err(_) => quantity.0.clone(),
    }
}

/// Resource map with every quantity in canonical form.
pub fn canonical_map(map: Option<&BTreeMap<String, Quantity>>) -> BTreeMap<String, String> {
    map.into_iter()
        .flatten()
        .map(|(name, q)| (name.clone(), canonical(q)))
        .collect()
}

/// Exact per-resource sum across several resource maps.
///
/// Unparseable quantities are skipped.
pub fn sum_maps<'a, I>(maps: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = Option<&'a BTreeMap<String, Quantity>>>,
{
    let mut totals: BTreeMap<String, ParsedQuantity> = BTreeMap::new();
    for (name, q) in maps.into_iter().flatten().flatten() {
        let parsed = match parse(q) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Skipping {} quantity in sum: {}", name, e);
                continue;
            }
        };
        let total = totals
            .entry(name.clone())
            .or_insert_with(|| ParsedQuantity::zero(parsed.format()));
        match total.checked_add(parsed) {
            Some(sum) => *total = sum,
            None => debug!("Sum of {} quantities overflowed, keeping partial total", name),
        }
    }
    totals
        .into_iter()
        .map(|(name, q)| (name, q.to_string()))
        .collect()
}

/// Whole-unit value of one entry of a resource map (e.g. storage bytes).
pub fn integer_value(map: Option<&BTreeMap<String, Quantity>>, resource: &str) -> Option<i64> {
    map?.get(resource).and_then(|q| parse(q).ok()).and_then(|q| q.as_integer())
}
