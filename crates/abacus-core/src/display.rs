//! Rendering of operand text for the display.
//!
//! Small magnitudes are shown as typed. From the grouping threshold up, the
//! integer part gets thousands separators and the fraction is capped at
//! `max_fraction_digits`, rounding half away from zero.

use abacus_config::DisplayConfig;

use crate::engine::ERROR_SENTINEL;

/// Number formatting rules for the display.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFormat {
    pub group_separator: String,
    pub decimal_separator: String,
    pub grouping_threshold: f64,
    pub max_fraction_digits: u32,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for DisplayFormat {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            group_separator: config.group_separator.clone(),
            decimal_separator: config.decimal_separator.clone(),
            grouping_threshold: config.grouping_threshold,
            max_fraction_digits: config.max_fraction_digits,
        }
    }
}

impl DisplayFormat {
    /// Render operand text for the display.
    ///
    /// The error sentinel and anything that does not parse as a finite
    /// number are returned unchanged.
    pub fn format(&self, text: &str) -> String {
        if text == ERROR_SENTINEL {
            return text.to_string();
        }
        let value = match text.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => return text.to_string(),
        };

        if value.abs() < self.grouping_threshold {
            self.localize(text)
        } else {
            self.group(text, value)
        }
    }

    fn localize(&self, text: &str) -> String {
        text.replacen('.', &self.decimal_separator, 1)
    }

    fn group(&self, text: &str, value: f64) -> String {
        let max = self.max_fraction_digits as usize;
        let rounded;
        let canonical = match text.split_once('.') {
            Some((_, fraction)) if fraction.len() > max => {
                rounded = round_fraction(value, self.max_fraction_digits);
                rounded.as_str()
            }
            _ => text,
        };

        let (sign, unsigned) = match canonical.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", canonical),
        };
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        let mut out = String::with_capacity(canonical.len() + integer.len() / 3 + 2);
        out.push_str(sign);
        out.push_str(&group_digits(integer, &self.group_separator));
        if let Some(fraction) = fraction {
            out.push_str(&self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

/// Round to `places` fractional digits and drop trailing zeros.
fn round_fraction(value: f64, places: u32) -> String {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    let mut s = format!("{rounded:.prec$}", prec = places as usize);
    if s.contains('.') {
        let keep = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(keep);
    }
    s
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + (len / 3) * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
