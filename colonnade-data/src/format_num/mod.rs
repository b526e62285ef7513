//! Numeric formatting in the Python 3 / d3 format-specification
//! mini-language.
//!
//! The general form of a format pattern is:
//!
//! ```text
//! [[fill]align][sign][symbol][0][width][,][.precision][type]
//! ```
//!
//! Supported types: `f` (fixed point), `d` (rounded to integer), `e`/`E`
//! (exponent notation), `s` (SI-prefixed, significant digits), `%`
//! (multiply by 100 with a percent sign). The `$` symbol prefixes a
//! currency sign, `,` groups integer digits, and `0` enables zero padding.
//! Precision counts decimal digits for `f` and `%`, and significant digits
//! for `e` and `s`; it defaults to 6.
//!
//! ```
//! use colonnade_data::format_num::NumberFormat;
//!
//! let num = NumberFormat::new();
//!
//! assert_eq!(num.format(".1f", 0.06), "0.1");
//! assert_eq!(num.format("$,.0f", 1234.5), "$1,235");
//! assert_eq!(num.format(".0%", 0.123), "12%");
//! assert_eq!(num.format(".2s", 42e6), "42M");
//! assert_eq!(num.format("+.0f", 255.0), "+255");
//! ```

use regex::Regex;

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Formatter holding the decimal and group-delimiter characters.
pub struct NumberFormat {
    decimal: char,
    group_delimiter: char,
}

/// A destructured format pattern.
#[derive(Debug)]
struct FormatSpec {
    fill: char,
    align: char,
    sign: char,
    symbol: Option<char>,
    width: usize,
    grouping: bool,
    precision: usize,
    format_type: Option<char>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberFormat {
    pub fn new() -> Self {
        Self {
            decimal: '.',
            group_delimiter: ',',
        }
    }

    /// Parse a format pattern; `None` when the pattern is not valid
    /// mini-language.
    fn parse_pattern(&self, pattern: &str) -> Option<FormatSpec> {
        let re = Regex::new(r"^(?:(.)?([<>=^]))?([+\- ])?([$#])?(0)?(\d+)?(,)?(\.\d+)?([A-Za-z%])?$")
            .unwrap();
        let captures = re.captures(pattern)?;

        let format_type = captures.get(9).and_then(|m| m.as_str().chars().next());
        let mut spec = FormatSpec {
            fill: captures
                .get(1)
                .and_then(|m| m.as_str().chars().next())
                .unwrap_or(' '),
            align: captures
                .get(2)
                .and_then(|m| m.as_str().chars().next())
                .unwrap_or('>'),
            sign: captures
                .get(3)
                .and_then(|m| m.as_str().chars().next())
                .unwrap_or('-'),
            symbol: captures.get(4).and_then(|m| m.as_str().chars().next()),
            width: captures
                .get(6)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0),
            grouping: captures.get(7).is_some(),
            precision: match format_type {
                Some('d') => 0,
                _ => captures
                    .get(8)
                    .and_then(|m| m.as_str()[1..].parse().ok())
                    .unwrap_or(6),
            },
            format_type,
        };

        // Zero padding implies fill "0" aligned after the sign and symbol.
        if captures.get(5).is_some() {
            spec.fill = '0';
            spec.align = '=';
        }

        Some(spec)
    }

    /// Format a number according to the pattern. Unparseable patterns fall
    /// back to the plain display rendering.
    pub fn format<T: Into<f64>>(&self, pattern: &str, input: T) -> String {
        let value: f64 = input.into();
        let Some(spec) = self.parse_pattern(pattern) else {
            return format!("{}", value);
        };

        let negative = value < 0.0;
        let abs = value.abs();

        let mut si_prefix = "";
        let body = match spec.format_type {
            Some('%') => format!(
                "{:.*}",
                spec.precision,
                round_half_away(abs * 100.0, spec.precision)
            ),
            Some('d') => format!("{:.0}", abs.round()),
            Some('e') | Some('E') => {
                exponent_notation(spec.format_type.unwrap_or('e'), abs, spec.precision)
            }
            Some('s') => {
                let (scaled, prefix) = si_scaled(abs, spec.precision);
                si_prefix = prefix;
                scaled
            }
            _ => format!("{:.*}", spec.precision, round_half_away(abs, spec.precision)),
        };

        let sign_prefix = if negative {
            "-"
        } else if spec.sign == '+' {
            "+"
        } else if spec.sign == ' ' {
            " "
        } else {
            ""
        };
        let symbol_prefix = if spec.symbol == Some('$') { "$" } else { "" };
        let suffix = format!(
            "{}{}",
            si_prefix,
            if spec.format_type == Some('%') { "%" } else { "" }
        );

        // Group integer digits; exponent bodies are never grouped.
        let groupable = !matches!(spec.format_type, Some('e') | Some('E'));
        let (mut int_part, dec_part) = if groupable {
            match body.split_once(self.decimal) {
                Some((int, dec)) => (int.to_string(), Some(dec.to_string())),
                None => (body, None),
            }
        } else {
            (body, None)
        };

        // The alternate form always shows a decimal point.
        let dec_part = match dec_part {
            Some(dec) => Some(dec),
            None if spec.symbol == Some('#') && groupable => Some(String::new()),
            None => None,
        };

        if spec.grouping && groupable {
            if spec.fill == '0' && spec.width > 0 {
                // Zero-pad digits so the grouped result fills the width.
                let fixed = sign_prefix.len()
                    + symbol_prefix.len()
                    + dec_part.as_ref().map_or(0, |d| d.len() + 1)
                    + suffix.chars().count();
                let target = spec.width.saturating_sub(fixed);
                let mut digits = int_part.len();
                while digits + digits.saturating_sub(1) / 3 < target {
                    digits += 1;
                }
                int_part = format!("{}{}", "0".repeat(digits - int_part.len()), int_part);
            }
            int_part = self.group_digits(&int_part);
        }

        let dec_part = dec_part
            .map(|d| format!("{}{}", self.decimal, d))
            .unwrap_or_default();

        let digits = format!("{}{}{}", int_part, dec_part, suffix);
        let core_len = sign_prefix.len() + symbol_prefix.len() + digits.chars().count();
        if core_len >= spec.width {
            return format!("{}{}{}", sign_prefix, symbol_prefix, digits);
        }

        let pad = spec.width - core_len;
        let fill = spec.fill.to_string();
        match spec.align {
            '<' => format!(
                "{}{}{}{}",
                sign_prefix,
                symbol_prefix,
                digits,
                fill.repeat(pad)
            ),
            '^' => format!(
                "{}{}{}{}{}",
                fill.repeat(pad / 2),
                sign_prefix,
                symbol_prefix,
                digits,
                fill.repeat(pad - pad / 2)
            ),
            '=' => format!(
                "{}{}{}{}",
                sign_prefix,
                symbol_prefix,
                fill.repeat(pad),
                digits
            ),
            _ => format!(
                "{}{}{}{}",
                fill.repeat(pad),
                sign_prefix,
                symbol_prefix,
                digits
            ),
        }
    }

    /// Insert the group delimiter every three digits from the right.
    fn group_digits(&self, digits: &str) -> String {
        let chars: Vec<char> = digits.chars().collect();
        let mut grouped = String::with_capacity(chars.len() + chars.len() / 3);
        for (i, c) in chars.iter().enumerate() {
            let remaining = chars.len() - i;
            if i > 0 && remaining % 3 == 0 {
                grouped.push(self.group_delimiter);
            }
            grouped.push(*c);
        }
        grouped
    }
}

/// Round to `precision` decimal digits with ties away from zero, the way
/// d3 and `toFixed` round. The standard library's float display rounds
/// ties to even, which turns `1234.5` into `1234`.
fn round_half_away(abs: f64, precision: usize) -> f64 {
    let scale = 10f64.powi(precision as i32);
    let scaled = abs * scale;
    if scaled.is_finite() {
        scaled.round() / scale
    } else {
        abs
    }
}

/// Scale to an SI prefix and render with the given significant digits.
fn si_scaled(abs: f64, precision: usize) -> (String, &'static str) {
    if abs == 0.0 {
        return (format_significant(0.0, precision), "");
    }
    let exponent = abs.log10().floor() as i32;
    let prefix_exponent = ((exponent as f64) / 3.0).floor() as i32;
    let prefix_exponent = prefix_exponent.clamp(-8, 8);
    let scaled = abs / 10f64.powi(prefix_exponent * 3);
    (
        format_significant(scaled, precision),
        SI_PREFIXES[(prefix_exponent + 8) as usize],
    )
}

/// Render a non-negative value with `sig` significant digits, without
/// exponent notation.
fn format_significant(value: f64, sig: usize) -> String {
    let formatted = format!("{:.*e}", sig.saturating_sub(1), value);
    let (mantissa, exp) = match formatted.split_once('e') {
        Some(parts) => parts,
        None => return formatted,
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    // Place the decimal point `exp + 1` digits in.
    let point = exp + 1;
    if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}", digits, "0".repeat(point as usize - digits.len()))
    } else {
        format!("{}.{}", &digits[..point as usize], &digits[point as usize..])
    }
}

/// Exponent notation with a signed, at-least-two-digit exponent
/// (`1e+01`, `2.1e-02`).
fn exponent_notation(format_type: char, abs: f64, precision: usize) -> String {
    let formatted = format!("{:.*e}", precision, abs);
    let (mantissa, exp) = match formatted.split_once('e') {
        Some(parts) => parts,
        None => return formatted,
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    format!("{}{}{:+03}", mantissa, format_type, exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point() {
        let num = NumberFormat::new();
        assert_eq!(num.format(".1f", 0.06), "0.1");
        assert_eq!(num.format(".2f", 1.0), "1.00");
        assert_eq!(num.format(".0f", 255.4), "255");
        assert_eq!(num.format(".0f", -200.0), "-200");
    }

    #[test]
    fn test_currency_and_grouping() {
        let num = NumberFormat::new();
        assert_eq!(num.format("$,.0f", 0.0), "$0");
        assert_eq!(num.format("$,.0f", 1234.5), "$1,235");
        assert_eq!(num.format(",.0f", 1234567.89), "1,234,568");
        assert_eq!(num.format("$,.2f", -12345.678), "-$12,345.68");
    }

    #[test]
    fn test_percent() {
        let num = NumberFormat::new();
        assert_eq!(num.format(".0%", 0.123), "12%");
        assert_eq!(num.format(".1%", 0.5), "50.0%");
    }

    #[test]
    fn test_si_prefix() {
        let num = NumberFormat::new();
        assert_eq!(num.format(".2s", 42e6), "42M");
        assert_eq!(num.format(".3s", 1536.0), "1.54k");
        assert_eq!(num.format(".1s", 0.00042), "400µ");
    }

    #[test]
    fn test_exponent() {
        let num = NumberFormat::new();
        assert_eq!(num.format(".0e", 10.0), "1e+01");
        assert_eq!(num.format(".1e", 0.021), "2.1e-02");
    }

    #[test]
    fn test_sign_and_padding() {
        let num = NumberFormat::new();
        assert_eq!(num.format("+.0f", 255.0), "+255");
        assert_eq!(num.format("+10.0f", 255.0), "      +255");
        assert_eq!(num.format("010.1f", 12.5), "00000012.5");
        assert_eq!(num.format("<6.0f", 12.0), "12    ");
        assert_eq!(num.format("^6.0f", 12.0), "  12  ");
    }

    #[test]
    fn test_integer_type() {
        let num = NumberFormat::new();
        assert_eq!(num.format("d", 12.7), "13");
        assert_eq!(num.format(",d", 1234567.0), "1,234,567");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        let num = NumberFormat::new();
        assert_eq!(num.format(".0f", 0.5), "1");
        assert_eq!(num.format(".0f", 2.5), "3");
        assert_eq!(num.format(".1f", 0.25), "0.3");
        assert_eq!(num.format("d", 12.5), "13");
    }

    #[test]
    fn test_invalid_pattern_falls_back() {
        let num = NumberFormat::new();
        assert_eq!(num.format("..bad..", 1.5), "1.5");
    }

    #[test]
    fn test_alternate_form() {
        let num = NumberFormat::new();
        assert_eq!(num.format("#.0f", 10.1), "10.");
    }
}
