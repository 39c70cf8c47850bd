//! Price values as entered by sellers or loaded from a saved post.
//!
//! A price is either a JSON number or the raw text typed into the form.
//! Parsing takes the longest numeric prefix (so `"12abc"` is `12`), and
//! decimal places are counted on the price's default string rendering with
//! the exponent folded in, so `1e-7` counts as seven decimals.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Longest leading float literal, after leading whitespace is dropped.
static FLOAT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").expect("valid regex")
});

/// Fraction digits and exponent at the end of a rendered number.
static DECIMALS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\.(\d+))?(?:[eE]([+-]?\d+))?$").expect("valid regex"));

/// A product price, numeric or as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl Price {
    /// Numeric value of the price; `None` when there is no numeric prefix or
    /// the number is NaN.
    pub fn parse(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_nan() => None,
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_float(s),
        }
    }

    /// Whether the price counts as entered at all. Empty text, zero and NaN
    /// do not.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Default string rendering: text verbatim, numbers via [`render_number`].
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(render_number(*n)),
            Self::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Decimal places of the rendered price, see [`decimal_places`].
    pub fn decimal_places(&self) -> u32 {
        decimal_places(&self.render())
    }
}

impl From<f64> for Price {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Price {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Price {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Parse the longest float literal at the start of `input`.
///
/// Leading whitespace is skipped. Returns `None` when no numeric prefix
/// exists.
pub fn parse_float(input: &str) -> Option<f64> {
    let literal = FLOAT_PREFIX_RE.find(input.trim_start())?;
    literal.as_str().parse().ok()
}

/// Render a number the way a decimal string conversion would: shortest
/// round-trip digits, in exponential form when the decimal exponent is
/// below -6 or above 20.
pub fn render_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let exponential = format!("{n:e}");
    let Some((mantissa, exponent)) = exponential.split_once('e') else {
        return format!("{n}");
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-6..21).contains(&exponent) {
        format!("{n}")
    } else if exponent < 0 {
        format!("{mantissa}e{exponent}")
    } else {
        format!("{mantissa}e+{exponent}")
    }
}

/// Count decimal places of a rendered number.
///
/// Digits after the decimal point minus the exponent, floored at zero:
/// `"19.999"` is 3, `"1.5e-7"` is 8, `"1e+21"` is 0. Input with no trailing
/// fraction or exponent counts as 0.
pub fn decimal_places(rendered: &str) -> u32 {
    let Some(caps) = DECIMALS_RE.captures(rendered) else {
        return 0;
    };
    let digits = caps.get(1).map_or(0, |m| m.as_str().len() as i64);
    let exponent = caps.get(2).map_or(0, |m| saturating_exponent(m.as_str()));
    u32::try_from(digits.saturating_sub(exponent).max(0)).unwrap_or(u32::MAX)
}

/// Parse a signed exponent, clamping values beyond `i64` to its bounds so
/// that huge exponents still dominate the digit count.
fn saturating_exponent(text: &str) -> i64 {
    text.parse().unwrap_or(if text.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}
