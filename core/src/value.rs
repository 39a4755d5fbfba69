//! Dynamically typed values, comparison operands and primary keys.
//!
//! [`Value`] is what flows between entities, predicates and storage engines.
//! Comparisons follow SQLite's affinity rules so that every storage engine
//! (and the in-process evaluator) agrees on which rows a predicate accepts:
//!
//! - numeric attributes (integer, real, boolean) compare numerically, and a
//!   text operand is converted when it looks like a number; otherwise numbers
//!   sort before text
//! - text attributes compare byte-wise against the text form of the operand
//! - `NULL` on either side never compares

use core::cmp::Ordering;
use core::fmt;
use std::borrow::Cow;

/// Storage kind of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Real,
    Text,
    Boolean,
}

impl ValueKind {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Text => "text",
            Self::Boolean => "boolean",
        }
    }

    /// Whether attributes of this kind use numeric comparison.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Value
// =============================================================================

/// A single scalar value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the stored variant, used in mapping errors.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
        }
    }

    /// Numeric view of the value. Booleans count as 0 / 1.
    pub const fn as_number(&self) -> Option<Number> {
        match self {
            Self::Boolean(b) => Some(Number::Integer(*b as i64)),
            Self::Integer(i) => Some(Number::Integer(*i)),
            Self::Real(r) => Some(Number::Real(*r)),
            Self::Null | Self::Text(_) => None,
        }
    }

    /// Text form of the value, as SQLite would render it for `LIKE` or for a
    /// comparison against a text column.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Text(text) => Some(Cow::Borrowed(text)),
            other => other.as_number().map(|n| Cow::Owned(n.to_string())),
        }
    }

    /// Compares `self`, an attribute value, against a predicate operand.
    ///
    /// The attribute's storage class decides the affinity applied to the
    /// operand. Returns `None` when either side is `NULL`.
    pub fn compare(&self, operand: &Value) -> Option<Ordering> {
        if self.is_null() || operand.is_null() {
            return None;
        }

        match (self.as_number(), operand.as_number()) {
            (Some(left), Some(right)) => Some(left.total_cmp(right)),
            (Some(left), None) => {
                let text = operand.to_text()?;
                match Number::parse(&text) {
                    Some(right) => Some(left.total_cmp(right)),
                    // numbers sort before text
                    None => Some(Ordering::Less),
                }
            }
            (None, _) => {
                let left = self.to_text()?;
                let right = operand.to_text()?;
                Some(left.as_ref().cmp(right.as_ref()))
            }
        }
    }

    /// Total order used for sorting: `NULL` < numbers < text.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        const fn rank(value: &Value) -> u8 {
            match value {
                Value::Null => 0,
                Value::Boolean(_) | Value::Integer(_) | Value::Real(_) => 1,
                Value::Text(_) => 2,
            }
        }

        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.total_cmp(b),
                _ => rank(self).cmp(&rank(other)),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Text(text) => write!(f, "'{text}'"),
            other => match other.as_number() {
                Some(n) => n.fmt(f),
                None => Ok(()),
            },
        }
    }
}

macro_rules! value_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::Integer(i64::from(value))
                }
            }
        )*
    };
}

value_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Self::Real(f64::from(value))
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Value {
    #[inline]
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        match value {
            Number::Integer(i) => Self::Integer(i),
            Number::Real(r) => Self::Real(r),
        }
    }
}

// =============================================================================
// Number
// =============================================================================

/// A numeric operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    /// Parses text that "looks like a number". Surrounding whitespace is
    /// ignored; infinities and NaN are not numbers here.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if !text.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }
        if let Ok(i) = text.parse::<i64>() {
            return Some(Self::Integer(i));
        }
        text.parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .map(Self::Real)
    }

    /// Integers compare exactly, anything involving a real compares as `f64`.
    pub fn total_cmp(self, other: Number) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(&b),
            (a, b) => a.as_f64().total_cmp(&b.as_f64()),
        }
    }

    #[inline]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Real(r) => r,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            // integral reals keep their ".0" like SQLite renders them
            Self::Real(r) if r.fract() == 0.0 && r.abs() < 1e15 => write!(f, "{r:.1}"),
            Self::Real(r) => write!(f, "{r}"),
        }
    }
}

// =============================================================================
// Comparand
// =============================================================================

/// Operand of an ordered comparison.
///
/// The tag selects the comparison semantics: numbers compare by magnitude,
/// strings lexicographically.
#[derive(Clone, Debug, PartialEq)]
pub enum Comparand {
    Numeric(Number),
    Lexical(String),
}

impl Comparand {
    /// Classifies a pair of stringified range bounds.
    ///
    /// When both bounds look numeric the range is numeric, otherwise both
    /// bounds compare lexically.
    pub fn range(low: String, high: String) -> (Self, Self) {
        match (Number::parse(&low), Number::parse(&high)) {
            (Some(low), Some(high)) => (Self::Numeric(low), Self::Numeric(high)),
            _ => (Self::Lexical(low), Self::Lexical(high)),
        }
    }

    #[inline]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Numeric(n) => Value::from(*n),
            Self::Lexical(s) => Value::Text(s.clone()),
        }
    }
}

impl fmt::Display for Comparand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => n.fmt(f),
            Self::Lexical(s) => f.write_str(s),
        }
    }
}

macro_rules! comparand_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Comparand {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::Numeric(Number::Integer(i64::from(value)))
                }
            }
        )*
    };
}

comparand_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Comparand {
    #[inline]
    fn from(value: f32) -> Self {
        Self::Numeric(Number::Real(f64::from(value)))
    }
}

impl From<f64> for Comparand {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Numeric(Number::Real(value))
    }
}

impl From<Number> for Comparand {
    #[inline]
    fn from(value: Number) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for Comparand {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Lexical(value.to_owned())
    }
}

impl From<String> for Comparand {
    #[inline]
    fn from(value: String) -> Self {
        Self::Lexical(value)
    }
}

impl From<&String> for Comparand {
    #[inline]
    fn from(value: &String) -> Self {
        Self::Lexical(value.clone())
    }
}

// =============================================================================
// Key
// =============================================================================

/// Primary key of a stored row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Integer(i64),
    Text(String),
}

impl Key {
    /// Only integer and text values can identify a row.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(Self::Integer(*i)),
            Value::Text(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Key that `value` selects in a primary key column of `kind`.
    ///
    /// Applies the column affinity the way [`Value::compare`] does: numeric
    /// columns take integers, integral reals and text that parses to one,
    /// text columns take the text form of the value. `None` when no row can
    /// match.
    pub fn coerce(value: &Value, kind: ValueKind) -> Option<Self> {
        if !kind.is_numeric() {
            return value.to_text().map(|text| Self::Text(text.into_owned()));
        }
        let number = match value {
            Value::Text(text) => Number::parse(text)?,
            other => other.as_number()?,
        };
        match number {
            Number::Integer(i) => Some(Self::Integer(i)),
            Number::Real(r) if r.fract() == 0.0 && r >= i64::MIN as f64 && r < i64::MAX as f64 => {
                Some(Self::Integer(r as i64))
            }
            Number::Real(_) => None,
        }
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Integer(i) => Self::Integer(i),
            Key::Text(s) => Self::Text(s),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}
