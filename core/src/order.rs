use core::fmt;
use core::str::FromStr;

/// Prefix marking a descending order in the compact notation.
pub const DESCENDING_PREFIX: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One sort key over a field path.
///
/// Parsed from the compact notation: `"name"` sorts ascending, `"-name"`
/// descending. The field is not validated until the order is used to
/// generate a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderSpec {
    pub field: String,
    pub ascending: bool,
}

impl OrderSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }

    pub fn parse(token: &str) -> Self {
        match token.strip_prefix(DESCENDING_PREFIX) {
            Some(field) => Self::desc(field),
            None => Self::asc(token),
        }
    }

    /// Parses every token, keeping their order.
    pub fn parse_all<I, S>(tokens: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|token| Self::parse(token.as_ref()))
            .collect()
    }

    #[inline]
    pub const fn direction(&self) -> SortDirection {
        if self.ascending {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

impl FromStr for OrderSpec {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for OrderSpec {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.ascending {
            write!(f, "{DESCENDING_PREFIX}")?;
        }
        f.write_str(&self.field)
    }
}
