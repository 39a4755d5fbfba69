//! SQLite PRAGMA statements applied when a connection is opened.
//!
//! [SQLite PRAGMA Documentation](https://sqlite.org/pragma.html)
//!
//! ```
//! use criteria_sqlite::pragma::Pragma;
//!
//! assert_eq!(Pragma::foreign_keys(true).to_string(), "PRAGMA foreign_keys = ON");
//! assert_eq!(Pragma::busy_timeout(250).to_string(), "PRAGMA busy_timeout = 250");
//! ```

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pragma {
    /// Enforce `REFERENCES` constraints
    ///
    /// [SQLite Documentation](https://sqlite.org/pragma.html#pragma_foreign_keys)
    ForeignKeys(bool),

    /// Make `LIKE` case-sensitive
    ///
    /// [SQLite Documentation](https://sqlite.org/pragma.html#pragma_case_sensitive_like)
    CaseSensitiveLike(bool),

    /// Milliseconds to wait on a locked database
    ///
    /// [SQLite Documentation](https://sqlite.org/pragma.html#pragma_busy_timeout)
    BusyTimeout(u32),
}

impl Pragma {
    pub const fn foreign_keys(enabled: bool) -> Self {
        Self::ForeignKeys(enabled)
    }

    pub const fn case_sensitive_like(enabled: bool) -> Self {
        Self::CaseSensitiveLike(enabled)
    }

    pub const fn busy_timeout(millis: u32) -> Self {
        Self::BusyTimeout(millis)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::ForeignKeys(_) => "foreign_keys",
            Self::CaseSensitiveLike(_) => "case_sensitive_like",
            Self::BusyTimeout(_) => "busy_timeout",
        }
    }
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled { "ON" } else { "OFF" }
}

impl fmt::Display for Pragma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PRAGMA {} = ", self.name())?;
        match self {
            Self::ForeignKeys(enabled) | Self::CaseSensitiveLike(enabled) => {
                f.write_str(on_off(*enabled))
            }
            Self::BusyTimeout(millis) => write!(f, "{millis}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_switches() {
        assert_eq!(
            Pragma::case_sensitive_like(true).to_string(),
            "PRAGMA case_sensitive_like = ON"
        );
        assert_eq!(
            Pragma::foreign_keys(false).to_string(),
            "PRAGMA foreign_keys = OFF"
        );
    }
}
