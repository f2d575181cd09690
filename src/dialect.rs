//! Style-sheet dialect selection.
//!
//! The dialect is the only configuration the scanner and parser take. It is
//! threaded through every parse call so the shared grammar can enable the
//! SCSS or LESS extension productions without separate parser types.

use std::fmt;
use std::str::FromStr;

/// One of the three concrete grammars.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Plain CSS.
    #[default]
    Css,
    /// Sass in its brace-based SCSS syntax.
    Scss,
    /// LESS.
    Less,
}

impl Dialect {
    /// Whether `//` starts a line comment.
    #[must_use]
    pub const fn has_line_comments(self) -> bool {
        !matches!(self, Self::Css)
    }

    /// Language identifier used by editor tooling.
    #[must_use]
    pub const fn language_id(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Less => "less",
        }
    }

    /// Guess the dialect from a file path's extension.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        ext.parse().ok()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.language_id())
    }
}

/// Error returned when a dialect name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown style-sheet dialect '{0}'")]
pub struct UnknownDialect(String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "css" => Ok(Self::Css),
            "scss" | "sass" => Ok(Self::Scss),
            "less" => Ok(Self::Less),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}
