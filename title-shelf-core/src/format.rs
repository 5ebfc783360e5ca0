use serde::{Deserialize, Serialize};

/// Container formats a title package can be discovered in.
///
/// Centralizes format identity (short names, display names, aliases and
/// file extensions) so scanners and the library agree on naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameFormat {
    /// Not yet derived from a package.
    #[default]
    Unknown,
    /// Bare executable (`default.xex`).
    Xex,
    /// Full disc image.
    Iso,
    /// STFS container (Games on Demand, Arcade, marketplace packages).
    Stfs,
}

/// All known formats, `Unknown` last.
const ALL_FORMATS: &[GameFormat] = &[
    GameFormat::Xex,
    GameFormat::Iso,
    GameFormat::Stfs,
    GameFormat::Unknown,
];

impl GameFormat {
    /// Canonical short name used for settings and logs.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Xex => "xex",
            Self::Iso => "iso",
            Self::Stfs => "stfs",
        }
    }

    /// Human-readable name shown in the library browser.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Xex => "Executable",
            Self::Iso => "Disc Image",
            Self::Stfs => "STFS Package",
        }
    }

    /// Accepted names for parsing (lowercase). The first entry is the short name.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Unknown => &["unknown"],
            Self::Xex => &["xex", "executable", "xex2"],
            Self::Iso => &["iso", "disc", "disc image", "xiso"],
            Self::Stfs => &["stfs", "god", "games on demand", "con", "live"],
        }
    }

    /// File extensions commonly associated with the format.
    ///
    /// STFS packages usually carry no extension at all.
    pub fn file_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Unknown | Self::Stfs => &[],
            Self::Xex => &["xex"],
            Self::Iso => &["iso"],
        }
    }

    /// Guess a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lower = ext.to_lowercase();
        ALL_FORMATS
            .iter()
            .copied()
            .find(|f| f.file_extensions().contains(&lower.as_str()))
    }

    pub fn all() -> &'static [GameFormat] {
        ALL_FORMATS
    }
}

impl std::fmt::Display for GameFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `GameFormat`.
#[derive(Debug, Clone)]
pub struct FormatParseError(pub String);

impl std::fmt::Display for FormatParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown package format: '{}'", self.0)
    }
}

impl std::error::Error for FormatParseError {}

impl std::str::FromStr for GameFormat {
    type Err = FormatParseError;

    /// Parse a format from its short name or any alias (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_FORMATS
            .iter()
            .copied()
            .find(|f| f.aliases().contains(&lower.as_str()))
            .ok_or_else(|| FormatParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
