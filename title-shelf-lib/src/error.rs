use thiserror::Error;

/// Reasons a raw record cannot become a library entry.
#[derive(Debug, Error)]
pub enum DerivationError {
    /// Reserved for structural checks on packed version fields. The current
    /// derivation rules accept every record, so nothing returns this yet.
    #[error("Malformed {field} field: {packed:#010x}")]
    MalformedVersion { field: &'static str, packed: u32 },
}

/// Errors reading or writing the library settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
