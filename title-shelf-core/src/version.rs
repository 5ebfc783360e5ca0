use serde::{Deserialize, Serialize};

/// Executable version, unpacked from its 32-bit packed form.
///
/// Packed layout, high to low: major (4 bits), minor (4 bits),
/// build (16 bits), qfe (8 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct VersionInfo {
    pub major: u8,
    pub minor: u8,
    pub build: u16,
    pub qfe: u8,
}

impl VersionInfo {
    pub fn new(major: u8, minor: u8, build: u16, qfe: u8) -> Self {
        Self {
            major,
            minor,
            build,
            qfe,
        }
    }

    pub fn from_packed(value: u32) -> Self {
        Self {
            major: ((value >> 28) & 0xF) as u8,
            minor: ((value >> 24) & 0xF) as u8,
            build: ((value >> 8) & 0xFFFF) as u16,
            qfe: (value & 0xFF) as u8,
        }
    }

    /// Inverse of [`from_packed`](Self::from_packed). Major and minor are
    /// truncated to 4 bits.
    pub fn to_packed(&self) -> u32 {
        (u32::from(self.major & 0xF) << 28)
            | (u32::from(self.minor & 0xF) << 24)
            | (u32::from(self.build) << 8)
            | u32::from(self.qfe)
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.qfe)
    }
}
