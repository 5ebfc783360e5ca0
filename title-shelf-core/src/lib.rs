use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod error;
pub mod format;
pub mod rating;
pub mod region;
pub mod version;

pub use error::ScanError;
pub use format::{FormatParseError, GameFormat};
pub use rating::{RatingRegulator, RatingValue, Ratings};
pub use region::{Region, RegionFlags};
pub use version::VersionInfo;

/// Raw introspection record for one package, as produced by a scanner.
///
/// The executable (`xex_info`) is the primary metadata source; the dashboard
/// data (`nxe_info`) only fills in what the executable lacks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameInfo {
    /// Container format the package was read from
    pub format: GameFormat,

    /// Path of the package file
    pub path: PathBuf,

    /// Data read from the executable's headers
    pub xex_info: XexInfo,

    /// Dashboard override data (title and tile image), if the package has any
    pub nxe_info: NxeInfo,

    /// Descriptive metadata not found in the executable itself
    pub descriptive: DescriptiveInfo,
}

impl GameInfo {
    pub fn new(format: GameFormat, path: impl Into<PathBuf>) -> Self {
        Self {
            format,
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_ids(mut self, title_id: u32, media_id: u32) -> Self {
        self.xex_info.execution_info.title_id = title_id;
        self.xex_info.execution_info.media_id = media_id;
        self
    }

    pub fn with_disc(mut self, disc_number: u8, disc_count: u8) -> Self {
        self.xex_info.execution_info.disc_number = disc_number;
        self.xex_info.execution_info.disc_count = disc_count;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.xex_info.game_title = title.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<Vec<u8>>) -> Self {
        self.xex_info.icon = icon.into();
        self
    }

    pub fn with_dashboard_title(mut self, title: impl Into<String>) -> Self {
        self.nxe_info.game_title = title.into();
        self
    }

    pub fn with_dashboard_icon(mut self, icon: impl Into<Vec<u8>>) -> Self {
        self.nxe_info.icon = icon.into();
        self
    }

    pub fn with_version(mut self, version: VersionInfo) -> Self {
        self.xex_info.execution_info.version = version.to_packed();
        self
    }

    pub fn with_base_version(mut self, version: VersionInfo) -> Self {
        self.xex_info.execution_info.base_version = version.to_packed();
        self
    }

    pub fn with_region(mut self, region: RegionFlags) -> Self {
        self.xex_info.security_info.region = region;
        self
    }
}

/// Metadata read from an executable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XexInfo {
    pub execution_info: ExecutionInfo,
    pub security_info: SecurityInfo,
    pub game_ratings: GameRatings,

    /// Title from the executable's resources; empty if absent
    pub game_title: String,

    /// Icon image bytes from the executable's resources; empty if absent
    pub icon: Vec<u8>,
}

/// Execution info header. Versions are kept packed, as stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionInfo {
    pub media_id: u32,
    pub version: u32,
    pub base_version: u32,
    pub title_id: u32,
    pub platform: u8,
    pub executable_table: u8,
    /// 1-based disc number
    pub disc_number: u8,
    pub disc_count: u8,
    pub savegame_id: u32,
}

impl ExecutionInfo {
    pub fn version(&self) -> VersionInfo {
        VersionInfo::from_packed(self.version)
    }

    pub fn base_version(&self) -> VersionInfo {
        VersionInfo::from_packed(self.base_version)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityInfo {
    pub region: RegionFlags,
    pub allowed_media_types: u32,
}

/// Rating block exactly as stored in the executable, one byte per authority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRatings {
    pub esrb: RatingValue,
    pub pegi: RatingValue,
    pub pegi_fi: RatingValue,
    pub pegi_pt: RatingValue,
    pub bbfc: RatingValue,
    pub cero: RatingValue,
    pub usk: RatingValue,
    pub oflc_au: RatingValue,
    pub oflc_nz: RatingValue,
    pub kmrb: RatingValue,
    pub brazil: RatingValue,
    pub fpb: RatingValue,
}

impl GameRatings {
    /// Raw value for one authority.
    pub fn get(&self, regulator: RatingRegulator) -> RatingValue {
        match regulator {
            RatingRegulator::Esrb => self.esrb,
            RatingRegulator::Pegi => self.pegi,
            RatingRegulator::PegiFi => self.pegi_fi,
            RatingRegulator::PegiPt => self.pegi_pt,
            RatingRegulator::Bbfc => self.bbfc,
            RatingRegulator::Cero => self.cero,
            RatingRegulator::Usk => self.usk,
            RatingRegulator::OflcAu => self.oflc_au,
            RatingRegulator::OflcNz => self.oflc_nz,
            RatingRegulator::Kmrb => self.kmrb,
            RatingRegulator::Brazil => self.brazil,
            RatingRegulator::Fpb => self.fpb,
        }
    }
}

/// Dashboard (NXE) override data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NxeInfo {
    pub game_title: String,
    pub icon: Vec<u8>,
}

/// Descriptive metadata; fields are empty or zero when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptiveInfo {
    pub build_date: String,
    pub genre: String,
    pub release_date: String,
    pub player_count: u8,
}
