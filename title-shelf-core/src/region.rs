use serde::{Deserialize, Serialize};

/// Release regions a package can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    /// USA / North America (NTSC-U)
    Usa,
    /// Japan
    Japan,
    /// China
    China,
    /// Rest of the NTSC-J territories (Korea, Taiwan, Hong Kong, ...)
    Asia,
    /// Europe (PAL)
    Europe,
    /// Australia / New Zealand
    Australia,
    /// Territories outside the three video standards
    Other,
    /// Region-free
    World,
}

impl Region {
    /// Returns the standard abbreviation for this region.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usa => "USA",
            Self::Japan => "JPN",
            Self::China => "CHN",
            Self::Asia => "ASI",
            Self::Europe => "EUR",
            Self::Australia => "AUS",
            Self::Other => "OTH",
            Self::World => "WLD",
        }
    }

    /// Returns the full name of this region.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Usa => "USA",
            Self::Japan => "Japan",
            Self::China => "China",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::Australia => "Australia",
            Self::Other => "Other",
            Self::World => "World",
        }
    }

    /// Parse a region from its three-letter code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        const ALL: [Region; 8] = [
            Region::Usa,
            Region::Japan,
            Region::China,
            Region::Asia,
            Region::Europe,
            Region::Australia,
            Region::Other,
            Region::World,
        ];
        ALL.into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Raw region-restriction bits from an executable's security info.
///
/// Each video standard owns one byte; some bits inside a byte name a
/// specific territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionFlags(pub u32);

impl RegionFlags {
    pub const NTSC_U: u32 = 0x0000_00FF;
    pub const NTSC_J: u32 = 0x0000_FF00;
    pub const NTSC_J_JAPAN: u32 = 0x0000_0100;
    pub const NTSC_J_CHINA: u32 = 0x0000_0200;
    pub const PAL: u32 = 0x00FF_0000;
    pub const PAL_AU_NZ: u32 = 0x0001_0000;
    pub const OTHER: u32 = 0xFF00_0000;
    pub const ALL: u32 = 0xFFFF_FFFF;

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn all() -> Self {
        Self(Self::ALL)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// True if any bit of `mask` is set.
    pub const fn intersects(&self, mask: u32) -> bool {
        self.0 & mask != 0
    }

    pub const fn is_region_free(&self) -> bool {
        self.0 == Self::ALL
    }

    /// Decode the flags into the regions they allow, most specific first.
    ///
    /// Region-free flags decode to `[World]`; no bits decode to an empty list.
    pub fn regions(&self) -> Vec<Region> {
        if self.is_region_free() {
            return vec![Region::World];
        }

        let mut regions = Vec::new();
        if self.intersects(Self::NTSC_U) {
            regions.push(Region::Usa);
        }
        if self.intersects(Self::NTSC_J_JAPAN) {
            regions.push(Region::Japan);
        }
        if self.intersects(Self::NTSC_J_CHINA) {
            regions.push(Region::China);
        }
        if self.intersects(Self::NTSC_J & !(Self::NTSC_J_JAPAN | Self::NTSC_J_CHINA)) {
            regions.push(Region::Asia);
        }
        if self.intersects(Self::PAL & !Self::PAL_AU_NZ) {
            regions.push(Region::Europe);
        }
        if self.intersects(Self::PAL_AU_NZ) {
            regions.push(Region::Australia);
        }
        if self.intersects(Self::OTHER) {
            regions.push(Region::Other);
        }
        regions
    }
}

impl Default for RegionFlags {
    fn default() -> Self {
        Self::all()
    }
}

impl From<u32> for RegionFlags {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
#[path = "tests/region_tests.rs"]
mod tests;
