//! Content-rating authorities and per-authority rating storage.

use serde::{Deserialize, Serialize};

/// Content-rating authorities a package can carry a rating for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingRegulator {
    Esrb,
    Pegi,
    /// PEGI, Finland
    PegiFi,
    /// PEGI, Portugal
    PegiPt,
    Bbfc,
    Cero,
    Usk,
    /// OFLC, Australia
    OflcAu,
    /// OFLC, New Zealand
    OflcNz,
    Kmrb,
    Brazil,
    Fpb,
}

impl RatingRegulator {
    pub const COUNT: usize = 12;

    /// Every regulator, in slot order.
    pub const ALL: [RatingRegulator; Self::COUNT] = [
        Self::Esrb,
        Self::Pegi,
        Self::PegiFi,
        Self::PegiPt,
        Self::Bbfc,
        Self::Cero,
        Self::Usk,
        Self::OflcAu,
        Self::OflcNz,
        Self::Kmrb,
        Self::Brazil,
        Self::Fpb,
    ];

    /// Slot index into [`Ratings`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Esrb => "ESRB",
            Self::Pegi => "PEGI",
            Self::PegiFi => "PEGI (Finland)",
            Self::PegiPt => "PEGI (Portugal)",
            Self::Bbfc => "BBFC",
            Self::Cero => "CERO",
            Self::Usk => "USK",
            Self::OflcAu => "OFLC (Australia)",
            Self::OflcNz => "OFLC (New Zealand)",
            Self::Kmrb => "KMRB",
            Self::Brazil => "DJCTQ (Brazil)",
            Self::Fpb => "FPB",
        }
    }
}

impl std::fmt::Display for RatingRegulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Raw rating value as stored in the package; `0xFF` means unrated.
pub type RatingValue = u8;

/// One rating slot per regulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ratings([RatingValue; RatingRegulator::COUNT]);

impl Ratings {
    pub const UNRATED: RatingValue = 0xFF;

    pub fn get(&self, regulator: RatingRegulator) -> RatingValue {
        self.0[regulator.index()]
    }

    pub fn set(&mut self, regulator: RatingRegulator, value: RatingValue) {
        self.0[regulator.index()] = value;
    }

    /// Iterate `(regulator, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (RatingRegulator, RatingValue)> + '_ {
        RatingRegulator::ALL.iter().map(|&r| (r, self.get(r)))
    }
}
