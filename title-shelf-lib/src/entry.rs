//! Library entries derived from raw package introspection records.
//!
//! A [`GameEntry`] is built once from a [`GameInfo`] by
//! [`GameEntry::from_info`]; afterwards the only mutation is the library's
//! merge step ([`GameEntry::absorb`]) folding a newer scan of the same title
//! into it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use title_shelf_core::{
    GameFormat, GameInfo, RatingRegulator, RatingValue, Ratings, Region, RegionFlags,
};

use crate::error::DerivationError;

/// Title used when neither the executable nor the dashboard data has one.
pub const UNKNOWN_TITLE: &str = "<unknown>";

/// One discovered title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    // File info
    format: GameFormat,
    file_path: PathBuf,
    /// Every path scanned for this title, with the media id found there
    launch_paths: BTreeMap<PathBuf, u32>,
    /// First path seen for each media id
    default_launch_paths: BTreeMap<u32, PathBuf>,

    // Game metadata
    title: String,
    icon_data: Vec<u8>,
    title_id: u32,
    media_id: u32,
    /// Disc number -> media id
    disc_map: BTreeMap<u8, u32>,
    version: String,
    base_version: String,
    ratings: Ratings,
    regions: RegionFlags,
    build_date: String,
    genre: String,
    release_date: String,
    player_count: u8,
}

impl Default for GameEntry {
    fn default() -> Self {
        Self {
            format: GameFormat::Unknown,
            file_path: PathBuf::new(),
            launch_paths: BTreeMap::new(),
            default_launch_paths: BTreeMap::new(),
            title: String::new(),
            icon_data: Vec::new(),
            title_id: 0,
            media_id: 0,
            disc_map: BTreeMap::new(),
            version: String::new(),
            base_version: String::new(),
            ratings: Ratings::default(),
            regions: RegionFlags::all(),
            build_date: String::new(),
            genre: String::new(),
            release_date: String::new(),
            player_count: 0,
        }
    }
}

impl GameEntry {
    /// Build an entry from a raw introspection record.
    ///
    /// Returns `None` if the record is rejected; callers skip the candidate.
    pub fn from_info(info: &GameInfo) -> Option<Self> {
        let mut entry = Self::default();
        match entry.apply_info(info) {
            Ok(()) => Some(entry),
            Err(e) => {
                log::debug!("Skipping {}: {}", info.path.display(), e);
                None
            }
        }
    }

    fn apply_info(&mut self, info: &GameInfo) -> Result<(), DerivationError> {
        let xex = &info.xex_info;
        let nxe = &info.nxe_info;
        let exec = &xex.execution_info;

        self.format = info.format;
        self.file_path = info.path.clone();

        self.title_id = exec.title_id;
        self.media_id = exec.media_id;
        self.version = exec.version().to_string();
        self.base_version = exec.base_version().to_string();

        for regulator in RatingRegulator::ALL {
            self.ratings.set(regulator, xex.game_ratings.get(regulator));
        }
        self.regions = xex.security_info.region;

        self.disc_map.insert(exec.disc_number, self.media_id);
        self.launch_paths.insert(info.path.clone(), self.media_id);
        self.default_launch_paths
            .entry(self.media_id)
            .or_insert_with(|| info.path.clone());

        self.title = if !xex.game_title.is_empty() {
            xex.game_title.clone()
        } else if !nxe.game_title.is_empty() {
            nxe.game_title.clone()
        } else {
            UNKNOWN_TITLE.to_string()
        };

        self.icon_data = if !xex.icon.is_empty() {
            xex.icon.clone()
        } else {
            nxe.icon.clone()
        };

        let descriptive = &info.descriptive;
        self.build_date = descriptive.build_date.clone();
        self.genre = descriptive.genre.clone();
        self.release_date = descriptive.release_date.clone();
        self.player_count = descriptive.player_count;

        Ok(())
    }

    /// Fold a newer scan of the same title into this entry.
    ///
    /// Scalar and descriptive fields take `newer`'s values. The disc map and
    /// launch paths accumulate: `newer`'s pairs are upserted, except default
    /// launch paths, which are only added for media ids not seen before.
    pub fn absorb(&mut self, mut newer: GameEntry) {
        let mut launch_paths = std::mem::take(&mut self.launch_paths);
        launch_paths.append(&mut newer.launch_paths);

        let mut disc_map = std::mem::take(&mut self.disc_map);
        disc_map.append(&mut newer.disc_map);

        let mut default_launch_paths = std::mem::take(&mut self.default_launch_paths);
        for (media_id, path) in std::mem::take(&mut newer.default_launch_paths) {
            default_launch_paths.entry(media_id).or_insert(path);
        }

        *self = newer;
        self.launch_paths = launch_paths;
        self.disc_map = disc_map;
        self.default_launch_paths = default_launch_paths;
    }

    /// Minimum requirements for a launchable entry.
    pub fn is_valid(&self) -> bool {
        !self.file_path.as_os_str().is_empty() && self.title_id != 0 && self.media_id != 0
    }

    /// Heuristic: the browser should try to fill in more metadata.
    pub fn is_missing_data(&self) -> bool {
        self.title.is_empty() || self.icon_data.is_empty() || self.disc_map.is_empty()
    }

    pub fn format(&self) -> GameFormat {
        self.format
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Final component of the file path, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.file_path.file_name().and_then(|n| n.to_str())
    }

    pub fn launch_paths(&self) -> &BTreeMap<PathBuf, u32> {
        &self.launch_paths
    }

    pub fn default_launch_paths(&self) -> &BTreeMap<u32, PathBuf> {
        &self.default_launch_paths
    }

    /// Path to launch for a given media id.
    pub fn launch_path_for(&self, media_id: u32) -> Option<&Path> {
        self.default_launch_paths.get(&media_id).map(PathBuf::as_path)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon_data(&self) -> &[u8] {
        &self.icon_data
    }

    pub fn title_id(&self) -> u32 {
        self.title_id
    }

    /// Title id as 8 uppercase hex digits, the way the browser shows it.
    pub fn title_id_hex(&self) -> String {
        format!("{:08X}", self.title_id)
    }

    pub fn media_id(&self) -> u32 {
        self.media_id
    }

    pub fn media_id_hex(&self) -> String {
        format!("{:08X}", self.media_id)
    }

    pub fn disc_map(&self) -> &BTreeMap<u8, u32> {
        &self.disc_map
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn base_version(&self) -> &str {
        &self.base_version
    }

    pub fn ratings(&self) -> &Ratings {
        &self.ratings
    }

    pub fn rating(&self, regulator: RatingRegulator) -> RatingValue {
        self.ratings.get(regulator)
    }

    pub fn regions(&self) -> RegionFlags {
        self.regions
    }

    /// Regions decoded from the raw flags.
    pub fn region_list(&self) -> Vec<Region> {
        self.regions.regions()
    }

    pub fn build_date(&self) -> &str {
        &self.build_date
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn release_date(&self) -> &str {
        &self.release_date
    }

    pub fn player_count(&self) -> u8 {
        self.player_count
    }
}

#[cfg(test)]
#[path = "tests/entry_tests.rs"]
mod tests;
