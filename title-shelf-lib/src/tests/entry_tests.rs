use super::*;
use title_shelf_core::{GameRatings, VersionInfo};

const HALO3: u32 = 0x4D53_07E6;

fn info(path: &str, title_id: u32, media_id: u32, disc: u8) -> GameInfo {
    GameInfo::new(GameFormat::Xex, path)
        .with_ids(title_id, media_id)
        .with_disc(disc, 1)
}

fn entry(path: &str, title_id: u32, media_id: u32, disc: u8) -> GameEntry {
    GameEntry::from_info(&info(path, title_id, media_id, disc)).unwrap()
}

#[test]
fn default_entry_is_unknown_and_invalid() {
    let e = GameEntry::default();
    assert_eq!(e.format(), GameFormat::Unknown);
    assert!(e.regions().is_region_free());
    assert!(!e.is_valid());
    assert!(e.is_missing_data());
}

#[test]
fn derives_ids_paths_and_disc() {
    let e = entry("/games/halo3/default.xex", HALO3, 0x1234, 1);

    assert_eq!(e.format(), GameFormat::Xex);
    assert_eq!(e.file_path(), Path::new("/games/halo3/default.xex"));
    assert_eq!(e.file_name(), Some("default.xex"));
    assert_eq!(e.title_id(), HALO3);
    assert_eq!(e.title_id_hex(), "4D5307E6");
    assert_eq!(e.media_id_hex(), "00001234");
    assert_eq!(e.disc_map(), &BTreeMap::from([(1, 0x1234)]));
    assert_eq!(
        e.launch_paths(),
        &BTreeMap::from([(PathBuf::from("/games/halo3/default.xex"), 0x1234)])
    );
    assert_eq!(
        e.launch_path_for(0x1234),
        Some(Path::new("/games/halo3/default.xex"))
    );
}

#[test]
fn validity_requires_path_and_both_ids() {
    assert!(entry("/a.xex", 1, 1, 1).is_valid());
    assert!(!entry("", 1, 1, 1).is_valid());
    assert!(!entry("/a.xex", 0, 1, 1).is_valid());
    assert!(!entry("/a.xex", 1, 0, 1).is_valid());
}

#[test]
fn primary_title_wins() {
    let e = GameEntry::from_info(
        &info("/a.xex", 1, 1, 1)
            .with_title("Halo 3")
            .with_dashboard_title("HALO 3 (Dashboard)"),
    )
    .unwrap();
    assert_eq!(e.title(), "Halo 3");
}

#[test]
fn dashboard_title_is_fallback() {
    let e = GameEntry::from_info(&info("/a.xex", 1, 1, 1).with_dashboard_title("Halo 3")).unwrap();
    assert_eq!(e.title(), "Halo 3");
}

#[test]
fn missing_titles_use_sentinel() {
    let e = entry("/a.xex", 1, 1, 1);
    assert_eq!(e.title(), UNKNOWN_TITLE);
    assert_eq!(e.title(), "<unknown>");
}

#[test]
fn icon_resolution_prefers_executable() {
    let both = GameEntry::from_info(
        &info("/a.xex", 1, 1, 1)
            .with_icon(vec![1, 2, 3])
            .with_dashboard_icon(vec![9, 9]),
    )
    .unwrap();
    assert_eq!(both.icon_data(), &[1, 2, 3]);

    let dash_only =
        GameEntry::from_info(&info("/a.xex", 1, 1, 1).with_dashboard_icon(vec![9, 9])).unwrap();
    assert_eq!(dash_only.icon_data(), &[9, 9]);

    assert!(entry("/a.xex", 1, 1, 1).icon_data().is_empty());
}

#[test]
fn missing_data_tracks_title_and_icon() {
    let complete = GameEntry::from_info(
        &info("/a.xex", 1, 1, 1)
            .with_title("Halo 3")
            .with_icon(vec![0x89, b'P', b'N', b'G']),
    )
    .unwrap();
    assert!(!complete.is_missing_data());

    // Sentinel title still counts as a title, the icon is what's missing
    assert!(entry("/a.xex", 1, 1, 1).is_missing_data());
}

#[test]
fn versions_are_dotted() {
    let e = GameEntry::from_info(
        &info("/a.xex", 1, 1, 1)
            .with_version(VersionInfo::new(1, 0, 2, 3))
            .with_base_version(VersionInfo::new(1, 0, 0, 0)),
    )
    .unwrap();
    assert_eq!(e.version(), "1.0.2.3");
    assert_eq!(e.base_version(), "1.0.0.0");
}

#[test]
fn ratings_and_regions_are_copied() {
    let mut raw = info("/a.xex", 1, 1, 1).with_region(RegionFlags::new(0x0000_00FF));
    raw.xex_info.game_ratings = GameRatings {
        esrb: 4,
        pegi: 13,
        cero: 2,
        fpb: 0xFF,
        ..GameRatings::default()
    };

    let e = GameEntry::from_info(&raw).unwrap();
    assert_eq!(e.rating(RatingRegulator::Esrb), 4);
    assert_eq!(e.rating(RatingRegulator::Pegi), 13);
    assert_eq!(e.rating(RatingRegulator::Cero), 2);
    assert_eq!(e.rating(RatingRegulator::Fpb), Ratings::UNRATED);
    assert_eq!(e.rating(RatingRegulator::Usk), 0);
    assert_eq!(e.regions().bits(), 0xFF);
    assert_eq!(e.region_list(), vec![Region::Usa]);
}

#[test]
fn descriptive_metadata_is_copied() {
    let mut raw = info("/a.xex", 1, 1, 1);
    raw.descriptive.genre = "Shooter".to_string();
    raw.descriptive.release_date = "2007-09-25".to_string();
    raw.descriptive.build_date = "2007-08-30".to_string();
    raw.descriptive.player_count = 4;

    let e = GameEntry::from_info(&raw).unwrap();
    assert_eq!(e.genre(), "Shooter");
    assert_eq!(e.release_date(), "2007-09-25");
    assert_eq!(e.build_date(), "2007-08-30");
    assert_eq!(e.player_count(), 4);
}

#[test]
fn absorb_takes_newer_scalars() {
    let mut existing =
        GameEntry::from_info(&info("/old.xex", HALO3, 5, 1).with_title("Old")).unwrap();
    let newer = GameEntry::from_info(&info("/new.xex", HALO3, 6, 1).with_title("New")).unwrap();

    existing.absorb(newer);
    assert_eq!(existing.title(), "New");
    assert_eq!(existing.media_id(), 6);
    assert_eq!(existing.file_path(), Path::new("/new.xex"));
}

#[test]
fn absorb_accumulates_discs() {
    let mut existing = entry("/d1.xex", HALO3, 10, 1);
    existing.absorb(entry("/d2.xex", HALO3, 20, 2));
    assert_eq!(existing.disc_map(), &BTreeMap::from([(1, 10), (2, 20)]));

    // Rescanning a disc overwrites that disc's media id
    existing.absorb(entry("/d1-rev.xex", HALO3, 11, 1));
    assert_eq!(existing.disc_map(), &BTreeMap::from([(1, 11), (2, 20)]));
}

#[test]
fn absorb_keeps_first_default_path() {
    let mut existing = entry("/a/default.xex", HALO3, 5, 1);
    existing.absorb(entry("/b/default.xex", HALO3, 5, 1));

    assert_eq!(existing.launch_path_for(5), Some(Path::new("/a/default.xex")));
    assert_eq!(existing.launch_paths().len(), 2);
}

#[test]
fn absorb_upserts_launch_paths() {
    let mut existing = entry("/a/default.xex", HALO3, 5, 1);
    existing.absorb(entry("/a/default.xex", HALO3, 7, 1));

    assert_eq!(
        existing.launch_paths(),
        &BTreeMap::from([(PathBuf::from("/a/default.xex"), 7)])
    );
    assert_eq!(existing.launch_path_for(5), Some(Path::new("/a/default.xex")));
    assert_eq!(existing.launch_path_for(7), Some(Path::new("/a/default.xex")));
}
