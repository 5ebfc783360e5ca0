use super::*;
use std::collections::BTreeMap;
use std::io;

use title_shelf_core::{GameFormat, GameInfo, ScanError};

const TITLE: u32 = 0x4D53_081A;

/// In-memory scanner: candidates are the table keys under a root.
#[derive(Default)]
struct FakeScanner {
    packages: BTreeMap<PathBuf, GameInfo>,
    broken: Vec<PathBuf>,
}

impl FakeScanner {
    fn with(mut self, info: GameInfo) -> Self {
        self.packages.insert(info.path.clone(), info);
        self
    }

    fn with_broken(mut self, path: &str) -> Self {
        self.broken.push(PathBuf::from(path));
        self
    }
}

impl Scanner for FakeScanner {
    fn find_games_in_path(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = self
            .packages
            .keys()
            .chain(self.broken.iter())
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn scan_game(&self, path: &Path) -> Result<GameInfo, ScanError> {
        self.packages
            .get(path)
            .cloned()
            .ok_or_else(|| ScanError::invalid_format("bad magic"))
    }
}

fn disc(path: &str, title_id: u32, media_id: u32, disc_number: u8) -> GameInfo {
    GameInfo::new(GameFormat::Xex, path)
        .with_ids(title_id, media_id)
        .with_disc(disc_number, 2)
}

fn entry(path: &str, title_id: u32, media_id: u32, disc_number: u8) -> GameEntry {
    GameEntry::from_info(&disc(path, title_id, media_id, disc_number)).unwrap()
}

fn empty_library() -> GameLibrary {
    GameLibrary::new(FakeScanner::default())
}

#[test]
fn equal_title_ids_merge_into_one_entry() {
    let library = empty_library();
    library.add_game(
        GameEntry::from_info(&disc("/a.xex", TITLE, 1, 1).with_title("First")).unwrap(),
    );
    library.add_game(
        GameEntry::from_info(&disc("/b.xex", TITLE, 2, 1).with_title("Second")).unwrap(),
    );

    assert_eq!(library.size(), 1);
    let merged = library.find_game(TITLE).unwrap();
    assert_eq!(merged.title(), "Second");
    assert_eq!(merged.media_id(), 2);
    assert_eq!(merged.file_path(), Path::new("/b.xex"));
}

#[test]
fn zero_title_ids_never_merge() {
    let library = empty_library();
    for _ in 0..3 {
        library.add_game(entry("/same.xex", 0, 1, 1));
    }
    assert_eq!(library.size(), 3);
}

#[test]
fn default_launch_path_is_first_seen() {
    let library = empty_library();
    library.add_game(entry("/A/default.xex", TITLE, 5, 1));
    library.add_game(entry("/B/default.xex", TITLE, 5, 1));

    let game = library.find_game(TITLE).unwrap();
    assert_eq!(game.default_launch_paths()[&5], PathBuf::from("/A/default.xex"));
}

#[test]
fn discs_accumulate_across_merges() {
    let library = empty_library();
    library.add_game(entry("/d1.xex", TITLE, 10, 1));
    library.add_game(entry("/d2.xex", TITLE, 20, 2));

    let game = library.find_game(TITLE).unwrap();
    assert_eq!(game.disc_map(), &BTreeMap::from([(1, 10), (2, 20)]));
}

#[test]
fn scan_merges_multi_disc_title() {
    let scanner = FakeScanner::default()
        .with(disc("/games/title/disc1/default.xex", TITLE, 1, 1))
        .with(disc("/games/title/disc2/default.xex", TITLE, 2, 2));
    let library = GameLibrary::new(scanner);

    assert_eq!(library.scan_path(Path::new("/games")), 2);
    assert_eq!(library.size(), 1);

    let game = library.find_game(TITLE).unwrap();
    assert_eq!(game.disc_map(), &BTreeMap::from([(1, 1), (2, 2)]));
    assert_eq!(game.launch_paths().len(), 2);
}

#[test]
fn scan_skips_unparsable_candidates() {
    let scanner = FakeScanner::default()
        .with(disc("/games/a.xex", 1, 1, 1))
        .with_broken("/games/broken.xex")
        .with(disc("/games/c.xex", 3, 3, 1));
    let library = GameLibrary::new(scanner);

    let summary = library.scan_path_detailed(Path::new("/games"));
    assert_eq!(summary.total, 3);
    assert_eq!(summary.merged, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].path, PathBuf::from("/games/broken.xex"));
    assert_eq!(library.size(), 2);
}

#[test]
fn scan_preserves_scanner_order() {
    let scanner = FakeScanner::default()
        .with(disc("/games/b.xex", 2, 2, 1))
        .with(disc("/games/a.xex", 1, 1, 1))
        .with(disc("/games/c.xex", 3, 3, 1));
    let library = GameLibrary::new(scanner);
    library.scan_path(Path::new("/games"));

    let ids: Vec<u32> = library.games().iter().map(GameEntry::title_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn scan_registers_root_once() {
    let library = empty_library();
    let root = Path::new("/games");

    assert!(library.is_path_unregistered(root));
    assert!(!library.contains_path(root));

    library.scan_path(root);
    library.scan_path(root);

    assert!(library.contains_path(root));
    assert!(!library.is_path_unregistered(root));
    assert_eq!(library.roots(), vec![PathBuf::from("/games")]);
}

#[test]
fn remove_path_keeps_entries() {
    let scanner = FakeScanner::default().with(disc("/games/a.xex", 1, 1, 1));
    let library = GameLibrary::new(scanner);
    library.scan_path(Path::new("/games"));

    assert!(library.remove_path(Path::new("/games")));
    assert!(!library.remove_path(Path::new("/games")));
    assert!(library.roots().is_empty());
    assert_eq!(library.size(), 1);
}

#[test]
fn rescan_drops_entries_of_removed_roots() {
    let scanner = FakeScanner::default()
        .with(disc("/one/a.xex", 1, 1, 1))
        .with(disc("/two/b.xex", 2, 2, 1));
    let library = GameLibrary::new(scanner);
    library.scan_path(Path::new("/one"));
    library.scan_path(Path::new("/two"));
    assert_eq!(library.size(), 2);

    library.remove_path(Path::new("/one"));
    assert_eq!(library.rescan(), 1);
    assert!(!library.contains_game(1));
    assert!(library.contains_game(2));
}

#[test]
fn clear_keeps_roots() {
    let scanner = FakeScanner::default().with(disc("/games/a.xex", 1, 1, 1));
    let library = GameLibrary::new(scanner);
    library.scan_path(Path::new("/games"));

    library.clear();
    assert!(library.is_empty());
    assert!(library.contains_path(Path::new("/games")));
}

#[test]
fn lookups_on_empty_library() {
    let library = empty_library();
    assert!(!library.contains_game(TITLE));
    assert!(library.find_game(TITLE).is_none());
    assert_eq!(library.with_games(|games| games.len()), 0);
}

#[test]
fn clones_share_one_catalog() {
    let library = empty_library();
    let other = library.clone();
    other.add_game(entry("/a.xex", TITLE, 1, 1));
    assert!(library.contains_game(TITLE));
}

#[test]
fn settings_restore_roots() {
    let settings = LibrarySettings {
        roots: vec![PathBuf::from("/one"), PathBuf::from("/two"), PathBuf::from("/one")],
        scan_workers: 2,
        parse_timeout_secs: 10,
    };
    let library = GameLibrary::from_settings(FakeScanner::default(), &settings);

    assert_eq!(library.roots(), vec![PathBuf::from("/one"), PathBuf::from("/two")]);
    assert_eq!(library.options().scan_workers, 2);
    assert_eq!(library.options().parse_timeout, Duration::from_secs(10));
    assert!(library.is_empty());

    library.remove_path(Path::new("/two"));
    let saved = settings.with_roots_of(&library);
    assert_eq!(saved.roots, vec![PathBuf::from("/one")]);
    assert_eq!(saved.scan_workers, 2);
}
