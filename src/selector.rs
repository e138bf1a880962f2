//! Index tracking over a directory of wallpapers.
//!
//! The [`Selector`] owns the candidate list, the current position in it and,
//! when given a [`SettingsStore`], keeps that position on disk so the next run
//! starts where this one left off.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use strum_macros::{Display, EnumString};
use tracing::debug;

use crate::apply::Painter;
use crate::error::SelectorError;
use crate::settings::{Settings, SettingsStore};
use crate::wallpapers::load_wallpapers;

/// How `load_step` folds an index that runs off either end of the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StepWrap {
    /// `((index + step) mod len + len) mod len`: stepping back from 0 lands on
    /// the last wallpaper.
    #[default]
    Circular,
    /// `|(index + step) rem len|` with a truncating remainder, kept for setups
    /// that depend on the old ordering.
    Legacy,
}

impl StepWrap {
    /// `len` must be non-zero.
    pub fn next_index(self, index: usize, step: i64, len: usize) -> usize {
        let target = index as i128 + step as i128;
        let len = len as i128;
        let next = match self {
            StepWrap::Circular => target.rem_euclid(len),
            StepWrap::Legacy => (target % len).abs(),
        };
        next as usize
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SelectorOptions {
    pub recursive: bool,
    pub wrap: StepWrap,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        SelectorOptions {
            recursive: true,
            wrap: StepWrap::Circular,
        }
    }
}

struct Persistence {
    store: SettingsStore,
    settings: Settings,
}

pub struct Selector<P: Painter> {
    source: PathBuf,
    options: SelectorOptions,
    wallpapers: Vec<PathBuf>,
    index: usize,
    path: PathBuf,
    /// Saved index that did not fit the list scanned at construction.
    stale_index: Option<i64>,
    persistence: Option<Persistence>,
    painter: P,
}

impl<P: Painter> Selector<P> {
    /// Scans `source` and, if `store` is given, restores the saved index from
    /// it (creating the store from its template first when missing).
    ///
    /// A saved index that does not fit the freshly scanned list is kept in
    /// [`Selector::stale_index`] for the caller to report, and the selector
    /// starts at 0 instead.
    pub fn new(
        source: impl Into<PathBuf>,
        options: SelectorOptions,
        store: Option<SettingsStore>,
        painter: P,
    ) -> Result<Self, SelectorError> {
        let source = source.into();

        let persistence = match store {
            Some(store) => {
                store.ensure_exists()?;
                let settings = store.read()?;
                Some(Persistence { store, settings })
            }
            None => None,
        };

        let wallpapers = load_wallpapers(&source, options.recursive)?;
        if wallpapers.is_empty() {
            return Err(SelectorError::EmptySource(source));
        }

        let mut index = 0;
        let mut stale_index = None;
        if let Some(persistence) = &persistence {
            let stored = persistence.settings.wallpaper.index;
            match usize::try_from(stored).ok().filter(|i| *i < wallpapers.len()) {
                Some(i) => index = i,
                None => {
                    stale_index = Some(stored);
                    debug!(
                        index = stored,
                        len = wallpapers.len(),
                        settings = %persistence.store.path().display(),
                        "saved index out of bounds, starting at 0"
                    );
                }
            }
        }

        let path = wallpapers[index].clone();

        Ok(Selector {
            source,
            options,
            wallpapers,
            index,
            path,
            stale_index,
            persistence,
            painter,
        })
    }

    /// Re-scans the source directory. The index is left alone even if the
    /// list shrank past it; `load` reports that case.
    pub fn reload(&mut self) -> Result<(), SelectorError> {
        self.wallpapers = load_wallpapers(&self.source, self.options.recursive)?;
        Ok(())
    }

    /// Applies the wallpaper at the current index.
    pub fn load(&mut self) -> Result<(), SelectorError> {
        let Some(path) = self.wallpapers.get(self.index) else {
            return Err(SelectorError::MalformedIndex {
                index: self.index,
                len: self.wallpapers.len(),
            });
        };

        self.path = path.clone();
        self.painter.paint(&self.path);
        Ok(())
    }

    pub fn load_index(&mut self, index: i64) -> Result<(), SelectorError> {
        let len = self.wallpapers.len();
        let Some(index) = usize::try_from(index).ok().filter(|i| *i < len) else {
            return Err(SelectorError::OutOfBounds { index, len });
        };

        self.index = index;
        self.persist()?;
        self.load()
    }

    /// Loads the first wallpaper whose file name is exactly `name`.
    pub fn load_name(&mut self, name: &str) -> Result<(), SelectorError> {
        let position = self
            .wallpapers
            .iter()
            .position(|p| p.file_name() == Some(OsStr::new(name)));

        match position {
            Some(i) => self.load_index(i as i64),
            None => Err(SelectorError::NotFound(name.to_string())),
        }
    }

    pub fn load_step(&mut self, step: i64) -> Result<(), SelectorError> {
        if self.wallpapers.is_empty() {
            return Err(SelectorError::EmptySource(self.source.clone()));
        }

        let next = self
            .options
            .wrap
            .next_index(self.index, step, self.wallpapers.len());
        debug!(from = self.index, step, to = next, wrap = %self.options.wrap, "stepping");
        self.load_index(next as i64)
    }

    pub fn load_inc(&mut self) -> Result<(), SelectorError> {
        self.load_step(1)
    }

    pub fn load_dec(&mut self) -> Result<(), SelectorError> {
        self.load_step(-1)
    }

    /// Index, path and source directory, in that order.
    pub fn get_state(&self) -> [String; 3] {
        [
            format!("Index: {}", self.index),
            format!("Path: {}", self.path.display()),
            format!("Source: {}", self.source.display()),
        ]
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    pub fn get_index(&self) -> usize {
        self.index
    }

    pub fn stale_index(&self) -> Option<i64> {
        self.stale_index
    }

    fn persist(&mut self) -> Result<(), SelectorError> {
        if let Some(persistence) = &mut self.persistence {
            persistence.settings.wallpaper.index = self.index as i64;
            persistence.store.write(&persistence.settings)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        painted: RefCell<Vec<PathBuf>>,
    }

    impl Painter for Recorder {
        fn paint(&self, path: &Path) {
            self.painted.borrow_mut().push(path.to_path_buf());
        }
    }

    fn wallpaper_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    fn flat(wrap: StepWrap) -> SelectorOptions {
        SelectorOptions {
            recursive: false,
            wrap,
        }
    }

    #[test]
    fn load_index_selects_every_valid_position() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
        let recorder = Recorder::default();
        let mut selector =
            Selector::new(dir.path(), SelectorOptions::default(), None, &recorder).unwrap();

        for i in 0..4 {
            selector.load_index(i).unwrap();
            assert_eq!(selector.get_index(), i as usize);
            assert_eq!(selector.get_path(), selector.wallpapers[i as usize]);
        }
        assert_eq!(recorder.painted.borrow().len(), 4);
    }

    #[test]
    fn load_index_rejects_out_of_bounds() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg", "c.jpg"]);
        let recorder = Recorder::default();
        let mut selector =
            Selector::new(dir.path(), SelectorOptions::default(), None, &recorder).unwrap();
        selector.load_index(1).unwrap();

        for bad in [3, 4, 100, -1, i64::MIN] {
            let err = selector.load_index(bad).unwrap_err();
            assert!(matches!(err, SelectorError::OutOfBounds { index, len: 3 } if index == bad));
            assert_eq!(selector.get_index(), 1);
        }
        assert_eq!(recorder.painted.borrow().len(), 1);
    }

    #[test]
    fn inc_wraps_to_start() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), None, Recorder::default())
                .unwrap();

        selector.load_inc().unwrap();
        assert_eq!(selector.get_index(), 1);
        selector.load_inc().unwrap();
        assert_eq!(selector.get_index(), 2);
        selector.load_inc().unwrap();
        assert_eq!(selector.get_index(), 0);
        assert!(selector.get_path().ends_with("a.jpg"));
    }

    #[test]
    fn circular_dec_from_zero_lands_on_last() {
        let dir = wallpaper_dir(&["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"]);
        let mut selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), None, Recorder::default())
                .unwrap();

        selector.load_step(-1).unwrap();
        assert_eq!(selector.get_index(), 4);
    }

    #[test]
    fn legacy_dec_from_zero_takes_absolute_remainder() {
        let dir = wallpaper_dir(&["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"]);
        let mut selector =
            Selector::new(dir.path(), flat(StepWrap::Legacy), None, Recorder::default()).unwrap();

        selector.load_step(-1).unwrap();
        assert_eq!(selector.get_index(), 1);
    }

    #[test]
    fn step_and_back_returns_to_start() {
        let dir = wallpaper_dir(&["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"]);
        let mut selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), None, Recorder::default())
                .unwrap();
        selector.load_index(2).unwrap();

        for n in [1, 2, 3, 7, -4, -11] {
            selector.load_step(n).unwrap();
            selector.load_step(-n).unwrap();
            assert_eq!(selector.get_index(), 2, "step {n}");
        }
    }

    #[test]
    fn next_index_rules() {
        assert_eq!(StepWrap::Circular.next_index(0, -1, 5), 4);
        assert_eq!(StepWrap::Circular.next_index(4, 1, 5), 0);
        assert_eq!(StepWrap::Circular.next_index(1, -7, 5), 4);
        assert_eq!(StepWrap::Legacy.next_index(0, -1, 5), 1);
        assert_eq!(StepWrap::Legacy.next_index(1, -7, 5), 1);
        assert_eq!(StepWrap::Legacy.next_index(4, 1, 5), 0);
        assert_eq!(StepWrap::Circular.next_index(0, i64::MIN, 3), 1);
    }

    #[test]
    fn load_name_moves_to_match() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), None, Recorder::default())
                .unwrap();

        selector.load_name("c.jpg").unwrap();
        assert_eq!(selector.get_index(), 2);
        assert!(selector.get_path().ends_with("c.jpg"));
    }

    #[test]
    fn load_name_absent_is_not_found() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg"]);
        let recorder = Recorder::default();
        let mut selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), None, &recorder).unwrap();
        selector.load_index(1).unwrap();

        let err = selector.load_name("zzz.jpg").unwrap_err();
        assert!(matches!(err, SelectorError::NotFound(name) if name == "zzz.jpg"));
        assert_eq!(selector.get_index(), 1);
        assert_eq!(recorder.painted.borrow().len(), 1);
    }

    #[test]
    fn get_state_reports_index_path_source() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg"]);
        let mut selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), None, Recorder::default())
                .unwrap();
        selector.load_index(1).unwrap();

        let [index, path, source] = selector.get_state();
        assert_eq!(index, "Index: 1");
        assert_eq!(path, format!("Path: {}", dir.path().join("b.jpg").display()));
        assert_eq!(source, format!("Source: {}", dir.path().display()));
    }

    #[test]
    fn empty_source_fails_construction() {
        let dir = wallpaper_dir(&[]);
        let result = Selector::new(dir.path(), SelectorOptions::default(), None, Recorder::default());
        assert!(matches!(result, Err(SelectorError::EmptySource(_))));
    }

    #[test]
    fn stored_index_is_restored() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg", "c.jpg"]);
        let config = TempDir::new().unwrap();
        let store = SettingsStore::new(config.path().join("settings.toml"));
        store.ensure_exists().unwrap();
        let mut settings = store.read().unwrap();
        settings.wallpaper.index = 2;
        store.write(&settings).unwrap();

        let selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), Some(store), Recorder::default())
                .unwrap();
        assert_eq!(selector.get_index(), 2);
        assert_eq!(selector.stale_index(), None);
        assert!(selector.get_path().ends_with("c.jpg"));
    }

    #[test]
    fn stale_stored_index_falls_back_to_zero() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg", "c.jpg"]);
        let config = TempDir::new().unwrap();
        let store = SettingsStore::new(config.path().join("settings.toml"));
        fs::write(
            store.path(),
            "[wallpaper]\nindex = 7\nwallpapers = \"~/pictures/\"\n",
        )
        .unwrap();

        let selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), Some(store), Recorder::default())
                .unwrap();
        assert_eq!(selector.get_index(), 0);
        assert_eq!(selector.stale_index(), Some(7));
        assert!(selector.get_path().ends_with("a.jpg"));
    }

    #[test]
    fn negative_stored_index_is_reported_stale() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg"]);
        let config = TempDir::new().unwrap();
        let store = SettingsStore::new(config.path().join("settings.toml"));
        fs::write(
            store.path(),
            "[wallpaper]\nindex = -1\nwallpapers = \"~/pictures/\"\n",
        )
        .unwrap();

        let selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), Some(store), Recorder::default())
                .unwrap();
        assert_eq!(selector.get_index(), 0);
        assert_eq!(selector.stale_index(), Some(-1));
    }

    #[test]
    fn construction_bootstraps_missing_store() {
        let dir = wallpaper_dir(&["a.jpg"]);
        let config = TempDir::new().unwrap();
        let path = config.path().join("settings.toml");

        Selector::new(
            dir.path(),
            flat(StepWrap::Circular),
            Some(SettingsStore::new(&path)),
            Recorder::default(),
        )
        .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn reload_keeps_recursive_flag() {
        let dir = wallpaper_dir(&["a.jpg"]);
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.jpg"), b"").unwrap();

        let mut selector =
            Selector::new(dir.path(), SelectorOptions::default(), None, Recorder::default())
                .unwrap();
        assert_eq!(selector.wallpapers.len(), 2);

        fs::write(dir.path().join("sub/c.jpg"), b"").unwrap();
        selector.reload().unwrap();
        assert_eq!(selector.wallpapers.len(), 3);
    }

    #[test]
    fn load_after_shrinking_reload_reports_malformed() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg", "c.jpg"]);
        let recorder = Recorder::default();
        let mut selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), None, &recorder).unwrap();
        selector.load_index(2).unwrap();

        fs::remove_file(dir.path().join("c.jpg")).unwrap();
        selector.reload().unwrap();
        assert_eq!(selector.get_index(), 2);

        let err = selector.load().unwrap_err();
        assert!(matches!(err, SelectorError::MalformedIndex { index: 2, len: 2 }));
        assert_eq!(recorder.painted.borrow().len(), 1);
        assert!(selector.get_path().ends_with("c.jpg"));
    }

    #[test]
    fn load_paints_current_path() {
        let dir = wallpaper_dir(&["a.jpg", "b.jpg"]);
        let recorder = Recorder::default();
        let mut selector =
            Selector::new(dir.path(), flat(StepWrap::Circular), None, &recorder).unwrap();

        selector.load().unwrap();
        assert_eq!(*recorder.painted.borrow(), vec![dir.path().join("a.jpg")]);
    }
}
