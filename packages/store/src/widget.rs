//! # Global notepad — floating scratch pad persisted in local storage
//!
//! [`GlobalNotepad`] is the state behind the draggable sticky-note widget. It is
//! unrelated to the [`crate::NoteStore`]: it holds a single text blob, loaded
//! once at startup from a [`KeyValueStorage`] and written back under a single
//! key. Last write wins; one tab is assumed to be the only writer.
//!
//! ## Saving
//!
//! The blob is saved on [`blur`](GlobalNotepad::blur), on
//! [`close`](GlobalNotepad::close), and on every
//! [`autosave_tick`](GlobalNotepad::autosave_tick), which the UI drives from a
//! recurring timer ([`AUTOSAVE_INTERVAL`] by default).
//!
//! ## Dragging
//!
//! A drag starts on pointer-down over the title-bar handle and ends on
//! pointer-up wherever the pointer is. While active, each pointer-move places
//! the widget at the pointer minus the grab offset, clamped so the whole
//! widget stays inside the viewport:
//!
//! ```text
//! 0 <= x <= viewport.width  - WIDGET_WIDTH
//! 0 <= y <= viewport.height - WIDGET_HEIGHT
//! ```
//!
//! When the viewport is smaller than the widget the upper bound is floored at
//! zero and the widget pins to the top-left corner.

use std::time::Duration;

use crate::error::StorageError;
use crate::storage::KeyValueStorage;

pub const WIDGET_WIDTH: f64 = 380.0;
pub const WIDGET_HEIGHT: f64 = 400.0;
pub const DEFAULT_TOP: f64 = 100.0;
pub const STORAGE_KEY: &str = "global_note";
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Logical size of a native window measured in physical pixels.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(f64::from(width) / scale, f64::from(height) / scale)
    }

    /// Clamp a widget origin so the widget fits inside the viewport.
    pub fn clamp(&self, p: Point) -> Point {
        let max_x = (self.width - WIDGET_WIDTH).max(0.0);
        let max_y = (self.height - WIDGET_HEIGHT).max(0.0);
        Point {
            x: p.x.clamp(0.0, max_x),
            y: p.y.clamp(0.0, max_y),
        }
    }
}

/// State of the floating notepad widget.
#[derive(Debug)]
pub struct GlobalNotepad<S> {
    storage: S,
    key: String,
    content: String,
    open: bool,
    position: Point,
    /// Pointer offset from the widget origin while a drag is active.
    grab: Option<Point>,
}

impl<S: KeyValueStorage> GlobalNotepad<S> {
    /// Create the widget and load the saved blob.
    pub fn load(storage: S, viewport: Viewport) -> Self {
        Self::load_with_key(storage, STORAGE_KEY, viewport)
    }

    pub fn load_with_key(storage: S, key: &str, viewport: Viewport) -> Self {
        let content = storage.get(key).unwrap_or_default();
        Self {
            storage,
            key: key.to_string(),
            content,
            open: false,
            position: viewport.clamp(Point::new(viewport.width - WIDGET_WIDTH, DEFAULT_TOP)),
            grab: None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Write the blob to storage.
    pub fn save(&self) -> Result<(), StorageError> {
        tracing::debug!(key = %self.key, len = self.content.len(), "saving global note");
        self.storage.set(&self.key, &self.content)
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Save, then hide the widget. It is hidden even if the save fails.
    pub fn close(&mut self) -> Result<(), StorageError> {
        let saved = self.save();
        self.open = false;
        self.grab = None;
        saved
    }

    /// The text area lost focus.
    pub fn blur(&self) -> Result<(), StorageError> {
        self.save()
    }

    /// Timer-driven save.
    pub fn autosave_tick(&self) -> Result<(), StorageError> {
        self.save()
    }

    /// Start a drag if the pointer went down over the handle.
    pub fn pointer_down(&mut self, pointer: Point, on_handle: bool) {
        if on_handle {
            self.grab = Some(Point::new(
                pointer.x - self.position.x,
                pointer.y - self.position.y,
            ));
        }
    }

    /// Follow the pointer while dragging.
    pub fn pointer_move(&mut self, pointer: Point, viewport: Viewport) {
        if let Some(grab) = self.grab {
            self.position = viewport.clamp(Point::new(pointer.x - grab.x, pointer.y - grab.y));
        }
    }

    /// End any drag in progress.
    pub fn pointer_up(&mut self) {
        self.grab = None;
    }

    /// Keep the widget on screen after the window changes size.
    pub fn viewport_resized(&mut self, viewport: Viewport) {
        self.position = viewport.clamp(self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    const SCREEN: Viewport = Viewport {
        width: 1280.0,
        height: 800.0,
    };

    fn within(p: Point, v: Viewport) -> bool {
        p.x >= 0.0 && p.x <= v.width - WIDGET_WIDTH && p.y >= 0.0 && p.y <= v.height - WIDGET_HEIGHT
    }

    #[test]
    fn test_physical_window_size_clamps_in_logical_pixels() {
        let small = Viewport::from_physical(1600, 1000, 2.0);
        assert_eq!(small, Viewport::new(800.0, 500.0));
        let p = small.clamp(Point::new(10_000.0, 10_000.0));
        assert_eq!(p, Point::new(420.0, 100.0));
        assert!(within(p, small));

        assert_eq!(Viewport::from_physical(1024, 768, 0.0), Viewport::new(1024.0, 768.0));
    }

    #[test]
    fn test_loads_saved_blob_once() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, "remember milk").unwrap();

        let widget = GlobalNotepad::load(storage.clone(), SCREEN);
        storage.set(STORAGE_KEY, "changed elsewhere").unwrap();

        assert_eq!(widget.content(), "remember milk");
        assert!(!widget.is_open());
        assert_eq!(widget.position(), Point::new(900.0, 100.0));
    }

    #[test]
    fn test_missing_blob_starts_empty() {
        let widget = GlobalNotepad::load(MemoryStorage::new(), SCREEN);
        assert_eq!(widget.content(), "");
    }

    #[test]
    fn test_blur_close_and_tick_save() {
        let storage = MemoryStorage::new();
        let mut widget = GlobalNotepad::load(storage.clone(), SCREEN);
        widget.open();

        widget.set_content("one");
        widget.blur().unwrap();
        assert_eq!(storage.get(STORAGE_KEY).as_deref(), Some("one"));

        widget.set_content("two");
        widget.autosave_tick().unwrap();
        assert_eq!(storage.get(STORAGE_KEY).as_deref(), Some("two"));

        widget.set_content("three");
        widget.close().unwrap();
        assert!(!widget.is_open());
        assert_eq!(storage.get(STORAGE_KEY).as_deref(), Some("three"));
    }

    #[test]
    fn test_drag_only_from_handle() {
        let mut widget = GlobalNotepad::load(MemoryStorage::new(), SCREEN);
        let start = widget.position();

        widget.pointer_down(Point::new(start.x + 10.0, start.y + 10.0), false);
        widget.pointer_move(Point::new(50.0, 50.0), SCREEN);
        assert!(!widget.is_dragging());
        assert_eq!(widget.position(), start);

        widget.pointer_down(Point::new(start.x + 10.0, start.y + 10.0), true);
        widget.pointer_move(Point::new(510.0, 210.0), SCREEN);
        assert_eq!(widget.position(), Point::new(500.0, 200.0));

        widget.pointer_up();
        widget.pointer_move(Point::new(10.0, 10.0), SCREEN);
        assert_eq!(widget.position(), Point::new(500.0, 200.0));
    }

    #[test]
    fn test_drag_is_clamped_to_viewport() {
        let mut widget = GlobalNotepad::load(MemoryStorage::new(), SCREEN);
        let start = widget.position();
        widget.pointer_down(start, true);

        let moves = [
            Point::new(-500.0, -500.0),
            Point::new(5000.0, 5000.0),
            Point::new(-1.0, 799.0),
            Point::new(1279.0, 0.0),
            Point::new(640.0, 400.0),
            Point::new(f64::MAX, f64::MIN),
        ];
        for pointer in moves {
            widget.pointer_move(pointer, SCREEN);
            assert!(within(widget.position(), SCREEN), "{:?}", widget.position());
        }
        widget.pointer_up();

        widget.pointer_down(widget.position(), true);
        widget.pointer_move(Point::new(5000.0, 5000.0), SCREEN);
        assert_eq!(widget.position(), Point::new(900.0, 400.0));
    }

    #[test]
    fn test_small_viewport_pins_to_origin() {
        let tiny = Viewport::new(300.0, 200.0);
        let mut widget = GlobalNotepad::load(MemoryStorage::new(), tiny);
        assert_eq!(widget.position(), Point::new(0.0, 0.0));
        widget.pointer_down(Point::new(5.0, 5.0), true);
        widget.pointer_move(Point::new(100.0, 100.0), tiny);
        assert_eq!(widget.position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_resize_reclamps() {
        let mut widget = GlobalNotepad::load(MemoryStorage::new(), SCREEN);
        widget.viewport_resized(Viewport::new(800.0, 600.0));
        assert_eq!(widget.position(), Point::new(420.0, 100.0));
    }
}
