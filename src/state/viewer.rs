/// Full-screen image viewer state machine
///
/// Two states: Closed and Open. While open the viewer owns a snapshot of
/// the gallery it was opened over, an index into it, and zoom/pan state.
/// Keyboard input is only consumed while open; the orchestrator gates its
/// key subscription on `is_open`, which also doubles as the background
/// scroll-suppression flag.

use std::path::PathBuf;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;
const ZOOM_STEP: f32 = 1.2;

/// One image in a card's gallery, added via picker or drag-drop.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImage {
    pub path: PathBuf,
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// Intrinsic dimensions, captured at ingest time.
    pub width: u32,
    pub height: u32,
}

/// Commands the viewer understands, from keyboard, wheel or buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    Close,
    Prev,
    Next,
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

/// Wheel input: scroll up (negative delta) zooms in, down zooms out.
pub fn wheel_command(delta_y: f32) -> ViewerCommand {
    if delta_y < 0.0 {
        ViewerCommand::ZoomIn
    } else {
        ViewerCommand::ZoomOut
    }
}

#[derive(Debug, Default)]
pub enum Viewer {
    #[default]
    Closed,
    Open(ViewerState),
}

#[derive(Debug)]
pub struct ViewerState {
    images: Vec<GalleryImage>,
    index: usize,
    zoom: f32,
    pan_x: f32,
    pan_y: f32,
    /// Anchor of an in-progress drag, absolute pointer coordinates.
    anchor: Option<(f32, f32)>,
}

impl Viewer {
    /// Closed → Open. A start index past the end is clamped so the index
    /// invariant holds from the first frame. Opening over an empty gallery
    /// is a no-op: the viewer never opens without something to show.
    pub fn open(&mut self, images: Vec<GalleryImage>, start_index: usize) {
        if images.is_empty() {
            return;
        }
        let index = start_index.min(images.len() - 1);
        *self = Viewer::Open(ViewerState {
            images,
            index,
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            anchor: None,
        });
    }

    /// Open → Closed. Zoom/pan state is destroyed with the viewer.
    pub fn close(&mut self) {
        *self = Viewer::Closed;
    }

    /// Also the scroll-suppression and keyboard-subscription flag.
    pub fn is_open(&self) -> bool {
        matches!(self, Viewer::Open(_))
    }

    pub fn state(&self) -> Option<&ViewerState> {
        match self {
            Viewer::Open(state) => Some(state),
            Viewer::Closed => None,
        }
    }

    pub fn apply(&mut self, command: ViewerCommand) {
        if let ViewerCommand::Close = command {
            self.close();
            return;
        }
        if let Viewer::Open(state) = self {
            state.apply(command);
        }
    }

    pub fn start_pan(&mut self, x: f32, y: f32) {
        if let Viewer::Open(state) = self {
            state.anchor = Some((x, y));
        }
    }

    /// Accumulate pan from a drag. Pan speed is divided by zoom so panning
    /// feels consistent at any magnification.
    pub fn pan_moved(&mut self, x: f32, y: f32) {
        if let Viewer::Open(state) = self {
            if let Some((ax, ay)) = state.anchor {
                state.pan_x += (x - ax) / state.zoom;
                state.pan_y += (y - ay) / state.zoom;
                state.anchor = Some((x, y));
            }
        }
    }

    pub fn end_pan(&mut self) {
        if let Viewer::Open(state) = self {
            state.anchor = None;
        }
    }
}

impl ViewerState {
    pub fn current(&self) -> &GalleryImage {
        &self.images[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> (f32, f32) {
        (self.pan_x, self.pan_y)
    }

    pub fn is_panning(&self) -> bool {
        self.anchor.is_some()
    }

    fn apply(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::Next => self.step(1),
            ViewerCommand::Prev => self.step(-1),
            ViewerCommand::ZoomIn => {
                self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
            }
            ViewerCommand::ZoomOut => {
                self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
            }
            ViewerCommand::ResetZoom => self.reset_zoom(),
            // Close is a state transition, handled one level up.
            ViewerCommand::Close => {}
        }
    }

    /// Advance the index, wrapping in both directions. Navigation resets
    /// zoom/pan; a single-image gallery has nowhere to go.
    fn step(&mut self, direction: isize) {
        let len = self.images.len();
        if len <= 1 {
            return;
        }
        self.index = (self.index as isize + direction).rem_euclid(len as isize) as usize;
        self.reset_zoom();
    }

    fn reset_zoom(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<GalleryImage> {
        (0..n)
            .map(|i| GalleryImage {
                path: PathBuf::from(format!("/gallery/{i}.jpg")),
                name: format!("{i}.jpg"),
                size: 1024,
                width: 800,
                height: 600,
            })
            .collect()
    }

    fn open_viewer(n: usize, start: usize) -> Viewer {
        let mut viewer = Viewer::default();
        viewer.open(images(n), start);
        viewer
    }

    #[test]
    fn opening_over_an_empty_gallery_is_a_no_op() {
        let mut viewer = Viewer::default();
        viewer.open(Vec::new(), 0);
        assert!(!viewer.is_open());
    }

    #[test]
    fn navigation_wraps_both_directions() {
        let mut viewer = open_viewer(3, 2);
        viewer.apply(ViewerCommand::Next);
        assert_eq!(viewer.state().unwrap().index(), 0);

        viewer.apply(ViewerCommand::Prev);
        assert_eq!(viewer.state().unwrap().index(), 2);
        viewer.apply(ViewerCommand::Prev);
        viewer.apply(ViewerCommand::Prev);
        assert_eq!(viewer.state().unwrap().index(), 0);
    }

    #[test]
    fn single_image_gallery_does_not_navigate() {
        let mut viewer = open_viewer(1, 0);
        viewer.apply(ViewerCommand::Next);
        viewer.apply(ViewerCommand::Prev);
        assert_eq!(viewer.state().unwrap().index(), 0);
    }

    #[test]
    fn zoom_stays_clamped_under_any_sequence() {
        let mut viewer = open_viewer(2, 0);
        for _ in 0..50 {
            viewer.apply(ViewerCommand::ZoomIn);
        }
        assert_eq!(viewer.state().unwrap().zoom(), MAX_ZOOM);

        for _ in 0..100 {
            viewer.apply(ViewerCommand::ZoomOut);
        }
        assert_eq!(viewer.state().unwrap().zoom(), MIN_ZOOM);

        viewer.apply(ViewerCommand::ResetZoom);
        assert_eq!(viewer.state().unwrap().zoom(), 1.0);
    }

    #[test]
    fn navigation_resets_zoom_and_pan() {
        let mut viewer = open_viewer(3, 0);
        viewer.apply(ViewerCommand::ZoomIn);
        viewer.start_pan(100.0, 100.0);
        viewer.pan_moved(130.0, 110.0);
        viewer.end_pan();
        assert_ne!(viewer.state().unwrap().pan(), (0.0, 0.0));

        viewer.apply(ViewerCommand::Next);
        let state = viewer.state().unwrap();
        assert_eq!(state.zoom(), 1.0);
        assert_eq!(state.pan(), (0.0, 0.0));
    }

    #[test]
    fn pan_accumulates_scaled_by_inverse_zoom() {
        let mut viewer = open_viewer(2, 0);
        // zoom = 1.2 * 1.2 = 1.44
        viewer.apply(ViewerCommand::ZoomIn);
        viewer.apply(ViewerCommand::ZoomIn);

        viewer.start_pan(0.0, 0.0);
        viewer.pan_moved(144.0, 72.0);
        let (px, py) = viewer.state().unwrap().pan();
        assert!((px - 100.0).abs() < 1e-3);
        assert!((py - 50.0).abs() < 1e-3);

        // Moves without an anchor are ignored.
        viewer.end_pan();
        viewer.pan_moved(500.0, 500.0);
        let (px2, py2) = viewer.state().unwrap().pan();
        assert_eq!((px2, py2), (px, py));
    }

    #[test]
    fn start_index_is_clamped_to_the_gallery() {
        let viewer = open_viewer(3, 9);
        assert_eq!(viewer.state().unwrap().index(), 2);
    }

    #[test]
    fn close_destroys_viewer_state() {
        let mut viewer = open_viewer(3, 1);
        viewer.apply(ViewerCommand::ZoomIn);
        viewer.apply(ViewerCommand::Close);
        assert!(!viewer.is_open());
        assert!(viewer.state().is_none());
    }

    #[test]
    fn wheel_direction_maps_to_zoom() {
        assert_eq!(wheel_command(-1.0), ViewerCommand::ZoomIn);
        assert_eq!(wheel_command(1.0), ViewerCommand::ZoomOut);
    }
}
