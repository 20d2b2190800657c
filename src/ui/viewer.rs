/// Full-screen viewer canvas: image rendering + wheel zoom and drag pan
///
/// Wheel and drag events become viewer messages; keyboard mapping lives
/// here too so the orchestrator's key subscription stays a one-liner.

use iced::keyboard::key::Named;
use iced::keyboard::Key;
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::widget::image::Handle;
use iced::{Rectangle, Renderer, Theme};

use crate::state::viewer::ViewerCommand;
use crate::Message;

/// Keyboard bindings, active only while the viewer is open.
pub fn key_command(key: &Key) -> Option<ViewerCommand> {
    match key {
        Key::Named(Named::Escape) => Some(ViewerCommand::Close),
        Key::Named(Named::ArrowLeft) => Some(ViewerCommand::Prev),
        Key::Named(Named::ArrowRight) => Some(ViewerCommand::Next),
        Key::Character(c) => match c.as_str() {
            "+" | "=" => Some(ViewerCommand::ZoomIn),
            "-" => Some(ViewerCommand::ZoomOut),
            "0" => Some(ViewerCommand::ResetZoom),
            _ => None,
        },
        _ => None,
    }
}

pub struct ViewerCanvas {
    pub handle: Handle,
    /// Intrinsic image dimensions, for aspect-correct fitting.
    pub image_size: (u32, u32),
    pub zoom: f32,
    pub pan: (f32, f32),
}

/// State for drag interactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    is_dragging: bool,
}

impl Program<Message> for ViewerCanvas {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let (iw, ih) = self.image_size;
        if iw == 0 || ih == 0 {
            return vec![frame.into_geometry()];
        }

        // Contain-fit at zoom 1, then scale. Pan is accumulated in
        // unzoomed units, so it maps back to screen pixels times zoom.
        let fit = (bounds.width / iw as f32).min(bounds.height / ih as f32);
        let width = iw as f32 * fit * self.zoom;
        let height = ih as f32 * fit * self.zoom;
        let center_x = bounds.width / 2.0 + self.pan.0 * self.zoom;
        let center_y = bounds.height / 2.0 + self.pan.1 * self.zoom;

        frame.draw_image(
            Rectangle {
                x: center_x - width / 2.0,
                y: center_y - height / 2.0,
                width,
                height,
            },
            canvas::Image::new(self.handle.clone()),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse wheel for zooming. iced reports scroll-up as positive,
            // the viewer expects DOM-style deltas (scroll-up negative).
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y,
                };
                return (
                    canvas::event::Status::Captured,
                    Some(Message::ViewerWheel(-y)),
                );
            }

            // Mouse button press - start panning
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    state.is_dragging = true;
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::ViewerPanStart(position.x, position.y)),
                    );
                }
            }

            // Mouse button release - stop panning
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.is_dragging {
                    state.is_dragging = false;
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::ViewerPanEnd),
                    );
                }
            }

            // A release outside the window never reaches the canvas, so
            // leaving the window ends the drag too.
            canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                if state.is_dragging {
                    state.is_dragging = false;
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::ViewerPanEnd),
                    );
                }
            }

            // Mouse move - pan while dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.is_dragging {
                    if let Some(position) = cursor.position_in(bounds) {
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::ViewerPanMoved(position.x, position.y)),
                        );
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }
}
