/// Card background canvas: tilt/parallax rendering + pointer tracking
///
/// Each card owns one of these programs. It reports pointer enter/move/
/// leave/click as messages and draws the card's current image with the
/// transform derived from the tilt engine.

use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::widget::image::Handle;
use iced::{Color, Point, Rectangle, Renderer, Theme};

use crate::state::tilt::TiltTransform;
use crate::Message;

/// Pointer activity over one card, forwarded to the orchestrator.
#[derive(Debug, Clone)]
pub enum CardEvent {
    Entered,
    Moved {
        raw_x: f32,
        raw_y: f32,
        origin_x: f32,
        origin_y: f32,
        width: f32,
        height: f32,
    },
    Left,
    Clicked,
}

pub struct CardVisual {
    pub card_id: String,
    pub handle: Handle,
    pub transform: TiltTransform,
    /// Locked cards get a dimming overlay.
    pub locked: bool,
}

/// Hover tracking for enter/leave detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverState {
    inside: bool,
}

impl Program<Message> for CardVisual {
    type State = HoverState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let t = self.transform;

        // The background is drawn larger than the card so the parallax
        // travel never exposes an edge.
        let margin = 40.0;
        let background = Rectangle {
            x: -margin + t.translate_x,
            y: -margin + t.translate_y,
            width: bounds.width + margin * 2.0,
            height: bounds.height + margin * 2.0,
        };

        // A 2D canvas has no perspective transform; the surface rotation is
        // rendered as a slight roll of the background around its center.
        let roll = ((t.rotate_y - t.rotate_x) * 0.1).to_radians();
        frame.draw_image(
            background,
            canvas::Image::new(self.handle.clone()).rotation(roll),
        );

        if self.locked {
            frame.fill_rectangle(
                Point::ORIGIN,
                bounds.size(),
                Color::from_rgba(0.0, 0.0, 0.0, 0.55),
            );
        }

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
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let inside = cursor.position_in(bounds).is_some();

                if inside && !state.inside {
                    state.inside = true;
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Card(self.card_id.clone(), CardEvent::Entered)),
                    );
                }

                if inside {
                    if let Some(position) = cursor.position() {
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::Card(
                                self.card_id.clone(),
                                CardEvent::Moved {
                                    raw_x: position.x,
                                    raw_y: position.y,
                                    origin_x: bounds.x,
                                    origin_y: bounds.y,
                                    width: bounds.width,
                                    height: bounds.height,
                                },
                            )),
                        );
                    }
                }

                if !inside && state.inside {
                    state.inside = false;
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Card(self.card_id.clone(), CardEvent::Left)),
                    );
                }
            }

            // The cursor left the window entirely.
            canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                if state.inside {
                    state.inside = false;
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Card(self.card_id.clone(), CardEvent::Left)),
                    );
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if cursor.position_in(bounds).is_some() {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Card(self.card_id.clone(), CardEvent::Clicked)),
                    );
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }
}
