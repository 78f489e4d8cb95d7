//! Touch buttons shared by the launcher and the games

use glam::Vec2;

use super::InputEvent;
use crate::consts::{BACK_BUTTON_POS, BACK_BUTTON_SIZE};
use crate::renderer::{Frame, colors, shade};
use crate::sim::Rect;

/// What a button did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonResponse {
    /// Not for this button; keep dispatching
    Ignored,
    /// Swallowed (press started here, or released outside after a press)
    Consumed,
    /// Pressed and released inside
    Clicked,
}

/// Press-then-release button
///
/// A pointer-down inside presses the button and is consumed, so whatever is
/// underneath never reacts. The click fires on release inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pressed: bool,
    hovered: bool,
}

impl Button {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            pressed: false,
            hovered: false,
        }
    }

    pub fn handle(&mut self, event: &InputEvent) -> ButtonResponse {
        match *event {
            InputEvent::PointerMove(p) => {
                self.hovered = self.rect.contains(p);
                ButtonResponse::Ignored
            }
            InputEvent::PointerDown(p) if self.rect.contains(p) => {
                self.pressed = true;
                ButtonResponse::Consumed
            }
            InputEvent::PointerUp(p) if self.pressed => {
                self.pressed = false;
                if self.rect.contains(p) {
                    ButtonResponse::Clicked
                } else {
                    ButtonResponse::Consumed
                }
            }
            _ => ButtonResponse::Ignored,
        }
    }

    /// Pressed or hovered
    pub fn is_active(&self) -> bool {
        self.pressed || self.hovered
    }

    /// Fill color for the current state
    pub fn color(&self, base: [f32; 4], active: [f32; 4]) -> [f32; 4] {
        if self.is_active() { active } else { base }
    }

    /// Rounded rectangle in the state color
    pub fn draw(&self, frame: &mut Frame, base: [f32; 4], radius: f32) {
        let color = self.color(base, shade(base, -0.15));
        frame.rounded_rect(self.rect, radius, color);
    }
}

/// Home-shaped button in the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackButton {
    button: Button,
}

impl Default for BackButton {
    fn default() -> Self {
        Self::new()
    }
}

impl BackButton {
    pub fn new() -> Self {
        let (x, y) = BACK_BUTTON_POS;
        Self::at(x, y)
    }

    /// Back button with its top-left corner at `(x, y)`
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            button: Button::new(Rect::new(x, y, BACK_BUTTON_SIZE, BACK_BUTTON_SIZE)),
        }
    }

    pub fn rect(&self) -> Rect {
        self.button.rect
    }

    pub fn handle(&mut self, event: &InputEvent) -> ButtonResponse {
        self.button.handle(event)
    }

    pub fn draw(&self, frame: &mut Frame) {
        let color = self
            .button
            .color(colors::BACK_BUTTON, colors::BACK_BUTTON_HOVER);
        draw_house(frame, self.button.rect.center(), self.button.rect.w, color);
    }
}

/// Roof, body and a white door
pub fn draw_house(frame: &mut Frame, center: Vec2, size: f32, color: [f32; 4]) {
    let s = size;
    frame.polygon(
        &[
            center + Vec2::new(0.0, -s / 3.0),
            center + Vec2::new(s / 3.0, 0.0),
            center + Vec2::new(-s / 3.0, 0.0),
        ],
        color,
    );
    frame.rect(Rect::new(center.x - s / 4.0, center.y, s / 2.0, s / 3.0), color);
    frame.rect(
        Rect::new(center.x - s / 10.0, center.y + s / 8.0, s / 5.0, s / 4.0),
        colors::WHITE,
    );
}

/// Horizontal progress bar with a rounded track
pub fn draw_progress(frame: &mut Frame, rect: Rect, progress: f32, fill: [f32; 4]) {
    frame.rounded_rect(rect, rect.h / 2.0, colors::LIGHT_GRAY);
    let progress = progress.clamp(0.0, 1.0);
    if progress > 0.0 {
        let filled = Rect::new(rect.x, rect.y, rect.w * progress, rect.h);
        frame.rounded_rect(filled, rect.h / 2.0, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> Button {
        Button::new(Rect::new(0.0, 0.0, 100.0, 50.0))
    }

    #[test]
    fn test_click_requires_press_and_release_inside() {
        let mut b = button();
        assert_eq!(
            b.handle(&InputEvent::PointerDown(Vec2::new(10.0, 10.0))),
            ButtonResponse::Consumed
        );
        assert!(b.pressed);
        assert_eq!(
            b.handle(&InputEvent::PointerUp(Vec2::new(20.0, 20.0))),
            ButtonResponse::Clicked
        );
        assert!(!b.pressed);
    }

    #[test]
    fn test_release_outside_cancels() {
        let mut b = button();
        b.handle(&InputEvent::PointerDown(Vec2::new(10.0, 10.0)));
        assert_eq!(
            b.handle(&InputEvent::PointerUp(Vec2::new(500.0, 10.0))),
            ButtonResponse::Consumed
        );
        assert_eq!(
            b.handle(&InputEvent::PointerUp(Vec2::new(10.0, 10.0))),
            ButtonResponse::Ignored
        );
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut b = button();
        assert_eq!(
            b.handle(&InputEvent::PointerUp(Vec2::new(10.0, 10.0))),
            ButtonResponse::Ignored
        );
        assert_eq!(
            b.handle(&InputEvent::PointerDown(Vec2::new(300.0, 10.0))),
            ButtonResponse::Ignored
        );
    }

    #[test]
    fn test_hover_tracking() {
        let mut b = button();
        b.handle(&InputEvent::PointerMove(Vec2::new(5.0, 5.0)));
        assert!(b.is_active());
        b.handle(&InputEvent::PointerMove(Vec2::new(500.0, 5.0)));
        assert!(!b.is_active());
    }

    #[test]
    fn test_back_button_sits_top_left() {
        let back = BackButton::new();
        assert_eq!(back.rect(), Rect::new(20.0, 20.0, 60.0, 60.0));
    }
}
