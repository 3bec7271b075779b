//! Components that draw through the render [`Surface`].

use engine_math::{Transform2D, Vec2};

use crate::component::{Body, Component};
use crate::error::ComponentError;
use crate::render::{Color, Surface};

/// Fills the entity's rectangle (or a sub-rectangle of it) with a colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRectangle {
    color: Color,
    local: Transform2D,
}

impl DrawRectangle {
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            color,
            local: Transform2D::IDENTITY,
        }
    }

    /// Draw a rectangle placed relative to the entity's transform.
    #[must_use]
    pub fn with_local_transform(mut self, local: Transform2D) -> Self {
        self.local = local;
        self
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
}

impl Component for DrawRectangle {
    fn type_name(&self) -> &'static str {
        "draw_rectangle"
    }

    fn draw(&self, body: &Body, surface: &mut dyn Surface) -> Result<(), ComponentError> {
        let transform = body.transform.compose(&self.local);
        surface.draw_rectangle(transform.bottom_left(), transform.top_right(), self.color)
    }
}

/// Text drawn at the entity's position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    font_size: f32,
    color: Color,
    offset: Vec2,
}

impl Label {
    #[must_use]
    pub fn new(text: impl Into<String>, font_size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            font_size,
            color,
            offset: Vec2::ZERO,
        }
    }

    /// Draw the text offset from the entity's centre.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Component for Label {
    fn type_name(&self) -> &'static str {
        "label"
    }

    fn draw(&self, body: &Body, surface: &mut dyn Surface) -> Result<(), ComponentError> {
        surface.draw_text(body.transform.translation + self.offset, self.font_size, &self.text, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        rectangles: Vec<(Vec2, Vec2, Color)>,
        texts: Vec<(Vec2, String)>,
    }

    impl Surface for Recorder {
        fn draw_rectangle(&mut self, bottom_left: Vec2, top_right: Vec2, color: Color) -> Result<(), ComponentError> {
            self.rectangles.push((bottom_left, top_right, color));
            Ok(())
        }

        fn draw_text(&mut self, location: Vec2, _font_size: f32, text: &str, _color: Color) -> Result<(), ComponentError> {
            self.texts.push((location, text.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_rectangle_uses_body_corners() {
        let body = Body::new(Transform2D::from_translation_and_scale(Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.5)));
        let mut surface = Recorder::default();
        DrawRectangle::new(Color::RED).draw(&body, &mut surface).unwrap();
        assert_eq!(surface.rectangles, vec![(Vec2::new(-1.0, 0.5), Vec2::new(3.0, 1.5), Color::RED)]);
    }

    #[test]
    fn test_label_draws_at_offset() {
        let body = Body::new(Transform2D::from_translation(Vec2::new(1.0, 2.0)));
        let mut surface = Recorder::default();
        let mut label = Label::new("score", 12.0, Color::WHITE).with_offset(Vec2::new(0.0, 1.0));
        label.set_text("score: 3");
        label.draw(&body, &mut surface).unwrap();
        assert_eq!(surface.texts, vec![(Vec2::new(1.0, 3.0), "score: 3".to_string())]);
    }
}
