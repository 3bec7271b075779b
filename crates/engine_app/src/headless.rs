//! A [`Screen`] without a window.
//!
//! Plays back a script of input events and records the draw calls of each
//! frame, so the full frame loop can run in tests and from the command line.

// Recorded draw calls are inspected field by field only in tests.
#![allow(dead_code)]

use std::collections::BTreeMap;

use engine_component::{Color, ComponentError, Surface};
use engine_math::Vec2;
use engine_world::Event;

use crate::controller::{Screen, ScreenError};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnRectangle {
    pub bottom_left: Vec2,
    pub top_right: Vec2,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnText {
    pub location: Vec2,
    pub font_size: f32,
    pub text: String,
    pub color: Color,
}

/// Everything drawn during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameRecord {
    pub rectangles: Vec<DrawnRectangle>,
    pub texts: Vec<DrawnText>,
}

#[derive(Debug, Default)]
pub struct HeadlessScreen {
    /// Scripted events keyed by the poll that delivers them.
    script: BTreeMap<u64, Vec<Event>>,
    close_after: Option<u64>,
    polls: u64,
    events: Vec<Event>,
    current: FrameRecord,
    last: FrameRecord,
    presented: u64,
}

impl HeadlessScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` on the `frame`-th poll (counting from zero).
    #[must_use]
    pub fn with_event(mut self, frame: u64, event: Event) -> Self {
        self.script.entry(frame).or_default().push(event);
        self
    }

    /// Report the window as closed after `frames` successful polls.
    #[must_use]
    pub fn with_close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    /// Number of frames finished so far.
    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// Draw calls of the most recently finished frame.
    #[must_use]
    pub fn last_frame(&self) -> &FrameRecord {
        &self.last
    }
}

impl Surface for HeadlessScreen {
    fn draw_rectangle(&mut self, bottom_left: Vec2, top_right: Vec2, color: Color) -> Result<(), ComponentError> {
        self.current.rectangles.push(DrawnRectangle {
            bottom_left,
            top_right,
            color,
        });
        Ok(())
    }

    fn draw_text(&mut self, location: Vec2, font_size: f32, text: &str, color: Color) -> Result<(), ComponentError> {
        self.current.texts.push(DrawnText {
            location,
            font_size,
            text: text.to_string(),
            color,
        });
        Ok(())
    }
}

impl Screen for HeadlessScreen {
    fn start_update(&mut self) {
        self.current = FrameRecord::default();
    }

    fn poll_events(&mut self) -> Result<bool, ScreenError> {
        if self.close_after.is_some_and(|limit| self.polls >= limit) {
            return Ok(false);
        }
        if let Some(events) = self.script.remove(&self.polls) {
            self.events.extend(events);
        }
        self.polls += 1;
        Ok(true)
    }

    fn events(&self) -> &[Event] {
        &self.events
    }

    fn clear_events(&mut self) {
        self.events.clear();
    }

    fn finish_update(&mut self) {
        self.last = std::mem::take(&mut self.current);
        self.presented += 1;
    }
}
