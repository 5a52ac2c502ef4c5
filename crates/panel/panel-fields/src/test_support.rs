//! In-crate canvas that records draw calls for unit tests.

use std::string::String;
use std::vec::Vec;

use core::convert::Infallible;

use embedded_graphics::{prelude::*, primitives::Rectangle};

use crate::canvas::Canvas;
use crate::colour::Colour;
use crate::style::{Font, Icon};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Fill {
        rect: Rectangle,
        colour: Colour,
    },
    Text {
        text: String,
        origin: Point,
        clip: Rectangle,
        foreground: Colour,
        background: Option<Colour>,
    },
    Icon {
        top_left: Point,
        size: Size,
    },
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<Op>,
}

impl RecordingCanvas {
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> Vec<(Rectangle, Colour)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill { rect, colour } => Some((*rect, *colour)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    type Error = Infallible;

    fn fill_rect(&mut self, rect: Rectangle, colour: Colour) -> Result<(), Self::Error> {
        self.ops.push(Op::Fill { rect, colour });
        Ok(())
    }

    fn draw_text(
        &mut self,
        _font: &'static Font,
        text: &str,
        origin: Point,
        clip: Rectangle,
        foreground: Colour,
        background: Option<Colour>,
    ) -> Result<(), Self::Error> {
        self.ops.push(Op::Text {
            text: text.into(),
            origin,
            clip,
            foreground,
            background,
        });
        Ok(())
    }

    fn draw_icon(&mut self, icon: &Icon, top_left: Point) -> Result<(), Self::Error> {
        self.ops.push(Op::Icon {
            top_left,
            size: Size::new(u32::from(icon.width), u32::from(icon.height)),
        });
        Ok(())
    }
}
