use serde::{Deserialize, Serialize};

pub type Rgba = [u8; 4];

pub const WHITE: Rgba = [255, 255, 255, 255];
pub const RED: Rgba = [255, 0, 0, 255];
pub const YELLOW: Rgba = [255, 255, 0, 255];
pub const GREY: Rgba = [128, 128, 128, 255];

/// Letters used as n-back stimuli
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    G,
    H,
    K,
    P,
    Q,
    T,
    W,
}

impl Letter {
    pub const ALPHABET: [Letter; 8] = [
        Letter::C,
        Letter::G,
        Letter::H,
        Letter::K,
        Letter::P,
        Letter::Q,
        Letter::T,
        Letter::W,
    ];

    pub fn as_char(&self) -> char {
        match self {
            Letter::C => 'C',
            Letter::G => 'G',
            Letter::H => 'H',
            Letter::K => 'K',
            Letter::P => 'P',
            Letter::Q => 'Q',
            Letter::T => 'T',
            Letter::W => 'W',
        }
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    Left,
    #[default]
    Center,
}

/// Drawable primitives handed to the display
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text {
        content: String,
        size: f32,
        color: Rgba,
        wrap_width: Option<f32>,
        align: Align,
    },
    Outline {
        width: f32,
        height: f32,
        color: Rgba,
    },
}

impl Shape {
    pub fn text(content: impl Into<String>, size: f32, color: Rgba) -> Self {
        Shape::Text {
            content: content.into(),
            size,
            color,
            wrap_width: None,
            align: Align::Center,
        }
    }

    pub fn paragraph(content: impl Into<String>, size: f32, wrap_width: f32) -> Self {
        Shape::Text {
            content: content.into(),
            size,
            color: WHITE,
            wrap_width: Some(wrap_width),
            align: Align::Left,
        }
    }

    pub fn outline(width: f32, height: f32, color: Rgba) -> Self {
        Shape::Outline {
            width,
            height,
            color,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Shape::Text { .. })
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Shape::Text { content, .. } => Some(content.as_str()),
            Shape::Outline { .. } => None,
        }
    }

    pub fn at(self, pos: (f32, f32)) -> Placed {
        Placed { shape: self, pos }
    }
}

/// A shape positioned in centre-origin pixel coordinates, y pointing up
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub shape: Shape,
    pub pos: (f32, f32),
}
