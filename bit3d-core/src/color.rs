//! Colors, fill paints and CSS-style color literals
use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{alpha1, char, multispace0, u8 as decimal_u8},
    combinator::{all_consuming, map, map_opt},
    number::complete::float,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::{Bit3dError, Result};

/// An sRGB color with straight alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Linear interpolation of every channel, alpha included.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Relative luminance in `[0, 1]`, ignoring alpha.
    pub fn luminance(&self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }
}

impl FromStr for Color {
    type Err = Bit3dError;

    fn from_str(s: &str) -> Result<Self> {
        match all_consuming(delimited(multispace0, parse_color, multispace0))(s) {
            Ok((_, color)) => Ok(color),
            Err(_) => Err(Bit3dError::InvalidColor(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A two-stop radial gradient: `inner` at the center, `outer` at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub inner: Color,
    pub outer: Color,
}

impl RadialGradient {
    /// Gradient color at a surface position; beyond `radius` the outer color holds.
    pub fn color_at(&self, x: f32, y: f32) -> Color {
        if self.radius <= 0.0 {
            return self.outer;
        }
        let distance = ((x - self.x).powi(2) + (y - self.y).powi(2)).sqrt();
        self.inner.lerp(self.outer, distance / self.radius)
    }
}

/// Fill style handed to a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    Radial(RadialGradient),
}

impl Paint {
    pub fn color_at(&self, x: f32, y: f32) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Radial(gradient) => gradient.color_at(x, y),
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

/// Parse one color literal: hex, `rgb()`, `rgba()` or a named color.
pub(crate) fn parse_color(input: &str) -> IResult<&str, Color> {
    alt((hex_color, rgba_color, rgb_color, named_color))(input)
}

fn hex_color(input: &str) -> IResult<&str, Color> {
    map_opt(
        preceded(char('#'), take_while1(|c: char| c.is_ascii_hexdigit())),
        from_hex,
    )(input)
}

fn from_hex(digits: &str) -> Option<Color> {
    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    let alpha = |v: u8| v as f32 / 255.0;

    match digits.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, alpha(nibble(3)?))),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, alpha(byte(6)?))),
        _ => None,
    }
}

fn channel(input: &str) -> IResult<&str, u8> {
    delimited(multispace0, decimal_u8, multispace0)(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(multispace0, char(','), multispace0)(input)
}

fn rgba_color(input: &str) -> IResult<&str, Color> {
    map(
        preceded(
            tag_no_case("rgba"),
            delimited(
                preceded(multispace0, char('(')),
                tuple((channel, comma, channel, comma, channel, comma, float)),
                preceded(multispace0, char(')')),
            ),
        ),
        |(r, _, g, _, b, _, a)| Color::rgb(r, g, b).with_alpha(a),
    )(input)
}

fn rgb_color(input: &str) -> IResult<&str, Color> {
    map(
        preceded(
            tag_no_case("rgb"),
            delimited(
                preceded(multispace0, char('(')),
                tuple((channel, comma, channel, comma, channel)),
                char(')'),
            ),
        ),
        |(r, _, g, _, b)| Color::rgb(r, g, b),
    )(input)
}

fn named_color(input: &str) -> IResult<&str, Color> {
    map_opt(alpha1, |name: &str| {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::GREEN,
            "blue" => Color::BLUE,
            "yellow" => Color::rgb(255, 255, 0),
            "cyan" => Color::rgb(0, 255, 255),
            "magenta" => Color::rgb(255, 0, 255),
            "gray" | "grey" => Color::rgb(128, 128, 128),
            "orange" => Color::rgb(255, 165, 0),
            _ => return None,
        };
        Some(color)
    })(input)
}
