//! RGB(A) colors parsed from the CSS-ish strings palettes are written in.

use crate::error::ColorError;
use crate::math::{clamp01, lerp};
use crate::tween::Lerp;

/// Color with channels in 0..=255 kept as floats so crossfades stay smooth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

pub const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);
pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }

    /// `rgb(r, g, b)` with rounded channels.
    pub fn to_css(&self) -> String {
        format!(
            "rgb({}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// `rgba(r, g, b, a)` with rounded channels and alpha clamped to [0, 1].
    pub fn to_css_alpha(&self, alpha: f32) -> String {
        self.with_alpha(alpha).to_css()
    }
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            clamp01(self.a)
        )
    }
}

impl Lerp for Rgb {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Rgb::new(lerp(self.r, to.r, t), lerp(self.g, to.g, t), lerp(self.b, to.b, t))
    }
}

impl Lerp for Rgba {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Rgba::new(
            lerp(self.r, to.r, t),
            lerp(self.g, to.g, t),
            lerp(self.b, to.b, t),
            lerp(self.a, to.a, t),
        )
    }
}

#[inline]
fn channel(v: f32) -> i32 {
    v.round().clamp(0.0, 255.0) as i32
}

/// Parse `#rgb` or `#rrggbb` (leading `#` optional).
pub fn parse_hex(value: &str) -> Result<Rgb, ColorError> {
    let raw = value.trim().trim_start_matches('#');
    if raw.is_empty() {
        return Err(ColorError::Empty);
    }
    if !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(value.to_string()));
    }
    let expanded: String = match raw.len() {
        3 => raw.chars().flat_map(|c| [c, c]).collect(),
        6 => raw.to_string(),
        _ => return Err(ColorError::InvalidHex(value.to_string())),
    };
    let numeric =
        u32::from_str_radix(&expanded, 16).map_err(|_| ColorError::InvalidHex(value.to_string()))?;
    Ok(Rgb::new(
        ((numeric >> 16) & 255) as f32,
        ((numeric >> 8) & 255) as f32,
        (numeric & 255) as f32,
    ))
}

/// Parse `r, g, b` with or without an `rgb(`/`rgba(` wrapper; extra channels are ignored.
pub fn parse_rgb_list(value: &str) -> Result<Rgb, ColorError> {
    let parts = channels(value, 3)?;
    Ok(Rgb::new(parts[0], parts[1], parts[2]))
}

/// Parse `rgba(r, g, b, a)`; a missing alpha defaults to 1.
pub fn parse_rgba(value: &str) -> Result<Rgba, ColorError> {
    let parts = channels(value, 3)?;
    let a = parts.get(3).copied().unwrap_or(1.0);
    Ok(Rgba::new(parts[0], parts[1], parts[2], a))
}

fn channels(value: &str, expected: usize) -> Result<Vec<f32>, ColorError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ColorError::Empty);
    }
    let lower = trimmed.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .unwrap_or(&lower);
    let inner = inner.trim_end_matches(')');
    let parts = inner
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f32>()
                .map_err(|_| ColorError::InvalidChannel(part.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if parts.len() < expected {
        return Err(ColorError::MissingChannels {
            input: value.to_string(),
            expected,
        });
    }
    Ok(parts)
}
