//! Palette descriptors supplied by the page shell and their interpolated state.

use crate::color::{parse_hex, parse_rgb_list, parse_rgba, Rgb, Rgba};
use crate::constants::{PALETTE_FADE_SEC, STYLE_FADE_SEC};
use crate::error::{ColorError, PaletteError};
use crate::math::lerp;
use crate::tween::{smoothstep, Lerp, Tween};
use serde::{Deserialize, Serialize};

/// How the particle field (or its stand-in) is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotStyle {
    #[default]
    Dot,
    Dash,
    Cloud,
    Contour,
    Ripple,
    Bloom,
}

impl DotStyle {
    /// Styles that draw the particle field itself (and so need its physics).
    pub fn uses_particles(self) -> bool {
        matches!(self, DotStyle::Dot | DotStyle::Dash | DotStyle::Cloud)
    }

    /// Styles that orient each particle along its velocity.
    pub fn uses_heading(self) -> bool {
        matches!(self, DotStyle::Dash | DotStyle::Cloud)
    }
}

fn one() -> f32 {
    1.0
}

/// Palette exactly as the host describes it (JSON-compatible, camelCase).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteDescriptor {
    /// `#rgb` / `#rrggbb`
    pub background: String,
    /// `#rgb` / `#rrggbb`
    pub dot: String,
    /// bare `r, g, b` list
    pub glow: String,
    /// `rgba(r, g, b, a)`
    pub border: String,
    #[serde(default)]
    pub dot_style: DotStyle,
    #[serde(default = "one")]
    pub dot_density_scale: f32,
    #[serde(default = "one")]
    pub dot_alpha_scale: f32,
    #[serde(default = "one")]
    pub wake_alpha_scale: f32,
    #[serde(default = "one")]
    pub dot_radius_scale: f32,
}

impl PaletteDescriptor {
    /// The default dark theme.
    pub fn dark() -> Self {
        Self {
            background: "#141517".into(),
            dot: "#ffffff".into(),
            glow: "120, 190, 255".into(),
            border: "rgba(255, 255, 255, 0.4)".into(),
            dot_style: DotStyle::Dot,
            dot_density_scale: 1.0,
            dot_alpha_scale: 1.6,
            wake_alpha_scale: 0.95,
            dot_radius_scale: 1.15,
        }
    }

    /// The warm light theme.
    pub fn light() -> Self {
        Self {
            background: "#f6e7c6".into(),
            dot: "#e14d52".into(),
            glow: "225, 78, 84".into(),
            border: "rgba(192, 24, 33, 0.55)".into(),
            dot_style: DotStyle::Dash,
            dot_density_scale: 0.7,
            dot_alpha_scale: 1.5,
            wake_alpha_scale: 0.8,
            dot_radius_scale: 1.0,
        }
    }
}

impl Default for PaletteDescriptor {
    fn default() -> Self {
        Self::dark()
    }
}

/// Parsed, interpolatable palette.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteState {
    pub background: Rgb,
    pub dot: Rgb,
    pub glow: Rgb,
    pub border: Rgba,
    pub dot_alpha_scale: f32,
    pub wake_alpha_scale: f32,
    pub dot_radius_scale: f32,
}

impl TryFrom<&PaletteDescriptor> for PaletteState {
    type Error = PaletteError;

    fn try_from(desc: &PaletteDescriptor) -> Result<Self, Self::Error> {
        Ok(Self {
            background: parse_hex(&desc.background).map_err(in_field("background"))?,
            dot: parse_hex(&desc.dot).map_err(in_field("dot"))?,
            glow: parse_rgb_list(&desc.glow).map_err(in_field("glow"))?,
            border: parse_rgba(&desc.border).map_err(in_field("border"))?,
            dot_alpha_scale: desc.dot_alpha_scale,
            wake_alpha_scale: desc.wake_alpha_scale,
            dot_radius_scale: desc.dot_radius_scale,
        })
    }
}

fn in_field(field: &'static str) -> impl Fn(ColorError) -> PaletteError {
    move |source| PaletteError::Color { field, source }
}

impl Lerp for PaletteState {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            background: self.background.lerp(&to.background, t),
            dot: self.dot.lerp(&to.dot, t),
            glow: self.glow.lerp(&to.glow, t),
            border: self.border.lerp(&to.border, t),
            dot_alpha_scale: lerp(self.dot_alpha_scale, to.dot_alpha_scale, t),
            wake_alpha_scale: lerp(self.wake_alpha_scale, to.wake_alpha_scale, t),
            dot_radius_scale: lerp(self.dot_radius_scale, to.dot_radius_scale, t),
        }
    }
}

/// Live palette: the last shown state crossfading toward a target.
#[derive(Clone, Debug)]
pub struct PaletteCrossfade {
    current: PaletteState,
    target: PaletteState,
    transition: Option<Tween<PaletteState>>,
}

impl PaletteCrossfade {
    pub fn new(state: PaletteState) -> Self {
        Self {
            current: state,
            target: state,
            transition: None,
        }
    }

    /// Start fading from whatever is currently shown toward `target`.
    pub fn retarget(&mut self, target: PaletteState, now: f64) {
        self.transition = Some(Tween::new(now, PALETTE_FADE_SEC, self.current, target));
        self.target = target;
    }

    /// Advance to `now` and return the palette to draw with.
    pub fn sample(&mut self, now: f64) -> PaletteState {
        match &self.transition {
            Some(tween) => {
                self.current = tween.value(now);
                if tween.is_done(now) {
                    self.transition = None;
                }
            }
            None => self.current = self.target,
        }
        self.current
    }

    pub fn current(&self) -> &PaletteState {
        &self.current
    }

    pub fn target(&self) -> &PaletteState {
        &self.target
    }

    pub fn in_flight(&self) -> bool {
        self.transition.is_some()
    }
}

/// The pair of styles being drawn this frame and how far the fade has gone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleTransition {
    pub from: DotStyle,
    pub to: DotStyle,
    /// Eased progress; the `to` style is drawn at this alpha, `from` at `1 - progress`.
    pub progress: f32,
}

impl StyleTransition {
    pub fn settled(style: DotStyle) -> Self {
        Self {
            from: style,
            to: style,
            progress: 1.0,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.from == self.to || self.progress >= 1.0
    }

    pub fn uses_particles(&self) -> bool {
        self.from.uses_particles() || self.to.uses_particles()
    }

    pub fn uses_heading(&self) -> bool {
        self.from.uses_heading() || self.to.uses_heading()
    }
}

#[derive(Clone, Copy, Debug)]
struct StyleFadeState {
    from: DotStyle,
    to: DotStyle,
    start: f64,
}

/// Tracks the settled style and any in-flight style crossfade.
#[derive(Clone, Debug)]
pub struct StyleFade {
    current: DotStyle,
    fade: Option<StyleFadeState>,
}

impl StyleFade {
    pub fn new(style: DotStyle) -> Self {
        Self {
            current: style,
            fade: None,
        }
    }

    pub fn request(&mut self, next: DotStyle, now: f64) {
        if next == self.current {
            self.fade = None;
        } else {
            self.fade = Some(StyleFadeState {
                from: self.current,
                to: next,
                start: now,
            });
        }
    }

    pub fn sample(&mut self, now: f64) -> StyleTransition {
        let Some(fade) = self.fade else {
            return StyleTransition::settled(self.current);
        };
        let t = ((now - fade.start) / STYLE_FADE_SEC).clamp(0.0, 1.0) as f32;
        if t >= 1.0 {
            self.current = fade.to;
            self.fade = None;
            return StyleTransition::settled(fade.to);
        }
        StyleTransition {
            from: fade.from,
            to: fade.to,
            progress: smoothstep(t),
        }
    }

    pub fn current(&self) -> DotStyle {
        self.current
    }

    pub fn in_flight(&self) -> bool {
        self.fade.is_some()
    }
}
