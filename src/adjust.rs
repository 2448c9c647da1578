//! Studio image adjustments: the whole-image transform and CSS filter stack.
//!
//! These are auxiliary to the layer model. They apply to the entire studio
//! stage, are edited from sliders, and are handed to the host as CSS
//! strings. Every setter clamps to the slider's range.

#[cfg(test)]
#[path = "adjust_test.rs"]
mod adjust_test;

use serde::{Deserialize, Serialize};

/// A slider's inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
}

impl SliderRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `v` into the range. Non-finite input yields `fallback`.
    #[must_use]
    pub fn clamp(self, v: f64, fallback: f64) -> f64 {
        if v.is_finite() { v.clamp(self.min, self.max) } else { fallback }
    }
}

// ── Transform ───────────────────────────────────────────────────

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageTransform {
    /// Percent; 100 is natural size.
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    /// Degrees.
    pub rotate: f64,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self { scale: 100.0, x: 0.0, y: 0.0, rotate: 0.0, flip_h: false, flip_v: false }
    }
}

/// One transform edit from the panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TransformField {
    Scale(f64),
    X(f64),
    Y(f64),
    Rotate(f64),
    FlipH(bool),
    FlipV(bool),
}

impl TransformField {
    pub const SCALE: SliderRange = SliderRange::new(10.0, 300.0);
    pub const OFFSET: SliderRange = SliderRange::new(-300.0, 300.0);
    pub const ROTATE: SliderRange = SliderRange::new(0.0, 360.0);
}

impl ImageTransform {
    pub fn set(&mut self, field: TransformField) {
        let neutral = Self::default();
        match field {
            TransformField::Scale(v) => self.scale = TransformField::SCALE.clamp(v, neutral.scale),
            TransformField::X(v) => self.x = TransformField::OFFSET.clamp(v, neutral.x),
            TransformField::Y(v) => self.y = TransformField::OFFSET.clamp(v, neutral.y),
            TransformField::Rotate(v) => self.rotate = TransformField::ROTATE.clamp(v, neutral.rotate),
            TransformField::FlipH(v) => self.flip_h = v,
            TransformField::FlipV(v) => self.flip_v = v,
        }
    }

    pub fn toggle_flip_h(&mut self) {
        self.flip_h = !self.flip_h;
    }

    pub fn toggle_flip_v(&mut self) {
        self.flip_v = !self.flip_v;
    }

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// CSS `transform` value, applied about the element center.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({}) rotate({}deg) scaleX({}) scaleY({})",
            self.x,
            self.y,
            self.scale / 100.0,
            self.rotate,
            if self.flip_h { -1 } else { 1 },
            if self.flip_v { -1 } else { 1 },
        )
    }
}

// ── Filters ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFilters {
    pub brightness: f64,
    pub contrast: f64,
    pub saturate: f64,
    pub grayscale: f64,
    pub sepia: f64,
    pub hue: f64,
    pub blur: f64,
}

impl Default for ImageFilters {
    fn default() -> Self {
        Self { brightness: 100.0, contrast: 100.0, saturate: 100.0, grayscale: 0.0, sepia: 0.0, hue: 0.0, blur: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Brightness,
    Contrast,
    Saturate,
    Grayscale,
    Sepia,
    Hue,
    Blur,
}

impl FilterKind {
    /// Panel order.
    pub const ALL: [Self; 7] =
        [Self::Brightness, Self::Contrast, Self::Saturate, Self::Grayscale, Self::Sepia, Self::Hue, Self::Blur];

    #[must_use]
    pub fn range(self) -> SliderRange {
        match self {
            Self::Hue => SliderRange::new(0.0, 360.0),
            Self::Blur => SliderRange::new(0.0, 20.0),
            _ => SliderRange::new(0.0, 200.0),
        }
    }
}

impl ImageFilters {
    #[must_use]
    pub fn get(&self, kind: FilterKind) -> f64 {
        match kind {
            FilterKind::Brightness => self.brightness,
            FilterKind::Contrast => self.contrast,
            FilterKind::Saturate => self.saturate,
            FilterKind::Grayscale => self.grayscale,
            FilterKind::Sepia => self.sepia,
            FilterKind::Hue => self.hue,
            FilterKind::Blur => self.blur,
        }
    }

    pub fn set(&mut self, kind: FilterKind, value: f64) {
        let value = kind.range().clamp(value, Self::default().get(kind));
        let slot = match kind {
            FilterKind::Brightness => &mut self.brightness,
            FilterKind::Contrast => &mut self.contrast,
            FilterKind::Saturate => &mut self.saturate,
            FilterKind::Grayscale => &mut self.grayscale,
            FilterKind::Sepia => &mut self.sepia,
            FilterKind::Hue => &mut self.hue,
            FilterKind::Blur => &mut self.blur,
        };
        *slot = value;
    }

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// CSS `filter` value.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "brightness({}%) contrast({}%) saturate({}%) grayscale({}%) sepia({}%) hue-rotate({}deg) blur({}px)",
            self.brightness, self.contrast, self.saturate, self.grayscale, self.sepia, self.hue, self.blur,
        )
    }
}

/// Transform plus filters of the studio stage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Adjustments {
    pub transform: ImageTransform,
    pub filters: ImageFilters,
}

impl Adjustments {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn reset_filters(&mut self) {
        self.filters = ImageFilters::default();
    }

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.transform.is_neutral() && self.filters.is_neutral()
    }
}
