//! Export contract between the engine and the host's rasterizer.
//!
//! The engine never encodes pixels. It decides what is exported (kind,
//! size, background, file name), makes sure no gesture is live and, for
//! template saves, that no selection decoration is showing, then hands an
//! [`ExportRequest`] to an [`ExportAdapter`].

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    #[default]
    Png,
    Jpeg,
    Svg,
    /// Transparent PNG.
    Sticker,
}

impl ExportKind {
    pub const ALL: [Self; 4] = [Self::Png, Self::Jpeg, Self::Svg, Self::Sticker];

    /// File extension; stickers are plain PNGs.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png | Self::Sticker => "png",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png | Self::Sticker => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
            Self::Sticker => "sticker",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "jpg" {
            return Ok(Self::Jpeg);
        }
        Self::ALL.into_iter().find(|k| k.as_str() == s).ok_or(ExportError::UnknownKind(s))
    }
}

/// Why the composition is being exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportPurpose {
    /// Download for the user.
    #[default]
    Download,
    /// Save as a reusable template; selection decorations must not render.
    Template,
}

/// Encoder settings handed to the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// CSS color painted behind the composition; `None` keeps transparency.
    pub background: Option<String>,
    /// Lossy quality in `0..=1`, JPEG only.
    pub quality: Option<f64>,
    /// Output pixel size; `None` uses the rendered size.
    pub size: Option<Size>,
}

pub const JPEG_QUALITY: f64 = 0.95;
pub const JPEG_BACKGROUND: &str = "#fff";

impl ExportOptions {
    /// Options for `kind`. Studio exports are pinned to the canvas size.
    #[must_use]
    pub fn for_kind(kind: ExportKind, studio_canvas: Option<Size>) -> Self {
        let (background, quality) = match kind {
            ExportKind::Jpeg => (Some(JPEG_BACKGROUND.to_string()), Some(JPEG_QUALITY)),
            ExportKind::Png | ExportKind::Svg | ExportKind::Sticker => (None, None),
        };
        Self { background, quality, size: studio_canvas }
    }
}

/// One export job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub kind: ExportKind,
    pub purpose: ExportPurpose,
    pub options: ExportOptions,
    pub file_name: String,
}

impl ExportRequest {
    #[must_use]
    pub fn new(kind: ExportKind, purpose: ExportPurpose, studio_canvas: Option<Size>, base_name: &str) -> Self {
        Self {
            kind,
            purpose,
            options: ExportOptions::for_kind(kind, studio_canvas),
            file_name: format!("{base_name}.{}", kind.extension()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("unknown export kind: {0}")]
    UnknownKind(String),
    #[error("export is not ready: {0}")]
    NotReady(&'static str),
    #[error("rendering failed: {0}")]
    Render(String),
}

/// Host-side rasterizer.
pub trait ExportAdapter {
    /// Encode the rendered composition. Returns the encoded bytes.
    fn export(&mut self, request: &ExportRequest) -> Result<Vec<u8>, ExportError>;
}
