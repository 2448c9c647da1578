//! Composition context: which content source is active, and what each
//! source left behind.
//!
//! Every source (a built-in reaction, a gallery pick, a saved template, or a
//! free-form studio session) keeps its own caption set. Studio sessions also
//! keep their image layers, canvas size, and adjustments. Switching sources
//! snapshots the outgoing state, activates the incoming source, and restores
//! its captions (or installs the default pair).
//!
//! The same context serves both the single-image editor and the multi-layer
//! studio; [`Capabilities`] decides how new images are placed.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::adjust::Adjustments;
use crate::config::StudioConfig;
use crate::geometry::{Rect, Size};
use crate::layers::{Composition, ImageLayer, LayerId, LayerRef, Placement, TextLayer};
use crate::probe::{ProbeError, ProbeTicket, ProbeTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Reaction,
    Gallery,
    Template,
    Studio,
}

impl SourceKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Reaction => "reaction",
            Self::Gallery => "gallery",
            Self::Template => "template",
            Self::Studio => "studio",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical key of a content source: kind plus the source's own id.
/// Displays as `kind:id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKey {
    pub kind: SourceKind,
    pub id: String,
}

impl SourceKey {
    #[must_use]
    pub fn new(kind: SourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }

    #[must_use]
    pub fn reaction(id: impl Into<String>) -> Self {
        Self::new(SourceKind::Reaction, id)
    }

    #[must_use]
    pub fn gallery(id: impl Into<String>) -> Self {
        Self::new(SourceKind::Gallery, id)
    }

    #[must_use]
    pub fn template(id: impl Into<String>) -> Self {
        Self::new(SourceKind::Template, id)
    }

    #[must_use]
    pub fn studio(id: impl Into<String>) -> Self {
        Self::new(SourceKind::Studio, id)
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Images a source brings with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "sources", rename_all = "lowercase")]
pub enum SourceContent {
    /// One picture, used as the base layer (or the studio's first layer).
    Image(String),
    /// Zero or more pictures seeding a studio session.
    Studio(Vec<String>),
}

impl SourceContent {
    fn into_sources(self) -> Vec<String> {
        match self {
            Self::Image(src) => vec![src],
            Self::Studio(srcs) => srcs,
        }
    }
}

/// Behaviour switches that distinguish the single-image editor from the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// When false, adding an image replaces every layer with one base layer.
    pub multi_layer: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { multi_layer: true }
    }
}

/// Studio-only state kept for a source while another one is active.
#[derive(Debug, Clone, PartialEq)]
struct SavedStudio {
    images: Vec<ImageLayer>,
    canvas: Size,
    adjustments: Adjustments,
    /// Layers whose probe had not come back when the studio was left.
    pending: Vec<(LayerId, Placement)>,
}

#[derive(Debug, Clone, PartialEq)]
struct SavedSource {
    texts: Vec<TextLayer>,
    studio: Option<SavedStudio>,
}

/// What a probe result did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Natural size applied; `canvas_resized` when the canvas followed it.
    Applied { layer: LayerId, canvas_resized: bool },
    /// The image could not be measured; the fallback size was applied.
    FellBack { layer: LayerId },
    /// The layer was removed before the result arrived.
    LayerGone { layer: LayerId },
}

pub struct CompositionContext {
    config: StudioConfig,
    capabilities: Capabilities,
    composition: Composition,
    adjustments: Adjustments,
    current: Option<SourceKey>,
    saved: HashMap<SourceKey, SavedSource>,
    probes: ProbeTracker,
}

impl CompositionContext {
    /// A context with no active source, a blank canvas, and the default captions.
    #[must_use]
    pub fn new(config: StudioConfig, capabilities: Capabilities) -> Self {
        let mut composition = Composition::new(config.canvas);
        composition.replace_texts(TextLayer::default_captions());
        Self {
            config,
            capabilities,
            composition,
            adjustments: Adjustments::default(),
            current: None,
            saved: HashMap::new(),
            probes: ProbeTracker::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn composition_mut(&mut self) -> &mut Composition {
        &mut self.composition
    }

    #[must_use]
    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn adjustments_mut(&mut self) -> &mut Adjustments {
        &mut self.adjustments
    }

    #[must_use]
    pub fn current_source(&self) -> Option<&SourceKey> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    #[must_use]
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.probes.generation()
    }

    /// Whether the active source is a studio session.
    #[must_use]
    pub fn in_studio(&self) -> bool {
        self.current.as_ref().is_some_and(|k| k.kind == SourceKind::Studio)
    }

    /// Captions saved for a source that is not currently active.
    #[must_use]
    pub fn saved_texts(&self, key: &SourceKey) -> Option<&[TextLayer]> {
        self.saved.get(key).map(|s| s.texts.as_slice())
    }

    // --- Switching ---

    /// Make `key` the active source.
    ///
    /// Returns the probe tickets the host must resolve for images the new
    /// source placed without an explicit size.
    pub fn switch_to(&mut self, key: SourceKey, content: SourceContent) -> Vec<ProbeTicket> {
        self.snapshot_current();
        self.probes.bump_generation();
        tracing::debug!(from = ?self.current.as_ref().map(ToString::to_string), to = %key, "switching source");

        let saved = self.saved.remove(&key);
        let mut tickets = Vec::new();
        let sources = content.into_sources();

        if key.kind == SourceKind::Studio {
            match saved.as_ref().and_then(|s| s.studio.clone()) {
                Some(studio) => {
                    self.composition.restore_images(studio.images);
                    self.composition.set_canvas_size(studio.canvas);
                    self.adjustments = studio.adjustments;
                    for (layer, placement) in studio.pending {
                        if self.composition.image(&layer).is_some() {
                            tickets.push(self.probes.issue(layer, placement));
                        }
                    }
                    if !sources.is_empty() {
                        tracing::debug!(key = %key, "studio restored; seed images ignored");
                    }
                }
                None => {
                    self.composition.clear_images();
                    self.composition.set_canvas_size(self.config.canvas);
                    self.adjustments.reset();
                    for source in sources {
                        let (_, ticket) = self.add_image(source, None);
                        tickets.extend(ticket);
                    }
                }
            }
        } else {
            self.composition.clear_images();
            self.composition.set_canvas_size(self.config.canvas);
            self.adjustments.reset();
            if let Some(source) = sources.into_iter().next() {
                let id = self.composition.set_base_image(source);
                tickets.push(self.probes.issue(id, Placement::FillCanvas));
            }
        }

        let texts = saved.map_or_else(TextLayer::default_captions, |s| s.texts);
        self.composition.replace_texts(texts);
        self.composition.select(None);
        self.current = Some(key);
        tickets
    }

    fn snapshot_current(&mut self) {
        let Some(key) = self.current.clone() else {
            return;
        };
        let studio = (key.kind == SourceKind::Studio).then(|| SavedStudio {
            images: self.composition.images().to_vec(),
            canvas: self.composition.canvas,
            adjustments: self.adjustments,
            pending: self.probes.pending(),
        });
        let texts = self.composition.texts().to_vec();
        self.saved.insert(key, SavedSource { texts, studio });
    }

    /// Canvas back to the default size and adjustments back to neutral.
    /// Layers are kept.
    pub fn reset_editor(&mut self) {
        self.composition.set_canvas_size(self.config.canvas);
        self.adjustments.reset();
    }

    // --- Image layers ---

    /// Add an image the way the current capabilities dictate, selecting it.
    ///
    /// A ticket is returned when the layer's final size depends on probing.
    pub fn add_image(&mut self, source: impl Into<String>, rect: Option<Rect>) -> (LayerId, Option<ProbeTicket>) {
        if !self.capabilities.multi_layer {
            let id = self.composition.set_base_image(source);
            self.composition.select(Some(LayerRef::Image(id)));
            return (id, Some(self.probes.issue(id, Placement::FillCanvas)));
        }
        let (id, placement) = self.composition.add_image_layer(source, rect, &self.config.placement);
        let ticket = (placement != Placement::Given).then(|| self.probes.issue(id, placement));
        (id, ticket)
    }

    /// Remove an image layer and withdraw any probe for it.
    pub fn remove_image(&mut self, id: &LayerId) -> Option<ImageLayer> {
        self.probes.forget(id);
        self.composition.remove_layer(id)
    }

    /// Apply a probe result reported by the host.
    ///
    /// Stale or superseded tickets are rejected without touching anything.
    /// A failed measurement applies the fallback size.
    pub fn complete_probe(
        &mut self,
        ticket: &ProbeTicket,
        result: Result<Size, ProbeError>,
    ) -> Result<ProbeOutcome, ProbeError> {
        self.probes.accept(ticket)?;
        let layer = ticket.layer;
        let natural = match result {
            Ok(size) => Some(size),
            Err(err) => {
                tracing::warn!(layer_id = %layer, error = %err, "natural size unavailable; using fallback");
                None
            }
        };
        let canvas_before = self.composition.canvas;
        if !self.composition.apply_natural_size(&layer, ticket.placement, natural, &self.config.placement) {
            tracing::debug!(layer_id = %layer, "probe result for removed layer discarded");
            return Ok(ProbeOutcome::LayerGone { layer });
        }
        if natural.is_none() {
            return Ok(ProbeOutcome::FellBack { layer });
        }
        let canvas_resized = self.composition.canvas != canvas_before;
        if canvas_resized {
            let canvas = self.composition.canvas;
            tracing::info!(layer_id = %layer, width = canvas.width, height = canvas.height, "canvas sized to image");
        }
        Ok(ProbeOutcome::Applied { layer, canvas_resized })
    }
}
