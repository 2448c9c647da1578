//! Built-in reactions, caption fonts, and the browsable meme gallery.
//!
//! Gallery items are fetched by the host from whatever catalogue service it
//! uses; this module only filters, pages, and picks from them.

#[cfg(test)]
#[path = "catalogue_test.rs"]
mod catalogue_test;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::GALLERY_SCROLL_THRESHOLD;

/// A pickable picture: a reaction, a gallery meme, or a saved template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueItem {
    pub id: String,
    pub name: String,
    /// Image URL or data URI.
    pub image: String,
}

impl CatalogueItem {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), image: image.into() }
    }
}

/// Id of the reaction shown before the user picks anything.
pub const DEFAULT_REACTION: &str = "neutral";

const REACTIONS: [(&str, &str, &str); 7] = [
    ("neutral", "😐 Dr. Diwakar", "/default.jpg"),
    ("happy", "😂 Happy", "/happy.png"),
    ("angry", "😡 Angry", "/angry.png"),
    ("sad", "😭 Sad", "/sad.png"),
    ("shocked", "😱 Shock", "/shocked.png"),
    ("cool", "😎 Cool", "/cool.png"),
    ("confused", "😵 Confused", "/confused.png"),
];

/// The built-in reaction faces, in picker order.
#[must_use]
pub fn reactions() -> Vec<CatalogueItem> {
    REACTIONS.iter().map(|(id, name, image)| CatalogueItem::new(*id, *name, *image)).collect()
}

/// Reaction by id, falling back to the default one.
#[must_use]
pub fn reaction(id: &str) -> CatalogueItem {
    let (id, name, image) = REACTIONS.iter().find(|r| r.0 == id).copied().unwrap_or(REACTIONS[0]);
    CatalogueItem::new(id, name, image)
}

/// A caption font choice: display name and CSS `font-family` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontOption {
    pub name: &'static str,
    pub value: &'static str,
}

pub const FONTS: [FontOption; 7] = [
    FontOption { name: "Impact", value: "Impact" },
    FontOption { name: "Arial", value: "Arial" },
    FontOption { name: "Comic Sans", value: "\"Comic Sans MS\", cursive" },
    FontOption { name: "Montserrat", value: "\"Montserrat\", sans-serif" },
    FontOption { name: "Courier", value: "Courier New" },
    FontOption { name: "Verdana", value: "Verdana, sans-serif" },
    FontOption { name: "Times New Roman", value: "\"Times New Roman\", serif" },
];

/// Searchable, batch-revealed list of gallery items.
///
/// With an empty query the list never runs dry: once every item is shown,
/// further batches wrap around to the start.
#[derive(Debug, Clone)]
pub struct Gallery {
    items: Vec<CatalogueItem>,
    query: String,
    /// Indices into `items` matching the query.
    matches: Vec<usize>,
    /// Indices into `items` revealed so far, repeats allowed.
    visible: Vec<usize>,
    batch_size: usize,
    /// Index into `items` of the meme the gallery tab shows.
    selected: Option<usize>,
}

impl Gallery {
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            matches: Vec::new(),
            visible: Vec::new(),
            batch_size: batch_size.max(1),
            selected: None,
        }
    }

    /// Replace the catalogue. The first item becomes the selection and is returned.
    pub fn load(&mut self, items: Vec<CatalogueItem>) -> Option<&CatalogueItem> {
        self.items = items;
        self.refilter();
        self.selected = (!self.items.is_empty()).then_some(0);
        self.selected()
    }

    /// The meme the gallery tab shows.
    #[must_use]
    pub fn selected(&self) -> Option<&CatalogueItem> {
        self.selected.and_then(|i| self.items.get(i))
    }

    /// Make `id` the selection. Unknown ids leave it unchanged.
    pub fn select(&mut self, id: &str) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Filter by case-insensitive name substring; a blank query shows all.
    /// Resets the revealed list to the first batch.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    fn refilter(&mut self) {
        let needle = self.query.trim().to_lowercase();
        self.matches = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.visible = self.matches.iter().copied().take(self.batch_size).collect();
    }

    /// Items matching the current query.
    #[must_use]
    pub fn matching_count(&self) -> usize {
        self.matches.len()
    }

    /// Items revealed so far, in display order.
    pub fn visible(&self) -> impl Iterator<Item = &CatalogueItem> + '_ {
        self.visible.iter().filter_map(|&i| self.items.get(i))
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Reveal the next batch. Returns how many items were appended.
    pub fn load_more(&mut self) -> usize {
        let shown = self.visible.len();
        let total = self.matches.len();
        let batch: Vec<usize> = if shown < total {
            self.matches.iter().copied().skip(shown).take(self.batch_size).collect()
        } else if self.query.is_empty() && total > 0 {
            self.matches.iter().copied().skip(shown % total).take(self.batch_size).collect()
        } else {
            Vec::new()
        };
        let added = batch.len();
        self.visible.extend(batch);
        added
    }

    /// Whether a scroll position is close enough to the bottom to load more.
    #[must_use]
    pub fn near_bottom(scroll_top: f64, scroll_height: f64, client_height: f64) -> bool {
        scroll_top + client_height >= scroll_height - GALLERY_SCROLL_THRESHOLD
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&CatalogueItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Uniformly random item from the whole catalogue, ignoring the query.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&CatalogueItem> {
        if self.items.is_empty() {
            return None;
        }
        self.items.get(rng.random_range(0..self.items.len()))
    }
}
