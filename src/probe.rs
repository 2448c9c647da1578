//! Natural-size probing tickets.
//!
//! Loading an image to learn its natural size is asynchronous and owned by
//! the host. Each request carries a ticket; a result is applied only when
//! its ticket is still the newest one for that layer within the current
//! generation. Switching the content source starts a new generation, which
//! orphans every outstanding ticket.

#[cfg(test)]
#[path = "probe_test.rs"]
mod probe_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::layers::{LayerId, Placement};

/// Identifies one outstanding probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTicket {
    pub generation: u64,
    pub seq: u64,
    pub layer: LayerId,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbeError {
    #[error("image failed to load: {0}")]
    Failed(String),
    #[error("image reported unusable size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("probe from generation {ticket} is stale (current {current})")]
    StaleGeneration { ticket: u64, current: u64 },
    #[error("probe {seq} for layer {layer} was superseded or withdrawn")]
    Superseded { layer: LayerId, seq: u64 },
}

/// Validate a size reported by the host.
pub fn natural_size(width: f64, height: f64) -> Result<Size, ProbeError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(Size::new(width, height))
    } else {
        Err(ProbeError::InvalidSize { width, height })
    }
}

#[derive(Debug, Default)]
pub struct ProbeTracker {
    generation: u64,
    next_seq: u64,
    /// Newest outstanding seq and placement per layer.
    pending: HashMap<LayerId, (u64, Placement)>,
}

impl ProbeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Layers still waiting for a result, with the placement they asked for.
    #[must_use]
    pub fn pending(&self) -> Vec<(LayerId, Placement)> {
        self.pending.iter().map(|(layer, (_, placement))| (*layer, *placement)).collect()
    }

    /// Issue a ticket for `layer`, superseding any earlier one for it.
    pub fn issue(&mut self, layer: LayerId, placement: Placement) -> ProbeTicket {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.pending.insert(layer, (seq, placement));
        tracing::debug!(layer_id = %layer, generation = self.generation, seq, "probe issued");
        ProbeTicket { generation: self.generation, seq, layer, placement }
    }

    /// Redeem a ticket. Succeeds at most once per ticket.
    pub fn accept(&mut self, ticket: &ProbeTicket) -> Result<(), ProbeError> {
        if ticket.generation != self.generation {
            return Err(ProbeError::StaleGeneration { ticket: ticket.generation, current: self.generation });
        }
        match self.pending.get(&ticket.layer) {
            Some(&(seq, _)) if seq == ticket.seq => {
                self.pending.remove(&ticket.layer);
                Ok(())
            }
            _ => Err(ProbeError::Superseded { layer: ticket.layer, seq: ticket.seq }),
        }
    }

    /// Withdraw the outstanding ticket for a removed layer.
    pub fn forget(&mut self, layer: &LayerId) {
        self.pending.remove(layer);
    }

    /// Start a new generation; every outstanding ticket becomes stale.
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.pending.clear();
        self.generation
    }
}
