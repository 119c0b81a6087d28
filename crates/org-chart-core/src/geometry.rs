//! Card geometry lookup
//!
//! Cards record where they were painted; the connector overlay reads those
//! rects back by member id. A missing entry means the card is not on screen
//! (yet) and the overlay skips it.

use crate::model::MemberId;
use emath::Rect;
use std::collections::HashMap;

/// Anything that can answer "where is this member's card right now"
pub trait GeometrySource {
    fn card_rect(&self, id: &MemberId) -> Option<Rect>;
}

impl GeometrySource for HashMap<MemberId, Rect> {
    fn card_rect(&self, id: &MemberId) -> Option<Rect> {
        self.get(id).copied()
    }
}

impl<G: GeometrySource + ?Sized> GeometrySource for &G {
    fn card_rect(&self, id: &MemberId) -> Option<Rect> {
        (**self).card_rect(id)
    }
}

/// Rects of the cards painted this frame, keyed by member id
#[derive(Debug, Clone, Default)]
pub struct CardGeometry {
    rects: HashMap<MemberId, Rect>,
    revision: u64,
}

impl CardGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a card's rect; the revision only moves when the rect changed
    pub fn record(&mut self, id: &MemberId, rect: Rect) {
        match self.rects.get_mut(id) {
            Some(existing) if *existing == rect => {}
            Some(existing) => {
                *existing = rect;
                self.revision += 1;
            }
            None => {
                self.rects.insert(id.clone(), rect);
                self.revision += 1;
            }
        }
    }

    pub fn forget(&mut self, id: &MemberId) -> Option<Rect> {
        let removed = self.rects.remove(id);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    /// Drop entries for members that are no longer rendered
    pub fn retain(&mut self, mut keep: impl FnMut(&MemberId) -> bool) {
        let before = self.rects.len();
        self.rects.retain(|id, _| keep(id));
        if self.rects.len() != before {
            self.revision += 1;
        }
    }

    pub fn clear(&mut self) {
        if !self.rects.is_empty() {
            self.rects.clear();
            self.revision += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Bumped on every change; lets callers skip work on a still frame
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Union of all recorded rects
    pub fn bounds(&self) -> Option<Rect> {
        self.rects.values().copied().reduce(|a, b| a.union(b))
    }
}

impl GeometrySource for CardGeometry {
    fn card_rect(&self, id: &MemberId) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}
