// tdoa_core/src/anchors.rs

//! Fixed, surveyed anchor positions, addressable by index.
//!
//! Anchors are configuration rather than estimated state. A slot is either
//! configured with a 3D position or explicitly empty; the filter refuses to fuse
//! a measurement against an empty slot.

use nalgebra::Point3;

use crate::error::FilterError;
use crate::types::{AnchorIndex, Position};

/// Default number of anchor slots.
pub const DEFAULT_MAX_ANCHORS: usize = 8;

/// The factory anchor layout (index, x, y, z), in meters.
pub const DEFAULT_ANCHOR_LAYOUT: [(AnchorIndex, [f64; 3]); 4] = [
    (0, [4.628, 0.600, 1.312]),
    (1, [4.628, 3.810, 1.297]),
    (2, [0.043, 4.210, 1.302]),
    (3, [0.123, 1.673, 1.903]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct AnchorRegistry {
    slots: Vec<Option<Position>>,
}

impl AnchorRegistry {
    /// Creates a registry with `capacity` empty slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Creates a registry of `DEFAULT_MAX_ANCHORS` slots holding the factory layout.
    pub fn with_default_layout() -> Self {
        let mut registry = Self::new(DEFAULT_MAX_ANCHORS);
        registry.load_default_layout();
        registry
    }

    /// Writes the factory layout into slots 0..4, leaving any other slot alone.
    pub fn load_default_layout(&mut self) {
        for (index, [x, y, z]) in DEFAULT_ANCHOR_LAYOUT {
            if let Some(slot) = self.slots.get_mut(index) {
                *slot = Some(Point3::new(x, y, z));
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of configured slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_anchor_position(
        &mut self,
        index: AnchorIndex,
        position: Position,
    ) -> Result<(), FilterError> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(FilterError::AnchorIndexOutOfRange { index, capacity })?;
        *slot = Some(position);
        Ok(())
    }

    pub fn clear_anchor(&mut self, index: AnchorIndex) -> Result<(), FilterError> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(FilterError::AnchorIndexOutOfRange { index, capacity })?;
        *slot = None;
        Ok(())
    }

    /// The stored position, or `None` when the slot is empty or out of range.
    pub fn anchor_position(&self, index: AnchorIndex) -> Option<Position> {
        self.slots.get(index).copied().flatten()
    }

    /// Like `anchor_position`, but reports why a position is unavailable.
    pub fn require(&self, index: AnchorIndex) -> Result<Position, FilterError> {
        match self.slots.get(index) {
            Some(Some(position)) => Ok(*position),
            Some(None) => Err(FilterError::UnconfiguredAnchor { index }),
            None => Err(FilterError::AnchorIndexOutOfRange {
                index,
                capacity: self.capacity(),
            }),
        }
    }

    /// Iterates over configured anchors in index order.
    pub fn configured(&self) -> impl Iterator<Item = (AnchorIndex, Position)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|p| (index, *p)))
    }
}

impl Default for AnchorRegistry {
    fn default() -> Self {
        Self::with_default_layout()
    }
}
