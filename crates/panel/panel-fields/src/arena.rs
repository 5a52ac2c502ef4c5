//! Fixed-capacity field storage
//!
//! Every field lives in one arena owned by the main window. Windows and
//! press records refer to fields by [`FieldId`], so a chain can be shared
//! or extended without any field being owned twice.

use heapless::Vec;

use crate::error::PanelError;
use crate::field::Field;

/// Maximum number of fields across all pages and popups.
pub const MAX_FIELDS: usize = 256;

/// Handle to a field in a [`FieldArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldId(u16);

impl FieldId {
    /// Position of the field in insertion order.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Insertion-ordered, never-shrinking field store.
pub struct FieldArena {
    fields: Vec<Field, MAX_FIELDS>,
}

impl FieldArena {
    /// Empty arena.
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Move `field` into the arena.
    pub fn insert(&mut self, field: Field) -> Result<FieldId, PanelError> {
        let id = u16::try_from(self.fields.len()).map_err(|_| PanelError::ArenaFull)?;
        self.fields.push(field).map_err(|_| PanelError::ArenaFull)?;
        Ok(FieldId(id))
    }

    /// The field behind `id`.
    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.index())
    }

    /// Mutable access to the field behind `id`.
    pub fn get_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.get_mut(id.index())
    }

    /// Number of fields stored.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every field with its handle, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(i, f)| u16::try_from(i).ok().map(|i| (FieldId(i), f)))
    }
}

impl Default for FieldArena {
    fn default() -> Self {
        Self::new()
    }
}
