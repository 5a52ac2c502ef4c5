//! Panel construction errors
//!
//! Storage is fixed-capacity, so running out of room is the only thing that
//! can go wrong while building pages. Rendering errors are the canvas's own
//! error type and are passed through untouched.

use crate::arena::MAX_FIELDS;
use crate::popup::MAX_POPUPS;
use crate::window::MAX_CHAIN;

/// Why a field, chain or popup could not be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// Every field slot is taken.
    #[error("field arena is full ({} fields)", MAX_FIELDS)]
    ArenaFull,
    /// A window's field chain is at capacity.
    #[error("field chain is full ({} fields)", MAX_CHAIN)]
    ChainFull,
    /// Every popup slot is taken.
    #[error("too many popups ({} max)", MAX_POPUPS)]
    TooManyPopups,
    /// The popup handle does not belong to this main window.
    #[error("unknown popup {0}")]
    UnknownPopup(u8),
}
