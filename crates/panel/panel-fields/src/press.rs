//! Touch hit records

use crate::arena::{FieldArena, FieldId};
use crate::field::{EventCode, HasEvent, Param};

/// Result of a hit test: which button field, and which sub-button of it.
///
/// The default value is the invalid press, returned when a touch lands on
/// nothing. Every accessor answers with a neutral value for it, so callers
/// can dispatch on [`ButtonPress::event`] without checking validity first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonPress {
    field: Option<FieldId>,
    index: u8,
}

impl ButtonPress {
    /// The invalid press.
    pub const NONE: Self = Self { field: None, index: 0 };

    /// Press of sub-button `index` of `field`.
    pub fn new(field: FieldId, index: usize) -> Self {
        Self {
            field: Some(field),
            index: u8::try_from(index).unwrap_or(u8::MAX),
        }
    }

    /// Clear back to the invalid press.
    pub fn clear(&mut self) {
        *self = Self::NONE;
    }

    /// Whether the press refers to a field.
    pub fn is_valid(&self) -> bool {
        self.field.is_some()
    }

    /// The pressed field.
    pub fn field(&self) -> Option<FieldId> {
        self.field
    }

    /// Sub-button index (0 for single buttons).
    pub fn index(&self) -> usize {
        usize::from(self.index)
    }

    fn source<'a>(&self, arena: &'a FieldArena) -> Option<&'a dyn HasEvent> {
        self.field
            .and_then(|id| arena.get(id))
            .and_then(|field| field.event_source())
    }

    /// Event code of the pressed field, or [`EventCode::NULL`].
    pub fn event(&self, arena: &FieldArena) -> EventCode {
        self.source(arena).map_or(EventCode::NULL, |s| s.event())
    }

    /// Parameter of the pressed sub-button, or integer 0.
    pub fn param(&self, arena: &FieldArena) -> Param {
        self.source(arena)
            .map_or_else(Param::default, |s| s.param(self.index()))
    }

    /// Integer parameter; 0 when invalid or when the parameter is text.
    pub fn i_param(&self, arena: &FieldArena) -> i32 {
        self.param(arena).as_integer()
    }

    /// Text parameter; empty when invalid or when the parameter is an integer.
    pub fn s_param(&self, arena: &FieldArena) -> &'static str {
        self.param(arena).as_text().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::style::Style;

    #[test]
    fn test_invalid_press_is_neutral() {
        let arena = FieldArena::new();
        let press = ButtonPress::default();
        assert!(!press.is_valid());
        assert_eq!(press.event(&arena), EventCode::NULL);
        assert_eq!(press.i_param(&arena), 0);
        assert_eq!(press.s_param(&arena), "");
    }

    #[test]
    fn test_row_press_reports_char() {
        let mut arena = FieldArena::new();
        let id = arena
            .insert(Field::char_button_row(&Style::DEFAULT, 0, 0, 20, 22, "xyz", EventCode(9)))
            .unwrap();
        let press = ButtonPress::new(id, 2);
        assert_eq!(press.event(&arena), EventCode(9));
        assert_eq!(press.i_param(&arena), 'z' as i32);
        assert_eq!(press.s_param(&arena), "");
    }

    #[test]
    fn test_text_param() {
        let mut arena = FieldArena::new();
        let id = arena
            .insert(Field::text_button(&Style::DEFAULT, 0, 0, 60, "Home", EventCode(4), "G28"))
            .unwrap();
        let mut press = ButtonPress::new(id, 0);
        assert_eq!(press.s_param(&arena), "G28");
        assert_eq!(press.i_param(&arena), 0);
        press.clear();
        assert_eq!(press, ButtonPress::NONE);
    }
}
