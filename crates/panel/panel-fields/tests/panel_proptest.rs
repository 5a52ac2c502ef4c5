//! Property-based tests for visibility, redraw and hit testing.
//! Verifies invariants hold for arbitrary layouts and operation sequences.

#![allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::ContainsPoint;
use panel_fields::prelude::*;
use panel_testing::TestCanvas;
use proptest::prelude::*;

const EV: EventCode = EventCode(5);

/// Up to six buttons on a coarse grid, so overlaps happen often.
fn layout() -> impl Strategy<Value = Vec<(u16, u16)>> {
    prop::collection::vec((0u16..8, 0u16..8), 1..6)
        .prop_map(|cells| cells.into_iter().map(|(cx, cy)| (cx * 40, cy * 25)).collect())
}

fn build(cells: &[(u16, u16)]) -> (MainWindow, Vec<FieldId>) {
    let style = Style::DEFAULT;
    let mut mw = MainWindow::new(480, 272, colour::BLACK);
    let ids = cells
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            let param = i32::try_from(i).unwrap();
            mw.add_field(Field::text_button(&style, x, y, 60, "b", EV, param)).unwrap()
        })
        .collect();
    (mw, ids)
}

proptest! {
    /// `visible` always equals the flag AND NOT obscured, whatever the
    /// sequence of show calls and popup changes.
    #[test]
    fn visible_matches_flag_and_popup(
        cells in layout(),
        ops in prop::collection::vec((0usize..6, any::<bool>(), prop::option::of((0i32..400, 0i32..200))), 0..20),
    ) {
        let (mut mw, ids) = build(&cells);
        let popup = mw.add_popup(80, 60, colour::BLUE, colour::WHITE).unwrap();
        for (which, shown, popup_at) in ops {
            let id = ids[which % ids.len()];
            mw.show(id, shown);
            match popup_at {
                Some((x, y)) => mw.set_popup(popup, Point::new(x, y)).unwrap(),
                None => mw.clear_popup(),
            }
            for &id in &ids {
                let field = mw.field(id).unwrap();
                let obscured = mw
                    .active_popup()
                    .is_some_and(|p| panel_fields::window::overlaps(p.rect(), field.bounds()));
                prop_assert_eq!(mw.obscured_by_popup(id), obscured);
                prop_assert_eq!(mw.visible(id), field.is_visible() && !obscured);
            }
        }
    }

    /// After a partial refresh without popups, no visible field is left changed,
    /// and a second partial refresh draws nothing.
    #[test]
    fn partial_refresh_clears_changed(cells in layout(), touched in prop::collection::vec(0usize..6, 0..6)) {
        let (mut mw, ids) = build(&cells);
        let mut t = TestCanvas::new(480, 272);
        mw.refresh(&mut t, true).unwrap();
        for i in touched {
            mw.redraw(ids[i % ids.len()]);
        }
        mw.refresh(&mut t, false).unwrap();
        for &id in &ids {
            prop_assert!(!mw.field(id).unwrap().is_changed());
        }
        t.clear_log();
        mw.refresh(&mut t, false).unwrap();
        prop_assert!(t.ops().is_empty());
    }

    /// Hit testing returns the earliest inserted visible button containing
    /// the point, or nothing.
    #[test]
    fn find_event_is_first_match(cells in layout(), x in 0i32..480, y in 0i32..272) {
        let (mw, ids) = build(&cells);
        let expected = ids
            .iter()
            .copied()
            .find(|&id| mw.field(id).unwrap().bounds().contains(Point::new(x, y)));
        let hit = mw.find_event(x, y);
        prop_assert_eq!(hit.field(), expected);
        if let Some(id) = expected {
            prop_assert_eq!(hit.i_param(mw.arena()), i32::try_from(id.index()).unwrap());
        }
    }

    /// Row sub-index is the step offset, clamped to the last button.
    #[test]
    fn row_index_within_bounds(step in 1u16..40, width in 1u16..40, dx in 0i32..400) {
        let mut mw = MainWindow::new(480, 272, colour::BLACK);
        let row = mw
            .add_field(Field::char_button_row(&Style::DEFAULT, 0, 0, width, step, "abcdef", EV))
            .unwrap();
        let hit = mw.find_event(dx, 5);
        let span = i32::from(mw.field(row).unwrap().width());
        if dx < span {
            prop_assert!(hit.is_valid());
            let expected = usize::try_from(dx / i32::from(step)).unwrap().min(5);
            prop_assert_eq!(hit.index(), expected);
        } else {
            prop_assert!(!hit.is_valid());
        }
    }
}
