//! End-to-End Panel UI Tests
//!
//! Drives the reference pages through touches and controller updates and
//! checks what each refresh paints on a headless [`TestCanvas`].
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p panel-ui --test e2e_panel_ui
//! ```

#![allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use embedded_graphics::prelude::*;
use panel_fields::prelude::*;
use panel_testing::TestCanvas;
use panel_ui::{Action, LayoutConfig, Palette, PanelUi, PopupKind, Tab};

// ============================================================================
// Helpers
// ============================================================================

fn panel() -> (PanelUi, TestCanvas) {
    let config = LayoutConfig::DISPLAY_480X272;
    let ui = PanelUi::new(config, Palette::DARK, "Test printer").unwrap();
    let canvas = TestCanvas::new(u32::from(config.display_width), u32::from(config.display_height));
    (ui, canvas)
}

fn tap(ui: &mut PanelUi, id: FieldId) -> Action {
    let c = ui.main_window().field(id).unwrap().bounds().center();
    let action = ui.touch_down(c.x, c.y);
    ui.touch_up();
    action
}

// ============================================================================
// Pages
// ============================================================================

#[test]
fn first_refresh_paints_control_page() {
    let (mut ui, mut t) = panel();
    ui.refresh(&mut t, false).unwrap();
    for text in ["Control", "Print", "Console", "Setup", "Test printer", "Home all", "Move"] {
        assert!(t.drew_text(text), "missing {text}");
    }
    assert!(!t.drew_text("Files"));
}

#[test]
fn status_update_repaints_only_status() {
    let (mut ui, mut t) = panel();
    ui.refresh(&mut t, true).unwrap();
    t.clear_log();

    ui.set_status("Printing");
    ui.set_current_temp(1, 210.04);
    ui.refresh(&mut t, false).unwrap();
    assert_eq!(t.texts(), ["Printing", "210.0"]);

    t.clear_log();
    ui.refresh(&mut t, false).unwrap();
    assert!(t.ops().is_empty());
}

#[test]
fn tab_switch_paints_new_page() {
    let (mut ui, mut t) = panel();
    ui.refresh(&mut t, true).unwrap();
    t.clear_log();

    let print = ui.pages().tab_button(Tab::Print).unwrap();
    assert_eq!(tap(&mut ui, print), Action::TabChanged(Tab::Print));
    ui.refresh(&mut t, false).unwrap();
    assert!(t.drew_text("Files"));
    assert!(!t.drew_text("Home all"));
    // Progress bar and time left stay hidden until a print starts.
    assert!(!t.drew_text("time left: "));
}

#[test]
fn print_state_swaps_buttons_in_place() {
    let (mut ui, mut t) = panel();
    ui.select_tab(Tab::Print);
    ui.refresh(&mut t, false).unwrap();
    let files = ui.main_window().field(ui.pages().files_button).unwrap().bounds();
    t.clear_log();

    ui.show_pause_button();
    ui.refresh(&mut t, false).unwrap();
    assert_eq!(t.texts(), ["Pause print"]);
    t.assert_region_contains(files, Palette::DARK.pause_button_background).unwrap();

    t.clear_log();
    ui.show_resume_and_cancel_buttons();
    ui.refresh(&mut t, false).unwrap();
    assert_eq!(t.texts(), ["Resume", "Cancel"]);
}

#[test]
fn progress_appears_when_printing() {
    let (mut ui, mut t) = panel();
    ui.select_tab(Tab::Print);
    ui.refresh(&mut t, false).unwrap();
    let bar = ui.main_window().field(ui.pages().progress).unwrap().bounds();
    t.assert_region_uniform(bar, Palette::DARK.background).unwrap();

    ui.set_progress(Some(50));
    ui.set_time_left(Some("1h 20m"));
    t.clear_log();
    ui.refresh(&mut t, false).unwrap();
    assert_eq!(t.texts(), ["time left: 1h 20m"]);
    t.assert_region_contains(bar, Palette::DARK.progress_bar).unwrap();
}

// ============================================================================
// Popups
// ============================================================================

#[test]
fn adjust_popup_round_trip() {
    let (mut ui, mut t) = panel();
    ui.refresh(&mut t, true).unwrap();
    let button = ui.pages().active_temps[0];
    assert_eq!(tap(&mut ui, button), Action::PopupOpened(PopupKind::Adjust));

    t.clear_log();
    ui.refresh(&mut t, false).unwrap();
    for text in ["-5", "-1", "Set", "+1", "+5"] {
        assert!(t.drew_text(text), "missing {text}");
    }
    let popup = ui.main_window().active_popup().unwrap().rect();
    t.assert_region_contains(popup, Palette::DARK.popup_background).unwrap();

    // Tap on empty title bar: popup goes, its area is repainted.
    assert_eq!(ui.touch_down(5, 5), Action::PopupDismissed);
    ui.touch_up();
    t.clear_log();
    ui.refresh(&mut t, false).unwrap();
    assert_eq!(t.pixel_count_of_colour(popup, Palette::DARK.popup_background), 0);
    assert!(!t.drew_text("Set"));
}

#[test]
fn movement_popup_jogs_axes() {
    let (mut ui, mut t) = panel();
    ui.refresh(&mut t, true).unwrap();
    let mw = ui.main_window();
    let move_button = ui
        .pages()
        .control
        .iter()
        .copied()
        .find(|&id| mw.field(id).unwrap().event() == panel_ui::Event::Move.code())
        .unwrap();
    assert_eq!(tap(&mut ui, move_button), Action::PopupOpened(PopupKind::Move));

    let popup = ui.main_window().active_popup().unwrap();
    let origin = popup.origin();
    // Row 0: "X" label, then six jog buttons; the first is -50.
    let first_jog = popup.window().root()[1];
    let at = ui.main_window().field(first_jog).unwrap().bounds().center() + origin;
    let action = ui.touch_down(at.x, at.y);
    ui.touch_up();
    assert_eq!(
        action,
        Action::Jog {
            axis: panel_ui::Axis::X,
            amount: "-50"
        }
    );
    // Jogging leaves the popup open.
    assert!(ui.main_window().active_popup().is_some());
    ui.refresh(&mut t, false).unwrap();
}

#[test]
fn factory_reset_asks_first() {
    let (mut ui, mut t) = panel();
    ui.select_tab(Tab::Setup);
    ui.settings_saved(false);
    ui.refresh(&mut t, false).unwrap();
    assert!(t.drew_text("Some settings are not saved!"));

    let mw = ui.main_window();
    let reset = ui
        .pages()
        .setup
        .iter()
        .copied()
        .find(|&id| mw.field(id).unwrap().event() == panel_ui::Event::FactoryReset.code())
        .unwrap();
    assert_eq!(tap(&mut ui, reset), Action::PopupOpened(PopupKind::Confirm));
    t.clear_log();
    ui.refresh(&mut t, false).unwrap();
    assert!(t.drew_text("Erase all settings?"));

    let popup = ui.main_window().active_popup().unwrap();
    let yes = popup.window().root()[2];
    let at = ui.main_window().field(yes).unwrap().bounds().center() + popup.origin();
    assert_eq!(ui.touch_down(at.x, at.y), Action::FactoryReset);
    ui.touch_up();
    assert!(ui.main_window().active_popup().is_none());
}
