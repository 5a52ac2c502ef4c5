//! Touch routing and event dispatch
//!
//! [`PanelUi`] owns the main window and every page built into it. The touch
//! driver feeds it `touch_down`/`touch_up`; the machine controller feeds it
//! status values and acts on the [`Action`]s it returns.

use embedded_graphics::prelude::*;
use heapless::Vec;
use panel_fields::field::{text_buf, TextBuf};
use panel_fields::prelude::*;

use crate::builder::Layout;
use crate::config::{LayoutConfig, Palette};
use crate::events::Event;
use crate::navigation::{Navigator, Tab};
use crate::pages::{self, Pages, FILE_ROWS, HEATERS, MESSAGE_ROWS};

/// Most file names the file list holds.
pub const MAX_FILES: usize = 32;

/// Gap between a value button and the adjust popup opened for it.
const POPUP_GAP: i32 = 2;

/// Axis of a jog command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

/// Which popup a touch opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PopupKind {
    /// Integer adjust bar.
    Adjust,
    /// Volume bar.
    Volume,
    /// Baud rate choices.
    BaudRate,
    /// Jog and home buttons.
    Move,
    /// Command keyboard.
    Keyboard,
    /// File list.
    Files,
    /// Are-you-sure prompt.
    Confirm,
}

/// What the controller should do in response to a touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing for the controller; the panel handled it.
    None,
    /// Another page is now shown.
    TabChanged(Tab),
    /// A popup is now shown.
    PopupOpened(PopupKind),
    /// The open popup was closed.
    PopupDismissed,
    /// Send a G-code command as is.
    Command(&'static str),
    /// A value button was confirmed. `param` identifies which one of a kind
    /// (the heater index for temperatures).
    SetValue {
        /// Event of the confirmed button.
        event: Event,
        /// Button parameter.
        param: i32,
        /// New value.
        value: i32,
    },
    /// Relative move of one axis by `amount` mm.
    Jog {
        /// Axis to move.
        axis: Axis,
        /// Signed distance as sent in the command.
        amount: &'static str,
    },
    /// A key was typed into the command line.
    KeyTyped(char),
    /// A command typed on the keyboard.
    UserCommand(TextBuf),
    /// Start printing the named file.
    PrintFile(TextBuf),
    /// Save the panel settings.
    SaveSettings,
    /// Restore factory settings. Already confirmed.
    FactoryReset,
}

/// Action held back until the user answers Yes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirm {
    CancelPrint,
    FactoryReset,
}

/// The whole panel: pages, popups and interaction state.
pub struct PanelUi {
    mw: MainWindow,
    layout: Layout,
    pages: Pages,
    nav: Navigator,
    /// Button held down by the current touch.
    touched: ButtonPress,
    /// Value button whose adjust popup is open. Stays pressed meanwhile.
    adjusting: ButtonPress,
    confirm: Option<Confirm>,
    user_command: TextBuf,
    files: Vec<TextBuf, MAX_FILES>,
    file_scroll: usize,
    message_count: usize,
}

impl PanelUi {
    /// Build every page for a display described by `config`.
    pub fn new(config: LayoutConfig, palette: Palette, machine_name: &str) -> Result<Self, PanelError> {
        let layout = Layout::new(config, palette);
        let mut mw = MainWindow::new(config.display_width, config.display_height, palette.background);
        let pages = pages::build(&mut mw, &layout, machine_name)?;
        let mut ui = Self {
            mw,
            layout,
            pages,
            nav: Navigator::new(),
            touched: ButtonPress::NONE,
            adjusting: ButtonPress::NONE,
            confirm: None,
            user_command: TextBuf::new(),
            files: Vec::new(),
            file_scroll: 0,
            message_count: 0,
        };
        ui.press_tab(ui.nav.current(), true);
        Ok(ui)
    }

    /// The underlying main window.
    pub fn main_window(&self) -> &MainWindow {
        &self.mw
    }

    /// Handles to every page and field.
    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    /// Geometry and styles the pages were built with.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The tab whose page is shown.
    pub fn current_tab(&self) -> Tab {
        self.nav.current()
    }

    /// Command typed so far on the keyboard.
    pub fn user_command(&self) -> &str {
        &self.user_command
    }

    /// Repaint what changed since the last refresh.
    pub fn refresh<C: Canvas>(&mut self, canvas: &mut C, full: bool) -> Result<(), C::Error> {
        self.mw.refresh(canvas, full)
    }

    // ── Touch ────────────────────────────────────────────────────────────────

    /// Handle a finger landing at `(x, y)`.
    ///
    /// With a popup open, a touch outside it dismisses the popup and is then
    /// tested against the page underneath, ignoring what the popup covered.
    pub fn touch_down(&mut self, x: i32, y: i32) -> Action {
        let outside_popup = self.mw.active_popup().is_some() && !self.mw.popup_contains(Point::new(x, y));
        let press = if outside_popup {
            let hit = self.mw.find_event_outside_popup(x, y);
            self.dismiss_popup();
            if !hit.is_valid() {
                tracing::debug!(x, y, "touch outside popup");
                return Action::PopupDismissed;
            }
            hit
        } else {
            self.mw.find_event(x, y)
        };
        if !press.is_valid() {
            return Action::None;
        }
        self.release_touched();
        self.mw.press(press, true);
        self.touched = press;
        self.dispatch(press)
    }

    /// Handle the finger lifting. Releases the touched button unless it
    /// marks the current tab or an open adjust popup.
    pub fn touch_up(&mut self) {
        self.release_touched();
    }

    fn release_touched(&mut self) {
        let press = core::mem::take(&mut self.touched);
        if !press.is_valid() || press == self.adjusting || press.field() == self.pages.tab_button(self.nav.current()) {
            return;
        }
        self.mw.press(press, false);
    }

    /// Act on a press of a button. [`PanelUi::touch_down`] calls this after
    /// hit testing; it is public so other input sources can drive buttons.
    pub fn dispatch(&mut self, press: ButtonPress) -> Action {
        let arena = self.mw.arena();
        let code = press.event(arena);
        let param = press.param(arena);
        let Some(event) = Event::from_code(code) else {
            tracing::warn!(code = code.0, "unknown event code");
            return Action::None;
        };
        tracing::debug!(
            code = code.0,
            int_param = param.as_integer(),
            text_param = param.as_text().unwrap_or(""),
            "dispatch"
        );

        match event {
            Event::Null => Action::None,
            Event::TabControl | Event::TabPrint | Event::TabConsole | Event::TabSetup => {
                Tab::from_event(event).map_or(Action::None, |tab| self.select_tab(tab))
            }
            Event::AdjustActiveTemp
            | Event::AdjustStandbyTemp
            | Event::AdjustSpeed
            | Event::AdjustExtrusion
            | Event::AdjustFan => self.open_adjust(press, self.pages.popups.adjust, PopupKind::Adjust),
            Event::SetVolume => self.open_adjust(press, self.pages.popups.volume, PopupKind::Volume),
            Event::AdjustInt => {
                if let Some(id) = self.adjusting.field() {
                    self.mw.increment(id, param.as_integer());
                }
                Action::None
            }
            Event::SetInt => self.commit_adjust(),
            Event::SetBaudRate => self.open_adjust(press, self.pages.popups.baud_rate, PopupKind::BaudRate),
            Event::AdjustVolume | Event::AdjustBaudRate => {
                if let Some(id) = self.adjusting.field() {
                    self.mw.set_value(id, param.as_integer());
                }
                self.commit_adjust()
            }
            Event::SendCommand | Event::PausePrint | Event::ResumePrint => {
                param.as_text().map_or(Action::None, Action::Command)
            }
            Event::Move => self.open_centred(self.pages.popups.movement, PopupKind::Move),
            Event::MoveX | Event::MoveY | Event::MoveZ => {
                let axis = match event {
                    Event::MoveX => Axis::X,
                    Event::MoveY => Axis::Y,
                    _ => Axis::Z,
                };
                param
                    .as_text()
                    .map_or(Action::None, |amount| Action::Jog { axis, amount })
            }
            Event::ListFiles => {
                self.file_scroll = 0;
                self.update_file_rows();
                self.open_centred(self.pages.popups.files, PopupKind::Files)
            }
            Event::ScrollFiles => {
                self.scroll_files(param.as_integer());
                Action::None
            }
            Event::FileSelected => {
                let chosen = usize::try_from(param.as_integer())
                    .ok()
                    .and_then(|row| self.files.get(self.file_scroll.saturating_add(row)))
                    .cloned();
                self.dismiss_popup();
                chosen.map_or(Action::None, Action::PrintFile)
            }
            Event::CancelPrint => self.ask(Confirm::CancelPrint, "Cancel print", "Abandon the current print?"),
            Event::Keyboard => self.open_centred(self.pages.popups.keyboard, PopupKind::Keyboard),
            Event::Key => {
                let Some(c) = u32::try_from(param.as_integer()).ok().and_then(char::from_u32) else {
                    return Action::None;
                };
                if self.user_command.push(c).is_err() {
                    return Action::None;
                }
                self.show_user_command();
                Action::KeyTyped(c)
            }
            Event::Backspace => {
                self.user_command.pop();
                self.show_user_command();
                Action::None
            }
            Event::SendUserCommand => {
                if self.user_command.is_empty() {
                    return Action::None;
                }
                let command = core::mem::take(&mut self.user_command);
                self.show_user_command();
                self.dismiss_popup();
                Action::UserCommand(command)
            }
            Event::SaveSettings => Action::SaveSettings,
            Event::FactoryReset => self.ask(Confirm::FactoryReset, "Factory reset", "Erase all settings?"),
            Event::Yes => {
                let confirmed = self.confirm.take();
                self.dismiss_popup();
                match confirmed {
                    Some(Confirm::CancelPrint) => Action::Command("M0"),
                    Some(Confirm::FactoryReset) => Action::FactoryReset,
                    None => Action::None,
                }
            }
            Event::Cancel => {
                self.dismiss_popup();
                Action::PopupDismissed
            }
        }
    }

    // ── Tabs and popups ──────────────────────────────────────────────────────

    /// Show `tab`'s page. The tab button stays pressed while its page is shown.
    pub fn select_tab(&mut self, tab: Tab) -> Action {
        let Some(previous) = self.nav.select(tab) else {
            return Action::None;
        };
        self.dismiss_popup();
        self.press_tab(previous, false);
        self.press_tab(tab, true);
        self.mw.set_root(self.pages.chain(tab).clone());
        tracing::debug!(tab = tab.label(), "tab selected");
        Action::TabChanged(tab)
    }

    fn press_tab(&mut self, tab: Tab, pressed: bool) {
        if let Some(id) = self.pages.tab_button(tab) {
            self.mw.press(ButtonPress::new(id, 0), pressed);
        }
    }

    /// Close the open popup, if any, and release the button that opened it.
    pub fn dismiss_popup(&mut self) {
        self.mw.clear_popup();
        if self.adjusting.is_valid() {
            self.mw.press(self.adjusting, false);
            self.adjusting.clear();
        }
        self.confirm = None;
    }

    fn show_popup(&mut self, popup: PopupId, origin: Point, kind: PopupKind) -> Action {
        match self.mw.set_popup(popup, origin) {
            Ok(()) => Action::PopupOpened(kind),
            Err(e) => {
                tracing::warn!(error = %e, "popup not shown");
                Action::None
            }
        }
    }

    fn open_centred(&mut self, popup: PopupId, kind: PopupKind) -> Action {
        let size = self.mw.size();
        let origin = self.mw.popup(popup).map_or(Point::zero(), |p| {
            Point::new(
                i32::try_from(size.width).unwrap_or(0).saturating_sub(i32::from(p.width())) / 2,
                i32::try_from(size.height).unwrap_or(0).saturating_sub(i32::from(p.height())) / 2,
            )
        });
        self.show_popup(popup, origin, kind)
    }

    /// Open a value popup next to the button in `press`: below it when it
    /// fits, otherwise above, kept within the screen horizontally.
    fn open_adjust(&mut self, press: ButtonPress, popup: PopupId, kind: PopupKind) -> Action {
        let (Some(button), Some(p)) = (press.field().and_then(|id| self.mw.field(id)), self.mw.popup(popup)) else {
            return Action::None;
        };
        let b = button.bounds();
        let size = self.mw.size();
        let screen_w = i32::try_from(size.width).unwrap_or(0);
        let screen_h = i32::try_from(size.height).unwrap_or(0);
        let (w, h) = (i32::from(p.width()), i32::from(p.height()));
        let button_h = i32::try_from(b.size.height).unwrap_or(0);
        let button_w = i32::try_from(b.size.width).unwrap_or(0);

        let below = b.top_left.y.saturating_add(button_h).saturating_add(POPUP_GAP);
        let y = if below.saturating_add(h) <= screen_h {
            below
        } else {
            b.top_left.y.saturating_sub(h).saturating_sub(POPUP_GAP).max(0)
        };
        let x = b
            .top_left
            .x
            .saturating_add(button_w / 2)
            .saturating_sub(w / 2)
            .clamp(0, screen_w.saturating_sub(w).max(0));

        // Replacing an open adjust popup releases its button first.
        self.dismiss_popup();
        self.adjusting = press;
        self.mw.press(press, true);
        self.show_popup(popup, Point::new(x, y), kind)
    }

    fn commit_adjust(&mut self) -> Action {
        let adjusting = self.adjusting;
        let arena = self.mw.arena();
        let value = adjusting
            .field()
            .and_then(|id| self.mw.field(id))
            .and_then(Field::integer_value);
        let event = Event::from_code(adjusting.event(arena));
        let param = adjusting.i_param(arena);
        self.dismiss_popup();
        match (event, value) {
            (Some(event), Some(value)) => Action::SetValue { event, param, value },
            _ => Action::None,
        }
    }

    fn ask(&mut self, confirm: Confirm, title: &str, query: &str) -> Action {
        let popups = &self.pages.popups;
        let (popup, title_id, query_id) = (popups.confirm, popups.confirm_title, popups.confirm_query);
        self.mw.set_text(title_id, title);
        self.mw.set_text(query_id, query);
        let action = self.open_centred(popup, PopupKind::Confirm);
        self.confirm = Some(confirm);
        action
    }

    fn show_user_command(&mut self) {
        let id = self.pages.popups.user_command;
        let text = self.user_command.clone();
        self.mw.set_text(id, &text);
    }

    // ── File list ────────────────────────────────────────────────────────────

    /// Replace the file list. Names beyond [`MAX_FILES`] are dropped.
    pub fn set_files<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.files.clear();
        for name in names {
            if self.files.push(text_buf(name)).is_err() {
                tracing::warn!(max = MAX_FILES, "file list truncated");
                break;
            }
        }
        self.file_scroll = 0;
        self.update_file_rows();
    }

    /// Move the file list a page up (`direction < 0`) or down.
    fn scroll_files(&mut self, direction: i32) {
        if direction < 0 {
            self.file_scroll = self.file_scroll.saturating_sub(FILE_ROWS);
        } else if self.file_scroll.saturating_add(FILE_ROWS) < self.files.len() {
            self.file_scroll = self.file_scroll.saturating_add(FILE_ROWS);
        }
        self.update_file_rows();
    }

    fn update_file_rows(&mut self) {
        for row in 0..FILE_ROWS {
            let Some(&id) = self.pages.popups.file_rows.get(row) else {
                continue;
            };
            match self.files.get(self.file_scroll.saturating_add(row)) {
                Some(name) => {
                    let name = name.clone();
                    self.mw.set_text(id, &name);
                    self.mw.show(id, true);
                }
                None => self.mw.show(id, false),
            }
        }
    }

    // ── Status updates from the controller ───────────────────────────────────

    /// Show the machine status in the title bar.
    pub fn set_status(&mut self, status: &str) {
        self.mw.set_text(self.pages.status, status);
    }

    /// Show a heater's measured temperature.
    pub fn set_current_temp(&mut self, heater: usize, celsius: f32) {
        if let Some(&id) = self.pages.current_temps.get(heater) {
            self.mw.set_value(id, celsius);
        }
    }

    /// Active setpoint. Ignored while the user is adjusting that button.
    pub fn set_active_temp(&mut self, heater: usize, celsius: i32) {
        if let Some(&id) = self.pages.active_temps.get(heater) {
            self.set_unless_adjusting(id, celsius);
        }
    }

    /// Show a heater's standby set point. Ignored while the user adjusts it.
    pub fn set_standby_temp(&mut self, heater: usize, celsius: i32) {
        if let Some(&id) = self.pages.standby_temps.get(heater) {
            self.set_unless_adjusting(id, celsius);
        }
    }

    /// Show an axis position.
    pub fn set_position(&mut self, axis: Axis, mm: f32) {
        let index = match axis {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        };
        if let Some(&id) = self.pages.axes.get(index) {
            self.mw.set_value(id, mm);
        }
    }

    /// Show the speed factor.
    pub fn set_speed(&mut self, percent: i32) {
        self.set_unless_adjusting(self.pages.speed, percent);
    }

    /// Show the fan speed.
    pub fn set_fan(&mut self, percent: i32) {
        self.set_unless_adjusting(self.pages.fan, percent);
    }

    /// Show the extrusion factor.
    pub fn set_extrusion(&mut self, percent: i32) {
        self.set_unless_adjusting(self.pages.extrusion, percent);
    }

    /// Show the touch beep volume.
    pub fn set_volume(&mut self, volume: i32) {
        self.set_unless_adjusting(self.pages.volume, volume);
    }

    /// Show the controller link baud rate.
    pub fn set_baud_rate(&mut self, baud: i32) {
        self.set_unless_adjusting(self.pages.baud_rate, baud);
    }

    /// Show free memory on the Setup page.
    pub fn set_free_ram(&mut self, bytes: i32) {
        self.mw.set_value(self.pages.free_ram, bytes);
    }

    fn set_unless_adjusting(&mut self, id: FieldId, value: i32) {
        if self.adjusting.field() != Some(id) {
            self.mw.set_value(id, value);
        }
    }

    /// Print progress. `None` hides the bar.
    pub fn set_progress(&mut self, percent: Option<u8>) {
        let id = self.pages.progress;
        match percent {
            Some(p) => {
                self.mw.set_percent(id, p);
                self.mw.show(id, true);
            }
            None => self.mw.show(id, false),
        }
    }

    /// Estimated time remaining. `None` hides the line.
    pub fn set_time_left(&mut self, text: Option<&str>) {
        let id = self.pages.time_left;
        match text {
            Some(t) => {
                self.mw.set_text(id, t);
                self.mw.show(id, true);
            }
            None => self.mw.show(id, false),
        }
    }

    /// Append a line to the console log, scrolling older lines down.
    pub fn add_message(&mut self, time: &str, text: &str) {
        let times = self.pages.message_times.clone();
        let texts = self.pages.message_texts.clone();
        for row in (1..MESSAGE_ROWS).rev() {
            for column in [&times, &texts] {
                if let (Some(&from), Some(&to)) = (column.get(row.saturating_sub(1)), column.get(row)) {
                    let moved = self.field_text(from);
                    self.mw.set_text(to, &moved);
                }
            }
        }
        if let (Some(&t), Some(&m)) = (times.first(), texts.first()) {
            self.mw.set_text(t, time);
            self.mw.set_text(m, text);
        }
        self.message_count = self.message_count.saturating_add(1);
    }

    /// Messages received since startup.
    pub fn message_count(&self) -> usize {
        self.message_count
    }

    fn field_text(&self, id: FieldId) -> TextBuf {
        match self.mw.field(id).map(Field::kind) {
            Some(FieldKind::Text(t)) => text_buf(t.text()),
            _ => TextBuf::new(),
        }
    }

    // ── Status-driven visibility ─────────────────────────────────────────────

    /// Idle: offer the file list.
    pub fn show_files_button(&mut self) {
        let p = &self.pages;
        let (pause, resume, cancel, files) = (p.pause_button, p.resume_button, p.cancel_button, p.files_button);
        self.mw.show(pause, false);
        self.mw.show(resume, false);
        self.mw.show(cancel, false);
        self.mw.show(files, true);
    }

    /// Printing: offer pause.
    pub fn show_pause_button(&mut self) {
        let p = &self.pages;
        let (pause, resume, cancel, files) = (p.pause_button, p.resume_button, p.cancel_button, p.files_button);
        self.mw.show(resume, false);
        self.mw.show(cancel, false);
        self.mw.show(files, false);
        self.mw.show(pause, true);
    }

    /// Paused: offer resume and cancel.
    pub fn show_resume_and_cancel_buttons(&mut self) {
        let p = &self.pages;
        let (pause, resume, cancel, files) = (p.pause_button, p.resume_button, p.cancel_button, p.files_button);
        self.mw.show(pause, false);
        self.mw.show(files, false);
        self.mw.show(resume, true);
        self.mw.show(cancel, true);
    }

    /// Show the unsaved-settings warning unless `saved`.
    pub fn settings_saved(&mut self, saved: bool) {
        self.mw.show(self.pages.settings_warning, !saved);
    }

    /// Heaters in the temperature grid.
    pub fn heater_count(&self) -> usize {
        HEATERS
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Tests index known-length fixtures
mod tests {
    use super::*;

    fn ui() -> PanelUi {
        PanelUi::new(LayoutConfig::default(), Palette::DARK, "Test printer").unwrap()
    }

    /// A point inside field `id`.
    fn centre(ui: &PanelUi, id: FieldId) -> (i32, i32) {
        let c = ui.main_window().field(id).unwrap().bounds().center();
        (c.x, c.y)
    }

    /// Dispatch the last-built button raising `event`, wherever it lives.
    fn dispatch_event(ui: &mut PanelUi, event: Event) -> Action {
        let id = ui
            .main_window()
            .arena()
            .iter()
            .filter(|(_, f)| f.event() == event.code())
            .map(|(id, _)| id)
            .last()
            .unwrap();
        ui.dispatch(ButtonPress::new(id, 0))
    }

    fn tap(ui: &mut PanelUi, id: FieldId) -> Action {
        let (x, y) = centre(ui, id);
        let action = ui.touch_down(x, y);
        ui.touch_up();
        action
    }

    #[test]
    fn test_starts_on_control_with_tab_pressed() {
        let ui = ui();
        assert_eq!(ui.current_tab(), Tab::Control);
        let tab = ui.pages().tab_button(Tab::Control).unwrap();
        assert!(ui.main_window().field(tab).unwrap().is_pressed());
    }

    #[test]
    fn test_tab_switch_moves_pressed_tab() {
        let mut ui = ui();
        let print = ui.pages().tab_button(Tab::Print).unwrap();
        assert_eq!(tap(&mut ui, print), Action::TabChanged(Tab::Print));
        assert_eq!(ui.main_window().root(), &ui.pages().print);
        assert!(ui.main_window().field(print).unwrap().is_pressed());
        let control = ui.pages().tab_button(Tab::Control).unwrap();
        assert!(!ui.main_window().field(control).unwrap().is_pressed());
        // Reselecting is a no-op and keeps the tab pressed.
        assert_eq!(tap(&mut ui, print), Action::None);
        assert!(ui.main_window().field(print).unwrap().is_pressed());
    }

    #[test]
    fn test_adjust_and_set_temperature() {
        let mut ui = ui();
        let button = ui.pages().active_temps[1];
        ui.set_active_temp(1, 200);
        assert_eq!(tap(&mut ui, button), Action::PopupOpened(PopupKind::Adjust));
        assert!(ui.main_window().field(button).unwrap().is_pressed());

        // Controller updates are held off while adjusting.
        ui.set_active_temp(1, 150);
        let popup = ui.pages().popups.adjust;
        let plus_five = ui.main_window().popup(popup).unwrap().window().root()[4];
        let set = ui.main_window().popup(popup).unwrap().window().root()[2];
        let origin = ui.main_window().active_popup().unwrap().origin();
        let at = |ui: &PanelUi, id| {
            let b = ui.main_window().field(id).unwrap().bounds().center() + origin;
            (b.x, b.y)
        };
        let (x, y) = at(&ui, plus_five);
        assert_eq!(ui.touch_down(x, y), Action::None);
        ui.touch_up();
        assert_eq!(ui.main_window().field(button).unwrap().integer_value(), Some(205));

        let (x, y) = at(&ui, set);
        let action = ui.touch_down(x, y);
        ui.touch_up();
        assert_eq!(
            action,
            Action::SetValue {
                event: Event::AdjustActiveTemp,
                param: 1,
                value: 205
            }
        );
        assert!(ui.main_window().active_popup().is_none());
        assert!(!ui.main_window().field(button).unwrap().is_pressed());
    }

    #[test]
    fn test_touch_outside_popup_dismisses_it() {
        let mut ui = ui();
        let button = ui.pages().active_temps[0];
        tap(&mut ui, button);
        assert!(ui.main_window().active_popup().is_some());
        // Far corner of the title bar: no button there.
        assert_eq!(ui.touch_down(5, 5), Action::PopupDismissed);
        assert!(ui.main_window().active_popup().is_none());
        assert!(!ui.main_window().field(button).unwrap().is_pressed());
    }

    #[test]
    fn test_touch_outside_popup_reaches_tab() {
        let mut ui = ui();
        let button = ui.pages().standby_temps[0];
        tap(&mut ui, button);
        let setup = ui.pages().tab_button(Tab::Setup).unwrap();
        assert_eq!(tap(&mut ui, setup), Action::TabChanged(Tab::Setup));
        assert!(ui.main_window().active_popup().is_none());
    }

    #[test]
    fn test_home_button_sends_command() {
        let mut ui = ui();
        let mw = ui.main_window();
        let home = ui
            .pages()
            .control
            .iter()
            .copied()
            .find(|&id| mw.field(id).unwrap().event() == Event::SendCommand.code())
            .unwrap();
        let action = tap(&mut ui, home);
        assert_eq!(action, Action::Command("G28"));
        assert!(!ui.main_window().field(home).unwrap().is_pressed());
    }

    #[test]
    fn test_keyboard_typing_and_send() {
        let mut ui = ui();
        ui.select_tab(Tab::Console);
        assert_eq!(dispatch_event(&mut ui, Event::Keyboard), Action::PopupOpened(PopupKind::Keyboard));
        let origin = ui.main_window().active_popup().unwrap().origin();
        let kb = ui.pages().popups.keyboard;
        let rows: Vec<FieldId, 16> = ui.main_window().popup(kb).unwrap().window().root().iter().copied().collect();
        // Row "QWERTYUIOP": second key is 'W'.
        let row = ui.main_window().field(rows[2]).unwrap();
        let step = i32::from(ui.layout().config.key_step);
        let p = row.bounds().top_left + origin + Point::new(step + 2, 2);
        assert_eq!(ui.touch_down(p.x, p.y), Action::KeyTyped('W'));
        ui.touch_up();
        assert_eq!(ui.user_command(), "W");

        let action = dispatch_event(&mut ui, Event::SendUserCommand);
        assert_eq!(action, Action::UserCommand(text_buf("W")));
        assert_eq!(ui.user_command(), "");
        assert!(ui.main_window().active_popup().is_none());
    }

    #[test]
    fn test_cancel_print_needs_confirmation() {
        let mut ui = ui();
        ui.select_tab(Tab::Print);
        ui.show_resume_and_cancel_buttons();
        let cancel = ui.pages().cancel_button;
        assert_eq!(tap(&mut ui, cancel), Action::PopupOpened(PopupKind::Confirm));
        assert_eq!(dispatch_event(&mut ui, Event::Yes), Action::Command("M0"));

        tap(&mut ui, cancel);
        assert_eq!(dispatch_event(&mut ui, Event::Cancel), Action::PopupDismissed);
        assert_eq!(dispatch_event(&mut ui, Event::Yes), Action::None);
    }

    #[test]
    fn test_print_buttons_follow_state() {
        let mut ui = ui();
        let p = ui.pages().clone();
        let visible = |ui: &PanelUi, id| ui.main_window().field(id).unwrap().is_visible();
        ui.show_pause_button();
        assert!(visible(&ui, p.pause_button));
        assert!(!visible(&ui, p.files_button));
        ui.show_resume_and_cancel_buttons();
        assert!(!visible(&ui, p.pause_button));
        assert!(visible(&ui, p.resume_button) && visible(&ui, p.cancel_button));
        ui.show_files_button();
        assert!(visible(&ui, p.files_button));
        assert!(!visible(&ui, p.resume_button) && !visible(&ui, p.cancel_button));
    }

    #[test]
    fn test_file_list_scroll_and_select() {
        let mut ui = ui();
        let names = ["a.gcode", "b.gcode", "c.gcode", "d.gcode", "e.gcode", "f.gcode", "g.gcode"];
        ui.set_files(names);
        assert_eq!(dispatch_event(&mut ui, Event::ListFiles), Action::PopupOpened(PopupKind::Files));
        let rows = ui.pages().popups.file_rows.clone();
        assert!(ui.main_window().field(rows[4]).unwrap().is_visible());

        dispatch_event(&mut ui, Event::ScrollFiles);
        // Second page: two names, three hidden rows.
        assert!(ui.main_window().field(rows[1]).unwrap().is_visible());
        assert!(!ui.main_window().field(rows[2]).unwrap().is_visible());

        let action = ui.dispatch(ButtonPress::new(rows[1], 0));
        assert_eq!(action, Action::PrintFile(text_buf("g.gcode")));
        assert!(ui.main_window().active_popup().is_none());
    }

    #[test]
    fn test_volume_popup_sets_value() {
        let mut ui = ui();
        ui.select_tab(Tab::Setup);
        let volume = ui.pages().volume;
        assert_eq!(tap(&mut ui, volume), Action::PopupOpened(PopupKind::Volume));
        let popup = ui.pages().popups.volume;
        let three = ui.main_window().popup(popup).unwrap().window().root()[3];
        let action = ui.dispatch(ButtonPress::new(three, 0));
        assert_eq!(
            action,
            Action::SetValue {
                event: Event::SetVolume,
                param: 0,
                value: 3
            }
        );
    }

    #[test]
    fn test_baud_rate_popup_sets_value() {
        let mut ui = ui();
        ui.select_tab(Tab::Setup);
        ui.set_baud_rate(57600);
        let baud = ui.pages().baud_rate;
        assert_eq!(ui.main_window().field(baud).unwrap().integer_value(), Some(57600));
        assert_eq!(tap(&mut ui, baud), Action::PopupOpened(PopupKind::BaudRate));

        // The shown rate does not move while its popup is open.
        ui.set_baud_rate(9600);
        assert_eq!(ui.main_window().field(baud).unwrap().integer_value(), Some(57600));

        let popup = ui.pages().popups.baud_rate;
        let fastest = ui.main_window().popup(popup).unwrap().window().root()[4];
        let action = ui.dispatch(ButtonPress::new(fastest, 0));
        assert_eq!(
            action,
            Action::SetValue {
                event: Event::SetBaudRate,
                param: 0,
                value: 115200
            }
        );
        assert!(ui.main_window().active_popup().is_none());
    }

    #[test]
    fn test_messages_scroll_down() {
        let mut ui = ui();
        ui.add_message("12:00", "first");
        ui.add_message("12:01", "second");
        let texts = ui.pages().message_texts.clone();
        assert_eq!(ui.field_text(texts[0]).as_str(), "second");
        assert_eq!(ui.field_text(texts[1]).as_str(), "first");
        assert_eq!(ui.field_text(texts[2]).as_str(), "");
        assert_eq!(ui.message_count(), 2);
    }

    #[test]
    fn test_progress_and_warning_visibility() {
        let mut ui = ui();
        let (progress, warning) = (ui.pages().progress, ui.pages().settings_warning);
        ui.set_progress(Some(40));
        assert!(ui.main_window().field(progress).unwrap().is_visible());
        assert_eq!(ui.main_window().field(progress).unwrap().percent(), Some(40));
        ui.set_progress(None);
        assert!(!ui.main_window().field(progress).unwrap().is_visible());
        ui.settings_saved(false);
        assert!(ui.main_window().field(warning).unwrap().is_visible());
        ui.settings_saved(true);
        assert!(!ui.main_window().field(warning).unwrap().is_visible());
    }
}
