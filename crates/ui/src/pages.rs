//! Page and popup construction
//!
//! Every field is built once, here, at startup. The tab bar goes in first
//! so it is shared by all pages; each page then extends a copy of that
//! common chain and keeps the result as its own root.

use heapless::Vec;
use panel_fields::prelude::*;

use crate::builder::{
    add_hidden, add_integer_button, add_popup, add_text_button, create_int_popup_bar, create_string_button_row,
    row_slots, Layout,
};
use crate::events::Event;
use crate::navigation::Tab;

/// Number of heaters in the temperature grid.
pub const HEATERS: usize = 2;

/// Column captions of the temperature grid.
pub const HEATER_NAMES: [&str; HEATERS] = ["Bed", "Tool"];

/// Rows in the console message log.
pub const MESSAGE_ROWS: usize = 6;

const FILE_ROW_COUNT: u16 = 5;

/// File names visible at once in the file list popup.
pub const FILE_ROWS: usize = FILE_ROW_COUNT as usize;

/// Jog distances for the X and Y axes, in mm.
const XY_JOG_TEXTS: [&str; 6] = ["-50", "-5", "-0.5", "+0.5", "+5", "+50"];
const XY_JOG_PARAMS: [&str; 6] = ["-50", "-5", "-0.5", "0.5", "5", "50"];

/// Jog distances for the Z axis, in mm.
const Z_JOG_TEXTS: [&str; 6] = ["-5", "-0.5", "-0.05", "+0.05", "+0.5", "+5"];
const Z_JOG_PARAMS: [&str; 6] = ["-5", "-0.5", "-0.05", "0.05", "0.5", "5"];

/// Homing buttons of the control page: caption and G-code.
const HOME_BUTTONS: [(&str, &str); 5] = [
    ("Home all", "G28"),
    ("Home X", "G28 X0"),
    ("Home Y", "G28 Y0"),
    ("Home Z", "G28 Z0"),
    ("Bed comp", "G32"),
];

/// Baud rates offered for the controller link.
const BAUD_RATES: [i32; 5] = [9600, 19200, 38400, 57600, 115200];
const BAUD_RATE_TEXTS: [&str; 5] = ["9600", "19200", "38400", "57600", "115200"];

const KEYBOARD_ROWS: [&str; 4] = ["1234567890-+", "QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM./"];

/// Popups built at startup.
#[derive(Debug, Clone)]
pub struct Popups {
    /// -5 / -1 / Set / +1 / +5 bar for integer buttons.
    pub adjust: PopupId,
    /// Off / 1..5 bar for the volume button.
    pub volume: PopupId,
    /// Baud rate choices for the baud rate button.
    pub baud_rate: PopupId,
    /// Jog and home buttons.
    pub movement: PopupId,
    /// On-screen keyboard.
    pub keyboard: PopupId,
    /// Text of the command being typed.
    pub user_command: FieldId,
    /// File list.
    pub files: PopupId,
    /// One button per visible file name.
    pub file_rows: Vec<FieldId, FILE_ROWS>,
    /// Are-you-sure prompt.
    pub confirm: PopupId,
    /// Prompt title.
    pub confirm_title: FieldId,
    /// Prompt question.
    pub confirm_query: FieldId,
}

/// Handles to every page chain and to the fields the controller updates.
#[derive(Debug, Clone)]
pub struct Pages {
    /// Control page.
    pub control: Chain,
    /// Print page.
    pub print: Chain,
    /// Console page.
    pub console: Chain,
    /// Setup page.
    pub setup: Chain,

    /// Tab buttons, in [`Tab::ALL`] order.
    pub tabs: Vec<FieldId, 4>,

    // Title bar and temperatures, shared by Control and Print.
    /// Machine name.
    pub name: FieldId,
    /// Machine status.
    pub status: FieldId,
    /// Measured temperature per heater.
    pub current_temps: Vec<FieldId, HEATERS>,
    /// Active set point per heater.
    pub active_temps: Vec<FieldId, HEATERS>,
    /// Standby set point per heater.
    pub standby_temps: Vec<FieldId, HEATERS>,

    // Control
    /// X, Y, Z position readouts.
    pub axes: Vec<FieldId, 3>,

    // Print
    /// Extrusion factor button.
    pub extrusion: FieldId,
    /// Speed factor button.
    pub speed: FieldId,
    /// Fan speed button.
    pub fan: FieldId,
    /// Opens the file list.
    pub files_button: FieldId,
    /// Pauses the print.
    pub pause_button: FieldId,
    /// Resumes a paused print.
    pub resume_button: FieldId,
    /// Cancels a paused print.
    pub cancel_button: FieldId,
    /// Print progress bar.
    pub progress: FieldId,
    /// Estimated time left.
    pub time_left: FieldId,

    // Console
    /// Timestamp column of the message log, newest first.
    pub message_times: Vec<FieldId, MESSAGE_ROWS>,
    /// Text column of the message log, newest first.
    pub message_texts: Vec<FieldId, MESSAGE_ROWS>,

    // Setup
    /// Free memory readout.
    pub free_ram: FieldId,
    /// Unsaved settings warning.
    pub settings_warning: FieldId,
    /// Touch beep volume button.
    pub volume: FieldId,
    /// Controller link baud rate button.
    pub baud_rate: FieldId,

    /// Every popup.
    pub popups: Popups,
}

impl Pages {
    /// Root chain of `tab`'s page.
    pub fn chain(&self, tab: Tab) -> &Chain {
        match tab {
            Tab::Control => &self.control,
            Tab::Print => &self.print,
            Tab::Console => &self.console,
            Tab::Setup => &self.setup,
        }
    }

    /// Tab bar button of `tab`.
    pub fn tab_button(&self, tab: Tab) -> Option<FieldId> {
        self.tabs.get(tab.index()).copied()
    }
}

/// Push into a bounded group. Groups are sized for their loops, so this
/// only fails on a mismatch between the two.
fn push<const N: usize>(group: &mut Vec<FieldId, N>, id: FieldId) -> Result<(), PanelError> {
    group.push(id).map_err(|_| PanelError::ChainFull)
}

/// Build every page and popup into `mw`. Leaves the root at the Control page.
#[allow(clippy::arithmetic_side_effects)] // Layout sums stay on screen for every preset (see tests)
pub fn build(mw: &mut MainWindow, layout: &Layout, machine_name: &str) -> Result<Pages, PanelError> {
    let c = &layout.config;
    let s = &layout.styles;

    // Tab bar, shared by all pages.
    mw.set_root(Chain::new());
    let mut tabs = Vec::new();
    for (col, tab) in (0u16..).zip(Tab::ALL) {
        let id = add_text_button(mw, layout, &s.button, c.tab_row(), col, 4, tab.label(), tab.event(), 0)?;
        push(&mut tabs, id)?;
    }
    let common = mw.root().clone();

    // Title bar and temperature grid.
    let name_width = c.content_width().saturating_sub(c.status_width + c.field_spacing);
    let name = mw.add_field(Field::static_text(
        &s.title_bar,
        c.margin,
        c.row(0),
        name_width,
        TextAlignment::Left,
        machine_name,
    ))?;
    let status = mw.add_field(Field::text(
        &s.title_bar,
        c.display_width - c.margin - c.status_width,
        c.row(0),
        c.status_width,
        TextAlignment::Right,
        None,
        "",
    ))?;

    let heater_x = |h: u16| c.margin + c.temp_label_width + c.field_spacing + h * (c.temp_column_width + c.field_spacing);
    let label = |mw: &mut MainWindow, row: u16, text: &str| {
        mw.add_field(Field::static_text(&s.label, c.margin, c.row(row), c.temp_label_width, TextAlignment::Right, text))
    };

    let mut current_temps = Vec::new();
    let mut active_temps = Vec::new();
    let mut standby_temps = Vec::new();
    label(mw, 2, "current \u{b0}C")?;
    label(mw, 3, "active \u{b0}C")?;
    label(mw, 4, "standby \u{b0}C")?;
    for (h, heater) in (0u16..).zip(HEATER_NAMES) {
        let x = heater_x(h);
        let w = c.temp_column_width;
        mw.add_field(Field::static_text(&s.label, x, c.row(1), w, TextAlignment::Centre, heater))?;
        let current = mw.add_field(Field::float(&s.text, x, c.row(2), w, TextAlignment::Centre, 1, None, None))?;
        push(&mut current_temps, current)?;

        let mut active = Field::integer_button(&s.button, x, c.row(3), w, None, None);
        active.set_event(Event::AdjustActiveTemp.code(), i32::from(h));
        push(&mut active_temps, mw.add_field(active)?)?;

        let mut standby = Field::integer_button(&s.button, x, c.row(4), w, None, None);
        standby.set_event(Event::AdjustStandbyTemp.code(), i32::from(h));
        push(&mut standby_temps, mw.add_field(standby)?)?;
    }
    let status_root = mw.root().clone();

    // Control page.
    let mut axes = Vec::new();
    for (col, axis) in (0u16..).zip(["X ", "Y ", "Z "]) {
        let x = layout.column_x(col, 3);
        let w = layout.column_width(3);
        let id = mw.add_field(Field::float(&s.info, x, c.row(5), w, TextAlignment::Centre, 2, Some(axis), None))?;
        push(&mut axes, id)?;
    }
    for (col, (text, gcode)) in (0u16..).zip(HOME_BUTTONS) {
        add_text_button(mw, layout, &s.button, c.row(6), col, 5, text, Event::SendCommand, gcode)?;
    }
    add_text_button(mw, layout, &s.button, c.row(7), 0, 3, "Move", Event::Move, 0)?;
    add_text_button(mw, layout, &s.button, c.row(7), 1, 3, "Motors off", Event::SendCommand, "M18")?;
    let control = mw.root().clone();

    // Print page.
    mw.set_root(status_root);
    mw.add_field(Field::static_text(
        &s.label,
        c.margin,
        c.row(5),
        c.temp_label_width,
        TextAlignment::Right,
        "extrusion",
    ))?;
    let mut extrusion = Field::integer_button(&s.button, heater_x(1), c.row(5), c.temp_column_width, None, Some("%"));
    extrusion.set_event(Event::AdjustExtrusion.code(), 0);
    let extrusion = mw.add_field(extrusion)?;

    let speed = add_integer_button(mw, layout, &s.button, c.row(6), 0, 4, Some("Speed "), Some("%"), Event::AdjustSpeed)?;
    let fan = add_integer_button(mw, layout, &s.button, c.row(6), 1, 4, Some("Fan "), Some("%"), Event::AdjustFan)?;
    let wide_x = layout.column_x(2, 4);
    let wide_w = 2 * layout.column_width(4) + c.field_spacing;
    let files_button = mw.add_field(Field::text_button(
        &s.button,
        wide_x,
        c.row(6),
        wide_w,
        "Files",
        Event::ListFiles.code(),
        0,
    ))?;
    let pause_button = add_hidden(
        mw,
        Field::text_button(&s.pause_button, wide_x, c.row(6), wide_w, "Pause print", Event::PausePrint.code(), "M25"),
    )?;
    let resume_button = add_hidden(
        mw,
        Field::text_button(
            &s.resume_button,
            layout.column_x(2, 4),
            c.row(6),
            layout.column_width(4),
            "Resume",
            Event::ResumePrint.code(),
            "M24",
        ),
    )?;
    let cancel_button = add_hidden(
        mw,
        Field::text_button(
            &s.reset_button,
            layout.column_x(3, 4),
            c.row(6),
            layout.column_width(4),
            "Cancel",
            Event::CancelPrint.code(),
            0,
        ),
    )?;
    let progress = add_hidden(
        mw,
        Field::progress_bar(&s.progress, c.margin, c.row(7), c.content_width(), c.progress_bar_height),
    )?;
    let time_left = add_hidden(
        mw,
        Field::text(&s.info, c.margin, c.row(8), c.content_width(), TextAlignment::Left, Some("time left: "), ""),
    )?;
    let print = mw.root().clone();

    // Console page.
    mw.set_root(common.clone());
    let title_width = layout.column_x(3, 4).saturating_sub(c.margin + c.field_spacing);
    mw.add_field(Field::static_text(&s.title_bar, c.margin, c.row(0), title_width, TextAlignment::Left, "Messages"))?;
    add_text_button(mw, layout, &s.button, c.row(0), 3, 4, "Keyboard", Event::Keyboard, 0)?;
    let mut message_times = Vec::new();
    let mut message_texts = Vec::new();
    let text_x = c.margin + c.message_time_width + c.field_spacing;
    let text_w = c.content_width().saturating_sub(c.message_time_width + c.field_spacing);
    for row in (1u16..).take(MESSAGE_ROWS) {
        let time = mw.add_field(Field::text(&s.info, c.margin, c.row(row), c.message_time_width, TextAlignment::Left, None, ""))?;
        let text = mw.add_field(Field::text(&s.text, text_x, c.row(row), text_w, TextAlignment::Left, None, ""))?;
        push(&mut message_times, time)?;
        push(&mut message_texts, text)?;
    }
    let console = mw.root().clone();

    // Setup page.
    mw.set_root(common);
    mw.add_field(Field::text(
        &s.text,
        c.margin,
        c.row(0),
        c.content_width(),
        TextAlignment::Left,
        Some("Panel version: "),
        env!("CARGO_PKG_VERSION"),
    ))?;
    let free_ram = mw.add_field(Field::integer(
        &s.text,
        c.margin,
        c.row(1),
        c.content_width(),
        TextAlignment::Left,
        Some("Free RAM: "),
        Some(" bytes"),
    ))?;
    let settings_warning = add_hidden(
        mw,
        Field::static_text(
            &s.error,
            c.margin,
            c.row(2),
            c.content_width(),
            TextAlignment::Centre,
            "Some settings are not saved!",
        ),
    )?;
    let volume = add_integer_button(mw, layout, &s.button, c.row(3), 0, 3, Some("Volume "), None, Event::SetVolume)?;
    add_text_button(mw, layout, &s.button, c.row(3), 1, 3, "Save settings", Event::SaveSettings, 0)?;
    add_text_button(mw, layout, &s.reset_button, c.row(3), 2, 3, "Factory reset", Event::FactoryReset, 0)?;
    let baud_rate = add_integer_button(mw, layout, &s.button, c.row(4), 0, 3, None, Some(" baud"), Event::SetBaudRate)?;
    let setup = mw.root().clone();

    let popups = build_popups(mw, layout)?;
    mw.set_root(control.clone());

    tracing::debug!(fields = mw.arena().len(), "pages built");

    Ok(Pages {
        control,
        print,
        console,
        setup,
        tabs,
        name,
        status,
        current_temps,
        active_temps,
        standby_temps,
        axes,
        extrusion,
        speed,
        fan,
        files_button,
        pause_button,
        resume_button,
        cancel_button,
        progress,
        time_left,
        message_times,
        message_texts,
        free_ram,
        settings_warning,
        volume,
        baud_rate,
        popups,
    })
}

#[allow(clippy::arithmetic_side_effects)] // Layout sums stay on screen for every preset (see tests)
fn build_popups(mw: &mut MainWindow, layout: &Layout) -> Result<Popups, PanelError> {
    let c = &layout.config;
    let s = &layout.styles;
    let side = c.popup_side_margin;
    let top = c.popup_top_margin;
    let spacing = c.popup_field_spacing;
    let bar_width = c.display_width / 3 * 2;

    let adjust = create_int_popup_bar(
        mw,
        layout,
        bar_width,
        &["-5", "-1", "Set", "+1", "+5"],
        &[-5, -1, 0, 1, 5],
        Event::AdjustInt,
        Some(Event::SetInt),
    )?;
    let volume = create_int_popup_bar(
        mw,
        layout,
        bar_width,
        &["Off", "1", "2", "3", "4", "5"],
        &[0, 1, 2, 3, 4, 5],
        Event::AdjustVolume,
        None,
    )?;
    let baud_rate = create_int_popup_bar(
        mw,
        layout,
        c.content_width(),
        &BAUD_RATE_TEXTS,
        &BAUD_RATES,
        Event::AdjustBaudRate,
        None,
    )?;

    // Movement: one jog row per axis, then Cancel.
    let move_width = c.content_width();
    let move_height = 2 * top + 3 * c.row_height + c.button_height();
    let movement = add_popup(mw, layout, move_width, move_height)?;
    let jog_left = side + c.key_width + spacing;
    let jog_width = move_width.saturating_sub(jog_left + side);
    let axes = [
        ("X", &XY_JOG_TEXTS, &XY_JOG_PARAMS, Event::MoveX),
        ("Y", &XY_JOG_TEXTS, &XY_JOG_PARAMS, Event::MoveY),
        ("Z", &Z_JOG_TEXTS, &Z_JOG_PARAMS, Event::MoveZ),
    ];
    for (row, (axis, texts, params, event)) in (0u16..).zip(axes) {
        let y = top + row * c.row_height;
        mw.add_popup_field(movement, Field::static_text(&s.popup_text, side, y, c.key_width, TextAlignment::Centre, axis))?;
        create_string_button_row(mw, movement, &s.popup_button, y, jog_left, jog_width, spacing, texts, params, event)?;
    }
    let cancel_w = move_width / 4;
    mw.add_popup_field(
        movement,
        Field::text_button(
            &s.popup_button,
            move_width - side - cancel_w,
            top + 3 * c.row_height,
            cancel_w,
            "Cancel",
            Event::Cancel.code(),
            0,
        ),
    )?;

    // Keyboard: typed command, four staggered key rows, then controls.
    let keys_per_row: u16 = 12;
    let kb_width = 2 * side + keys_per_row * c.key_step - (c.key_step - c.key_width);
    let kb_height = 2 * top + 5 * c.row_height + c.button_height();
    let keyboard = add_popup(mw, layout, kb_width, kb_height)?;
    let user_command = mw.add_popup_field(
        keyboard,
        Field::text(&s.popup_text, side, top, kb_width - 2 * side, TextAlignment::Left, Some("> "), ""),
    )?;
    for (row, keys) in (0u16..).zip(KEYBOARD_ROWS) {
        let x = side + row * c.key_step / 2;
        let y = top + (row + 1) * c.row_height;
        mw.add_popup_field(
            keyboard,
            Field::char_button_row(&s.popup_button, x, y, c.key_width, c.key_step, keys, Event::Key.code()),
        )?;
    }
    let controls: [(&str, Event, Param); 4] = [
        ("Space", Event::Key, Param::from(' ')),
        ("Del", Event::Backspace, Param::default()),
        ("Send", Event::SendUserCommand, Param::default()),
        ("Cancel", Event::Cancel, Param::default()),
    ];
    let y = top + 5 * c.row_height;
    for ((x, w), (text, event, param)) in row_slots(side, kb_width - 2 * side, spacing, controls.len()).zip(controls) {
        mw.add_popup_field(keyboard, Field::text_button(&s.popup_button, x, y, w, text, event.code(), param))?;
    }

    // File list: one button per visible file, scroll buttons on the right.
    let files_width = c.content_width();
    let files_height = 2 * top + FILE_ROW_COUNT * c.row_height + c.button_height();
    let files = add_popup(mw, layout, files_width, files_height)?;
    let name_width = files_width.saturating_sub(2 * side + c.key_width + spacing);
    let mut file_rows = Vec::new();
    for (row, index) in (0u16..).zip(0i32..).take(FILE_ROWS) {
        let y = top + row * c.row_height;
        let id = mw.add_popup_field(
            files,
            Field::text_button(&s.popup_button, side, y, name_width, "", Event::FileSelected.code(), index),
        )?;
        push(&mut file_rows, id)?;
    }
    let scroll_x = files_width - side - c.key_width;
    mw.add_popup_field(
        files,
        Field::text_button(&s.popup_button, scroll_x, top, c.key_width, "Up", Event::ScrollFiles.code(), -1),
    )?;
    mw.add_popup_field(
        files,
        Field::text_button(
            &s.popup_button,
            scroll_x,
            top + (FILE_ROW_COUNT - 1) * c.row_height,
            c.key_width,
            "Dn",
            Event::ScrollFiles.code(),
            1,
        ),
    )?;
    let cancel_w = files_width / 4;
    mw.add_popup_field(
        files,
        Field::text_button(
            &s.popup_button,
            files_width - side - cancel_w,
            top + FILE_ROW_COUNT * c.row_height,
            cancel_w,
            "Cancel",
            Event::Cancel.code(),
            0,
        ),
    )?;

    // Are-you-sure: title, question, Yes / Cancel.
    let confirm_width = c.display_width / 2;
    let confirm_height = 2 * top + 2 * c.row_height + c.button_height();
    let confirm = add_popup(mw, layout, confirm_width, confirm_height)?;
    let inner = confirm_width - 2 * side;
    let confirm_title = mw.add_popup_field(
        confirm,
        Field::text(&s.popup_text, side, top, inner, TextAlignment::Centre, None, ""),
    )?;
    let confirm_query = mw.add_popup_field(
        confirm,
        Field::text(&s.popup_text, side, top + c.row_height, inner, TextAlignment::Centre, None, ""),
    )?;
    let answers = [("Yes", Event::Yes), ("Cancel", Event::Cancel)];
    for ((x, w), (text, event)) in row_slots(side, inner, spacing, answers.len()).zip(answers) {
        mw.add_popup_field(
            confirm,
            Field::text_button(&s.popup_button, x, top + 2 * c.row_height, w, text, event.code(), 0),
        )?;
    }

    Ok(Popups {
        adjust,
        volume,
        baud_rate,
        movement,
        keyboard,
        user_command,
        files,
        file_rows,
        confirm,
        confirm_title,
        confirm_query,
    })
}
