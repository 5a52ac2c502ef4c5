//! Event registry
//!
//! Every button on the panel raises one of these codes. The numeric values
//! are stable: they are stored in the fields as [`EventCode`]s and come back
//! out of [`ButtonPress::event`](panel_fields::ButtonPress::event) when a
//! button is touched. Zero is reserved for "no event".

use panel_fields::EventCode;

/// What a touched button means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Event {
    /// No event.
    Null = 0,

    // Tabs
    /// Show the Control page.
    TabControl,
    /// Show the Print page.
    TabPrint,
    /// Show the Console page.
    TabConsole,
    /// Show the Setup page.
    TabSetup,

    // Value adjustment (open the integer adjust popup)
    /// Adjust a heater's active set point.
    AdjustActiveTemp,
    /// Adjust a heater's standby set point.
    AdjustStandbyTemp,
    /// Adjust the speed factor.
    AdjustSpeed,
    /// Adjust the extrusion factor.
    AdjustExtrusion,
    /// Adjust the fan speed.
    AdjustFan,
    /// Step the value being adjusted.
    AdjustInt,
    /// Confirm the value being adjusted.
    SetInt,

    // Machine control
    /// Send the button's command string.
    SendCommand,
    /// Open the movement popup.
    Move,
    /// Jog the X axis.
    MoveX,
    /// Jog the Y axis.
    MoveY,
    /// Jog the Z axis.
    MoveZ,

    // Printing
    /// Open the file list.
    ListFiles,
    /// Page the file list up or down.
    ScrollFiles,
    /// Print the touched file.
    FileSelected,
    /// Pause the print.
    PausePrint,
    /// Resume a paused print.
    ResumePrint,
    /// Ask to cancel a paused print.
    CancelPrint,

    // Console keyboard
    /// Open the command keyboard.
    Keyboard,
    /// Type the key's character.
    Key,
    /// Delete the last typed character.
    Backspace,
    /// Send the typed command.
    SendUserCommand,

    // Setup
    /// Open the volume popup.
    SetVolume,
    /// Pick the touch beep volume.
    AdjustVolume,
    /// Open the baud rate popup.
    SetBaudRate,
    /// Pick the controller link baud rate.
    AdjustBaudRate,
    /// Save the panel settings.
    SaveSettings,
    /// Restore factory settings.
    FactoryReset,

    // Confirmation
    /// Confirm the pending action.
    Yes,
    /// Close the open popup.
    Cancel,
}

impl Event {
    /// Every event, in code order.
    pub const ALL: [Event; 35] = [
        Event::Null,
        Event::TabControl,
        Event::TabPrint,
        Event::TabConsole,
        Event::TabSetup,
        Event::AdjustActiveTemp,
        Event::AdjustStandbyTemp,
        Event::AdjustSpeed,
        Event::AdjustExtrusion,
        Event::AdjustFan,
        Event::AdjustInt,
        Event::SetInt,
        Event::SendCommand,
        Event::Move,
        Event::MoveX,
        Event::MoveY,
        Event::MoveZ,
        Event::ListFiles,
        Event::ScrollFiles,
        Event::FileSelected,
        Event::PausePrint,
        Event::ResumePrint,
        Event::CancelPrint,
        Event::Keyboard,
        Event::Key,
        Event::Backspace,
        Event::SendUserCommand,
        Event::SetVolume,
        Event::AdjustVolume,
        Event::SetBaudRate,
        Event::AdjustBaudRate,
        Event::SaveSettings,
        Event::FactoryReset,
        Event::Yes,
        Event::Cancel,
    ];

    /// The code stored in a field.
    pub const fn code(self) -> EventCode {
        EventCode(self as u8)
    }

    /// Look an event up by code. Unknown codes yield `None`.
    pub fn from_code(code: EventCode) -> Option<Event> {
        Event::ALL.iter().copied().find(|e| e.code() == code)
    }
}

impl From<Event> for EventCode {
    fn from(event: Event) -> Self {
        event.code()
    }
}
