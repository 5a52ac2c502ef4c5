//! Panel demo - the reference pages in a desktop window
//!
//! Demonstrates:
//! - Building every page and popup with `PanelUi`
//! - Mouse clicks fed in as touches
//! - Partial refresh driven by simulated controller updates
//!
//! Run with:
//!
//! ```bash
//! RUST_LOG=panel_ui=debug cargo run -p panel-ui --example panel_demo --features simulator
//! RUST_LOG=panel_fields=trace cargo run -p panel-ui --example panel_demo --features simulator -- --large
//! ```

// Desktop-only demo: Debug output and plain arithmetic are fine here.
#![allow(clippy::use_debug, clippy::arithmetic_side_effects, clippy::indexing_slicing)]

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use panel_fields::DrawTargetCanvas;
use panel_ui::{Action, Axis, LayoutConfig, Palette, PanelUi};
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(20);
const TICK: Duration = Duration::from_millis(500);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = if std::env::args().any(|a| a == "--large") {
        LayoutConfig::DISPLAY_800X480
    } else {
        LayoutConfig::DISPLAY_480X272
    };
    let mut ui = PanelUi::new(config, Palette::DARK, "Demo printer").map_err(|e| e.to_string())?;
    ui.set_files(["benchy.gcode", "calibration_cube.gcode", "vase.gcode", "bracket.gcode", "gear.gcode", "clip.gcode"]);
    ui.set_status("Idle");
    ui.set_free_ram(23_456);
    ui.set_volume(3);
    ui.set_baud_rate(57_600);

    let size = Size::new(u32::from(config.display_width), u32::from(config.display_height));
    let mut canvas = DrawTargetCanvas::new(SimulatorDisplay::<Rgb565>::new(size));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Touch panel", &output_settings);

    ui.refresh(&mut canvas, true)?;
    window.update(canvas.inner());

    let mut machine = Machine::default();
    let mut last_tick = Instant::now();

    'running: loop {
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::MouseButtonDown { point, .. } => {
                    let action = ui.touch_down(point.x, point.y);
                    machine.apply(&mut ui, &action);
                }
                SimulatorEvent::MouseButtonUp { .. } => ui.touch_up(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= TICK {
            last_tick = Instant::now();
            machine.tick(&mut ui);
        }

        ui.refresh(&mut canvas, false)?;
        window.update(canvas.inner());
        std::thread::sleep(FRAME);
    }
    Ok(())
}

/// Stand-in for the printer firmware at the other end of the serial line.
#[derive(Default)]
struct Machine {
    bed: f32,
    tool: f32,
    bed_target: i32,
    tool_target: i32,
    position: [f32; 3],
    printing: Option<u8>,
    paused: bool,
    clock: u32,
}

impl Machine {
    fn apply(&mut self, ui: &mut PanelUi, action: &Action) {
        tracing::info!(?action, "panel action");
        match action {
            Action::SetValue { event, param, value } => match (event, param) {
                (panel_ui::Event::AdjustActiveTemp, 0) => self.bed_target = *value,
                (panel_ui::Event::AdjustActiveTemp, _) => self.tool_target = *value,
                _ => {}
            },
            Action::Jog { axis, amount } => {
                let i = match axis {
                    Axis::X => 0,
                    Axis::Y => 1,
                    Axis::Z => 2,
                };
                self.position[i] += amount.parse::<f32>().unwrap_or(0.0);
                ui.set_position(*axis, self.position[i]);
            }
            Action::Command(cmd) => match *cmd {
                "G28" => {
                    self.position = [0.0; 3];
                    for axis in [Axis::X, Axis::Y, Axis::Z] {
                        ui.set_position(axis, 0.0);
                    }
                }
                "M25" => {
                    self.paused = true;
                    ui.show_resume_and_cancel_buttons();
                }
                "M24" => {
                    self.paused = false;
                    ui.show_pause_button();
                }
                "M0" => {
                    self.printing = None;
                    ui.set_progress(None);
                    ui.set_time_left(None);
                    ui.show_files_button();
                }
                _ => {}
            },
            Action::PrintFile(name) => {
                self.printing = Some(0);
                self.paused = false;
                ui.set_status("Printing");
                ui.set_progress(Some(0));
                ui.show_pause_button();
                self.log(ui, name);
            }
            Action::UserCommand(cmd) => self.log(ui, cmd),
            Action::SaveSettings => ui.settings_saved(true),
            Action::FactoryReset => ui.settings_saved(false),
            _ => {}
        }
    }

    fn tick(&mut self, ui: &mut PanelUi) {
        self.clock += 1;
        self.bed += (self.bed_target as f32 - self.bed) * 0.1;
        self.tool += (self.tool_target as f32 - self.tool) * 0.1;
        ui.set_current_temp(0, self.bed + 20.0);
        ui.set_current_temp(1, self.tool + 20.0);

        if let Some(p) = self.printing.filter(|_| !self.paused) {
            let p = p.saturating_add(1).min(100);
            self.printing = Some(p);
            ui.set_progress(Some(p));
            let left = format!("{}m", (100 - u32::from(p)) / 2);
            ui.set_time_left(Some(&left));
            if p == 100 {
                self.printing = None;
                ui.set_status("Idle");
                ui.show_files_button();
            }
        }
    }

    fn log(&self, ui: &mut PanelUi, text: &str) {
        let time = format!("{:02}:{:02}", self.clock / 120, (self.clock / 2) % 60);
        ui.add_message(&time, text);
    }
}
