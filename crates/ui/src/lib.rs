//! Touch panel field manager: pages, popups, tab navigation and touch dispatch.
//!
//! Builds the reference pages of a printer control panel on top of
//! `panel-fields` and turns touches into [`Action`]s for the machine
//! controller:
//!
//! - [`events`]: the event codes buttons raise
//! - [`config`]: display geometry presets and the colour palette
//! - [`builder`]: grid and popup-row placement helpers
//! - [`pages`]: the tab bar, the four pages and their popups
//! - [`navigation`]: selected tab and its history
//! - [`panel`]: [`PanelUi`], touch routing and dispatch
//!
//! This crate is `no_std` by default; it only uses `core` + `heapless`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod builder;
pub mod config;
pub mod events;
pub mod navigation;
pub mod pages;
pub mod panel;

pub use builder::Layout;
pub use config::{FontChoice, LayoutConfig, Palette, Styles};
pub use events::Event;
pub use navigation::{Navigator, Tab};
pub use pages::Pages;
pub use panel::{Action, Axis, PanelUi, PopupKind};
