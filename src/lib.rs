//! Library interface for blockpager.
//!
//! Everything here is hardware independent and runs on the host:
//! button debouncing, page navigation, the idle timer and page rendering
//! onto any `embedded-graphics` target. The firmware binary (`main.rs`,
//! feature `embedded`) wires these to the ESP32 peripherals.
//!
//! Usage: `cargo test`
//!
//! Logging goes through `defmt` when the `defmt` feature is enabled and
//! compiles away otherwise, so host tests need no global logger.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to the modules below.
#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod net;
pub mod power;
pub mod power_logic;
pub mod ui;

pub use error::{NetError, PageError};
pub use net::{AccessPointBrief, AccessPointList, NetworkService};
pub use power::{Clock, PowerControl, PowerManager};
pub use ui::buttons::{ButtonDebouncer, Buttons, RawButtons};
pub use ui::context::NavigationContext;
pub use ui::display::ScreenRenderer;
pub use ui::navigator::{Navigator, PageRenderer};
pub use ui::{ButtonState, PageAction, PageId};

// ═══════════════════════════════════════════════════════════════════════════
// Cross-module tests
// ═══════════════════════════════════════════════════════════════════════════
