//! User interface subsystem - TFT pages + two physical buttons.
//!
//! The navigator maintains a page state machine that reacts to debounced
//! button events, rendering the current page on the ST7789 panel and
//! running page I/O (scan, connect, fetch) through the network service.
//!
//! ## Components
//!
//! - **Buttons**: 2 tactile switches, tick-polled and debounced
//! - **Context**: per-page state (AP list, cursor, text entry)
//! - **Navigator**: page transitions and idle/wake handling
//! - **Display**: `embedded-graphics` page renderer

pub mod buttons;
pub mod context;
pub mod display;
pub mod input_logic;
pub mod navigator;


/// Debounced state of the two buttons, reported once per tick.
///
/// `*Held` means pressed but not yet debounced, `*Activated` is a one-tick
/// pulse when the press crosses the debounce threshold, `*Repeat` is
/// reported on every following tick until release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    None,
    B1Held,
    B1Activated,
    B1Repeat,
    B2Held,
    B2Activated,
    B2Repeat,
    BothHeld,
    BothActivated,
    BothRepeat,
}

impl ButtonState {
    /// One of the three one-tick activation pulses.
    pub fn is_activation(self) -> bool {
        matches!(
            self,
            ButtonState::B1Activated | ButtonState::B2Activated | ButtonState::BothActivated
        )
    }

    pub fn is_repeat(self) -> bool {
        matches!(
            self,
            ButtonState::B1Repeat | ButtonState::B2Repeat | ButtonState::BothRepeat
        )
    }
}

/// Pages (views) the UI can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageId {
    /// Before boot; never displayed.
    None,
    /// Idle / home - prompts to scan.
    Home,
    /// Scanning for access points (blocking I/O page).
    WifiScan,
    /// Scan failed.
    WifiScanFail,
    /// Access point list with a trailing Exit row.
    WifiList,
    /// Character-at-a-time password entry.
    WifiEnterPassword,
    /// Connecting to the selected access point (blocking I/O page).
    WifiConnect,
    /// Connection failed.
    WifiConnectFail,
    /// Connected - offers to load the block height.
    WifiConnected,
    /// Fetching the block height (blocking I/O page).
    BlockheightLoad,
    /// Block height fetch failed.
    BlockheightFail,
    /// Shows the last fetched block height.
    Blockheight,
}

/// Result of committing the highlighted choice on a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageAction {
    None,
    /// The Exit row of the access point list was chosen.
    Exit,
    /// An access point was chosen; see `NavigationContext::selected_ap`.
    WifiApSelect,
    /// The entered password was submitted.
    WifiPasswordSubmit,
}
