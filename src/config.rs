//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and limits live here
//! so they can be tuned in one place.

// Timing

/// Main loop cadence (ms). Button debouncing counts in these ticks.
pub const TICK_PERIOD_MS: u64 = 10;

/// Consecutive polls a press must hold before it activates.
/// 10 ticks x 10 ms = 100 ms.
pub const DEBOUNCE_TICKS: u32 = 10;

/// Inactivity before the display and backlight are switched off (ms).
pub const SCREEN_IDLE_TIMEOUT_MS: u64 = 60_000;

/// How often the idle timer task checks its deadline (ms).
pub const IDLE_POLL_MS: u64 = 100;

/// Auto-repeat cadence for held UP/DOWN on list and password pages, in
/// ticks. Used by the firmware; the library default is no auto-repeat.
pub const AUTO_REPEAT_TICKS: u16 = 15;

// Wi-Fi

/// Maximum number of access points kept from one scan.
pub const MAX_ACCESS_POINTS: usize = 10;

/// Maximum SSID length in bytes (802.11).
pub const SSID_MAX_LEN: usize = 32;

/// Capacity of the text entry buffer; one slot stays free so at most
/// `USER_TEXT_CAPACITY - 1` characters are stored.
pub const USER_TEXT_CAPACITY: usize = 64;

/// First candidate character on the password page (space).
pub const FIRST_ENTRY_CHAR: u8 = 32;

/// Last printable candidate character (`~`).
pub const LAST_PRINTABLE_CHAR: u8 = 126;

/// Candidate ordinal meaning "delete last character".
pub const BACKSPACE_CHAR: u8 = 127;

/// Candidate ordinal meaning "submit the entered text".
pub const SUBMIT_CHAR: u8 = 128;

/// Connection attempts before the connect page reports failure.
pub const WIFI_CONNECT_ATTEMPTS: u8 = 3;

/// Raw records requested from the radio per scan, before duplicates and
/// hidden networks are dropped.
pub const RAW_SCAN_MAX: usize = 32;

/// Association timeout for one connect attempt (ms).
pub const WIFI_CONNECT_TIMEOUT_MS: u64 = 15_000;

/// Time allowed for DHCP after association (ms).
pub const DHCP_TIMEOUT_MS: u64 = 15_000;

/// Whole-request timeout for the block height fetch (ms).
pub const FETCH_TIMEOUT_MS: u64 = 20_000;

// Block height

/// Endpoint returning the current block count as plain decimal text.
pub const BLOCKHEIGHT_URL: &str = "https://blockchain.info/q/getblockcount";

/// PEM certificate the block height request is pinned to.
pub const BLOCKHEIGHT_TRUST_ANCHOR: &str = include_str!("../certs/blockchain_info.pem");

/// Response body buffer for the block height request.
pub const FETCH_BUFFER_SIZE: usize = 64;

// Display (ST7789 on the T-Display)

pub const DISPLAY_WIDTH: u16 = 135;
pub const DISPLAY_HEIGHT: u16 = 240;
/// Panel RAM offsets for the 135x240 window inside the 240x320 controller.
pub const DISPLAY_OFFSET_X: u16 = 52;
pub const DISPLAY_OFFSET_Y: u16 = 40;

// GPIO pin assignments (TTGO T-Display)
//
// These are logical names; the concrete `esp_hal::peripherals::GPIOn`
// types are selected in `main.rs`. Adjust for other boards.
//
//   Button 1       → GPIO35 (input only, external pull-up)
//   Button 2       → GPIO0  (BOOT button, external pull-up)
//   SPI MOSI       → GPIO19
//   SPI SCLK       → GPIO18
//   Display CS     → GPIO5
//   Display DC     → GPIO16
//   Display RESET  → GPIO23
//   Backlight      → GPIO4

/// SPI clock for the ST7789 (Hz).
pub const DISPLAY_SPI_HZ: u32 = 40_000_000;
