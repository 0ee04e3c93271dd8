//! Network collaborator boundary.
//!
//! The core never talks to the radio directly. Pages that need the network
//! (scan, connect, block height fetch) go through [`NetworkService`], which
//! the firmware implements on top of `esp-radio` + `embassy-net` and tests
//! replace with a scripted double.
//!
//! Helpers in this module are pure and host-testable:
//!
//! - [`scan`] - normalises raw scan records into the bounded AP list.
//! - [`blockheight`] - parses the block count endpoint's response.
//! - [`connect_with_retries`] - retry policy around a single connect call.

pub mod blockheight;
pub mod scan;

use crate::config::{MAX_ACCESS_POINTS, SSID_MAX_LEN};
use crate::error::NetError;
use heapless::{String, Vec};

/// Summary of one access point found by a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccessPointBrief {
    /// Network name (truncated to 32 bytes for `heapless::String`).
    pub ssid: String<SSID_MAX_LEN>,
    /// Received Signal Strength Indicator (dBm).
    pub rssi: i8,
    /// `true` unless the network is open.
    pub has_auth: bool,
}

impl AccessPointBrief {
    /// Build a brief, truncating `ssid` at the last character that fits.
    pub fn new(ssid: &str, rssi: i8, has_auth: bool) -> Self {
        let mut name = String::new();
        for c in ssid.chars() {
            if name.push(c).is_err() {
                break;
            }
        }
        Self {
            ssid: name,
            rssi,
            has_auth,
        }
    }
}

/// Bounded list of access points as stored in the navigation context.
pub type AccessPointList = Vec<AccessPointBrief, MAX_ACCESS_POINTS>;

/// Scan, connect and fetch, as needed by the I/O-bearing pages.
///
/// Calls complete (successfully or not) before the page is considered
/// rendered; implementations apply their own timeouts.
#[allow(async_fn_in_trait)]
pub trait NetworkService {
    /// Scan for access points, returning at most `max` entries.
    async fn scan(&mut self, max: usize) -> Result<AccessPointList, NetError>;

    /// Associate with `ssid` and wait for an IP address.
    async fn connect(&mut self, ssid: &str, password: &str) -> Result<(), NetError>;

    /// HTTPS GET `url`, validating the server against `trust_anchor` (PEM).
    /// The response body is written into `buf`; returns its length.
    async fn fetch(
        &mut self,
        url: &str,
        trust_anchor: &str,
        buf: &mut [u8],
    ) -> Result<usize, NetError>;
}

/// Call [`NetworkService::connect`] up to `attempts` times (at least once).
///
/// Returns the error of the final attempt when all of them fail.
pub async fn connect_with_retries<N: NetworkService>(
    net: &mut N,
    ssid: &str,
    password: &str,
    attempts: u8,
) -> Result<(), NetError> {
    let attempts = attempts.max(1);
    let mut last = NetError::ConnectFailed;

    for attempt in 1..=attempts {
        match net.connect(ssid, password).await {
            Ok(()) => {
                info!("Wi-Fi: connected to {} (attempt {})", ssid, attempt);
                return Ok(());
            }
            Err(e) => {
                warn!("Wi-Fi: attempt {}/{} failed: {}", attempt, attempts, e);
                last = e;
            }
        }
    }

    error!("Wi-Fi: giving up on {}", ssid);
    Err(last)
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════
