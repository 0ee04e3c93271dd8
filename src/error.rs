//! Unified error types for blockpager.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

/// Failures reported by the network collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetError {
    /// The radio could not start or the scan did not complete.
    ScanFailed,

    /// Association or DHCP failed after all retries.
    ConnectFailed,

    /// A fetch was attempted without an active connection.
    NotConnected,

    /// Host name could not be resolved.
    Dns,

    /// TLS handshake or record layer failed.
    Tls,

    /// Server answered with a non-success HTTP status.
    Http(u16),

    /// Operation timed out.
    Timeout,

    /// Response did not fit the caller's buffer.
    BufferOverflow,
}

/// Failures reported by a page's init or display step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageError {
    /// Page-specific network I/O failed.
    Network(NetError),

    /// Drawing to the panel failed.
    Display,

    /// The page cannot be shown (e.g. `PageId::None`, or the connect page
    /// without a selected access point).
    InvalidPage,

    /// Fetched data could not be interpreted.
    InvalidResponse,
}

// Convenience conversions

impl From<NetError> for PageError {
    fn from(e: NetError) -> Self {
        PageError::Network(e)
    }
}
