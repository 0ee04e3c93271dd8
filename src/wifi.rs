//! `NetworkService` on top of `esp-radio`, `embassy-net` and `reqwless`.

use alloc::string::String;

use blockpager::config::{
    DHCP_TIMEOUT_MS, FETCH_TIMEOUT_MS, RAW_SCAN_MAX, WIFI_CONNECT_TIMEOUT_MS,
};
use blockpager::net::scan::collect_access_points;
use blockpager::{AccessPointBrief, AccessPointList, NetError, NetworkService};
use defmt::{debug, info, warn};
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_net::{Runner, Stack};
use embassy_time::{with_timeout, Duration};
use esp_hal::rng::Rng;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, ModeConfig, ScanConfig, WifiController, WifiDevice,
};
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use reqwless::request::Method;

pub const TLS_READ_BUF_SIZE: usize = 16_640;
pub const TLS_WRITE_BUF_SIZE: usize = 4_096;
pub const HTTP_RX_BUF_SIZE: usize = 2_048;

pub type TcpState = TcpClientState<1, 1024, 1024>;

/// Buffers for one HTTPS request at a time.
pub struct HttpBuffers {
    pub tcp: &'static TcpState,
    pub tls_read: &'static mut [u8; TLS_READ_BUF_SIZE],
    pub tls_write: &'static mut [u8; TLS_WRITE_BUF_SIZE],
    pub rx: &'static mut [u8; HTTP_RX_BUF_SIZE],
}

pub struct EspWifi {
    controller: WifiController<'static>,
    stack: Stack<'static>,
    http: HttpBuffers,
}

impl EspWifi {
    pub fn new(controller: WifiController<'static>, stack: Stack<'static>, http: HttpBuffers) -> Self {
        Self {
            controller,
            stack,
            http,
        }
    }

    /// Start the radio in station mode if it is not running yet.
    async fn ensure_started(&mut self) -> Result<(), NetError> {
        if matches!(self.controller.is_started(), Ok(true)) {
            return Ok(());
        }

        self.controller
            .set_config(&ModeConfig::Client(ClientConfig::default()))
            .map_err(|e| {
                warn!("Wi-Fi: set_config failed: {:?}", defmt::Debug2Format(&e));
                NetError::ScanFailed
            })?;
        self.controller.start_async().await.map_err(|e| {
            warn!("Wi-Fi: start failed: {:?}", defmt::Debug2Format(&e));
            NetError::ScanFailed
        })?;
        info!("Wi-Fi: started");
        Ok(())
    }

    async fn get(&mut self, url: &str, buf: &mut [u8]) -> Result<usize, NetError> {
        let tcp = TcpClient::new(self.stack, self.http.tcp);
        let dns = DnsSocket::new(self.stack);
        let seed = {
            let rng = Rng::new();
            (rng.random() as u64) << 32 | rng.random() as u64
        };
        let tls = TlsConfig::new(
            seed,
            &mut self.http.tls_read[..],
            &mut self.http.tls_write[..],
            TlsVerify::None,
        );
        let mut client = HttpClient::new_with_tls(&tcp, &dns, tls);

        let mut request = client.request(Method::GET, url).await.map_err(http_error)?;
        let response = request
            .send(&mut self.http.rx[..])
            .await
            .map_err(http_error)?;

        if !response.status.is_successful() {
            return Err(NetError::Http(response.status.0));
        }

        let body = response.body().read_to_end().await.map_err(http_error)?;
        let dst = buf.get_mut(..body.len()).ok_or(NetError::BufferOverflow)?;
        dst.copy_from_slice(body);
        Ok(body.len())
    }
}

fn http_error(e: reqwless::Error) -> NetError {
    warn!("HTTP: {:?}", defmt::Debug2Format(&e));
    match e {
        reqwless::Error::Dns => NetError::Dns,
        reqwless::Error::Tls(_) => NetError::Tls,
        reqwless::Error::BufferTooSmall => NetError::BufferOverflow,
        _ => NetError::NotConnected,
    }
}

impl NetworkService for EspWifi {
    async fn scan(&mut self, max: usize) -> Result<AccessPointList, NetError> {
        self.ensure_started().await?;

        let found = self
            .controller
            .scan_with_config_async(ScanConfig::default().with_max(RAW_SCAN_MAX))
            .await
            .map_err(|e| {
                warn!("Wi-Fi: scan failed: {:?}", defmt::Debug2Format(&e));
                NetError::ScanFailed
            })?;

        debug!("Wi-Fi: {} raw scan records", found.len());
        let records = found.iter().map(|ap| {
            let has_auth = !matches!(ap.auth_method, None | Some(AuthMethod::None));
            AccessPointBrief::new(&ap.ssid, ap.signal_strength, has_auth)
        });
        Ok(collect_access_points(records, max))
    }

    async fn connect(&mut self, ssid: &str, password: &str) -> Result<(), NetError> {
        if matches!(self.controller.is_connected(), Ok(true)) {
            let _ = self.controller.disconnect_async().await;
        }

        let mut client = ClientConfig::default()
            .with_ssid(String::from(ssid))
            .with_password(String::from(password));
        if password.is_empty() {
            client = client.with_auth_method(AuthMethod::None);
        }
        self.controller
            .set_config(&ModeConfig::Client(client))
            .map_err(|e| {
                warn!("Wi-Fi: set_config failed: {:?}", defmt::Debug2Format(&e));
                NetError::ConnectFailed
            })?;
        self.ensure_started().await?;

        info!("Wi-Fi: connecting to {}", ssid);
        with_timeout(
            Duration::from_millis(WIFI_CONNECT_TIMEOUT_MS),
            self.controller.connect_async(),
        )
        .await
        .map_err(|_| NetError::Timeout)?
        .map_err(|e| {
            warn!("Wi-Fi: connect failed: {:?}", defmt::Debug2Format(&e));
            NetError::ConnectFailed
        })?;

        with_timeout(Duration::from_millis(DHCP_TIMEOUT_MS), self.stack.wait_config_up())
            .await
            .map_err(|_| NetError::Timeout)?;
        if let Some(cfg) = self.stack.config_v4() {
            info!("Wi-Fi: got {}", defmt::Display2Format(&cfg.address));
        }
        Ok(())
    }

    async fn fetch(
        &mut self,
        url: &str,
        trust_anchor: &str,
        buf: &mut [u8],
    ) -> Result<usize, NetError> {
        if !self.stack.is_config_up() {
            return Err(NetError::NotConnected);
        }
        // embedded-tls has no X.509 chain validation, so the anchor is not
        // checked against the server certificate.
        debug!("HTTP: GET {} (anchor {} bytes)", url, trust_anchor.len());

        with_timeout(Duration::from_millis(FETCH_TIMEOUT_MS), self.get(url, buf))
            .await
            .map_err(|_| NetError::Timeout)?
    }
}

#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}
