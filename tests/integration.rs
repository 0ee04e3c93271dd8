//! Integration tests for blockpager host-testable logic.
//!
//! Drives the real `ScreenRenderer` on a framebuffer through the
//! navigator, with the network answered from a script.

use std::cell::Cell;
use std::string::{String, ToString};
use std::vec::Vec;

use blockpager::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SUBMIT_CHAR};
use blockpager::{
    AccessPointBrief, AccessPointList, ButtonState, Clock, NetError, NetworkService, Navigator,
    PageId, PowerControl, PowerManager, ScreenRenderer,
};
use embassy_futures::block_on;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

// ═══════════════════════════════════════════════════════════════════════════
// Doubles
// ═══════════════════════════════════════════════════════════════════════════

/// 135x240 RGB565 framebuffer. Out-of-bounds pixels are dropped.
struct Framebuffer {
    pixels: Vec<Rgb565>,
}

impl Framebuffer {
    fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; DISPLAY_WIDTH as usize * DISPLAY_HEIGHT as usize],
        }
    }

    fn count(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    fn snapshot(&self) -> Vec<Rgb565> {
        self.pixels.clone()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(u32::from(DISPLAY_WIDTH), u32::from(DISPLAY_HEIGHT))
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let w = i32::from(DISPLAY_WIDTH);
        let h = i32::from(DISPLAY_HEIGHT);
        for Pixel(p, color) in pixels {
            if (0..w).contains(&p.x) && (0..h).contains(&p.y) {
                self.pixels[(p.y * w + p.x) as usize] = color;
            }
        }
        Ok(())
    }
}

/// Network answered from fixed results.
struct ScriptedNet {
    aps: Result<Vec<AccessPointBrief>, NetError>,
    connect: Result<(), NetError>,
    body: Result<&'static [u8], NetError>,
    connects: Vec<(String, String)>,
    fetches: u32,
}

impl ScriptedNet {
    fn healthy() -> Self {
        Self {
            aps: Ok(vec![
                AccessPointBrief::new("cafe", -70, false),
                AccessPointBrief::new("home", -40, true),
                AccessPointBrief::new("home", -80, true),
                AccessPointBrief::new("", -30, true),
            ]),
            connect: Ok(()),
            body: Ok(b"867530\n"),
            connects: Vec::new(),
            fetches: 0,
        }
    }
}

impl NetworkService for ScriptedNet {
    async fn scan(&mut self, max: usize) -> Result<AccessPointList, NetError> {
        let aps = self.aps.clone()?;
        Ok(aps.into_iter().take(max).collect())
    }

    async fn connect(&mut self, ssid: &str, password: &str) -> Result<(), NetError> {
        self.connects.push((ssid.to_string(), password.to_string()));
        self.connect
    }

    async fn fetch(
        &mut self,
        _url: &str,
        trust_anchor: &str,
        buf: &mut [u8],
    ) -> Result<usize, NetError> {
        assert!(trust_anchor.contains("BEGIN CERTIFICATE"));
        self.fetches += 1;
        let body = self.body?;
        let dst = buf.get_mut(..body.len()).ok_or(NetError::BufferOverflow)?;
        dst.copy_from_slice(body);
        Ok(body.len())
    }
}

#[derive(Default)]
struct Clk(Cell<u64>);

impl Clock for &Clk {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

#[derive(Default)]
struct Backlight(Cell<bool>);

impl PowerControl for &Backlight {
    fn backlight_on(&self) {
        self.0.set(true);
    }
    fn backlight_off(&self) {
        self.0.set(false);
    }
    fn display_on(&self) {}
    fn display_off(&self) {}
}

type Nav<'p> = Navigator<'p, ScreenRenderer<Framebuffer, ScriptedNet>, &'p Backlight, &'p Clk>;

fn press(nav: &mut Nav<'_>, event: ButtonState) {
    block_on(nav.dispatch(event));
}

fn net<'a>(nav: &'a mut Nav<'_>) -> &'a mut ScriptedNet {
    nav.renderer_mut().net_mut()
}

// ═══════════════════════════════════════════════════════════════════════════
// Flows
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn home_to_blockheight_over_secured_network() {
    let (light, clock) = (Backlight(Cell::new(true)), Clk::default());
    let power = PowerManager::new(&light, &clock, 60_000);
    let mut nav = Navigator::new(ScreenRenderer::new(Framebuffer::new(), ScriptedNet::healthy()), &power);

    block_on(nav.boot()).expect("home page");
    assert_eq!(nav.current_page(), PageId::Home);
    assert!(nav.renderer().panel().count(Rgb565::BLUE) > 0);

    // Scan: hidden network dropped, duplicate collapsed, strongest first.
    press(&mut nav, ButtonState::B1Activated);
    assert_eq!(nav.current_page(), PageId::WifiList);
    let ssids: Vec<&str> = nav.context().ap_list().iter().map(|ap| ap.ssid.as_str()).collect();
    assert_eq!(ssids, ["home", "cafe"]);

    // "home" is secured and under the cursor.
    press(&mut nav, ButtonState::BothActivated);
    assert_eq!(nav.current_page(), PageId::WifiEnterPassword);

    // Enter "!" (space + 1), then jump to submit and confirm.
    press(&mut nav, ButtonState::B2Activated);
    press(&mut nav, ButtonState::BothActivated);
    assert_eq!(nav.context().user_text_entry(), "!");
    while nav.context().next_char() != SUBMIT_CHAR {
        press(&mut nav, ButtonState::B1Activated);
    }
    press(&mut nav, ButtonState::BothActivated);

    assert_eq!(nav.current_page(), PageId::WifiConnected);
    assert_eq!(net(&mut nav).connects, [("home".to_string(), "!".to_string())]);

    press(&mut nav, ButtonState::B2Activated);
    assert_eq!(nav.current_page(), PageId::Blockheight);
    assert_eq!(nav.context().block_height(), Some(867_530));

    // Reload fetches again, both buttons go home.
    press(&mut nav, ButtonState::B1Activated);
    assert_eq!(net(&mut nav).fetches, 2);
    press(&mut nav, ButtonState::BothActivated);
    assert_eq!(nav.current_page(), PageId::Home);
}

#[test]
fn open_network_connects_without_password() {
    let (light, clock) = (Backlight(Cell::new(true)), Clk::default());
    let power = PowerManager::new(&light, &clock, 60_000);
    let mut nav = Navigator::new(ScreenRenderer::new(Framebuffer::new(), ScriptedNet::healthy()), &power);
    block_on(nav.boot()).expect("home page");

    press(&mut nav, ButtonState::B2Activated);
    press(&mut nav, ButtonState::B2Activated);
    assert_eq!(nav.context().cursor(), 1);
    press(&mut nav, ButtonState::BothActivated);

    assert_eq!(nav.current_page(), PageId::WifiConnected);
    assert_eq!(net(&mut nav).connects, [("cafe".to_string(), String::new())]);
}

#[test]
fn exit_row_returns_home() {
    let (light, clock) = (Backlight(Cell::new(true)), Clk::default());
    let power = PowerManager::new(&light, &clock, 60_000);
    let mut nav = Navigator::new(ScreenRenderer::new(Framebuffer::new(), ScriptedNet::healthy()), &power);
    block_on(nav.boot()).expect("home page");

    press(&mut nav, ButtonState::B1Activated);
    // The list wraps: two networks, then the Exit row.
    for _ in 0..nav.context().ap_count() {
        press(&mut nav, ButtonState::B2Activated);
    }
    assert_eq!(nav.context().cursor(), nav.context().ap_count());
    press(&mut nav, ButtonState::BothActivated);
    assert_eq!(nav.current_page(), PageId::Home);
}

#[test]
fn network_failures_land_on_failure_pages() {
    let (light, clock) = (Backlight(Cell::new(true)), Clk::default());
    let power = PowerManager::new(&light, &clock, 60_000);
    let mut script = ScriptedNet::healthy();
    script.aps = Err(NetError::ScanFailed);
    let mut nav = Navigator::new(ScreenRenderer::new(Framebuffer::new(), script), &power);
    block_on(nav.boot()).expect("home page");

    press(&mut nav, ButtonState::B1Activated);
    assert_eq!(nav.current_page(), PageId::WifiScanFail);
    press(&mut nav, ButtonState::B2Activated);
    assert_eq!(nav.current_page(), PageId::Home);

    // Connect failures are retried before giving up.
    net(&mut nav).aps = ScriptedNet::healthy().aps;
    net(&mut nav).connect = Err(NetError::Timeout);
    press(&mut nav, ButtonState::B1Activated);
    press(&mut nav, ButtonState::B2Activated);
    press(&mut nav, ButtonState::BothActivated);
    assert_eq!(nav.current_page(), PageId::WifiConnectFail);
    assert_eq!(net(&mut nav).connects.len(), 3);

    // A garbage body is a failed load, not a height of zero.
    press(&mut nav, ButtonState::B1Activated);
    net(&mut nav).connect = Ok(());
    press(&mut nav, ButtonState::B1Activated);
    press(&mut nav, ButtonState::B2Activated);
    press(&mut nav, ButtonState::BothActivated);
    assert_eq!(nav.current_page(), PageId::WifiConnected);
    net(&mut nav).body = Ok(b"<html>");
    press(&mut nav, ButtonState::B1Activated);
    assert_eq!(nav.current_page(), PageId::BlockheightFail);
    assert_eq!(nav.context().block_height(), None);
}

#[test]
fn idle_blanks_and_first_press_only_wakes() {
    let (light, clock) = (Backlight(Cell::new(true)), Clk::default());
    let power = PowerManager::new(&light, &clock, 60_000);
    let mut nav = Navigator::new(ScreenRenderer::new(Framebuffer::new(), ScriptedNet::healthy()), &power);
    block_on(nav.boot()).expect("home page");
    let before = nav.renderer().panel().snapshot();

    clock.0.set(60_000);
    assert!(power.poll_timer());
    assert!(!light.0.get());

    press(&mut nav, ButtonState::B1Activated);
    assert!(light.0.get());
    assert_eq!(nav.current_page(), PageId::Home);
    assert_eq!(nav.renderer().panel().snapshot(), before);

    press(&mut nav, ButtonState::None);
    press(&mut nav, ButtonState::B1Activated);
    assert_eq!(nav.current_page(), PageId::WifiList);
}

// ═══════════════════════════════════════════════════════════════════════════
// Renderer
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn renderer_draws_every_page() {
    use blockpager::{NavigationContext, PageError, PageRenderer};

    let mut renderer = ScreenRenderer::new(Framebuffer::new(), ScriptedNet::healthy());
    let mut ctx = NavigationContext::new();

    let pages = [
        PageId::Home,
        PageId::WifiScan,
        PageId::WifiScanFail,
        PageId::WifiList,
        PageId::WifiEnterPassword,
        PageId::WifiConnectFail,
        PageId::WifiConnected,
        PageId::BlockheightLoad,
        PageId::BlockheightFail,
        PageId::Blockheight,
    ];
    for page in pages {
        renderer.init(page).expect("init");
        block_on(renderer.display(page, &mut ctx)).expect("display");
        let total = usize::from(DISPLAY_WIDTH) * usize::from(DISPLAY_HEIGHT);
        assert!(
            renderer.panel().count(Rgb565::WHITE) < total,
            "{page:?} drew nothing over the background"
        );
    }

    // Connect needs a selection; without one the page is refused.
    assert_eq!(
        block_on(renderer.display(PageId::WifiConnect, &mut ctx)),
        Err(PageError::InvalidPage)
    );
    assert_eq!(renderer.init(PageId::None), Err(PageError::InvalidPage));
}

#[test]
fn renderer_maps_network_failures() {
    use blockpager::{NavigationContext, PageError, PageRenderer};

    let mut script = ScriptedNet::healthy();
    script.aps = Err(NetError::ScanFailed);
    script.body = Err(NetError::Tls);
    let mut renderer = ScreenRenderer::new(Framebuffer::new(), script);
    let mut ctx = NavigationContext::new();

    assert_eq!(
        block_on(renderer.display(PageId::WifiScan, &mut ctx)),
        Err(PageError::Network(NetError::ScanFailed))
    );
    assert_eq!(
        block_on(renderer.display(PageId::BlockheightLoad, &mut ctx)),
        Err(PageError::Network(NetError::Tls))
    );
    assert_eq!(ctx.block_height(), None);

    // A body longer than the fetch buffer is an overflow, not a parse error.
    renderer.net_mut().body = Ok(&[b'1'; 80]);
    assert_eq!(
        block_on(renderer.display(PageId::BlockheightLoad, &mut ctx)),
        Err(PageError::Network(NetError::BufferOverflow))
    );
}
