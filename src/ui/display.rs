//! Page renderer for the 135x240 ST7789 panel.
//!
//! Draws with `embedded-graphics` onto any `Rgb565` draw target, so the
//! same code runs against `mipidsi` on the device and a framebuffer in
//! tests. The scan, connect and block height pages also run their network
//! operation here before returning.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::FONT_8X13;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use super::context::NavigationContext;
use super::navigator::PageRenderer;
use super::PageId;
use crate::config::{
    BACKSPACE_CHAR, BLOCKHEIGHT_TRUST_ANCHOR, BLOCKHEIGHT_URL, DISPLAY_WIDTH, FETCH_BUFFER_SIZE,
    LAST_PRINTABLE_CHAR, MAX_ACCESS_POINTS, SUBMIT_CHAR, WIFI_CONNECT_ATTEMPTS,
};
use crate::error::{NetError, PageError};
use crate::net::blockheight::parse_block_height;
use crate::net::scan::collect_access_points;
use crate::net::{connect_with_retries, NetworkService};

const FONT: &MonoFont = &FONT_8X13;
const CHAR_WIDTH: i32 = FONT.character_size.width as i32;
/// Rows are spaced a little wider than the glyphs.
const LINE_HEIGHT: i32 = 16;
const MARGIN: i32 = LINE_HEIGHT / 2;
const WIDTH: i32 = DISPLAY_WIDTH as i32;

const BACKGROUND: Rgb565 = Rgb565::WHITE;
const TEXT_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(FONT, Rgb565::BLACK);
const ALERT_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(FONT, Rgb565::RED);
const CURSOR_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(Rgb565::RED);
const INPUT_BOX_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(Rgb565::RED, 1);

/// Underlined blue text for things the user can act on.
fn command_style() -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyleBuilder::new()
        .font(FONT)
        .text_color(Rgb565::BLUE)
        .underline_with_color(Rgb565::BLUE)
        .build()
}

/// Baseline of text row `n` (1-based; row 1 is left blank as a header gap).
const fn row(n: i32) -> i32 {
    LINE_HEIGHT * n - 1
}

/// Split `text` into lines of at most `max_chars` characters.
pub fn wrap_lines(text: &str, max_chars: usize) -> WrapLines<'_> {
    WrapLines {
        rest: text,
        max_chars: max_chars.max(1),
    }
}

pub struct WrapLines<'a> {
    rest: &'a str,
    max_chars: usize,
}

impl<'a> Iterator for WrapLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let split = self
            .rest
            .char_indices()
            .nth(self.max_chars)
            .map_or(self.rest.len(), |(i, _)| i);
        let (line, rest) = self.rest.split_at(split);
        self.rest = rest;
        Some(line)
    }
}

/// Longest prefix of `text` that fits `max_chars` characters.
fn clip(text: &str, max_chars: usize) -> &str {
    wrap_lines(text, max_chars).next().unwrap_or("")
}

/// Draws every page and runs page I/O through `N`.
pub struct ScreenRenderer<D, N> {
    display: D,
    net: N,
}

impl<D, N> ScreenRenderer<D, N>
where
    D: DrawTarget<Color = Rgb565>,
    N: NetworkService,
{
    pub fn new(display: D, net: N) -> Self {
        Self { display, net }
    }

    pub fn panel(&self) -> &D {
        &self.display
    }

    /// Direct panel access, e.g. for sleep/wake commands.
    pub fn panel_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn net_mut(&mut self) -> &mut N {
        &mut self.net
    }

    fn clear(&mut self) -> Result<(), PageError> {
        self.display.clear(BACKGROUND).map_err(|_| PageError::Display)
    }

    /// Draw `text` with its baseline at `y`; returns the x just past it.
    fn text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        style: MonoTextStyle<'static, Rgb565>,
    ) -> Result<i32, PageError> {
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Bottom)
            .draw(&mut self.display)
            .map(|end| end.x)
            .map_err(|_| PageError::Display)
    }

    /// Clear and draw a short message starting at row 2.
    fn message(&mut self, lines: &[&str]) -> Result<(), PageError> {
        self.clear()?;
        for (n, line) in (2..).zip(lines) {
            self.text(line, MARGIN, row(n), TEXT_STYLE)?;
        }
        Ok(())
    }

    /// Right-pointing triangle centred on (`x`, `y`).
    fn cursor(&mut self, x: i32, y: i32) -> Result<(), PageError> {
        let half = (LINE_HEIGHT - 4) / 2;
        Triangle::new(
            Point::new(x - half, y - half),
            Point::new(x - half, y + half),
            Point::new(x + half, y),
        )
        .into_styled(CURSOR_STYLE)
        .draw(&mut self.display)
        .map_err(|_| PageError::Display)
    }

    fn draw_home(&mut self) -> Result<(), PageError> {
        self.clear()?;
        self.text("Press button to", MARGIN, row(2), command_style())?;
        self.text("scan wifi", MARGIN, row(3), command_style())?;
        Ok(())
    }

    fn draw_list(&mut self, ctx: &NavigationContext) -> Result<(), PageError> {
        self.clear()?;
        let max_chars = ((WIDTH - LINE_HEIGHT) / CHAR_WIDTH) as usize;

        for (i, ap) in ctx.ap_list().iter().enumerate() {
            let baseline = row(i as i32 + 2);
            if ctx.cursor() == i {
                self.cursor(MARGIN, baseline - LINE_HEIGHT / 2)?;
            }
            self.text(clip(&ap.ssid, max_chars), LINE_HEIGHT, baseline, TEXT_STYLE)?;
        }

        let exit = row(ctx.ap_count() as i32 + 3);
        if ctx.cursor() >= ctx.ap_count() {
            self.cursor(MARGIN, exit - LINE_HEIGHT / 2)?;
        }
        self.text("Exit", LINE_HEIGHT, exit, command_style())?;
        Ok(())
    }

    fn draw_password(&mut self, ctx: &NavigationContext) -> Result<(), PageError> {
        self.message(&["Enter WiFi", "Password:"])?;

        // Entered text wraps, leaving room for the candidate on the last line.
        let max_chars = ((WIDTH - CHAR_WIDTH * 4) / CHAR_WIDTH) as usize;
        let mut x = MARGIN;
        let mut y = row(5);
        for line in wrap_lines(ctx.user_text_entry(), max_chars) {
            x = self.text(line, MARGIN, y, TEXT_STYLE)?;
            y += LINE_HEIGHT;
        }
        if ctx.user_text_entry().is_empty() {
            y += LINE_HEIGHT;
        }
        let baseline = y - LINE_HEIGHT;

        match ctx.next_char() {
            BACKSPACE_CHAR => {
                self.text("<-", x + CHAR_WIDTH, baseline, ALERT_STYLE)?;
            }
            SUBMIT_CHAR => {
                self.text("->", x + CHAR_WIDTH, baseline, ALERT_STYLE)?;
            }
            c if c <= LAST_PRINTABLE_CHAR => {
                let mut candidate: String<1> = String::new();
                let _ = candidate.push(char::from(c));
                self.text(&candidate, x, baseline, TEXT_STYLE)?;
                Rectangle::new(
                    Point::new(x, baseline - LINE_HEIGHT),
                    Size::new(CHAR_WIDTH as u32 + 1, LINE_HEIGHT as u32 + 1),
                )
                .into_styled(INPUT_BOX_STYLE)
                .draw(&mut self.display)
                .map_err(|_| PageError::Display)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn draw_blockheight(&mut self, height: Option<u32>) -> Result<(), PageError> {
        let mut value: String<12> = String::new();
        match height {
            Some(h) => {
                let _ = write!(value, "{}", h);
            }
            None => {
                let _ = value.push('-');
            }
        }
        self.message(&["Blockheight:", value.as_str()])?;
        self.text("Reload", MARGIN, row(5), command_style())?;
        Ok(())
    }

    async fn scan(&mut self, ctx: &mut NavigationContext) -> Result<(), PageError> {
        self.message(&["Scanning WiFi..."])?;
        let found = self.net.scan(MAX_ACCESS_POINTS).await?;
        let list = collect_access_points(found, MAX_ACCESS_POINTS);
        info!("Scan: {} access points", list.len());
        ctx.set_access_points(list);
        Ok(())
    }

    async fn connect(&mut self, ctx: &NavigationContext) -> Result<(), PageError> {
        let Some(ap) = ctx.selected_ap() else {
            error!("Connect page without a selected access point");
            return Err(PageError::InvalidPage);
        };

        self.message(&["Connecting to", "WiFi..."])?;
        connect_with_retries(&mut self.net, &ap.ssid, ctx.password(), WIFI_CONNECT_ATTEMPTS)
            .await?;
        Ok(())
    }

    async fn load_blockheight(&mut self, ctx: &mut NavigationContext) -> Result<(), PageError> {
        self.message(&["Loading", "Blockheight..."])?;

        let mut buf = [0u8; FETCH_BUFFER_SIZE];
        let len = self
            .net
            .fetch(BLOCKHEIGHT_URL, BLOCKHEIGHT_TRUST_ANCHOR, &mut buf)
            .await?;
        let body = buf.get(..len).ok_or(NetError::BufferOverflow)?;

        let Some(height) = parse_block_height(body) else {
            warn!("Blockheight: unexpected response ({} bytes)", len);
            return Err(PageError::InvalidResponse);
        };
        info!("Blockheight: {}", height);
        ctx.set_block_height(Some(height));
        Ok(())
    }
}

impl<D, N> PageRenderer for ScreenRenderer<D, N>
where
    D: DrawTarget<Color = Rgb565>,
    N: NetworkService,
{
    fn init(&mut self, page: PageId) -> Result<(), PageError> {
        debug!("Init page {}", page);
        if page == PageId::None {
            return Err(PageError::InvalidPage);
        }
        Ok(())
    }

    async fn display(
        &mut self,
        page: PageId,
        ctx: &mut NavigationContext,
    ) -> Result<(), PageError> {
        match page {
            PageId::None => Err(PageError::InvalidPage),
            PageId::Home => self.draw_home(),
            PageId::WifiScan => self.scan(ctx).await,
            PageId::WifiScanFail => self.message(&["Failed to scan", "WiFi networks"]),
            PageId::WifiList => self.draw_list(ctx),
            PageId::WifiEnterPassword => self.draw_password(ctx),
            PageId::WifiConnect => self.connect(ctx).await,
            PageId::WifiConnectFail => self.message(&["Failed to", "connect to WiFi"]),
            PageId::WifiConnected => {
                self.message(&["WiFi Connected!"])?;
                self.text("Load blockheight", MARGIN, row(4), command_style())?;
                Ok(())
            }
            PageId::BlockheightLoad => self.load_blockheight(ctx).await,
            PageId::BlockheightFail => self.message(&["Failed to load", "Blockheight"]),
            PageId::Blockheight => self.draw_blockheight(ctx.block_height()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_splits_into_full_lines() {
        let lines: std::vec::Vec<&str> = wrap_lines("abcdefghij", 4).collect();
        assert_eq!(lines, ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_exact_multiple_has_no_empty_tail() {
        let lines: std::vec::Vec<&str> = wrap_lines("abcdefgh", 4).collect();
        assert_eq!(lines, ["abcd", "efgh"]);
        assert_eq!(wrap_lines("", 4).count(), 0);
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        let lines: std::vec::Vec<&str> = wrap_lines("ééé", 2).collect();
        assert_eq!(lines, ["éé", "é"]);
    }

    #[test]
    fn clip_keeps_prefix() {
        assert_eq!(clip("a long network name", 6), "a long");
        assert_eq!(clip("short", 14), "short");
    }

    #[test]
    fn layout_fits_the_panel() {
        // Ten networks plus the Exit row stay on screen.
        assert!(row(MAX_ACCESS_POINTS as i32 + 3) < crate::config::DISPLAY_HEIGHT as i32);
        assert_eq!(CHAR_WIDTH, 8);
    }
}
