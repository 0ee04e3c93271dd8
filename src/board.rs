//! T-Display board glue: button lines, backlight, panel power and clock.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use blockpager::{Clock, PowerControl, RawButtons};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Input, Output};
use esp_hal::spi::master::Spi;
use esp_hal::Blocking;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7789;

/// ST7789 behind an exclusive SPI device.
pub type Tft = mipidsi::Display<
    SpiInterface<'static, ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, Delay>, Output<'static>>,
    ST7789,
    Output<'static>,
>;

/// Both buttons pull their line low when pressed.
pub struct GpioButtons {
    b1: Input<'static>,
    b2: Input<'static>,
}

impl GpioButtons {
    pub fn new(b1: Input<'static>, b2: Input<'static>) -> Self {
        Self { b1, b2 }
    }
}

impl RawButtons for GpioButtons {
    fn read(&mut self) -> (bool, bool) {
        (self.b1.is_low(), self.b2.is_low())
    }
}

// Panel sleep/wake requests from the idle timer task. The panel itself is
// owned by the renderer in the main loop, which applies them.
static PANEL_CHANGED: AtomicBool = AtomicBool::new(false);
static PANEL_ON: AtomicBool = AtomicBool::new(true);

/// Backlight GPIO plus deferred panel sleep.
pub struct PanelPower {
    backlight: Mutex<CriticalSectionRawMutex, RefCell<Output<'static>>>,
}

impl PanelPower {
    pub fn new(backlight: Output<'static>) -> Self {
        Self {
            backlight: Mutex::new(RefCell::new(backlight)),
        }
    }

    fn request_panel(&self, on: bool) {
        PANEL_ON.store(on, Ordering::Relaxed);
        PANEL_CHANGED.store(true, Ordering::Release);
    }
}

impl PowerControl for PanelPower {
    fn backlight_on(&self) {
        self.backlight.lock(|bl| bl.borrow_mut().set_high());
    }

    fn backlight_off(&self) {
        self.backlight.lock(|bl| bl.borrow_mut().set_low());
    }

    fn display_on(&self) {
        self.request_panel(true);
    }

    fn display_off(&self) {
        self.request_panel(false);
    }
}

/// Send a pending sleep or wake command to the panel. Main loop only.
pub fn apply_panel_power(tft: &mut Tft, delay: &mut impl DelayNs) {
    if !PANEL_CHANGED.swap(false, Ordering::Acquire) {
        return;
    }

    let result = if PANEL_ON.load(Ordering::Relaxed) {
        tft.wake(delay)
    } else {
        tft.sleep(delay)
    };
    if result.is_err() {
        defmt::warn!("Panel power command failed");
    }
}

/// Milliseconds since boot from the embassy time driver.
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
