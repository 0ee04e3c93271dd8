//! blockpager firmware for the TTGO T-Display (ESP32 + ST7789).
//!
//! Boot: heap -> RTOS -> buttons -> display -> Wi-Fi stack -> home page.
//! Main loop: every 10 ms poll the buttons, dispatch the event to the
//! navigator and apply any pending panel sleep/wake. A separate task
//! polls the idle timer.

#![no_std]
#![no_main]

extern crate alloc;

mod board;
mod wifi;

use blockpager::config::{
    AUTO_REPEAT_TICKS, DEBOUNCE_TICKS, DISPLAY_HEIGHT, DISPLAY_OFFSET_X, DISPLAY_OFFSET_Y,
    DISPLAY_SPI_HZ, DISPLAY_WIDTH, IDLE_POLL_MS, SCREEN_IDLE_TIMEOUT_MS, TICK_PERIOD_MS,
};
use blockpager::{Buttons, Navigator, PowerManager, ScreenRenderer};
use board::{EmbassyClock, GpioButtons, PanelPower};
use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_time::{Duration, Ticker};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::ram;
use esp_hal::rng::Rng;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;
use esp_radio::Controller;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7789;
use mipidsi::options::ColorInversion;
use mipidsi::Builder;
use wifi::{EspWifi, HttpBuffers, TcpState, HTTP_RX_BUF_SIZE, TLS_READ_BUF_SIZE, TLS_WRITE_BUF_SIZE};

esp_bootloader_esp_idf::esp_app_desc!();

macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}

type Power = PowerManager<PanelPower, EmbassyClock>;

#[embassy_executor::task]
async fn idle_timer_task(power: &'static Power) {
    let mut ticker = Ticker::every(Duration::from_millis(IDLE_POLL_MS));
    loop {
        if power.poll_timer() {
            info!("Idle timeout");
        }
        ticker.next().await;
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[ram(reclaimed)] size: 64 * 1024);
    esp_alloc::heap_allocator!(size: 36 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);
    info!("blockpager starting");

    // ── Buttons ─────────────────────────────────────────────────
    // GPIO35 is input-only; the board has external pull-ups on both.
    let b1 = Input::new(peripherals.GPIO35, InputConfig::default());
    let b2 = Input::new(peripherals.GPIO0, InputConfig::default().with_pull(Pull::Up));
    let mut buttons = Buttons::new(GpioButtons::new(b1, b2), DEBOUNCE_TICKS);

    // ── Display ─────────────────────────────────────────────────
    let backlight = Output::new(peripherals.GPIO4, Level::High, OutputConfig::default());
    let cs = Output::new(peripherals.GPIO5, Level::High, OutputConfig::default());
    let dc = Output::new(peripherals.GPIO16, Level::Low, OutputConfig::default());
    let rst = Output::new(peripherals.GPIO23, Level::High, OutputConfig::default());

    let spi_cfg = SpiConfig::default()
        .with_frequency(Rate::from_hz(DISPLAY_SPI_HZ))
        .with_mode(Mode::_0);
    let spi_bus = Spi::new(peripherals.SPI2, spi_cfg)
        .expect("SPI config rejected")
        .with_sck(peripherals.GPIO18)
        .with_mosi(peripherals.GPIO19);
    let spi_dev = ExclusiveDevice::new(spi_bus, cs, Delay::new()).expect("SPI CS setup failed");

    let di_buf = mk_static!([u8; 512], [0u8; 512]);
    let di = SpiInterface::new(spi_dev, dc, di_buf);
    let mut delay = Delay::new();
    let tft = Builder::new(ST7789, di)
        .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .display_offset(DISPLAY_OFFSET_X, DISPLAY_OFFSET_Y)
        .invert_colors(ColorInversion::Inverted)
        .reset_pin(rst)
        .init(&mut delay)
        .expect("ST7789 init failed");
    info!("Display ready");

    // ── Wi-Fi + network stack ───────────────────────────────────
    let radio = &*mk_static!(
        Controller<'static>,
        esp_radio::init().expect("radio init failed")
    );
    let (controller, interfaces) = esp_radio::wifi::new(radio, peripherals.WIFI, Default::default())
        .expect("Wi-Fi init failed");

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        mk_static!(StackResources<3>, StackResources::<3>::new()),
        seed,
    );
    spawner.spawn(wifi::net_task(runner)).ok();

    let http = HttpBuffers {
        tcp: mk_static!(TcpState, TcpState::new()),
        tls_read: mk_static!([u8; TLS_READ_BUF_SIZE], [0u8; TLS_READ_BUF_SIZE]),
        tls_write: mk_static!([u8; TLS_WRITE_BUF_SIZE], [0u8; TLS_WRITE_BUF_SIZE]),
        rx: mk_static!([u8; HTTP_RX_BUF_SIZE], [0u8; HTTP_RX_BUF_SIZE]),
    };
    let net = EspWifi::new(controller, stack, http);

    // ── Power + navigation ──────────────────────────────────────
    let power: &'static Power = mk_static!(
        Power,
        PowerManager::new(PanelPower::new(backlight), EmbassyClock, SCREEN_IDLE_TIMEOUT_MS)
    );
    spawner.spawn(idle_timer_task(power)).ok();

    let renderer = ScreenRenderer::new(tft, net);
    let mut navigator = Navigator::new(renderer, power).with_auto_repeat(AUTO_REPEAT_TICKS);
    if let Err(e) = navigator.boot().await {
        error!("Home page failed: {}", e);
    }

    let mut ticker = Ticker::every(Duration::from_millis(TICK_PERIOD_MS));
    loop {
        let event = buttons.poll();
        navigator.dispatch(event).await;
        board::apply_panel_power(navigator.renderer_mut().panel_mut(), &mut delay);
        ticker.next().await;
    }
}
