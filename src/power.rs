//! Power management module - screen blanking after inactivity.
//!
//! Implements:
//! - A restartable one-shot idle timer (default 60 s)
//! - Backlight and panel sleep when it fires
//! - Wake on the next button activation
//!
//! The timer is polled from its own task while the main loop wakes, stops
//! and restarts it, so all state sits behind one blocking mutex and every
//! check-and-act happens inside a single critical section.

use crate::power_logic;
use core::cell::RefCell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Backlight and panel power switches.
pub trait PowerControl {
    fn backlight_on(&self);
    fn backlight_off(&self);
    fn display_on(&self);
    fn display_off(&self);
}

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

struct IdleState {
    screen_on: bool,
    deadline_ms: Option<u64>,
}

/// Idle timer and screen power state.
pub struct PowerManager<P, C> {
    control: P,
    clock: C,
    period_ms: u64,
    state: Mutex<CriticalSectionRawMutex, RefCell<IdleState>>,
}

impl<P: PowerControl, C: Clock> PowerManager<P, C> {
    /// Screen on, timer armed for `period_ms` from now.
    pub fn new(control: P, clock: C, period_ms: u64) -> Self {
        let deadline = power_logic::deadline_after(clock.now_ms(), period_ms);
        Self {
            control,
            clock,
            period_ms,
            state: Mutex::new(RefCell::new(IdleState {
                screen_on: true,
                deadline_ms: Some(deadline),
            })),
        }
    }

    pub fn screen_on(&self) -> bool {
        self.state.lock(|s| s.borrow().screen_on)
    }

    pub fn timer_armed(&self) -> bool {
        self.state.lock(|s| s.borrow().deadline_ms.is_some())
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn control(&self) -> &P {
        &self.control
    }

    /// Idle period elapsed: blank the screen. The timer is one-shot and
    /// stays disarmed until the next wake.
    pub fn on_timer_expiry(&self) {
        self.state.lock(|s| {
            self.expire(&mut s.borrow_mut());
        });
    }

    /// Called on a button activation. Returns `true` when the screen was
    /// off and has been switched back on, meaning the activation is spent.
    pub fn wake_if_needed(&self) -> bool {
        let now = self.clock.now_ms();
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.deadline_ms = Some(power_logic::deadline_after(now, self.period_ms));
            if s.screen_on {
                return false;
            }

            self.control.backlight_on();
            self.control.display_on();
            s.screen_on = true;
            info!("Power: screen on");
            true
        })
    }

    pub fn stop_timer(&self) {
        self.state.lock(|s| s.borrow_mut().deadline_ms = None);
    }

    /// Arm the timer for a full period from now.
    pub fn restart_timer(&self) {
        let now = self.clock.now_ms();
        self.state.lock(|s| {
            s.borrow_mut().deadline_ms = Some(power_logic::deadline_after(now, self.period_ms));
        });
    }

    /// Timer context entry point: fire the expiry if the deadline has
    /// passed. Returns `true` when this call blanked the screen.
    pub fn poll_timer(&self) -> bool {
        let now = self.clock.now_ms();
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            if !power_logic::timer_expired(s.deadline_ms, now) {
                return false;
            }
            self.expire(&mut s)
        })
    }

    fn expire(&self, s: &mut IdleState) -> bool {
        s.deadline_ms = None;
        if !s.screen_on {
            return false;
        }

        self.control.backlight_off();
        self.control.display_off();
        s.screen_on = false;
        info!("Power: idle, screen off");
        true
    }
}
