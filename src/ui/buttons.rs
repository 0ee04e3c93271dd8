//! Two-button input with tick-based debouncing.
//!
//! Both buttons are sampled once per main-loop tick (no edge interrupts).
//! A press must stay stable for `debounce_ticks` consecutive polls before
//! it activates; after that the held button reports a repeat on every
//! tick until release. Pressing the second button at any point switches
//! to the "both" branch.

use super::ButtonState;
use crate::config::DEBOUNCE_TICKS;

/// Source of the two raw button levels (`true` = pressed).
pub trait RawButtons {
    fn read(&mut self) -> (bool, bool);
}

/// Pure debounce state machine over two boolean inputs.
pub struct ButtonDebouncer {
    state: ButtonState,
    ticks_in_state: u32,
    debounce_ticks: u32,
}

impl ButtonDebouncer {
    pub const fn new(debounce_ticks: u32) -> Self {
        Self {
            state: ButtonState::None,
            ticks_in_state: 0,
            debounce_ticks,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Consecutive polls since the last transition.
    pub fn ticks_in_state(&self) -> u32 {
        self.ticks_in_state
    }

    /// Advance one tick with the sampled levels; returns the post-transition
    /// state.
    ///
    /// Activation follows `debounce_ticks` polls spent in `*Held`, so the
    /// first `*Activated` is reported on poll `debounce_ticks + 2` of a hold.
    pub fn step(&mut self, b1: bool, b2: bool) -> ButtonState {
        let both = b1 && b2;
        let settled = self.ticks_in_state >= self.debounce_ticks;

        let next = match self.state {
            ButtonState::None => {
                if both {
                    ButtonState::BothHeld
                } else if b1 {
                    ButtonState::B1Held
                } else if b2 {
                    ButtonState::B2Held
                } else {
                    ButtonState::None
                }
            }
            ButtonState::B1Held => {
                if !b1 {
                    ButtonState::None
                } else if b2 {
                    ButtonState::BothHeld
                } else if settled {
                    ButtonState::B1Activated
                } else {
                    ButtonState::B1Held
                }
            }
            ButtonState::B2Held => {
                if !b2 {
                    ButtonState::None
                } else if b1 {
                    ButtonState::BothHeld
                } else if settled {
                    ButtonState::B2Activated
                } else {
                    ButtonState::B2Held
                }
            }
            ButtonState::BothHeld => {
                if !both {
                    ButtonState::None
                } else if settled {
                    ButtonState::BothActivated
                } else {
                    ButtonState::BothHeld
                }
            }
            // Only releasing the button ends a repeat; the other button
            // joining mid-hold is ignored.
            ButtonState::B1Activated | ButtonState::B1Repeat => {
                if !b1 {
                    ButtonState::None
                } else {
                    ButtonState::B1Repeat
                }
            }
            ButtonState::B2Activated | ButtonState::B2Repeat => {
                if !b2 {
                    ButtonState::None
                } else {
                    ButtonState::B2Repeat
                }
            }
            ButtonState::BothActivated | ButtonState::BothRepeat => {
                if !both {
                    ButtonState::None
                } else {
                    ButtonState::BothRepeat
                }
            }
        };

        if next != self.state {
            info!("Button: {} (b1:{}, b2:{})", next, b1, b2);
            self.state = next;
            self.ticks_in_state = 0;
        } else {
            self.ticks_in_state = self.ticks_in_state.saturating_add(1);
        }

        next
    }
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_TICKS)
    }
}

/// Debouncer bound to a concrete pair of input lines.
pub struct Buttons<I> {
    input: I,
    debouncer: ButtonDebouncer,
}

impl<I: RawButtons> Buttons<I> {
    pub fn new(input: I, debounce_ticks: u32) -> Self {
        Self {
            input,
            debouncer: ButtonDebouncer::new(debounce_ticks),
        }
    }

    /// Sample both lines and advance the debouncer; call once per tick.
    pub fn poll(&mut self) -> ButtonState {
        let (b1, b2) = self.input.read();
        self.debouncer.step(b1, b2)
    }

    pub fn debouncer(&self) -> &ButtonDebouncer {
        &self.debouncer
    }
}
