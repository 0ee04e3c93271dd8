use crate::config::{FIRST_ENTRY_CHAR, SUBMIT_CHAR};

/// Move the list cursor one row up; row 0 wraps to the Exit row
/// (`item_count`).
pub fn select_prev(selected: usize, item_count: usize) -> usize {
    if selected == 0 {
        item_count
    } else {
        selected - 1
    }
}

/// Move the list cursor one row down; the Exit row (or anything past it)
/// wraps to row 0.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if selected >= item_count {
        0
    } else {
        selected + 1
    }
}

/// Previous password candidate; wraps from space to the submit sentinel.
pub fn char_prev(current: u8) -> u8 {
    if current <= FIRST_ENTRY_CHAR || current > SUBMIT_CHAR {
        SUBMIT_CHAR
    } else {
        current - 1
    }
}

/// Next password candidate; wraps from the submit sentinel to space.
pub fn char_next(current: u8) -> u8 {
    if current >= SUBMIT_CHAR || current < FIRST_ENTRY_CHAR {
        FIRST_ENTRY_CHAR
    } else {
        current + 1
    }
}
