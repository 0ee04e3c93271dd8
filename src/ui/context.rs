//! Long-lived page state owned by the navigator.

use super::input_logic::{char_next, char_prev, select_next, select_prev};
use super::{PageAction, PageId};
use crate::config::{BACKSPACE_CHAR, FIRST_ENTRY_CHAR, SUBMIT_CHAR, USER_TEXT_CAPACITY};
use crate::net::{AccessPointBrief, AccessPointList};
use heapless::String;

/// Text buffer used for password entry.
pub type TextEntry = String<USER_TEXT_CAPACITY>;

/// Everything the pages share: the current page, the last scan result,
/// the list cursor and the password being typed.
///
/// `cursor`, `user_text_entry` and `next_char` are per-page and are reset
/// on every page change. The scan result, selection, submitted password
/// and block height survive page changes so later pages can use them.
#[derive(Debug)]
pub struct NavigationContext {
    current_page: PageId,
    ap_list: AccessPointList,
    cursor: usize,
    selected_ap: Option<AccessPointBrief>,
    user_text_entry: TextEntry,
    next_char: u8,
    password: TextEntry,
    block_height: Option<u32>,
}

impl NavigationContext {
    pub const fn new() -> Self {
        Self {
            current_page: PageId::None,
            ap_list: AccessPointList::new(),
            cursor: 0,
            selected_ap: None,
            user_text_entry: String::new(),
            next_char: FIRST_ENTRY_CHAR,
            password: String::new(),
            block_height: None,
        }
    }

    pub fn current_page(&self) -> PageId {
        self.current_page
    }

    pub(crate) fn set_current_page(&mut self, page: PageId) {
        self.current_page = page;
    }

    pub fn ap_list(&self) -> &[AccessPointBrief] {
        &self.ap_list
    }

    pub fn ap_count(&self) -> usize {
        self.ap_list.len()
    }

    /// Highlighted row; `cursor() == ap_count()` is the Exit row.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_ap(&self) -> Option<&AccessPointBrief> {
        self.selected_ap.as_ref()
    }

    pub fn user_text_entry(&self) -> &str {
        &self.user_text_entry
    }

    pub fn next_char(&self) -> u8 {
        self.next_char
    }

    /// Password captured by the last submit.
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn block_height(&self) -> Option<u32> {
        self.block_height
    }

    /// Replace the scan result. The cursor is clamped so it stays a valid
    /// row.
    pub fn set_access_points(&mut self, list: AccessPointList) {
        self.ap_list = list;
        self.cursor = self.cursor.min(self.ap_list.len());
    }

    pub fn set_block_height(&mut self, height: Option<u32>) {
        self.block_height = height;
    }

    /// Page init: cursor to the first row, empty text entry, candidate
    /// back to space.
    pub fn reset_page_state(&mut self) {
        self.cursor = 0;
        self.user_text_entry.clear();
        self.next_char = FIRST_ENTRY_CHAR;
    }

    pub fn cursor_up(&mut self) {
        self.cursor = select_prev(self.cursor, self.ap_count());
    }

    pub fn cursor_down(&mut self) {
        self.cursor = select_next(self.cursor, self.ap_count());
    }

    pub fn next_char_prev(&mut self) {
        self.next_char = char_prev(self.next_char);
    }

    pub fn next_char_next(&mut self) {
        self.next_char = char_next(self.next_char);
    }

    /// Commit the highlighted choice of `page`.
    ///
    /// - `WifiList`: the Exit row yields [`PageAction::Exit`], any other row
    ///   stores the access point in `selected_ap`, forgets the previous
    ///   password and yields [`PageAction::WifiApSelect`].
    /// - `WifiEnterPassword`: backspace removes the last character, submit
    ///   with a non-empty entry snapshots it into `password` and yields
    ///   [`PageAction::WifiPasswordSubmit`], a printable candidate is
    ///   appended while there is room.
    ///
    /// Everything else yields [`PageAction::None`].
    pub fn commit(&mut self, page: PageId) -> PageAction {
        match page {
            PageId::WifiList => {
                if self.cursor >= self.ap_count() {
                    return PageAction::Exit;
                }
                self.selected_ap = Some(self.ap_list[self.cursor].clone());
                self.password.clear();
                PageAction::WifiApSelect
            }
            PageId::WifiEnterPassword => match self.next_char {
                BACKSPACE_CHAR => {
                    self.user_text_entry.pop();
                    PageAction::None
                }
                SUBMIT_CHAR => {
                    if self.user_text_entry.is_empty() {
                        return PageAction::None;
                    }
                    self.password.clear();
                    // Same capacity, cannot fail.
                    let _ = self.password.push_str(&self.user_text_entry);
                    PageAction::WifiPasswordSubmit
                }
                c => {
                    if self.user_text_entry.len() < USER_TEXT_CAPACITY - 1 {
                        let _ = self.user_text_entry.push(char::from(c));
                    } else {
                        debug!("Password buffer full, ignoring {}", c);
                    }
                    PageAction::None
                }
            },
            _ => PageAction::None,
        }
    }
}

impl Default for NavigationContext {
    fn default() -> Self {
        Self::new()
    }
}
