//! Page navigation state machine.
//!
//! One [`Navigator`] owns the [`NavigationContext`] and is fed one debounced
//! button event per tick. It turns activations into page transitions and
//! page-local edits, routes I/O failures to the matching failure page and
//! keeps the idle timer out of the way while a page is being built.

use super::context::NavigationContext;
use super::{ButtonState, PageAction, PageId};
use crate::error::PageError;
use crate::power::{Clock, PowerControl, PowerManager};

/// Draws pages and performs their I/O.
///
/// `display` for `WifiScan`, `WifiConnect` and `BlockheightLoad` runs the
/// network operation and only returns once it has finished; the result
/// decides which page follows.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    /// Prepare drawing state for `page` (clear the screen, reset layout).
    fn init(&mut self, page: PageId) -> Result<(), PageError>;

    /// Render `page` from `ctx`, running its I/O first where it has any.
    async fn display(&mut self, page: PageId, ctx: &mut NavigationContext)
        -> Result<(), PageError>;
}

pub struct Navigator<'p, R, P, C> {
    renderer: R,
    power: &'p PowerManager<P, C>,
    ctx: NavigationContext,
    /// Every n-th consecutive repeat tick acts as an activation.
    auto_repeat: Option<u16>,
    repeat_ticks: u16,
    /// Set when a wake consumed an activation; cleared on release.
    hold_spent: bool,
}

impl<'p, R, P, C> Navigator<'p, R, P, C>
where
    R: PageRenderer,
    P: PowerControl,
    C: Clock,
{
    pub fn new(renderer: R, power: &'p PowerManager<P, C>) -> Self {
        Self {
            renderer,
            power,
            ctx: NavigationContext::new(),
            auto_repeat: None,
            repeat_ticks: 0,
            hold_spent: false,
        }
    }

    /// Let held UP/DOWN repeat on the list and password pages, one step
    /// every `every_ticks` repeat ticks. Zero disables it.
    pub fn with_auto_repeat(mut self, every_ticks: u16) -> Self {
        self.auto_repeat = (every_ticks > 0).then_some(every_ticks);
        self
    }

    pub fn context(&self) -> &NavigationContext {
        &self.ctx
    }

    pub fn current_page(&self) -> PageId {
        self.ctx.current_page()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn power(&self) -> &'p PowerManager<P, C> {
        self.power
    }

    /// Show the home page.
    pub async fn boot(&mut self) -> Result<(), PageError> {
        info!("Navigator: boot");
        self.set_page(PageId::Home).await
    }

    /// Switch to `page`. Requesting the current page does nothing.
    ///
    /// The idle timer is stopped while the page initialises and renders,
    /// and `page` becomes current even when that fails; the error is
    /// returned so the caller can pick a failure page.
    pub async fn set_page(&mut self, page: PageId) -> Result<(), PageError> {
        let from = self.ctx.current_page();
        if page == from {
            return Ok(());
        }

        info!("Page: {} -> {}", from, page);
        self.power.stop_timer();
        self.ctx.reset_page_state();

        let result = match self.renderer.init(page) {
            Ok(()) => self.renderer.display(page, &mut self.ctx).await,
            Err(e) => Err(e),
        };

        self.power.restart_timer();
        self.ctx.set_current_page(page);

        if let Err(e) = result {
            warn!("Page {} failed: {}", page, e);
        }
        result
    }

    /// Move up: previous list row or previous password character.
    pub async fn page_up(&mut self) {
        let page = self.ctx.current_page();
        match page {
            PageId::WifiList => self.ctx.cursor_up(),
            PageId::WifiEnterPassword => self.ctx.next_char_prev(),
            _ => {
                warn!("page_up not allowed on {}", page);
                return;
            }
        }
        self.redraw(page).await;
    }

    /// Move down: next list row or next password character.
    pub async fn page_down(&mut self) {
        let page = self.ctx.current_page();
        match page {
            PageId::WifiList => self.ctx.cursor_down(),
            PageId::WifiEnterPassword => self.ctx.next_char_next(),
            _ => {
                warn!("page_down not allowed on {}", page);
                return;
            }
        }
        self.redraw(page).await;
    }

    /// Commit the highlighted choice. Password edits that do not submit
    /// are redrawn here.
    pub async fn page_action(&mut self) -> PageAction {
        let page = self.ctx.current_page();
        let action = self.ctx.commit(page);
        debug!("Action on {}: {}", page, action);

        if page == PageId::WifiEnterPassword && action == PageAction::None {
            self.redraw(page).await;
        }
        action
    }

    /// Handle one debounced button event.
    pub async fn dispatch(&mut self, event: ButtonState) {
        let event = self.apply_auto_repeat(event);

        if event.is_activation() && self.power.wake_if_needed() {
            debug!("Wake consumed {}", event);
            self.hold_spent = true;
            return;
        }

        match self.ctx.current_page() {
            PageId::None => {
                if event.is_activation() {
                    warn!("Event {} before boot, ignored", event);
                }
            }
            PageId::Home => {
                if matches!(event, ButtonState::B1Activated | ButtonState::B2Activated) {
                    self.flow(PageId::WifiScan, PageId::WifiList, PageId::WifiScanFail)
                        .await;
                }
            }
            PageId::WifiScanFail | PageId::WifiConnectFail | PageId::BlockheightFail => {
                if event.is_activation() {
                    self.go(PageId::Home).await;
                }
            }
            PageId::WifiList => match event {
                ButtonState::B1Activated => self.page_up().await,
                ButtonState::B2Activated => self.page_down().await,
                ButtonState::BothActivated => match self.page_action().await {
                    PageAction::Exit => self.go(PageId::Home).await,
                    PageAction::WifiApSelect => {
                        let needs_password = self.ctx.selected_ap().is_some_and(|ap| ap.has_auth);
                        if needs_password {
                            self.go(PageId::WifiEnterPassword).await;
                        } else {
                            self.connect_flow().await;
                        }
                    }
                    _ => {}
                },
                _ => {}
            },
            PageId::WifiEnterPassword => match event {
                ButtonState::B1Activated => self.page_up().await,
                ButtonState::B2Activated => self.page_down().await,
                ButtonState::BothActivated => {
                    if self.page_action().await == PageAction::WifiPasswordSubmit {
                        self.connect_flow().await;
                    }
                }
                _ => {}
            },
            PageId::WifiConnected => {
                if event.is_activation() {
                    self.blockheight_flow().await;
                }
            }
            PageId::Blockheight => match event {
                ButtonState::B1Activated | ButtonState::B2Activated => {
                    self.blockheight_flow().await
                }
                ButtonState::BothActivated => self.go(PageId::Home).await,
                _ => {}
            },
            PageId::WifiScan | PageId::WifiConnect | PageId::BlockheightLoad => {
                if event.is_activation() {
                    debug!("Ignoring {} on transient page", event);
                }
            }
        }
    }

    async fn connect_flow(&mut self) {
        self.flow(PageId::WifiConnect, PageId::WifiConnected, PageId::WifiConnectFail)
            .await;
    }

    async fn blockheight_flow(&mut self) {
        self.flow(PageId::BlockheightLoad, PageId::Blockheight, PageId::BlockheightFail)
            .await;
    }

    /// Show an I/O page, then `ok` or `fail` depending on how it went.
    async fn flow(&mut self, busy: PageId, ok: PageId, fail: PageId) {
        let next = match self.set_page(busy).await {
            Ok(()) => ok,
            Err(_) => fail,
        };
        self.go(next).await;
    }

    /// Transition whose outcome is only logged.
    async fn go(&mut self, page: PageId) {
        let _ = self.set_page(page).await;
    }

    async fn redraw(&mut self, page: PageId) {
        if let Err(e) = self.renderer.display(page, &mut self.ctx).await {
            warn!("Redraw of {} failed: {}", page, e);
        }
    }

    fn apply_auto_repeat(&mut self, event: ButtonState) -> ButtonState {
        match event {
            ButtonState::None => {
                self.hold_spent = false;
                self.repeat_ticks = 0;
                event
            }
            ButtonState::B1Repeat | ButtonState::B2Repeat => {
                let Some(every) = self.auto_repeat else {
                    return event;
                };
                let page = self.ctx.current_page();
                if self.hold_spent
                    || !matches!(page, PageId::WifiList | PageId::WifiEnterPassword)
                {
                    return event;
                }

                self.repeat_ticks += 1;
                if self.repeat_ticks < every {
                    return event;
                }
                self.repeat_ticks = 0;
                if event == ButtonState::B1Repeat {
                    ButtonState::B1Activated
                } else {
                    ButtonState::B2Activated
                }
            }
            _ => {
                self.repeat_ticks = 0;
                event
            }
        }
    }
}
