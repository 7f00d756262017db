//! Cart visibility signalling.
//!
//! The header's cart link and the page shell do not share state directly.
//! [`CartVisibility`] owns whether the cart view is showing and announces
//! every change on a broadcast channel any number of views can subscribe to.

use tokio::sync::broadcast;
use tracing::debug;

/// Default buffer for visibility events.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// A change in cart view visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartVisibilityEvent {
    Shown,
    Hidden,
}

/// Owner of the "is the cart view showing" flag.
#[derive(Debug)]
pub struct CartVisibility {
    /// The cart view only exists once the visitor entered the screen.
    entered: bool,
    shown: bool,
    sender: broadcast::Sender<CartVisibilityEvent>,
}

impl CartVisibility {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            entered: false,
            shown: false,
            sender,
        }
    }

    /// Listen for visibility changes.
    pub fn subscribe(&self) -> broadcast::Receiver<CartVisibilityEvent> {
        self.sender.subscribe()
    }

    /// The visitor entered the screen; the cart view can now be shown.
    pub fn enter_screen(&mut self) {
        self.entered = true;
    }

    pub fn has_entered(&self) -> bool {
        self.entered
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Show the cart view.
    pub fn show(&mut self) {
        if self.entered {
            self.set(true);
        }
    }

    /// Hide the cart view ("back to products").
    pub fn hide(&mut self) {
        self.set(false);
    }

    /// Flip visibility. Ignored before the screen is entered.
    ///
    /// Returns whether the cart view is showing afterwards.
    pub fn toggle(&mut self) -> bool {
        if !self.entered {
            debug!("cart toggle ignored before entering the screen");
            return self.shown;
        }
        self.set(!self.shown);
        self.shown
    }

    fn set(&mut self, shown: bool) {
        if self.shown == shown {
            return;
        }
        self.shown = shown;
        let event = if shown {
            CartVisibilityEvent::Shown
        } else {
            CartVisibilityEvent::Hidden
        };
        // No subscribers is fine; the flag is still the source of truth.
        if self.sender.send(event).is_err() {
            debug!(?event, "no cart visibility subscribers");
        }
    }
}

impl Default for CartVisibility {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_ignored_before_entering() {
        let mut visibility = CartVisibility::default();
        let mut rx = visibility.subscribe();

        assert!(!visibility.toggle());
        visibility.show();
        assert!(!visibility.is_shown());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_toggle_publishes_to_all_subscribers() {
        let mut visibility = CartVisibility::default();
        let mut header = visibility.subscribe();
        let mut shell = visibility.subscribe();
        visibility.enter_screen();

        assert!(visibility.toggle());
        assert!(!visibility.toggle());

        for rx in [&mut header, &mut shell] {
            assert_eq!(rx.try_recv().unwrap(), CartVisibilityEvent::Shown);
            assert_eq!(rx.try_recv().unwrap(), CartVisibilityEvent::Hidden);
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn test_redundant_changes_are_not_published() {
        let mut visibility = CartVisibility::default();
        let mut rx = visibility.subscribe();
        visibility.enter_screen();

        visibility.show();
        visibility.show();
        visibility.hide();
        visibility.hide();

        assert_eq!(rx.try_recv().unwrap(), CartVisibilityEvent::Shown);
        assert_eq!(rx.try_recv().unwrap(), CartVisibilityEvent::Hidden);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_send_without_subscribers() {
        let mut visibility = CartVisibility::default();
        visibility.enter_screen();
        visibility.show();
        assert!(visibility.is_shown());
    }
}
