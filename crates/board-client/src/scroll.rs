//! Viewport following for the chat tab.
//!
//! When new items arrive the UI either follows the conversation (the
//! reader is at the bottom) or stays put and raises a "new message"
//! affordance (the reader scrolled up to re-read something).

/// Viewport following configuration.
#[derive(Debug, Clone)]
pub struct ScrollConfig {
    /// How close to the bottom, in pixels, still counts as "at the bottom".
    pub bottom_threshold_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            bottom_threshold_px: 100.0,
        }
    }
}

/// Scroll geometry as reported by the rendering layer.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl Viewport {
    pub fn distance_from_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

/// What the rendering layer should do after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEffect {
    ScrollToBottom { smooth: bool },
    ShowNewMessageBadge,
}

/// Tracks whether the reader is following the bottom of the chat and
/// decides between auto-scroll and the new-message affordance.
#[derive(Debug)]
pub struct ScrollFollower {
    config: ScrollConfig,
    scrolled_up: bool,
    has_new_message: bool,
}

impl ScrollFollower {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            scrolled_up: false,
            has_new_message: false,
        }
    }

    /// Re-evaluate the near-bottom flag on a scroll event. Scrolling
    /// back within the threshold clears any pending affordance.
    pub fn on_scroll(&mut self, viewport: Viewport) {
        let near_bottom = viewport.distance_from_bottom() < self.config.bottom_threshold_px;
        self.scrolled_up = !near_bottom;
        if near_bottom {
            self.has_new_message = false;
        }
    }

    /// A snapshot grew the visible list: follow the bottom, or raise
    /// the affordance without forcing a scroll.
    pub fn on_items_grown(&mut self) -> ScrollEffect {
        if self.scrolled_up {
            self.has_new_message = true;
            ScrollEffect::ShowNewMessageBadge
        } else {
            self.has_new_message = false;
            ScrollEffect::ScrollToBottom { smooth: true }
        }
    }

    /// The reader tapped the affordance: jump down and resume following.
    pub fn jump_to_bottom(&mut self) -> ScrollEffect {
        self.scrolled_up = false;
        self.has_new_message = false;
        ScrollEffect::ScrollToBottom { smooth: true }
    }

    pub fn has_new_message(&self) -> bool {
        self.has_new_message
    }

    pub fn is_scrolled_up(&self) -> bool {
        self.scrolled_up
    }
}

impl Default for ScrollFollower {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(distance_from_bottom: f64) -> Viewport {
        Viewport {
            scroll_top: 1000.0 - distance_from_bottom,
            scroll_height: 1600.0,
            client_height: 600.0,
        }
    }

    #[test]
    fn near_bottom_auto_scrolls_without_affordance() {
        let mut follower = ScrollFollower::default();
        follower.on_scroll(viewport(40.0));
        assert_eq!(
            follower.on_items_grown(),
            ScrollEffect::ScrollToBottom { smooth: true }
        );
        assert!(!follower.has_new_message());
    }

    #[test]
    fn scrolled_away_raises_affordance_without_scrolling() {
        let mut follower = ScrollFollower::default();
        follower.on_scroll(viewport(500.0));
        assert_eq!(follower.on_items_grown(), ScrollEffect::ShowNewMessageBadge);
        assert!(follower.has_new_message());
    }

    #[test]
    fn threshold_boundary() {
        let mut follower = ScrollFollower::default();
        follower.on_scroll(viewport(99.9));
        assert!(!follower.is_scrolled_up());
        follower.on_scroll(viewport(100.0));
        assert!(follower.is_scrolled_up());
    }

    #[test]
    fn scrolling_back_within_threshold_clears_affordance() {
        let mut follower = ScrollFollower::default();
        follower.on_scroll(viewport(500.0));
        follower.on_items_grown();
        assert!(follower.has_new_message());

        follower.on_scroll(viewport(20.0));
        assert!(!follower.has_new_message());
        assert!(!follower.is_scrolled_up());
    }

    #[test]
    fn jump_clears_affordance_and_resumes_following() {
        let mut follower = ScrollFollower::default();
        follower.on_scroll(viewport(500.0));
        follower.on_items_grown();

        assert_eq!(
            follower.jump_to_bottom(),
            ScrollEffect::ScrollToBottom { smooth: true }
        );
        assert!(!follower.has_new_message());
        assert_eq!(
            follower.on_items_grown(),
            ScrollEffect::ScrollToBottom { smooth: true }
        );
    }
}
