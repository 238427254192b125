//! Cached output state.
//!
//! Holds the last-intended [`OutputState`]. Every output operation
//! read-modify-writes only the fields it owns, then the whole cached state is
//! pushed to the device. The cache is not synchronized on its own; the owning
//! [`Session`](crate::session::Session) keeps it behind its lock.

use crate::output::OutputState;

#[derive(Clone, Debug, Default)]
pub struct OutputStateCache {
    state: OutputState,
    initialized: bool,
}

impl OutputStateCache {
    /// An uninitialized cache. The first mutation populates the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Populate the neutral defaults on first use; no-op afterwards.
    pub fn ensure_default_initialized(&mut self) -> &mut OutputState {
        if !self.initialized {
            self.state = OutputState::neutral();
            self.initialized = true;
        }
        &mut self.state
    }

    /// Unconditionally return to the neutral state. Used by session teardown.
    pub fn reset_to_neutral(&mut self) -> &OutputState {
        self.state = OutputState::neutral();
        self.initialized = true;
        &self.state
    }

    pub fn state(&self) -> &OutputState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Color, TriggerEffect};

    #[test]
    fn lazily_initializes_once() {
        let mut cache = OutputStateCache::new();
        assert!(!cache.is_initialized());

        cache.ensure_default_initialized().lightbar = Color::new(1, 2, 3);
        assert!(cache.is_initialized());

        // Second call must not clobber the mutation.
        let state = cache.ensure_default_initialized();
        assert_eq!(state.lightbar, Color::new(1, 2, 3));
    }

    #[test]
    fn reset_always_runs() {
        let mut cache = OutputStateCache::new();
        {
            let s = cache.ensure_default_initialized();
            s.left_rumble = 200;
            s.right_trigger_effect = TriggerEffect::continuous(1, 2);
            s.player_leds.bitmask = 0x0f;
        }
        let neutral = *cache.reset_to_neutral();
        assert!(neutral.is_neutral());
        assert!(cache.state().is_neutral());
    }
}
