//! Single-occupancy playback designation for the file pipeline.
//!
//! At most one item's audio sounds at a time. Asking to play another item
//! stops the current one first; asking to play the current one again stops it.

use crate::item::ItemId;

/// What a [`PlaybackSlot::play`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackChange {
    /// The slot was idle; `0` is now playing.
    Started(ItemId),
    /// `0` was playing and has been stopped (toggle).
    Stopped(ItemId),
    /// `from` was stopped and `to` is now playing.
    Switched { from: ItemId, to: ItemId },
}

/// Which item, if any, is currently playing.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSlot {
    current: Option<ItemId>,
}

impl PlaybackSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ItemId> {
        self.current
    }

    pub fn is_playing(&self, id: ItemId) -> bool {
        self.current == Some(id)
    }

    /// Toggle `id`, stopping whatever else was playing.
    pub fn play(&mut self, id: ItemId) -> PlaybackChange {
        match self.current {
            Some(cur) if cur == id => {
                self.current = None;
                PlaybackChange::Stopped(id)
            }
            Some(cur) => {
                self.current = Some(id);
                PlaybackChange::Switched { from: cur, to: id }
            }
            None => {
                self.current = Some(id);
                PlaybackChange::Started(id)
            }
        }
    }

    /// Playback of `id` reached its end. Ignored unless `id` is current.
    pub fn finished(&mut self, id: ItemId) -> bool {
        self.release(id)
    }

    /// `id` is going away (removed, audio replaced); clear it if current.
    pub fn release(&mut self, id: ItemId) -> bool {
        if self.current == Some(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Stop whatever is playing.
    pub fn stop(&mut self) -> Option<ItemId> {
        self.current.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (ItemId, ItemId) {
        (ItemId::from_raw(1), ItemId::from_raw(2))
    }

    #[test]
    fn play_on_idle_slot_starts() {
        let (a, _) = ids();
        let mut slot = PlaybackSlot::new();
        assert_eq!(slot.play(a), PlaybackChange::Started(a));
        assert!(slot.is_playing(a));
    }

    #[test]
    fn play_same_item_toggles_off() {
        let (a, _) = ids();
        let mut slot = PlaybackSlot::new();
        slot.play(a);
        assert_eq!(slot.play(a), PlaybackChange::Stopped(a));
        assert_eq!(slot.current(), None);
    }

    #[test]
    fn play_other_item_switches() {
        let (a, b) = ids();
        let mut slot = PlaybackSlot::new();
        slot.play(a);
        assert_eq!(slot.play(b), PlaybackChange::Switched { from: a, to: b });
        assert!(!slot.is_playing(a));
        assert!(slot.is_playing(b));
    }

    #[test]
    fn stale_finish_is_ignored() {
        let (a, b) = ids();
        let mut slot = PlaybackSlot::new();
        slot.play(a);
        slot.play(b);
        assert!(!slot.finished(a));
        assert_eq!(slot.current(), Some(b));
        assert!(slot.finished(b));
        assert_eq!(slot.current(), None);
    }

    #[test]
    fn stop_clears_slot() {
        let (a, _) = ids();
        let mut slot = PlaybackSlot::new();
        assert_eq!(slot.stop(), None);
        slot.play(a);
        assert_eq!(slot.stop(), Some(a));
        assert_eq!(slot.current(), None);
    }
}
