//! Two-slot lookahead buffer for one element kind.
//!
//! The current element lives in the active slot. Loading the next one
//! fills the spare slot and flips the index, so the previous element stays
//! alive until the following advance and at most two are held at once.

#[derive(Debug)]
pub struct Lookahead<T> {
    slots: [Option<T>; 2],
    active: usize,
}

impl<T> Default for Lookahead<T> {
    fn default() -> Self {
        Self {
            slots: [None, None],
            active: 0,
        }
    }
}

impl<T> Lookahead<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&T> {
        self.slots[self.active].as_ref()
    }

    /// Store `next` in the spare slot and make it current.
    pub fn load(&mut self, next: Option<T>) {
        let spare = 1 - self.active;
        self.slots[spare] = next;
        self.active = spare;
    }

    /// The element that was current before the last [`load`](Self::load).
    #[cfg(test)]
    fn previous(&self) -> Option<&T> {
        self.slots[1 - self.active].as_ref()
    }

    pub fn clear(&mut self) {
        self.slots = [None, None];
        self.active = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_swaps_slots() {
        let mut la = Lookahead::new();
        assert_eq!(la.current(), None);

        la.load(Some(1));
        la.load(Some(2));
        assert_eq!(la.current(), Some(&2));
        assert_eq!(la.previous(), Some(&1));

        la.load(Some(3));
        assert_eq!(la.current(), Some(&3));
        assert_eq!(la.previous(), Some(&2));

        la.load(None);
        assert_eq!(la.current(), None);

        la.clear();
        assert_eq!(la.previous(), None);
    }
}
