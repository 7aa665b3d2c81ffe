//! Stack of open components, ordered by level, with the collapse routine.

use crate::models::{Pixel, Region};
use serde::{Deserialize, Serialize};

/// One component folded into another while the flood level rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRecord {
    /// Level the absorbed component was opened at
    pub level: u16,
    /// Area of the absorbed component at the moment it disappeared
    pub area: usize,
    /// Pixel that opened the absorbed component
    pub seed: Option<Pixel>,
    /// Flood level whose arrival triggered the merge
    pub flood_level: u16,
}

/// Open components. The sentinel sits at the bottom and every entry has a
/// strictly lower level than the one beneath it, so the top is always the
/// component currently being flooded.
#[derive(Debug)]
pub struct RegionStack {
    entries: Vec<Region>,
    history: Option<Vec<MergeRecord>>,
}

impl RegionStack {
    /// Stack holding only the sentinel
    pub fn new() -> Self {
        Self {
            entries: vec![Region::sentinel()],
            history: None,
        }
    }

    /// Stack that also records every merge performed by `collapse_to`
    pub fn with_history() -> Self {
        Self {
            entries: vec![Region::sentinel()],
            history: Some(Vec::new()),
        }
    }

    /// Number of entries, sentinel included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when only the sentinel is left
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Entries from the sentinel (index 0) to the top
    pub fn entries(&self) -> &[Region] {
        &self.entries
    }

    /// Level of the top entry
    pub fn top_level(&self) -> u16 {
        self.top().level
    }

    fn top(&self) -> &Region {
        match self.entries.last() {
            Some(top) => top,
            None => panic!("region stack underflow"),
        }
    }

    fn top_mut(&mut self) -> &mut Region {
        match self.entries.last_mut() {
            Some(top) => top,
            None => panic!("region stack underflow"),
        }
    }

    fn pop(&mut self) -> Region {
        assert!(self.entries.len() > 1, "attempted to pop the sentinel");
        match self.entries.pop() {
            Some(top) => top,
            None => unreachable!(),
        }
    }

    fn record(&mut self, absorbed: &Region, flood_level: u8) {
        if let Some(history) = self.history.as_mut() {
            history.push(MergeRecord {
                level: absorbed.level,
                area: absorbed.area,
                seed: absorbed.seed,
                flood_level: u16::from(flood_level),
            });
        }
    }

    /// Push a new empty component at `level`
    pub fn open(&mut self, seed: Pixel, level: u8) {
        debug_assert!(
            u16::from(level) < self.top_level(),
            "opened level {level} is not below the stack top {}",
            self.top_level()
        );
        self.entries.push(Region::open(seed, level));
    }

    /// Fold `p` into the component on top of the stack
    pub fn accumulate(&mut self, p: Pixel) {
        let top = self.top_mut();
        debug_assert!(!top.is_sentinel(), "accumulating into the sentinel");
        top.accumulate(p);
    }

    /// Merge components away until the top sits at `new_level`.
    ///
    /// Components below `new_level` are folded into their parent. If the
    /// parent is above `new_level`, a fresh component is opened at
    /// `new_level` to receive the child instead. Terminates because the
    /// sentinel is above every grey level.
    pub fn collapse_to(&mut self, p: Pixel, new_level: u8) {
        let target = u16::from(new_level);
        loop {
            let top = self.pop();
            self.record(&top, new_level);

            if target < self.top_level() {
                let mut fresh = Region::open(p, new_level);
                fresh.merge(top);
                self.entries.push(fresh);
                return;
            }

            self.top_mut().merge(top);
            if target <= self.top_level() {
                return;
            }
        }
    }

    /// True when levels strictly decrease from the sentinel to the top and
    /// the sentinel holds no pixels.
    pub fn is_ordered(&self) -> bool {
        let sentinel_ok = self
            .entries
            .first()
            .is_some_and(|s| s.is_sentinel() && s.pixels.is_empty() && s.area == 0);
        sentinel_ok && self.entries.windows(2).all(|w| w[1].level < w[0].level)
    }

    /// Merge records collected so far (empty when recording is off)
    pub fn history(&self) -> &[MergeRecord] {
        self.history.as_deref().unwrap_or(&[])
    }

    /// Consume the stack, returning its entries and merge history
    pub fn into_parts(self) -> (Vec<Region>, Vec<MergeRecord>) {
        (self.entries, self.history.unwrap_or_default())
    }
}

impl Default for RegionStack {
    fn default() -> Self {
        Self::new()
    }
}
