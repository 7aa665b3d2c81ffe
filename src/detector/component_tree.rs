//! Grey-level component tree construction by immersion.
//!
//! The flood starts at the grid origin and always continues with the lowest
//! discovered pixel. Whenever a strictly darker neighbour shows up the flood
//! descends into it immediately and opens a new component; rising again
//! collapses the stack so it stays ordered by level.

use super::accessibility::AccessibilityMap;
use super::boundary_heap::BoundaryHeap;
use super::region_stack::{MergeRecord, RegionStack};
use crate::config::DetectorParams;
use crate::error::{MserError, Result};
use crate::models::{GrayscaleImage, Pixel, Region};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// 8-connected neighbour offsets, row offset outer, column offset inner.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Driver state between two steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Push an empty component for the current pixel's level
    OpenNewComponent,
    /// Explore the current pixel's neighbours
    ScanNeighbors,
}

/// Outcome of a single transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep going from the given state
    Continue(State),
    /// The boundary heap ran dry; the stack is complete
    Finished,
}

/// Final stack plus the merges performed while building it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionHistory {
    /// Surviving stack, sentinel first
    pub regions: Vec<Region>,
    /// Components absorbed during the flood, in merge order
    pub merges: Vec<MergeRecord>,
}

/// Traversal state owned by a single detection call.
pub struct FloodContext<'a> {
    image: &'a GrayscaleImage,
    accessible: AccessibilityMap,
    boundary: BoundaryHeap,
    stack: RegionStack,
    current: Pixel,
    current_level: u8,
    check_invariants: bool,
    steps: usize,
    finished: bool,
}

impl<'a> FloodContext<'a> {
    /// Seed a flood at the origin of `image`.
    ///
    /// Fails with `EmptyImage` when the grid has no pixels.
    pub fn new(image: &'a GrayscaleImage, params: &DetectorParams) -> Result<Self> {
        if image.is_empty() {
            return Err(MserError::EmptyImage {
                rows: image.rows(),
                columns: image.columns(),
            });
        }

        let seed = Pixel::new(0, 0);
        let mut accessible = AccessibilityMap::new(image.rows(), image.columns());
        accessible.mark_accessible(seed);

        let stack = if params.record_history {
            RegionStack::with_history()
        } else {
            RegionStack::new()
        };

        Ok(Self {
            image,
            accessible,
            boundary: BoundaryHeap::with_capacity(image.len().min(1 << 16)),
            stack,
            current: seed,
            current_level: image.get_pixel(seed),
            check_invariants: params.check_invariants,
            steps: 0,
            finished: false,
        })
    }

    /// Pixel currently being explored
    pub fn current(&self) -> Pixel {
        self.current
    }

    /// Grey level of the current pixel
    pub fn current_level(&self) -> u8 {
        self.current_level
    }

    /// Open components, sentinel first
    pub fn stack(&self) -> &RegionStack {
        &self.stack
    }

    /// Number of queued boundary pixels
    pub fn boundary_len(&self) -> usize {
        self.boundary.len()
    }

    /// Number of pixels discovered so far
    pub fn discovered(&self) -> usize {
        self.accessible.count()
    }

    /// Number of transitions taken
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// True once a step has returned `Step::Finished`
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Perform one transition from `state`.
    ///
    /// Once the flood has finished every further call returns
    /// `Step::Finished` and leaves the stack untouched.
    pub fn step(&mut self, state: State) -> Step {
        if self.finished {
            return Step::Finished;
        }
        self.steps += 1;
        let step = match state {
            State::OpenNewComponent => {
                self.stack.open(self.current, self.current_level);
                Step::Continue(State::ScanNeighbors)
            }
            State::ScanNeighbors => self.scan_neighbors(),
        };
        self.finished = step == Step::Finished;
        step
    }

    fn scan_neighbors(&mut self) -> Step {
        let rows = self.image.rows();
        let columns = self.image.columns();

        for (d_row, d_col) in NEIGHBOR_OFFSETS {
            let Some(neighbor) = self.current.offset(d_row, d_col, rows, columns) else {
                continue;
            };
            if !self.accessible.try_mark(neighbor) {
                continue;
            }

            let level = self.image.get_pixel(neighbor);
            if level >= self.current_level {
                self.boundary.push(neighbor, level);
                continue;
            }

            // Darker neighbour: park the current pixel and flood downwards.
            // Its remaining neighbours are scanned when it is popped again.
            self.boundary.push(self.current, self.current_level);
            trace!(
                "descend {:?}@{} -> {:?}@{}",
                self.current,
                self.current_level,
                neighbor,
                level
            );
            self.current = neighbor;
            self.current_level = level;
            return Step::Continue(State::OpenNewComponent);
        }

        self.stack.accumulate(self.current);
        if self.boundary.is_empty() {
            return Step::Finished;
        }

        let next = self.boundary.pop_min();
        let next_level = self.image.get_pixel(next);
        self.current = next;
        if next_level != self.current_level {
            debug_assert!(
                next_level > self.current_level,
                "boundary popped {next_level} below flood level {}",
                self.current_level
            );
            trace!(
                "collapse {} -> {} (stack depth {})",
                self.current_level,
                next_level,
                self.stack.len()
            );
            self.stack.collapse_to(next, next_level);
            self.current_level = next_level;
            self.verify_stack();
        }
        Step::Continue(State::ScanNeighbors)
    }

    fn verify_stack(&self) {
        debug_assert!(self.stack.is_ordered(), "region stack out of level order");
        if self.check_invariants {
            assert!(self.stack.is_ordered(), "region stack out of level order");
            assert_eq!(
                u16::from(self.current_level),
                self.stack.top_level(),
                "stack top does not match the flood level"
            );
        }
    }

    /// Drive the state machine to completion
    pub fn run(mut self) -> RegionHistory {
        let mut state = State::OpenNewComponent;
        while let Step::Continue(next) = self.step(state) {
            state = next;
        }

        debug!(
            "flood of {}x{} finished after {} steps, {} merges",
            self.image.rows(),
            self.image.columns(),
            self.steps,
            self.stack.history().len()
        );
        let (regions, merges) = self.stack.into_parts();
        RegionHistory { regions, merges }
    }
}

/// Build the component stack of `image` with explicit parameters
pub fn build_component_tree(
    image: &GrayscaleImage,
    params: &DetectorParams,
) -> Result<RegionHistory> {
    let history = FloodContext::new(image, params)?.run();
    debug_assert_eq!(
        history.regions.iter().map(|r| r.area).sum::<usize>(),
        image.len(),
        "flood did not visit every pixel"
    );
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[u8]]) -> GrayscaleImage {
        GrayscaleImage::from_rows(rows).unwrap()
    }

    #[test]
    fn test_first_step_opens_at_seed_level() {
        let img = grid(&[&[40, 50], &[60, 70]]);
        let params = DetectorParams::default();
        let mut ctx = FloodContext::new(&img, &params).unwrap();
        assert_eq!(ctx.current(), Pixel::new(0, 0));
        assert_eq!(ctx.discovered(), 1);

        assert_eq!(
            ctx.step(State::OpenNewComponent),
            Step::Continue(State::ScanNeighbors)
        );
        assert_eq!(ctx.stack().len(), 2);
        assert_eq!(ctx.stack().top_level(), 40);
    }

    #[test]
    fn test_scan_descends_into_darker_neighbor() {
        // Seed is 9, its right-hand neighbour is darker.
        let img = grid(&[&[9, 3], &[9, 9]]);
        let params = DetectorParams::default();
        let mut ctx = FloodContext::new(&img, &params).unwrap();
        ctx.step(State::OpenNewComponent);

        let next = ctx.step(State::ScanNeighbors);
        assert_eq!(next, Step::Continue(State::OpenNewComponent));
        assert_eq!(ctx.current(), Pixel::new(0, 1));
        assert_eq!(ctx.current_level(), 3);
        // The seed was re-queued, nothing accumulated yet.
        assert_eq!(ctx.boundary_len(), 1);
        assert_eq!(ctx.stack().entries()[1].area, 0);
    }

    #[test]
    fn test_scan_accumulates_and_pops_next() {
        let img = grid(&[&[5, 5], &[5, 5]]);
        let params = DetectorParams::default();
        let mut ctx = FloodContext::new(&img, &params).unwrap();
        ctx.step(State::OpenNewComponent);

        let next = ctx.step(State::ScanNeighbors);
        assert_eq!(next, Step::Continue(State::ScanNeighbors));
        assert_eq!(ctx.stack().entries()[1].pixels, vec![Pixel::new(0, 0)]);
        // FIFO: (0,1) was queued first.
        assert_eq!(ctx.current(), Pixel::new(0, 1));
        assert_eq!(ctx.discovered(), 4);
    }

    #[test]
    fn test_single_pixel_finishes_immediately() {
        let img = grid(&[&[77]]);
        let params = DetectorParams::default();
        let mut ctx = FloodContext::new(&img, &params).unwrap();
        ctx.step(State::OpenNewComponent);
        assert_eq!(ctx.step(State::ScanNeighbors), Step::Finished);
    }

    #[test]
    fn test_step_after_finished_is_inert() {
        let img = grid(&[&[5, 5]]);
        let params = DetectorParams::default();
        let mut ctx = FloodContext::new(&img, &params).unwrap();
        let mut state = State::OpenNewComponent;
        while let Step::Continue(next) = ctx.step(state) {
            state = next;
        }
        assert!(ctx.is_finished());
        let steps = ctx.steps();

        assert_eq!(ctx.step(State::ScanNeighbors), Step::Finished);
        assert_eq!(ctx.step(State::OpenNewComponent), Step::Finished);
        assert_eq!(ctx.steps(), steps);
        assert_eq!(ctx.stack().len(), 2);
        let region = &ctx.stack().entries()[1];
        assert_eq!(region.area, 2);
        assert_eq!(region.pixels, vec![Pixel::new(0, 0), Pixel::new(0, 1)]);
    }

    #[test]
    fn test_merge_seed_is_opening_pixel() {
        // Two nested descents: 200 -> 100 -> 10. The level-100 component is
        // opened at (0,1) but inherits (0,2) from its child first.
        let img = grid(&[&[200, 100, 10]]);
        let params = DetectorParams {
            record_history: true,
            ..DetectorParams::default()
        };
        let history = build_component_tree(&img, &params).unwrap();

        assert_eq!(history.merges.len(), 2);
        assert_eq!(history.merges[0].level, 10);
        assert_eq!(history.merges[0].seed, Some(Pixel::new(0, 2)));
        assert_eq!(history.merges[0].flood_level, 100);
        assert_eq!(history.merges[1].level, 100);
        assert_eq!(history.merges[1].area, 2);
        assert_eq!(history.merges[1].seed, Some(Pixel::new(0, 1)));
        assert_eq!(history.merges[1].flood_level, 200);
        assert_eq!(
            history.regions[1].pixels,
            vec![Pixel::new(0, 2), Pixel::new(0, 1), Pixel::new(0, 0)]
        );
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = GrayscaleImage::new(0, 3);
        let err = FloodContext::new(&img, &DetectorParams::default()).err();
        assert!(matches!(
            err,
            Some(MserError::EmptyImage {
                rows: 0,
                columns: 3
            })
        ));
    }

    #[test]
    fn test_history_records_descents() {
        // Descending from 200 to 10 opens a second component, which is
        // merged away once the flood rises back to 200.
        let img = grid(&[&[200, 10, 200]]);
        let params = DetectorParams {
            record_history: true,
            ..DetectorParams::default()
        };
        let history = build_component_tree(&img, &params).unwrap();
        assert_eq!(history.regions.len(), 2);
        assert_eq!(history.regions[1].area, 3);
        assert_eq!(history.merges.len(), 1);
        assert_eq!(history.merges[0].level, 10);
        assert_eq!(history.merges[0].area, 1);
        assert_eq!(history.merges[0].seed, Some(Pixel::new(0, 1)));
        assert_eq!(history.merges[0].flood_level, 200);
    }
}
