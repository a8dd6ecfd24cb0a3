//! Bag-based piece randomizer.

use crate::core::rng::SimpleRng;
use crate::types::PieceKind;

/// Upcoming-piece queue fed by shuffled bags. Each refill appends
/// `sets_per_bag` complete sets of the seven kinds shuffled together as
/// one block, so drought length is bounded by the bag size. The queue is
/// topped up before it shrinks past the preview window, keeping
/// [`preview`](Self::preview) fully populated between draws.
#[derive(Debug, Clone)]
pub struct PieceBag {
    queue: Vec<PieceKind>,
    rng: SimpleRng,
    sets_per_bag: u32,
    preview_size: usize,
}

impl PieceBag {
    pub fn new(seed: u32, sets_per_bag: u32, preview_size: usize) -> Self {
        let mut bag = PieceBag {
            queue: Vec::new(),
            rng: SimpleRng::new(seed),
            // Zero sets would starve the queue.
            sets_per_bag: sets_per_bag.max(1),
            preview_size,
        };
        bag.refill();
        bag
    }

    /// Draws the next piece, refilling first whenever the queue is about
    /// to dip below the preview window.
    pub fn next_piece(&mut self) -> PieceKind {
        if self.queue.len() <= self.preview_size {
            self.refill();
        }
        self.queue.remove(0)
    }

    /// The next `count` pieces in draw order, without consuming them.
    pub fn preview(&self, count: usize) -> Vec<PieceKind> {
        self.queue.iter().take(count).copied().collect()
    }

    fn refill(&mut self) {
        let mut fresh = Vec::with_capacity(7 * self.sets_per_bag as usize);
        for _ in 0..self.sets_per_bag {
            fresh.extend_from_slice(&PieceKind::ALL);
        }
        self.rng.shuffle(&mut fresh);
        self.queue.extend(fresh);
    }
}
