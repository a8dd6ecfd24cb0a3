//! Deterministic RNG for bag shuffles and garbage hole placement.

/// Linear congruential generator (Numerical Recipes constants).
/// Small and seed-reproducible, which is all replay needs.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // A zero seed would wedge the generator at zero.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Advances the generator and returns the next word.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform-ish draw in `[0, max)`. Modulo bias is irrelevant at the
    /// ranges used here (bag indices, hole columns).
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}
