//! RNG module - seeded piece generation
//!
//! Two ways of choosing the next piece kind:
//! - **Uniform**: every draw picks one of the seven kinds with equal chance.
//! - **SevenBag**: each bag holds one of each kind, shuffled, drawn until empty.
//!
//! Both are driven by a small LCG so a seed reproduces a whole game.

use serde::{Deserialize, Serialize};

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// How the spawner picks piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Randomizer {
    #[default]
    Uniform,
    SevenBag,
}

/// Stream of piece kinds for one randomizer policy.
#[derive(Debug, Clone)]
pub struct PieceSource {
    policy: Randomizer,
    rng: SimpleRng,
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
}

impl PieceSource {
    pub fn new(policy: Randomizer, seed: u32) -> Self {
        Self {
            policy,
            rng: SimpleRng::new(seed),
            bag: PieceKind::ALL,
            bag_index: PieceKind::ALL.len(),
        }
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        match self.policy {
            Randomizer::Uniform => {
                let i = self.rng.next_range(PieceKind::ALL.len() as u32) as usize;
                PieceKind::ALL[i]
            }
            Randomizer::SevenBag => {
                if self.bag_index >= self.bag.len() {
                    self.refill_bag();
                }
                let kind = self.bag[self.bag_index];
                self.bag_index += 1;
                kind
            }
        }
    }

    /// Throw away the rest of the current bag. The RNG stream continues.
    pub fn discard_bag(&mut self) {
        self.bag_index = self.bag.len();
    }

    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }
}
