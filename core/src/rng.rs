//! Injectable random number generation.
//!
//! RULE: Nothing in the core may call any platform RNG.
//! All randomness flows through a `RandomSource` handed in by the caller.
//!
//! Each dashboard panel gets its own RNG stream, seeded deterministically
//! from (seed XOR panel_index). This means:
//!   - Adding a new panel never changes existing panels' streams.
//!   - Each panel's stream is fully reproducible in isolation.
//!   - Panels regenerating concurrently never share mutable state.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A source of uniform draws in [0.0, 1.0).
pub trait RandomSource {
    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Roll an index in [0, n). `n` must be > 0.
    fn next_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "n must be > 0");
        ((self.next_f64() * n as f64) as usize).min(n.saturating_sub(1))
    }

    /// Fair coin: true when the draw lands strictly above one half.
    fn coin(&mut self) -> bool {
        self.next_f64() > 0.5
    }
}

/// A named, deterministic RNG for a single panel.
pub struct PanelRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl PanelRng {
    /// Create a panel RNG from the dashboard seed and a stable
    /// panel index. The index must never change once assigned.
    pub fn new(seed: u64, panel_index: u64) -> Self {
        let derived_seed = seed ^ (panel_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl RandomSource for PanelRng {
    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Replays a fixed sequence of draws, wrapping around at the end.
/// Used wherever a test needs to pin every random decision.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRng {
    /// Draws are clamped into [0.0, 1.0). An empty script always yields 0.0.
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        let draws = draws
            .into()
            .into_iter()
            .map(|d| d.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { draws, cursor: 0 }
    }

    /// How many draws have been consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}

/// All panel RNGs for a single dashboard, indexed by stable slot.
pub struct RngBank {
    seed: u64,
}

impl RngBank {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn for_panel(&self, slot: PanelSlot) -> PanelRng {
        PanelRng::new(self.seed, slot as u64).with_name(slot.name())
    }

    /// Stream for the n-th refresh of a panel. Each refresh draws fresh
    /// values while staying reproducible for a given (seed, slot, n).
    pub fn for_panel_at(&self, slot: PanelSlot, generation: u64) -> PanelRng {
        let mixed = self.seed ^ generation.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        PanelRng::new(mixed, slot as u64).with_name(slot.name())
    }
}

/// Stable panel slot assignments.
/// NEVER reorder or remove entries, only append.
/// Reordering changes every panel's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum PanelSlot {
    TransactionPattern = 0,
    TransactionStatistics = 1,
    // Add new panels here. Append only.
}

impl PanelSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TransactionPattern    => "transaction_pattern",
            Self::TransactionStatistics => "transaction_statistics",
        }
    }
}
