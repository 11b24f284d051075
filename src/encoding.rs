use once_cell::sync::Lazy;
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

use crate::gate::Gate;
use crate::state::{Lanes, State, LANES, STATE_SIZE};

/// Number of layers in the gate network, one 2-bit selector each.
pub const LAYERS: usize = 128;

/// Domain tag prepended to seeds when deriving a seeded IV.
const SEED_DOMAIN: &[u8] = b"mirror256/iv";

/// The first eight primes; the standard IV holds the fractional parts of their cube roots.
const IV_PRIMES: [u128; LANES] = [2, 3, 5, 7, 11, 13, 17, 19];

/// IV is the standard initialization vector: lane `i` holds the first 32 bits of the
/// fractional part of the cube root of the `i`-th prime.
pub static IV: Lazy<State> = Lazy::new(|| {
    let mut lanes = [0u32; LANES];
    lanes
        .iter_mut()
        .zip(IV_PRIMES.iter())
        .for_each(|(lane, p)| *lane = icbrt(p << 96) as u32);
    State::from_lanes(lanes)
});

// floor(cbrt(n)) for n < 2^120.
fn icbrt(n: u128) -> u128 {
    let (mut lo, mut hi) = (0u128, 1u128 << 40);
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if mid * mid * mid <= n {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// seeded_iv derives an initialization vector from arbitrary seed bytes with SHAKE256.
pub fn seeded_iv(seed: &[u8]) -> State {
    let mut xof = Shake256::default();
    xof.update(SEED_DOMAIN);
    xof.update(seed);

    let mut out = [0u8; STATE_SIZE];
    xof.finalize_xof().read(&mut out);
    State::from_block(&out)
}

/// Iv selects where a hasher's chain starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Iv {
    /// The cube-root constant [`IV`].
    Standard,
    /// An IV derived from the seed bytes through [`seeded_iv`].
    Seeded(Vec<u8>),
    /// An explicit starting state.
    Custom(State),
}

impl Default for Iv {
    fn default() -> Self {
        Iv::Standard
    }
}

impl Iv {
    /// state resolves the choice into the 256-bit value the first block is keyed with.
    pub fn state(&self) -> State {
        match self {
            Iv::Standard => *IV,
            Iv::Seeded(seed) => seeded_iv(seed),
            Iv::Custom(s) => *s,
        }
    }
}

/// LayerEncoding is what one block's network pass is keyed with: the source value
/// (XORed into the state after every layer) and the gate it selects for each layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerEncoding<const N: usize, const W: u32> {
    source: Lanes<N, W>,
    gates: [Gate; LAYERS],
}

impl<const N: usize, const W: u32> LayerEncoding<N, W> {
    /// derive reads one selector per layer from `source`, two bits at a time,
    /// most significant lane first. Sources narrower than 256 bits are read cyclically.
    pub fn derive(source: Lanes<N, W>) -> Self {
        let mut gates = [Gate::Toffoli; LAYERS];
        gates
            .iter_mut()
            .enumerate()
            .for_each(|(i, g)| *g = Gate::from_code(source.code(i)));
        Self { source, gates }
    }

    /// from_parts pairs an arbitrary gate schedule with a source value.
    pub fn from_parts(source: Lanes<N, W>, gates: [Gate; LAYERS]) -> Self {
        Self { source, gates }
    }

    /// source is the value XORed into the state after each layer.
    pub fn source(&self) -> &Lanes<N, W> {
        &self.source
    }

    /// gate returns the gate selected for 1-based `layer`.
    #[inline(always)]
    pub fn gate(&self, layer: usize) -> Gate {
        self.gates[layer - 1]
    }
}
