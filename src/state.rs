use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};
use crate::gate::Gate;

/// Number of lanes in the full-width state.
pub const LANES: usize = 8;

/// Bits per lane in the full-width state.
pub const LANE_BITS: u32 = 32;

/// Size in bytes of a state, a block and a digest.
pub const STATE_SIZE: usize = LANES * 4;

/// The 256-bit state the network runs on: 8 lanes of 32 bits.
pub type State = Lanes<LANES, LANE_BITS>;

/// Wire addresses a single bit of a [`Lanes`] value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wire {
    /// Lane index.
    pub lane: usize,
    /// Bit position inside the lane, `0` being the least significant bit.
    pub bit: u32,
}

/// Lanes is a fixed-width bit container of `N` lanes holding `W` bits each.
///
/// The full hash uses [`State`]; narrower instances run the exact same network
/// and are small enough to check exhaustively. `N` must be even and at least 2,
/// `W` must be even and between 4 and 32.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lanes<const N: usize, const W: u32>([u32; N]);

impl<const N: usize, const W: u32> Lanes<N, W> {
    const GEOMETRY_OK: () = assert!(
        N >= 2 && N % 2 == 0 && W >= 4 && W <= 32 && W % 2 == 0,
        "lanes must pair up and fit at least one gate triple"
    );

    /// Mask of the bits a lane is allowed to carry.
    pub const MASK: u32 = u32::MAX >> (32 - W);

    /// Total number of bits carried.
    pub const BITS: usize = N * W as usize;

    /// zero returns the all-zero value.
    pub fn zero() -> Self {
        let () = Self::GEOMETRY_OK;
        Self([0; N])
    }

    /// from_lanes builds a value from raw lanes, dropping bits above `W`.
    pub fn from_lanes(mut lanes: [u32; N]) -> Self {
        let () = Self::GEOMETRY_OK;
        lanes.iter_mut().for_each(|l| *l &= Self::MASK);
        Self(lanes)
    }

    /// lanes exposes the lanes, lane 0 first.
    pub fn lanes(&self) -> &[u32; N] {
        &self.0
    }

    /// bit reads a single wire.
    #[inline(always)]
    pub fn bit(&self, w: Wire) -> bool {
        (self.0[w.lane] >> w.bit) & 1 == 1
    }

    #[inline(always)]
    fn set_bit(&mut self, w: Wire, v: bool) {
        self.0[w.lane] = (self.0[w.lane] & !(1 << w.bit)) | ((v as u32) << w.bit);
    }

    /// gate applies `g` to the three wires, written back in place.
    ///
    /// The wires must be distinct.
    #[inline(always)]
    pub fn gate(&mut self, g: Gate, wires: [Wire; 3]) {
        let out = g.apply([self.bit(wires[0]), self.bit(wires[1]), self.bit(wires[2])]);
        wires
            .iter()
            .zip(out.iter())
            .for_each(|(w, v)| self.set_bit(*w, *v));
    }

    /// xor_assign folds `other` into `self` lane by lane.
    #[inline(always)]
    pub fn xor_assign(&mut self, other: &Self) {
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| *a ^= *b);
    }

    /// code returns the 2-bit selector at index `i`, reading the bits
    /// most-significant-first from lane 0 and wrapping around the whole value.
    pub fn code(&self, i: usize) -> u8 {
        let pos = (2 * i) % Self::BITS;
        let lane = pos / W as usize;
        let shift = W - 2 - (pos % W as usize) as u32;
        ((self.0[lane] >> shift) & 0b11) as u8
    }

    /// is_zero reports whether every bit is clear.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|l| *l == 0)
    }
}

impl<const N: usize, const W: u32> Default for Lanes<N, W> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize, const W: u32> fmt::Debug for Lanes<N, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|l| format!("{:0width$x}", l, width = (W as usize + 3) / 4)))
            .finish()
    }
}

impl State {
    /// from_block reads 32 bytes as 8 big-endian lanes.
    pub fn from_block(block: &[u8; STATE_SIZE]) -> Self {
        let mut lanes = [0u32; LANES];
        BigEndian::read_u32_into(block, &mut lanes);
        Self(lanes)
    }

    /// to_bytes writes the lanes back out big-endian, lane 0 first.
    pub fn to_bytes(&self) -> [u8; STATE_SIZE] {
        let mut out = [0u8; STATE_SIZE];
        BigEndian::write_u32_into(&self.0, &mut out);
        out
    }
}

impl TryFrom<&[u8]> for State {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let block: &[u8; STATE_SIZE] = bytes.try_into().map_err(|_| Error::Width {
            expected: STATE_SIZE,
            actual: bytes.len(),
        })?;
        Ok(State::from_block(block))
    }
}

impl From<[u8; STATE_SIZE]> for State {
    fn from(block: [u8; STATE_SIZE]) -> Self {
        State::from_block(&block)
    }
}

impl From<State> for [u8; STATE_SIZE] {
    fn from(s: State) -> Self {
        s.to_bytes()
    }
}
