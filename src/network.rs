//! The zigzag gate network.
//!
//! A layer runs two sublayer passes and then XORs the encoding source into the
//! state. Which lanes take part follows a period-4 template:
//!
//! ```text
//! layer  lanes        wiring
//! 4k+1   all          intra-lane triples
//! 4k+2   odd  (####)  odd lane i paired with lane i+1
//! 4k+3   all          intra-lane triples
//! 4k+4   even (####)  even lane i paired with lane i+1
//! ```
//!
//! The second pass is the first one shifted by two bits in all-lane layers and by
//! one bit otherwise, so the two passes reach every bit of every lane. Triples
//! inside a pass never share a wire, so a pass is an involution and undoing a
//! layer is XOR, pass 2, pass 1.

use crate::encoding::{LayerEncoding, LAYERS};
use crate::gate::Gate;
use crate::state::{Lanes, Wire};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Zigzag {
    All,
    Odd,
    Even,
}

impl Zigzag {
    #[inline(always)]
    fn of(layer: usize) -> Self {
        match layer % 4 {
            1 | 3 => Zigzag::All,
            2 => Zigzag::Odd,
            _ => Zigzag::Even,
        }
    }
}

/// Bit offsets of the two sublayer passes of a 1-based layer.
///
/// An all-lane pass wires `3 * (W / 3)` bits and leaves up to two behind, which
/// the second pass picks up by starting two bits later.
#[inline(always)]
fn offsets<const W: u32>(layer: usize) -> (u32, u32) {
    let first = ((2 * layer) % W as usize) as u32;
    let shift = match Zigzag::of(layer) {
        Zigzag::All => 2,
        Zigzag::Odd | Zigzag::Even => 1,
    };
    (first, (first + shift) % W)
}

#[inline(always)]
fn sublayer<const N: usize, const W: u32>(
    state: &mut Lanes<N, W>,
    layer: usize,
    gate: Gate,
    offset: u32,
) {
    let wire = |lane: usize, bit: u32| Wire {
        lane,
        bit: (offset + bit) % W,
    };

    match Zigzag::of(layer) {
        Zigzag::All => (0..N).for_each(|lane| {
            (0..W / 3).for_each(|k| {
                state.gate(
                    gate,
                    [wire(lane, 3 * k), wire(lane, 3 * k + 1), wire(lane, 3 * k + 2)],
                )
            })
        }),
        zz => {
            let first = if zz == Zigzag::Odd { 1 } else { 0 };
            (first..N).step_by(2).for_each(|lane| {
                let partner = (lane + 1) % N;
                (0..W / 2).for_each(|k| {
                    state.gate(
                        gate,
                        [wire(lane, 2 * k), wire(lane, 2 * k + 1), wire(partner, 2 * k)],
                    )
                })
            })
        }
    }
}

/// forward_layer runs 1-based layer `layer` forward.
#[inline(always)]
pub fn forward_layer<const N: usize, const W: u32>(
    state: &mut Lanes<N, W>,
    layer: usize,
    encoding: &LayerEncoding<N, W>,
) {
    let gate = encoding.gate(layer);
    let (first, second) = offsets::<W>(layer);
    sublayer(state, layer, gate, first);
    sublayer(state, layer, gate, second);
    state.xor_assign(encoding.source());
}

/// inverse_layer undoes [`forward_layer`] for the same layer index and encoding.
#[inline(always)]
pub fn inverse_layer<const N: usize, const W: u32>(
    state: &mut Lanes<N, W>,
    layer: usize,
    encoding: &LayerEncoding<N, W>,
) {
    let gate = encoding.gate(layer);
    let (first, second) = offsets::<W>(layer);
    state.xor_assign(encoding.source());
    sublayer(state, layer, gate, second);
    sublayer(state, layer, gate, first);
}

/// permute pushes one block through all layers.
pub fn permute<const N: usize, const W: u32>(
    block: Lanes<N, W>,
    encoding: &LayerEncoding<N, W>,
) -> Lanes<N, W> {
    (1..=LAYERS).fold(block, |mut s, l| {
        forward_layer(&mut s, l, encoding);
        s
    })
}

/// unpermute is the inverse of [`permute`] under the same encoding.
pub fn unpermute<const N: usize, const W: u32>(
    output: Lanes<N, W>,
    encoding: &LayerEncoding<N, W>,
) -> Lanes<N, W> {
    (1..=LAYERS).rev().fold(output, |mut s, l| {
        inverse_layer(&mut s, l, encoding);
        s
    })
}
