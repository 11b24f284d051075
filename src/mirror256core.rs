use std::fmt;

use digest::{
    block_buffer::Eager,
    core_api::{
        AlgorithmName, Buffer, BufferKindUser, CoreWrapper, FixedOutputCore, UpdateCore,
    },
    crypto_common::{Block, BlockSizeUser},
    typenum::U32,
    HashMarker, Output, OutputSizeUser, Reset,
};

use crate::encoding::{seeded_iv, LayerEncoding, IV};
use crate::network;
use crate::state::{State, STATE_SIZE};

/// The size in bytes of the Mirror256 checksum.
pub const DIGEST_SIZE: usize = STATE_SIZE;

/// Block size, in bytes, of the Mirror256 hash function.
pub const DIGEST_BLOCK_SIZE: usize = STATE_SIZE;

/// Mirror256Hasher is the `digest::Digest` front end over [`Mirror256Core`].
pub type Mirror256Hasher = CoreWrapper<Mirror256Core>;

/// Mirror256Core is the block-level core of Mirror256 for the RustCrypto `digest` traits.
///
/// Buffering and padding are left to the wrapper; the core only chains blocks
/// through the gate network. Padding is `0x80`, zeros, then the message length in
/// bits as a big-endian u64, which matches [`crate::mirror256::Mirror256`] byte for byte.
#[derive(Clone)]
pub struct Mirror256Core {
    iv: State,
    h: State, // hash chain (from last block, or IV)
    block_len: u64,
}

impl Mirror256Core {
    /// new_with_iv returns a core whose chain starts from `iv`.
    pub fn new_with_iv(iv: State) -> Self {
        Self {
            iv,
            h: iv,
            block_len: 0,
        }
    }

    /// new_with_seed returns a core whose IV is derived from `seed`.
    pub fn new_with_seed(seed: &[u8]) -> Self {
        Self::new_with_iv(seeded_iv(seed))
    }

    fn compress_block(&mut self, data: &[u8]) {
        let mut b = [0u8; DIGEST_BLOCK_SIZE];
        b.copy_from_slice(data);
        self.h = network::permute(State::from_block(&b), &LayerEncoding::derive(self.h));
        self.block_len += 1;
    }
}

impl Default for Mirror256Core {
    fn default() -> Self {
        Self::new_with_iv(*IV)
    }
}

impl Reset for Mirror256Core {
    fn reset(&mut self) {
        self.h = self.iv;
        self.block_len = 0;
    }
}

impl HashMarker for Mirror256Core {}

impl BlockSizeUser for Mirror256Core {
    type BlockSize = U32;
}

impl BufferKindUser for Mirror256Core {
    type BufferKind = Eager;
}

impl OutputSizeUser for Mirror256Core {
    type OutputSize = U32;
}

impl UpdateCore for Mirror256Core {
    fn update_blocks(&mut self, blocks: &[Block<Self>]) {
        for b in blocks {
            self.compress_block(b)
        }
    }
}

impl FixedOutputCore for Mirror256Core {
    fn finalize_fixed_core(&mut self, buffer: &mut Buffer<Self>, out: &mut Output<Self>) {
        let bs = DIGEST_BLOCK_SIZE as u64;
        let bitlen = 8 * (buffer.get_pos() as u64 + bs * self.block_len);
        buffer.len64_padding_be(bitlen, |b| self.compress_block(b));

        out.copy_from_slice(&self.h.to_bytes());
    }
}

impl AlgorithmName for Mirror256Core {
    fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mirror256")
    }
}

impl fmt::Debug for Mirror256Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mirror256Core { ... }")
    }
}
