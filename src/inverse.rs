//! Inverse path: rebuilding a message from its digest and encoding chain.
//!
//! Every block's network pass is a permutation keyed by the state that came before it,
//! so given the digest and the per-block encoding sources the blocks can be peeled
//! off from the last one back to the first. Without the chain this is not possible;
//! the digest alone does not name the encodings.

use tracing::debug;

use crate::encoding::LayerEncoding;
use crate::error::{Error, Result};
use crate::network;
use crate::padding;
use crate::state::{State, STATE_SIZE};

/// EncodingChain logs the encoding source each block was keyed with, in block order.
///
/// Entry 0 is the IV; entry `i` is the output of block `i - 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodingChain {
    sources: Vec<State>,
}

impl EncodingChain {
    /// new returns an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// push appends the source of the next block.
    pub fn push(&mut self, source: State) {
        self.sources.push(source);
    }

    /// len is the number of blocks logged.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// is_empty reports whether no block was logged.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// sources returns the logged encoding sources, first block first.
    pub fn sources(&self) -> &[State] {
        &self.sources
    }

    pub(crate) fn clear(&mut self) {
        self.sources.clear();
    }
}

impl From<Vec<State>> for EncodingChain {
    fn from(sources: Vec<State>) -> Self {
        Self { sources }
    }
}

/// recover_padded undoes every block and returns the padded message.
pub fn recover_padded(digest: &[u8; STATE_SIZE], chain: &EncodingChain) -> Result<Vec<u8>> {
    let sources = chain.sources();
    if sources.is_empty() {
        return Err(Error::Chain("no blocks were logged".to_string()));
    }

    let mut out = vec![0u8; sources.len() * STATE_SIZE];
    let mut output = State::from_block(digest);
    for (i, source) in sources.iter().enumerate().rev() {
        let block = network::unpermute(output, &LayerEncoding::derive(*source));
        out[i * STATE_SIZE..(i + 1) * STATE_SIZE].copy_from_slice(&block.to_bytes());
        // The source of block i is the output of block i - 1.
        output = *source;
    }

    debug!(blocks = sources.len(), "recovered padded message");
    Ok(out)
}

/// recover_message recovers the original message bytes, padding stripped.
pub fn recover_message(digest: &[u8; STATE_SIZE], chain: &EncodingChain) -> Result<Vec<u8>> {
    let padded = recover_padded(digest, chain)?;
    padding::unpad(&padded).map(|m| m.to_vec())
}
