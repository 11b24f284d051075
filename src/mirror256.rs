use tracing::{debug, trace};

use crate::encoding::{Iv, LayerEncoding};
use crate::error::{Error, Result};
use crate::inverse::{self, EncodingChain};
use crate::network;
use crate::padding::{self, BLOCK_SIZE};
use crate::state::{State, STATE_SIZE};

/// The size in bytes of the Mirror256 checksum.
pub const DIGEST_SIZE: usize = STATE_SIZE;

/// Block size, in bytes, of the Mirror256 hash function.
pub const DIGEST_BLOCK_SIZE: usize = BLOCK_SIZE;

// Lengths are padded as a 64-bit count of bits.
const MAX_LEN: u64 = (1 << 61) - 1;

/// Input is anything a hasher accepts: raw bytes, or text hashed as its UTF-8 encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input<'a> {
    /// Bytes hashed as-is.
    Bytes(&'a [u8]),
    /// Text, hashed as UTF-8.
    Text(&'a str),
}

impl<'a> Input<'a> {
    /// as_bytes returns the bytes that enter the pipeline.
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Input::Bytes(b) => b,
            Input::Text(s) => s.as_bytes(),
        }
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(b: &'a [u8]) -> Self {
        Input::Bytes(b)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(b: &'a [u8; N]) -> Self {
        Input::Bytes(b)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        Input::Bytes(b)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(s: &'a str) -> Self {
        Input::Text(s)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(s: &'a String) -> Self {
        Input::Text(s)
    }
}

/// Config holds the knobs a hasher is built with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Where the encoding chain starts.
    pub iv: Iv,
    /// Keep the per-block encoding sources so the message can be recovered later.
    pub record_chain: bool,
}

/// new returns a hasher keyed with the standard IV that has already absorbed `m`.
/// The digest is computed on first request and cached.
pub fn new<'a>(m: impl Into<Input<'a>>) -> Result<Mirror256> {
    let mut h = Mirror256::new();
    h.update(m)?;
    Ok(h)
}

/// new_function hashes `m` and finalizes in one go.
pub fn new_function<'a>(m: impl Into<Input<'a>>) -> Result<Mirror256> {
    let mut h = new(m)?;
    h.finalize();
    Ok(h)
}

/// Mirror256 is an incremental hasher.
///
/// Bytes are buffered until a full block is available; each block runs through the
/// gate network keyed with the previous block's output (the IV for the first block).
/// The first call to [`finalize`](Mirror256::finalize), [`digest`](Mirror256::digest)
/// or [`hexdigest`](Mirror256::hexdigest) pads and closes the hasher; after that
/// `update` fails with [`Error::Finalized`] until [`reset`](Mirror256::reset).
#[derive(Clone, Debug)]
pub struct Mirror256 {
    config: Config,
    iv: State,

    h: State,               // encoding source for the next block (last output, or IV)
    x: [u8; BLOCK_SIZE],    // data written since last block
    nx: usize,              // number of buffered bytes
    len: u64,               // total number of input bytes written overall
    chain: Option<EncodingChain>,
    sum: Option<[u8; DIGEST_SIZE]>,
}

impl Default for Mirror256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mirror256 {
    /// new returns an empty hasher keyed with the standard IV.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// with_config returns an empty hasher built from `config`.
    pub fn with_config(config: Config) -> Self {
        let iv = config.iv.state();
        let chain = config.record_chain.then(EncodingChain::new);
        Self {
            config,
            iv,
            h: iv,
            x: [0; BLOCK_SIZE],
            nx: 0,
            len: 0,
            chain,
            sum: None,
        }
    }

    /// size is the digest size in bytes.
    pub fn size(&self) -> usize {
        DIGEST_SIZE
    }

    /// block_size is the number of bytes consumed per network pass.
    pub fn block_size(&self) -> usize {
        DIGEST_BLOCK_SIZE
    }

    /// config returns the configuration the hasher was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// is_finalized reports whether the digest has been produced.
    pub fn is_finalized(&self) -> bool {
        self.sum.is_some()
    }

    /// reset drops buffered input and any cached digest, and restarts from the IV.
    pub fn reset(&mut self) {
        self.h = self.iv;
        self.x = [0; BLOCK_SIZE];
        self.nx = 0;
        self.len = 0;
        if let Some(chain) = self.chain.as_mut() {
            chain.clear();
        }
        self.sum = None;
        debug!("hasher reset");
    }

    /// update absorbs more input. Calls can be chained and split at any byte.
    pub fn update<'a>(&mut self, m: impl Into<Input<'a>>) -> Result<&mut Self> {
        self.write(m.into().as_bytes())?;
        Ok(self)
    }

    /// update_hex absorbs the bytes spelled by a hex string.
    ///
    /// Malformed hex is rejected before anything is absorbed.
    pub fn update_hex(&mut self, s: &str) -> Result<&mut Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| Error::InvalidInput(e.to_string()))?;
        self.write(&bytes)?;
        Ok(self)
    }

    /// write absorbs `p` and returns the number of bytes taken.
    pub fn write(&mut self, mut p: &[u8]) -> Result<usize> {
        let nn = p.len();
        if self.sum.is_some() {
            return Err(Error::Finalized);
        }
        if nn as u64 > MAX_LEN - self.len {
            return Err(Error::LengthOverflow {
                written: self.len,
                adding: nn as u64,
            });
        }

        self.len += nn as u64;
        if self.nx > 0 {
            // continue with existing buffer, if nonempty
            let n = p.len().min(BLOCK_SIZE - self.nx);
            self.x[self.nx..self.nx + n].copy_from_slice(&p[..n]);
            self.nx += n;
            if self.nx == BLOCK_SIZE {
                let x = self.x;
                self.blocks(&x);
                self.nx = 0;
            }
            p = &p[n..];
        }

        if p.len() >= BLOCK_SIZE {
            // handle any remaining full input blocks
            let n = p.len() / BLOCK_SIZE * BLOCK_SIZE;
            self.blocks(&p[..n]);
            p = &p[n..];
        }

        if !p.is_empty() {
            self.x[..p.len()].copy_from_slice(p);
            self.nx = p.len();
        }

        Ok(nn)
    }

    // blocks hashes full blocks of data. data.len() must be a multiple of BLOCK_SIZE.
    fn blocks(&mut self, data: &[u8]) {
        let mut h = self.h;
        for block in data.chunks_exact(BLOCK_SIZE) {
            if let Some(chain) = self.chain.as_mut() {
                chain.push(h);
            }
            let mut b = [0u8; BLOCK_SIZE];
            b.copy_from_slice(block);
            h = network::permute(State::from_block(&b), &LayerEncoding::derive(h));
        }
        self.h = h;
        trace!(blocks = data.len() / BLOCK_SIZE, "absorbed");
    }

    /// finalize pads the buffered tail, runs the last block(s) and caches the digest.
    /// Later calls return the cached value.
    pub fn finalize(&mut self) -> [u8; DIGEST_SIZE] {
        if let Some(sum) = self.sum {
            return sum;
        }

        let tail = padding::tail(&self.x[..self.nx], self.len);
        self.blocks(&tail);
        self.nx = 0;

        let sum = self.h.to_bytes();
        self.sum = Some(sum);
        debug!(len = self.len, "finalized");
        sum
    }

    /// digest returns the raw 32-byte digest, finalizing first if needed.
    pub fn digest(&mut self) -> [u8; DIGEST_SIZE] {
        self.finalize()
    }

    /// hexdigest returns the digest as 64 lowercase hex characters.
    pub fn hexdigest(&mut self) -> String {
        hex::encode(self.finalize())
    }

    /// chain returns the logged encoding sources when the hasher was built with
    /// `record_chain`.
    pub fn chain(&self) -> Option<&EncodingChain> {
        self.chain.as_ref()
    }

    /// recover_message runs the inverse path over this hasher's own digest and chain.
    pub fn recover_message(&mut self) -> Result<Vec<u8>> {
        let digest = self.finalize();
        let chain = self
            .chain
            .as_ref()
            .ok_or_else(|| Error::Chain("hasher was built without record_chain".to_string()))?;
        inverse::recover_message(&digest, chain)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::encoding::IV;
    use anyhow::Result;
    use proptest::prelude::*;

    struct TestElement {
        input: &'static str,
        output: &'static str,
    }

    static TEST_VECTOR: &[TestElement] = &[
        TestElement {
            input: "",
            output: "41b04c1f746b322b67038f76b2a136162ccddabd2ee769e8b5cdfaaa873a0e95",
        },
        TestElement {
            input: "Hello, world!",
            output: "1841baa731af0e853e1184e48c35c67f5019a927e2cf2fb801e19247bf450c64",
        },
        TestElement {
            input: "abc",
            output: "b7cfa9e2b51262c4f072ca5948d3ad4edce52e7655173070ef4c11eeb6db11b2",
        },
        TestElement {
            input: "This is the canary.",
            output: "dd132beb0d8406192abba0dfba8557ce6f445b8e6504801b8139e83d526c4550",
        },
        TestElement {
            input: "こんにちは世界",
            output: "3a8cc876117777d9b9f1a5fa5d1b41b92ce26c59af026c813b187cc4dfe3867a",
        },
        TestElement {
            input: "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            output: "70a956b37114a725ac9042315b9fdbbdc93d2643e33cf08aef9e3167e572cbf5",
        },
    ];

    #[test]
    fn test_vector() {
        TEST_VECTOR.iter().enumerate().for_each(|(i, element)| {
            let sum = new(element.input).unwrap().hexdigest();
            assert_eq!(
                element.output, sum,
                "test vector element mismatched on index {} failed! got {}, want {}",
                i, sum, element.output
            );
        })
    }

    #[test]
    fn empty_digest_is_one_padding_block() {
        let block = padding::pad(&[]);
        let mut b = [0u8; BLOCK_SIZE];
        b.copy_from_slice(&block);
        let expected = network::permute(State::from_block(&b), &LayerEncoding::derive(*IV));
        assert_eq!(new("").unwrap().digest(), expected.to_bytes());
        assert_eq!(Mirror256::new().digest(), expected.to_bytes());
    }

    #[test]
    fn zero_block() -> Result<()> {
        let sum = new(&[0u8; 32])?.hexdigest();
        assert_ne!(sum, "0".repeat(64));
        assert_eq!(
            sum,
            "a61fdda0fe9abee084d594c0accc2c5f9a9ad211289c3f50f0ae6d02a8b93890"
        );
        Ok(())
    }

    #[test]
    fn incremental_equals_one_shot() -> Result<()> {
        let mut h = Mirror256::new();
        h.update("Hello")?.update(", ")?.update("world!")?;
        assert_eq!(h.hexdigest(), new("Hello, world!")?.hexdigest());
        Ok(())
    }

    #[test]
    fn text_and_bytes_agree() -> Result<()> {
        let text = "こんにちは世界";
        let mut h = Mirror256::new();
        h.update(text.as_bytes())?;
        assert_eq!(h.digest(), new(text)?.digest());

        let mut h = Mirror256::new();
        h.update_hex("48656c6c6f2c20776f726c6421")?;
        assert_eq!(h.digest(), new("Hello, world!")?.digest());
        Ok(())
    }

    #[test]
    fn output_width() -> Result<()> {
        for m in ["", "a", "This is the canary #42. asdfasdfasdfasdfasdfqwerqwerqwerdfnnjkdfnjldljknsvv"] {
            let mut h = new(m)?;
            assert_eq!(h.digest().len(), DIGEST_SIZE);
            let hex = h.hexdigest();
            assert_eq!(hex.len(), 64);
            assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
        Ok(())
    }

    #[test]
    fn finalized_hasher_is_terminal() -> Result<()> {
        let mut h = new("abc")?;
        let first = h.digest();
        assert!(h.is_finalized());
        assert_eq!(h.update("more").err(), Some(Error::Finalized));
        assert_eq!(h.digest(), first);

        h.reset();
        assert!(!h.is_finalized());
        h.update("abc")?;
        assert_eq!(h.digest(), first);
        Ok(())
    }

    #[test]
    fn rejected_hex_leaves_state_alone() -> Result<()> {
        let mut h = new("abc")?;
        assert!(matches!(h.update_hex("zz"), Err(Error::InvalidInput(_))));
        assert!(matches!(h.update_hex("abc"), Err(Error::InvalidInput(_))));
        assert_eq!(h.hexdigest(), new("abc")?.hexdigest());
        Ok(())
    }

    #[test]
    fn new_function_is_finalized() -> Result<()> {
        let mut h = new_function("test string")?;
        assert!(h.is_finalized());
        assert_eq!(h.hexdigest(), new("test string")?.hexdigest());
        Ok(())
    }

    #[test]
    fn seeded_iv_changes_digest() -> Result<()> {
        let mut seeded = Mirror256::with_config(Config {
            iv: Iv::Seeded(b"777".to_vec()),
            ..Default::default()
        });
        seeded.update("This is the canary.")?;
        assert_ne!(seeded.digest(), new("This is the canary.")?.digest());
        Ok(())
    }

    #[test]
    fn recorded_chain_recovers_message() -> Result<()> {
        let msg = "This is the canary #42. asdfasdfasdfasdfasdfqwerqwerqwerdfnnjkdfnjldljknsvv";
        let mut h = Mirror256::with_config(Config {
            record_chain: true,
            ..Default::default()
        });
        h.update(&msg[..10])?.update(&msg[10..])?;
        let digest = h.digest();

        let chain = h.chain().expect("chain is recorded");
        assert_eq!(chain.len(), padding::pad(msg.as_bytes()).len() / BLOCK_SIZE);
        assert_eq!(chain.sources()[0], *IV);
        assert_eq!(inverse::recover_message(&digest, chain)?, msg.as_bytes());
        assert_eq!(h.recover_message()?, msg.as_bytes());

        h.reset();
        assert!(h.chain().map(|c| c.is_empty()).unwrap_or(false));
        Ok(())
    }

    #[test]
    fn exported_chain_recovers_message() -> Result<()> {
        let config = Config {
            iv: Iv::Seeded(b"mirror".to_vec()),
            record_chain: true,
        };
        let mut h = Mirror256::with_config(config.clone());
        h.update("walk me back")?;
        let digest = h.digest();
        let sources: Vec<State> = h.chain().map(|c| c.sources().to_vec()).unwrap_or_default();

        h.reset();
        assert_eq!(h.config(), &config);

        let chain = EncodingChain::from(sources);
        assert_eq!(chain.sources()[0], config.iv.state());
        assert_eq!(inverse::recover_message(&digest, &chain)?, b"walk me back");
        Ok(())
    }

    #[test]
    fn recover_without_chain_fails() -> Result<()> {
        assert!(matches!(new("abc")?.recover_message(), Err(Error::Chain(_))));
        Ok(())
    }

    proptest! {
        #[test]
        fn chunking_does_not_matter(
            msg in proptest::collection::vec(any::<u8>(), 0..200),
            cuts in proptest::collection::vec(0usize..200, 0..8),
        ) {
            let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c % (msg.len() + 1)).collect();
            cuts.sort_unstable();

            let mut h = Mirror256::new();
            let mut start = 0;
            for c in cuts {
                h.update(&msg[start..c]).unwrap();
                start = c;
            }
            h.update(&msg[start..]).unwrap();

            prop_assert_eq!(h.digest(), new(&msg).unwrap().digest());
        }

        #[test]
        fn deterministic(msg in proptest::collection::vec(any::<u8>(), 0..100)) {
            prop_assert_eq!(new(&msg).unwrap().digest(), new(&msg).unwrap().digest());
        }
    }
}
