use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// Block size in bytes.
pub const BLOCK_SIZE: usize = 32;

/// Bytes reserved at the end of the last block for the message length in bits.
pub const LENGTH_SIZE: usize = 8;

/// First padding byte; everything after it up to the length field is zero.
pub const DELIMITER: u8 = 0x80;

/// padded_len is the length of a message of `len` bytes once padded.
pub fn padded_len(len: u64) -> u64 {
    let b = BLOCK_SIZE as u64;
    (len + 1 + LENGTH_SIZE as u64 + b - 1) / b * b
}

/// tail pads the bytes left over after the last full block.
///
/// `rest` holds the unprocessed remainder (shorter than a block) and `total` is the
/// length of the whole message in bytes. The result is one or two blocks long.
pub fn tail(rest: &[u8], total: u64) -> Vec<u8> {
    debug_assert!(rest.len() < BLOCK_SIZE);
    // Messages ending within LENGTH_SIZE bytes of a block boundary spill into a second block.
    let n = if rest.len() < BLOCK_SIZE - LENGTH_SIZE {
        BLOCK_SIZE
    } else {
        2 * BLOCK_SIZE
    };

    let mut out = vec![0u8; n];
    out[..rest.len()].copy_from_slice(rest);
    out[rest.len()] = DELIMITER;
    BigEndian::write_u64(&mut out[n - LENGTH_SIZE..], total << 3);
    out
}

/// pad returns the message padded to a whole number of blocks.
pub fn pad(msg: &[u8]) -> Vec<u8> {
    let full = msg.len() / BLOCK_SIZE * BLOCK_SIZE;
    let mut out = Vec::with_capacity(padded_len(msg.len() as u64) as usize);
    out.extend_from_slice(&msg[..full]);
    out.extend(tail(&msg[full..], msg.len() as u64));
    out
}

/// unpad strips the padding [`pad`] added, checking every padding byte.
pub fn unpad(padded: &[u8]) -> Result<&[u8]> {
    if padded.is_empty() || padded.len() % BLOCK_SIZE != 0 {
        return Err(Error::Padding(format!(
            "length {} is not a positive multiple of {}",
            padded.len(),
            BLOCK_SIZE
        )));
    }

    let bits = BigEndian::read_u64(&padded[padded.len() - LENGTH_SIZE..]);
    if bits % 8 != 0 {
        return Err(Error::Padding(format!("bit length {} is not whole bytes", bits)));
    }
    let len = bits >> 3;
    if padded_len(len) != padded.len() as u64 {
        return Err(Error::Padding(format!(
            "message of {} bytes does not pad to {} bytes",
            len,
            padded.len()
        )));
    }

    let len = len as usize;
    let filler = &padded[len + 1..padded.len() - LENGTH_SIZE];
    if padded[len] != DELIMITER || filler.iter().any(|b| *b != 0) {
        return Err(Error::Padding("unexpected padding bytes".to_string()));
    }
    Ok(&padded[..len])
}
