//! PKCS#7 padding.
//!
//! `pad` always appends at least one byte (a full block when the input is
//! already aligned), so `unpad` is never ambiguous. `unpad` checks every
//! trailer byte, which is where a wrong key or corrupt ciphertext surfaces.

use crate::crypto::types::CryptoError;

/// PKCS#7 stores the pad length in one byte, so the block must be 1..=255.
fn check_block_size(block_size: usize) -> Result<(), CryptoError> {
    if block_size == 0 || block_size > u8::MAX as usize {
        return Err(CryptoError::UnsupportedCipherConfig(format!(
            "padding block size {block_size} is outside 1..=255"
        )));
    }
    Ok(())
}

/// Number of padding bytes `pad` would append for `len` bytes of input.
pub fn pad_len_for(len: usize, block_size: usize) -> Result<usize, CryptoError> {
    check_block_size(block_size)?;
    Ok(block_size - (len % block_size))
}

/// Pad into a new buffer.
pub fn pad(plaintext: &[u8], block_size: usize) -> Result<Vec<u8>, CryptoError> {
    let pad_len = pad_len_for(plaintext.len(), block_size)?;
    let mut out = Vec::with_capacity(plaintext.len() + pad_len);
    out.extend_from_slice(plaintext);
    out.resize(plaintext.len() + pad_len, pad_len as u8);
    Ok(out)
}

/// Pad an owned buffer without copying its contents. Returns the pad length.
pub fn pad_in_place(buf: &mut Vec<u8>, block_size: usize) -> Result<usize, CryptoError> {
    let pad_len = pad_len_for(buf.len(), block_size)?;
    buf.resize(buf.len() + pad_len, pad_len as u8);
    Ok(pad_len)
}

/// Validate the trailer and return the unpadded length.
pub fn unpadded_len(padded: &[u8], block_size: usize) -> Result<usize, CryptoError> {
    check_block_size(block_size)?;
    let last = *padded.last().ok_or(CryptoError::InvalidPadding)?;
    let pad_len = last as usize;

    if pad_len == 0 || pad_len > block_size || pad_len > padded.len() {
        return Err(CryptoError::InvalidPadding);
    }

    let trailer = &padded[padded.len() - pad_len..];
    if trailer.iter().any(|&b| b != last) {
        return Err(CryptoError::InvalidPadding);
    }

    Ok(padded.len() - pad_len)
}

/// Strip padding into a new buffer.
pub fn unpad(padded: &[u8], block_size: usize) -> Result<Vec<u8>, CryptoError> {
    let len = unpadded_len(padded, block_size)?;
    Ok(padded[..len].to_vec())
}

/// Strip padding from an owned buffer by truncation.
pub fn unpad_in_place(buf: &mut Vec<u8>, block_size: usize) -> Result<usize, CryptoError> {
    let len = unpadded_len(buf, block_size)?;
    let removed = buf.len() - len;
    buf.truncate(len);
    Ok(removed)
}
