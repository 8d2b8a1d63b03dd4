//! Reversible XOR transform applied to payloads of masked frames.
//!
//! The key is treated as a repeating 4 byte pad in wire order, i.e. byte `j` of the pad is
//! `key.to_be_bytes()[j]`. The same order is used when the key is written to and read from the
//! wire, so masking and unmasking are the same operation.

/// Mask (or unmask) `data` into `out`, returning the number of bytes written.
///
/// # Panics
///
/// If `out` is shorter than `data`.
#[inline]
pub fn apply(data: &[u8], key: u32, out: &mut [u8]) -> usize {
    let key = key.to_be_bytes();
    let out = &mut out[..data.len()];
    for (i, (dst, src)) in out.iter_mut().zip(data).enumerate() {
        *dst = src ^ key[i & 3];
    }
    data.len()
}

/// Mask (or unmask) `data` in place.
#[inline]
pub fn apply_in_place(data: &mut [u8], key: u32) {
    let key = key.to_be_bytes();
    for (i, b) in data.iter_mut().enumerate() {
        *b ^= key[i & 3];
    }
}
