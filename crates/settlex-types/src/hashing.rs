//! Canonical content encoding for signed payloads.
//!
//! Signers and the engine must produce byte-identical payloads, so every
//! field is written in a fixed order: strings length-prefixed, integers
//! big-endian, and pip amounts as base-10 fixed-point strings with exactly
//! 8 decimals (the precision the signer saw), never as raw integers.

use sha2::{Digest, Sha256};

use crate::{Pips, pips};

/// Append-only canonical encoder. Finish with [`CanonicalEncoder::digest`].
#[derive(Debug, Default)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    /// Start a payload with a domain-separation tag.
    #[must_use]
    pub fn new(domain: &str) -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(domain.as_bytes());
        Self { buf }
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(value);
        self
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn str(&mut self, value: &str) -> &mut Self {
        self.buf
            .extend_from_slice(&(value.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    /// Pip amount as `"10.00000000"`.
    pub fn pips(&mut self, value: Pips) -> &mut Self {
        let rendered = pips::format_pips(value);
        self.str(&rendered)
    }

    /// Optional pip amount; absent renders as the empty string.
    pub fn opt_pips(&mut self, value: Option<Pips>) -> &mut Self {
        match value {
            Some(v) => self.pips(v),
            None => self.str(""),
        }
    }

    /// The raw payload bytes written so far.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buf
    }

    /// SHA-256 over the payload.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        let hash = Sha256::digest(&self.buf);
        hash.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pips_render_as_fixed_point_strings() {
        let mut enc = CanonicalEncoder::new("t:");
        enc.pips(1_000_000_000);
        let mut expected = b"t:".to_vec();
        expected.extend_from_slice(&11u32.to_be_bytes());
        expected.extend_from_slice(b"10.00000000");
        assert_eq!(enc.payload(), expected.as_slice());
    }

    #[test]
    fn absent_amount_differs_from_zero() {
        let mut absent = CanonicalEncoder::new("t:");
        absent.opt_pips(None);
        let mut zero = CanonicalEncoder::new("t:");
        zero.opt_pips(Some(0));
        assert_ne!(absent.digest(), zero.digest());
    }

    #[test]
    fn length_prefix_prevents_concatenation_collisions() {
        let mut a = CanonicalEncoder::new("t:");
        a.str("AB").str("C");
        let mut b = CanonicalEncoder::new("t:");
        b.str("A").str("BC");
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn digest_deterministic() {
        let mut a = CanonicalEncoder::new("t:");
        a.u8(1).u64(42).bytes(&[1, 2, 3]);
        let mut b = CanonicalEncoder::new("t:");
        b.u8(1).u64(42).bytes(&[1, 2, 3]);
        assert_eq!(a.digest(), b.digest());
    }
}
