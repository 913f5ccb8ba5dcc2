//! Deterministic content fingerprints for loaded datasets.
//!
//! Fingerprints are logged next to every loaded table so two runs can be
//! compared without diffing the raw files.

/// 64-bit FNV-1a hash state.
#[derive(Copy, Clone, Debug)]
pub struct Fingerprint(u64);

impl Fingerprint {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    /// Create a new hash state with the FNV offset basis.
    pub fn new() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    /// Fingerprint a complete byte slice in one go.
    pub fn of(bytes: &[u8]) -> Self {
        let mut fp = Self::new();
        fp.update(bytes);
        fp
    }

    /// Feed bytes into the hash function.
    pub fn update(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = (self.0 ^ u64::from(*b)).wrapping_mul(Self::PRIME);
        }
    }

    pub fn finish(&self) -> u64 {
        self.0
    }

    /// 16-character lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}
