//! Salted digest computation with per-worker context reuse.

use std::{fmt, str::FromStr};

use md5::{
    digest::{Digest, FixedOutputReset},
    Md5,
};
use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use crate::error::BruteError;

/// All the supported hash functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Rmd160,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Rmd160,
    ];

    /// Gets the digest size in bytes.
    pub fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => Md5::output_size(),
            HashAlgorithm::Sha1 => Sha1::output_size(),
            HashAlgorithm::Sha256 => Sha256::output_size(),
            HashAlgorithm::Sha384 => Sha384::output_size(),
            HashAlgorithm::Sha512 => Sha512::output_size(),
            HashAlgorithm::Rmd160 => Ripemd160::output_size(),
        }
    }

    /// Length of the lowercase-hex rendering of a digest.
    pub fn hex_len(&self) -> usize {
        self.digest_size() * 2
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
            HashAlgorithm::Rmd160 => "RMD160",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = BruteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MD5" => Ok(HashAlgorithm::Md5),
            "SHA1" => Ok(HashAlgorithm::Sha1),
            "SHA256" => Ok(HashAlgorithm::Sha256),
            "SHA384" => Ok(HashAlgorithm::Sha384),
            "SHA512" => Ok(HashAlgorithm::Sha512),
            "RMD160" => Ok(HashAlgorithm::Rmd160),
            _ => Err(BruteError::UnsupportedAlgorithm(s.to_owned())),
        }
    }
}

enum HasherState {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Rmd160(Ripemd160),
}

/// Computes salted digests with a reusable digest context.
///
/// The algorithm is resolved to a concrete hasher once, at construction, so
/// the per-candidate path never branches on strings or allocates a context.
/// An engine is owned by exactly one worker thread and must not be shared.
pub struct HashEngine {
    salt: Vec<u8>,
    state: HasherState,
}

impl HashEngine {
    pub fn new(algorithm: HashAlgorithm, salt: &[u8]) -> Self {
        let state = match algorithm {
            HashAlgorithm::Md5 => HasherState::Md5(Md5::new()),
            HashAlgorithm::Sha1 => HasherState::Sha1(Sha1::new()),
            HashAlgorithm::Sha256 => HasherState::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => HasherState::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => HasherState::Sha512(Sha512::new()),
            HashAlgorithm::Rmd160 => HasherState::Rmd160(Ripemd160::new()),
        };

        Self {
            salt: salt.to_vec(),
            state,
        }
    }

    /// Computes `algorithm(salt ++ candidate)` as a lowercase-hex string.
    /// The salt is prepended, never interleaved.
    pub fn digest_hex(&mut self, candidate: &str) -> String {
        match &mut self.state {
            HasherState::Md5(h) => hash_hex(h, &self.salt, candidate),
            HasherState::Sha1(h) => hash_hex(h, &self.salt, candidate),
            HasherState::Sha256(h) => hash_hex(h, &self.salt, candidate),
            HasherState::Sha384(h) => hash_hex(h, &self.salt, candidate),
            HasherState::Sha512(h) => hash_hex(h, &self.salt, candidate),
            HasherState::Rmd160(h) => hash_hex(h, &self.salt, candidate),
        }
    }
}

#[inline]
fn hash_hex<D: Digest + FixedOutputReset>(hasher: &mut D, salt: &[u8], candidate: &str) -> String {
    Digest::update(hasher, salt);
    Digest::update(hasher, candidate.as_bytes());
    hex::encode(Digest::finalize_reset(hasher))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(algorithm: HashAlgorithm, text: &str) -> String {
        HashEngine::new(algorithm, b"").digest_hex(text)
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            "900150983cd24fb0d6963f7d28e17f72",
            digest_of(HashAlgorithm::Md5, "abc")
        );
        assert_eq!(
            "a9993e364706816aba3e25717850c26c9cd0d89d",
            digest_of(HashAlgorithm::Sha1, "abc")
        );
        assert_eq!(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            digest_of(HashAlgorithm::Sha256, "abc")
        );
        assert_eq!(
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7",
            digest_of(HashAlgorithm::Sha384, "abc")
        );
        assert_eq!(
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
            digest_of(HashAlgorithm::Sha512, "abc")
        );
        assert_eq!(
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc",
            digest_of(HashAlgorithm::Rmd160, "abc")
        );
    }

    #[test]
    fn test_matches_one_shot_digest() {
        let ours = digest_of(HashAlgorithm::Sha256, "aa");
        let reference = hex::encode(Sha256::digest(b"aa"));

        assert_eq!(reference, ours);
    }

    #[test]
    fn test_salt_is_prepended() {
        let salted = HashEngine::new(HashAlgorithm::Sha256, b"ab").digest_hex("c");
        let concatenated = digest_of(HashAlgorithm::Sha256, "abc");

        assert_eq!(concatenated, salted);
    }

    #[test]
    fn test_context_reuse_resets_between_calls() {
        let mut engine = HashEngine::new(HashAlgorithm::Md5, b"");

        let first = engine.digest_hex("something else");
        let second = engine.digest_hex("abc");

        assert_ne!(first, second);
        assert_eq!("900150983cd24fb0d6963f7d28e17f72", second);
    }

    #[test]
    fn test_hex_lengths() {
        for algorithm in HashAlgorithm::ALL {
            let digest = digest_of(algorithm, "aa");
            assert_eq!(algorithm.hex_len(), digest.len());
        }

        assert_eq!(32, HashAlgorithm::Md5.hex_len());
        assert_eq!(40, HashAlgorithm::Sha1.hex_len());
        assert_eq!(64, HashAlgorithm::Sha256.hex_len());
        assert_eq!(96, HashAlgorithm::Sha384.hex_len());
        assert_eq!(128, HashAlgorithm::Sha512.hex_len());
        assert_eq!(40, HashAlgorithm::Rmd160.hex_len());
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!(
            HashAlgorithm::Sha256,
            "sha256".parse::<HashAlgorithm>().unwrap()
        );
        assert_eq!(
            HashAlgorithm::Rmd160,
            "RMD160".parse::<HashAlgorithm>().unwrap()
        );
        assert!(matches!(
            "whirlpool".parse::<HashAlgorithm>(),
            Err(BruteError::UnsupportedAlgorithm(_))
        ));
    }
}
