//! Canonical hash inputs, identity hash, and key derivation
//!
//! Two memory-hard hashes anchor the scheme: the **identity hash** `H` over
//! the sorted original words, and the **KDF seed** `ek` over the extracted
//! field element. Both are scrypt at the historical defaults
//! (N = 16384, r = 8, p = 1) with 64-byte output, applied to a canonical
//! textual rendering:
//!
//! - identity: `"original_words:[w0, w1, …]"`, a single space after each
//!   comma, no space inside the brackets;
//! - seed: `"key:<decimal e>"`, plain decimal digits, no brackets.
//!
//! These renderings are **compatibility-critical**: a one-byte change
//! invalidates every secret ever issued. Individual keys are then
//! `HMAC-SHA-512(key = decimal index, message = ek)`.

#![forbid(unsafe_code)]

use hmac::{Hmac, Mac};
use scrypt::Params as ScryptParams;
use sha2::Sha512;

use crate::error::FuzzyError;
use crate::field::Gf;
use crate::KEY_LEN;

type HmacSha512 = Hmac<Sha512>;

/// log2 of the scrypt cost parameter N = 16384.
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

#[cfg(test)]
thread_local! {
    static IDENTITY_HASHES: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Test hook: number of identity-hash evaluations on this thread.
#[cfg(test)]
pub(crate) fn identity_hash_count() -> usize {
    IDENTITY_HASHES.with(|c| c.get())
}

/// Render an integer list exactly as the canonical hash input expects:
/// `"[v0, v1, …]"` with a single space after each comma.
pub fn render_words(words: &[u64]) -> String {
    let mut out = String::with_capacity(2 + 4 * words.len());
    out.push('[');
    for (i, w) in words.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&w.to_string());
    }
    out.push(']');
    out
}

/// scrypt at the scheme's fixed parameters, 64-byte output.
fn mem_hard_hash(input: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], FuzzyError> {
    let params = ScryptParams::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
        .expect("fixed scrypt parameters are valid");
    let mut out = [0u8; KEY_LEN];
    scrypt::scrypt(input.as_bytes(), salt, &params, &mut out)
        .map_err(|e| FuzzyError::invalid(format!("scrypt output length: {e}")))?;
    Ok(out)
}

/// Identity hash `H` of a sorted word set.
pub fn hash_words(sorted_words: &[u64], salt: &[u8]) -> Result<[u8; KEY_LEN], FuzzyError> {
    #[cfg(test)]
    IDENTITY_HASHES.with(|c| c.set(c.get() + 1));
    debug_assert!(sorted_words.windows(2).all(|w| w[0] <= w[1]));
    mem_hard_hash(&format!("original_words:{}", render_words(sorted_words)), salt)
}

/// KDF seed `ek` from the extractor and a sorted, verified word set:
/// scrypt over `"key:" + decimal(Π E[i]·w[i] mod p)`.
pub fn derive_ek(
    extractor: &[u64],
    sorted_words: &[u64],
    p: u64,
    salt: &[u8],
) -> Result<[u8; KEY_LEN], FuzzyError> {
    if extractor.len() != sorted_words.len() {
        return Err(FuzzyError::invalid(format!(
            "extractor length {} does not match word count {}",
            extractor.len(),
            sorted_words.len()
        )));
    }
    let gf = Gf::new(p);
    let mut e = 1u64;
    for (&s, &w) in extractor.iter().zip(sorted_words) {
        e = gf.mul(e, gf.mul(s, gf.reduce(w)));
    }
    mem_hard_hash(&format!("key:{e}"), salt)
}

/// The `index`-th key: HMAC-SHA-512 keyed by the decimal index over `ek`.
pub fn derive_key(ek: &[u8; KEY_LEN], index: u64) -> [u8; KEY_LEN] {
    let mut mac = HmacSha512::new_from_slice(index.to_string().as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(ek);
    let tag = mac.finalize().into_bytes();
    let mut out = [0u8; KEY_LEN];
    out.copy_from_slice(&tag);
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::bytes_to_hex;

    #[test]
    fn rendering_matches_the_canonical_list_form() {
        assert_eq!(render_words(&[]), "[]");
        assert_eq!(render_words(&[7]), "[7]");
        assert_eq!(render_words(&[1, 2, 3, 110]), "[1, 2, 3, 110]");
    }

    #[test]
    fn scrypt_matches_the_rfc_7914_vector() {
        // scrypt("pleaseletmein", "SodiumChloride", N=16384, r=8, p=1, 64)
        let out = mem_hard_hash("pleaseletmein", b"SodiumChloride").unwrap();
        assert_eq!(
            bytes_to_hex(&out),
            "7023BDCB3AFD7348461C06CD81FD38EBFDA8FBBA904F8E3EA9B543F6545DA1F2\
             D5432955613F0FCF62D49705242A9AF9E61E85DC0D651E40DFCF017B45575887"
        );
    }

    #[test]
    fn identity_hash_depends_on_words_and_salt() {
        let salt = [7u8; 32];
        let h1 = hash_words(&[1, 2, 3], &salt).unwrap();
        let h2 = hash_words(&[1, 2, 4], &salt).unwrap();
        let h3 = hash_words(&[1, 2, 3], &[8u8; 32]).unwrap();
        assert_ne!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(h1, hash_words(&[1, 2, 3], &salt).unwrap());
    }

    #[test]
    fn ek_reduces_the_product_into_the_field() {
        let salt = [0u8; 32];
        // 3·4 · 5·6 = 360 ≡ 360 - 51·7 = 3 (mod 7): same e as the direct value.
        let a = derive_ek(&[3, 5], &[4, 6], 7, &salt).unwrap();
        let b = mem_hard_hash("key:3", &salt).unwrap();
        assert_eq!(a, b);
        assert!(derive_ek(&[1], &[1, 2], 7, &salt).is_err());
    }

    #[test]
    fn keys_are_deterministic_distinct_and_full_length() {
        let ek = [0x42u8; KEY_LEN];
        let k0 = derive_key(&ek, 0);
        let k1 = derive_key(&ek, 1);
        assert_eq!(k0.len(), 64);
        assert_ne!(k0, k1);
        assert_eq!(k0, derive_key(&ek, 0));
    }
}
