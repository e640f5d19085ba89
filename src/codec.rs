//! Hex codec and serde adapters for the JSON surface
//!
//! Every byte field on the wire is upper-case hex. The seed stream
//! (`randomBytes`) is additionally chunked into 32-byte lines, matching the
//! WASM-style input format: decoding concatenates the lines, encoding
//! re-chunks. The `with`-modules at the bottom plug these conversions into
//! the serde derives on the entity types.

#![forbid(unsafe_code)]

use crate::error::FuzzyError;

/// Bytes per line when the seed stream is rendered as a hex list.
pub const SEED_LINE_BYTES: usize = 32;

/// Upper-case hex rendering; inverse of [`hex_to_bytes`].
pub fn bytes_to_hex(data: &[u8]) -> String {
    hex::encode_upper(data)
}

/// Decode a hex string (either case) into bytes.
pub fn hex_to_bytes(repr: &str) -> Result<Vec<u8>, FuzzyError> {
    hex::decode(repr).map_err(|e| FuzzyError::invalid(format!("bad hex string: {e}")))
}

/// Split bytes into upper-case hex lines of `bpl` bytes each (last line may
/// be shorter).
pub fn bytes_to_hex_lines(data: &[u8], bpl: usize) -> Vec<String> {
    data.chunks(bpl.max(1)).map(bytes_to_hex).collect()
}

/// Concatenate a list of hex lines back into bytes.
pub fn hex_lines_to_bytes(lines: &[String]) -> Result<Vec<u8>, FuzzyError> {
    let mut out = Vec::new();
    for line in lines {
        out.extend(hex_to_bytes(line)?);
    }
    Ok(out)
}

/// Serde adapter: `Vec<u8>` as a single upper-case hex string.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as one upper-case hex string.
    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::bytes_to_hex(bytes))
    }

    /// Deserialize one hex string into bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        super::hex_to_bytes(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter: `Option<Vec<u8>>` as an optional list of 32-byte hex
/// lines (the `randomBytes` seed-stream format).
pub mod opt_hex_lines {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize the seed stream re-chunked into 32-byte hex lines.
    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => s.collect_seq(super::bytes_to_hex_lines(b, super::SEED_LINE_BYTES)),
            None => s.serialize_none(),
        }
    }

    /// Deserialize an optional hex-line list into the concatenated stream.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let lines = Option::<Vec<String>>::deserialize(d)?;
        match lines {
            Some(lines) => super::hex_lines_to_bytes(&lines)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_and_is_upper_case() {
        let data = vec![0xf8u8, 0x03, 0x00, 0xab];
        let s = bytes_to_hex(&data);
        assert_eq!(s, "F80300AB");
        assert_eq!(hex_to_bytes(&s).unwrap(), data);
        assert_eq!(hex_to_bytes("F803").unwrap(), vec![0xf8, 0x03]);
        assert!(hex_to_bytes("F8030").is_err(), "odd length");
        assert!(hex_to_bytes("ZZ").is_err());
    }

    #[test]
    fn lines_chunk_and_concatenate() {
        let data: Vec<u8> = (0u8..70).collect();
        let lines = bytes_to_hex_lines(&data, 32);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 64);
        assert_eq!(lines[2].len(), 12);
        assert_eq!(hex_lines_to_bytes(&lines).unwrap(), data);
    }
}
