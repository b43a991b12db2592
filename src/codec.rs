//! Share-link codec
//!
//! Maps the input buffer to a token that can sit after the `#` of a URL and back.
//! Tokens are unpadded URL-safe base64 of the UTF-8 bytes. Decoding also accepts
//! padded tokens and the standard alphabet (`+`, `/`) so links produced by older
//! builds keep working. Those builds encoded with the browser's `btoa`, one byte
//! per Latin-1 character, so a legacy-shaped token whose bytes are not UTF-8 is
//! read back as Latin-1.

use std::fmt;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

const URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const LEGACY: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a token could not be turned back into source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not base64 in either accepted alphabet
    Base64(String),
    /// Valid base64, but the bytes are not UTF-8
    Utf8 { valid_up_to: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Base64(e) => write!(f, "invalid share token: {}", e),
            DecodeError::Utf8 { valid_up_to } => write!(
                f,
                "share token is not UTF-8 text (valid up to byte {})",
                valid_up_to
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Encode source text into a fragment-safe token
pub fn encode(text: &str) -> String {
    URL_SAFE.encode(text.as_bytes())
}

/// Decode a token produced by [`encode`] (or by a legacy link)
pub fn decode(token: &str) -> Result<String, DecodeError> {
    let bytes = match URL_SAFE.decode(token) {
        Ok(bytes) => bytes,
        Err(url_safe_err) => LEGACY.decode(token).map_err(|legacy_err| {
            tracing::trace!(
                "token rejected by both alphabets: url-safe={}, legacy={}",
                url_safe_err,
                legacy_err
            );
            DecodeError::Base64(url_safe_err.to_string())
        })?,
    };

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) if is_legacy_shaped(token) => {
            Ok(e.into_bytes().into_iter().map(char::from).collect())
        }
        Err(e) => Err(DecodeError::Utf8 {
            valid_up_to: e.utf8_error().valid_up_to(),
        }),
    }
}

/// Padded, standard-alphabet form as produced by `btoa`
fn is_legacy_shaped(token: &str) -> bool {
    token.len() % 4 == 0
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_ascii() {
        let source = "puts 'hi'";
        assert_eq!(decode(&encode(source)).unwrap(), source);
    }

    #[test]
    fn test_round_trip_empty() {
        assert_eq!(encode(""), "");
        assert_eq!(decode(&encode("")).unwrap(), "");
    }

    #[test]
    fn test_round_trip_multibyte() {
        for source in [
            "puts \"héllo wörld\"",
            "# 日本語のコメント\nx = 1\n",
            "emoji = \"🦀💎\"",
            "\u{0}\u{7f}\u{80}\u{ffff}",
            "line1\r\nline2\ttabbed\n",
        ] {
            assert_eq!(decode(&encode(source)).unwrap(), source);
        }
    }

    #[test]
    fn test_token_is_fragment_safe() {
        // Bytes chosen so standard base64 would emit '+' and '/'
        let token = encode("\u{3ff}\u{fbff}?>>");
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_decode_accepts_padding() {
        let padded = format!("{}==", encode("a"));
        assert_eq!(decode(&padded).unwrap(), "a");
    }

    #[test]
    fn test_decode_accepts_legacy_standard_alphabet() {
        // btoa("class Foo\nend\n>>?") from a link shared by an older build
        let legacy = "Y2xhc3MgRm9vCmVuZAo+Pj8=";
        assert_eq!(decode(legacy).unwrap(), "class Foo\nend\n>>?");
    }

    #[test]
    fn test_decode_reads_legacy_latin1_links() {
        // btoa("puts 'café'")
        assert_eq!(decode("cHV0cyAnY2Fm6Sc=").unwrap(), "puts 'café'");
        // btoa("£5 © 2019\n")
        assert_eq!(decode("ozUgqSAyMDE5Cg==").unwrap(), "£5 © 2019\n");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("not base64!!"), Err(DecodeError::Base64(_))));
        assert!(matches!(decode("%%%"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        // 0xFF 0xFE is never valid UTF-8
        let token = URL_SAFE.encode([0x61, 0xff, 0xfe]);
        assert_eq!(decode(&token), Err(DecodeError::Utf8 { valid_up_to: 1 }));
    }
}
