use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use std::borrow::Cow;

// Standard alphabet with required padding. Non-zero trailing bits are tolerated on decode.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
  &alphabet::STANDARD,
  GeneralPurposeConfig::new()
    .with_encode_padding(true)
    .with_decode_allow_trailing_bits(true)
    .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Decode a base64 request body. Line breaks (`\r` and `\n`) are skipped.
pub(crate) fn decode_body(body: &str) -> Result<Vec<u8>, base64::DecodeError> {
  let body = if body.contains(&['\r', '\n'][..]) {
    Cow::Owned(body.replace(&['\r', '\n'][..], ""))
  } else {
    Cow::Borrowed(body)
  };
  BODY_ENGINE.decode(body.as_bytes())
}

pub(crate) fn encode_body(body: &[u8]) -> String {
  BODY_ENGINE.encode(body)
}

#[cfg(test)]
mod tests {
  use super::{decode_body, encode_body};

  use pretty_assertions::assert_eq;

  #[test]
  fn test_decode_body() {
    assert_eq!(decode_body("aGVsbG8=").unwrap(), b"hello");
    assert_eq!(decode_body("").unwrap(), b"");
    assert_eq!(decode_body("aGVs\r\nbG8=").unwrap(), b"hello");
    // Trailing bits of the final symbol are non-zero (`aGVsbG9=` would otherwise be rejected).
    assert_eq!(decode_body("aGVsbG9=").unwrap(), b"hello");
  }

  #[test]
  fn test_decode_body_invalid() {
    decode_body("not-valid-base64!!").unwrap_err();
    // Missing padding.
    decode_body("aGVsbG8").unwrap_err();
    decode_body("aGVsbG8=extra").unwrap_err();
  }

  #[test]
  fn test_encode_body() {
    assert_eq!(encode_body(&[0xFF, 0xFE]), "//4=");
    assert_eq!(encode_body(b""), "");
  }
}
