use crate::encoding::encode_body;
use crate::envelope::OutboundEnvelope;
use crate::header::{HeaderMultimap, SET_COOKIE};

use http::StatusCode;
use log::{debug, warn};

use std::io;

/// Write side of a handler's response.
///
/// Headers must be set before the status is written or the first body bytes are written. The
/// status may be written at most once; the first body write without an explicit status implies
/// `200 OK`.
pub trait ResponseWriter: io::Write {
  /// Response headers to be sent.
  fn headers(&self) -> &HeaderMultimap;

  /// Mutable response headers to be sent.
  fn headers_mut(&mut self) -> &mut HeaderMultimap;

  /// Write the response status, committing the headers.
  fn write_status(&mut self, status: StatusCode);
}

/// Response fully captured from a handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturedResponse {
  /// Status code written by the handler, or `200 OK`.
  pub status: StatusCode,
  /// Headers as committed by the handler.
  pub headers: HeaderMultimap,
  /// Complete response body.
  pub body: Vec<u8>,
}

/// In-memory [`ResponseWriter`] that records everything a handler writes.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
  headers: HeaderMultimap,
  status: Option<StatusCode>,
  // Headers as of the moment the status was committed.
  committed_headers: Option<HeaderMultimap>,
  body: Vec<u8>,
}

impl ResponseRecorder {
  /// Construct an empty recorder.
  pub fn new() -> Self {
    Self::default()
  }

  /// Status written so far, if any.
  pub fn status(&self) -> Option<StatusCode> {
    self.status
  }

  /// Body bytes written so far.
  pub fn body(&self) -> &[u8] {
    &self.body
  }

  /// Consume the recorder, returning the captured response.
  pub fn finish(self) -> CapturedResponse {
    CapturedResponse {
      status: self.status.unwrap_or(StatusCode::OK),
      headers: self.committed_headers.unwrap_or(self.headers),
      body: self.body,
    }
  }
}

impl ResponseWriter for ResponseRecorder {
  fn headers(&self) -> &HeaderMultimap {
    &self.headers
  }

  fn headers_mut(&mut self) -> &mut HeaderMultimap {
    &mut self.headers
  }

  fn write_status(&mut self, status: StatusCode) {
    if let Some(committed) = self.status {
      warn!("Ignoring superfluous response status {status}; already wrote {committed}");
      return;
    }
    self.status = Some(status);
    self.committed_headers = Some(self.headers.clone());
  }
}

impl io::Write for ResponseRecorder {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    if self.status.is_none() {
      self.write_status(StatusCode::OK);
    }
    self.body.extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

/// Encode a [`CapturedResponse`] into an [`OutboundEnvelope`].
///
/// `Set-Cookie` values become separate cookie entries, headers with one value go to the
/// single-value header map, and headers with several values go to the multi-value header map.
/// The body is returned as text if it is valid UTF-8 and base64-encoded otherwise.
pub fn encode_response(response: CapturedResponse) -> OutboundEnvelope {
  let CapturedResponse {
    status,
    headers,
    body,
  } = response;

  let mut out = OutboundEnvelope {
    status_code: status.as_u16(),
    ..Default::default()
  };

  for (name, values) in headers {
    // Reachable via `HeaderMultimap::set_all` with no values.
    if values.is_empty() {
      continue;
    }
    if name.eq_ignore_ascii_case(SET_COOKIE) {
      out.cookies.extend(values);
      continue;
    }
    match <[String; 1]>::try_from(values) {
      Ok([value]) => {
        out.headers.insert(name, value);
      }
      Err(values) => out
        .multi_value_headers
        .entry(name)
        .or_default()
        .extend(values),
    }
  }

  match String::from_utf8(body) {
    Ok(text) => {
      debug!("Returning {} byte text response body", text.len());
      out.body = text;
    }
    Err(err) => {
      let bytes = err.into_bytes();
      debug!("Returning {} byte binary response body", bytes.len());
      out.body = encode_body(&bytes);
      out.is_base64_encoded = true;
    }
  }

  out
}

#[cfg(test)]
mod tests {
  use super::{encode_response, CapturedResponse, ResponseRecorder, ResponseWriter};
  use crate::header::HeaderMultimap;

  use http::StatusCode;
  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;

  use std::io::Write;

  #[test]
  fn test_recorder_defaults_to_ok() {
    let mut recorder = ResponseRecorder::new();
    recorder.write_all(b"Hello, world!\n").unwrap();
    assert_eq!(recorder.status(), Some(StatusCode::OK));

    let captured = recorder.finish();
    assert_eq!(captured.status, StatusCode::OK);
    assert_eq!(captured.body, b"Hello, world!\n");
  }

  #[test]
  fn test_recorder_empty() {
    assert_eq!(
      ResponseRecorder::new().finish(),
      CapturedResponse {
        status: StatusCode::OK,
        headers: HeaderMultimap::new(),
        body: Vec::new(),
      }
    );
  }

  #[test]
  fn test_recorder_first_status_wins() {
    let mut recorder = ResponseRecorder::new();
    recorder.write_status(StatusCode::CREATED);
    recorder.write_status(StatusCode::INTERNAL_SERVER_ERROR);
    recorder.write_all(b"done").unwrap();

    assert_eq!(recorder.finish().status, StatusCode::CREATED);
  }

  #[test]
  fn test_recorder_headers_after_commit_are_dropped() {
    let mut recorder = ResponseRecorder::new();
    recorder.headers_mut().set("Content-Type", "text/plain");
    recorder.write_all(b"a").unwrap();
    recorder.headers_mut().set("X-Late", "1");
    recorder.write_all(b"b").unwrap();

    assert_eq!(recorder.headers().get("X-Late"), Some("1"));
    let captured = recorder.finish();
    assert_eq!(captured.headers.get("Content-Type"), Some("text/plain"));
    assert!(!captured.headers.contains("X-Late"));
    assert_eq!(captured.body, b"ab");
  }

  #[test]
  fn test_recorder_headers_without_commit() {
    let mut recorder = ResponseRecorder::new();
    recorder.headers_mut().set("Location", "/elsewhere");

    let captured = recorder.finish();
    assert_eq!(captured.status, StatusCode::OK);
    assert_eq!(captured.headers.get("location"), Some("/elsewhere"));
  }

  #[test]
  fn test_encode_header_classification() {
    let mut headers = HeaderMultimap::new();
    headers.set("Content-Type", "text/html");
    headers.append("Vary", "Accept");
    headers.append("Vary", "Origin");
    headers.append("set-cookie", "a=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT");
    headers.append("set-cookie", "b=2");

    let out = encode_response(CapturedResponse {
      status: StatusCode::FOUND,
      headers,
      body: Vec::new(),
    });

    assert_eq!(out.status_code, 302);
    assert_eq!(
      out.headers,
      IndexMap::from([("Content-Type".to_string(), "text/html".to_string())])
    );
    assert_eq!(
      out.multi_value_headers,
      IndexMap::from([(
        "Vary".to_string(),
        vec!["Accept".to_string(), "Origin".to_string()]
      )])
    );
    assert_eq!(
      out.cookies,
      vec![
        "a=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT".to_string(),
        "b=2".to_string()
      ]
    );
    assert_eq!(out.body, "");
    assert!(!out.is_base64_encoded);
  }

  #[test]
  fn test_encode_single_set_cookie() {
    let mut headers = HeaderMultimap::new();
    headers.set("Set-Cookie", "id=1");

    let out = encode_response(CapturedResponse {
      headers,
      ..Default::default()
    });

    assert_eq!(out.cookies, vec!["id=1".to_string()]);
    assert!(out.headers.is_empty());
    assert!(out.multi_value_headers.is_empty());
  }

  #[test]
  fn test_encode_skips_empty_header() {
    let mut headers = HeaderMultimap::new();
    headers.set_all("X-Empty", Vec::new());
    headers.set_all("Set-Cookie", Vec::new());
    headers.set("X-Present", "1");

    let out = encode_response(CapturedResponse {
      headers,
      ..Default::default()
    });

    assert_eq!(
      out.headers,
      IndexMap::from([("X-Present".to_string(), "1".to_string())])
    );
    assert!(out.multi_value_headers.is_empty());
    assert!(out.cookies.is_empty());
  }

  #[test]
  fn test_encode_text_body() {
    let out = encode_response(CapturedResponse {
      body: vec![0x68, 0x69],
      ..Default::default()
    });
    assert_eq!(out.status_code, 200);
    assert_eq!(out.body, "hi");
    assert!(!out.is_base64_encoded);

    let out = encode_response(CapturedResponse {
      body: "héllo ✓".as_bytes().to_vec(),
      ..Default::default()
    });
    assert_eq!(out.body, "héllo ✓");
    assert!(!out.is_base64_encoded);
  }

  #[test]
  fn test_encode_binary_body() {
    let out = encode_response(CapturedResponse {
      body: vec![0xFF, 0xFE],
      ..Default::default()
    });
    assert_eq!(out.body, "//4=");
    assert!(out.is_base64_encoded);

    // Truncated multi-byte sequence.
    let out = encode_response(CapturedResponse {
      body: vec![b'a', 0xE2, 0x9C],
      ..Default::default()
    });
    assert_eq!(out.body, "YeKc");
    assert!(out.is_base64_encoded);

    // UTF-16 surrogates encoded as UTF-8 are not valid text.
    let out = encode_response(CapturedResponse {
      body: vec![0xED, 0xA0, 0x80],
      ..Default::default()
    });
    assert!(out.is_base64_encoded);
  }
}
