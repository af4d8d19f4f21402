use crate::encoding::decode_body;
use crate::envelope::InboundEnvelope;
use crate::error::AdapterError;
use crate::header::{HeaderMultimap, COOKIE, HOST};

use backtrace::Backtrace;
use http::Version;
use log::trace;

use std::fmt;
use std::io::{self, Cursor, Read};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Path and query string of a request.
///
/// Both parts are kept exactly as delivered by the gateway; no percent-decoding or re-encoding is
/// performed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Url {
  /// Request path.
  pub path: String,
  /// Query string without the leading `?`.
  pub raw_query: String,
}

impl fmt::Display for Url {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.raw_query.is_empty() {
      write!(f, "{}", self.path)
    } else {
      write!(f, "{}?{}", self.path, self.raw_query)
    }
  }
}

/// Fully buffered request body, readable once from start to end.
#[derive(Debug, Default)]
pub struct RequestBody {
  inner: Cursor<Vec<u8>>,
}

impl RequestBody {
  fn new(bytes: Vec<u8>) -> Self {
    Self {
      inner: Cursor::new(bytes),
    }
  }

  /// Length of the body in bytes, regardless of how much has already been read.
  pub fn content_length(&self) -> u64 {
    self.inner.get_ref().len() as u64
  }
}

impl Read for RequestBody {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    self.inner.read(buf)
  }
}

/// Cancellation and deadline information of the Lambda invocation being served.
///
/// Handlers are responsible for observing the deadline; the adapter itself never interrupts a
/// handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvocationContext {
  /// AWS request ID of the invocation.
  pub request_id: String,
  /// Point in time after which the Lambda runtime terminates the invocation.
  pub deadline: Option<SystemTime>,
}

impl InvocationContext {
  /// Time left until the deadline, or `None` if there is no deadline.
  ///
  /// Returns [`Duration::ZERO`] once the deadline has passed.
  pub fn remaining(&self) -> Option<Duration> {
    self.deadline.map(|deadline| {
      deadline
        .duration_since(SystemTime::now())
        .unwrap_or(Duration::ZERO)
    })
  }

  /// Return whether the deadline has passed.
  pub fn is_expired(&self) -> bool {
    self.remaining() == Some(Duration::ZERO)
  }
}

impl From<&lambda_runtime::Context> for InvocationContext {
  fn from(context: &lambda_runtime::Context) -> Self {
    Self {
      request_id: context.request_id.clone(),
      deadline: Some(UNIX_EPOCH + Duration::from_millis(context.deadline)),
    }
  }
}

/// HTTP request passed to a [`Handler`](crate::Handler).
#[derive(Debug)]
pub struct Request {
  method: String,
  url: Url,
  headers: HeaderMultimap,
  host: String,
  body: RequestBody,
  context: InvocationContext,
}

impl Request {
  /// HTTP method, uninterpreted.
  pub fn method(&self) -> &str {
    &self.method
  }

  /// Request path and query string.
  pub fn url(&self) -> &Url {
    &self.url
  }

  /// Protocol version. Always HTTP/1.1, whatever the client spoke to the gateway.
  pub fn version(&self) -> Version {
    Version::HTTP_11
  }

  /// Request headers, including any cookies under `Cookie`.
  pub fn headers(&self) -> &HeaderMultimap {
    &self.headers
  }

  /// Mutable request headers.
  pub fn headers_mut(&mut self) -> &mut HeaderMultimap {
    &mut self.headers
  }

  /// Value of the `Host` header, or an empty string if absent.
  pub fn host(&self) -> &str {
    &self.host
  }

  /// Every `Cookie` value joined with `"; "`, as the header is sent on the wire.
  ///
  /// [`HeaderMultimap::get`] only returns the first cookie, since cookies delivered by the
  /// gateway are stored as separate values.
  pub fn cookie_header(&self) -> Option<String> {
    match self.headers.get_all(COOKIE) {
      [] => None,
      cookies => Some(cookies.join("; ")),
    }
  }

  /// Length of the decoded body in bytes.
  pub fn content_length(&self) -> u64 {
    self.body.content_length()
  }

  /// Request body.
  pub fn body_mut(&mut self) -> &mut RequestBody {
    &mut self.body
  }

  /// Consume the request, returning its body.
  pub fn into_body(self) -> RequestBody {
    self.body
  }

  /// Invocation context inherited from the Lambda runtime.
  pub fn context(&self) -> &InvocationContext {
    &self.context
  }
}

/// Decode an [`InboundEnvelope`] into a [`Request`].
///
/// Decoding is lenient: the method, path and query string are passed through verbatim. The only
/// failure is a body flagged as base64 that is not valid base64.
pub fn decode_request(
  envelope: InboundEnvelope,
  context: InvocationContext,
) -> Result<Request, AdapterError> {
  trace!("Inbound envelope: {envelope:#?}");

  let InboundEnvelope {
    method,
    raw_path,
    raw_query_string,
    headers: envelope_headers,
    cookies,
    body,
    is_base64_encoded,
  } = envelope;

  let mut headers = HeaderMultimap::with_capacity(envelope_headers.len());
  for (name, value) in envelope_headers {
    headers.set(name, value);
  }
  // Cookies delivered out-of-band are authoritative over any `Cookie` header.
  if !cookies.is_empty() {
    headers.set_all(COOKIE, cookies);
  }

  let host = headers.get(HOST).unwrap_or_default().to_owned();

  let body = if is_base64_encoded {
    decode_body(&body)
      .map_err(|err| AdapterError::InvalidBodyBase64(Box::new(err), Backtrace::new()))?
  } else {
    body.into_bytes()
  };

  Ok(Request {
    method,
    url: Url {
      path: raw_path,
      raw_query: raw_query_string,
    },
    headers,
    host,
    body: RequestBody::new(body),
    context,
  })
}
