use crate::handler::BoxError;

// Until std::error::Backtrace is fully stabilized, we can't embed a type named `Backtrace` within
// a thiserror::Error (see https://github.com/dtolnay/thiserror/issues/204).
use backtrace::Backtrace as _Backtrace;
use thiserror::Error;

use std::iter;

/// Error that occurred while translating an API Gateway invocation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AdapterError {
  /// Request handler returned an error.
  #[error("request handler failed")]
  Handler(#[source] BoxError, _Backtrace),
  /// Invalid base64 encoding for request body.
  // The base64 encoding comes from AWS, so this is actually an internal error.
  #[error("invalid base64 encoding for request body")]
  InvalidBodyBase64(#[source] Box<base64::DecodeError>, _Backtrace),
  /// [`AdapterBuilder::build`](crate::AdapterBuilder::build) was called without a handler.
  #[error("no request handler configured")]
  MissingHandler(_Backtrace),
  /// Request handler panicked.
  #[error("request handler panicked: {0}")]
  Panic(String, _Backtrace),
}

impl AdapterError {
  /// Return the backtrace associated with the error, if known.
  pub fn backtrace(&self) -> Option<&_Backtrace> {
    match self {
      AdapterError::Handler(_, backtrace)
      | AdapterError::InvalidBodyBase64(_, backtrace)
      | AdapterError::MissingHandler(backtrace)
      | AdapterError::Panic(_, backtrace) => Some(backtrace),
    }
  }

  /// Return the name of the error variant (e.g., `InvalidBodyBase64`).
  pub fn name(&self) -> &str {
    match self {
      AdapterError::Handler(_, _) => "Handler",
      AdapterError::InvalidBodyBase64(_, _) => "InvalidBodyBase64",
      AdapterError::MissingHandler(_) => "MissingHandler",
      AdapterError::Panic(_, _) => "Panic",
    }
  }
}

/// Render `err` on one line, followed by an indented `caused by:` line for each error in its
/// [`source`](std::error::Error::source) chain.
///
/// `name` prefixes the first line (e.g., `AdapterError::InvalidBodyBase64`). When `backtrace` is
/// given, it is printed beneath the first line.
pub fn format_error(
  err: &(dyn std::error::Error),
  name: Option<&str>,
  backtrace: Option<&_Backtrace>,
) -> String {
  let mut lines = vec![match name {
    Some(name) => format!("{name}: {err}"),
    None => err.to_string(),
  }];

  if let Some(backtrace) = backtrace {
    lines.push("  stack trace:".to_string());
    lines.extend(
      format!("{backtrace:?}")
        .lines()
        .map(|line| format!("    {line}")),
    );
  }

  lines.extend(
    iter::successors(err.source(), |cause| cause.source())
      .map(|cause| format!("  caused by: {cause}")),
  );

  lines.join("\n")
}
