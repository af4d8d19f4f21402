use crate::request::Request;
use crate::response::ResponseWriter;

use std::error::Error;
use std::sync::Arc;

/// Error type returned by a [`Handler`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Synchronous HTTP request handler.
///
/// A handler is invoked exactly once per request. It may set response headers, write a status and
/// write body bytes to `response`. Handlers are shared across invocations, which may run
/// concurrently.
pub trait Handler: Send + Sync {
  /// Serve `request`, writing the response to `response`.
  ///
  /// Returning an error fails the whole invocation; nothing written to `response` is returned to
  /// the client.
  fn serve(&self, request: Request, response: &mut dyn ResponseWriter) -> Result<(), BoxError>;
}

impl<H> Handler for Arc<H>
where
  H: Handler + ?Sized,
{
  fn serve(&self, request: Request, response: &mut dyn ResponseWriter) -> Result<(), BoxError> {
    (**self).serve(request, response)
  }
}

impl<H> Handler for Box<H>
where
  H: Handler + ?Sized,
{
  fn serve(&self, request: Request, response: &mut dyn ResponseWriter) -> Result<(), BoxError> {
    (**self).serve(request, response)
  }
}

/// [`Handler`] backed by a closure. See [`handler_fn`].
#[derive(Clone, Copy, Debug)]
pub struct HandlerFn<F> {
  f: F,
}

impl<F> Handler for HandlerFn<F>
where
  F: Fn(Request, &mut dyn ResponseWriter) -> Result<(), BoxError> + Send + Sync,
{
  fn serve(&self, request: Request, response: &mut dyn ResponseWriter) -> Result<(), BoxError> {
    (self.f)(request, response)
  }
}

/// Wrap a closure as a [`Handler`].
///
/// # Example
///
/// ```rust
/// use apigw_http::{handler_fn, Handler};
/// use std::io::Write;
///
/// let hello = handler_fn(|_request, response| {
///   response.write_all(b"Hello, world!\n")?;
///   Ok(())
/// });
/// # fn assert_handler(_: &impl Handler) {}
/// # assert_handler(&hello);
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
  F: Fn(Request, &mut dyn ResponseWriter) -> Result<(), BoxError> + Send + Sync,
{
  HandlerFn { f }
}
