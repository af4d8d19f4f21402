use crate::envelope::{InboundEnvelope, OutboundEnvelope};
use crate::error::AdapterError;
use crate::handler::Handler;
use crate::request::{decode_request, InvocationContext, Request};
use crate::response::{encode_response, ResponseRecorder};

use backtrace::Backtrace;
use log::trace;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Translates API Gateway envelopes to and from calls to a synchronous [`Handler`].
///
/// An adapter holds no per-invocation state, so a single instance may serve any number of
/// concurrent invocations.
#[derive(Debug)]
pub struct Adapter<H> {
  handler: H,
  catch_panics: bool,
}

impl<H> Adapter<H>
where
  H: Handler,
{
  /// Construct an adapter for the specified handler, with default settings.
  pub fn new(handler: H) -> Self {
    Self {
      handler,
      catch_panics: true,
    }
  }

  /// Begin configuring an adapter.
  pub fn builder() -> AdapterBuilder<H> {
    AdapterBuilder::default()
  }

  /// Return the wrapped handler.
  pub fn handler(&self) -> &H {
    &self.handler
  }

  /// Serve a single invocation: decode the envelope, run the handler to completion, and encode
  /// everything it wrote.
  pub fn run(
    &self,
    envelope: InboundEnvelope,
    context: InvocationContext,
  ) -> Result<OutboundEnvelope, AdapterError> {
    let request = decode_request(envelope, context)?;

    let mut recorder = ResponseRecorder::new();
    self.invoke(request, &mut recorder)?;

    let captured = recorder.finish();
    trace!(
      "Handler responded with status {} ({} header(s), {} body byte(s))",
      captured.status,
      captured.headers.len(),
      captured.body.len(),
    );

    Ok(encode_response(captured))
  }

  fn invoke(&self, request: Request, recorder: &mut ResponseRecorder) -> Result<(), AdapterError> {
    if !self.catch_panics {
      return self
        .handler
        .serve(request, recorder)
        .map_err(|err| AdapterError::Handler(err, Backtrace::new()));
    }

    match panic::catch_unwind(AssertUnwindSafe(|| self.handler.serve(request, recorder))) {
      Ok(result) => result.map_err(|err| AdapterError::Handler(err, Backtrace::new())),
      Err(panic) => Err(AdapterError::Panic(
        // If the panic value isn't a String or &str, don't catch it since we can't print it and
        // it's unclear what we should do instead.
        panic_string(panic).unwrap_or_else(|panic| panic::resume_unwind(panic)),
        // The panic doesn't carry a stack trace unless a panic hook captures one, so this only
        // records where the panic was caught.
        Backtrace::new(),
      )),
    }
  }
}

/// Builder for an [`Adapter`].
#[derive(Debug)]
pub struct AdapterBuilder<H> {
  handler: Option<H>,
  catch_panics: bool,
}

impl<H> Default for AdapterBuilder<H> {
  fn default() -> Self {
    Self {
      handler: None,
      catch_panics: true,
    }
  }
}

impl<H> AdapterBuilder<H>
where
  H: Handler,
{
  /// Set the handler that serves every request.
  pub fn handler(mut self, handler: H) -> Self {
    self.handler = Some(handler);
    self
  }

  /// Whether to turn handler panics into [`AdapterError::Panic`] (default: `true`).
  ///
  /// When disabled, handler panics unwind through [`Adapter::run`]. Panics can only be caught when
  /// the binary is built with `panic = "unwind"`.
  pub fn catch_panics(mut self, catch_panics: bool) -> Self {
    self.catch_panics = catch_panics;
    self
  }

  /// Build the adapter, failing if no handler was set.
  pub fn build(self) -> Result<Adapter<H>, AdapterError> {
    let handler = self
      .handler
      .ok_or_else(|| AdapterError::MissingHandler(Backtrace::new()))?;
    Ok(Adapter {
      handler,
      catch_panics: self.catch_panics,
    })
  }
}

/// Extract the panic string after catching a panic, or return the payload if it isn't a string.
fn panic_string(panic: Box<dyn Any + Send>) -> Result<String, Box<dyn Any + Send>> {
  panic
    .downcast::<String>()
    .map(|panic| panic.to_string())
    .or_else(|panic| panic.downcast::<&str>().map(|err| err.to_string()))
}
