use crate::adapter::Adapter;
use crate::envelope::{InboundEnvelope, OutboundEnvelope};
use crate::error::{format_error, AdapterError};
use crate::handler::Handler;
use crate::request::InvocationContext;

use aws_lambda_events::apigw::ApiGatewayV2httpRequest;
use aws_lambda_events::lambda_function_urls::LambdaFunctionUrlRequest;
use futures::future;
use lambda_runtime::{service_fn, LambdaEvent};
use log::{error, trace};
use serde::de::DeserializeOwned;

/// Start the Lambda runtime to serve Amazon API Gateway HTTP API (payload format 2.0) events using
/// the specified adapter.
///
/// # Example
///
/// ```rust,ignore
/// use apigw_http::{handler_fn, run_lambda, Adapter};
/// use std::io::Write;
///
/// #[tokio::main]
/// pub async fn main() {
///   env_logger::init();
///
///   let adapter = Adapter::new(handler_fn(|_request, response| {
///     response.write_all(b"Hello, world!\n")?;
///     Ok(())
///   }));
///
///   run_lambda(&adapter).await
/// }
/// ```
pub async fn run_lambda<H>(adapter: &Adapter<H>)
where
  H: Handler,
{
  run_events::<ApiGatewayV2httpRequest, H>(adapter).await
}

/// Start the Lambda runtime to serve Lambda Function URL events using the specified adapter.
///
/// See [`run_lambda`] for an example.
pub async fn run_function_url_lambda<H>(adapter: &Adapter<H>)
where
  H: Handler,
{
  run_events::<LambdaFunctionUrlRequest, H>(adapter).await
}

async fn run_events<E, H>(adapter: &Adapter<H>)
where
  E: DeserializeOwned + Into<InboundEnvelope>,
  H: Handler,
{
  lambda_runtime::run(service_fn(|event: LambdaEvent<E>| {
    future::ready(handle_event(adapter, event).map_err(lambda_runtime::Error::from))
  }))
  .await
  .expect("Lambda run loop should never exit")
}

/// Serve a single Lambda event, for callers that drive the Lambda runtime themselves.
///
/// Failed invocations are logged before the error is returned.
pub fn handle_event<E, H>(
  adapter: &Adapter<H>,
  event: LambdaEvent<E>,
) -> Result<OutboundEnvelope, AdapterError>
where
  E: Into<InboundEnvelope>,
  H: Handler,
{
  let LambdaEvent { payload, context } = event;
  trace!("Lambda context: {context:#?}");

  adapter
    .run(payload.into(), InvocationContext::from(&context))
    .map_err(|err| {
      error!(
        "Request {} failed: {}",
        context.request_id,
        format_error(
          &err,
          Some(&format!("AdapterError::{}", err.name())),
          err.backtrace()
        ),
      );
      err
    })
}
