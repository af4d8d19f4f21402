#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

// These are documented public exports since handler signatures depend on them.
pub use http::{StatusCode, Version};
pub use lambda_runtime::{Context as LambdaContext, LambdaEvent};

mod adapter;

pub use adapter::{Adapter, AdapterBuilder};

mod encoding;

mod envelope;

pub use envelope::{InboundEnvelope, OutboundEnvelope};

/// Error handling.
pub mod error;

pub use error::AdapterError;

mod handler;

pub use handler::{handler_fn, BoxError, Handler, HandlerFn};

/// Case-insensitive HTTP header multimap.
pub mod header;

pub use header::HeaderMultimap;

mod request;

pub use request::{decode_request, InvocationContext, Request, RequestBody, Url};

mod response;

pub use response::{encode_response, CapturedResponse, ResponseRecorder, ResponseWriter};

mod runtime;

pub use runtime::{handle_event, run_function_url_lambda, run_lambda};
