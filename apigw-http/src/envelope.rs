use aws_lambda_events::apigw::ApiGatewayV2httpRequest;
use aws_lambda_events::http::HeaderMap;
use aws_lambda_events::lambda_function_urls::LambdaFunctionUrlRequest;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Request envelope delivered by an Amazon API Gateway HTTP API (payload format 2.0) or a Lambda
/// Function URL.
///
/// Multi-valued request headers arrive already folded into a single comma-separated string, and
/// cookies arrive separately from the headers.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InboundEnvelope {
  /// HTTP method (e.g., `GET`).
  pub method: String,
  /// Request path, exactly as provided by the gateway.
  pub raw_path: String,
  /// Query string without the leading `?`, exactly as provided by the gateway.
  pub raw_query_string: String,
  /// Request headers.
  pub headers: IndexMap<String, String>,
  /// `name=value` cookie pairs.
  pub cookies: Vec<String>,
  /// Request body (base64-encoded if `is_base64_encoded` is `true`).
  pub body: String,
  /// Whether `body` is base64-encoded.
  pub is_base64_encoded: bool,
}

/// Response envelope returned to the gateway.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutboundEnvelope {
  /// HTTP status code.
  pub status_code: u16,
  /// Response headers with exactly one value.
  pub headers: IndexMap<String, String>,
  /// Response headers with more than one value.
  #[serde(skip_serializing_if = "IndexMap::is_empty")]
  pub multi_value_headers: IndexMap<String, Vec<String>>,
  /// Values of every `Set-Cookie` response header, in order.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub cookies: Vec<String>,
  /// Response body (base64-encoded if `is_base64_encoded` is `true`).
  pub body: String,
  /// Whether `body` is base64-encoded.
  pub is_base64_encoded: bool,
}

impl From<ApiGatewayV2httpRequest> for InboundEnvelope {
  fn from(request: ApiGatewayV2httpRequest) -> Self {
    Self {
      method: request.request_context.http.method.as_str().to_owned(),
      raw_path: request.raw_path.unwrap_or_default(),
      raw_query_string: request.raw_query_string.unwrap_or_default(),
      headers: fold_headers(&request.headers),
      cookies: request.cookies.unwrap_or_default(),
      body: request.body.unwrap_or_default(),
      is_base64_encoded: request.is_base64_encoded,
    }
  }
}

impl From<LambdaFunctionUrlRequest> for InboundEnvelope {
  fn from(request: LambdaFunctionUrlRequest) -> Self {
    Self {
      method: request.request_context.http.method.unwrap_or_default(),
      raw_path: request.raw_path.unwrap_or_default(),
      raw_query_string: request.raw_query_string.unwrap_or_default(),
      headers: fold_headers(&request.headers),
      cookies: request.cookies.unwrap_or_default(),
      body: request.body.unwrap_or_default(),
      is_base64_encoded: request.is_base64_encoded,
    }
  }
}

// `http::HeaderMap` may hold repeated values under one name even though the gateway folds them,
// so repeats are joined the same way the gateway would.
fn fold_headers(headers: &HeaderMap) -> IndexMap<String, String> {
  headers
    .keys()
    .map(|name| {
      (
        name.as_str().to_owned(),
        headers
          .get_all(name)
          .iter()
          .map(|value| String::from_utf8_lossy(value.as_bytes()))
          .join(","),
      )
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::{fold_headers, InboundEnvelope, OutboundEnvelope};

  use aws_lambda_events::http::{HeaderMap, HeaderValue};
  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  #[test]
  fn test_fold_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("host", HeaderValue::from_static("example.com"));
    headers.append("accept", HeaderValue::from_static("text/html"));
    headers.append("accept", HeaderValue::from_static("application/json"));

    assert_eq!(
      fold_headers(&headers),
      IndexMap::from([
        ("host".to_string(), "example.com".to_string()),
        ("accept".to_string(), "text/html,application/json".to_string()),
      ])
    );
  }

  #[test]
  fn test_inbound_envelope_defaults() {
    let envelope = serde_json::from_value::<InboundEnvelope>(json!({
      "method": "GET",
      "rawPath": "/hello",
    }))
    .unwrap();

    assert_eq!(
      envelope,
      InboundEnvelope {
        method: "GET".to_string(),
        raw_path: "/hello".to_string(),
        ..Default::default()
      }
    );
  }

  #[test]
  fn test_outbound_envelope_json() {
    let envelope = OutboundEnvelope {
      status_code: 200,
      headers: IndexMap::from([("Content-Type".to_string(), "text/plain".to_string())]),
      body: "hi".to_string(),
      ..Default::default()
    };
    assert_eq!(
      serde_json::to_value(&envelope).unwrap(),
      json!({
        "statusCode": 200,
        "headers": {"Content-Type": "text/plain"},
        "body": "hi",
        "isBase64Encoded": false,
      })
    );

    let envelope = OutboundEnvelope {
      status_code: 302,
      multi_value_headers: IndexMap::from([(
        "Vary".to_string(),
        vec!["Accept".to_string(), "Origin".to_string()],
      )]),
      cookies: vec!["a=1; Path=/".to_string()],
      ..Default::default()
    };
    assert_eq!(
      serde_json::to_value(&envelope).unwrap(),
      json!({
        "statusCode": 302,
        "headers": {},
        "multiValueHeaders": {"Vary": ["Accept", "Origin"]},
        "cookies": ["a=1; Path=/"],
        "body": "",
        "isBase64Encoded": false,
      })
    );
  }
}
