//! Handlers exercised by the integration tests below.

use apigw_http::header::{COOKIE, SET_COOKIE};
use apigw_http::{BoxError, Request, ResponseWriter, StatusCode};
use serde_json::json;

use std::io::Read;

/// Respond with a JSON description of the request as the handler observed it.
pub fn inspect(mut request: Request, response: &mut dyn ResponseWriter) -> Result<(), BoxError> {
  let mut body = String::new();
  request.body_mut().read_to_string(&mut body)?;

  let description = json!({
    "method": request.method(),
    "url": request.url().to_string(),
    "version": format!("{:?}", request.version()),
    "host": request.host(),
    "cookies": request.headers().get_all(COOKIE),
    "cookieHeader": request.cookie_header(),
    "header2": request.headers().get("Header2"),
    "contentLength": request.content_length(),
    "requestId": request.context().request_id,
    "body": body,
  });

  response
    .headers_mut()
    .set("Content-Type", "application/json");
  response.write_status(StatusCode::OK);
  serde_json::to_writer(&mut *response, &description)?;
  Ok(())
}

/// Store the uploaded bytes and respond with them unchanged.
pub fn upload(mut request: Request, response: &mut dyn ResponseWriter) -> Result<(), BoxError> {
  let mut body = Vec::new();
  request.body_mut().read_to_end(&mut body)?;

  let content_type = request
    .headers()
    .get("Content-Type")
    .unwrap_or("application/octet-stream")
    .to_owned();
  let headers = response.headers_mut();
  headers.set("Content-Type", content_type);
  headers.set("Content-Length", body.len().to_string());
  response.write_status(StatusCode::CREATED);
  response.write_all(&body)?;
  Ok(())
}

/// Start a session, setting several cookies and a multi-valued `Vary` header.
pub fn login(_request: Request, response: &mut dyn ResponseWriter) -> Result<(), BoxError> {
  let headers = response.headers_mut();
  headers.append(SET_COOKIE, "session=abc123; Path=/; HttpOnly");
  headers.append(
    SET_COOKIE,
    "seen=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Path=/",
  );
  headers.append("Vary", "Accept-Encoding");
  headers.append("Vary", "Cookie");
  headers.set("Location", "/home");
  response.write_status(StatusCode::SEE_OTHER);
  Ok(())
}
