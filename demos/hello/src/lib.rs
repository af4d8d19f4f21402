use apigw_http::{BoxError, Request, ResponseWriter, StatusCode};

use std::io::Write;

// 1x1 transparent GIF.
const PIXEL: &[u8] = &[
  0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
  0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00, 0x00, 0x00,
  0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

/// Example handler.
///
/// * `GET /hello` and `GET /hello/{name}` greet the caller in plain text.
/// * `GET /pixel.gif` returns a binary image.
/// * Anything else is `404 Not Found`.
pub fn serve(request: Request, response: &mut dyn ResponseWriter) -> Result<(), BoxError> {
  if request.context().is_expired() {
    response.write_status(StatusCode::GATEWAY_TIMEOUT);
    return Ok(());
  }

  let path = request.url().path.as_str();
  match (request.method(), path) {
    ("GET", "/hello") => greet(response, "world"),
    ("GET", _) if path.starts_with("/hello/") => greet(response, &path["/hello/".len()..]),
    ("GET", "/pixel.gif") => {
      let headers = response.headers_mut();
      headers.set("Content-Type", mime::IMAGE_GIF.as_ref());
      headers.set("Content-Length", PIXEL.len().to_string());
      response.write_all(PIXEL)?;
      Ok(())
    }
    _ => {
      response
        .headers_mut()
        .set("Content-Type", mime::TEXT_PLAIN_UTF_8.as_ref());
      response.write_status(StatusCode::NOT_FOUND);
      writeln!(response, "no route for {} {}", request.method(), request.url())?;
      Ok(())
    }
  }
}

fn greet(response: &mut dyn ResponseWriter, name: &str) -> Result<(), BoxError> {
  let body = format!("Hello, {name}!\n");
  let headers = response.headers_mut();
  headers.set("Content-Type", mime::TEXT_PLAIN_UTF_8.as_ref());
  headers.set("Content-Length", body.len().to_string());
  response.write_status(StatusCode::OK);
  response.write_all(body.as_bytes())?;
  Ok(())
}
