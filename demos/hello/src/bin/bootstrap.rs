use apigw_http::{handler_fn, run_lambda, Adapter};
use env_logger::Env;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
  // TIP: Use the `log4rs` crate for more fine-grained control over logging.
  env_logger::init_from_env(Env::default().filter_or("RUST_LOG", "info"));

  let adapter = Adapter::builder()
    .handler(handler_fn(hello::serve))
    .build()?;

  run_lambda(&adapter).await;
  Ok(())
}
