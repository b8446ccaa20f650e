/// Install the `env_logger` backend.
///
/// Defaults to `info`; `RUST_LOG` overrides it.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    // A second call (tests, embedding) keeps the first logger.
    let _ = env_logger::Builder::from_env(env).try_init();
}
