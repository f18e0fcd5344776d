/// Initialize the process-wide logger.
///
/// Honors `RUST_LOG`; defaults to `info` so the pipeline progress lines are
/// visible without configuration. Logs go to stderr, keeping stdout free for
/// the `reconcile` CSV output.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
}
