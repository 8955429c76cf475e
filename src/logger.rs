use std::io::Write;

use env_logger::Env;

/// Diagnostics go to stderr as `[timestamp LEVEL] message`. Defaults to `warn`.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init();
}

pub fn log_error(prefix: &str, e: &dyn std::error::Error) {
    log::error!("{}: {}", prefix, e);
}
