use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "shredder_engine=debug,wgpu=warn"). In the browser only a bare level name
/// is understood.
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    #[cfg(not(target_arch = "wasm32"))]
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            #[cfg(not(target_arch = "wasm32"))]
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
            // wgpu is chatty at info.
            builder.filter_module("wgpu_core", log::LevelFilter::Warn);
            builder.filter_module("wgpu_hal", log::LevelFilter::Warn);
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}

/// Initializes the browser console logger and panic hook once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let level = config
            .env_filter
            .as_deref()
            .and_then(|f| f.parse::<log::Level>().ok())
            .unwrap_or(log::Level::Info);

        if console_log::init_with_level(level).is_ok() {
            log::debug!("logging initialized");
        }
    });
}
