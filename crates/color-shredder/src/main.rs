#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native_main::run()
}

// The browser build starts through the exported `start` function.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native_main {
    use anyhow::{ensure, Result};
    use clap::Parser;

    use color_shredder::native::GpuShredder;
    use color_shredder::{Shredder, DEFAULT_SIZE};
    use shredder_engine::core::LoopConfig;
    use shredder_engine::device::GpuInit;
    use shredder_engine::logging::{init_logging, LoggingConfig};
    use shredder_engine::window::{LogicalSize, Runtime, RuntimeConfig};

    #[derive(Parser, Debug)]
    #[command(name = "color-shredder", about = "Full-window RGBA noise, frame paced")]
    pub struct Cli {
        /// Target frame rate
        #[arg(long, default_value_t = LoopConfig::DEFAULT_FRAME_RATE)]
        pub fps: f64,

        /// Run a frame on every display refresh
        #[arg(long, conflicts_with = "fps")]
        pub unpaced: bool,

        /// Initial window width (logical pixels)
        #[arg(long, default_value_t = DEFAULT_SIZE.width)]
        pub width: u32,

        /// Initial window height (logical pixels)
        #[arg(long, default_value_t = DEFAULT_SIZE.height)]
        pub height: u32,

        /// Window title
        #[arg(long, default_value = "color shredder")]
        pub title: String,

        /// Log filter in env_logger syntax; overrides RUST_LOG
        #[arg(long)]
        pub log: Option<String>,

        /// Present without waiting for vertical sync
        #[arg(long)]
        pub no_vsync: bool,

        /// Seed for a reproducible noise sequence
        #[arg(long)]
        pub seed: Option<u64>,
    }

    impl Cli {
        pub fn runtime_config(&self) -> Result<RuntimeConfig> {
            ensure!(self.width > 0 && self.height > 0, "window size must be non-zero");

            let loop_config = if self.unpaced {
                LoopConfig::unpaced()
            } else {
                LoopConfig::with_frame_rate(self.fps)
            };
            // Reject bad rates before a window opens.
            loop_config.budget()?;

            let mut gpu = GpuInit::default();
            if self.no_vsync {
                gpu.present_mode = wgpu::PresentMode::AutoNoVsync;
            }

            Ok(RuntimeConfig {
                title: self.title.clone(),
                initial_size: LogicalSize::new(f64::from(self.width), f64::from(self.height)),
                loop_config,
                gpu,
                ..RuntimeConfig::default()
            })
        }

        pub fn shredder(&self) -> Shredder {
            match self.seed {
                Some(seed) => Shredder::with_seed(seed),
                None => Shredder::new(),
            }
        }
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        init_logging(LoggingConfig {
            env_filter: cli.log.clone(),
            ..LoggingConfig::default()
        });

        let config = cli.runtime_config()?;
        log::info!(
            "color shredder: {}x{} at {}",
            cli.width,
            cli.height,
            if cli.unpaced { "display rate".to_string() } else { format!("{} fps", cli.fps) }
        );

        let shredder = cli.shredder();
        Runtime::run(config, move |gpu, _size| Ok(GpuShredder::new(gpu, shredder)))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> Cli {
            Cli::try_parse_from(std::iter::once("color-shredder").chain(args.iter().copied())).unwrap()
        }

        // ── defaults ──────────────────────────────────────────────────────

        #[test]
        fn defaults_match_original_canvas() {
            let cli = parse(&[]);
            assert_eq!((cli.width, cli.height), (512, 512));
            assert_eq!(cli.fps, 30.0);

            let config = cli.runtime_config().unwrap();
            assert_eq!(config.loop_config, LoopConfig::default());
            assert_eq!(config.gpu.present_mode, wgpu::PresentMode::Fifo);
        }

        // ── flags ─────────────────────────────────────────────────────────

        #[test]
        fn flags_reach_runtime_config() {
            let cli = parse(&["--fps", "60", "--width", "800", "--height", "600", "--title", "x", "--no-vsync"]);
            let config = cli.runtime_config().unwrap();
            assert_eq!(config.title, "x");
            assert_eq!(config.initial_size, LogicalSize::new(800.0, 600.0));
            assert_eq!(config.loop_config, LoopConfig::with_frame_rate(60.0));
            assert_eq!(config.gpu.present_mode, wgpu::PresentMode::AutoNoVsync);
        }

        #[test]
        fn seed_makes_noise_reproducible() {
            let size = DEFAULT_SIZE;
            let mut a = parse(&["--seed", "7"]).shredder();
            let mut b = parse(&["--seed", "7"]).shredder();
            a.shred(0, size);
            b.shred(0, size);
            assert_eq!(a.pixels(), b.pixels());
        }

        #[test]
        fn unpaced_disables_budget() {
            let config = parse(&["--unpaced"]).runtime_config().unwrap();
            assert!(!config.loop_config.paced);
        }

        #[test]
        fn bad_values_rejected() {
            assert!(parse(&["--fps", "0"]).runtime_config().is_err());
            assert!(parse(&["--width", "0"]).runtime_config().is_err());
            assert!(parse(&["--fps", "1e-300"]).runtime_config().is_err());
            assert!(Cli::try_parse_from(["color-shredder", "--fps", "10", "--unpaced"]).is_err());
        }
    }
}
