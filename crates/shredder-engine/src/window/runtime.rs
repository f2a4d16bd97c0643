use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::{SurfaceSize, ViewportSize};
use crate::core::{HostCtx, LoopConfig, RenderLoop, TickOutcome};
use crate::device::{Gpu, GpuInit, SharedGpu};
use crate::engine::RenderEngine;
use crate::error::ScheduleError;
use crate::schedule::Scheduler;
use crate::time::{Monotonic, SystemClock};
use crate::viewport::SharedViewport;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub loop_config: LoopConfig,
    pub gpu: GpuInit,

    /// Tick rate used when the monitor does not report its refresh rate.
    pub fallback_refresh_hz: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "color shredder".to_string(),
            initial_size: LogicalSize::new(512.0, 512.0),
            loop_config: LoopConfig::default(),
            gpu: GpuInit::default(),
            fallback_refresh_hz: 60.0,
        }
    }
}

/// Entry point for the native host.
pub struct Runtime;

impl Runtime {
    /// Opens a window and drives `RenderLoop` from its redraw callbacks until
    /// the window closes.
    ///
    /// `make_engine` runs once the GPU surface exists and receives the shared
    /// GPU context plus the initial surface size.
    pub fn run<E, F>(config: RuntimeConfig, make_engine: F) -> Result<()>
    where
        E: RenderEngine + 'static,
        F: FnOnce(SharedGpu, SurfaceSize) -> Result<E> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState::new(config, make_engine);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Turns `schedule_next` into a redraw at the next display refresh.
///
/// At most one tick is outstanding; the deadline is consumed when the redraw
/// is delivered.
#[derive(Debug)]
struct RefreshScheduler {
    interval: Duration,
    deadline: Option<Instant>,
}

impl RefreshScheduler {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }
}

impl Scheduler for RefreshScheduler {
    fn schedule_next(&mut self) -> std::result::Result<(), ScheduleError> {
        if self.deadline.is_some() {
            return Err(ScheduleError("a tick is already pending".into()));
        }
        self.deadline = Some(Instant::now() + self.interval);
        Ok(())
    }
}

/// Everything that exists once the window is up.
struct Host<E: RenderEngine> {
    window: Arc<Window>,
    gpu: SharedGpu,
    viewport: SharedViewport,
    scheduler: RefreshScheduler,
    render_loop: RenderLoop<E, Monotonic<SystemClock>>,
}

struct HostState<E, F>
where
    E: RenderEngine,
{
    config: RuntimeConfig,
    make_engine: Option<F>,
    host: Option<Host<E>>,
    fatal: Option<anyhow::Error>,
}

impl<E, F> HostState<E, F>
where
    E: RenderEngine + 'static,
    F: FnOnce(SharedGpu, SurfaceSize) -> Result<E> + 'static,
{
    fn new(config: RuntimeConfig, make_engine: F) -> Self {
        Self {
            config,
            make_engine: Some(make_engine),
            host: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn create_host(&mut self, event_loop: &ActiveEventLoop) -> Result<Host<E>> {
        let make_engine = self
            .make_engine
            .take()
            .ok_or_else(|| anyhow!("render engine already constructed"))?;

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(Gpu::new(window.clone(), self.config.gpu.clone()))
            .context("GPU initialization failed for window")?;
        let size = gpu.size();
        let gpu: SharedGpu = std::rc::Rc::new(std::cell::RefCell::new(gpu));

        let engine = make_engine(gpu.clone(), size).context("failed to construct render engine")?;
        let render_loop = RenderLoop::new(
            &self.config.loop_config,
            engine,
            Monotonic::new(SystemClock::new()),
            size,
        )
        .context("failed to start render loop")?;

        let interval = refresh_interval(&window, self.config.fallback_refresh_hz);
        log::debug!("display refresh interval {interval:?}");

        Ok(Host {
            window,
            gpu,
            viewport: SharedViewport::new(size.into()),
            scheduler: RefreshScheduler::new(interval),
            render_loop,
        })
    }
}

impl<E, F> ApplicationHandler for HostState<E, F>
where
    E: RenderEngine + 'static,
    F: FnOnce(SharedGpu, SurfaceSize) -> Result<E> + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }

        match self.create_host(event_loop) {
            Ok(host) => {
                // First tick.
                host.window.request_redraw();
                self.host = Some(host);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(host) = self.host.as_ref() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        match host.scheduler.deadline {
            Some(deadline) if deadline <= Instant::now() => {
                host.window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(host) = self.host.as_mut() else {
            return;
        };
        if host.window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                host.render_loop.cancel_token().cancel();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                host.viewport.set(viewport_of(new_size));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                host.viewport.set(viewport_of(host.window.inner_size()));
            }

            WindowEvent::RedrawRequested => {
                let Host {
                    gpu,
                    viewport,
                    scheduler,
                    render_loop,
                    ..
                } = host;

                // This redraw is the pending tick, or an unsolicited one from the OS.
                scheduler.deadline = None;

                let mut surface = gpu.clone();
                let mut ctx = HostCtx::new(&*viewport, &mut surface, scheduler);
                let outcome = render_loop.tick(&mut ctx);

                match outcome {
                    TickOutcome::Halted(err) => {
                        let err = anyhow::Error::new(err).context("render loop halted");
                        self.fail(event_loop, err);
                    }
                    TickOutcome::Cancelled => event_loop.exit(),
                    _ => {}
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(host) = self.host.take() {
            let stats = host.render_loop.stats();
            log::info!(
                "render loop stopped after {} ticks: {} frames, {} skipped, {} resizes, {} dropped",
                stats.ticks,
                stats.frames,
                stats.skipped,
                stats.resizes,
                stats.engine_failures
            );
        }
    }
}

fn viewport_of(size: PhysicalSize<u32>) -> ViewportSize {
    ViewportSize::new(size.width, size.height)
}

/// One display refresh, from the window's monitor when it reports a rate.
fn refresh_interval(window: &Window, fallback_hz: f64) -> Duration {
    let millihertz = window
        .current_monitor()
        .and_then(|m| m.refresh_rate_millihertz())
        .filter(|&mhz| mhz > 0);

    match millihertz {
        Some(mhz) => Duration::from_secs_f64(1000.0 / f64::from(mhz)),
        None => Duration::from_secs_f64(1.0 / fallback_hz.max(1.0)),
    }
}
