//! Browser host.
//!
//! Drives a `RenderLoop` from `requestAnimationFrame`, measures time with
//! `performance.now()`, follows the window's inner size and resizes the
//! canvas element to match.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, Performance, Window};

use crate::coords::{SurfaceSize, ViewportSize};
use crate::core::{HostCtx, LoopConfig, RenderLoop, TickOutcome};
use crate::engine::RenderEngine;
use crate::error::{ClockError, EngineError, ResizeError, ScheduleError, ViewportQueryError};
use crate::schedule::{CancelToken, Scheduler};
use crate::surface::ResizeTarget;
use crate::time::{Clock, Monotonic, Timestamp};
use crate::viewport::ViewportMonitor;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn browser_window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// `performance.now()` clock.
pub struct PerformanceClock {
    performance: Option<Performance>,
}

impl PerformanceClock {
    pub fn new(window: &Window) -> Self {
        Self {
            performance: window.performance(),
        }
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        self.performance
            .as_ref()
            .map(|p| Timestamp::from_millis_f64(p.now()))
            .ok_or_else(|| ClockError::new("window.performance is unavailable"))
    }
}

/// Window inner size, converted from CSS to physical pixels with the
/// device pixel ratio so the canvas backing store matches the display.
pub struct BrowserViewport {
    window: Window,
}

impl BrowserViewport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn css_dimension(value: Result<JsValue, JsValue>, name: &str) -> Result<f64, ViewportQueryError> {
        value
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| ViewportQueryError::new(format!("window.{name} is not a number")))
    }
}

impl ViewportMonitor for BrowserViewport {
    fn current(&self) -> Result<ViewportSize, ViewportQueryError> {
        let width = Self::css_dimension(self.window.inner_width(), "innerWidth")?;
        let height = Self::css_dimension(self.window.inner_height(), "innerHeight")?;
        Ok(ViewportSize::from_logical(width, height, self.window.device_pixel_ratio()))
    }
}

/// Canvas element whose backing store follows the viewport.
///
/// The backing store is sized in physical pixels; the element's CSS size is
/// set back to logical pixels so it still covers exactly the viewport.
pub struct CanvasSurface {
    window: Window,
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Self {
        Self { window, canvas }
    }

    fn set_css_size(&self, size: SurfaceSize) -> Result<(), JsValue> {
        let ratio = self.window.device_pixel_ratio();
        let ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", f64::from(size.width) / ratio))?;
        style.set_property("height", &format!("{}px", f64::from(size.height) / ratio))
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width(), self.canvas.height())
    }
}

impl ResizeTarget for CanvasSurface {
    fn apply_size(&mut self, size: SurfaceSize) -> Result<(), ResizeError> {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);

        // The browser may clamp oversized canvases.
        if self.size() != size {
            return Err(ResizeError::new(size, "canvas refused the requested size"));
        }
        self.set_css_size(size)
            .map_err(|e| ResizeError::new(size, format!("cannot set canvas CSS size: {e:?}")))
    }
}

/// Schedules the stored frame callback with `requestAnimationFrame`.
struct AnimationFrameScheduler {
    window: Window,
    callback: FrameCallback,
}

impl Scheduler for AnimationFrameScheduler {
    fn schedule_next(&mut self) -> Result<(), ScheduleError> {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return Err(ScheduleError("frame callback not installed".into()));
        };

        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(|_| ())
            .map_err(|e| ScheduleError(format!("{e:?}")))
    }
}

struct WebHost<E: RenderEngine> {
    viewport: BrowserViewport,
    canvas: CanvasSurface,
    scheduler: AnimationFrameScheduler,
    render_loop: RenderLoop<E, Monotonic<PerformanceClock>>,
}

/// Starts a render loop on `canvas` and returns its cancel token.
///
/// `make_engine` receives the canvas and its current size. The loop lives
/// until the page is torn down or the token is cancelled.
pub fn start<E, F>(canvas: HtmlCanvasElement, config: &LoopConfig, make_engine: F) -> Result<CancelToken, JsValue>
where
    E: RenderEngine + 'static,
    F: FnOnce(&HtmlCanvasElement, SurfaceSize) -> Result<E, EngineError>,
{
    let window = browser_window()?;
    let surface = CanvasSurface::new(window.clone(), canvas);
    let size = surface.size();

    let engine = make_engine(&surface.canvas, size).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let clock = Monotonic::new(PerformanceClock::new(&window));
    let render_loop = RenderLoop::new(config, engine, clock, size)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let token = render_loop.cancel_token();

    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let host = Rc::new(RefCell::new(WebHost {
        viewport: BrowserViewport::new(window.clone()),
        canvas: surface,
        scheduler: AnimationFrameScheduler {
            window: window.clone(),
            callback: callback.clone(),
        },
        render_loop,
    }));

    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        let mut host = host.borrow_mut();
        let WebHost {
            viewport,
            canvas,
            scheduler,
            render_loop,
        } = &mut *host;

        let mut ctx = HostCtx::new(&*viewport, canvas, scheduler);
        let outcome = render_loop.tick_at(Timestamp::from_millis_f64(timestamp), &mut ctx);

        match outcome {
            TickOutcome::Halted(err) => log::error!("render loop halted: {err}"),
            TickOutcome::Cancelled => log::info!("render loop cancelled"),
            _ => {}
        }
    }) as Box<dyn FnMut(f64)>));

    // First tick.
    AnimationFrameScheduler {
        window,
        callback,
    }
    .schedule_next()
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(token)
}
