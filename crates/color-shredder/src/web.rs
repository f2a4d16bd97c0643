use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use shredder_engine::coords::SurfaceSize;
use shredder_engine::core::LoopConfig;
use shredder_engine::engine::RenderEngine;
use shredder_engine::error::EngineError;
use shredder_engine::logging::{init_logging, LoggingConfig};
use shredder_engine::schedule::CancelToken;

use crate::{Shredder, DEFAULT_SIZE};

/// Noise engine drawing into a 2D canvas context.
pub struct CanvasShredder {
    shredder: Shredder,
    context: CanvasRenderingContext2d,
}

impl CanvasShredder {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Self {
            shredder: Shredder::new(),
            context,
        }
    }
}

impl RenderEngine for CanvasShredder {
    fn update(&mut self, elapsed_ms: u64, height: u32, width: u32) -> Result<(), EngineError> {
        self.shredder.shred(elapsed_ms, SurfaceSize::new(width, height));
        Ok(())
    }

    fn render(&mut self) -> Result<(), EngineError> {
        let size = self.shredder.size();
        if size.is_empty() {
            return Ok(());
        }

        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(self.shredder.pixels()), size.width, size.height)
            .map_err(|e| EngineError::msg(format!("ImageData rejected noise buffer: {e:?}")))?;
        self.context
            .put_image_data(&image, 0.0, 0.0)
            .map_err(|e| EngineError::msg(format!("putImageData failed: {e:?}")))
    }
}

/// Running animation; dropping it leaves the loop running.
#[wasm_bindgen]
pub struct ShredderHandle {
    cancel: CancelToken,
}

#[wasm_bindgen]
impl ShredderHandle {
    /// Stops the loop before its next frame.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

/// Starts shredding on the canvas with id `canvas_id`.
///
/// `fps` defaults to 30 when omitted.
#[wasm_bindgen]
pub fn start(canvas_id: &str, fps: Option<f64>) -> Result<ShredderHandle, JsValue> {
    init_logging(LoggingConfig::default());

    let canvas: HtmlCanvasElement = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(canvas_id))
        .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
        .dyn_into()?;

    if canvas.width() == 0 || canvas.height() == 0 {
        canvas.set_width(DEFAULT_SIZE.width);
        canvas.set_height(DEFAULT_SIZE.height);
    }

    let config = fps.map(LoopConfig::with_frame_rate).unwrap_or_default();
    let cancel = shredder_engine::web::start(canvas, &config, |canvas, size| {
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into().ok())
            .ok_or_else(|| EngineError::msg("canvas has no 2d context"))?;

        log::info!("color shredder on '{}' at {}x{}", canvas.id(), size.width, size.height);
        Ok(CanvasShredder::new(context))
    })?;

    Ok(ShredderHandle { cancel })
}
