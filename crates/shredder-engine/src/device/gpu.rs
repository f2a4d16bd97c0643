use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::window::Window;

use crate::coords::SurfaceSize;
use crate::error::ResizeError;
use crate::surface::ResizeTarget;

use super::surface::{self, ResizePlan};
use super::{GpuFrame, GpuInit, PresentError, SurfaceErrorAction};

/// Owns wgpu core objects and the surface configuration.
///
/// This type is the low-level rendering context:
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - acquires frames and presents pixel buffers
pub struct Gpu {
    /// Surface bound to the window. Holding an `Arc<Window>` keeps it `'static`.
    surface: wgpu::Surface<'static>,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: SurfaceSize,

    /// Surface textures accept direct 4-byte texel copies.
    pixel_copy: bool,

    /// Surface stores BGRA; RGBA input is swizzled into `staging` first.
    swap_red_blue: bool,
    staging: Vec<u8>,
}

/// GPU context shared by the render engine (drawing) and the host (resizing).
pub type SharedGpu = Rc<RefCell<Gpu>>;

impl Gpu {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let inner = window.inner_size();
        let size = SurfaceSize::new(inner.width, inner.height);

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            pixel_copy: want_pixel_copy,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("shredder-engine device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .context("no supported surface formats")?;

        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);
        let pixel_copy = want_pixel_copy && surface::supports_pixel_copy(&surface_caps, format);
        let swap_red_blue = surface::is_bgra(format);

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if pixel_copy {
            usage |= wgpu::TextureUsages::COPY_DST;
        } else if want_pixel_copy {
            log::warn!("surface format {format:?} does not accept pixel copies; presenting flat color");
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        if !size.is_empty() {
            surface.configure(&device, &config);
        }

        log::info!(
            "gpu ready: {} ({:?}), surface {format:?} {}x{}",
            adapter.get_info().name,
            adapter.get_info().backend,
            size.width,
            size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            pixel_copy,
            swap_red_blue,
            staging: Vec::new(),
        })
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Reconfigures the surface for `new_size`.
    ///
    /// A zero-area size is recorded but leaves the old configuration in place
    /// until the surface becomes visible again. Sizes beyond the device's
    /// texture limit are refused and leave everything unchanged.
    pub fn resize(&mut self, new_size: SurfaceSize) -> std::result::Result<(), ResizeError> {
        let max = self.device.limits().max_texture_dimension_2d;

        match surface::plan_resize(new_size, max)? {
            ResizePlan::Configure => {
                self.config.width = new_size.width;
                self.config.height = new_size.height;
                self.surface.configure(&self.device, &self.config);
            }
            ResizePlan::Defer => log::info!("surface hidden; configuration deferred"),
        }

        self.size = new_size;
        Ok(())
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("shredder frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands for the given frame and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Recovers from a failed texture acquisition where possible.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = surface::surface_error_action(&err);
        if action == SurfaceErrorAction::Reconfigured && !self.size.is_empty() {
            self.surface.configure(&self.device, &self.config);
        }
        log::debug!("surface error {err:?}: {action:?}");
        action
    }

    /// Presents a tightly packed RGBA8 image covering the whole surface.
    ///
    /// Without pixel-copy support the image's mean color is presented instead.
    pub fn present_rgba(&mut self, pixels: &[u8], size: SurfaceSize) -> std::result::Result<(), PresentError> {
        if size.is_empty() || self.size.is_empty() {
            return Err(PresentError::ZeroSized);
        }
        if pixels.len() != size.rgba_len() || size != self.size {
            return Err(PresentError::BufferSize { got: pixels.len(), size: self.size });
        }

        let mut frame = match self.begin_frame() {
            Ok(f) => f,
            Err(err) => return Err(PresentError::Surface(self.handle_surface_error(err))),
        };

        if self.pixel_copy {
            let texels = if self.swap_red_blue {
                swizzle_rgba_to_bgra(pixels, &mut self.staging);
                self.staging.as_slice()
            } else {
                pixels
            };

            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &frame.surface_texture.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                texels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(size.width * 4),
                    rows_per_image: Some(size.height),
                },
                wgpu::Extent3d {
                    width: size.width,
                    height: size.height,
                    depth_or_array_layers: 1,
                },
            );
        } else {
            let [r, g, b, a] = mean_color(pixels);
            // Clear pass; dropped before the encoder is finished in submit().
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shredder clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view:           &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load:  wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes:         None,
                occlusion_query_set:      None,
                multiview_mask:           None,
            });
        }

        self.submit(frame);
        Ok(())
    }
}

impl ResizeTarget for SharedGpu {
    fn apply_size(&mut self, size: SurfaceSize) -> std::result::Result<(), ResizeError> {
        let mut gpu = self
            .try_borrow_mut()
            .map_err(|_| ResizeError::new(size, "gpu surface is busy"))?;
        gpu.resize(size)
    }
}

fn swizzle_rgba_to_bgra(rgba: &[u8], out: &mut Vec<u8>) {
    out.clear();
    out.extend(rgba.chunks_exact(4).flat_map(|px| [px[2], px[1], px[0], px[3]]));
}

/// Average of an RGBA8 buffer, as normalized channels.
fn mean_color(pixels: &[u8]) -> [f64; 4] {
    let texels = (pixels.len() / 4).max(1) as f64;
    let mut sum = [0u64; 4];
    for px in pixels.chunks_exact(4) {
        for (acc, &c) in sum.iter_mut().zip(px) {
            *acc += u64::from(c);
        }
    }
    sum.map(|s| s as f64 / texels / 255.0)
}
