/// Options for creating the window's GPU context.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format if the adapter offers one.
    pub prefer_srgb: bool,

    /// Swap behavior. `Fifo` waits for vertical sync and is always available.
    pub present_mode: wgpu::PresentMode,

    /// Requested compositing alpha; an unsupported request falls back to the
    /// surface's first mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Copy engine pixels straight into the surface texture when the surface
    /// allows it. When false, or unsupported, frames are shown as a flat
    /// clear of their mean color.
    pub pixel_copy: bool,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint for how many frames may be queued ahead of the display.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            pixel_copy: true,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
