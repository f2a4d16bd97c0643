/// Last observed dimensions of the host display area, in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Converts a size in CSS (logical) pixels to physical pixels.
    ///
    /// Negative, non-finite or non-positive inputs count as zero; results
    /// saturate at `u32::MAX`.
    pub fn from_logical(width: f64, height: f64, scale_factor: f64) -> Self {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 { scale_factor } else { 1.0 };
        let physical = |v: f64| {
            if v.is_finite() && v > 0.0 {
                (v * scale).round().min(f64::from(u32::MAX)) as u32
            } else {
                0
            }
        };
        Self::new(physical(width), physical(height))
    }
}

/// Current dimensions of the drawing surface and its dependent projection.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Componentwise comparison against a viewport.
    #[inline]
    pub fn matches(self, viewport: ViewportSize) -> bool {
        self.width == viewport.width && self.height == viewport.height
    }

    /// Number of RGBA bytes needed to cover the surface.
    #[inline]
    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl From<ViewportSize> for SurfaceSize {
    fn from(v: ViewportSize) -> Self {
        Self::new(v.width, v.height)
    }
}

impl From<SurfaceSize> for ViewportSize {
    fn from(s: SurfaceSize) -> Self {
        Self::new(s.width, s.height)
    }
}
