//! Surface capability decisions, kept free of live GPU objects.

use crate::coords::SurfaceSize;
use crate::error::ResizeError;

use super::SurfaceErrorAction;

/// Picks the surface format.
///
/// Formats that take RGBA bytes unchanged rank above BGRA ones, and with
/// `prefer_srgb` the sRGB variants rank above both. Anything else the
/// surface offers is a last resort.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    use wgpu::TextureFormat as F;

    let rank = |f: &F| match (f, prefer_srgb) {
        (F::Rgba8UnormSrgb, true) | (F::Rgba8Unorm, false) => 0,
        (F::Bgra8UnormSrgb, true) | (F::Bgra8Unorm, false) => 1,
        (F::Rgba8Unorm, true) | (F::Rgba8UnormSrgb, false) => 2,
        (F::Bgra8Unorm, true) | (F::Bgra8UnormSrgb, false) => 3,
        _ => 4,
    };

    // min_by_key keeps the first of equal ranks, i.e. the surface's own order.
    caps.formats.iter().copied().min_by_key(rank)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    match requested {
        Some(mode) if caps.alpha_modes.contains(&mode) => mode,
        _ => caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
    }
}

/// Whether RGBA8 pixel rows can be copied straight into surface textures.
pub(crate) fn supports_pixel_copy(caps: &wgpu::SurfaceCapabilities, format: wgpu::TextureFormat) -> bool {
    caps.usages.contains(wgpu::TextureUsages::COPY_DST) && format.block_copy_size(None) == Some(4)
}

/// Whether `format` stores blue in the first byte of a texel.
pub(crate) fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// What a resize does to the surface configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ResizePlan {
    /// Reconfigure at the new size.
    Configure,
    /// Hidden (zero area); wgpu cannot configure it, so wait for a real size.
    Defer,
}

/// Validates a requested surface size against the device's texture limit.
pub(crate) fn plan_resize(size: SurfaceSize, max_dimension: u32) -> Result<ResizePlan, ResizeError> {
    if size.is_empty() {
        return Ok(ResizePlan::Defer);
    }
    if size.width > max_dimension || size.height > max_dimension {
        return Err(ResizeError::new(
            size,
            format!("device textures are limited to {max_dimension} pixels per side"),
        ));
    }
    Ok(ResizePlan::Configure)
}

/// Classifies a failure to acquire the next surface texture.
pub(crate) fn surface_error_action(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::TextureFormat as F;

    fn caps(formats: Vec<F>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            ..Default::default()
        }
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn prefers_srgb_when_offered() {
        let c = caps(vec![F::Bgra8Unorm, F::Bgra8UnormSrgb]);
        assert_eq!(choose_surface_format(&c, true), Some(F::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn prefers_rgba_byte_order() {
        let c = caps(vec![F::Bgra8UnormSrgb, F::Rgba8UnormSrgb, F::Rgba8Unorm]);
        assert_eq!(choose_surface_format(&c, true), Some(F::Rgba8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(F::Rgba8Unorm));
    }

    #[test]
    fn unknown_formats_keep_surface_order() {
        let c = caps(vec![F::Rgba16Float, F::Rgb10a2Unorm]);
        assert_eq!(choose_surface_format(&c, true), Some(F::Rgba16Float));
    }

    #[test]
    fn no_formats_no_choice() {
        assert_eq!(choose_surface_format(&caps(vec![]), true), None);
    }

    #[test]
    fn bgra_detection() {
        assert!(is_bgra(F::Bgra8Unorm));
        assert!(is_bgra(F::Bgra8UnormSrgb));
        assert!(!is_bgra(F::Rgba8UnormSrgb));
    }

    // ── alpha / copy ──────────────────────────────────────────────────────

    #[test]
    fn unsupported_alpha_falls_back() {
        let c = caps(vec![F::Bgra8Unorm]);
        let mode = choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied));
        assert_eq!(mode, wgpu::CompositeAlphaMode::Opaque);
        assert_eq!(choose_alpha_mode(&c, None), wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn pixel_copy_needs_copy_dst_and_8bit_texels() {
        let c = caps(vec![F::Bgra8Unorm]);
        assert!(supports_pixel_copy(&c, F::Bgra8Unorm));
        assert!(!supports_pixel_copy(&c, F::Rgba16Float));

        let no_copy = wgpu::SurfaceCapabilities {
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
            ..c
        };
        assert!(!supports_pixel_copy(&no_copy, F::Bgra8Unorm));
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn zero_area_is_deferred() {
        assert_eq!(plan_resize(SurfaceSize::new(0, 0), 8192).unwrap(), ResizePlan::Defer);
        assert_eq!(plan_resize(SurfaceSize::new(640, 0), 8192).unwrap(), ResizePlan::Defer);
    }

    #[test]
    fn sizes_within_limit_configure() {
        assert_eq!(plan_resize(SurfaceSize::new(8192, 1), 8192).unwrap(), ResizePlan::Configure);
    }

    #[test]
    fn oversized_surface_rejected() {
        let err = plan_resize(SurfaceSize::new(8193, 600), 8192).unwrap_err();
        assert_eq!(err.requested, SurfaceSize::new(8193, 600));
        assert!(plan_resize(SurfaceSize::new(600, 10_000), 8192).is_err());
    }

    // ── surface errors ────────────────────────────────────────────────────

    #[test]
    fn surface_errors_classified() {
        assert_eq!(surface_error_action(&wgpu::SurfaceError::Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(surface_error_action(&wgpu::SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(surface_error_action(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(surface_error_action(&wgpu::SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }
}
