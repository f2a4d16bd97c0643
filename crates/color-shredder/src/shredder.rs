use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shredder_engine::coords::SurfaceSize;

/// Length of one full tint cycle.
const TINT_PERIOD_MS: u64 = 6_000;

/// Lowest channel scale the tint applies.
const TINT_FLOOR: f32 = 0.55;

/// RGBA noise image, regenerated every frame.
///
/// Each texel gets independent random color channels and opaque alpha. The
/// channels are scaled by a tint that cycles slowly with elapsed time, so the
/// noise drifts through hues while the loop runs.
pub struct Shredder {
    rng: StdRng,
    size: SurfaceSize,
    texels: Vec<[u8; 4]>,
}

impl Shredder {
    /// Creates an empty image seeded from the OS.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Creates an empty image with a reproducible noise sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            size: SurfaceSize::default(),
            texels: Vec::new(),
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Tightly packed RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Regenerates the image at `size` for the frame at `elapsed_ms`.
    pub fn shred(&mut self, elapsed_ms: u64, size: SurfaceSize) {
        if size != self.size {
            log::debug!("noise buffer {}x{}", size.width, size.height);
            self.size = size;
            self.texels.resize(size.rgba_len() / 4, [0, 0, 0, 255]);
        }

        let tint = tint_at(elapsed_ms);
        for texel in &mut self.texels {
            let [r, g, b]: [u8; 3] = self.rng.r#gen();
            *texel = [scale(r, tint[0]), scale(g, tint[1]), scale(b, tint[2]), 255];
        }
    }
}

impl Default for Shredder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-channel scale at `elapsed_ms`: three sine waves a third of a turn apart.
fn tint_at(elapsed_ms: u64) -> [f32; 3] {
    let phase = (elapsed_ms % TINT_PERIOD_MS) as f32 / TINT_PERIOD_MS as f32 * std::f32::consts::TAU;
    [0.0f32, 1.0, 2.0].map(|k| {
        let wave = 0.5 + 0.5 * (phase + k * std::f32::consts::TAU / 3.0).sin();
        TINT_FLOOR + (1.0 - TINT_FLOOR) * wave
    })
}

#[inline]
fn scale(channel: u8, factor: f32) -> u8 {
    (f32::from(channel) * factor).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── buffer ────────────────────────────────────────────────────────────

    #[test]
    fn starts_empty() {
        let s = Shredder::with_seed(1);
        assert!(s.size().is_empty());
        assert!(s.pixels().is_empty());
    }

    #[test]
    fn buffer_follows_size() {
        let mut s = Shredder::with_seed(1);
        s.shred(0, SurfaceSize::new(512, 512));
        assert_eq!(s.pixels().len(), 512 * 512 * 4);

        s.shred(33, SurfaceSize::new(800, 600));
        assert_eq!(s.size(), SurfaceSize::new(800, 600));
        assert_eq!(s.pixels().len(), 800 * 600 * 4);

        s.shred(66, SurfaceSize::new(0, 600));
        assert!(s.pixels().is_empty());
    }

    #[test]
    fn alpha_is_opaque() {
        let mut s = Shredder::with_seed(7);
        s.shred(1234, SurfaceSize::new(16, 9));
        assert!(s.pixels().chunks_exact(4).all(|px| px[3] == 255));
    }

    // ── noise ─────────────────────────────────────────────────────────────

    #[test]
    fn same_seed_same_noise() {
        let mut a = Shredder::with_seed(42);
        let mut b = Shredder::with_seed(42);
        a.shred(100, SurfaceSize::new(8, 8));
        b.shred(100, SurfaceSize::new(8, 8));
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn every_frame_is_new_noise() {
        let mut s = Shredder::with_seed(42);
        s.shred(0, SurfaceSize::new(8, 8));
        let first = s.pixels().to_vec();
        s.shred(0, SurfaceSize::new(8, 8));
        assert_ne!(first, s.pixels());
    }

    // ── tint ──────────────────────────────────────────────────────────────

    #[test]
    fn tint_stays_in_range() {
        for ms in (0..TINT_PERIOD_MS * 2).step_by(97) {
            for f in tint_at(ms) {
                assert!((TINT_FLOOR - 1e-4..=1.0 + 1e-4).contains(&f), "{ms}ms -> {f}");
            }
        }
    }

    #[test]
    fn tint_cycles() {
        assert_eq!(tint_at(250), tint_at(250 + TINT_PERIOD_MS));
        assert_ne!(tint_at(0), tint_at(TINT_PERIOD_MS / 3));
    }

    #[test]
    fn scale_saturates() {
        assert_eq!(scale(255, 1.0), 255);
        assert_eq!(scale(200, 0.5), 100);
        assert_eq!(scale(0, 0.8), 0);
    }
}
