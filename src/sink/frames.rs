use super::{GenerationSink, SinkError};
use crate::grid::Grid;
use std::{
    fs,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

pub const PLOTS_DIR: &str = "plots";
const ALIVE_LUMA: u8 = 255;
const DEAD_LUMA: u8 = 0;

/// Rasterizes every generation into a grayscale PNG frame
///
/// Frames are named `state_NNNNNN.png` after their generation, so they sort
/// in playback order.
pub struct FrameRenderer {
    dir: PathBuf,
    scale: u32,
}

impl FrameRenderer {
    /// Prepares an empty `plots` directory inside `out_dir`
    ///
    /// Frames left over from an earlier run are removed.
    pub fn create<P: AsRef<Path>>(out_dir: P, scale: u32) -> io::Result<Self> {
        let dir = out_dir.as_ref().join(PLOTS_DIR);
        match fs::remove_dir_all(&dir) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }
        fs::create_dir_all(&dir)?;
        log::info!("writing frames to {}", dir.display());
        Ok(Self {
            dir,
            scale: scale.max(1),
        })
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frame_path(&self, generation: usize) -> PathBuf {
        self.dir.join(format!("state_{:06}.png", generation))
    }

    /// Pixel dimensions `(width, height)` of a frame for `grid`
    pub fn frame_size(&self, grid: &Grid) -> Result<(u32, u32), SinkError> {
        frame_dimensions(grid.rows(), grid.columns(), self.scale).ok_or(
            SinkError::FrameTooLarge {
                rows: grid.rows(),
                columns: grid.columns(),
                scale: self.scale,
            },
        )
    }

    /// Expands every cell into a `scale x scale` block of 8-bit luma pixels
    fn rasterize(&self, grid: &Grid) -> Result<Vec<u8>, SinkError> {
        let scale = self.scale as usize;
        let (width, height) = self.frame_size(grid)?;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in 0..grid.rows() {
            let line: Vec<u8> = grid
                .row(row)
                .iter()
                .flat_map(|cell| {
                    let luma = if cell.is_alive() { ALIVE_LUMA } else { DEAD_LUMA };
                    std::iter::repeat_n(luma, scale)
                })
                .collect();
            for _ in 0..scale {
                pixels.extend_from_slice(&line);
            }
        }
        Ok(pixels)
    }
}

/// `(width, height)` in pixels, or `None` when either side or the pixel
/// count overflows `u32`
fn frame_dimensions(rows: usize, columns: usize, scale: u32) -> Option<(u32, u32)> {
    let width = u32::try_from(columns).ok()?.checked_mul(scale)?;
    let height = u32::try_from(rows).ok()?.checked_mul(scale)?;
    width.checked_mul(height)?;
    Some((width, height))
}

impl GenerationSink for FrameRenderer {
    fn emit(&mut self, generation: usize, grid: &Grid) -> Result<(), SinkError> {
        let (width, height) = self.frame_size(grid)?;
        let pixels = self.rasterize(grid)?;
        let file = fs::File::create(self.frame_path(generation))?;

        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels)?;
        writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::grid;

    #[test]
    fn create_clears_old_frames() {
        let out = tempfile::tempdir().unwrap();
        let plots = out.path().join(PLOTS_DIR);
        fs::create_dir_all(&plots).unwrap();
        fs::write(plots.join("state_000099.png"), b"stale").unwrap();

        let frames = FrameRenderer::create(out.path(), 1).unwrap();

        assert!(frames.dir().is_dir());
        assert_eq!(fs::read_dir(frames.dir()).unwrap().count(), 0);
    }

    #[test]
    fn frame_names_are_zero_padded() {
        let out = tempfile::tempdir().unwrap();
        let frames = FrameRenderer::create(out.path(), 1).unwrap();

        assert_eq!(
            frames.frame_path(42),
            out.path().join(PLOTS_DIR).join("state_000042.png")
        );
    }

    #[test]
    fn rasterize_scales_cells() {
        let out = tempfile::tempdir().unwrap();
        let frames = FrameRenderer::create(out.path(), 2).unwrap();

        let pixels = frames.rasterize(&grid("#.")).unwrap();
        assert_eq!(pixels, vec![255, 255, 0, 0, 255, 255, 0, 0]);
    }

    #[test]
    fn emit_writes_decodable_png() {
        let out = tempfile::tempdir().unwrap();
        let mut frames = FrameRenderer::create(out.path(), 3).unwrap();
        let g = grid(
            "#..
             .#.",
        );

        frames.emit(7, &g).unwrap();

        let file = fs::File::open(frames.frame_path(7)).unwrap();
        let reader = png::Decoder::new(file).read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (9, 6));
        assert_eq!(info.color_type, png::ColorType::Grayscale);
    }

    #[test]
    fn scale_is_at_least_one() {
        let out = tempfile::tempdir().unwrap();
        let frames = FrameRenderer::create(out.path(), 0).unwrap();

        assert_eq!(frames.frame_size(&grid("##")).unwrap(), (2, 1));
    }

    #[test]
    fn oversized_frames_rejected() {
        assert_eq!(frame_dimensions(3, 4, 10), Some((40, 30)));
        assert_eq!(frame_dimensions(1, 1 << 32, 1), None);
        assert_eq!(frame_dimensions(1, 1 << 20, 1 << 12), None);
        assert_eq!(frame_dimensions(1 << 16, 1 << 16, 1), None);
    }

    #[test]
    fn emit_reports_oversized_frame() {
        let out = tempfile::tempdir().unwrap();
        let mut frames = FrameRenderer::create(out.path(), u32::MAX).unwrap();

        let err = frames.emit(0, &grid("##")).unwrap_err();
        assert!(matches!(
            err,
            SinkError::FrameTooLarge {
                rows: 1,
                columns: 2,
                scale: u32::MAX
            }
        ));
        assert!(!frames.frame_path(0).exists());
    }
}
