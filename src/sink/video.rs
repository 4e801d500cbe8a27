use super::{GenerationSink, SinkError};
use crate::grid::Grid;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

pub const VIDEO_NAME: &str = "GameOfLife.mp4";

/// Stitches the PNG frames of a finished run into an mp4 with `ffmpeg`
///
/// Nothing happens per generation; the encoder only runs once all frames
/// exist, from [`GenerationSink::finish`].
pub struct VideoEncoder {
    program: OsString,
    frames_dir: PathBuf,
    output: PathBuf,
    fps: u32,
    frames: usize,
}

impl VideoEncoder {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(frames_dir: P, out_dir: Q, fps: u32) -> Self {
        Self {
            program: "ffmpeg".into(),
            frames_dir: frames_dir.as_ref().to_owned(),
            output: out_dir.as_ref().join(VIDEO_NAME),
            fps: fps.max(1),
            frames: 0,
        }
    }

    /// Uses another executable in place of `ffmpeg`
    pub fn set_program<S: Into<OsString>>(mut self, program: S) -> Self {
        self.program = program.into();
        self
    }

    #[inline]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Arguments passed to the encoder
    pub fn args(&self) -> Vec<OsString> {
        let pattern = self.frames_dir.join("*.png");
        let mut args: Vec<OsString> = vec!["-y".into(), "-r".into(), self.fps.to_string().into()];
        args.extend(["-pattern_type", "glob", "-i"].into_iter().map(OsString::from));
        args.push(pattern.into_os_string());
        args.extend(
            [
                "-c:v",
                "libx264",
                "-vprofile",
                "baseline",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "faststart",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(self.output.clone().into_os_string());
        args
    }
}

impl GenerationSink for VideoEncoder {
    fn emit(&mut self, _generation: usize, _grid: &Grid) -> Result<(), SinkError> {
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        log::info!(
            "encoding {} frames into {}",
            self.frames,
            self.output.display()
        );
        let output = Command::new(&self.program)
            .args(self.args())
            .output()
            .map_err(|e| {
                SinkError::Video(format!(
                    "could not run {}: {}",
                    self.program.to_string_lossy(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::warn!("{}", stderr.trim_end());
            return Err(SinkError::Video(format!(
                "{} exited with {}",
                self.program.to_string_lossy(),
                output.status
            )));
        }
        Ok(())
    }
}
