//! Display sinks and frame-paced playback

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use std::time::Duration;

use image::imageops::{self, FilterType};

use crate::error::{DisplayError, DisplayResult};
use crate::frames::Frame;

/// Default animation rate
pub const DEFAULT_FPS: u32 = 10;

/// Largest framebuffer width or height accepted
pub const MAX_FRAMEBUFFER_DIM: u32 = 8192;

/// Something that can show one frame at a time
pub trait FrameSink {
    fn show(&mut self, frame: &Frame) -> DisplayResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn show(&mut self, frame: &Frame) -> DisplayResult<()> {
        (**self).show(frame)
    }
}

// ============ Headless ============

/// Sink for cabinets without a panel. Counts frames only.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    shown: usize,
}

impl HeadlessSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_shown(&self) -> usize {
        self.shown
    }
}

impl FrameSink for HeadlessSink {
    fn show(&mut self, frame: &Frame) -> DisplayResult<()> {
        self.shown += 1;
        log::trace!(
            "[Present] Headless frame {} ({}x{})",
            self.shown,
            frame.width(),
            frame.height()
        );
        Ok(())
    }
}

// ============ Framebuffer ============

/// Linux framebuffer device in 16-bit RGB565
pub struct FramebufferSink {
    file: File,
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl FramebufferSink {
    pub fn open(path: &Path, width: u32, height: u32) -> DisplayResult<Self> {
        if !valid_geometry(width, height) {
            return Err(DisplayError::InvalidGeometry { width, height });
        }

        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| DisplayError::Open {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        log::info!(
            "[Present] Framebuffer {} opened ({}x{})",
            path.display(),
            width,
            height
        );

        Ok(Self {
            file,
            width,
            height,
            buffer: Vec::with_capacity(width as usize * height as usize * 2),
        })
    }

    pub fn geometry(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl FrameSink for FramebufferSink {
    fn show(&mut self, frame: &Frame) -> DisplayResult<()> {
        if frame.dimensions() == (self.width, self.height) {
            encode_rgb565(frame, &mut self.buffer);
        } else {
            let scaled = imageops::resize(frame, self.width, self.height, FilterType::Nearest);
            encode_rgb565(&scaled, &mut self.buffer);
        }

        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&self.buffer)?;
        self.file.flush()?;
        Ok(())
    }
}

/// Both sides non-zero and at most [`MAX_FRAMEBUFFER_DIM`]
pub fn valid_geometry(width: u32, height: u32) -> bool {
    (1..=MAX_FRAMEBUFFER_DIM).contains(&width) && (1..=MAX_FRAMEBUFFER_DIM).contains(&height)
}

/// Pack RGB8 pixels as little-endian RGB565
pub fn encode_rgb565(frame: &Frame, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(frame.as_raw().len() / 3 * 2);
    for pixel in frame.pixels() {
        let [r, g, b] = pixel.0;
        let packed = ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3);
        out.extend_from_slice(&packed.to_le_bytes());
    }
}

// ============ Playback ============

/// How long each frame is held at `fps`
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

/// Show each frame, holding it for `1/fps`.
///
/// Returns the number of frames shown. An empty sequence returns at once
/// without touching the sink. A frame the sink rejects is logged and
/// skipped; its slot is still held so pacing stays intact.
pub async fn play_animation<S: FrameSink + ?Sized>(
    sink: &mut S,
    frames: &[Frame],
    fps: u32,
) -> usize {
    if frames.is_empty() {
        return 0;
    }

    let hold = frame_interval(fps);
    let mut shown = 0;
    for (index, frame) in frames.iter().enumerate() {
        match sink.show(frame) {
            Ok(()) => shown += 1,
            Err(e) => log::warn!("[Present] Frame {} not shown: {}", index, e),
        }
        tokio::time::sleep(hold).await;
    }
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tokio::time::Instant;

    #[derive(Default)]
    struct CountingSink {
        shown: usize,
        fail_on: Option<usize>,
        calls: usize,
    }

    impl FrameSink for CountingSink {
        fn show(&mut self, _frame: &Frame) -> DisplayResult<()> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on == Some(call) {
                return Err(DisplayError::Write(std::io::Error::other("panel off")));
            }
            self.shown += 1;
            Ok(())
        }
    }

    fn frames(count: usize) -> Vec<Frame> {
        (0..count).map(|_| RgbImage::new(2, 2)).collect()
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(10), Duration::from_millis(100));
        assert_eq!(frame_interval(25), Duration::from_millis(40));
        // Zero fps is treated as 1
        assert_eq!(frame_interval(0), Duration::from_secs(1));
    }

    #[test]
    fn test_rgb565_packing() {
        let mut frame = RgbImage::new(4, 1);
        frame.put_pixel(0, 0, Rgb([255, 0, 0]));
        frame.put_pixel(1, 0, Rgb([0, 255, 0]));
        frame.put_pixel(2, 0, Rgb([0, 0, 255]));
        frame.put_pixel(3, 0, Rgb([255, 255, 255]));

        let mut out = Vec::new();
        encode_rgb565(&frame, &mut out);
        assert_eq!(out, vec![0x00, 0xF8, 0xE0, 0x07, 0x1F, 0x00, 0xFF, 0xFF]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_sequence_is_noop() {
        let mut sink = CountingSink::default();
        let start = Instant::now();
        assert_eq!(play_animation(&mut sink, &[], 10).await, 0);
        assert_eq!(sink.calls, 0);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_paced_by_fps() {
        let mut sink = CountingSink::default();
        let start = Instant::now();
        assert_eq!(play_animation(&mut sink, &frames(5), 10).await, 5);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(500), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(600), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_frame_skipped() {
        let mut sink = CountingSink {
            fail_on: Some(1),
            ..Default::default()
        };
        assert_eq!(play_animation(&mut sink, &frames(3), 10).await, 2);
        assert_eq!(sink.calls, 3);
    }

    #[test]
    fn test_headless_counts() {
        let mut sink = HeadlessSink::new();
        for frame in frames(3) {
            sink.show(&frame).unwrap();
        }
        assert_eq!(sink.frames_shown(), 3);
    }

    #[test]
    fn test_framebuffer_writes_whole_frame() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut sink = FramebufferSink::open(file.path(), 2, 2).unwrap();

        sink.show(&RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]))).unwrap();
        sink.show(&RgbImage::from_pixel(2, 2, Rgb([0, 0, 255]))).unwrap();

        // Second frame overwrites the first in place
        let bytes = std::fs::read(file.path()).unwrap();
        assert_eq!(bytes, [0x1F, 0x00].repeat(4));
    }

    #[test]
    fn test_framebuffer_scales_to_geometry() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut sink = FramebufferSink::open(file.path(), 2, 2).unwrap();
        sink.show(&RgbImage::from_pixel(8, 6, Rgb([255, 255, 255])))
            .unwrap();

        let bytes = std::fs::read(file.path()).unwrap();
        assert_eq!(bytes.len(), 8);
        assert!(bytes.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_framebuffer_rejects_zero_geometry() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            FramebufferSink::open(file.path(), 0, 128),
            Err(DisplayError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_framebuffer_rejects_huge_geometry() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // 65536 * 65536 * 2 does not fit in a u32
        assert!(matches!(
            FramebufferSink::open(file.path(), 65536, 65536),
            Err(DisplayError::InvalidGeometry {
                width: 65536,
                height: 65536
            })
        ));
        assert!(valid_geometry(MAX_FRAMEBUFFER_DIM, 1));
        assert!(!valid_geometry(MAX_FRAMEBUFFER_DIM + 1, 1));
    }

    #[test]
    fn test_framebuffer_missing_device() {
        assert!(matches!(
            FramebufferSink::open(Path::new("/nonexistent/fb9"), 160, 128),
            Err(DisplayError::Open { .. })
        ));
    }
}
