/// Decoded frame data, RGBA.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // RGBA
    /// Zero-based index of this frame in its source video.
    pub frame_number: u64,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>, frame_number: u64) -> Self {
        Self {
            width,
            height,
            data,
            frame_number,
        }
    }

    /// Uniform single-color frame, used by tests and synthetic sources.
    pub fn filled(width: u32, height: u32, fill: u8, frame_number: u64) -> Self {
        Self::new(
            width,
            height,
            vec![fill; (width * height * 4) as usize],
            frame_number,
        )
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }
}

/// Axis-aligned box in pixel coordinates, as reported by the classifier.
/// Coordinates are signed because detector output may fall slightly outside
/// the frame; drawing code clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}
