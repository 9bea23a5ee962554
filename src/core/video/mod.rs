pub mod decimator;
pub mod frame;
pub mod io;
pub mod timing;

pub use decimator::decimate;
pub use frame::{BoundingBox, Frame};
pub use io::{Annotation, AnnotationColor, MemoryBackend, MemoryVideo, VideoBackend, VideoSink, VideoSource};
pub use timing::{speed_multiplier, VideoInfo, VideoTiming};
