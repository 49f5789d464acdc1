//! Stream protocol: frame decoding and the typed event vocabulary

mod decoder;
mod events;

pub use decoder::{FRAME_PREFIX, FrameDecoder, STREAM_TERMINATOR};
pub use events::{
    CompleteData, MealCompleteData, NodeStatus, ProgressData, RegenerateCompleteData, StreamEvent, ValidationData,
};
