//! Streaming response engine: line splitting, classification, decoding.

pub mod classifier;
pub mod decoder;
pub mod lines;
pub mod payload;

pub use classifier::{classify_line, ClassifiedEvent, MetaField};
pub use decoder::{DecodedTurn, DecoderAccumulator, DecoderState, StreamDecoder, Terminal};
pub use lines::{lines_from_bytes, LineStream};
pub use payload::{BlockData, StreamPayload};
