//! Reversible `text/event-stream` framing over the [`StreamChunk`] protocol.
//!
//! The encoder turns chunks into `data: <json>\n\n` frames for the HTTP
//! layer; the decoder reassembles chunks on the browser side from a byte
//! stream that may split frames at arbitrary boundaries.
//!
//! [`StreamChunk`]: sensei_core::StreamChunk

pub mod decoder;
pub mod encoder;

pub use decoder::StreamDecoder;
pub use encoder::{DONE_FRAME, SSE_RESPONSE_HEADERS, StreamEncoder};
