//! Minimal framer/deframer for binary websocket messages.
//!
//! See [`ws`] for the codec and [`buffer`] for the reassembly buffer backing the decoder.

pub mod buffer;
mod util;
pub mod ws;
