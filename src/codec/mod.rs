//! Sample Codecs
//!
//! Stateless sample-level companding. Only G.711 mu-law is provided.

pub mod mulaw;

pub use mulaw::{decode as decode_sample, encode as encode_sample, decode_bytes, encode_samples};
