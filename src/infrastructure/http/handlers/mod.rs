//! HTTP Handlers

mod ping;
mod speech;
mod voice;

pub use ping::*;
pub use speech::*;
pub use voice::*;
