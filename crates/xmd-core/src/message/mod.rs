//! Message boundary between the page layer and the resolution service.
//!
//! Messages are JSON objects tagged by `action`; replies are flat JSON
//! objects carrying either a result field or `error`.

mod handler;
mod types;

pub use handler::MessageHandler;
pub use types::{
    BatchRequestItem, Envelope, Message, Reply, DISABLED, INVALID_MEDIA_ID, NO_VIDEO_FOUND, REQUEST_ID,
};
