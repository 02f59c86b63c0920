pub mod config;
pub mod logging;

pub mod cache;
pub mod cascade;
pub mod detect;
pub mod dispatch;
pub mod extract;
pub mod media;
pub mod media_id;
pub mod message;
pub mod save;
pub mod strategy;
pub mod url_model;

#[cfg(test)]
mod testing;
