mod bitlinks;
mod health;

pub use bitlinks::{ajax_bitlinks_handler, get_bitlinks_handler};
pub use health::health_handler;
