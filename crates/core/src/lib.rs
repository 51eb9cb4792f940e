#![forbid(unsafe_code)]

pub mod model;
pub mod progress;
pub mod search;
pub mod settings;
pub mod text;
pub mod time;

pub use time::Clock;
