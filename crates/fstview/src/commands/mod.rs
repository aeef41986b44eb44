pub mod completion;
pub mod config;
pub mod gap;
pub mod inspect;
pub mod render;
