// tfup-net/src/lib.rs
pub mod channel;
pub mod http;
pub mod releases;
pub mod registry;
pub mod shasums;
pub mod validation;

pub use channel::{channel_for, ReleaseChannel};
