pub mod framex;
pub mod retry;

mod error;

pub use error::{Error, Result};
pub use framex::{FramexClient, VideoInfo};
pub use retry::RetryPolicy;
