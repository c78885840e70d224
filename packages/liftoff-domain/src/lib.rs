pub mod bisection;
pub mod session;

mod error;

pub use error::{Error, Result};
