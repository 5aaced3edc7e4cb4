pub mod archive;
mod context;
pub mod convert;
pub mod discover;
pub mod error;
pub mod index;
mod process;
pub mod slide;

pub use crate::context::Context;
pub use crate::index::Index;
pub use crate::process::{Failure, ProcessEvent, Processed, Report, process, process_each};
pub use crate::slide::Slide;
