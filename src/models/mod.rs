pub mod common;
pub mod image;
pub mod response;
pub mod task;

pub use common::*;
pub use image::*;
pub use response::*;
pub use task::*;
