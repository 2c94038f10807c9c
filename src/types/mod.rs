pub mod buffer;
pub mod entity;
pub mod errors;

pub use buffer::*;
pub use entity::*;
pub use errors::*;
