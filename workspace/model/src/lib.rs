pub mod code;
pub mod entities;

pub use code::{Code, CodeError, MAX_STEP};
