pub mod classify;
pub mod read;
pub mod write;
