pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Demo, Init, Keygen, Open, Seal, Version};
