mod encode;
mod order;

pub use encode::*;
pub use order::*;
