mod factory;
mod optimization;

pub use factory::*;
pub use optimization::*;
