mod interface;
mod system;
mod worker;

pub use interface::*;
pub use system::*;
pub use worker::*;
