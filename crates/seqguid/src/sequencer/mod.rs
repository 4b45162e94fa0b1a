mod atomic;
mod interface;
mod lock;
mod spin;
mod state;

pub use atomic::*;
pub use interface::*;
pub use lock::*;
pub use spin::*;
pub use state::*;
