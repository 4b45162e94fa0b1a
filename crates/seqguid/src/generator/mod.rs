mod config;
mod handle;
mod interface;
mod registry;
#[cfg(test)]
mod tests;

pub use config::*;
pub use handle::*;
pub use interface::*;
pub use registry::*;
