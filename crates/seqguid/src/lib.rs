#![doc = include_str!("../README.md")]

mod error;
pub mod generator;
pub mod identity;
pub mod layout;
pub mod rand;
pub mod sequencer;
pub mod strategy;
pub mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::identity::{HostIdentity, Node, SystemIdentity};
pub use crate::layout::Layout;
pub use crate::rand::*;
pub use crate::sequencer::{AtomicSequencer, Sequencer, SpinSequencer, Stamp};
pub use crate::strategy::*;
pub use crate::time::*;
