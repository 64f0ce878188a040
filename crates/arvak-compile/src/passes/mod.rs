//! Built-in compilation passes.
//!
//! All passes live under [`target`]: the ZX rebase and the layout and
//! routing passes that place pattern circuits on a coupling map.

pub mod target;

pub use target::{MappedLayout, RebaseToZx, SwapRouting, TrivialLayout};
