//! Target-specific compilation passes.
//!
//! These passes need target information from the `PropertySet` (coupling
//! map, layout) or rewrite the circuit into a fixed target gate set.

pub mod layout;
pub mod rebase;
pub mod routing;

pub use layout::{MappedLayout, TrivialLayout};
pub use rebase::RebaseToZx;
pub use routing::SwapRouting;
