//! Offline segmentation strategies.
//!
//! - [`Dynp`]: exact placement of a fixed number of breakpoints.
//! - [`BottomUp`]: greedy merging with a per-breakpoint penalty, and
//!   [`ReturnsBottomUp`] which runs it on log-returns.
//!
//! Both minimize the quadratic cost in [`L2Cost`] and report breakpoints as
//! segment ends, the last of which is the series length.

mod bottom_up;
mod cost;
mod dynp;

pub use bottom_up::{BottomUp, ReturnsBottomUp};
pub use cost::L2Cost;
pub use dynp::Dynp;
