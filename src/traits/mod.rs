// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces to the collaborators this crate reads from and writes to.
mod history;
mod pending;
mod popstate;
mod state;

pub use history::{History, Location};
pub use pending::PendingApproval;
pub use popstate::PopStateTarget;
pub use state::StateSnapshot;
