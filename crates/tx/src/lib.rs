// Path: crates/tx/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]
//! # King of Algo Transaction Engine
//!
//! Turns a read of the contract's global state into a priced, ordered, atomically
//! grouped and signed set of transactions.
//!
//! The flow is leaf-first: [`state::decode_state`] builds a [`ContractState`]
//! snapshot, [`pricing::Pricing`] splits the price for one captured `now`, and
//! [`builder::build_become_king_group`] assembles and signs the group.

pub mod builder;
pub mod deploy;
pub mod factory;
pub mod group;
pub mod pricing;
pub mod state;

pub use builder::{build_become_king_group, BecomeKingRequest, CoronationGroup, SplitOverride};
pub use group::SignedGroup;
pub use koa_types::app::ContractState;
pub use pricing::Pricing;
pub use state::decode_state;
