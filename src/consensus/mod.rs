//! Order reconciliation and union builders.
//!
//! These are the deterministic building blocks the fusion runner calls once
//! per run, before any evolution happens:
//!
//! 1. [`alpha_order`] picks a common variable order for all inputs
//! 2. [`transform_to_alpha`] rewrites each input onto that order
//!    ([`Reconciled`] does both)
//! 3. [`full_union`] merges the rewritten inputs without any bound
//! 4. [`greedy_union`] merges them edge by edge under a tree-width bound

mod alpha;
mod union;

pub use alpha::{alpha_order, transform_to_alpha};
pub use union::{full_union, greedy_union, Reconciled};
