//! Stellar Conditions - condition evaluation for 4X simulation objects
//!
//! Condition trees filter and sample planets, ships, fleets, systems and
//! buildings of a read-only [`universe::Universe`] snapshot.

pub mod condition;
pub mod core;
pub mod universe;
pub mod value_ref;
