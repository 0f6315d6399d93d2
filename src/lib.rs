//! Household organiser core: family groups with join codes, recurring chore lists,
//! shopping lists, recipes and a weekly meal planner.
//!
//! The scheduling, membership and statistics modules are pure functions over a
//! snapshot ([`models::Store`]); [`storage`] loads and saves that snapshot and
//! [`commands`] wires both to the command line.

pub mod commands;
pub mod error;
pub mod household;
pub mod logging;
pub mod membership;
pub mod models;
pub mod planner;
pub mod schedule;
pub mod stats;
pub mod storage;

pub use error::FamlyError;
