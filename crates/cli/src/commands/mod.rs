//! Command implementations.

pub mod balance;
pub mod rewards;
pub mod yields;

pub use balance::run_balance;
pub use rewards::run_rewards;
pub use yields::run_yield;
