//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. All randomness in synthetic log
//! generation goes through this module so a seed fully determines a log.

mod xorshift;

pub use xorshift::RngManager;
