//! Core utilities shared by all analysis components

pub mod time;
