//! Public entry points.

pub mod cli;
