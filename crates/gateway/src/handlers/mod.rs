//! API handlers module

pub mod authormaps;
pub mod health;
