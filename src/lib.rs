#![doc = include_str!("../README.md")]

mod adapter;
mod compat;
mod continuable;
mod conversions;
mod functions;

pub use adapter::*;
pub use continuable::*;
pub use functions::*;

pub mod executor;
