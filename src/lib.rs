pub use crate::errors::{HarnessError, Result, Stage};

pub mod cli;
pub mod corpus;
pub mod errors;
pub mod harness;
pub mod toolchain;
pub mod verdict;
