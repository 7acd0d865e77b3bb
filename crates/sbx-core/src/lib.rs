pub mod bootstrap;
pub mod error;
pub mod exec;
pub mod git;
pub mod io;
pub mod launch;
pub mod meta;
pub mod mirror;
pub mod naming;
pub mod safety;
pub mod sandbox;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{Result, SbxError};
