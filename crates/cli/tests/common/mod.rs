//! Common utilities for integration tests

#![allow(dead_code)]

pub mod cli;
pub mod fixtures;

pub use fixtures::{catalog, petclinic_snapshot, Workspace};
