//! Coati: integrity validation for requirement knowledge graphs.
//!
//! Requirements are stored as documents split into sections that contain
//! atomic units, with revision and proposal relations between units. The
//! [`validate`] module checks the structural rules such a graph must obey,
//! [`storage`] defines the read-only query capability it runs against, and
//! [`admin`] wires both to snapshots on disk.

#![warn(missing_docs)]

pub mod admin;
pub mod cli;
pub mod storage;
pub mod types;
pub mod validate;
