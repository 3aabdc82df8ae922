/// State management module
///
/// This module handles all gallery state, including:
/// - The photo record and load results (data.rs)
/// - The persisted snapshot schema (snapshot.rs)
/// - Storage name generation (naming.rs)
/// - The gallery store and its capabilities (gallery.rs)

pub mod data;
pub mod gallery;
pub mod naming;
pub mod snapshot;
