//! Comment storage for the parts of versioned 3D models.
//!
//! Models are stored as documents keyed by URN; each holds a list of parts and
//! each part holds a map of comments. See [`db`] for the store and [`api`] for
//! the HTTP surface.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
