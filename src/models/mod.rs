//! Document schema for model comments.
//!
//! # Shape
//!
//! - [`Model`]: one versioned 3D asset, addressed by its URN.
//! - [`Part`]: a sub-component of a model, identified by `partId` within that model.
//! - [`Comments`]: the key/value annotations held by a part.
//!
//! A model owns its parts and each part owns its comment map; nothing is shared
//! across models. The JSON field names here (`modelURN`, `parts`, `partId`,
//! `comments`) are also the names the store addresses when it projects or
//! updates a nested value, so changing them is a storage format change.

mod model;
mod part;

pub use model::*;
pub use part::*;
