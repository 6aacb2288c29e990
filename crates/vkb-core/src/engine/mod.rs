//! The layout-set engine.
//!
//! A request flows through these stages, one module each:
//!
//! 1. [`rows`]: expand the definition's declarative rows into keys
//! 2. [`transform`]: apply feature-flag row transforms and the shift page
//! 3. [`natural`]: compute the unscaled bounding box and key extents
//! 4. [`scale`]: rescale into the requested size with edge-exact rounding
//!
//! [`resolver`] drives the stages and memoizes their results.

pub mod natural;
pub mod resolver;
pub mod rows;
pub mod scale;
pub mod transform;
