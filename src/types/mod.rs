//! Common types used throughout the EC2 integration.
//!
//! Wire enums, regions and zones live in `common`; the values returned by
//! EC2 actions live in `responses`.

mod common;
mod responses;

pub use common::*;
pub use responses::*;
