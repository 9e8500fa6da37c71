//! Safe SQL builder: identifiers from whitelists only, values as parameters.

mod builder;
pub use builder::*;
