//! Configuration section definitions.
//!
//! Each module corresponds to a section in `svgnorm.toml`:
//!
//! | Module      | TOML Section    | Purpose                              |
//! |-------------|-----------------|--------------------------------------|
//! | `normalize` | `[normalize]`   | viewBox policy, flattening, precision |
//! | `clean`     | `[clean]`       | Editor cleanup before normalizing    |
//! | `optimize`  | `[optimize]`    | usvg minification of the output      |

mod clean;
mod normalize;
mod optimize;

pub use clean::CleanConfig;
pub use normalize::NormalizeConfig;
pub use optimize::OptimizeConfig;
