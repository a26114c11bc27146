//! SVG geometry normalization.
//!
//! Flattens translate transforms into path data and rescales documents to a
//! target viewBox.
//!
//! # Modules
//!
//! - [`path`]: path data tokenizer, coordinate roles, translation
//! - [`document`]: owned element tree over quick-xml
//! - [`transform`]: `transform` attribute classification
//! - [`flatten`]: translate flattening (inner-first worklist)
//! - [`scale`]: geometry scaling behind the [`GeometryScaler`] seam
//! - [`viewbox`]: viewBox normalization policies
//! - [`clean`]: editor cleanup (optional)
//! - [`optimize`]: usvg minification (optional)
//!
//! # Architecture
//!
//! ```text
//! SVG text
//!     │
//!     ▼
//! ┌──────────┐
//! │ document │ ──► owned tree (raw attribute text preserved)
//! └────┬─────┘
//!      │
//!      ▼
//! ┌─────────┐
//! │  clean  │ ──► comments, foreign namespaces, guides, root size
//! └────┬────┘
//!      │
//!      ▼
//! ┌─────────┐
//! │ flatten │ ──► translate(...) folded into absolute path coordinates
//! └────┬────┘
//!      │
//!      ▼
//! ┌─────────┐
//! │ viewbox │ ──► GeometryScaler + policy-driven viewBox rewrite
//! └────┬────┘
//!      │
//!      ▼
//! ┌──────────┐
//! │ optimize │ ──► usvg minified output
//! └──────────┘
//! ```

pub mod clean;
pub mod document;
pub mod error;
pub mod flatten;
pub mod optimize;
pub mod path;
pub mod scale;
pub mod transform;
pub mod viewbox;

pub use clean::{CleanOptions, CleanReport, clean_document};
pub use document::Document;
pub use error::SvgError;
pub use flatten::{FlattenReport, flatten_transforms};
pub use optimize::{OptimizeOptions, optimize_svg};
pub use scale::{GeometryScaler, PathScaler};
pub use viewbox::{ViewBox, ViewBoxOutcome, ViewBoxPolicy, Viewport, normalize_viewbox};
