//! Document designs and report composition.
//!
//! A design is a named, reusable layout configuration for one study type,
//! stored as a JSON blob holding only overrides. Composition merges a case's
//! selected fragments with the effective design configuration into a
//! render-agnostic document; PDF/HTML rendering happens elsewhere.

pub mod composer;
pub mod config;
pub mod design;
pub mod error;
pub mod merge;

pub use composer::{Composer, RenderableDocument, RenderedSection};
pub use config::{
    CaseDataConfig, CustomTexts, DesignConfig, ExtraText, HeaderConfig, Margins, Placement,
    PrintConfig, SectionStyle,
};
pub use design::{DesignRegistry, DocumentDesign};
pub use error::ComposeError;
pub use merge::merge_defaults;
