#![forbid(unsafe_code)]

//! Rendering of analyzed failure records into one self-contained HTML
//! document: nested collapsible sections, section-aware truncation of long
//! text blocks, and the fixed style/script assets.

pub mod assets;
pub mod collapse;
pub mod render;

pub use render::Report;
