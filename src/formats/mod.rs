//! Codec boundary: on-disk container formats
//!
//! - [`marshal`] - Ruby Marshal 4.8 subset for rxdata/rvdata/rvdata2
//! - [`json`] - JSON files and plugins.js for the newer generation
//! - [`scripts`] - zlib-deflated script blob handling

pub mod json;
pub mod marshal;
pub mod scripts;
