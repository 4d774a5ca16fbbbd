//! Error types for the freezing pipeline.
//!
//! Only conditions that abort a run live here. Soft conditions (a missing
//! GSUB table, an unreachable substitution, a malformed rename rule) are
//! collected as warning strings on the run result instead.

use std::result;

use read_fonts::ReadError;
use write_fonts::BuilderError;

/// A fatal error during a freeze or report run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input bytes could not be parsed as an OpenType font.
    #[error("failed to parse font: {0}")]
    Parse(#[from] ReadError),

    /// A modified table could not be recompiled into the output font.
    #[error("failed to rebuild font: {0}")]
    Build(#[from] BuilderError),

    /// The font has substitutions to apply but no cmap table to apply them to.
    #[error("no cmap table in font")]
    NoCmap,

    /// The before/after glyph order arrays no longer have the same length.
    /// This is a pipeline bug, not a property of the input font.
    #[error("glyph order snapshot out of sync: {before} glyphs before, {after} after")]
    GlyphOrderOutOfSync {
        /// Length of the untouched snapshot array.
        before: usize,
        /// Length of the rewritten snapshot array.
        after: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = result::Result<T, Error>;
