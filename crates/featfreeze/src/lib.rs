//! Freeze OpenType GSUB features into a font's default character mapping.
//!
//! Applications that never apply OpenType feature lookups still render the
//! frozen variants, because the cmap entries for the affected codepoints
//! now point straight at the substituted glyphs. Only single (type 1) and
//! alternate (type 3) substitutions are simulated, including either wrapped
//! in an extension (type 7) lookup; everything else a GSUB can express is
//! left alone.
//!
//! ## Example
//!
//! ```no_run
//! use featfreeze::{FreezeOptions, freeze};
//!
//! let data = std::fs::read("input.ttf").unwrap();
//! let result = freeze(&data, &FreezeOptions::new(["smcp", "c2sc"])).unwrap();
//! std::fs::write("output.ttf", result.data).unwrap();
//! ```

mod error;
mod font;
mod gsub;
mod rename;
mod subst;
mod types;

use read_fonts::{FontRef, TableProvider};

pub use error::{Error, Result};
pub use subst::SubstitutionMapping;
pub use types::{
    FontReport, FreezeOptions, FreezeResult, FreezeStats, ScriptLangFilter, Suffix,
};

use font::{FontEdit, GlyphDiagnostics};
use subst::GlyphOrderSnapshot;

/// Report the scripts, language systems and feature tags present in a font.
///
/// A font without a GSUB table reports both sections empty; that is not an
/// error.
pub fn report(data: &[u8]) -> Result<FontReport> {
    let font = FontRef::new(data)?;
    match font.gsub() {
        Ok(gsub) => gsub::collect_report(&gsub),
        Err(_) => Ok(FontReport::default()),
    }
}

/// Freeze the requested features into the font and return the rebuilt
/// binary along with warnings and statistics.
///
/// The pipeline runs snapshot → feature selection → lookup selection →
/// substitution simulation → cmap remap → rename, stopping at the first
/// fatal error. Soft conditions (no GSUB, unreachable substitutions,
/// malformed rename rules) end up in [`FreezeResult::warnings`] and never
/// fail the run: an empty selection simply freezes nothing, and a rename
/// can still be performed on a font with no layout tables at all.
pub fn freeze(data: &[u8], options: &FreezeOptions) -> Result<FreezeResult> {
    let font = FontRef::new(data)?;
    let num_glyphs = font.maxp()?.num_glyphs();

    let mut warnings = Vec::new();
    let mut snapshot = GlyphOrderSnapshot::new(num_glyphs);
    let mut lookups_applied = 0;

    match font.gsub() {
        Ok(gsub) => {
            let feature_indices = gsub::select_feature_indices(&gsub, &options.filter)?;
            let lookups = gsub::resolve_lookups(&gsub, &feature_indices, &options.features)?;
            lookups_applied = lookups.len();
            snapshot.process_lookups(&gsub, &lookups)?;
        }
        Err(_) => warnings.push("No GSUB table found, nothing to substitute.".to_string()),
    }

    let mapping = snapshot.into_mapping()?;
    let (unreachable, remapped_names) = GlyphDiagnostics::from_font(&font).audit(&mapping);
    warnings.extend(unreachable);

    // An identity mapping leaves the cmap bytes untouched; rebuilding it
    // would reorganize subtables for no observable change.
    let mut out = if mapping.is_identity() {
        data.to_vec()
    } else {
        FontEdit::new(font.clone()).remap_cmap(&mapping)?
    };

    if options.wants_name_edits() {
        out = rename::rename_font(&FontRef::new(&out)?, options, &mut warnings)?;
    }
    if options.zapnames {
        out = FontEdit::new(FontRef::new(&out)?).zap_glyph_names()?;
    }

    let stats = FreezeStats {
        features_requested: options.features.len(),
        lookups_applied,
        glyphs_remapped: mapping.changed().count(),
    };
    log::info!("froze {stats}");

    Ok(FreezeResult {
        data: out,
        mapping,
        stats,
        warnings,
        remapped_names,
    })
}
