//! Font-side stages: glyph diagnostics, cmap remapping, glyph-name zapping.

use std::collections::{HashMap, HashSet};
use std::result;

use read_fonts::{FontRef, TableProvider, types::GlyphId16};
use write_fonts::{
    BuilderError, FontBuilder,
    tables::cmap::{Cmap, CmapSubtable, EncodingRecord, PlatformId, SequentialMapGroup},
    types::Version16Dot16,
};

use crate::{Error, Result, subst::SubstitutionMapping};

/// Glyph names and Unicode reachability, used only for diagnostics.
///
/// A substitution whose source and target are both unreachable from every
/// cmap subtable can never be observed through an encoded character; it is
/// still applied, but warned about and left off the remapped-names list.
pub(crate) struct GlyphDiagnostics {
    names: HashMap<u16, String>,
    unicode_reachable: HashSet<u16>,
}

impl GlyphDiagnostics {
    pub(crate) fn from_font(font: &FontRef) -> Self {
        let names = font
            .post()
            .ok()
            .zip(font.maxp().ok())
            .map(|(post, maxp)| {
                (0..maxp.num_glyphs())
                    .filter_map(|gid| {
                        post.glyph_name(GlyphId16::new(gid))
                            .map(|name| (gid, name.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        // Every glyph that is the value of some cmap entry, in any subtable.
        let unicode_reachable = font
            .cmap()
            .ok()
            .map(|cmap| {
                cmap.encoding_records()
                    .iter()
                    .filter_map(|record| record.subtable(cmap.offset_data()).ok())
                    .flat_map(|subtable| {
                        subtable
                            .iter()
                            .map(|(_, gid)| gid.to_u32() as u16)
                            .collect::<Vec<_>>()
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            names,
            unicode_reachable,
        }
    }

    fn name(&self, gid: u16) -> String {
        self.names
            .get(&gid)
            .cloned()
            .unwrap_or_else(|| format!("gid{gid}"))
    }

    /// Walk the changed pairs in glyph order, producing warnings for the
    /// unreachable ones and display names for the rest. The mapping itself
    /// is never filtered here.
    pub(crate) fn audit(&self, mapping: &SubstitutionMapping) -> (Vec<String>, Vec<String>) {
        let mut warnings = Vec::new();
        let mut names = Vec::new();
        for (from, to) in mapping.changed() {
            if !self.unicode_reachable.contains(&from) && !self.unicode_reachable.contains(&to) {
                warnings.push(format!(
                    "Cannot remap '{}' -> '{}' because neither has a Unicode value \
                     assigned in any of the cmap tables.",
                    self.name(from),
                    self.name(to)
                ));
            } else {
                names.push(self.name(to));
            }
        }
        (warnings, names)
    }
}

/// Rebuilds the font binary with one table swapped out, all other tables
/// passed through as raw bytes.
pub(crate) struct FontEdit<'a> {
    font: FontRef<'a>,
}

impl<'a> FontEdit<'a> {
    pub(crate) fn new(font: FontRef<'a>) -> Self {
        Self { font }
    }

    /// Rewrite every cmap entry through the substitution mapping.
    ///
    /// Each encoding record keeps its platform and encoding IDs; the
    /// subtable payload is recompiled as segmented coverage (format 12).
    /// Callers skip this entirely for an identity mapping, so an untouched
    /// cmap stays byte-identical.
    pub(crate) fn remap_cmap(&self, mapping: &SubstitutionMapping) -> Result<Vec<u8>> {
        let cmap = self.font.cmap().map_err(|_| Error::NoCmap)?;

        let records: Vec<EncodingRecord> = cmap
            .encoding_records()
            .iter()
            .filter_map(|record| {
                record
                    .subtable(cmap.offset_data())
                    .ok()
                    .map(|subtable| (record, subtable))
            })
            .map(|(record, subtable)| {
                let mut entries: Vec<(u32, u16)> = subtable
                    .iter()
                    .map(|(codepoint, gid)| (codepoint, mapping.remap(gid.to_u32() as u16)))
                    .collect();
                entries.sort_by_key(|&(codepoint, _)| codepoint);

                EncodingRecord::new(
                    PlatformId::new(record.platform_id() as u16),
                    record.encoding_id(),
                    CmapSubtable::format_12(0, sequential_groups(&entries)),
                )
            })
            .collect();

        self.rebuild(|builder| builder.add_table(&Cmap::new(records)).map(|_| ()))
    }

    /// Rewrite the `post` table at version 3.0, dropping all glyph names
    /// while keeping the numeric fields.
    pub(crate) fn zap_glyph_names(&self) -> Result<Vec<u8>> {
        let post = self.font.post()?;
        let mut nameless = write_fonts::tables::post::Post::new(
            post.italic_angle(),
            post.underline_position(),
            post.underline_thickness(),
            post.is_fixed_pitch(),
            0,
            0,
            0,
            0,
        );
        nameless.version = Version16Dot16::VERSION_3_0;
        self.rebuild(|builder| builder.add_table(&nameless).map(|_| ()))
    }

    pub(crate) fn rebuild(
        &self,
        replace: impl FnOnce(&mut FontBuilder) -> result::Result<(), BuilderError>,
    ) -> Result<Vec<u8>> {
        let mut builder = FontBuilder::new();
        for record in self.font.table_directory.table_records() {
            if let Some(data) = self.font.table_data(record.tag()) {
                builder.add_raw(record.tag(), data);
            }
        }
        replace(&mut builder)?;
        Ok(builder.build())
    }
}

/// Collapse sorted (codepoint, glyph) pairs into runs where both the
/// codepoints and the glyph IDs advance together.
fn sequential_groups(entries: &[(u32, u16)]) -> Vec<SequentialMapGroup> {
    let Some(&(first_cp, first_gid)) = entries.first() else {
        return Vec::new();
    };
    let mut groups = Vec::new();
    let (mut start_cp, mut start_gid) = (first_cp, first_gid as u32);
    let (mut prev_cp, mut prev_gid) = (first_cp, first_gid as u32);

    for &(cp, gid) in &entries[1..] {
        let gid = gid as u32;
        if cp == prev_cp + 1 && gid == prev_gid + 1 {
            (prev_cp, prev_gid) = (cp, gid);
            continue;
        }
        groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));
        (start_cp, start_gid) = (cp, gid);
        (prev_cp, prev_gid) = (cp, gid);
    }
    groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_collapse_parallel_runs() {
        let entries = [(0x30, 10), (0x31, 11), (0x32, 12), (0x41, 20), (0x43, 21)];
        let groups = sequential_groups(&entries);
        assert_eq!(groups.len(), 3);
        assert_eq!(
            (groups[0].start_char_code, groups[0].end_char_code, groups[0].start_glyph_id),
            (0x30, 0x32, 10)
        );
        assert_eq!(
            (groups[1].start_char_code, groups[1].end_char_code, groups[1].start_glyph_id),
            (0x41, 0x41, 20)
        );
        assert_eq!(
            (groups[2].start_char_code, groups[2].end_char_code, groups[2].start_glyph_id),
            (0x43, 0x43, 21)
        );
    }

    #[test]
    fn groups_of_nothing() {
        assert!(sequential_groups(&[]).is_empty());
    }
}
