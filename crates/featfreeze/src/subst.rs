//! Substitution simulation over the glyph order snapshot.
//!
//! The snapshot holds two parallel arrays over the glyph order: `before`
//! stays untouched, `after` is rewritten rule by rule. A rule `from → to`
//! overwrites every position whose *current* glyph is `from`, so a later
//! lookup sees the output of an earlier one and substitutions chain within
//! a single pass. Do not replace this with a composed map; the rescan is
//! the chaining semantic.

use std::collections::BTreeSet;

use read_fonts::tables::gsub::{Gsub, SingleSubst, SubstitutionSubtables};

use crate::{Error, Result};

/// The font's glyph order, captured twice: as it was, and as it reads after
/// the selected substitutions have been simulated.
#[derive(Debug, Clone)]
pub(crate) struct GlyphOrderSnapshot {
    before: Vec<u16>,
    after: Vec<u16>,
}

impl GlyphOrderSnapshot {
    pub(crate) fn new(num_glyphs: u16) -> Self {
        let order: Vec<u16> = (0..num_glyphs).collect();
        Self {
            before: order.clone(),
            after: order,
        }
    }

    /// Apply the lookups named by `indices`, in ascending index order.
    ///
    /// Ascending numeric order is a deliberate simplification: it is
    /// deterministic, but it is not the priority order a shaping engine
    /// would use. Lookup indices out of range are skipped.
    pub(crate) fn process_lookups(&mut self, gsub: &Gsub, indices: &BTreeSet<u16>) -> Result<()> {
        let lookup_list = gsub.lookup_list()?;
        for &index in indices {
            let Ok(lookup) = lookup_list.lookups().get(index as usize) else {
                continue;
            };
            // subtables() unwraps extension (type 7) lookups into the nested
            // subtable kind, so wrapped single/alternate rules land in the
            // same arms as unwrapped ones.
            match lookup.subtables()? {
                SubstitutionSubtables::Single(tables) => {
                    for table in tables.iter().flatten() {
                        self.process_single(&table)?;
                    }
                }
                SubstitutionSubtables::Alternate(tables) => {
                    for table in tables.iter().flatten() {
                        let coverage = table.coverage()?;
                        let sets = table.alternate_sets();
                        for (i, covered) in coverage.iter().enumerate() {
                            let Ok(set) = sets.get(i) else { continue };
                            // Always the first declared alternate. The pick
                            // is never context-sensitive.
                            if let Some(first) = set.alternate_glyph_ids().first() {
                                self.rewrite(
                                    covered.to_u32() as u16,
                                    first.get().to_u32() as u16,
                                );
                            }
                        }
                    }
                }
                // Multiple, ligature, contextual and reverse-chain rules
                // cannot be expressed as a glyph-for-glyph remap; they are
                // inert for this pipeline.
                _ => {}
            }
        }
        Ok(())
    }

    fn process_single(&mut self, subtable: &SingleSubst<'_>) -> Result<()> {
        match subtable {
            SingleSubst::Format1(fmt) => {
                let delta = fmt.delta_glyph_id() as i32;
                for covered in fmt.coverage()?.iter() {
                    let from = covered.to_u32() as u16;
                    self.rewrite(from, (from as i32 + delta) as u16);
                }
            }
            SingleSubst::Format2(fmt) => {
                let substitutes = fmt.substitute_glyph_ids();
                for (i, covered) in fmt.coverage()?.iter().enumerate() {
                    if let Some(to) = substitutes.get(i) {
                        self.rewrite(covered.to_u32() as u16, to.get().to_u32() as u16);
                    }
                }
            }
        }
        Ok(())
    }

    /// One rule: every position currently holding `from` now holds `to`.
    fn rewrite(&mut self, from: u16, to: u16) {
        for slot in self.after.iter_mut().filter(|slot| **slot == from) {
            *slot = to;
        }
    }

    /// Pair the arrays off into the final total mapping.
    pub(crate) fn into_mapping(self) -> Result<SubstitutionMapping> {
        if self.before.len() != self.after.len() {
            return Err(Error::GlyphOrderOutOfSync {
                before: self.before.len(),
                after: self.after.len(),
            });
        }
        Ok(SubstitutionMapping { after: self.after })
    }
}

/// A total glyph → glyph mapping over the glyph order. Positions the
/// simulation never touched map to themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionMapping {
    after: Vec<u16>,
}

impl SubstitutionMapping {
    /// Where `gid` ends up. Glyphs outside the snapshot pass through.
    pub fn remap(&self, gid: u16) -> u16 {
        self.after.get(gid as usize).copied().unwrap_or(gid)
    }

    /// True when no position changed, i.e. there is nothing to bake in.
    pub fn is_identity(&self) -> bool {
        self.changed().next().is_none()
    }

    /// The non-identity pairs `(before, after)`, in glyph order.
    pub fn changed(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.after
            .iter()
            .enumerate()
            .filter(|(gid, to)| *gid != **to as usize)
            .map(|(gid, to)| (gid as u16, *to))
    }
}
