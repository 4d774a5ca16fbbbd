//! Feature-index and lookup-set selection from the GSUB table.

use std::collections::{BTreeSet, HashSet};

use read_fonts::tables::gsub::Gsub;

use crate::{
    Result,
    types::{FontReport, ScriptLangFilter},
};

/// Resolve which feature indices apply under the script/language filter.
///
/// Indices always come through the script list: the default language system
/// of every considered script, or only the matching language system when a
/// language filter is given. Contributions are unioned across scripts. Tag
/// comparison is exact — no case folding, no padding. An unmatched filter
/// yields an empty set, which is a valid selection meaning "nothing to do".
pub(crate) fn select_feature_indices(
    gsub: &Gsub,
    filter: &ScriptLangFilter,
) -> Result<BTreeSet<u16>> {
    let script_list = gsub.script_list()?;
    let mut indices = BTreeSet::new();

    for record in script_list.script_records() {
        if !filter.matches_script(&record.script_tag().to_string()) {
            continue;
        }
        let Ok(script) = record.script(script_list.offset_data()) else {
            continue;
        };
        if filter.lang.is_some() {
            for lang_record in script.lang_sys_records() {
                if !filter.matches_lang(&lang_record.lang_sys_tag().to_string()) {
                    continue;
                }
                if let Ok(lang_sys) = lang_record.lang_sys(script.offset_data()) {
                    indices.extend(lang_sys.feature_indices().iter().map(|i| i.get()));
                }
            }
        } else if let Some(Ok(lang_sys)) = script.default_lang_sys() {
            indices.extend(lang_sys.feature_indices().iter().map(|i| i.get()));
        }
    }
    log::debug!("selected feature indices: {indices:?}");
    Ok(indices)
}

/// Map the selected feature indices onto lookup indices, keeping only
/// features whose tag the caller asked for.
pub(crate) fn resolve_lookups(
    gsub: &Gsub,
    feature_indices: &BTreeSet<u16>,
    requested: &[String],
) -> Result<BTreeSet<u16>> {
    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let feature_list = gsub.feature_list()?;
    let records = feature_list.feature_records();
    let mut lookups = BTreeSet::new();

    for &index in feature_indices {
        let Some(record) = records.get(index as usize) else {
            continue;
        };
        if !requested.contains(record.feature_tag().to_string().as_str()) {
            continue;
        }
        if let Ok(feature) = record.feature(feature_list.offset_data()) {
            lookups.extend(feature.lookup_list_indices().iter().map(|i| i.get()));
        }
    }
    log::debug!("selected lookup indices: {lookups:?}");
    Ok(lookups)
}

/// Collect every (script[, language]) combination and every feature tag in
/// the font, unfiltered. Lines are sorted for stable output.
pub(crate) fn collect_report(gsub: &Gsub) -> Result<FontReport> {
    let script_list = gsub.script_list()?;
    let mut scripts = Vec::new();
    for record in script_list.script_records() {
        let tag = record.script_tag();
        scripts.push(format!("-s '{tag}'"));
        if let Ok(script) = record.script(script_list.offset_data()) {
            for lang_record in script.lang_sys_records() {
                scripts.push(format!("-s '{tag}' -l '{}'", lang_record.lang_sys_tag()));
            }
        }
    }
    scripts.sort();

    let features: Vec<String> = gsub
        .feature_list()?
        .feature_records()
        .iter()
        .map(|record| record.feature_tag().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    Ok(FontReport { scripts, features })
}
