//! Name-table rewriting consistent with the frozen substitution.

use read_fonts::{
    FontRef, TableProvider, TopLevelTable,
    tables::{cff::Cff, name::Name},
    types::NameId,
};
use write_fonts::tables::name as write_name;

use crate::{FreezeOptions, Result, font::FontEdit};

const FAMILY_RELATED: [u16; 5] = [1, 4, 16, 18, 21];
const NO_SPACE_NAMES: [u16; 2] = [6, 20];
const PLACEHOLDER_FAMILY: &str = "UnknownFamily";

/// Rewrite the name table for the requested suffix and replace rules,
/// returning the rebuilt font. Callers have already checked
/// [`FreezeOptions::wants_name_edits`].
pub(crate) fn rename_font(
    font: &FontRef,
    options: &FreezeOptions,
    warnings: &mut Vec<String>,
) -> Result<Vec<u8>> {
    let name = font.name()?;

    let family_old = primary_family_name(&name, warnings);
    let mut family = family_old.clone();

    if let Some(rules) = &options.replacenames {
        for entry in rules.split(',') {
            if entry.is_empty() {
                continue;
            }
            match entry.split_once('/') {
                Some((search, replace)) => family = family.replace(search, replace),
                None => warnings.push(format!(
                    "Invalid replacenames entry '{entry}', expected 'search/replace'; skipping."
                )),
            }
        }
    }

    let family_new = match options.suffix.text(&options.features) {
        Some(suffix) => format!("{family} {suffix}"),
        None => family,
    };
    let family_old_flat = family_old.replace(' ', "");
    let family_new_flat = family_new.replace(' ', "");
    let features_csv = options.features_csv();

    log::info!("new family name: '{family_new}'");

    let records: Vec<write_name::NameRecord> = name
        .name_record()
        .iter()
        .map(|record| {
            let text = record
                .string(name.string_data())
                .map(|s| s.to_string())
                .unwrap_or_default();
            let id = record.name_id().to_u16();
            let text = if FAMILY_RELATED.contains(&id) {
                text.replace(&family_old, &family_new)
            } else if NO_SPACE_NAMES.contains(&id) {
                text.replace(&family_old_flat, &family_new_flat)
            } else if id == 3 {
                format!("{text};featfreeze:{features_csv}")
            } else if id == 5 && options.info {
                format!("{text}; featfreeze: {features_csv}")
            } else {
                text
            };
            write_name::NameRecord::new(
                record.platform_id(),
                record.encoding_id(),
                record.language_id(),
                NameId::new(id),
                text.into(),
            )
        })
        .collect();

    if font.table_data(Cff::TAG).is_some() {
        warnings.push(
            "Font carries a CFF table; the CFF-internal family, full and font names \
             were left unchanged (no CFF compilation support)."
                .to_string(),
        );
    }

    FontEdit::new(font.clone())
        .rebuild(|builder| builder.add_table(&write_name::Name::new(records)).map(|_| ()))
}

/// The canonical family name: the typographic family (name ID 16) if
/// present, else the legacy family (name ID 1), both looked up under the
/// Windows/Unicode-BMP platform. Falls back to any name ID 1 record, then
/// to a placeholder.
fn primary_family_name(name: &Name, warnings: &mut Vec<String>) -> String {
    for id in [NameId::TYPOGRAPHIC_FAMILY_NAME, NameId::FAMILY_NAME] {
        if let Some(text) = windows_unicode_name(name, id) {
            return text;
        }
    }
    warnings.push(
        "Could not determine the primary family name from the name table; \
         falling back to any family record."
            .to_string(),
    );
    name.name_record()
        .iter()
        .find(|record| record.name_id() == NameId::FAMILY_NAME)
        .and_then(|record| record.string(name.string_data()).ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| PLACEHOLDER_FAMILY.to_string())
}

fn windows_unicode_name(name: &Name, id: NameId) -> Option<String> {
    name.name_record()
        .iter()
        .find(|record| {
            record.name_id() == id && record.platform_id() == 3 && record.encoding_id() == 1
        })
        .and_then(|record| record.string(name.string_data()).ok())
        .map(|s| s.to_string())
}
