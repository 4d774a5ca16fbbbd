//! Configuration and result types for freeze and report runs.

use std::collections::BTreeSet;
use std::fmt::{self, Formatter};

/// Options controlling a single freeze run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreezeOptions {
    /// Feature tags to freeze, in the order the caller gave them.
    pub features: Vec<String>,
    /// Optional script/language restriction for feature selection.
    pub filter: ScriptLangFilter,
    /// Family-name suffix behavior.
    pub suffix: Suffix,
    /// Comma-separated `search/replace` rules applied to the family name.
    pub replacenames: Option<String>,
    /// Append a freeze note to the version string (name ID 5).
    pub info: bool,
    /// Rewrite the `post` table at version 3.0 (no glyph names).
    pub zapnames: bool,
}

impl FreezeOptions {
    /// Options that freeze the given features with no renaming.
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            features: features.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// The name table is only touched when a suffix or replace rule was
    /// requested; the info flag alone does not trigger a rename.
    pub fn wants_name_edits(&self) -> bool {
        self.suffix.is_requested() || self.replacenames.is_some()
    }

    /// The requested features as they appear in name record annotations.
    pub(crate) fn features_csv(&self) -> String {
        self.features.join(",")
    }
}

/// Restricts feature selection to one OpenType script and/or language system.
///
/// Tags are compared exactly, including case and any trailing spaces
/// (e.g. `"SRB "`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptLangFilter {
    /// Script tag, e.g. `"cyrl"`.
    pub script: Option<String>,
    /// Language system tag, e.g. `"SRB "`.
    pub lang: Option<String>,
}

impl ScriptLangFilter {
    /// A filter from optional script and language tags.
    pub fn new(script: Option<String>, lang: Option<String>) -> Self {
        Self { script, lang }
    }

    pub(crate) fn matches_script(&self, tag: &str) -> bool {
        self.script.as_deref().is_none_or(|s| s == tag)
    }

    pub(crate) fn matches_lang(&self, tag: &str) -> bool {
        self.lang.as_deref() == Some(tag)
    }
}

/// How the family name is suffixed after freezing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Suffix {
    /// Leave the family name alone.
    #[default]
    None,
    /// Append the requested feature tags, sorted and space-joined.
    FromFeatures,
    /// Append a caller-supplied string.
    Custom(String),
}

impl Suffix {
    /// Whether any suffix was asked for, even one that may turn out empty.
    pub fn is_requested(&self) -> bool {
        !matches!(self, Suffix::None)
    }

    /// The suffix text for the given requested features, without the
    /// separating space. `None` when there is nothing to append.
    pub(crate) fn text(&self, features: &[String]) -> Option<String> {
        match self {
            Suffix::None => None,
            Suffix::Custom(s) => Some(s.clone()),
            Suffix::FromFeatures => {
                let tags: BTreeSet<&str> = features.iter().map(String::as_str).collect();
                if tags.is_empty() {
                    None
                } else {
                    Some(tags.into_iter().collect::<Vec<_>>().join(" "))
                }
            }
        }
    }
}

/// Everything a freeze run produces.
#[derive(Debug, Clone)]
pub struct FreezeResult {
    /// The rebuilt font binary.
    pub data: Vec<u8>,
    /// The total glyph mapping derived for this run.
    pub mapping: crate::SubstitutionMapping,
    /// Counters for the summary line.
    pub stats: FreezeStats,
    /// Soft conditions encountered along the way.
    pub warnings: Vec<String>,
    /// Names of substituted glyphs that are reachable from some codepoint,
    /// in glyph order.
    pub remapped_names: Vec<String>,
}

/// Counters describing what a freeze run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreezeStats {
    /// Number of feature tags the caller asked for.
    pub features_requested: usize,
    /// Number of distinct lookups simulated.
    pub lookups_applied: usize,
    /// Number of glyph order positions whose glyph changed.
    pub glyphs_remapped: usize,
}

impl fmt::Display for FreezeStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} features, {} lookups, {} glyphs remapped",
            self.features_requested, self.lookups_applied, self.glyphs_remapped
        )
    }
}

/// Scripts, language systems and feature tags discovered in a font.
///
/// `Display` produces the report format, each line ready to be passed back
/// as a command-line filter:
///
/// ```text
/// # Scripts and languages:
/// -s 'latn'
/// -s 'latn' -l 'MOL '
/// # Features:
/// -f lnum,onum,pnum,tnum
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontReport {
    /// One line per (script\[, language\]) combination, sorted.
    pub scripts: Vec<String>,
    /// Feature tags present in the FeatureList, sorted and deduplicated.
    pub features: Vec<String>,
}

impl fmt::Display for FontReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Scripts and languages:")?;
        for line in &self.scripts {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "# Features:")?;
        writeln!(f, "-f {}", self.features.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_from_features_sorts_and_dedups() {
        let features = vec!["smcp".to_string(), "c2sc".to_string(), "smcp".to_string()];
        assert_eq!(
            Suffix::FromFeatures.text(&features),
            Some("c2sc smcp".to_string())
        );
    }

    #[test]
    fn suffix_from_no_features_is_empty() {
        assert_eq!(Suffix::FromFeatures.text(&[]), None);
        assert_eq!(Suffix::None.text(&["smcp".to_string()]), None);
    }

    #[test]
    fn custom_suffix_wins_over_features() {
        let options = FreezeOptions {
            suffix: Suffix::Custom("SC".into()),
            ..FreezeOptions::new(["smcp"])
        };
        assert_eq!(options.suffix.text(&options.features), Some("SC".to_string()));
    }

    #[test]
    fn report_display_format() {
        let report = FontReport {
            scripts: vec!["-s 'latn'".into()],
            features: vec!["lnum".into(), "onum".into(), "pnum".into(), "tnum".into()],
        };
        assert_eq!(
            report.to_string(),
            "# Scripts and languages:\n-s 'latn'\n# Features:\n-f lnum,onum,pnum,tnum\n"
        );
    }

    #[test]
    fn info_alone_does_not_rename() {
        let options = FreezeOptions {
            info: true,
            ..FreezeOptions::new(["smcp"])
        };
        assert!(!options.wants_name_edits());
    }
}
