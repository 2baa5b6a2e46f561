use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The short list used by the first version of the filer.
const COMPACT: &[&str] = &[
    "der", "die", "das", "und", "mit", "von", "für", "ist", "ein", "eine",
];

/// The full list. Entries shorter than three letters or containing umlauts can
/// never survive tokenization; they stay listed so the set reads as a plain
/// German stopword list.
const EXTENDED: &[&str] = &[
    // articles & determiners
    "der", "die", "das", "den", "dem", "des", "ein", "eine", "einem", "einen", "einer", "eines",
    "alle", "jede", "jeder", "jedes",
    // prepositions
    "mit", "von", "für", "in", "zu", "auf", "als", "nach", "bei", "an", "im", "um", "aus",
    "über", "vor", "zum", "zur", "durch", "wegen", "bis", "am",
    // conjunctions
    "und", "aber", "oder", "wenn", "weil", "dass", "daß", "denn", "wie", "so",
    // particles
    "nur", "noch", "schon", "auch", "nicht", "sehr",
    // auxiliaries
    "ist", "wird", "werden", "wurde", "wurden", "haben", "hat", "hatte", "hatten",
    "sein", "sind", "war", "waren",
    // pronouns
    "ihr", "ihre", "seinen", "seiner", "ihrem",
];

lazy_static! {
    static ref COMPACT_SET: HashSet<&'static str> = COMPACT.iter().copied().collect();
    static ref EXTENDED_SET: HashSet<&'static str> = EXTENDED.iter().copied().collect();
}

/// Which stopword list the detector filters with.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StopwordPolicy {
    Compact,
    #[default]
    Extended,
}

impl StopwordPolicy {
    pub fn words(&self) -> &'static HashSet<&'static str> {
        match self {
            StopwordPolicy::Compact => &COMPACT_SET,
            StopwordPolicy::Extended => &EXTENDED_SET,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words().contains(word)
    }

    pub fn name(&self) -> &'static str {
        match self {
            StopwordPolicy::Compact => "compact",
            StopwordPolicy::Extended => "extended",
        }
    }
}

impl std::str::FromStr for StopwordPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(StopwordPolicy::Compact),
            "extended" => Ok(StopwordPolicy::Extended),
            other => Err(format!("unknown stopword list '{}' (expected compact or extended)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_is_a_superset_of_compact() {
        let compact = StopwordPolicy::Compact.words();
        let extended = StopwordPolicy::Extended.words();
        assert!(compact.is_subset(extended));
        assert!(extended.len() > compact.len());
    }

    #[test]
    fn lists_hold_function_words_only() {
        for policy in [StopwordPolicy::Compact, StopwordPolicy::Extended] {
            assert!(policy.contains("und"));
            assert!(policy.contains("der"));
            assert!(!policy.contains("rechnung"));
            assert!(!policy.contains("vertrag"));
        }
        assert!(StopwordPolicy::Extended.contains("werden"));
        assert!(!StopwordPolicy::Compact.contains("werden"));
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Compact".parse::<StopwordPolicy>(), Ok(StopwordPolicy::Compact));
        assert_eq!(" extended ".parse::<StopwordPolicy>(), Ok(StopwordPolicy::Extended));
        assert!("english".parse::<StopwordPolicy>().is_err());
    }

    #[test]
    fn policy_serializes_lowercase() {
        let json = serde_json::to_string(&StopwordPolicy::Compact).unwrap();
        assert_eq!(json, "\"compact\"");
        let back: StopwordPolicy = serde_json::from_str("\"extended\"").unwrap();
        assert_eq!(back, StopwordPolicy::Extended);
    }
}
