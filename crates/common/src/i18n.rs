//! User-facing strings in French and English.
//!
//! A [`Translator`] is an ordinary value: build one from the configured
//! [`Language`] and pass it to the code that prints messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the tool ships translations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0} (expected fr or en)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

const FR: &[(&str, &str)] = &[
    ("campaign.created", "Campagne créée"),
    ("campaign.imported", "Campagne importée"),
    ("campaign.exported", "Campagne exportée"),
    ("campaign.name", "Nom"),
    ("campaign.version", "Version"),
    ("campaign.characters", "Personnages"),
    ("campaign.scenes", "Scènes"),
    ("campaign.sessions", "Sessions"),
    ("campaign.updated", "Modifié le"),
    ("history.title", "Historique des versions"),
    ("history.empty", "Aucune version enregistrée"),
    ("history.no_description", "(sans description)"),
    ("save.created", "Version enregistrée"),
    ("save.unchanged", "Aucune modification depuis la dernière version"),
    ("rollback.done", "Version restaurée"),
    ("character.added", "Personnage ajouté"),
    ("scene.added", "Scène ajoutée"),
    ("session.added", "Session ajoutée"),
    ("language.set", "Langue définie"),
    (
        "error.rollback_not_found",
        "Échec de la restauration : version introuvable",
    ),
    (
        "error.rollback_failed",
        "Échec de la restauration : historique illisible ou non inscriptible",
    ),
    ("error.export_failed", "Échec de l'export"),
    (
        "error.save_failed",
        "Échec de l'enregistrement : impossible d'écrire l'historique des versions",
    ),
];

const EN: &[(&str, &str)] = &[
    ("campaign.created", "Campaign created"),
    ("campaign.imported", "Campaign imported"),
    ("campaign.exported", "Campaign exported"),
    ("campaign.name", "Name"),
    ("campaign.version", "Version"),
    ("campaign.characters", "Characters"),
    ("campaign.scenes", "Scenes"),
    ("campaign.sessions", "Sessions"),
    ("campaign.updated", "Modified"),
    ("history.title", "Version history"),
    ("history.empty", "No versions recorded"),
    ("history.no_description", "(no description)"),
    ("save.created", "Version saved"),
    ("save.unchanged", "No changes since the last version"),
    ("rollback.done", "Version restored"),
    ("character.added", "Character added"),
    ("scene.added", "Scene added"),
    ("session.added", "Session added"),
    ("language.set", "Language set"),
    ("error.rollback_not_found", "Rollback failed: version not found"),
    (
        "error.rollback_failed",
        "Rollback failed: version history could not be read or written",
    ),
    ("error.export_failed", "Export failed"),
    (
        "error.save_failed",
        "Save failed: could not write version history",
    ),
];

/// Looks up translated strings for one language.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Translated text for `key`, or the key itself when no entry exists.
    pub fn text<'a>(&self, key: &'a str) -> &'a str {
        let table = match self.language {
            Language::Fr => FR,
            Language::En => EN,
        };
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_case_insensitively() {
        assert_eq!("fr".parse::<Language>(), Ok(Language::Fr));
        assert_eq!(" EN ".parse::<Language>(), Ok(Language::En));
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn language_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
        let lang: Language = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(lang, Language::Fr);
    }

    #[test]
    fn translator_switches_tables() {
        let fr = Translator::new(Language::Fr);
        let en = Translator::new(Language::En);
        assert_eq!(fr.text("scene.added"), "Scène ajoutée");
        assert_eq!(en.text("scene.added"), "Scene added");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let t = Translator::new(Language::En);
        assert_eq!(t.text("no.such.key"), "no.such.key");
    }

    #[test]
    fn both_tables_cover_the_same_keys() {
        let mut fr: Vec<_> = FR.iter().map(|(k, _)| *k).collect();
        let mut en: Vec<_> = EN.iter().map(|(k, _)| *k).collect();
        fr.sort_unstable();
        en.sort_unstable();
        assert_eq!(fr, en);
    }
}
