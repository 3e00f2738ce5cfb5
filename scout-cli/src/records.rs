//! Structured answers produced by the two programs.
//!
//! The JSON schema sent to the model is generated from these types, so field
//! names and doc comments are part of the prompt.

use std::ops::RangeInclusive;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A short travel guide for a country's capital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CityGuide {
    /// Country the guide is about.
    pub country: String,
    /// Capital city of the country.
    pub capital: String,
    /// One or two sentence summary of the capital.
    pub summary: String,
    /// Four to six famous places in the capital.
    pub famous_places: Vec<String>,
    /// Three to five things to do in the capital.
    pub things_to_do: Vec<String>,
}

impl CityGuide {
    /// Preferred number of famous places.
    pub const FAMOUS_PLACES: RangeInclusive<usize> = 4..=6;
    /// Preferred number of things to do.
    pub const THINGS_TO_DO: RangeInclusive<usize> = 3..=5;
    /// Preferred maximum number of summary sentences.
    pub const MAX_SUMMARY_SENTENCES: usize = 2;

    /// Length hints from the prompt that this guide does not meet.
    ///
    /// These are advisory; a guide with advisories is still a valid answer.
    #[must_use]
    pub fn advisories(&self) -> Vec<String> {
        let mut notes = Vec::new();

        let sentences = sentence_count(&self.summary);
        if sentences > Self::MAX_SUMMARY_SENTENCES {
            notes.push(format!(
                "summary has {sentences} sentences, expected at most {}",
                Self::MAX_SUMMARY_SENTENCES
            ));
        }
        if !Self::FAMOUS_PLACES.contains(&self.famous_places.len()) {
            notes.push(format!(
                "{} famous places, expected {}-{}",
                self.famous_places.len(),
                Self::FAMOUS_PLACES.start(),
                Self::FAMOUS_PLACES.end()
            ));
        }
        if !Self::THINGS_TO_DO.contains(&self.things_to_do.len()) {
            notes.push(format!(
                "{} things to do, expected {}-{}",
                self.things_to_do.len(),
                Self::THINGS_TO_DO.start(),
                Self::THINGS_TO_DO.end()
            ));
        }
        notes
    }
}

/// Number of sentences in `text`.
///
/// A `.`, `!` or `?` closes a sentence only at the end of the text or before
/// whitespace that is not followed by a lowercase letter, so abbreviations
/// such as `D.C.` and decimals such as `2.0` stay inside their sentence.
/// Trailing text without a terminator counts as one more sentence.
fn sentence_count(text: &str) -> usize {
    let mut count = 0;
    let mut open = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            continue;
        }
        open = true;
        if matches!(c, '.' | '!' | '?') && closes_sentence(&text[i + c.len_utf8()..]) {
            count += 1;
            open = false;
        }
    }
    count + usize::from(open)
}

fn closes_sentence(rest: &str) -> bool {
    if rest.is_empty() {
        return true;
    }
    rest.starts_with(char::is_whitespace)
        && rest
            .trim_start()
            .chars()
            .next()
            .is_none_or(|next| !next.is_lowercase())
}

/// Answer to a research question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchResponse {
    /// Concise answer to the question.
    pub summary: String,
    /// Topic the question is about.
    pub topic: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> CityGuide {
        CityGuide {
            country: "France".into(),
            capital: "Paris".into(),
            summary: "Paris is the capital of France.".into(),
            famous_places: vec![
                "Eiffel Tower".into(),
                "Louvre".into(),
                "Notre-Dame".into(),
                "Sacre-Coeur".into(),
            ],
            things_to_do: vec![
                "Seine cruise".into(),
                "Cafe hopping".into(),
                "Museum visits".into(),
            ],
        }
    }

    fn washington() -> CityGuide {
        CityGuide {
            country: "USA".into(),
            capital: "Washington, D.C.".into(),
            summary: "Washington, D.C. is the capital of the USA.".into(),
            famous_places: vec![
                "Lincoln Memorial".into(),
                "U.S. Capitol".into(),
                "White House".into(),
                "Smithsonian museums".into(),
            ],
            things_to_do: vec![
                "Walk the National Mall".into(),
                "Tour the Library of Congress".into(),
                "See the cherry blossoms".into(),
            ],
        }
    }

    #[test]
    fn test_conforming_guide_has_no_advisories() {
        assert!(paris().advisories().is_empty());
        assert!(washington().advisories().is_empty());
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("Washington, D.C. is the capital of the USA."), 1);
        assert_eq!(sentence_count("Paris is the capital. It is lovely!"), 2);
        assert_eq!(sentence_count("Version 2.0 shipped. Try it"), 2);
        assert_eq!(sentence_count("Really?! Yes... I think so."), 3);
        assert_eq!(sentence_count("   "), 0);
    }

    #[test]
    fn test_short_lists_are_advisories_not_errors() {
        let mut guide = paris();
        guide.famous_places.truncate(2);
        guide.things_to_do.clear();
        guide.summary = "One. Two. Three.".into();

        let notes = guide.advisories();
        assert_eq!(notes.len(), 3);
        assert!(notes[0].contains("3 sentences"));
        assert!(notes[1].contains("2 famous places"));
        assert!(notes[2].contains("0 things to do"));
    }

    #[test]
    fn test_schema_lists_every_field_as_required() {
        let schema = schemars::schema_for!(CityGuide).to_value();
        let required = schema["required"].as_array().expect("required array");
        for field in ["country", "capital", "summary", "famous_places", "things_to_do"] {
            assert!(required.iter().any(|v| v == field), "{field} not required");
        }
    }

    #[test]
    fn test_missing_field_fails_to_decode() {
        let err = serde_json::from_str::<ResearchResponse>(r#"{"topic": "Java"}"#)
            .expect_err("summary is required");
        assert!(err.to_string().contains("summary"));
    }
}
