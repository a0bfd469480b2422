//! Dictionary lemmatizer
//!
//! Looks each form up in a form→lemma table and otherwise applies the
//! noun-default plural rules. No part-of-speech context is used.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::NlpError;

/// Built-in forms that the plural rules would get wrong or cannot reach
const BUILTIN_FORMS: &[(&str, &str)] = &[
    // Articles and determiners
    ("la", "el"),
    ("los", "el"),
    ("las", "el"),
    ("una", "uno"),
    ("unos", "uno"),
    ("unas", "uno"),
    ("un", "uno"),
    ("al", "a"),
    ("del", "de"),
    // Irregular or ambiguous plurals
    ("yardas", "yarda"),
    ("metros", "metro"),
    ("mts", "metro"),
    ("palos", "palo"),
    ("hierros", "hierro"),
    ("maderas", "madera"),
    ("hoyos", "hoyo"),
    ("greens", "green"),
    ("bunkers", "bunker"),
    ("tees", "tee"),
    ("ordenadores", "ordenador"),
    ("lápices", "lápiz"),
    ("jóvenes", "joven"),
    ("exámenes", "examen"),
    ("imágenes", "imagen"),
    ("caracteres", "carácter"),
    ("regímenes", "régimen"),
];

/// Words ending in `s` that are already singular
const SINGULAR_S: &[&str] = &[
    "mes", "tres", "seis", "dos", "pues", "menos", "lunes", "martes", "miércoles", "jueves",
    "viernes", "crisis", "análisis", "tenis", "gas", "lejos", "tras", "mientras", "atlas",
    "virus", "bus", "ómnibus", "campus", "caos", "dios", "tórax", "entonces", "apenas",
    "quizás", "demás", "jamás", "además", "través", "cortés", "país", "anís", "gris",
];

/// Extra forms loaded from a TOML `[forms]` table
#[derive(Debug, Default, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    forms: HashMap<String, String>,
}

/// Form→lemma dictionary with plural fallback rules
#[derive(Debug, Clone)]
pub struct Lexicon {
    forms: HashMap<String, String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    pub fn builtin() -> Self {
        let forms = BUILTIN_FORMS
            .iter()
            .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
            .collect();
        Self { forms }
    }

    /// Built-in table plus the `[forms]` of a TOML file
    pub fn with_file(path: &Path) -> Result<Self, NlpError> {
        let content = fs::read_to_string(path).map_err(|source| NlpError::ModelRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file: LexiconFile = toml::from_str(&content).map_err(|source| NlpError::ModelParse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut lexicon = Self::builtin();
        for (form, lemma) in file.forms {
            lexicon.insert(&form, &lemma);
        }
        Ok(lexicon)
    }

    fn insert(&mut self, form: &str, lemma: &str) {
        self.forms.insert(form.to_lowercase(), lemma.to_lowercase());
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Base form of a case-folded word
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = self.forms.get(word) {
            return lemma.clone();
        }
        singular_noun(word)
    }
}

/// Noun-default plural stripping
pub fn singular_noun(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();

    if n <= 3 || !word.ends_with('s') || SINGULAR_S.contains(&word) {
        return word.to_string();
    }
    if !chars.iter().all(|c| c.is_alphabetic()) {
        return word.to_string();
    }
    // Stressed final syllable (país, después) is a singular ending
    if matches!(chars[n - 2], 'á' | 'é' | 'í' | 'ó' | 'ú') {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("iones") {
        return format!("{}ión", stem);
    }
    if let Some(stem) = word.strip_suffix("ces") {
        return format!("{}z", stem);
    }
    if word.ends_with("dades") || word.ends_with("tudes") {
        return strip_chars(word, 2);
    }
    // árboles -> árbol, but calles -> calle and padres -> padre
    if ["les", "res", "nes", "yes"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        let before = chars[n - 4];
        return if is_vowel(before) {
            strip_chars(word, 2)
        } else {
            strip_chars(word, 1)
        };
    }
    if is_vowel(chars[n - 2]) {
        return strip_chars(word, 1);
    }
    word.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'á' | 'é' | 'í' | 'ó' | 'ú')
}

fn strip_chars(word: &str, count: usize) -> String {
    let keep = word.chars().count().saturating_sub(count);
    word.chars().take(keep).collect()
}
