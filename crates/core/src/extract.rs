//! Golf parameter extraction: distance, terrain and elevation
//!
//! - Distance: token scan for a number (digits or spelled out) right before a
//!   unit word, with a regex fallback over the raw text
//! - Terrain and elevation: ordered synonym tables matched against lemma and
//!   surface n-grams, first table entry wins
//! - Elevation falls back to the modifiers of a copular verb when no term
//!   matches ("la bandera está más alta")

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::nlp::NlpModels;
use crate::numerals;
use crate::tokenizer::{is_numeric, split_words};
use crate::types::{ElevationKind, GolfQuery, TerrainKind};

static DISTANCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)*)\s*(yardas|metros|mts|m|y)\b").expect("Invalid regex")
});

/// Dots grouping digits in threes ("1.000", "12.500,5")
static THOUSANDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+(?:,\d+)?$").expect("Invalid regex"));

const UNITS: &[&str] = &["yardas", "yarda", "yds", "metros", "metro", "mts", "m", "y"];

/// Longest multi-word term in the tables below
const MAX_GRAM: usize = 3;

const TERRAIN_TERMS: &[(TerrainKind, &[&str])] = &[
    (TerrainKind::Fairway, &["fairway", "calle", "callejón", "pista"]),
    (
        TerrainKind::Rough,
        &["rough", "hierba", "maleza", "pasto", "césped alto"],
    ),
    (
        TerrainKind::Bunker,
        &["bunker", "trampa de arena", "arena", "arenero", "trampa"],
    ),
    (
        TerrainKind::Tee,
        &["tee", "salida", "punto de salida", "lanzamiento"],
    ),
    (
        TerrainKind::Green,
        &["green", "verde", "copa", "bandera", "hoyo"],
    ),
];

const ELEVATION_TERMS: &[(ElevationKind, &[&str])] = &[
    (
        ElevationKind::Uphill,
        &["subir", "ascender", "arriba", "elevado", "cuesta arriba", "subida"],
    ),
    (
        ElevationKind::Downhill,
        &["bajar", "descender", "abajo", "hacia abajo", "cuesta abajo", "bajada"],
    ),
    (ElevationKind::Flat, &["plano", "nivel", "igualado", "llano"]),
];

/// Copular-verb modifiers and the slope they describe
const MODIFIER_TERMS: &[(ElevationKind, &[&str])] = &[
    (
        ElevationKind::Uphill,
        &["alto", "elevado", "arriba", "encima", "subida"],
    ),
    (
        ElevationKind::Downhill,
        &["bajo", "abajo", "debajo", "bajada", "hundido"],
    ),
    (ElevationKind::Flat, &["plano", "llano", "nivel"]),
];

// ============================================================================
// N-gram Index
// ============================================================================

/// Every 1..=3 word sequence of an utterance, over lemmas and surface forms,
/// plus the copular modifiers found by the analyzer
#[derive(Debug, Default)]
pub struct TermIndex {
    grams: HashSet<String>,
    modifiers: Vec<String>,
}

impl TermIndex {
    /// Runs the analyzer at most once; without it lemmas come from the lexicon
    pub fn build(models: &NlpModels, text: &str) -> Self {
        let mut index = Self::default();

        let lemmas: Vec<String> = match models.try_analyze(text) {
            Ok(Some(analysis)) => {
                index.modifiers = analysis.copular_modifiers();
                analysis.tokens.into_iter().map(|t| t.lemma).collect()
            }
            Ok(None) => models
                .lemmatize_basic(text)
                .into_iter()
                .map(|pair| pair.lemma)
                .collect(),
            Err(e) => {
                warn!("Morphological analysis failed: {}", e);
                Vec::new()
            }
        };
        index.add_sequence(&lemmas);

        let surface: Vec<String> = models.tokenize(text).into_iter().map(|t| t.text).collect();
        index.add_sequence(&surface);
        index
    }

    fn add_sequence(&mut self, words: &[String]) {
        for n in 1..=MAX_GRAM {
            for window in words.windows(n) {
                self.grams.insert(window.join(" "));
            }
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.grams.contains(term)
    }

    /// First entry of an ordered table with a term present in the index
    pub fn first_match<T: Copy>(&self, table: &[(T, &[&str])]) -> Option<T> {
        table
            .iter()
            .find(|(_, terms)| terms.iter().any(|term| self.contains(term)))
            .map(|(kind, _)| *kind)
    }
}

// ============================================================================
// Extractors
// ============================================================================

/// Distance as written, in whatever unit the player used
pub fn extract_distance(text: &str) -> Option<f64> {
    scan_distance(text).or_else(|| regex_distance(text))
}

fn scan_distance(text: &str) -> Option<f64> {
    let folded = text.to_lowercase();
    let words = split_words(&folded);

    for (i, word) in words.iter().enumerate() {
        if i == 0 || !UNITS.contains(word) {
            continue;
        }
        let prev = words[i - 1];
        if is_numeric(prev) {
            if let Some(value) = parse_number(prev) {
                return Some(value);
            }
            continue;
        }
        // "y" is only a unit after digits ("150y"); elsewhere it joins numerals
        if *word == "y" {
            continue;
        }
        if let Some(value) = spelled_before(&words[..i]) {
            return Some(f64::from(value));
        }
    }

    None
}

/// Value of the run of number words that ends the slice
fn spelled_before(words: &[&str]) -> Option<u32> {
    let start = words
        .iter()
        .rposition(|w| *w != "y" && numerals::word_value(w).is_none())
        .map_or(0, |p| p + 1);
    let run = &words[start..];
    let run = match run.first() {
        Some(&"y") => &run[1..],
        _ => run,
    };
    if run.is_empty() {
        return None;
    }
    numerals::parse_spelled(run)
}

fn regex_distance(text: &str) -> Option<f64> {
    DISTANCE_RE
        .captures(text)
        .and_then(|caps| parse_number(&caps[1]))
}

/// Digits with either decimal mark; dots grouping threes are thousands
fn parse_number(token: &str) -> Option<f64> {
    let token = if THOUSANDS_RE.is_match(token) {
        token.replace('.', "")
    } else {
        token.to_string()
    };
    token.replace(',', ".").parse().ok()
}

pub fn extract_terrain(index: &TermIndex) -> TerrainKind {
    index
        .first_match(TERRAIN_TERMS)
        .unwrap_or(TerrainKind::Unknown)
}

pub fn extract_elevation(index: &TermIndex) -> ElevationKind {
    if let Some(elevation) = index.first_match(ELEVATION_TERMS) {
        return elevation;
    }

    for modifier in &index.modifiers {
        if let Some((elevation, _)) = MODIFIER_TERMS
            .iter()
            .find(|(_, terms)| terms.contains(&modifier.as_str()))
        {
            debug!(%modifier, elevation = elevation.as_str(), "Elevation from copular modifier");
            return *elevation;
        }
    }

    ElevationKind::Flat
}

/// All three parameters, or `None` when no distance was given
pub fn extract_query(index: &TermIndex, text: &str) -> Option<GolfQuery> {
    let distance_yards = extract_distance(text)?;
    Some(GolfQuery {
        distance_yards,
        terrain: extract_terrain(index),
        elevation: extract_elevation(index),
    })
}
