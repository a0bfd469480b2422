//! Keyword-based utterance classification
//!
//! Simple substring matching over case-folded text: exit phrases, greetings
//! and the text-processing command phrases.

use crate::types::CommandKind;

/// Exit phrases that end the session right away
const IMMEDIATE_EXITS: &[&str] = &["salir", "chao", "exit", "quit", "bye"];

/// Exit phrases that end the session after the farewell delay
const SOFT_EXITS: &[&str] = &["adiós", "adios", "gracias", "hasta luego"];

const GREETINGS: &[&str] = &[
    "hola",
    "buenas",
    "qué tal",
    "que tal",
    "hey",
    "buenos días",
    "buenos dias",
    "buenas tardes",
    "buenas noches",
    "saludos",
];

/// Command phrases in recognition order
const COMMAND_PHRASES: &[(CommandKind, &[&str])] = &[
    (CommandKind::Tokenize, &["tokeniza", "tokenizar"]),
    (
        CommandKind::LemmatizeBasic,
        &[
            "lematiza con nltk",
            "lematizar nltk",
            "lematiza con diccionario",
            "lematizar diccionario",
        ],
    ),
    (
        CommandKind::LemmatizeMorphological,
        &[
            "lematiza con spacy",
            "lematizar spacy",
            "lematiza con morfología",
            "lematiza con morfologia",
            "lematizar morfología",
            "lematizar morfologia",
            "análisis morfológico",
            "analisis morfologico",
        ],
    ),
];

/// How an exit phrase wants the session to end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Immediate,
    Delayed,
}

/// Lowercase and trim; all matching runs on this form
pub fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

/// Detect an exit phrase in a normalized utterance
pub fn detect_exit(normalized: &str) -> Option<ExitKind> {
    if IMMEDIATE_EXITS.iter().any(|p| normalized.contains(p)) {
        Some(ExitKind::Immediate)
    } else if SOFT_EXITS.iter().any(|p| normalized.contains(p)) {
        Some(ExitKind::Delayed)
    } else {
        None
    }
}

pub fn is_greeting(normalized: &str) -> bool {
    GREETINGS.iter().any(|g| normalized.contains(g))
}

/// First command whose phrase appears in a normalized utterance
pub fn recognize_command(normalized: &str) -> Option<CommandKind> {
    COMMAND_PHRASES
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| normalized.contains(p)))
        .map(|(kind, _)| *kind)
}
