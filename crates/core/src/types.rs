//! Domain models shared by the dialogue controller and its backends
//!
//! This module contains the core types used throughout the assistant, including:
//! - Conversation state and command kinds
//! - Text-processing results (tokens, lemma pairs, morphological triples)
//! - Golf query and recommendation values
//! - Controller responses and status indicators

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ============================================================================
// Conversation State
// ============================================================================

/// Commands a backend can be asked to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Tokenize,
    LemmatizeBasic,
    LemmatizeMorphological,
    /// Implicit command of the golf assistant: every utterance is a query
    GolfQuery,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Tokenize => "tokenize",
            CommandKind::LemmatizeBasic => "lemmatize_basic",
            CommandKind::LemmatizeMorphological => "lemmatize_morphological",
            CommandKind::GolfQuery => "golf_query",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session dialogue state.
///
/// `greeted` only ever goes from false to true. At most one command is
/// pending; while it is, the next utterance answers it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub greeted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_command: Option<CommandKind>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Text-Processing Results
// ============================================================================

/// A case-folded surface token with its 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub position: usize,
}

/// Surface token and its dictionary base form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaPair {
    pub surface: String,
    pub lemma: String,
}

/// Marker surface of the single-element result returned when the analyzer
/// is not loaded
pub const MORPH_UNAVAILABLE: &str = "Error: model unavailable";

/// Surface token, lemma and coarse part-of-speech tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphTriple {
    pub surface: String,
    pub lemma: String,
    pub pos: String,
}

impl MorphTriple {
    pub fn unavailable() -> Self {
        Self {
            surface: MORPH_UNAVAILABLE.to_string(),
            lemma: String::new(),
            pos: String::new(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.surface == MORPH_UNAVAILABLE && self.lemma.is_empty() && self.pos.is_empty()
    }
}

/// True when a morphological result is exactly the unavailable-model sentinel
pub fn is_unavailable_result(triples: &[MorphTriple]) -> bool {
    matches!(triples, [only] if only.is_unavailable())
}

// ============================================================================
// Golf Domain
// ============================================================================

/// Ground the ball is lying on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    Fairway,
    Rough,
    Bunker,
    Tee,
    Green,
    Unknown,
}

impl TerrainKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerrainKind::Fairway => "fairway",
            TerrainKind::Rough => "rough",
            TerrainKind::Bunker => "bunker",
            TerrainKind::Tee => "tee",
            TerrainKind::Green => "green",
            TerrainKind::Unknown => "desconocido",
        }
    }
}

/// Slope between the ball and the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationKind {
    Uphill,
    Downhill,
    Flat,
}

impl ElevationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElevationKind::Uphill => "subida",
            ElevationKind::Downhill => "bajada",
            ElevationKind::Flat => "plano",
        }
    }

    /// Multiplier applied to the raw distance before the club table scan
    pub fn distance_factor(&self) -> f64 {
        match self {
            ElevationKind::Uphill => 1.10,
            ElevationKind::Downhill => 0.90,
            ElevationKind::Flat => 1.0,
        }
    }
}

/// Parameters extracted from one golf utterance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GolfQuery {
    pub distance_yards: f64,
    pub terrain: TerrainKind,
    pub elevation: ElevationKind,
}

/// Recommended club plus the reason shown to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub club: String,
    pub justification: String,
}

// ============================================================================
// Controller Output
// ============================================================================

/// A message for the conversation surface, optionally with an ordered result list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            results: Vec::new(),
        }
    }

    pub fn with_results(text: impl Into<String>, results: Vec<String>) -> Self {
        Self {
            text: text.into(),
            results,
        }
    }
}

/// What the controller wants the surface to do after a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Message(Reply),
    /// Show the farewell, then end the session once `delay` has elapsed
    Terminate { farewell: String, delay: Duration },
}

impl Response {
    pub fn is_terminate(&self) -> bool {
        matches!(self, Response::Terminate { .. })
    }
}

/// Observational status indicator shown by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ready,
    Processing,
    Closing,
}

impl Status {
    pub fn label(&self, assistant_name: &str) -> String {
        match self {
            Status::Ready => format!("{} listo para procesar texto", assistant_name),
            Status::Processing => format!("{} está procesando...", assistant_name),
            Status::Closing => "Cerrando aplicación...".to_string(),
        }
    }
}

/// Who authored a displayed message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}
