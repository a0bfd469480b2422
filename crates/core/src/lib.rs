//! Spanish conversational assistant core library
//!
//! This crate provides the core functionality behind the `charla` assistant:
//! - Dialogue control (greeting gate, single pending slot, exit phrases)
//! - Text processing (tokenizer, dictionary lemmatizer, morphological analyzer)
//! - Golf club recommendation (parameter extraction and club rules)
//! - A single-worker session that feeds a conversation surface

pub mod types;

pub mod backend;
pub mod clubs;
pub mod config;
pub mod error;
pub mod extract;
pub mod golf;
pub mod intent;
pub mod lexicon;
pub mod morphology;
pub mod nlp;
pub mod numerals;
pub mod router;
pub mod session;
pub mod text_processing;
pub mod tokenizer;

#[cfg(test)]
mod proptests;

// Re-export commonly used types at crate root
pub use types::{
    CommandKind, ConversationState, ElevationKind, GolfQuery, LemmaPair, MorphTriple,
    Recommendation, Reply, Response, Role, Status, TerrainKind, Token,
};

pub use backend::{Backend, Recognition};
pub use config::Config;
pub use error::{BackendError, ConfigError, NlpError};
pub use golf::GolfAdvisor;
pub use nlp::NlpModels;
pub use router::{DialogueRouter, Turn};
pub use session::{SessionHandle, SurfaceEvent};
pub use text_processing::TextProcessor;
