//! Text pipeline: tokenizer, dictionary lemmatizer and morphological analyzer
//!
//! Models are loaded once by [`NlpModels::load`] and shared for the process
//! lifetime. The public pipeline functions never fail: internal errors are
//! logged and become an empty result. A missing analyzer is reported with
//! the one-element [`MorphTriple::unavailable`] sentinel instead.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::NlpConfig;
use crate::error::NlpError;
use crate::lexicon::Lexicon;
use crate::morphology::{Analysis, MorphAnalyzer, RuleAnalyzer};
use crate::tokenizer::{self, check_length};
use crate::types::{LemmaPair, MorphTriple, Token};

#[derive(Debug, Clone)]
pub struct NlpModels {
    lexicon: Lexicon,
    analyzer: Option<Arc<dyn MorphAnalyzer>>,
    max_input_chars: usize,
}

impl NlpModels {
    /// Load every model named by the config; failures degrade, never abort
    pub fn load(config: &NlpConfig) -> Self {
        let lexicon = match &config.lexicon {
            Some(path) => match Lexicon::with_file(path) {
                Ok(lexicon) => {
                    info!(path = %path.display(), forms = lexicon.len(), "Loaded lexicon");
                    lexicon
                }
                Err(e) => {
                    warn!("{}, using built-in lexicon", e);
                    Lexicon::builtin()
                }
            },
            None => Lexicon::builtin(),
        };

        let analyzer: Option<Arc<dyn MorphAnalyzer>> = if !config.morphology {
            info!("Morphological analyzer disabled");
            None
        } else {
            match &config.morph_model {
                Some(path) => match RuleAnalyzer::with_model_file(lexicon.clone(), path) {
                    Ok(analyzer) => {
                        info!(path = %path.display(), "Loaded morphological model");
                        Some(Arc::new(analyzer))
                    }
                    Err(e) => {
                        warn!("{}, morphological analysis unavailable", e);
                        None
                    }
                },
                None => Some(Arc::new(RuleAnalyzer::builtin(lexicon.clone()))),
            }
        };

        Self {
            lexicon,
            analyzer,
            max_input_chars: config.max_input_chars,
        }
    }

    /// Built-in models with default limits
    pub fn builtin() -> Self {
        Self::load(&NlpConfig::default())
    }

    /// Built-in lexicon only; the analyzer is unavailable
    pub fn without_analyzer() -> Self {
        Self::load(&NlpConfig {
            morphology: false,
            ..NlpConfig::default()
        })
    }

    pub fn morphology_available(&self) -> bool {
        self.analyzer.is_some()
    }

    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    // ========================================================================
    // Fallible pipeline
    // ========================================================================

    pub fn try_tokenize(&self, text: &str) -> Result<Vec<Token>, NlpError> {
        tokenizer::try_tokenize(text, self.max_input_chars)
    }

    pub fn try_lemmatize_basic(&self, text: &str) -> Result<Vec<LemmaPair>, NlpError> {
        Ok(self
            .try_tokenize(text)?
            .into_iter()
            .map(|token| LemmaPair {
                lemma: self.lexicon.lemmatize(&token.text),
                surface: token.text,
            })
            .collect())
    }

    /// `Ok(None)` when the analyzer is not loaded
    pub fn try_analyze(&self, text: &str) -> Result<Option<Analysis>, NlpError> {
        let Some(analyzer) = &self.analyzer else {
            return Ok(None);
        };
        check_length(text, self.max_input_chars)?;
        Ok(Some(analyzer.analyze(text)))
    }

    // ========================================================================
    // Total pipeline
    // ========================================================================

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.try_tokenize(text).unwrap_or_else(|e| {
            warn!("Tokenization failed: {}", e);
            Vec::new()
        })
    }

    pub fn lemmatize_basic(&self, text: &str) -> Vec<LemmaPair> {
        self.try_lemmatize_basic(text).unwrap_or_else(|e| {
            warn!("Lemmatization failed: {}", e);
            Vec::new()
        })
    }

    pub fn lemmatize_morphological(&self, text: &str) -> Vec<MorphTriple> {
        match self.try_analyze(text) {
            Ok(Some(analysis)) => analysis.to_triples(),
            Ok(None) => vec![MorphTriple::unavailable()],
            Err(e) => {
                warn!("Morphological analysis failed: {}", e);
                Vec::new()
            }
        }
    }
}
