//! Text-processing backend: tokenize, lemmatize, analyze morphology

use std::sync::Arc;
use tracing::debug;

use crate::backend::{Backend, Recognition};
use crate::error::BackendError;
use crate::intent::recognize_command;
use crate::nlp::NlpModels;
use crate::types::{is_unavailable_result, CommandKind, Reply};

const HELP: &str = "No entendí tu solicitud.

Los comandos disponibles son:
• 'tokeniza con nltk' - Para separar texto en tokens
• 'lematiza con nltk' - Para lematización básica
• 'lematiza con spacy' - Para análisis morfológico completo

¿Cuál te gustaría probar?";

const MORPHOLOGY_UNAVAILABLE: &str =
    "Lo siento, el análisis morfológico no está disponible. Revisa la opción [nlp] morphology de la configuración.";

pub struct TextProcessor {
    models: Arc<NlpModels>,
}

impl TextProcessor {
    pub fn new(models: Arc<NlpModels>) -> Self {
        Self { models }
    }

    fn tokenize(&self, text: &str) -> Reply {
        let tokens = self.models.tokenize(text);
        if tokens.is_empty() {
            return Reply::text("No se pudieron obtener tokens del texto.");
        }
        let results = tokens
            .iter()
            .map(|t| format!("{:15} (posición {})", t.text, t.position))
            .collect();
        Reply::with_results(format!("Tokenización completada para: '{}'", text), results)
    }

    fn lemmatize_basic(&self, text: &str) -> Reply {
        let pairs = self.models.lemmatize_basic(text);
        if pairs.is_empty() {
            return Reply::text("No se pudieron obtener lemas del texto.");
        }
        let results = pairs
            .iter()
            .map(|p| format!("{:15} → {}", p.surface, p.lemma))
            .collect();
        Reply::with_results(
            format!("Lematización básica completada para: '{}'", text),
            results,
        )
    }

    fn lemmatize_morphological(&self, text: &str) -> Reply {
        let triples = self.models.lemmatize_morphological(text);
        if triples.is_empty() || is_unavailable_result(&triples) {
            return Reply::text("Error en el análisis morfológico.");
        }
        let results = triples
            .iter()
            .map(|t| format!("{:12} → {:12} [{}]", t.surface, t.lemma, t.pos))
            .collect();
        Reply::with_results(
            format!("Análisis morfológico completado para: '{}'", text),
            results,
        )
    }
}

impl Backend for TextProcessor {
    fn welcome(&self, assistant_name: &str) -> String {
        format!(
            "¡Bienvenido a {}!

Soy tu asistente para procesamiento de lenguaje natural. Para comenzar, salúdame primero.

Después podrás usar estos comandos:
• 'tokeniza con nltk' - Separar texto en tokens individuales
• 'lematiza con nltk' - Encontrar la raíz de las palabras
• 'lematiza con spacy' - Análisis morfológico completo

Escribe 'salir', 'adiós' o 'chao' cuando quieras terminar.",
            assistant_name
        )
    }

    fn onboarding(&self) -> String {
        "¡Hola! ¿Cómo estás? Ahora ya puedes usar mis funciones de procesamiento de texto."
            .to_string()
    }

    fn recognize(&self, normalized: &str) -> Recognition {
        let Some(command) = recognize_command(normalized) else {
            return Recognition::Help {
                message: HELP.to_string(),
            };
        };
        debug!(%command, "Recognized command");

        let prompt = match command {
            CommandKind::Tokenize => "¡Perfecto! Dame la oración o texto que quieres tokenizar:",
            CommandKind::LemmatizeBasic => "¡Excelente! Dame la oración que quieres lematizar:",
            CommandKind::LemmatizeMorphological => {
                if !self.models.morphology_available() {
                    return Recognition::Unavailable {
                        message: MORPHOLOGY_UNAVAILABLE.to_string(),
                    };
                }
                "¡Genial! Dame la oración para el análisis morfológico:"
            }
            CommandKind::GolfQuery => {
                return Recognition::Help {
                    message: HELP.to_string(),
                }
            }
        };

        Recognition::Pending {
            command,
            prompt: prompt.to_string(),
        }
    }

    fn process(&self, command: CommandKind, text: &str) -> Result<Reply, BackendError> {
        match command {
            CommandKind::Tokenize => Ok(self.tokenize(text)),
            CommandKind::LemmatizeBasic => Ok(self.lemmatize_basic(text)),
            CommandKind::LemmatizeMorphological => Ok(self.lemmatize_morphological(text)),
            CommandKind::GolfQuery => Err(BackendError::Unsupported(command)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> TextProcessor {
        TextProcessor::new(Arc::new(NlpModels::builtin()))
    }

    #[test]
    fn test_recognize_opens_slot() {
        match processor().recognize("tokeniza con nltk") {
            Recognition::Pending { command, prompt } => {
                assert_eq!(command, CommandKind::Tokenize);
                assert!(prompt.contains("tokenizar"));
            }
            other => panic!("Expected Pending recognition, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_request_gets_help() {
        match processor().recognize("cuéntame un chiste") {
            Recognition::Help { message } => {
                assert!(message.contains("tokeniza con nltk"));
                assert!(message.contains("lematiza con spacy"));
            }
            other => panic!("Expected Help recognition, got {:?}", other),
        }
    }

    #[test]
    fn test_morphology_command_unavailable_without_analyzer() {
        let processor = TextProcessor::new(Arc::new(NlpModels::without_analyzer()));
        assert!(matches!(
            processor.recognize("lematiza con spacy"),
            Recognition::Unavailable { .. }
        ));
        // Basic lemmatization is unaffected
        assert!(matches!(
            processor.recognize("lematiza con nltk"),
            Recognition::Pending {
                command: CommandKind::LemmatizeBasic,
                ..
            }
        ));
    }

    #[test]
    fn test_tokenize_results() {
        let reply = processor()
            .process(CommandKind::Tokenize, "Hola, mundo")
            .unwrap();
        assert!(reply.text.contains("'Hola, mundo'"));
        assert_eq!(reply.results.len(), 3);
        assert!(reply.results[0].starts_with("hola"));
        assert!(reply.results[0].ends_with("(posición 1)"));
        assert!(reply.results[1].starts_with(","));
    }

    #[test]
    fn test_lemmatize_basic_results() {
        let reply = processor()
            .process(CommandKind::LemmatizeBasic, "las casas")
            .unwrap();
        assert_eq!(reply.results.len(), 2);
        assert!(reply.results[1].starts_with("casas"));
        assert!(reply.results[1].ends_with("→ casa"));
    }

    #[test]
    fn test_morphological_results() {
        let reply = processor()
            .process(CommandKind::LemmatizeMorphological, "Juegan bien")
            .unwrap();
        assert_eq!(reply.results.len(), 2);
        assert!(reply.results[0].contains("jugar"));
        assert!(reply.results[0].ends_with("[VERB]"));
    }

    #[test]
    fn test_morphological_sentinel_is_an_error_message() {
        let processor = TextProcessor::new(Arc::new(NlpModels::without_analyzer()));
        let reply = processor
            .process(CommandKind::LemmatizeMorphological, "hola")
            .unwrap();
        assert!(reply.results.is_empty());
        assert!(reply.text.contains("Error"));
    }

    #[test]
    fn test_empty_text_has_no_results() {
        let reply = processor().process(CommandKind::Tokenize, "   ").unwrap();
        assert!(reply.results.is_empty());
        assert!(reply.text.contains("No se pudieron"));
    }

    #[test]
    fn test_golf_query_is_unsupported() {
        let result = processor().process(CommandKind::GolfQuery, "150 yardas");
        assert!(matches!(
            result,
            Err(BackendError::Unsupported(CommandKind::GolfQuery))
        ));
    }
}
