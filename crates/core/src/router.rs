//! Dialogue controller
//!
//! Routes each utterance through a fixed sequence of checks, first match wins:
//! 1. Exit phrase: farewell and termination, whatever the state
//! 2. Pending slot: the utterance is the input of the pending command
//! 3. Greeting gate: nothing else happens until the user greets
//! 4. Recognition: the backend decides what the utterance asks for
//!
//! State goes in and comes out of [`DialogueRouter::handle`]; the router
//! itself holds no per-session data.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::backend::{Backend, Recognition};
use crate::config::AssistantConfig;
use crate::intent::{detect_exit, is_greeting, normalize, ExitKind};
use crate::types::{CommandKind, ConversationState, Reply, Response};

const GREET_FIRST: &str = "¡Hey! Primero salúdame y después podremos trabajar juntos.";

const APOLOGY: &str =
    "Lo siento, ocurrió un error inesperado al procesar tu mensaje. Inténtalo de nuevo.";

/// Result of one turn: the next state and what to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub state: ConversationState,
    pub response: Response,
}

impl Turn {
    fn message(state: ConversationState, text: impl Into<String>) -> Self {
        Self {
            state,
            response: Response::Message(Reply::text(text)),
        }
    }
}

pub struct DialogueRouter {
    backend: Arc<dyn Backend>,
    assistant_name: String,
    close_delay: Duration,
}

impl DialogueRouter {
    pub fn new(backend: Arc<dyn Backend>, config: &AssistantConfig) -> Self {
        Self {
            backend,
            assistant_name: config.name.clone(),
            close_delay: config.close_delay(),
        }
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    pub fn welcome(&self) -> String {
        self.backend.welcome(&self.assistant_name)
    }

    /// Run one turn
    pub fn handle(&self, state: &ConversationState, utterance: &str) -> Turn {
        let normalized = normalize(utterance);

        if let Some(kind) = detect_exit(&normalized) {
            debug!(?kind, "Exit phrase");
            return Turn {
                state: state.clone(),
                response: self.farewell(kind),
            };
        }

        if let Some(command) = state.pending_command {
            debug!(%command, "Answering pending command");
            let next = ConversationState {
                pending_command: None,
                ..state.clone()
            };
            return Turn {
                state: next,
                response: Response::Message(self.run(command, utterance)),
            };
        }

        if !state.greeted {
            if is_greeting(&normalized) {
                let next = ConversationState {
                    greeted: true,
                    ..state.clone()
                };
                return Turn::message(next, self.backend.onboarding());
            }
            return Turn::message(state.clone(), GREET_FIRST);
        }

        match self.backend.recognize(&normalized) {
            Recognition::Pending { command, prompt } => {
                let next = ConversationState {
                    pending_command: Some(command),
                    ..state.clone()
                };
                Turn::message(next, prompt)
            }
            Recognition::Immediate(command) => Turn {
                state: state.clone(),
                response: Response::Message(self.run(command, utterance)),
            },
            Recognition::Unavailable { message } | Recognition::Help { message } => {
                Turn::message(state.clone(), message)
            }
        }
    }

    /// Backend failures, panics included, end the command with an apology
    fn run(&self, command: CommandKind, text: &str) -> Reply {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.backend.process(command, text)));
        match outcome {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                error!(%command, "Backend failed: {}", e);
                Reply::text(APOLOGY)
            }
            Err(_) => {
                error!(%command, "Backend panicked");
                Reply::text(APOLOGY)
            }
        }
    }

    fn farewell(&self, kind: ExitKind) -> Response {
        let mut farewell = format!("¡Hasta luego! Gracias por usar {}.", self.assistant_name);
        let delay = match kind {
            ExitKind::Immediate => Duration::ZERO,
            ExitKind::Delayed => self.close_delay,
        };
        if !delay.is_zero() {
            farewell.push_str(&format!(
                " La aplicación se cerrará en {} segundos.",
                delay.as_secs_f64().ceil() as u64
            ));
        }
        Response::Terminate { farewell, delay }
    }

    pub fn apology() -> &'static str {
        APOLOGY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::golf::GolfAdvisor;
    use crate::nlp::NlpModels;
    use crate::text_processing::TextProcessor;

    fn text_router() -> DialogueRouter {
        let backend = Arc::new(TextProcessor::new(Arc::new(NlpModels::builtin())));
        DialogueRouter::new(backend, &AssistantConfig::default())
    }

    fn golf_router() -> DialogueRouter {
        let backend = Arc::new(GolfAdvisor::new(Arc::new(NlpModels::builtin())));
        DialogueRouter::new(backend, &AssistantConfig::default())
    }

    fn greeted() -> ConversationState {
        ConversationState {
            greeted: true,
            pending_command: None,
        }
    }

    fn text_of(turn: &Turn) -> &str {
        match &turn.response {
            Response::Message(reply) => &reply.text,
            other => panic!("Expected Message, got {:?}", other),
        }
    }

    /// Backend whose every command fails
    struct Broken;

    impl Backend for Broken {
        fn welcome(&self, _: &str) -> String {
            String::new()
        }
        fn onboarding(&self) -> String {
            "hola".to_string()
        }
        fn recognize(&self, _: &str) -> Recognition {
            Recognition::Pending {
                command: CommandKind::Tokenize,
                prompt: "texto:".to_string(),
            }
        }
        fn process(&self, command: CommandKind, _: &str) -> Result<Reply, BackendError> {
            Err(BackendError::Unsupported(command))
        }
    }

    /// Backend that panics on every command
    struct Panicking;

    impl Backend for Panicking {
        fn welcome(&self, _: &str) -> String {
            String::new()
        }
        fn onboarding(&self) -> String {
            "hola".to_string()
        }
        fn recognize(&self, _: &str) -> Recognition {
            Recognition::Immediate(CommandKind::GolfQuery)
        }
        fn process(&self, _: CommandKind, _: &str) -> Result<Reply, BackendError> {
            panic!("backend bug")
        }
    }

    #[test]
    fn test_greeting_gate() {
        let router = text_router();
        let state = ConversationState::new();

        let turn = router.handle(&state, "tokeniza con nltk");
        assert_eq!(text_of(&turn), GREET_FIRST);
        assert!(!turn.state.greeted);
        assert_eq!(turn.state.pending_command, None);

        let turn = router.handle(&turn.state, "¡Hola!");
        assert!(turn.state.greeted);
        assert!(text_of(&turn).contains("procesamiento de texto"));
    }

    #[test]
    fn test_command_opens_slot_then_processes() {
        let router = text_router();

        let turn = router.handle(&greeted(), "Tokeniza con NLTK");
        assert_eq!(turn.state.pending_command, Some(CommandKind::Tokenize));

        let turn = router.handle(&turn.state, "Hola mundo");
        assert_eq!(turn.state.pending_command, None);
        assert!(turn.state.greeted);
        match turn.response {
            Response::Message(reply) => {
                assert!(reply.text.contains("'Hola mundo'"));
                assert_eq!(reply.results.len(), 2);
            }
            other => panic!("Expected Message, got {:?}", other),
        }
    }

    #[test]
    fn test_slot_takes_priority_over_commands() {
        let router = text_router();
        let state = ConversationState {
            greeted: true,
            pending_command: Some(CommandKind::LemmatizeBasic),
        };

        let turn = router.handle(&state, "tokeniza con nltk");
        assert_eq!(turn.state.pending_command, None);
        assert!(text_of(&turn).starts_with("Lematización básica"));
    }

    #[test]
    fn test_slot_takes_priority_over_greeting_gate() {
        let router = text_router();
        let state = ConversationState {
            greeted: false,
            pending_command: Some(CommandKind::Tokenize),
        };
        let turn = router.handle(&state, "hola");
        assert!(text_of(&turn).starts_with("Tokenización"));
        assert!(!turn.state.greeted);
    }

    #[test]
    fn test_unknown_command_gets_help() {
        let router = text_router();
        let turn = router.handle(&greeted(), "haz algo");
        assert!(text_of(&turn).contains("comandos disponibles"));
        assert_eq!(turn.state, greeted());
    }

    #[test]
    fn test_exit_terminates_in_any_state() {
        let router = text_router();
        let pending = ConversationState {
            greeted: true,
            pending_command: Some(CommandKind::Tokenize),
        };
        for state in [ConversationState::new(), greeted(), pending] {
            let turn = router.handle(&state, "bueno, chao");
            assert!(turn.response.is_terminate());
            assert_eq!(turn.state, state);
        }
    }

    #[test]
    fn test_farewell_delay() {
        let router = text_router();
        match router.handle(&greeted(), "salir").response {
            Response::Terminate { delay, farewell } => {
                assert_eq!(delay, Duration::ZERO);
                assert!(farewell.contains("ChatNico"));
            }
            other => panic!("Expected Terminate, got {:?}", other),
        }
        match router.handle(&greeted(), "muchas gracias").response {
            Response::Terminate { delay, farewell } => {
                assert_eq!(delay, Duration::from_millis(3000));
                assert!(farewell.contains("3 segundos"));
            }
            other => panic!("Expected Terminate, got {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_morphology_keeps_slot_closed() {
        let backend = Arc::new(TextProcessor::new(Arc::new(NlpModels::without_analyzer())));
        let router = DialogueRouter::new(backend, &AssistantConfig::default());
        let turn = router.handle(&greeted(), "lematiza con spacy");
        assert_eq!(turn.state.pending_command, None);
        assert!(text_of(&turn).contains("no está disponible"));
    }

    #[test]
    fn test_backend_failure_apologizes_and_clears_slot() {
        let router = DialogueRouter::new(Arc::new(Broken), &AssistantConfig::default());
        let turn = router.handle(&greeted(), "algo");
        assert_eq!(turn.state.pending_command, Some(CommandKind::Tokenize));

        let turn = router.handle(&turn.state, "texto");
        assert_eq!(text_of(&turn), APOLOGY);
        assert_eq!(turn.state.pending_command, None);
    }

    #[test]
    fn test_backend_panic_apologizes() {
        let router = DialogueRouter::new(Arc::new(Panicking), &AssistantConfig::default());
        let turn = router.handle(&greeted(), "a 150 yardas");
        assert_eq!(text_of(&turn), APOLOGY);
        assert_eq!(turn.state, greeted());
    }

    #[test]
    fn test_golf_rejects_oversized_input() {
        let router = golf_router();
        let text = format!("{}mil yardas", "novecientos ".repeat(5000));
        let turn = router.handle(&greeted(), &text);
        assert_eq!(text_of(&turn), APOLOGY);
        assert_eq!(turn.state, greeted());
    }

    #[test]
    fn test_golf_forwards_every_greeted_utterance() {
        let router = golf_router();
        let turn = router.handle(&ConversationState::new(), "Estoy a 150 yardas");
        assert_eq!(text_of(&turn), GREET_FIRST);

        let turn = router.handle(&greeted(), "Estoy a 150 yardas en el fairway");
        assert!(text_of(&turn).starts_with("Recomendación: Hierro 4"));
        assert_eq!(turn.state.pending_command, None);

        let turn = router.handle(&greeted(), "estoy en el rough");
        assert!(text_of(&turn).contains("distancia al hoyo"));
    }

    #[test]
    fn test_custom_assistant_name() {
        let config = AssistantConfig {
            name: "Caddie".to_string(),
            close_delay_ms: 0,
        };
        let backend = Arc::new(GolfAdvisor::new(Arc::new(NlpModels::builtin())));
        let router = DialogueRouter::new(backend, &config);
        assert!(router.welcome().contains("Caddie"));
        match router.handle(&greeted(), "adiós").response {
            Response::Terminate { delay, farewell } => {
                assert!(delay.is_zero());
                assert!(farewell.contains("Caddie"));
            }
            other => panic!("Expected Terminate, got {:?}", other),
        }
    }
}
