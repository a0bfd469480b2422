//! Property-based tests for the dialogue controller and tokenizer
//!
//! - Exit phrases terminate from any state
//! - Nothing passes the greeting gate before a greeting
//! - Once greeted, always greeted
//! - A pending command always consumes the next non-exit utterance
//! - Tokenizing rejoined tokens gives the same tokens back

use proptest::prelude::*;
use std::sync::Arc;

use crate::config::AssistantConfig;
use crate::nlp::NlpModels;
use crate::router::DialogueRouter;
use crate::text_processing::TextProcessor;
use crate::types::{CommandKind, ConversationState, Response};

// ============================================================================
// Strategies
// ============================================================================

fn arb_command() -> impl Strategy<Value = CommandKind> {
    prop_oneof![
        Just(CommandKind::Tokenize),
        Just(CommandKind::LemmatizeBasic),
        Just(CommandKind::LemmatizeMorphological),
    ]
}

fn arb_state() -> impl Strategy<Value = ConversationState> {
    (any::<bool>(), proptest::option::of(arb_command())).prop_map(|(greeted, pending_command)| {
        ConversationState {
            greeted,
            pending_command,
        }
    })
}

fn arb_exit() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("salir"),
        Just("Adiós"),
        Just("adios"),
        Just("CHAO"),
        Just("exit"),
        Just("quit"),
        Just("bye"),
        Just("gracias"),
        Just("hasta luego"),
    ]
}

/// Utterances free of exit phrases and greetings, commands included
fn arb_plain_utterance() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("tokeniza con nltk"),
            Just("lematiza con spacy"),
            Just("lematiza con nltk"),
            Just("casas"),
            Just("150"),
            Just("yardas"),
            Just("el"),
            Just("perro"),
            Just("corre"),
            Just("?"),
        ],
        1..8,
    )
    .prop_map(|words| words.join(" "))
}

fn router() -> DialogueRouter {
    let backend = Arc::new(TextProcessor::new(Arc::new(NlpModels::builtin())));
    DialogueRouter::new(backend, &AssistantConfig::default())
}

// ============================================================================
// Controller
// ============================================================================

proptest! {
    #[test]
    fn prop_exit_always_terminates(
        state in arb_state(),
        prefix in "[a-z ]{0,20}",
        exit in arb_exit(),
    ) {
        let turn = router().handle(&state, &format!("{}{}", prefix, exit));
        prop_assert!(turn.response.is_terminate());
    }

    #[test]
    fn prop_greeting_gate_holds(utterance in arb_plain_utterance()) {
        let state = ConversationState::new();
        let turn = router().handle(&state, &utterance);
        prop_assert!(!turn.state.greeted);
        prop_assert_eq!(turn.state.pending_command, None);
        prop_assert!(!turn.response.is_terminate());
    }

    #[test]
    fn prop_greeted_is_permanent(
        pending in proptest::option::of(arb_command()),
        utterances in proptest::collection::vec(arb_plain_utterance(), 1..6),
    ) {
        let router = router();
        let mut state = ConversationState { greeted: true, pending_command: pending };
        for utterance in &utterances {
            state = router.handle(&state, utterance).state;
            prop_assert!(state.greeted);
        }
    }

    #[test]
    fn prop_pending_slot_consumes_next_utterance(
        command in arb_command(),
        greeted in any::<bool>(),
        utterance in arb_plain_utterance(),
    ) {
        let state = ConversationState { greeted, pending_command: Some(command) };
        let turn = router().handle(&state, &utterance);
        prop_assert_eq!(turn.state.pending_command, None);
        prop_assert_eq!(turn.state.greeted, greeted);
        prop_assert!(matches!(turn.response, Response::Message(_)));
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

proptest! {
    #[test]
    fn prop_tokenize_idempotent(text in "[a-zA-ZáéíóúñÑ0-9 ,.¿?¡!]{0,60}") {
        let models = NlpModels::builtin();
        let first: Vec<String> = models.tokenize(&text).into_iter().map(|t| t.text).collect();
        let second: Vec<String> = models
            .tokenize(&first.join(" "))
            .into_iter()
            .map(|t| t.text)
            .collect();
        prop_assert_eq!(first, second);
    }
}
