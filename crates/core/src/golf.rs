//! Golf club advisor backend
//!
//! No command phrases and no slot: once greeted, every utterance is a query.

use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::{Backend, Recognition};
use crate::clubs::{adjusted_distance, recommend_club};
use crate::error::BackendError;
use crate::extract::{extract_query, TermIndex};
use crate::nlp::NlpModels;
use crate::tokenizer::check_length;
use crate::types::{CommandKind, Reply};

const GOLF_VOCABULARY: &[&str] = &[
    "golf", "palo", "hoyo", "green", "fairway", "rough", "bunker", "tee", "yarda", "yardas",
    "metro", "driver", "hierro", "madera", "wedge", "putter", "putt", "swing", "tiro", "golpe",
    "bandera", "campo", "distancia", "bola", "pelota", "par", "birdie", "caddie", "arena",
    "calle", "salida",
];

const COMMERCE_VOCABULARY: &[&str] = &[
    "comprar", "vender", "precio", "costar", "pagar", "tienda", "dinero", "oferta",
    "descuento", "euro", "dólar", "barato", "caro", "venta", "compra",
];

const NOT_GOLF: &str = "Lo siento, solo puedo ayudarte a elegir el palo para tu próximo golpe. \
                        Cuéntame a qué distancia estás del hoyo y desde dónde juegas.";

const ASK_DISTANCE: &str =
    "Por favor, indícame la distancia al hoyo (por ejemplo, 'Estoy a 150 yardas').";

/// Golf words win over commerce words; anything else is assumed to be golf
pub fn is_golf_related(index: &TermIndex) -> bool {
    if GOLF_VOCABULARY.iter().any(|w| index.contains(w)) {
        return true;
    }
    !COMMERCE_VOCABULARY.iter().any(|w| index.contains(w))
}

pub struct GolfAdvisor {
    models: Arc<NlpModels>,
}

impl GolfAdvisor {
    pub fn new(models: Arc<NlpModels>) -> Self {
        Self { models }
    }

    fn advise(&self, text: &str) -> Result<Reply, BackendError> {
        check_length(text, self.models.max_input_chars())?;

        let index = TermIndex::build(&self.models, text);
        if !is_golf_related(&index) {
            info!("Rejected non-golf request");
            return Ok(Reply::text(NOT_GOLF));
        }

        let Some(query) = extract_query(&index, text) else {
            return Ok(Reply::text(ASK_DISTANCE));
        };
        debug!(?query, "Extracted golf query");

        let rec = recommend_club(query.distance_yards, query.terrain, query.elevation);
        let results = vec![
            format!("Distancia: {} yardas", yards(query.distance_yards)),
            format!("Terreno: {}", query.terrain.as_str()),
            format!("Elevación: {}", query.elevation.as_str()),
            format!(
                "Distancia ajustada: {} yardas",
                yards(adjusted_distance(query.distance_yards, query.elevation))
            ),
        ];

        Ok(Reply::with_results(
            format!("Recomendación: {}\n\nRazón: {}", rec.club, rec.justification),
            results,
        ))
    }
}

/// Yardage for display, to the hundredth
fn yards(value: f64) -> String {
    format!("{}", (value * 100.0).round() / 100.0)
}

impl Backend for GolfAdvisor {
    fn welcome(&self, assistant_name: &str) -> String {
        format!(
            "¡Bienvenido a {}, tu caddie virtual!

Para comenzar, salúdame primero. Después cuéntame tu situación en el campo:
• La distancia al hoyo (por ejemplo, 'Estoy a 150 yardas')
• El terreno: fairway, rough, bunker, tee o green
• La pendiente: cuesta arriba, cuesta abajo o plano

Escribe 'salir', 'adiós' o 'chao' cuando quieras terminar.",
            assistant_name
        )
    }

    fn onboarding(&self) -> String {
        "¡Hola! ¿Listo para jugar? Dime a qué distancia estás del hoyo y te recomiendo un palo."
            .to_string()
    }

    fn recognize(&self, _normalized: &str) -> Recognition {
        Recognition::Immediate(CommandKind::GolfQuery)
    }

    fn process(&self, command: CommandKind, text: &str) -> Result<Reply, BackendError> {
        match command {
            CommandKind::GolfQuery => self.advise(text),
            other => Err(BackendError::Unsupported(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NlpError;

    fn advisor() -> GolfAdvisor {
        GolfAdvisor::new(Arc::new(NlpModels::builtin()))
    }

    fn related(text: &str) -> bool {
        is_golf_related(&TermIndex::build(&NlpModels::builtin(), text))
    }

    #[test]
    fn test_golf_relevance() {
        assert!(related("Estoy a 150 yardas del hoyo"));
        assert!(related("¿qué palo uso?"));
        // Golf words win even in a commerce sentence
        assert!(related("¿cuál es el precio de un driver?"));
        assert!(!related("quiero comprar unos zapatos"));
        assert!(!related("¿cuánto dinero cuesta?"));
        // Lenient default
        assert!(related("no sé qué hacer"));
    }

    #[test]
    fn test_every_utterance_is_a_query() {
        assert_eq!(
            advisor().recognize("lo que sea"),
            Recognition::Immediate(CommandKind::GolfQuery)
        );
    }

    #[test]
    fn test_recommendation_format() {
        let reply = advisor()
            .process(CommandKind::GolfQuery, "Estoy a 150 yardas en el fairway")
            .unwrap();
        assert_eq!(
            reply.text,
            "Recomendación: Hierro 4\n\nRazón: El Hierro 4 es adecuado para esta distancia desde el fairway."
        );
        assert_eq!(
            reply.results,
            vec![
                "Distancia: 150 yardas",
                "Terreno: fairway",
                "Elevación: plano",
                "Distancia ajustada: 150 yardas",
            ]
        );
    }

    #[test]
    fn test_bunker_query() {
        let reply = advisor()
            .process(CommandKind::GolfQuery, "la bola está en la arena a 60 yardas")
            .unwrap();
        assert!(reply.text.starts_with("Recomendación: Sand Wedge (SW)"));
    }

    #[test]
    fn test_uphill_query_reports_adjusted_distance() {
        let reply = advisor()
            .process(CommandKind::GolfQuery, "100 yardas cuesta arriba")
            .unwrap();
        assert!(reply.text.starts_with("Recomendación: Hierro 8"));
        assert_eq!(reply.results[2], "Elevación: subida");
        assert_eq!(reply.results[3], "Distancia ajustada: 110 yardas");
    }

    #[test]
    fn test_yardage_display() {
        assert_eq!(yards(110.00000000000001), "110");
        assert_eq!(yards(280.0039), "280");
        assert_eq!(yards(150.5), "150.5");
        assert_eq!(yards(165.55), "165.55");
    }

    #[test]
    fn test_oversized_input_is_an_error() {
        let text = format!("{}mil yardas", "novecientos ".repeat(5000));
        match advisor().process(CommandKind::GolfQuery, &text) {
            Err(BackendError::Nlp(NlpError::InputTooLong { len, max })) => {
                assert_eq!(len, text.chars().count());
                assert_eq!(max, 10_000);
            }
            other => panic!("Expected InputTooLong, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_distance_prompts() {
        let reply = advisor()
            .process(CommandKind::GolfQuery, "estoy en el bunker")
            .unwrap();
        assert_eq!(reply.text, ASK_DISTANCE);
        assert!(reply.results.is_empty());
    }

    #[test]
    fn test_non_golf_rejected() {
        let reply = advisor()
            .process(CommandKind::GolfQuery, "quiero comprar 3 metros de tela")
            .unwrap();
        // "metro" is golf vocabulary, so this one is still answered
        assert!(reply.text.starts_with("Recomendación:"));

        let reply = advisor()
            .process(CommandKind::GolfQuery, "quiero comprar zapatos baratos")
            .unwrap();
        assert_eq!(reply.text, NOT_GOLF);
    }

    #[test]
    fn test_out_of_range() {
        let reply = advisor()
            .process(CommandKind::GolfQuery, "Estoy a 300 yardas")
            .unwrap();
        assert!(reply.text.contains("No se pudo determinar"));
    }

    #[test]
    fn test_text_commands_unsupported() {
        assert!(matches!(
            advisor().process(CommandKind::Tokenize, "hola"),
            Err(BackendError::Unsupported(CommandKind::Tokenize))
        ));
    }
}
