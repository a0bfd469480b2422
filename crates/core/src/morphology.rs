//! Rule-based morphological analyzer for Spanish
//!
//! Assigns each token a lemma and a coarse UPOS-style tag:
//! - Closed-class words, irregular verb forms and noun exceptions come from a
//!   word table (built in, optionally extended from a TOML model file)
//! - Regular verbs are recognized by conjugation suffix against a list of
//!   known infinitives
//! - Participles and adjectives are normalized to masculine singular
//! - Everything else is a noun lemmatized by the dictionary lemmatizer
//!
//! [`Analysis::copular_modifiers`] approximates a dependency parse for the
//! one construction the golf assistant cares about: modifiers of "estar",
//! "encontrar" or "quedar" ("la bandera está más alta").

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::NlpError;
use crate::lexicon::{singular_noun, Lexicon};
use crate::numerals;
use crate::tokenizer::{is_numeric, is_punctuation, split_words};
use crate::types::MorphTriple;

// ============================================================================
// Tags and Results
// ============================================================================

/// Coarse part-of-speech category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PosTag {
    Noun,
    Propn,
    Verb,
    Aux,
    Adj,
    Adv,
    Adp,
    Det,
    Pron,
    Cconj,
    Sconj,
    Num,
    Punct,
    Intj,
}

impl PosTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosTag::Noun => "NOUN",
            PosTag::Propn => "PROPN",
            PosTag::Verb => "VERB",
            PosTag::Aux => "AUX",
            PosTag::Adj => "ADJ",
            PosTag::Adv => "ADV",
            PosTag::Adp => "ADP",
            PosTag::Det => "DET",
            PosTag::Pron => "PRON",
            PosTag::Cconj => "CCONJ",
            PosTag::Sconj => "SCONJ",
            PosTag::Num => "NUM",
            PosTag::Punct => "PUNCT",
            PosTag::Intj => "INTJ",
        }
    }

    fn is_clause_boundary(&self) -> bool {
        matches!(
            self,
            PosTag::Punct | PosTag::Verb | PosTag::Aux | PosTag::Cconj | PosTag::Sconj
        )
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
    /// Surface form as written
    pub text: String,
    pub lemma: String,
    pub pos: PosTag,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub tokens: Vec<AnalyzedToken>,
}

/// Verbs whose complements describe where the ball lies
const COPULAS: &[&str] = &["estar", "encontrar", "quedar"];

/// Tokens scanned after a copula before giving up
const MODIFIER_WINDOW: usize = 6;

impl Analysis {
    pub fn to_triples(&self) -> Vec<MorphTriple> {
        self.tokens
            .iter()
            .map(|t| MorphTriple {
                surface: t.text.clone(),
                lemma: t.lemma.clone(),
                pos: t.pos.as_str().to_string(),
            })
            .collect()
    }

    /// Lemmas modifying a copular verb, plus adjacent modifier pairs
    /// ("cuesta arriba", "más alto")
    pub fn copular_modifiers(&self) -> Vec<String> {
        let mut out = Vec::new();

        for (i, token) in self.tokens.iter().enumerate() {
            if !matches!(token.pos, PosTag::Verb | PosTag::Aux)
                || !COPULAS.contains(&token.lemma.as_str())
            {
                continue;
            }

            let mut run: Vec<&str> = Vec::new();
            for next in self.tokens.iter().skip(i + 1).take(MODIFIER_WINDOW) {
                if next.pos.is_clause_boundary() {
                    break;
                }
                if matches!(next.pos, PosTag::Adv | PosTag::Adj | PosTag::Noun) {
                    if let Some(prev) = run.last() {
                        out.push(format!("{} {}", prev, next.lemma));
                    }
                    out.push(next.lemma.clone());
                    run.push(&next.lemma);
                } else {
                    run.clear();
                }
            }
        }

        out
    }
}

/// A morphological analyzer usable from any thread
pub trait MorphAnalyzer: Send + Sync + fmt::Debug {
    fn analyze(&self, text: &str) -> Analysis;
}

// ============================================================================
// Built-in Model Data
// ============================================================================

/// Closed-class words, irregular verbs and noun exceptions
const BUILTIN_WORDS: &[(&str, &str, PosTag)] = &[
    // Determiners
    ("el", "el", PosTag::Det),
    ("la", "el", PosTag::Det),
    ("los", "el", PosTag::Det),
    ("las", "el", PosTag::Det),
    ("un", "uno", PosTag::Det),
    ("una", "uno", PosTag::Det),
    ("unos", "uno", PosTag::Det),
    ("unas", "uno", PosTag::Det),
    ("este", "este", PosTag::Det),
    ("esta", "este", PosTag::Det),
    ("estos", "este", PosTag::Det),
    ("estas", "este", PosTag::Det),
    ("ese", "ese", PosTag::Det),
    ("esa", "ese", PosTag::Det),
    ("esos", "ese", PosTag::Det),
    ("esas", "ese", PosTag::Det),
    ("aquel", "aquel", PosTag::Det),
    ("aquella", "aquel", PosTag::Det),
    ("mi", "mi", PosTag::Det),
    ("mis", "mi", PosTag::Det),
    ("tu", "tu", PosTag::Det),
    ("tus", "tu", PosTag::Det),
    ("su", "su", PosTag::Det),
    ("sus", "su", PosTag::Det),
    ("nuestro", "nuestro", PosTag::Det),
    ("nuestra", "nuestro", PosTag::Det),
    ("cada", "cada", PosTag::Det),
    ("otro", "otro", PosTag::Det),
    ("otra", "otro", PosTag::Det),
    ("todo", "todo", PosTag::Det),
    ("toda", "todo", PosTag::Det),
    ("todos", "todo", PosTag::Det),
    ("todas", "todo", PosTag::Det),
    ("mucho", "mucho", PosTag::Det),
    ("mucha", "mucho", PosTag::Det),
    ("muchos", "mucho", PosTag::Det),
    ("muchas", "mucho", PosTag::Det),
    ("algún", "alguno", PosTag::Det),
    ("alguna", "alguno", PosTag::Det),
    ("ningún", "ninguno", PosTag::Det),
    // Pronouns
    ("yo", "yo", PosTag::Pron),
    ("me", "yo", PosTag::Pron),
    ("mí", "yo", PosTag::Pron),
    ("tú", "tú", PosTag::Pron),
    ("te", "tú", PosTag::Pron),
    ("ti", "tú", PosTag::Pron),
    ("él", "él", PosTag::Pron),
    ("ella", "él", PosTag::Pron),
    ("ellos", "él", PosTag::Pron),
    ("ellas", "él", PosTag::Pron),
    ("se", "él", PosTag::Pron),
    ("le", "él", PosTag::Pron),
    ("les", "él", PosTag::Pron),
    ("lo", "él", PosTag::Pron),
    ("nosotros", "nosotros", PosTag::Pron),
    ("nosotras", "nosotros", PosTag::Pron),
    ("nos", "nosotros", PosTag::Pron),
    ("vosotros", "vosotros", PosTag::Pron),
    ("os", "vosotros", PosTag::Pron),
    ("usted", "usted", PosTag::Pron),
    ("ustedes", "usted", PosTag::Pron),
    ("qué", "qué", PosTag::Pron),
    ("quién", "quién", PosTag::Pron),
    ("cuál", "cuál", PosTag::Pron),
    ("esto", "este", PosTag::Pron),
    ("eso", "ese", PosTag::Pron),
    ("algo", "algo", PosTag::Pron),
    ("nada", "nada", PosTag::Pron),
    ("alguien", "alguien", PosTag::Pron),
    ("nadie", "nadie", PosTag::Pron),
    // Adpositions
    ("a", "a", PosTag::Adp),
    ("al", "a", PosTag::Adp),
    ("ante", "ante", PosTag::Adp),
    ("con", "con", PosTag::Adp),
    ("contra", "contra", PosTag::Adp),
    ("de", "de", PosTag::Adp),
    ("del", "de", PosTag::Adp),
    ("desde", "desde", PosTag::Adp),
    ("durante", "durante", PosTag::Adp),
    ("en", "en", PosTag::Adp),
    ("entre", "entre", PosTag::Adp),
    ("hacia", "hacia", PosTag::Adp),
    ("hasta", "hasta", PosTag::Adp),
    ("para", "para", PosTag::Adp),
    ("por", "por", PosTag::Adp),
    ("según", "según", PosTag::Adp),
    ("sin", "sin", PosTag::Adp),
    ("sobre", "sobre", PosTag::Adp),
    ("tras", "tras", PosTag::Adp),
    // Conjunctions
    ("y", "y", PosTag::Cconj),
    ("e", "e", PosTag::Cconj),
    ("o", "o", PosTag::Cconj),
    ("u", "u", PosTag::Cconj),
    ("ni", "ni", PosTag::Cconj),
    ("pero", "pero", PosTag::Cconj),
    ("sino", "sino", PosTag::Cconj),
    ("que", "que", PosTag::Sconj),
    ("porque", "porque", PosTag::Sconj),
    ("si", "si", PosTag::Sconj),
    ("cuando", "cuando", PosTag::Sconj),
    ("aunque", "aunque", PosTag::Sconj),
    ("como", "como", PosTag::Sconj),
    ("mientras", "mientras", PosTag::Sconj),
    // Adverbs
    ("no", "no", PosTag::Adv),
    ("sí", "sí", PosTag::Adv),
    ("muy", "muy", PosTag::Adv),
    ("más", "más", PosTag::Adv),
    ("menos", "menos", PosTag::Adv),
    ("ya", "ya", PosTag::Adv),
    ("también", "también", PosTag::Adv),
    ("tampoco", "tampoco", PosTag::Adv),
    ("aquí", "aquí", PosTag::Adv),
    ("allí", "allí", PosTag::Adv),
    ("ahí", "ahí", PosTag::Adv),
    ("allá", "allá", PosTag::Adv),
    ("acá", "acá", PosTag::Adv),
    ("arriba", "arriba", PosTag::Adv),
    ("abajo", "abajo", PosTag::Adv),
    ("encima", "encima", PosTag::Adv),
    ("debajo", "debajo", PosTag::Adv),
    ("delante", "delante", PosTag::Adv),
    ("detrás", "detrás", PosTag::Adv),
    ("cerca", "cerca", PosTag::Adv),
    ("lejos", "lejos", PosTag::Adv),
    ("bien", "bien", PosTag::Adv),
    ("mal", "mal", PosTag::Adv),
    ("hoy", "hoy", PosTag::Adv),
    ("ayer", "ayer", PosTag::Adv),
    ("siempre", "siempre", PosTag::Adv),
    ("nunca", "nunca", PosTag::Adv),
    ("casi", "casi", PosTag::Adv),
    ("ahora", "ahora", PosTag::Adv),
    ("luego", "luego", PosTag::Adv),
    ("después", "después", PosTag::Adv),
    ("antes", "antes", PosTag::Adv),
    ("solo", "solo", PosTag::Adv),
    ("sólo", "solo", PosTag::Adv),
    ("tan", "tan", PosTag::Adv),
    ("bastante", "bastante", PosTag::Adv),
    ("demasiado", "demasiado", PosTag::Adv),
    ("todavía", "todavía", PosTag::Adv),
    ("aún", "aún", PosTag::Adv),
    ("quizás", "quizás", PosTag::Adv),
    ("además", "además", PosTag::Adv),
    ("entonces", "entonces", PosTag::Adv),
    // Interjections
    ("hola", "hola", PosTag::Intj),
    ("adiós", "adiós", PosTag::Intj),
    ("chao", "chao", PosTag::Intj),
    ("hey", "hey", PosTag::Intj),
    ("gracias", "gracias", PosTag::Intj),
    // Auxiliaries
    ("estoy", "estar", PosTag::Aux),
    ("estás", "estar", PosTag::Aux),
    ("está", "estar", PosTag::Aux),
    ("estamos", "estar", PosTag::Aux),
    ("estáis", "estar", PosTag::Aux),
    ("están", "estar", PosTag::Aux),
    ("estaba", "estar", PosTag::Aux),
    ("estabas", "estar", PosTag::Aux),
    ("estábamos", "estar", PosTag::Aux),
    ("estaban", "estar", PosTag::Aux),
    ("estuve", "estar", PosTag::Aux),
    ("estuvo", "estar", PosTag::Aux),
    ("esté", "estar", PosTag::Aux),
    ("estén", "estar", PosTag::Aux),
    ("soy", "ser", PosTag::Aux),
    ("eres", "ser", PosTag::Aux),
    ("es", "ser", PosTag::Aux),
    ("somos", "ser", PosTag::Aux),
    ("sois", "ser", PosTag::Aux),
    ("son", "ser", PosTag::Aux),
    ("era", "ser", PosTag::Aux),
    ("eran", "ser", PosTag::Aux),
    ("fui", "ser", PosTag::Aux),
    ("fue", "ser", PosTag::Aux),
    ("fueron", "ser", PosTag::Aux),
    ("sea", "ser", PosTag::Aux),
    ("será", "ser", PosTag::Aux),
    ("sido", "ser", PosTag::Aux),
    ("he", "haber", PosTag::Aux),
    ("has", "haber", PosTag::Aux),
    ("ha", "haber", PosTag::Aux),
    ("hemos", "haber", PosTag::Aux),
    ("han", "haber", PosTag::Aux),
    ("hay", "haber", PosTag::Aux),
    ("había", "haber", PosTag::Aux),
    ("hubo", "haber", PosTag::Aux),
    // Irregular verbs
    ("tengo", "tener", PosTag::Verb),
    ("tienes", "tener", PosTag::Verb),
    ("tiene", "tener", PosTag::Verb),
    ("tienen", "tener", PosTag::Verb),
    ("tuve", "tener", PosTag::Verb),
    ("tuvo", "tener", PosTag::Verb),
    ("voy", "ir", PosTag::Verb),
    ("vas", "ir", PosTag::Verb),
    ("va", "ir", PosTag::Verb),
    ("vamos", "ir", PosTag::Verb),
    ("van", "ir", PosTag::Verb),
    ("iba", "ir", PosTag::Verb),
    ("hago", "hacer", PosTag::Verb),
    ("hace", "hacer", PosTag::Verb),
    ("hizo", "hacer", PosTag::Verb),
    ("puedo", "poder", PosTag::Verb),
    ("puedes", "poder", PosTag::Verb),
    ("puede", "poder", PosTag::Verb),
    ("pueden", "poder", PosTag::Verb),
    ("quiero", "querer", PosTag::Verb),
    ("quieres", "querer", PosTag::Verb),
    ("quiere", "querer", PosTag::Verb),
    ("digo", "decir", PosTag::Verb),
    ("dice", "decir", PosTag::Verb),
    ("dijo", "decir", PosTag::Verb),
    ("encuentro", "encontrar", PosTag::Verb),
    ("encuentras", "encontrar", PosTag::Verb),
    ("encuentra", "encontrar", PosTag::Verb),
    ("encuentran", "encontrar", PosTag::Verb),
    ("juego", "jugar", PosTag::Verb),
    ("juegas", "jugar", PosTag::Verb),
    ("juega", "jugar", PosTag::Verb),
    ("juegan", "jugar", PosTag::Verb),
    ("elijo", "elegir", PosTag::Verb),
    ("elige", "elegir", PosTag::Verb),
    ("recomiendo", "recomendar", PosTag::Verb),
    ("recomiendas", "recomendar", PosTag::Verb),
    ("recomienda", "recomendar", PosTag::Verb),
    ("doy", "dar", PosTag::Verb),
    ("da", "dar", PosTag::Verb),
    ("dio", "dar", PosTag::Verb),
    ("veo", "ver", PosTag::Verb),
    ("ve", "ver", PosTag::Verb),
    ("vio", "ver", PosTag::Verb),
    ("sé", "saber", PosTag::Verb),
    ("sabe", "saber", PosTag::Verb),
    ("salgo", "salir", PosTag::Verb),
    ("vengo", "venir", PosTag::Verb),
    ("viene", "venir", PosTag::Verb),
    ("pongo", "poner", PosTag::Verb),
    ("cuesto", "costar", PosTag::Verb),
    ("cuestan", "costar", PosTag::Verb),
    // Nouns the verb rules would mistake for participles or verb forms
    ("cuesta", "cuesta", PosTag::Noun),
    ("salida", "salida", PosTag::Noun),
    ("subida", "subida", PosTag::Noun),
    ("bajada", "bajada", PosTag::Noun),
    ("llegada", "llegada", PosTag::Noun),
    ("entrada", "entrada", PosTag::Noun),
    ("partida", "partida", PosTag::Noun),
    ("medida", "medida", PosTag::Noun),
    ("comida", "comida", PosTag::Noun),
    ("bebida", "bebida", PosTag::Noun),
    ("vida", "vida", PosTag::Noun),
    ("precio", "precio", PosTag::Noun),
    ("tiro", "tiro", PosTag::Noun),
    ("golpe", "golpe", PosTag::Noun),
    ("campo", "campo", PosTag::Noun),
    ("pista", "pista", PosTag::Noun),
];

/// Infinitives recognized by the regular conjugation rules
const BUILTIN_VERBS: &[&str] = &[
    "abrir", "analizar", "apuntar", "aprender", "ascender", "ayudar", "bajar", "buscar",
    "calcular", "caminar", "cambiar", "comer", "comprar", "comprender", "correr", "costar",
    "creer", "deber", "decidir", "dejar", "descender", "dividir", "elegir", "empezar",
    "encontrar", "entrar", "entrenar", "escribir", "esperar", "estimar", "ganar", "golpear",
    "gustar", "hablar", "jugar", "lanzar", "leer", "lematizar", "llamar", "llegar", "llevar",
    "mejorar", "mirar", "mostrar", "necesitar", "pagar", "pasar", "pegar", "pensar", "perder",
    "practicar", "preguntar", "procesar", "quedar", "recibir", "recomendar", "responder",
    "salir", "separar", "subir", "terminar", "tirar", "tokenizar", "tomar", "trabajar",
    "tratar", "usar", "utilizar", "vender", "vivir", "volver",
];

/// Adjectives in masculine singular
const BUILTIN_ADJECTIVES: &[&str] = &[
    "alto", "bajo", "plano", "llano", "largo", "corto", "grande", "pequeño", "bueno", "malo",
    "mejor", "peor", "difícil", "fácil", "nuevo", "viejo", "rápido", "lento", "fuerte", "suave",
    "ideal", "adecuado", "verde", "húmedo", "seco", "mojado", "profundo", "empinado", "cercano",
    "lejano", "blanco", "negro", "rojo", "azul", "amarillo", "último", "primero", "segundo",
    "barato", "caro", "elevado", "igualado", "hundido",
];

/// Regular conjugation endings and the infinitive ending they attach to.
/// Sorted longest first when the table is built.
const VERB_SUFFIXES: &[(&str, &str)] = &[
    // -ar
    ("aríamos", "ar"),
    ("ábamos", "ar"),
    ("asteis", "ar"),
    ("aremos", "ar"),
    ("arían", "ar"),
    ("aría", "ar"),
    ("aron", "ar"),
    ("arán", "ar"),
    ("ará", "ar"),
    ("aré", "ar"),
    ("aban", "ar"),
    ("abas", "ar"),
    ("aba", "ar"),
    ("amos", "ar"),
    ("áis", "ar"),
    ("aste", "ar"),
    ("ando", "ar"),
    ("ar", "ar"),
    ("as", "ar"),
    ("an", "ar"),
    ("ó", "ar"),
    ("é", "ar"),
    ("o", "ar"),
    ("a", "ar"),
    ("es", "ar"),
    ("en", "ar"),
    ("e", "ar"),
    // -er
    ("eríamos", "er"),
    ("eremos", "er"),
    ("ieron", "er"),
    ("erían", "er"),
    ("ería", "er"),
    ("erán", "er"),
    ("erá", "er"),
    ("iendo", "er"),
    ("íamos", "er"),
    ("iste", "er"),
    ("emos", "er"),
    ("éis", "er"),
    ("ían", "er"),
    ("ías", "er"),
    ("ía", "er"),
    ("ió", "er"),
    ("er", "er"),
    ("es", "er"),
    ("en", "er"),
    ("e", "er"),
    ("o", "er"),
    ("í", "er"),
    ("a", "er"),
    // -ir
    ("iríamos", "ir"),
    ("iremos", "ir"),
    ("ieron", "ir"),
    ("irían", "ir"),
    ("iría", "ir"),
    ("irán", "ir"),
    ("irá", "ir"),
    ("iendo", "ir"),
    ("íamos", "ir"),
    ("iste", "ir"),
    ("imos", "ir"),
    ("ís", "ir"),
    ("ían", "ir"),
    ("ía", "ir"),
    ("ió", "ir"),
    ("ir", "ir"),
    ("es", "ir"),
    ("en", "ir"),
    ("e", "ir"),
    ("o", "ir"),
    ("í", "ir"),
    ("a", "ir"),
];

const PARTICIPLE_SUFFIXES: &[(&str, &str)] = &[
    ("ados", "ado"),
    ("adas", "ado"),
    ("ada", "ado"),
    ("ado", "ado"),
    ("idos", "ido"),
    ("idas", "ido"),
    ("ida", "ido"),
    ("ido", "ido"),
];

const ADJECTIVE_SUFFIXES: &[&str] = &["oso", "osa", "ble", "ico", "ica", "ivo", "iva"];

static SORTED_VERB_SUFFIXES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut suffixes = VERB_SUFFIXES.to_vec();
    suffixes.sort_by_key(|(ending, _)| std::cmp::Reverse(ending.chars().count()));
    suffixes
});

// ============================================================================
// Model File
// ============================================================================

#[derive(Debug, Deserialize)]
struct WordEntry {
    lemma: String,
    pos: PosTag,
}

/// Supplement loaded on top of the built-in tables
#[derive(Debug, Default, Deserialize)]
struct ModelFile {
    #[serde(default)]
    verbs: Vec<String>,
    #[serde(default)]
    adjectives: Vec<String>,
    #[serde(default)]
    words: HashMap<String, WordEntry>,
}

// ============================================================================
// Rule Analyzer
// ============================================================================

#[derive(Debug, Clone)]
pub struct RuleAnalyzer {
    words: HashMap<String, (String, PosTag)>,
    verbs: HashSet<String>,
    adjectives: HashSet<String>,
    lexicon: Lexicon,
}

impl RuleAnalyzer {
    pub fn builtin(lexicon: Lexicon) -> Self {
        let words = BUILTIN_WORDS
            .iter()
            .map(|(form, lemma, pos)| (form.to_string(), (lemma.to_string(), *pos)))
            .collect();
        Self {
            words,
            verbs: BUILTIN_VERBS.iter().map(|v| v.to_string()).collect(),
            adjectives: BUILTIN_ADJECTIVES.iter().map(|a| a.to_string()).collect(),
            lexicon,
        }
    }

    /// Built-in tables extended with a TOML model file
    pub fn with_model_file(lexicon: Lexicon, path: &Path) -> Result<Self, NlpError> {
        let content = fs::read_to_string(path).map_err(|source| NlpError::ModelRead {
            path: path.to_path_buf(),
            source,
        })?;
        let model: ModelFile = toml::from_str(&content).map_err(|source| NlpError::ModelParse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut analyzer = Self::builtin(lexicon);
        analyzer
            .verbs
            .extend(model.verbs.into_iter().map(|v| v.to_lowercase()));
        analyzer
            .adjectives
            .extend(model.adjectives.into_iter().map(|a| a.to_lowercase()));
        for (form, entry) in model.words {
            analyzer
                .words
                .insert(form.to_lowercase(), (entry.lemma.to_lowercase(), entry.pos));
        }
        Ok(analyzer)
    }

    fn analyze_word(&self, word: &str, sentence_start: bool) -> (String, PosTag) {
        if is_punctuation(word) {
            return (word.to_string(), PosTag::Punct);
        }
        if is_numeric(word) {
            return (word.to_string(), PosTag::Num);
        }

        let lower = word.to_lowercase();

        if let Some((lemma, pos)) = self.words.get(&lower) {
            return (lemma.clone(), *pos);
        }
        if numerals::word_value(&lower).is_some() {
            return (lower, PosTag::Num);
        }
        if lower.chars().count() > 6 && lower.ends_with("mente") {
            return (lower, PosTag::Adv);
        }
        if let Some(adjective) = self.adjective_lemma(&lower) {
            return (adjective, PosTag::Adj);
        }
        if let Some(infinitive) = self.participle_or_verb(&lower) {
            return infinitive;
        }
        if ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) && lower.chars().count() > 5 {
            return (masculine(&singular_noun(&lower)), PosTag::Adj);
        }
        if !sentence_start && word.chars().next().is_some_and(|c| c.is_uppercase()) {
            return (word.to_string(), PosTag::Propn);
        }

        (self.lexicon.lemmatize(&lower), PosTag::Noun)
    }

    /// Lemma of a known adjective in any gender or number
    fn adjective_lemma(&self, lower: &str) -> Option<String> {
        if self.adjectives.contains(lower) {
            return Some(lower.to_string());
        }
        let singular = singular_noun(lower);
        if self.adjectives.contains(&singular) {
            return Some(singular);
        }
        let masc = masculine(&singular);
        self.adjectives.contains(&masc).then_some(masc)
    }

    fn participle_or_verb(&self, lower: &str) -> Option<(String, PosTag)> {
        for (suffix, base) in PARTICIPLE_SUFFIXES {
            let Some(stem) = lower.strip_suffix(suffix) else {
                continue;
            };
            if stem.chars().count() < 3 {
                continue;
            }
            let infinitive = format!("{}{}", stem, if *base == "ado" { "ar" } else { "er" });
            if self.verbs.contains(&infinitive) {
                return Some((infinitive, PosTag::Verb));
            }
            if *base == "ido" {
                let infinitive = format!("{}ir", stem);
                if self.verbs.contains(&infinitive) {
                    return Some((infinitive, PosTag::Verb));
                }
            }
            return Some((format!("{}{}", stem, base), PosTag::Adj));
        }

        for (ending, class) in SORTED_VERB_SUFFIXES.iter() {
            let Some(stem) = lower.strip_suffix(ending) else {
                continue;
            };
            if stem.chars().count() < 2 {
                continue;
            }
            let infinitive = format!("{}{}", stem, class);
            if self.verbs.contains(&infinitive) {
                let pos = if matches!(infinitive.as_str(), "estar" | "ser" | "haber") {
                    PosTag::Aux
                } else {
                    PosTag::Verb
                };
                return Some((infinitive, pos));
            }
        }
        None
    }
}

impl MorphAnalyzer for RuleAnalyzer {
    fn analyze(&self, text: &str) -> Analysis {
        let mut tokens = Vec::new();
        let mut sentence_start = true;

        for word in split_words(text) {
            let (lemma, pos) = self.analyze_word(word, sentence_start);
            sentence_start = matches!(word, "." | "!" | "?" | "¿" | "¡");
            tokens.push(AnalyzedToken {
                text: word.to_string(),
                lemma,
                pos,
            });
        }

        Analysis { tokens }
    }
}

/// "alta" -> "alto"; other endings unchanged
fn masculine(word: &str) -> String {
    match word.strip_suffix('a') {
        Some(stem) if !stem.is_empty() => format!("{}o", stem),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> RuleAnalyzer {
        RuleAnalyzer::builtin(Lexicon::builtin())
    }

    fn tagged(text: &str) -> Vec<(String, String, &'static str)> {
        analyzer()
            .analyze(text)
            .tokens
            .into_iter()
            .map(|t| (t.text, t.lemma, t.pos.as_str()))
            .collect()
    }

    fn lemma_pos(text: &str, word: &str) -> (String, &'static str) {
        tagged(text)
            .into_iter()
            .find(|(surface, _, _)| surface == word)
            .map(|(_, lemma, pos)| (lemma, pos))
            .unwrap_or_else(|| panic!("token {} not found", word))
    }

    #[test]
    fn test_sentence_analysis() {
        let result = tagged("Estoy a 150 yardas del green.");
        assert_eq!(
            result,
            vec![
                ("Estoy".to_string(), "estar".to_string(), "AUX"),
                ("a".to_string(), "a".to_string(), "ADP"),
                ("150".to_string(), "150".to_string(), "NUM"),
                ("yardas".to_string(), "yarda".to_string(), "NOUN"),
                ("del".to_string(), "de".to_string(), "ADP"),
                ("green".to_string(), "green".to_string(), "NOUN"),
                (".".to_string(), ".".to_string(), "PUNCT"),
            ]
        );
    }

    #[test]
    fn test_regular_verbs() {
        assert_eq!(lemma_pos("la pelota sube", "sube"), ("subir".to_string(), "VERB"));
        assert_eq!(lemma_pos("voy bajando", "bajando"), ("bajar".to_string(), "VERB"));
        assert_eq!(lemma_pos("yo compro", "compro"), ("comprar".to_string(), "VERB"));
        assert_eq!(
            lemma_pos("ellos descendieron", "descendieron"),
            ("descender".to_string(), "VERB")
        );
    }

    #[test]
    fn test_adjectives_normalize_to_masculine_singular() {
        assert_eq!(lemma_pos("la bandera alta", "alta"), ("alto".to_string(), "ADJ"));
        assert_eq!(lemma_pos("zona elevada", "elevada"), ("elevado".to_string(), "ADJ"));
        assert_eq!(lemma_pos("terrenos planos", "planos"), ("plano".to_string(), "ADJ"));
        assert_eq!(lemma_pos("muy famosa", "famosa"), ("famoso".to_string(), "ADJ"));
    }

    #[test]
    fn test_noun_exceptions_beat_verb_rules() {
        assert_eq!(lemma_pos("la salida", "salida"), ("salida".to_string(), "NOUN"));
        assert_eq!(lemma_pos("cuesta arriba", "cuesta"), ("cuesta".to_string(), "NOUN"));
    }

    #[test]
    fn test_other_classes() {
        assert_eq!(lemma_pos("Hola amigo", "Hola"), ("hola".to_string(), "INTJ"));
        assert_eq!(lemma_pos("camina rápidamente", "rápidamente").1, "ADV");
        assert_eq!(lemma_pos("ciento cincuenta", "cincuenta").1, "NUM");
        assert_eq!(lemma_pos("juego con María", "María"), ("María".to_string(), "PROPN"));
        assert_eq!(lemma_pos("Casas bonitas", "Casas").1, "NOUN");
    }

    #[test]
    fn test_copular_modifiers() {
        let analysis = analyzer().analyze("La bola está cuesta arriba, creo");
        let mods = analysis.copular_modifiers();
        assert!(mods.contains(&"cuesta arriba".to_string()));
        assert!(mods.contains(&"arriba".to_string()));
        assert!(!mods.contains(&"creer".to_string()));

        let analysis = analyzer().analyze("me encuentro más alto que la bandera");
        let mods = analysis.copular_modifiers();
        assert!(mods.contains(&"alto".to_string()));
        assert!(mods.contains(&"más alto".to_string()));
    }

    #[test]
    fn test_copular_modifiers_need_a_copula() {
        let analysis = analyzer().analyze("arriba y abajo");
        assert!(analysis.copular_modifiers().is_empty());
    }

    #[test]
    fn test_model_file_extends_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.toml");
        fs::write(
            &path,
            "verbs = [\"chipear\"]\nadjectives = [\"pesado\"]\n\n[words]\nputt = { lemma = \"putt\", pos = \"NOUN\" }\n",
        )
        .unwrap();

        let analyzer = RuleAnalyzer::with_model_file(Lexicon::builtin(), &path).unwrap();
        let tokens = analyzer.analyze("chipeo el putt pesada").tokens;
        assert_eq!(tokens[0].lemma, "chipear");
        assert_eq!(tokens[0].pos, PosTag::Verb);
        assert_eq!(tokens[2].pos, PosTag::Noun);
        assert_eq!(tokens[3].lemma, "pesado");
    }

    #[test]
    fn test_unreadable_model_file() {
        let result = RuleAnalyzer::with_model_file(Lexicon::builtin(), Path::new("/no/such/model.toml"));
        assert!(matches!(result, Err(NlpError::ModelRead { .. })));
    }
}
