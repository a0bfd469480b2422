//! Spelled-out Spanish numerals ("ciento cincuenta", "noventa y cinco")

const NUMBER_WORDS: &[(&str, u32)] = &[
    ("cero", 0),
    ("un", 1),
    ("uno", 1),
    ("una", 1),
    ("dos", 2),
    ("tres", 3),
    ("cuatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("siete", 7),
    ("ocho", 8),
    ("nueve", 9),
    ("diez", 10),
    ("once", 11),
    ("doce", 12),
    ("trece", 13),
    ("catorce", 14),
    ("quince", 15),
    ("dieciséis", 16),
    ("dieciseis", 16),
    ("diecisiete", 17),
    ("dieciocho", 18),
    ("diecinueve", 19),
    ("veinte", 20),
    ("veintiuno", 21),
    ("veintidós", 22),
    ("veintidos", 22),
    ("veintitrés", 23),
    ("veintitres", 23),
    ("veinticuatro", 24),
    ("veinticinco", 25),
    ("veintiséis", 26),
    ("veintiseis", 26),
    ("veintisiete", 27),
    ("veintiocho", 28),
    ("veintinueve", 29),
    ("treinta", 30),
    ("cuarenta", 40),
    ("cincuenta", 50),
    ("sesenta", 60),
    ("setenta", 70),
    ("ochenta", 80),
    ("noventa", 90),
    ("cien", 100),
    ("ciento", 100),
    ("doscientos", 200),
    ("doscientas", 200),
    ("trescientos", 300),
    ("trescientas", 300),
    ("cuatrocientos", 400),
    ("cuatrocientas", 400),
    ("quinientos", 500),
    ("quinientas", 500),
    ("seiscientos", 600),
    ("seiscientas", 600),
    ("setecientos", 700),
    ("setecientas", 700),
    ("ochocientos", 800),
    ("ochocientas", 800),
    ("novecientos", 900),
    ("novecientas", 900),
    ("mil", 1000),
];

/// Value of a single case-folded number word
pub fn word_value(word: &str) -> Option<u32> {
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, v)| *v)
}

/// Combine a run of number words, skipping "y" connectors; `None` when the
/// value does not fit in a `u32`
pub fn parse_spelled(words: &[&str]) -> Option<u32> {
    let mut total: u32 = 0;
    let mut current: u32 = 0;
    let mut seen = false;

    for word in words {
        if *word == "y" {
            continue;
        }
        let value = word_value(word)?;
        seen = true;
        if value == 1000 {
            total = total.checked_add(current.max(1).checked_mul(1000)?)?;
            current = 0;
        } else {
            current = current.checked_add(value)?;
        }
    }

    if !seen {
        return None;
    }
    total.checked_add(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_numbers() {
        assert_eq!(parse_spelled(&["ciento", "cincuenta"]), Some(150));
        assert_eq!(parse_spelled(&["noventa", "y", "cinco"]), Some(95));
        assert_eq!(parse_spelled(&["doscientas", "veinte"]), Some(220));
        assert_eq!(parse_spelled(&["dos", "mil", "trece"]), Some(2013));
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert_eq!(parse_spelled(&["ciento", "yardas"]), None);
        assert_eq!(parse_spelled(&["y"]), None);
        assert_eq!(parse_spelled(&[]), None);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut run = vec!["novecientos"; 5000];
        run.push("mil");
        assert_eq!(parse_spelled(&run), None);

        assert_eq!(parse_spelled(&["mil", "mil", "mil"]), Some(3000));
    }
}
