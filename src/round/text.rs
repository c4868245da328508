//! Free-text answer normalization
//!
//! Both the typed answer and the reference localized name go through the
//! same normalization before comparison: trim, case-fold, strip
//! diacritics. Catalog names are Latin-script, so folding is a direct
//! mapping over the accented Latin range rather than full Unicode
//! decomposition.

/// Normalize a name for comparison: trimmed, lowercased, diacritics folded
pub fn normalize(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        fold_char(c, &mut out);
    }
    out
}

fn fold_char(c: char, out: &mut String) {
    let folded: &str = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'œ' => "oe",
        'æ' => "ae",
        'ß' => "ss",
        _ => {
            out.push(c);
            return;
        }
    };
    out.push_str(folded);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_diacritic_insensitive() {
        assert_eq!(normalize("Évoli"), normalize("evoli"));
        assert_eq!(normalize("Flamiaou"), "flamiaou");
        assert_eq!(normalize("Noctali"), normalize("NOCTALI"));
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(normalize("  Pikachu \t"), "pikachu");
    }

    #[test]
    fn test_ligatures_expand() {
        assert_eq!(normalize("Œuf"), "oeuf");
        assert_eq!(normalize("Ærialis"), "aerialis");
    }

    #[test]
    fn test_interior_characters_preserved() {
        assert_eq!(normalize("M. Mime"), "m. mime");
        assert_eq!(normalize("Nidoran♀"), "nidoran♀");
    }
}
