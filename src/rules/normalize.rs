//! Case-, accent- and punctuation-insensitive keyword matching.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercase, trim, strip diacritics (NFKD, combining marks dropped), and
/// replace every character that is neither alphanumeric nor whitespace
/// with a space.
///
/// ```
/// use autonomo::rules::normalize;
///
/// assert_eq!(normalize("  Consultoría S.L. "), "consultoria s l ");
/// ```
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// First keyword, in list order, whose normalized form is a substring of
/// the normalized `text`.
///
/// Matching is by substring, so a keyword inside a longer word matches.
/// Keywords that normalize to nothing never match.
pub fn keyword_match<'k, S: AsRef<str>>(text: &str, keywords: &'k [S]) -> Option<&'k str> {
    find_keyword(&normalize(text), keywords)
}

/// [`keyword_match`] against text that is already normalized.
pub(crate) fn find_keyword<'k, S: AsRef<str>>(
    normalized: &str,
    keywords: &'k [S],
) -> Option<&'k str> {
    keywords.iter().map(|k| AsRef::<str>::as_ref(k)).find(|keyword| {
        let needle = normalize(keyword);
        !needle.trim().is_empty() && normalized.contains(needle.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(normalize("Médico"), "medico");
        assert_eq!(normalize("ESPAÑA"), "espana");
        assert_eq!(normalize("Formación reglada"), "formacion reglada");
    }

    #[test]
    fn punctuation_becomes_space() {
        assert_eq!(normalize("wi-fi/fibra"), "wi fi fibra");
        assert_eq!(normalize("€12,50"), " 12 50");
    }

    #[test]
    fn first_keyword_in_list_order_wins() {
        let keywords = ["fibra", "internet"];
        assert_eq!(keyword_match("Internet + fibra óptica", &keywords), Some("fibra"));
    }

    #[test]
    fn substring_inside_word_matches() {
        assert_eq!(keyword_match("Psicólogos Asociados", &["psicolog"]), Some("psicolog"));
    }

    #[test]
    fn returns_keyword_as_written() {
        assert_eq!(keyword_match("TAMPONES", &["Tampón"]), Some("Tampón"));
    }

    #[test]
    fn no_match() {
        assert_eq!(keyword_match("alquiler de local", &["hosting"]), None);
        assert_eq!(keyword_match("", &["hosting"]), None);
    }

    #[test]
    fn blank_keyword_never_matches() {
        assert_eq!(keyword_match("anything", &["", " ", "."]), None);
    }
}
