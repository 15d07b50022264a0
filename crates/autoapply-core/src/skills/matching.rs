//! Case-insensitive term matching shared by the scorer and the role filter.

/// True when `text` contains `term`, also trying `term` with `.` and `-` removed
/// ("react.js" matches "reactjs", "server-side" matches "serverside").
///
/// `text` must already be lower-cased.
pub fn contains_term(text: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }
    if text.contains(&term) {
        return true;
    }
    [term.replace('.', ""), term.replace('-', "")]
        .iter()
        .any(|variant| !variant.is_empty() && *variant != term && text.contains(variant.as_str()))
}

pub fn text_has_any<S: AsRef<str>>(text: &str, terms: &[S]) -> bool {
    terms.iter().any(|t| contains_term(text, t.as_ref()))
}

/// True when any chip contains any of `terms`.
pub fn chips_have_any<S: AsRef<str>>(chips: &[String], terms: &[S]) -> bool {
    chips.iter().any(|chip| text_has_any(chip, terms))
}
