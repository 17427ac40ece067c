/// Canonical matching key: lowercase, trim, whitespace runs to `_`, then keep only `[a-z0-9_]`.
///
/// Total and idempotent.
///
/// ```
/// # use ultradrop::estimator::slugify;
/// assert_eq!(slugify("Dark Cave!!"), "dark_cave");
/// assert_eq!(slugify(""), "");
/// ```
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs_and_strips_punctuation() {
        assert_eq!(slugify("  Ice \t Cave  "), "ice_cave");
        assert_eq!(slugify("Fire-Pit #2"), "firepit_2");
        assert_eq!(slugify("Über Höhle"), "ber_hhle");
    }

    #[test]
    fn is_idempotent() {
        for input in ["Dark Cave!!", "  a  b  ", "___", "Mixed_Case Name 9", ""] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "input {input:?}");
        }
    }
}
