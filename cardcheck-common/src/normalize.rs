//! Text normalization for OCR output
//!
//! OCR text is noisy: stray punctuation, line breaks inside tokens, mixed
//! case. Classification therefore never looks at raw text directly; it works
//! over the two comparison forms derived here.

/// The two comparison forms derived from one stretch of raw OCR text.
///
/// `uppercase` keeps every character so word boundaries survive for regex
/// checks like `\bPPO\b`. `collapsed` strips everything outside `[A-Z0-9]`,
/// which lets substring checks tolerate artifacts such as "P.P.O." or a line
/// break in the middle of "PPO PLAN".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Input upper-cased, punctuation and whitespace intact.
    pub uppercase: String,
    /// Input upper-cased with all non-alphanumeric characters removed.
    pub collapsed: String,
}

impl NormalizedText {
    /// Derive both comparison forms from raw text.
    ///
    /// Deterministic and idempotent: feeding either derived form back in
    /// yields the same `collapsed`, and feeding `uppercase` back in yields
    /// identical forms.
    pub fn from_raw(raw: &str) -> Self {
        let uppercase = raw.to_uppercase();
        let collapsed = uppercase
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        Self {
            uppercase,
            collapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_form_preserves_boundaries() {
        let norm = NormalizedText::from_raw("Plan Type: ppo\nGroup #123");
        assert_eq!(norm.uppercase, "PLAN TYPE: PPO\nGROUP #123");
    }

    #[test]
    fn collapsed_form_strips_everything_but_alphanumerics() {
        let norm = NormalizedText::from_raw("P.P.O. — Group #123!");
        assert_eq!(norm.collapsed, "PPOGROUP123");
    }

    #[test]
    fn collapsed_form_bridges_line_breaks() {
        let norm = NormalizedText::from_raw("POINT OF\nSERVICE");
        assert_eq!(norm.collapsed, "POINTOFSERVICE");
    }

    #[test]
    fn empty_input_yields_empty_forms() {
        let norm = NormalizedText::from_raw("");
        assert!(norm.uppercase.is_empty());
        assert!(norm.collapsed.is_empty());
    }

    #[test]
    fn normalization_is_idempotent() {
        let first = NormalizedText::from_raw("P.p.o. plan\twith extras");
        let again = NormalizedText::from_raw(&first.uppercase);
        assert_eq!(first, again);

        let collapsed_again = NormalizedText::from_raw(&first.collapsed);
        assert_eq!(collapsed_again.uppercase, first.collapsed);
        assert_eq!(collapsed_again.collapsed, first.collapsed);
    }
}
