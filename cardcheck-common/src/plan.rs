//! Plan classification over normalized card text
//!
//! Classification is purely lexical: a static rule table maps each commercial
//! plan type to the tokens that identify it, and a fixed indicator list marks
//! non-commercial (government or catastrophic) coverage. Non-commercial
//! indicators always win, a single clean commercial match names the plan, and
//! anything else is reported as UNKNOWN or CONFLICT rather than guessed at.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::NormalizedText;

/// Plan categories a classification can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanType {
    #[serde(rename = "PPO")]
    Ppo,
    #[serde(rename = "POS")]
    Pos,
    #[serde(rename = "HMO")]
    Hmo,
    #[serde(rename = "EPO")]
    Epo,
    /// Medicare, Medicaid, or other government/catastrophic coverage.
    #[serde(rename = "NON-COMMERCIAL")]
    NonCommercial,
    /// No recognizable plan token in the text.
    #[serde(rename = "UNKNOWN")]
    Unknown,
    /// More than one commercial plan token in the text.
    #[serde(rename = "CONFLICT")]
    Conflict,
}

/// Outcome of classifying one card's worth of text.
///
/// Invariants:
/// - `has_oon` is true only when `plan_type` is PPO or POS and `conflict`
///   is false.
/// - `conflict` is true whenever zero or multiple commercial tokens matched,
///   or any non-commercial indicator is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "planType")]
    pub plan_type: PlanType,
    /// True only for a clean PPO or POS match.
    #[serde(rename = "hasOON")]
    pub has_oon: bool,
    pub conflict: bool,
}

impl ClassificationResult {
    fn ambiguous(plan_type: PlanType) -> Self {
        Self {
            plan_type,
            has_oon: false,
            conflict: true,
        }
    }
}

/// Detection rule for one commercial plan type.
struct PlanRule {
    plan: PlanType,
    /// Standalone abbreviation, matched with word boundaries on the
    /// uppercase form.
    word: &'static str,
    /// Substrings matched on the collapsed form: the abbreviation itself
    /// plus the collapsed full plan name.
    collapsed_terms: &'static [&'static str],
    /// Whether this plan carries out-of-network benefits.
    has_oon: bool,
}

impl PlanRule {
    fn matches(&self, word_pattern: &Regex, text: &NormalizedText) -> bool {
        word_pattern.is_match(&text.uppercase)
            || self
                .collapsed_terms
                .iter()
                .any(|term| text.collapsed.contains(term))
    }
}

/// The four commercial plan types this workflow recognizes. Extending
/// coverage to a new plan type means adding a row here, nothing else.
const PLAN_RULES: &[PlanRule] = &[
    PlanRule {
        plan: PlanType::Ppo,
        word: "PPO",
        collapsed_terms: &["PPO", "PREFERREDPROVIDERORGANIZATION"],
        has_oon: true,
    },
    PlanRule {
        plan: PlanType::Pos,
        word: "POS",
        collapsed_terms: &["POS", "POINTOFSERVICE"],
        has_oon: true,
    },
    PlanRule {
        plan: PlanType::Hmo,
        word: "HMO",
        collapsed_terms: &["HMO", "HEALTHMAINTENANCEORGANIZATION"],
        has_oon: false,
    },
    PlanRule {
        plan: PlanType::Epo,
        word: "EPO",
        collapsed_terms: &["EPO", "EXCLUSIVEPROVIDERORGANIZATION"],
        has_oon: false,
    },
];

/// Collapsed-form substrings that mark government or catastrophic coverage.
/// Note these are bare substring checks: "VA" also fires inside longer words,
/// which errs on the side of rejecting rather than booking an ineligible card.
const NON_COMMERCIAL_TERMS: &[&str] = &[
    "MEDICARE",
    "MEDICAID",
    "TRICARE",
    "VETERANS",
    "VA",
    "CATASTROPHIC",
];

/// Word-boundary patterns for `PLAN_RULES`, compiled once, index-aligned.
static WORD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    PLAN_RULES
        .iter()
        .map(|rule| {
            Regex::new(&format!(r"\b{}\b", rule.word)).expect("plan token patterns are static")
        })
        .collect()
});

/// Classify normalized card text into a plan eligibility outcome.
///
/// Rule order:
/// 1. Any non-commercial indicator short-circuits to NON-COMMERCIAL with
///    `conflict = true`, regardless of commercial tokens also present.
/// 2. Exactly one commercial rule matching names the plan; only PPO and POS
///    carry out-of-network benefits.
/// 3. Zero matches is UNKNOWN, two or more is CONFLICT; both are reported
///    with `conflict = true` instead of guessing.
///
/// Pure function of the input text: classifying the same text twice yields
/// an identical result.
pub fn classify(text: &NormalizedText) -> ClassificationResult {
    if NON_COMMERCIAL_TERMS
        .iter()
        .any(|term| text.collapsed.contains(term))
    {
        return ClassificationResult::ambiguous(PlanType::NonCommercial);
    }

    let matched: Vec<&PlanRule> = PLAN_RULES
        .iter()
        .zip(WORD_PATTERNS.iter())
        .filter(|(rule, pattern)| rule.matches(pattern, text))
        .map(|(rule, _)| rule)
        .collect();

    match matched.as_slice() {
        [] => ClassificationResult::ambiguous(PlanType::Unknown),
        [rule] => ClassificationResult {
            plan_type: rule.plan,
            has_oon: rule.has_oon,
            conflict: false,
        },
        _ => ClassificationResult::ambiguous(PlanType::Conflict),
    }
}

/// Normalize raw text and classify it in one step.
pub fn classify_raw(raw: &str) -> ClassificationResult {
    classify(&NormalizedText::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(raw: &str) -> ClassificationResult {
        classify_raw(raw)
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "Plan Type: PPO\nNetwork: In/Out of Network";
        assert_eq!(result(text), result(text));
    }

    #[test]
    fn single_ppo_match_has_oon() {
        let outcome = result("Plan Type: PPO");
        assert_eq!(outcome.plan_type, PlanType::Ppo);
        assert!(outcome.has_oon);
        assert!(!outcome.conflict);
    }

    #[test]
    fn single_pos_match_has_oon() {
        let outcome = result("POS");
        assert_eq!(outcome.plan_type, PlanType::Pos);
        assert!(outcome.has_oon);
        assert!(!outcome.conflict);
    }

    #[test]
    fn single_hmo_match_is_commercial_without_oon() {
        let outcome = result("HMO");
        assert_eq!(outcome.plan_type, PlanType::Hmo);
        assert!(!outcome.has_oon);
        assert!(!outcome.conflict);
    }

    #[test]
    fn single_epo_match_is_commercial_without_oon() {
        let outcome = result("EPO");
        assert_eq!(outcome.plan_type, PlanType::Epo);
        assert!(!outcome.has_oon);
        assert!(!outcome.conflict);
    }

    #[test]
    fn full_plan_names_match_through_collapsed_form() {
        assert_eq!(
            result("Preferred Provider Organization").plan_type,
            PlanType::Ppo
        );
        assert_eq!(result("Point of Service").plan_type, PlanType::Pos);
        assert_eq!(
            result("Health Maintenance Organization").plan_type,
            PlanType::Hmo
        );
        assert_eq!(
            result("Exclusive Provider Organization").plan_type,
            PlanType::Epo
        );
    }

    #[test]
    fn ocr_punctuation_noise_does_not_hide_the_plan() {
        let expected = result("PPO");
        assert_eq!(result("P.P.O."), expected);
        assert_eq!(result("PPO PLAN"), expected);
        assert_eq!(result("P P O"), expected);
    }

    #[test]
    fn multiple_commercial_tokens_conflict() {
        let outcome = result("PPO / HMO hybrid");
        assert_eq!(outcome.plan_type, PlanType::Conflict);
        assert!(!outcome.has_oon);
        assert!(outcome.conflict);
    }

    #[test]
    fn no_recognized_token_is_unknown() {
        let outcome = result("member id 00123, group 778");
        assert_eq!(outcome.plan_type, PlanType::Unknown);
        assert!(!outcome.has_oon);
        assert!(outcome.conflict);
    }

    #[test]
    fn empty_text_is_unknown() {
        let outcome = result("");
        assert_eq!(outcome.plan_type, PlanType::Unknown);
        assert!(outcome.conflict);
    }

    #[test]
    fn non_commercial_beats_commercial_tokens() {
        let outcome = result("MEDICARE supplement with PPO network");
        assert_eq!(outcome.plan_type, PlanType::NonCommercial);
        assert!(!outcome.has_oon);
        assert!(outcome.conflict);
    }

    #[test]
    fn each_non_commercial_indicator_fires() {
        for text in [
            "Medicare Part B",
            "Medicaid managed care",
            "TRICARE East",
            "Veterans choice program",
            "VA community care",
            "catastrophic coverage only",
        ] {
            let outcome = result(text);
            assert_eq!(
                outcome.plan_type,
                PlanType::NonCommercial,
                "expected NON-COMMERCIAL for {text:?}"
            );
            assert!(outcome.conflict);
        }
    }

    #[test]
    fn va_indicator_fires_inside_longer_words() {
        // "PRIVATE" collapses to PRIVATE, which contains VA. Deliberate:
        // the check errs toward rejection rather than booking a government
        // plan that OCR mangled.
        let outcome = result("PRIVATE PPO");
        assert_eq!(outcome.plan_type, PlanType::NonCommercial);
    }

    #[test]
    fn has_oon_only_for_clean_ppo_or_pos() {
        for raw in ["PPO", "POS"] {
            assert!(result(raw).has_oon);
        }
        for raw in ["HMO", "EPO", "PPO POS", "MEDICARE PPO", "nothing here"] {
            assert!(!result(raw).has_oon, "unexpected OON for {raw:?}");
        }
    }

    #[test]
    fn wire_names_match_the_client_contract() {
        let outcome = result("Medicare Part B");
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json["planType"], "NON-COMMERCIAL");
        assert_eq!(json["hasOON"], false);
        assert_eq!(json["conflict"], true);

        let json = serde_json::to_value(result("PPO")).unwrap();
        assert_eq!(json["planType"], "PPO");
        assert_eq!(json["hasOON"], true);
    }
}
