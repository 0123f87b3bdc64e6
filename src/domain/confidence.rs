//! Heuristic confidence scoring for generated answers
//!
//! Deliberately rule-based rather than learned: the same (response, sources)
//! pair always yields the same score, and each adjustment can be audited and
//! tested on its own. The rules run as an ordered fold; a rule can keep the
//! running value, replace it, shift it, or halt the fold with a final score.

use tracing::debug;

use super::fragment::SourceSummary;
use super::prompt::HANDOFF_MARKER;

/// Responses longer than this get a small completeness boost.
const COMPREHENSIVE_RESPONSE_CHARS: usize = 100;

/// Mean source score below this is taken as a sign the collection holds
/// low-fidelity (e.g. placeholder) embeddings; content presence is trusted
/// over raw score magnitude in that case.
const LOW_SCORE_FLOOR: f32 = 0.1;

/// Phrases that signal the model could not ground its answer. Scanning stops
/// at the first match.
const STRONG_UNCERTAINTY_PHRASES: &[&str] = &[
    "i don't know",
    "i cannot answer",
    "i'm unable to help",
    "no information available",
    "not provided in the context",
    "i don't have access to",
    "cannot find",
];

struct ScoreInput<'a> {
    response_lower: String,
    response_chars: usize,
    sources: &'a [SourceSummary],
}

/// What one rule does to the running score.
enum RuleEffect {
    Keep,
    Set(f32),
    Add(f32),
    /// Stop the fold and return this exact value, skipping the final clamp.
    Halt(f32),
}

struct AdjustmentRule {
    name: &'static str,
    apply: fn(f32, &ScoreInput<'_>) -> RuleEffect,
}

/// Ordered rule chain. Order matters: the low-score override replaces the
/// boosts before it, and the handoff short-circuit outranks the uncertainty
/// scan because the handoff sentence itself contains an uncertainty phrase.
const RULES: &[AdjustmentRule] = &[
    AdjustmentRule {
        name: "source_presence",
        apply: |_, input| {
            RuleEffect::Set(if input.sources.is_empty() { 0.3 } else { 0.7 })
        },
    },
    AdjustmentRule {
        name: "extra_sources",
        apply: |_, input| {
            if input.sources.len() > 1 {
                let boost = ((input.sources.len() - 1) as f32 * 0.1).min(0.2);
                RuleEffect::Add(boost)
            } else {
                RuleEffect::Keep
            }
        },
    },
    AdjustmentRule {
        name: "comprehensive_response",
        apply: |_, input| {
            if input.response_chars > COMPREHENSIVE_RESPONSE_CHARS {
                RuleEffect::Add(0.05)
            } else {
                RuleEffect::Keep
            }
        },
    },
    AdjustmentRule {
        name: "low_score_override",
        apply: |_, input| {
            if input.sources.is_empty() {
                return RuleEffect::Keep;
            }

            let mean: f32 = input.sources.iter().map(|s| s.score).sum::<f32>()
                / input.sources.len() as f32;

            if mean < LOW_SCORE_FLOOR {
                RuleEffect::Set(0.75)
            } else {
                RuleEffect::Keep
            }
        },
    },
    AdjustmentRule {
        name: "handoff_short_circuit",
        apply: |_, input| {
            if input.response_lower.contains(HANDOFF_MARKER) {
                RuleEffect::Halt(0.0)
            } else {
                RuleEffect::Keep
            }
        },
    },
    AdjustmentRule {
        name: "strong_uncertainty",
        apply: |_, input| {
            for phrase in STRONG_UNCERTAINTY_PHRASES {
                if input.response_lower.contains(phrase) {
                    return RuleEffect::Add(-0.4);
                }
            }
            RuleEffect::Keep
        },
    },
];

/// Score a generated answer against its sources, in `[0, 1]`.
pub fn score(response: &str, sources: &[SourceSummary]) -> f32 {
    let input = ScoreInput {
        response_lower: response.to_lowercase(),
        response_chars: response.chars().count(),
        sources,
    };

    let mut value = 0.0_f32;

    for rule in RULES {
        match (rule.apply)(value, &input) {
            RuleEffect::Keep => {}
            RuleEffect::Set(new_value) => {
                debug!(rule = rule.name, from = value, to = new_value, "confidence set");
                value = new_value;
            }
            RuleEffect::Add(delta) => {
                debug!(rule = rule.name, delta, "confidence adjusted");
                value += delta;
            }
            RuleEffect::Halt(final_value) => {
                debug!(rule = rule.name, value = final_value, "confidence halted");
                return final_value;
            }
        }
    }

    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(score: f32) -> SourceSummary {
        SourceSummary {
            content: "content".to_string(),
            title: "Doc".to_string(),
            doc_type: "text".to_string(),
            score,
        }
    }

    #[test]
    fn test_no_sources_short_unlisted_uncertainty() {
        // "I'm not sure." is not in the fixed phrase list, so only the
        // no-source base applies.
        let confidence = score("I'm not sure.", &[]);
        assert_eq!(confidence, 0.3);
    }

    #[test]
    fn test_three_sources_long_confident_response() {
        let sources = vec![source(0.4), source(0.4), source(0.4)];
        let response = "a".repeat(150);

        let confidence = score(&response, &sources);

        // 0.7 base + min(2 * 0.1, 0.2) + 0.05 length boost
        assert!((confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_handoff_reply_forces_zero() {
        let sources = vec![source(0.9), source(0.8)];
        let confidence = score(
            "Let me connect you with a team member who can help you with that.",
            &sources,
        );

        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_low_average_score_overrides_boosts() {
        let sources = vec![source(0.05), source(0.02), source(0.08)];
        let response = "a".repeat(150);

        let confidence = score(&response, &sources);

        // Boosts from source count and length are discarded by the override.
        assert!((confidence - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_uncertainty_phrase_penalty() {
        let sources = vec![source(0.5)];
        let confidence = score("I don't know the answer to that.", &sources);

        // 0.7 base - 0.4 penalty; response is short, single source.
        assert!((confidence - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_only_first_uncertainty_phrase_counts() {
        let sources = vec![source(0.5)];
        let confidence = score("I don't know and I cannot answer.", &sources);

        // A single -0.4, not one per matching phrase.
        assert!((confidence - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_clamped_to_zero() {
        let confidence = score("I don't know.", &[]);

        // 0.3 base - 0.4 penalty clamps at 0.
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_source_boost_caps_at_two_tenths() {
        let sources: Vec<SourceSummary> = (0..6).map(|_| source(0.5)).collect();
        let confidence = score("short", &sources);

        // 0.7 + cap(0.2); five extra sources do not push past the cap.
        assert!((confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_deterministic() {
        let sources = vec![source(0.4), source(0.6)];
        let response = "The product ships within two business days.";

        assert_eq!(score(response, &sources), score(response, &sources));
    }

    #[test]
    fn test_always_within_unit_interval() {
        let long_response = "a".repeat(500);
        let many_sources: Vec<SourceSummary> = (0..8).map(|_| source(0.99)).collect();
        let cases: Vec<(&str, Vec<SourceSummary>)> = vec![
            ("", Vec::new()),
            ("I don't know.", Vec::new()),
            ("ok", vec![source(0.0)]),
            (long_response.as_str(), many_sources),
        ];

        for (response, sources) in &cases {
            let confidence = score(response, sources);
            assert!((0.0..=1.0).contains(&confidence));
        }
    }
}
