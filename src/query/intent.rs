use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Intent;

use super::params;

struct IntentRule {
    intent: Intent,
    patterns: Vec<Regex>,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

/// Pattern sets in priority order; classification stops at the first rule
/// with any hit, so cross-intent ambiguity resolves to the earlier rule.
static INTENT_RULES: Lazy<Vec<IntentRule>> = Lazy::new(|| {
    vec![
        IntentRule {
            intent: Intent::OilPrice,
            patterns: compile(&[
                r"oil\s+pric(?:e|es|ing)",
                r"crude\s+oil",
                r"brent",
                r"petroleum\s+pric(?:e|es|ing)",
                r"fuel\s+pric(?:e|es|ing)",
                r"gas\s+pric(?:e|es|ing)",
                r"petrol\s+pric(?:e|es|ing)",
            ]),
        },
        IntentRule {
            intent: Intent::FxRates,
            patterns: compile(&[
                r"(?:fx|foreign exchange|currency)\s+rat(?:e|es)",
                r"exchange\s+rat(?:e|es)",
                r"currency\s+conversion",
            ]),
        },
        IntentRule {
            intent: Intent::Weather,
            patterns: compile(&[
                r"weather(?:\s+forecast)?",
                r"temperature",
                r"(?:rain|snow|precipitation)",
                r"forecast",
            ]),
        },
    ]
});

static PRICE_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"fuel|gas|petrol|price").unwrap());

/// Classify a question into one of the supported intents.
///
/// When no pattern set matches but the text names a location alongside a
/// fuel/price word, the question is about local fuel cost, so oil_price is
/// inferred.
pub fn classify(query: &str) -> Intent {
    let lowered = query.to_lowercase();

    for rule in INTENT_RULES.iter() {
        if rule.patterns.iter().any(|p| p.is_match(&lowered)) {
            return rule.intent;
        }
    }

    if params::location_phrase(query).is_some() && PRICE_HINT.is_match(&lowered) {
        return Intent::OilPrice;
    }

    Intent::Unknown
}
