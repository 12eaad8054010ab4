//! Heuristic reading of a free-text grocery request: benefit amounts, programs,
//! health conditions and explicitly requested foods.

use crate::budget::parse_budget;
use crate::catalog::Program;
use crate::money::Money;
use crate::nutrition::HealthCondition;
use crate::text::{is_match, word_regex};
use fancy_regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

/// Budget assumed when the request names no amount at all.
pub const DEFAULT_BUDGET: Money = Money::from_cents(5000);

pub const COMMON_ITEMS: &[&str] = &[
    "milk", "bread", "eggs", "chicken", "beef", "pork", "fish", "cheese", "yogurt", "cereal",
    "rice", "pasta", "beans", "bananas", "apples", "oranges", "carrots", "potatoes", "onions",
    "tomatoes", "lettuce", "spinach", "broccoli",
];

static TOTAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(\d+(?:\.\d{2})?)\s*(?:\$|dollars?)\s*(?:snap|wic|credit)",
        r"(?i)\$(\d+(?:\.\d{2})?)\s*(?:snap|wic|credit)",
        r"(?i)(\d+(?:\.\d{2})?)\s+(?:snap|wic)\s+credit",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static total pattern"))
    .collect()
});

static SNAP_MENTION: LazyLock<Regex> = LazyLock::new(|| word_regex("snap"));
static WIC_MENTION: LazyLock<Regex> = LazyLock::new(|| word_regex("wic"));

static ITEM_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    COMMON_ITEMS
        .iter()
        .map(|item| (*item, word_regex(item)))
        .collect()
});

static ANY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d{2})?)").expect("static number pattern"));

#[derive(Debug, Clone, Serialize)]
pub struct RequestAnalysis {
    pub snap: Money,
    pub wic: Money,
    pub programs: Vec<Program>,
    pub health_conditions: Vec<HealthCondition>,
    pub requested_items: Vec<String>,
    /// True when no per-program amount was found and the total was inferred.
    pub inferred_budget: bool,
}

impl RequestAnalysis {
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        let (mut snap, mut wic) = parse_budget(text);

        let mut programs = Vec::new();
        if is_match(&SNAP_MENTION, text) || snap.is_positive() {
            programs.push(Program::Snap);
        }
        if is_match(&WIC_MENTION, text) || wic.is_positive() {
            programs.push(Program::Wic);
        }

        let inferred_budget = !snap.is_positive() && !wic.is_positive();
        if inferred_budget {
            let total = fallback_total(text);
            if programs == [Program::Wic] {
                wic = total;
            } else {
                snap = total;
            }
        }
        if programs.is_empty() {
            programs.push(Program::Snap);
        }

        let mut health_conditions = Vec::new();
        if lower.contains("diabetes") || lower.contains("diabetic") {
            health_conditions.push(HealthCondition::Diabetes);
        }
        if lower.contains("hypertension") || lower.contains("high blood pressure") {
            health_conditions.push(HealthCondition::Hypertension);
        }

        let requested_items = ITEM_PATTERNS
            .iter()
            .filter(|(_, re)| is_match(re, text))
            .map(|(item, _)| item.to_string())
            .collect();

        let analysis = Self {
            snap,
            wic,
            programs,
            health_conditions,
            requested_items,
            inferred_budget,
        };
        debug!(
            snap = %analysis.snap,
            wic = %analysis.wic,
            inferred = analysis.inferred_budget,
            conditions = analysis.health_conditions.len(),
            "request analysed"
        );
        analysis
    }

    pub fn total(&self) -> Money {
        self.snap + self.wic
    }

    pub fn benefit_display(&self) -> &'static str {
        let snap = self.programs.contains(&Program::Snap);
        let wic = self.programs.contains(&Program::Wic);
        match (snap, wic) {
            (true, true) => "WIC + SNAP",
            (false, true) => "WIC",
            _ => "SNAP",
        }
    }
}

/// Total from `N$ credit` style phrases, summed over distinct matches; else the first
/// number in the text; else the default budget.
fn fallback_total(text: &str) -> Money {
    // keyed by capture offset so overlapping patterns count once
    let mut found: BTreeMap<usize, Money> = BTreeMap::new();
    for re in TOTAL_PATTERNS.iter() {
        for caps in re.captures_iter(text).flatten() {
            if let Some(m) = caps.get(1) {
                if let Some(amount) = Money::parse(m.as_str()) {
                    found.entry(m.start()).or_insert(amount);
                }
            }
        }
    }

    let total: Money = found.values().sum();
    if total.is_positive() {
        return total;
    }

    let first = ANY_NUMBER
        .captures(text)
        .ok()
        .flatten()
        .and_then(|caps| caps.get(1))
        .and_then(|m| Money::parse(m.as_str()))
        .unwrap_or(Money::ZERO);
    if first.is_positive() {
        first
    } else {
        DEFAULT_BUDGET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn snap_request() {
        let a = RequestAnalysis::from_text("I have $25 SNAP budget, need protein-rich food");
        assert_eq!(a.snap, cents(2500));
        assert_eq!(a.wic, Money::ZERO);
        assert_eq!(a.programs, vec![Program::Snap]);
        assert_eq!(a.benefit_display(), "SNAP");
        assert!(!a.inferred_budget);
    }

    #[test]
    fn wic_request_with_cents() {
        let a = RequestAnalysis::from_text("I have $43.25 WIC credit");
        assert_eq!(a.wic, cents(4325));
        assert_eq!(a.benefit_display(), "WIC");
    }

    #[test]
    fn combined_display() {
        let a = RequestAnalysis::from_text("I have SNAP $45 and WIC $20");
        assert_eq!(a.total(), cents(6500));
        assert_eq!(a.benefit_display(), "WIC + SNAP");
    }

    #[test]
    fn first_number_when_no_program_amount() {
        let a = RequestAnalysis::from_text("I'm diabetic and need $30 groceries");
        assert!(a.inferred_budget);
        assert_eq!(a.snap, cents(3000));
        assert_eq!(a.health_conditions, vec![HealthCondition::Diabetes]);
    }

    #[test]
    fn credit_phrases_are_summed() {
        let a = RequestAnalysis::from_text("I have 20$ credit and 15 dollars credit");
        assert_eq!(a.snap, cents(3500));
        assert_eq!(a.programs, vec![Program::Snap]);
    }

    #[test]
    fn inferred_total_goes_to_wic_when_only_wic_mentioned() {
        let a = RequestAnalysis::from_text("$12 credit for wic");
        assert_eq!(a.wic, cents(1200));
        assert_eq!(a.snap, Money::ZERO);
    }

    #[test]
    fn overlapping_patterns_count_once() {
        assert_eq!(fallback_total("$5 wic credit"), cents(500));
    }

    #[test]
    fn requested_items_are_whole_words() {
        let a = RequestAnalysis::from_text("Need Eggs, RICE and a snapshot of prices");
        assert_eq!(a.requested_items, vec!["eggs", "rice"]);
        assert_eq!(a.programs, vec![Program::Snap]);
        assert!(a.inferred_budget);
    }

    #[test]
    fn oversized_amounts_fall_back_to_default() {
        let a = RequestAnalysis::from_text("SNAP 90000000000000000 WIC 90000000000000000");
        assert_eq!(a.snap, DEFAULT_BUDGET);
        assert_eq!(a.wic, Money::ZERO);
        assert_eq!(a.total(), DEFAULT_BUDGET);
    }

    #[test]
    fn default_budget_without_numbers() {
        let a = RequestAnalysis::from_text("help me shop, I have high blood pressure");
        assert_eq!(a.snap, DEFAULT_BUDGET);
        assert_eq!(a.health_conditions, vec![HealthCondition::Hypertension]);
    }

    #[test]
    fn requested_items_whole_words() {
        let a = RequestAnalysis::from_text("Need milk, bread, eggs for $25");
        assert_eq!(a.requested_items, vec!["milk", "bread", "eggs"]);
        assert_eq!(a.snap, cents(2500));

        // "sandwich" must not count as a WIC mention
        let b = RequestAnalysis::from_text("$10 for a sandwich with rice");
        assert_eq!(b.programs, vec![Program::Snap]);
        assert_eq!(b.requested_items, vec!["rice"]);
    }
}
