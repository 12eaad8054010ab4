use crate::money::Money;
use fancy_regex::Regex;
use std::sync::LazyLock;

/// Amount patterns per program, tried in order; first hit wins. Applied to upper-cased input.
fn program_patterns(program: &str) -> Vec<Regex> {
    let amount = r"(\d+(?:\.\d{2})?)";
    [
        format!(r"{program}\s*\$?{amount}"),
        format!(r"{program}[:\s]+\$?{amount}"),
        format!(r"\${amount}\s+{program}"),
        format!(r"(\d+)\s*DOLLARS?\s*{program}"),
        format!(r"(\d+)\s*{program}"),
        format!(r"{program}.*?(\d+)"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static budget pattern"))
    .collect()
}

static SNAP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| program_patterns("SNAP"));
static WIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| program_patterns("WIC"));

/// Phrases that mark a request as a nutrition question rather than a budget one.
pub const NUTRITION_PHRASES: &[&str] = &[
    "nutrition analysis",
    "healthy alternatives",
    "diabetes friendly",
    "heart healthy",
    "low sodium",
    "high protein",
    "vitamin content",
    "nutritional value",
    "dietary advice",
    "health benefits",
    "substitute for health",
    "nutritious options",
    "meal planning",
];

/// SNAP and WIC amounts stated in free text; a program that is not mentioned yields zero.
pub fn parse_budget(text: &str) -> (Money, Money) {
    let upper = text.to_uppercase();
    (
        first_amount(&SNAP_PATTERNS, &upper),
        first_amount(&WIC_PATTERNS, &upper),
    )
}

fn first_amount(patterns: &[Regex], text: &str) -> Money {
    patterns
        .iter()
        .find_map(|re| {
            re.captures(text)
                .ok()
                .flatten()
                .and_then(|caps| caps.get(1))
                .and_then(|m| Money::parse(m.as_str()))
        })
        .unwrap_or(Money::ZERO)
}

pub fn is_nutrition_question(text: &str) -> bool {
    let lower = text.to_lowercase();
    NUTRITION_PHRASES.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn dollar_sign_before_program() {
        assert_eq!(
            parse_budget("I have $25 SNAP budget, need protein-rich food"),
            (cents(2500), Money::ZERO)
        );
    }

    #[test]
    fn both_programs_after_keyword() {
        assert_eq!(
            parse_budget("I have SNAP $45 and WIC $20"),
            (cents(4500), cents(2000))
        );
        assert_eq!(parse_budget("SNAP: $40, WIC: $15"), (cents(4000), cents(1500)));
    }

    #[test]
    fn lowercase_and_cents() {
        assert_eq!(parse_budget("snap $30.75 this month"), (cents(3075), Money::ZERO));
        // the loose trailing pattern only sees whole dollars
        assert_eq!(parse_budget("my snap is $30.75"), (cents(3000), Money::ZERO));
        assert_eq!(parse_budget("i have wic 12"), (Money::ZERO, cents(1200)));
    }

    #[test]
    fn dollars_word_form() {
        assert_eq!(parse_budget("30 dollars snap"), (cents(3000), Money::ZERO));
    }

    #[test]
    fn no_amounts() {
        assert_eq!(parse_budget("I need groceries"), (Money::ZERO, Money::ZERO));
    }

    #[test]
    fn nutrition_questions_are_detected() {
        assert!(is_nutrition_question("Give me a Nutrition Analysis of eggs"));
        assert!(is_nutrition_question("what are heart healthy options"));
        assert!(!is_nutrition_question("I have $25 SNAP budget, need protein-rich food"));
    }
}
