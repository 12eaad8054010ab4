use fancy_regex::Regex;
use std::collections::HashSet;

/// Case-insensitive whole-word pattern for a literal word or phrase.
pub fn word_regex(word: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}\b", fancy_regex::escape(word))).expect("escaped word pattern")
}

/// Match failures (backtrack limit) count as no match.
pub fn is_match(re: &Regex, text: &str) -> bool {
    re.is_match(text).unwrap_or(false)
}

/// Drop every non-ASCII character (emoji, smart quotes) from model output.
pub fn to_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

/// Trim lines and drop blanks and exact repeats, keeping first-seen order.
pub fn dedupe_lines(text: &str) -> String {
    let mut seen = HashSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && seen.insert(*line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_words_only() {
        let rice = word_regex("rice");
        assert!(is_match(&rice, "need rice and beans"));
        assert!(is_match(&rice, "RICE, please"));
        assert!(!is_match(&rice, "best price today"));
        assert!(is_match(&word_regex("peanut butter"), "Peanut Butter, eggs"));
        assert!(!is_match(&word_regex("snap"), "snapshot of my list"));
    }

    #[test]
    fn word_patterns_escape_metacharacters() {
        assert!(is_match(&word_regex("1.5 lb"), "bag of 1.5 lb"));
        assert!(!is_match(&word_regex("1.5 lb"), "bag of 105 lb"));
    }

    #[test]
    fn ascii_strips_emoji() {
        assert_eq!(to_ascii("Eggs 🥚 — great"), "Eggs   great");
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let text = "Shop at Walmart\n\n  Shop at Walmart  \nEggs: $1.98\nShop at Walmart";
        assert_eq!(dedupe_lines(text), "Shop at Walmart\nEggs: $1.98");
    }
}
