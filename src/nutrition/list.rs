// Free-text shopping lists -> `ListEntry`s. The nutrition model parses when available;
// line patterns cover offline use and bad model replies.

use super::{ListEntry, NutritionAgent};
use crate::agent::prompts;
use crate::catalog::Store;
use crate::money::Money;
use fancy_regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `Eggs (Walmart): $1.98`, `- Milk - $3.49`, `2. Rice $1.50`.
static PRICED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:[-*]|\d+[.)])?\s*([a-z][^$:()]*?)\s*(?:\((walmart|target)\))?\s*(?:[:-]|at)?\s*\$(\d+(?:\.\d{1,2})?)",
    )
    .expect("static priced line pattern")
});

/// `- eggs` or `3) brown rice` with no price.
static BULLET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*]|\d+[.)])\s*([A-Za-z][^$:]*)$").expect("static bullet line pattern")
});

/// Lines that start like this are summaries, not items.
const SUMMARY_PREFIXES: &[&str] = &[
    "snap", "wic", "total", "remaining", "budget", "balance", "based on", "save",
];

/// One item as the list-parsing model returns it.
#[derive(Debug, Deserialize)]
pub struct ParsedItem {
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub store: Option<String>,
}

impl ParsedItem {
    pub fn into_entry(self) -> Option<ListEntry> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(ListEntry {
            name: name.to_string(),
            price: self
                .price
                .and_then(Decimal::from_f64)
                .map(Money::new)
                .filter(|p| p.is_positive() && *p <= Money::MAX_AMOUNT),
            store: self.store.as_deref().and_then(Store::parse),
        })
    }
}

/// Pattern-based parse, one entry per item line.
pub fn parse_lines(text: &str) -> Vec<ListEntry> {
    text.lines().filter_map(|line| parse_line(line.trim())).collect()
}

fn parse_line(line: &str) -> Option<ListEntry> {
    let entry = if let Ok(Some(caps)) = PRICED_LINE.captures(line) {
        ListEntry {
            name: caps.get(1)?.as_str().trim().to_string(),
            price: caps.get(3).and_then(|m| Money::parse(m.as_str())),
            store: caps.get(2).and_then(|m| Store::parse(m.as_str())),
        }
    } else if let Ok(Some(caps)) = BULLET_LINE.captures(line) {
        ListEntry::named(caps.get(1)?.as_str().trim())
    } else {
        return None;
    };

    let lower = entry.name.to_lowercase();
    if entry.name.is_empty() || SUMMARY_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return None;
    }
    Some(entry)
}

impl NutritionAgent<'_> {
    /// Items in a pasted shopping list. Falls back to line patterns when the model
    /// is missing, fails or finds nothing.
    pub async fn parse_list(&self, text: &str) -> Vec<ListEntry> {
        if let Some(llm) = self.llm {
            match llm
                .complete_json::<Vec<ParsedItem>>(prompts::LIST_PARSER, text)
                .await
            {
                Ok(items) => {
                    let entries: Vec<ListEntry> =
                        items.into_iter().filter_map(ParsedItem::into_entry).collect();
                    if !entries.is_empty() {
                        debug!(items = entries.len(), "list parsed by model");
                        return entries;
                    }
                    debug!("model found no items, using line patterns");
                }
                Err(e) => warn!(error = %e, "list parse failed, using line patterns"),
            }
        }
        parse_lines(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmClient, Provider};

    #[test]
    fn priced_lines_keep_store_and_price() {
        let text = "Based on your $5.00 SNAP balance, you can buy groceries at Walmart:\n\
                    Fresh Bananas (Walmart): $0.58\n\
                    - Whole Milk - $3.49\n\
                    2. Brown Rice at $1.50\n\
                    Total cost: $5.57\n\
                    Remaining credit: $0.00";
        let list = parse_lines(text);
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].name, "Fresh Bananas");
        assert_eq!(list[0].store, Some(Store::Walmart));
        assert_eq!(list[0].price, Some(Money::from_cents(58)));
        assert_eq!(list[1].name, "Whole Milk");
        assert_eq!(list[1].price, Some(Money::from_cents(349)));
        assert!(list[1].store.is_none());
        assert_eq!(list[2].name, "Brown Rice");
    }

    #[test]
    fn bullets_without_prices() {
        let list = parse_lines("Shopping list:\n- eggs\n* spinach\n3) canned black beans\n\nthanks");
        let names: Vec<&str> = list.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["eggs", "spinach", "canned black beans"]);
        assert!(list.iter().all(|e| e.price.is_none()));
    }

    #[test]
    fn model_items_are_cleaned() {
        let items: Vec<ParsedItem> = serde_json::from_str(
            r#"[
                {"name": " Large Eggs ", "price": 1.98, "store": "Walmart"},
                {"name": "Milk", "price": null, "store": "Costco"},
                {"name": "Bread", "price": -2.0},
                {"name": "  "}
            ]"#,
        )
        .unwrap();
        let list: Vec<ListEntry> = items.into_iter().filter_map(ParsedItem::into_entry).collect();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].name, "Large Eggs");
        assert_eq!(list[0].price, Some(Money::from_cents(198)));
        assert_eq!(list[0].store, Some(Store::Walmart));
        assert!(list[1].price.is_none());
        assert!(list[1].store.is_none());
        assert!(list[2].price.is_none());
    }

    #[tokio::test]
    async fn unreachable_model_uses_line_patterns() {
        let llm = LlmClient::new(
            Provider::OpenAi,
            "key".into(),
            "test-model".into(),
            100,
            Some("http://127.0.0.1:9".into()),
        )
        .unwrap()
        .with_retries(0);
        let agent = NutritionAgent::new(Some(&llm), None);
        let list = agent.parse_list("- Peanut Butter: $2.48\n- Oats: $2.00").await;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Peanut Butter");
        assert_eq!(list[1].price, Some(Money::from_cents(200)));
    }

    #[tokio::test]
    async fn offline_agent_parses_locally() {
        let list = NutritionAgent::offline().parse_list("Eggs $1.98").await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Eggs");
    }
}
