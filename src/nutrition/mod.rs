// Stage 2: scores a shopping list against the local food tables, with optional USDA
// data and an optional LLM-written narrative.

pub mod facts;
pub mod list;
pub mod render;
pub mod table;
pub mod usda;

pub use facts::{FoodFacts, NutrientDensity};
pub use table::{FoodCategory, FoodProfile};
pub use usda::{UsdaClient, UsdaFood};

use crate::agent::prompts;
use crate::budget::PlannedItem;
use crate::catalog::Store;
use crate::llm::LlmClient;
use crate::money::Money;
use crate::text::to_ascii;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Score assigned to anything missing from the food table.
pub const UNKNOWN_SCORE: f64 = 50.0;
const CHICKEN_SWAP_THRESHOLD: Money = Money::from_cents(5000);
const HIGH_SUGAR_G: f64 = 10.0;
const HIGH_SODIUM_MG: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthCondition {
    Diabetes,
    Hypertension,
}

impl HealthCondition {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "diabetes" | "diabetic" => Some(Self::Diabetes),
            "hypertension" | "high blood pressure" | "high-blood-pressure" => {
                Some(Self::Hypertension)
            }
            _ => None,
        }
    }
}

impl fmt::Display for HealthCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diabetes => write!(f, "diabetes"),
            Self::Hypertension => write!(f, "hypertension"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemScore {
    pub name: String,
    /// Table entry the item resolved to, if any.
    pub matched: Option<&'static str>,
    pub nutrition_score: f64,
    pub protein_per_dollar: Option<f64>,
    pub category: Option<FoodCategory>,
    pub price: Option<Money>,
    pub analysis: String,
}

impl ItemScore {
    pub fn is_known(&self) -> bool {
        self.matched.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NutritionReport {
    pub total_items: usize,
    pub total_cost: Money,
    pub items: Vec<ItemScore>,
    pub substitutions: Vec<String>,
    pub average_score: f64,
    pub health_tips: Vec<String>,
}

impl NutritionReport {
    pub fn unknown_count(&self) -> usize {
        self.items.iter().filter(|i| !i.is_known()).count()
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Score each item against the food table and collect substitutions and tips.
pub fn analyze<S: AsRef<str>>(items: &[S], conditions: &[HealthCondition]) -> NutritionReport {
    let mut scores = Vec::with_capacity(items.len());
    let mut profiles: Vec<(&str, &'static FoodProfile)> = Vec::new();

    for raw in items {
        let name = raw.as_ref().trim();
        match table::lookup(name) {
            Some(profile) => {
                profiles.push((name, profile));
                scores.push(ItemScore {
                    name: name.to_string(),
                    matched: Some(profile.name),
                    nutrition_score: profile.nutrition_score,
                    protein_per_dollar: Some(profile.protein_per_dollar),
                    category: Some(profile.category),
                    price: Some(profile.price),
                    analysis: format!(
                        "High nutrition item with score {}/100",
                        render::score(profile.nutrition_score)
                    ),
                });
            }
            None => scores.push(ItemScore {
                name: name.to_string(),
                matched: None,
                nutrition_score: UNKNOWN_SCORE,
                protein_per_dollar: None,
                category: None,
                price: None,
                analysis: "Unknown item - general nutrition score assigned".into(),
            }),
        }
    }

    let total_cost: Money = profiles.iter().map(|(_, p)| p.price).sum();
    let average_score = if scores.is_empty() {
        0.0
    } else {
        round1(scores.iter().map(|s| s.nutrition_score).sum::<f64>() / scores.len() as f64)
    };

    let lowered: Vec<String> = items.iter().map(|i| i.as_ref().to_lowercase()).collect();
    let mut substitutions = Vec::new();
    if lowered.iter().any(|i| i.contains("white bread")) {
        substitutions.push("Substitute white bread -> whole wheat bread for higher fiber".into());
    }
    if lowered.iter().any(|i| i.contains("chicken")) && total_cost > CHICKEN_SWAP_THRESHOLD {
        substitutions
            .push("Consider lentils instead of chicken for better protein-per-dollar value".into());
    }
    for condition in conditions {
        for (name, profile) in &profiles {
            match condition {
                HealthCondition::Diabetes if profile.sugar_g >= HIGH_SUGAR_G => {
                    substitutions.push(format!(
                        "Diabetes: {name} has {}g sugar per 100g; choose a lower-sugar alternative",
                        profile.sugar_g
                    ));
                }
                HealthCondition::Hypertension if profile.sodium_mg >= HIGH_SODIUM_MG => {
                    substitutions.push(format!(
                        "Hypertension: {name} has {}mg sodium per 100g; choose a lower-sodium alternative",
                        profile.sodium_mg
                    ));
                }
                _ => {}
            }
        }
    }

    let report = NutritionReport {
        total_items: scores.len(),
        total_cost,
        health_tips: health_tips(&scores),
        items: scores,
        substitutions,
        average_score,
    };
    debug!(
        items = report.total_items,
        unknown = report.unknown_count(),
        average = report.average_score,
        "nutrition table analysis"
    );
    report
}

fn health_tips(scores: &[ItemScore]) -> Vec<String> {
    let has = |cat: FoodCategory| scores.iter().any(|s| s.category == Some(cat));
    let mut tips = Vec::new();
    if has(FoodCategory::Protein) {
        tips.push("Great protein sources selected".to_string());
    }
    if has(FoodCategory::Vegetable) {
        tips.push("Good vegetable choices for vitamins and fiber".to_string());
    } else {
        tips.push("Add more vegetables for balanced nutrition".to_string());
    }
    let unknown = scores.iter().filter(|s| !s.is_known()).count();
    if unknown > 0 {
        tips.push(format!(
            "{unknown} item(s) not in the nutrition table; their scores are general estimates"
        ));
    }
    tips
}

/// One line of the list handed to the nutrition stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEntry {
    pub name: String,
    pub price: Option<Money>,
    pub store: Option<Store>,
}

impl ListEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: None,
            store: None,
        }
    }
}

impl From<&PlannedItem> for ListEntry {
    fn from(item: &PlannedItem) -> Self {
        Self {
            name: item.name.clone(),
            price: Some(item.price),
            store: Some(item.store),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemDetail {
    pub name: String,
    pub facts: Option<&'static FoodFacts>,
    pub density: Option<NutrientDensity>,
    pub usda: Option<UsdaFood>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NutritionOutcome {
    pub report: NutritionReport,
    pub details: Vec<ItemDetail>,
    /// Model-written analysis, ASCII only. `None` when offline or the call failed.
    pub narrative: Option<String>,
}

impl NutritionOutcome {
    pub fn render(&self) -> String {
        render::render_outcome(self)
    }
}

/// Nutrition analyst. Both remote sources are optional.
#[derive(Default, Clone, Copy)]
pub struct NutritionAgent<'a> {
    llm: Option<&'a LlmClient>,
    usda: Option<&'a UsdaClient>,
}

impl<'a> NutritionAgent<'a> {
    pub fn new(llm: Option<&'a LlmClient>, usda: Option<&'a UsdaClient>) -> Self {
        Self { llm, usda }
    }

    pub fn offline() -> Self {
        Self::default()
    }

    pub async fn analyze(
        &self,
        list: &[ListEntry],
        user_request: &str,
        conditions: &[HealthCondition],
    ) -> NutritionOutcome {
        let names: Vec<&str> = list.iter().map(|e| e.name.as_str()).collect();
        let report = analyze(&names, conditions);

        let mut details = Vec::with_capacity(list.len());
        for entry in list {
            let facts = facts::lookup(&entry.name);
            let density = match (facts, entry.price) {
                (Some(f), Some(price)) => facts::nutrient_density(f, price),
                _ => None,
            };
            let usda = match self.usda {
                Some(client) => Some(client.fetch(&entry.name).await),
                None => None,
            };
            details.push(ItemDetail {
                name: entry.name.clone(),
                facts,
                density,
                usda,
            });
        }

        let narrative = match self.llm {
            Some(llm) => self.narrate(llm, list, &details, user_request).await,
            None => None,
        };

        info!(
            items = report.total_items,
            average = report.average_score,
            substitutions = report.substitutions.len(),
            narrative = narrative.is_some(),
            "nutrition analysis complete"
        );

        NutritionOutcome {
            report,
            details,
            narrative,
        }
    }

    pub async fn analyze_plan(
        &self,
        items: &[PlannedItem],
        user_request: &str,
        conditions: &[HealthCondition],
    ) -> NutritionOutcome {
        let list: Vec<ListEntry> = items.iter().map(ListEntry::from).collect();
        self.analyze(&list, user_request, conditions).await
    }

    async fn narrate(
        &self,
        llm: &LlmClient,
        list: &[ListEntry],
        details: &[ItemDetail],
        user_request: &str,
    ) -> Option<String> {
        let list_json = serde_json::to_string_pretty(list).unwrap_or_default();
        let mut message = format!("SHOPPING LIST:\n{list_json}\n\n");
        let usda: Vec<&UsdaFood> = details.iter().filter_map(|d| d.usda.as_ref()).collect();
        if !usda.is_empty() {
            let usda_json = serde_json::to_string_pretty(&usda).unwrap_or_default();
            message.push_str(&format!("USDA NUTRITION DATA:\n{usda_json}\n\n"));
        }
        message.push_str(&format!(
            "USER REQUEST: \"{user_request}\"\n\nAnalyze this shopping list for nutrition and health."
        ));

        match llm.complete(prompts::NUTRITION_ANALYST, &message).await {
            Ok(text) => {
                let text = to_ascii(&text).trim().to_string();
                if text.is_empty() { None } else { Some(text) }
            }
            Err(e) => {
                warn!(error = %e, "nutrition narrative failed, continuing with table analysis");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_known_and_unknown_items() {
        let report = analyze(&["Chicken Breast", "White Bread", "Spinach", "Mystery Meat"], &[]);
        assert_eq!(report.total_items, 4);
        assert_eq!(report.total_cost, Money::from_cents(899 + 199 + 349));
        assert_eq!(report.unknown_count(), 1);
        // (96.3 + 45 + 88 + 50) / 4 = 69.825
        assert_eq!(report.average_score, 69.8);
        let unknown = &report.items[3];
        assert_eq!(unknown.nutrition_score, UNKNOWN_SCORE);
        assert_eq!(unknown.analysis, "Unknown item - general nutrition score assigned");
    }

    #[test]
    fn white_bread_swap() {
        let report = analyze(&["white bread"], &[]);
        assert_eq!(
            report.substitutions,
            vec!["Substitute white bread -> whole wheat bread for higher fiber"]
        );
    }

    #[test]
    fn chicken_swap_only_above_fifty_dollars() {
        let cheap = analyze(&["chicken breast", "salmon"], &[]);
        assert!(cheap.substitutions.is_empty());

        let items = ["chicken breast"; 6];
        let pricey = analyze(&items, &[]);
        assert_eq!(pricey.total_cost, Money::from_cents(899 * 6));
        assert!(pricey.substitutions[0].contains("lentils instead of chicken"));
    }

    #[test]
    fn condition_swaps() {
        let report = analyze(
            &["banana", "whole wheat bread", "broccoli"],
            &[HealthCondition::Diabetes, HealthCondition::Hypertension],
        );
        assert_eq!(report.substitutions.len(), 2);
        assert!(report.substitutions[0].starts_with("Diabetes: banana"));
        assert!(report.substitutions[1].starts_with("Hypertension: whole wheat bread"));
    }

    #[test]
    fn empty_list_averages_zero() {
        let report = analyze::<&str>(&[], &[]);
        assert_eq!(report.average_score, 0.0);
        assert_eq!(report.total_cost, Money::ZERO);
        assert!(report.health_tips.contains(&"Add more vegetables for balanced nutrition".to_string()));
    }

    #[test]
    fn tips_reflect_categories() {
        let report = analyze(&["eggs", "spinach"], &[]);
        assert_eq!(
            report.health_tips,
            vec![
                "Great protein sources selected",
                "Good vegetable choices for vitamins and fiber"
            ]
        );
    }

    #[test]
    fn conditions_parse() {
        assert_eq!(HealthCondition::parse("Diabetic"), Some(HealthCondition::Diabetes));
        assert_eq!(
            HealthCondition::parse("high blood pressure"),
            Some(HealthCondition::Hypertension)
        );
        assert_eq!(HealthCondition::parse("gout"), None);
    }

    #[tokio::test]
    async fn offline_agent_attaches_density() {
        let list = vec![
            ListEntry {
                name: "Canned Black Beans".into(),
                price: Some(Money::from_cents(88)),
                store: Some(Store::Walmart),
            },
            ListEntry::named("Whey Protein Powder"),
        ];
        let outcome = NutritionAgent::offline().analyze(&list, "", &[]).await;
        assert!(outcome.narrative.is_none());
        assert_eq!(outcome.details[0].facts.map(|f| f.key), Some("black_beans"));
        assert!(outcome.details[0].density.is_some());
        assert!(outcome.details[1].facts.is_none());
        assert!(outcome.details.iter().all(|d| d.usda.is_none()));
    }
}
