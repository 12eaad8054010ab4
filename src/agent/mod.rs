// Coordination: request analysis -> budget plan -> nutrition analysis -> recommendation

pub mod cards;
pub mod prompts;

use crate::budget::{self, BudgetPlan, PlannedItem};
use crate::catalog::Store;
use crate::llm::{AgentRole, ModelRouter};
use crate::money::Money;
use crate::nutrition::{NutritionAgent, NutritionOutcome, UsdaClient};
use crate::request::RequestAnalysis;
use crate::text::{dedupe_lines, to_ascii};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Model replies shorter than this are treated as failures.
const MIN_RECOMMENDATION_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoordinatedAnswer {
    pub request: String,
    pub analysis: RequestAnalysis,
    pub plan: Option<BudgetPlan>,
    pub nutrition: Option<NutritionOutcome>,
    pub recommendation: String,
    pub source: RecommendationSource,
    pub generated_at: DateTime<Utc>,
}

impl CoordinatedAnswer {
    pub fn shopping_list(&self) -> &[PlannedItem] {
        self.plan.as_ref().map(|p| p.shopping_list()).unwrap_or(&[])
    }

    /// Total cost, remaining balance and store of the recommended list.
    pub fn summary(&self) -> ListSummary {
        ListSummary::of(self.analysis.total(), self.shopping_list())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSummary {
    pub budget: Money,
    pub total_cost: Money,
    pub remaining: Money,
    pub best_store: Store,
}

impl ListSummary {
    pub fn of(budget: Money, items: &[PlannedItem]) -> Self {
        let total_cost: Money = items.iter().map(|i| i.price).sum();
        Self {
            budget,
            total_cost,
            remaining: budget - total_cost,
            best_store: best_store(items),
        }
    }
}

/// Store with the lowest average price on the list; Walmart when the list is empty.
pub fn best_store(items: &[PlannedItem]) -> Store {
    Store::ALL
        .into_iter()
        .filter_map(|store| {
            let prices: Vec<Money> = items
                .iter()
                .filter(|i| i.store == store)
                .map(|i| i.price)
                .collect();
            if prices.is_empty() {
                None
            } else {
                let total: Money = prices.iter().sum();
                Some((store, total.average(prices.len())))
            }
        })
        .min_by_key(|(_, avg)| *avg)
        .map(|(store, _)| store)
        .unwrap_or(Store::Walmart)
}

/// Runs the budget and nutrition agents and writes the final answer.
/// Without a router every step runs on local data.
pub struct Coordinator {
    router: Option<ModelRouter>,
    usda: Option<UsdaClient>,
}

impl Coordinator {
    pub fn new(router: Option<ModelRouter>, usda: Option<UsdaClient>) -> Self {
        Self { router, usda }
    }

    pub fn offline() -> Self {
        Self::new(None, None)
    }

    pub fn is_offline(&self) -> bool {
        self.router.is_none()
    }

    pub fn router(&self) -> Option<&ModelRouter> {
        self.router.as_ref()
    }

    pub async fn handle(&self, message: &str) -> CoordinatedAnswer {
        let analysis = RequestAnalysis::from_text(message);
        info!(
            snap = %analysis.snap,
            wic = %analysis.wic,
            benefit = analysis.benefit_display(),
            "request analysed"
        );

        let plan = budget::plan::plan(analysis.snap, analysis.wic);
        let list = plan.as_ref().map(|p| p.shopping_list()).unwrap_or(&[]);

        let nutrition = if list.is_empty() {
            None
        } else {
            let agent = NutritionAgent::new(
                self.router
                    .as_ref()
                    .and_then(|r| r.keyed_client(AgentRole::Nutrition)),
                self.usda.as_ref(),
            );
            Some(
                agent
                    .analyze_plan(list, message, &analysis.health_conditions)
                    .await,
            )
        };

        let fallback = || fallback_recommendation(&analysis, list, nutrition.as_ref());
        let coordinator_llm = self
            .router
            .as_ref()
            .and_then(|r| r.keyed_client(AgentRole::Coordinator));
        let (recommendation, source) = match coordinator_llm {
            Some(llm) => {
                let prompt = coordinator_message(message, &analysis, plan.as_ref(), nutrition.as_ref());
                match llm.complete(prompts::COORDINATOR, &prompt).await {
                    Ok(text) => match accept_recommendation(&text) {
                        Some(text) => (text, RecommendationSource::Model),
                        None => {
                            warn!("coordinator reply rejected, using structured recommendation");
                            (fallback(), RecommendationSource::Fallback)
                        }
                    },
                    Err(e) => {
                        warn!(error = %e, "coordinator model failed, using structured recommendation");
                        (fallback(), RecommendationSource::Fallback)
                    }
                }
            }
            None => (fallback(), RecommendationSource::Fallback),
        };

        info!(
            items = list.len(),
            source = ?source,
            "recommendation ready"
        );

        CoordinatedAnswer {
            request: message.to_string(),
            analysis,
            plan,
            nutrition,
            recommendation,
            source,
            generated_at: Utc::now(),
        }
    }
}

/// Clean a model reply; `None` if it looks like an error or a raw payload.
pub fn accept_recommendation(raw: &str) -> Option<String> {
    let text = dedupe_lines(&to_ascii(raw));
    let trimmed = text.trim();
    if trimmed.len() < MIN_RECOMMENDATION_LEN {
        return None;
    }
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return None;
    }
    if trimmed.contains("Analysis error:") || trimmed.contains("Unable to generate") {
        return None;
    }
    Some(trimmed.to_string())
}

fn quality_label(score: f64) -> &'static str {
    if score >= 70.0 {
        "good nutritional value"
    } else if score >= 50.0 {
        "moderate nutritional value"
    } else {
        "low nutritional value, consider healthier options"
    }
}

pub fn fallback_recommendation(
    analysis: &RequestAnalysis,
    items: &[PlannedItem],
    nutrition: Option<&NutritionOutcome>,
) -> String {
    let summary = ListSummary::of(analysis.total(), items);
    let mut out = format!(
        "Based on your {} {} balance, you can buy groceries at {} which is cheaper and healthy:",
        summary.budget,
        analysis.benefit_display(),
        summary.best_store
    );

    if items.is_empty() {
        out.push_str("\nNo eligible items fit this budget.");
    }
    for item in items {
        out.push_str(&format!("\n{} ({}): {}", item.name, item.store, item.price));
    }
    out.push_str(&format!(
        "\nTotal cost: {}\nRemaining credit: {}",
        summary.total_cost, summary.remaining
    ));

    if let Some(outcome) = nutrition {
        let avg = outcome.report.average_score;
        out.push_str(&format!(
            "\nNutrition quality: average score {}/100 ({})",
            crate::nutrition::render::score(avg),
            quality_label(avg)
        ));
        for s in &outcome.report.substitutions {
            out.push_str(&format!("\nSubstitution: {s}"));
        }
    }
    if !analysis.health_conditions.is_empty() {
        let conditions: Vec<String> = analysis
            .health_conditions
            .iter()
            .map(|c| c.to_string())
            .collect();
        out.push_str(&format!("\nHealth considerations: {}", conditions.join(", ")));
    }

    out.push_str("\nStore tip: shop Walmart first for savings, then Target for quality upgrades.");
    out
}

fn coordinator_message(
    message: &str,
    analysis: &RequestAnalysis,
    plan: Option<&BudgetPlan>,
    nutrition: Option<&NutritionOutcome>,
) -> String {
    let items = plan.map(|p| p.shopping_list()).unwrap_or(&[]);
    let summary = ListSummary::of(analysis.total(), items);
    let mut out = format!(
        "The user said: \"{message}\"\n\nBudget: {} {} balance\n",
        summary.budget,
        analysis.benefit_display()
    );

    out.push_str("\nSHOPPING LIST:\n");
    if items.is_empty() {
        out.push_str("(no eligible items fit the budget)\n");
    }
    for item in items {
        out.push_str(&format!(
            "- {} at {}: {} (paid with {})\n",
            item.display_name(),
            item.store,
            item.price,
            item.paid_with
        ));
    }
    out.push_str(&format!(
        "Total cost: {}\nRemaining balance: {}\nRecommended store: {}\n",
        summary.total_cost, summary.remaining, summary.best_store
    ));

    if !analysis.health_conditions.is_empty() {
        let conditions: Vec<String> = analysis
            .health_conditions
            .iter()
            .map(|c| c.to_string())
            .collect();
        out.push_str(&format!(
            "\nHEALTH CONSIDERATIONS: the user has {}.\n",
            conditions.join(", ")
        ));
    }
    if let Some(outcome) = nutrition {
        out.push_str(&format!(
            "\nNUTRITION INSIGHTS: average nutrition score {}/100.\n",
            crate::nutrition::render::score(outcome.report.average_score)
        ));
        for s in &outcome.report.substitutions {
            out.push_str(&format!("- {s}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_json_and_error_replies() {
        assert!(accept_recommendation("OK").is_none());
        assert!(accept_recommendation(&format!("{{\"items\": \"{}\"}}", "x".repeat(60))).is_none());
        assert!(
            accept_recommendation(&format!("Analysis error: {}", "timeout ".repeat(10))).is_none()
        );
        assert!(
            accept_recommendation(&format!("Unable to generate {}", "a reply ".repeat(10)))
                .is_none()
        );
    }

    #[test]
    fn accepts_and_dedupes_real_replies() {
        let raw = "Shop at Walmart this week.\nShop at Walmart this week.\n\
                   Bananas are $0.58 and eggs are $1.98, leaving you plenty left over.";
        let text = accept_recommendation(raw).unwrap();
        assert_eq!(text.matches("Shop at Walmart").count(), 1);
    }

    #[test]
    fn folds_unicode_and_drops_repeated_lines() {
        let raw = "\u{201c}Shop at Walmart\u{201d} \u{1F6D2}\n\
                   \u{201c}Shop at Walmart\u{201d} \u{1F6D2}\n\
                   Eggs \u{2013} $1.98, bananas \u{2013} $0.58. Caf\u{e9} latte is not SNAP eligible.";
        let text = accept_recommendation(raw).unwrap();
        assert!(text.is_ascii(), "{text}");
        assert_eq!(text.lines().filter(|l| l.contains("Shop at Walmart")).count(), 1);
        assert!(text.contains("$1.98"));
    }

    #[test]
    fn fallback_lists_items_and_balance() {
        let analysis = RequestAnalysis::from_text("I have $5 SNAP");
        let plan = budget::plan::plan(analysis.snap, analysis.wic).unwrap();
        let text = fallback_recommendation(&analysis, plan.shopping_list(), None);
        assert!(text.starts_with("Based on your $5.00 SNAP balance"));
        assert!(text.contains("Fresh Bananas (Walmart): $0.58"));
        assert!(text.contains("Total cost: $3.44"));
        assert!(text.contains("Remaining credit: $1.56"));
        assert!(text.contains("at Walmart which is cheaper"));
    }

    #[test]
    fn quality_bands() {
        assert_eq!(quality_label(70.0), "good nutritional value");
        assert_eq!(quality_label(55.0), "moderate nutritional value");
        assert!(quality_label(49.9).starts_with("low"));
    }

    #[test]
    fn best_store_by_average_price() {
        assert_eq!(best_store(&[]), Store::Walmart);
        let analysis = RequestAnalysis::from_text("SNAP $5");
        let plan = budget::plan::plan(analysis.snap, analysis.wic).unwrap();
        assert_eq!(best_store(plan.shopping_list()), Store::Walmart);
    }
}
