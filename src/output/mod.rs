use crate::agent::{CoordinatedAnswer, RecommendationSource};
use crate::error::{Error, Result};
use crate::nutrition::render::score;
use askama::Template;

#[derive(Template)]
#[template(path = "grocery_report.html")]
struct GroceryReport {
    generated_at: String,
    request: String,
    benefit: String,
    snap_budget: String,
    wic_budget: String,
    total_budget: String,
    total_cost: String,
    remaining: String,
    best_store: String,
    item_count: usize,
    items: Vec<ItemView>,
    has_nutrition: bool,
    average_score: String,
    quality_class: String,
    scores: Vec<ScoreView>,
    substitutions: Vec<String>,
    health_tips: Vec<String>,
    conditions: Vec<String>,
    recommendation_lines: Vec<String>,
    source_badge: String,
}

#[allow(dead_code)] // fields used by Askama template
struct ItemView {
    name: String,
    store: String,
    category: String,
    price: String,
    paid_with: String,
    snap: bool,
    wic: bool,
}

#[allow(dead_code)] // fields used by Askama template
struct ScoreView {
    name: String,
    score: String,
    score_class: String,
    protein_per_dollar: String,
    analysis: String,
}

fn score_class(value: f64) -> String {
    if value >= 70.0 {
        "text-green-400".into()
    } else if value >= 50.0 {
        "text-yellow-400".into()
    } else {
        "text-red-400".into()
    }
}

pub fn render_report(answer: &CoordinatedAnswer) -> Result<String> {
    let summary = answer.summary();

    let items: Vec<ItemView> = answer
        .shopping_list()
        .iter()
        .map(|i| ItemView {
            name: i.display_name(),
            store: i.store.to_string(),
            category: i.category.to_string(),
            price: i.price.to_string(),
            paid_with: i.paid_with.to_string(),
            snap: i.snap_eligible,
            wic: i.wic_eligible,
        })
        .collect();

    let (scores, substitutions, health_tips, average) = match &answer.nutrition {
        Some(outcome) => {
            let report = &outcome.report;
            let scores = report
                .items
                .iter()
                .map(|s| ScoreView {
                    name: s.name.clone(),
                    score: score(s.nutrition_score),
                    score_class: score_class(s.nutrition_score),
                    protein_per_dollar: s
                        .protein_per_dollar
                        .map(|p| format!("{p:.1}"))
                        .unwrap_or_else(|| "n/a".into()),
                    analysis: s.analysis.clone(),
                })
                .collect();
            (
                scores,
                report.substitutions.clone(),
                report.health_tips.clone(),
                Some(report.average_score),
            )
        }
        None => (Vec::new(), Vec::new(), Vec::new(), None),
    };

    let report = GroceryReport {
        generated_at: answer.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        request: answer.request.clone(),
        benefit: answer.analysis.benefit_display().to_string(),
        snap_budget: answer.analysis.snap.to_string(),
        wic_budget: answer.analysis.wic.to_string(),
        total_budget: summary.budget.to_string(),
        total_cost: summary.total_cost.to_string(),
        remaining: summary.remaining.to_string(),
        best_store: summary.best_store.to_string(),
        item_count: items.len(),
        items,
        has_nutrition: average.is_some(),
        average_score: average.map(score).unwrap_or_default(),
        quality_class: average.map(score_class).unwrap_or_default(),
        scores,
        substitutions,
        health_tips,
        conditions: answer
            .analysis
            .health_conditions
            .iter()
            .map(|c| c.to_string())
            .collect(),
        recommendation_lines: answer.recommendation.lines().map(String::from).collect(),
        source_badge: match answer.source {
            RecommendationSource::Model => "model".into(),
            RecommendationSource::Fallback => "structured".into(),
        },
    };

    report
        .render()
        .map_err(|e| Error::template(format!("template render: {e}")))
}
