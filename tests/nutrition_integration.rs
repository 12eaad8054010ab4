use grocerease::money::Money;
use grocerease::nutrition::usda::{self, DataSource, FoodDetail};
use grocerease::nutrition::{self, HealthCondition, ListEntry, NutritionAgent};

fn fixture() -> FoodDetail {
    let raw = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/usda_food_detail.json"
    ))
    .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn usda_detail_maps_nutrients() {
    let food = usda::from_detail(&fixture(), "chicken breast");
    assert_eq!(food.usda_id, Some(171077));
    assert_eq!(food.data_source, DataSource::Usda);
    assert!(food.description.starts_with("Chicken, broiler or fryers"));
    assert_eq!(food.nutrients.protein, Some(22.5));
    assert_eq!(food.nutrients.fat, Some(2.62));
    assert_eq!(food.nutrients.carbs, Some(0.0));
    assert_eq!(food.nutrients.sugar, Some(0.0));
    assert_eq!(food.nutrients.sodium, Some(45.0));
    assert_eq!(food.nutrients.iron, Some(0.37));
    assert_eq!(food.nutrients.calcium, Some(5.0));
    assert_eq!(food.serving_size, "100g");
}

#[test]
fn usda_food_serializes_source_label() {
    let json = serde_json::to_value(usda::from_detail(&fixture(), "chicken")).unwrap();
    assert_eq!(json["data_source"], "USDA FoodData Central");
    let json = serde_json::to_value(usda::estimate("chicken")).unwrap();
    assert_eq!(json["data_source"], "Estimated (USDA API unavailable)");
}

#[test]
fn report_lists_swaps_and_tips() {
    let report = nutrition::analyze(&["Chicken Breast", "White Bread", "Spinach"], &[]);
    assert_eq!(report.total_cost, Money::from_cents(1447));
    assert_eq!(report.substitutions.len(), 1);
    assert!(report.health_tips.contains(&"Great protein sources selected".to_string()));
}

#[tokio::test]
async fn offline_agent_renders_sections() {
    let list: Vec<ListEntry> = ["Bananas", "Old Fashioned Oats", "Large Eggs"]
        .into_iter()
        .map(ListEntry::named)
        .collect();
    let outcome = NutritionAgent::offline()
        .analyze(&list, "check my list", &[HealthCondition::Diabetes])
        .await;

    let text = outcome.render();
    assert!(text.contains("NUTRITION ANALYSIS:"));
    assert!(text.contains("HEALTH TIPS"));
    assert!(text.contains("NUTRITION FACTS (per serving)"));
    assert!(!text.contains("USDA DATA"));
    assert!(!text.contains("ANALYST NOTES"));
    assert!(outcome.details.iter().all(|d| d.facts.is_some()));
}
