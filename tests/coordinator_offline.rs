use grocerease::agent::{Coordinator, RecommendationSource};
use grocerease::catalog::Program;
use grocerease::llm::{LlmClient, ModelRouter, Provider};
use grocerease::money::Money;
use grocerease::nutrition::HealthCondition;

#[tokio::test]
async fn full_pipeline_offline() {
    let coordinator = Coordinator::offline();
    assert!(coordinator.is_offline());

    let answer = coordinator
        .handle("I have $45 SNAP and $20 WIC, I'm diabetic with high blood pressure")
        .await;

    assert_eq!(answer.source, RecommendationSource::Fallback);
    assert_eq!(answer.analysis.snap, Money::from_cents(4500));
    assert_eq!(answer.analysis.wic, Money::from_cents(2000));
    assert_eq!(answer.analysis.benefit_display(), "WIC + SNAP");
    assert_eq!(
        answer.analysis.health_conditions,
        vec![HealthCondition::Diabetes, HealthCondition::Hypertension]
    );

    let summary = answer.summary();
    assert_eq!(summary.budget, Money::from_cents(6500));
    assert!(summary.total_cost <= summary.budget);
    assert_eq!(summary.remaining, summary.budget - summary.total_cost);

    let text = &answer.recommendation;
    assert!(text.starts_with("Based on your $65.00 WIC + SNAP balance"));
    assert!(text.contains("Health considerations: diabetes, hypertension"));
    assert!(text.contains("Nutrition quality: average score"));
    assert!(text.contains("Store tip:"));

    let nutrition = answer.nutrition.as_ref().expect("nutrition outcome");
    assert_eq!(nutrition.report.total_items, answer.shopping_list().len());
    assert!(nutrition.narrative.is_none());
}

#[tokio::test]
async fn wic_items_paid_with_wic() {
    let answer = Coordinator::offline()
        .handle("I have $25 SNAP and $10 WIC")
        .await;
    for item in answer.shopping_list() {
        if item.paid_with == Program::Wic {
            assert!(item.wic_eligible, "{} is not WIC eligible", item.name);
        }
    }
}

#[tokio::test]
async fn inferred_budget_when_no_program_amount() {
    let answer = Coordinator::offline()
        .handle("I need groceries for the week, maybe eggs and milk")
        .await;
    assert!(answer.analysis.inferred_budget);
    assert_eq!(answer.analysis.snap, Money::from_cents(5000));
    assert_eq!(answer.analysis.benefit_display(), "SNAP");
    assert!(answer.analysis.requested_items.contains(&"eggs".to_string()));
    assert!(!answer.shopping_list().is_empty());
}

#[tokio::test]
async fn answer_serializes_to_json() {
    let answer = Coordinator::offline().handle("SNAP $5").await;
    let json = serde_json::to_value(&answer).unwrap();
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["analysis"]["snap"], "5.00");
    assert!(json["plan"]["scenarios"].is_array());
}

#[tokio::test]
async fn unreachable_model_falls_back_to_structured_answer() {
    let llm = LlmClient::new(
        Provider::Gemini,
        "key".into(),
        "gemini-2.0-flash-001".into(),
        100,
        Some("http://127.0.0.1:9".into()),
    )
    .unwrap()
    .with_retries(0);
    let coordinator = Coordinator::new(Some(ModelRouter::new(llm)), None);
    assert!(!coordinator.is_offline());

    let answer = coordinator.handle("I have $5 SNAP").await;

    assert_eq!(answer.source, RecommendationSource::Fallback);
    assert!(answer.recommendation.starts_with("Based on your $5.00 SNAP balance"));
    let nutrition = answer.nutrition.as_ref().expect("nutrition outcome");
    assert!(nutrition.narrative.is_none());
    assert!(nutrition.report.total_items > 0);
}
