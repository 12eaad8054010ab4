use grocerease::budget::{BudgetAgent, BudgetReply, ScenarioKind};
use grocerease::catalog::Program;
use grocerease::handoff;
use grocerease::money::Money;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("grocerease-test-{}", std::process::id()))
        .join(name)
}

#[test]
fn plan_round_trips_through_handoff_file() {
    let reply = BudgetAgent.respond("I have SNAP $45 and WIC $20");
    let BudgetReply::Plan(plan) = reply else {
        panic!("expected a plan");
    };

    let path = temp_path("last_plan.json");
    handoff::save_plan(&plan, &path).unwrap();
    let loaded = handoff::load_plan(&path).unwrap();

    assert_eq!(loaded.best, ScenarioKind::Combined);
    assert_eq!(loaded.shopping_list().len(), plan.shopping_list().len());
    assert_eq!(
        loaded.cost_breakdown.total_cost,
        plan.cost_breakdown.total_cost
    );
    assert_eq!(loaded.programs(), vec![Program::Snap, Program::Wic]);

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_handoff_file_is_config_error() {
    let err = handoff::load_plan(&temp_path("does-not-exist.json")).unwrap_err();
    assert!(err.to_string().contains("run `grocerease budget` first"));
}

#[test]
fn nutrition_question_is_redirected() {
    let reply = BudgetAgent.respond("Can you do a nutrition analysis of peanut butter?");
    assert!(matches!(reply, BudgetReply::Redirect));
}

#[test]
fn snap_only_budget_stays_within_balance() {
    let reply = BudgetAgent.respond("my snap is $12");
    let plan = reply.plan().expect("plan");
    assert_eq!(plan.best, ScenarioKind::SnapOnly);
    assert!(plan.cost_breakdown.total_cost <= Money::from_cents(1200));
    assert!(plan
        .shopping_list()
        .iter()
        .all(|i| i.paid_with == Program::Snap && i.snap_eligible));
}
