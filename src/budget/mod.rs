// Stage 1: SNAP/WIC budget tracking and shopping-list selection. Fully local.

pub mod parse;
pub mod plan;
pub mod render;

pub use parse::{is_nutrition_question, parse_budget};
pub use plan::{BudgetPlan, CategoryGroup, CostBreakdown, PlannedItem, Scenario, ScenarioKind};

use tracing::info;

/// Outcome of one budget-agent turn.
#[derive(Debug, Clone)]
pub enum BudgetReply {
    /// The request was a nutrition question; point the user at the nutrition agent.
    Redirect,
    /// No SNAP or WIC amount could be found in the request.
    NeedsBudget,
    /// Amounts were found but nothing in the catalog fits.
    NoItems,
    Plan(BudgetPlan),
}

impl BudgetReply {
    pub fn plan(&self) -> Option<&BudgetPlan> {
        match self {
            Self::Plan(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Redirect => render::REDIRECT_MESSAGE.to_string(),
            Self::NeedsBudget => render::NEEDS_BUDGET_MESSAGE.to_string(),
            Self::NoItems => render::NO_ITEMS_MESSAGE.to_string(),
            Self::Plan(plan) => render::render_plan(plan),
        }
    }
}

/// Price & budget tracker. Never answers nutrition questions.
#[derive(Debug, Default, Clone, Copy)]
pub struct BudgetAgent;

impl BudgetAgent {
    pub fn respond(&self, user_input: &str) -> BudgetReply {
        if is_nutrition_question(user_input) {
            info!("nutrition question sent to budget agent, redirecting");
            return BudgetReply::Redirect;
        }

        let (snap, wic) = parse_budget(user_input);
        if !snap.is_positive() && !wic.is_positive() {
            return BudgetReply::NeedsBudget;
        }
        info!(snap = %snap, wic = %wic, "budget parsed");

        match plan::plan(snap, wic) {
            Some(plan) if !plan.shopping_list().is_empty() => BudgetReply::Plan(plan),
            _ => BudgetReply::NoItems,
        }
    }
}
