//! Static agent descriptions, published as JSON cards by `grocerease agents`.

use super::prompts;
use crate::llm::{AgentRole, ModelRouter};
use serde::Serialize;

pub struct AgentSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// `None` for agents that run entirely on local data.
    pub role: Option<AgentRole>,
    pub instruction: &'static str,
    pub capabilities: &'static [&'static str],
}

pub static AGENTS: &[AgentSpec] = &[
    AgentSpec {
        name: "price_budget_tracker",
        description: "SNAP/WIC budget tracking, Walmart vs Target price comparison and \
                      benefits-eligible shopping lists",
        role: None,
        instruction: prompts::BUDGET_TRACKER,
        capabilities: &[
            "parse_budget",
            "compare_stores",
            "build_shopping_list",
            "snap_wic_eligibility_check",
        ],
    },
    AgentSpec {
        name: "nutrition_health_analyst",
        description: "Nutrition scoring, USDA data lookup, health condition filtering and \
                      substitution recommendations",
        role: Some(AgentRole::Nutrition),
        instruction: prompts::NUTRITION_ANALYST,
        capabilities: &[
            "analyze_nutrition",
            "get_substitutions",
            "check_health_compatibility",
            "nutrient_density",
        ],
    },
    AgentSpec {
        name: "grocerease_coordinator",
        description: "Routes a shopping request through the budget and nutrition agents and \
                      writes the final recommendation",
        role: Some(AgentRole::Coordinator),
        instruction: prompts::COORDINATOR,
        capabilities: &["analyze_request", "coordinate_agents", "recommend"],
    },
];

const BENEFITS: &[&str] = &["SNAP", "WIC"];
const STORES: &[&str] = &["Walmart", "Target"];
const CONDITIONS: &[&str] = &["diabetes", "hypertension"];

#[derive(Debug, Serialize)]
pub struct AgentCard {
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub model: String,
    pub capabilities: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_benefits: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_stores: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_health_conditions: Option<&'static [&'static str]>,
}

impl AgentSpec {
    pub fn card(&self, router: Option<&ModelRouter>) -> AgentCard {
        let model = match (self.role, router) {
            (Some(role), Some(router)) => router.client_for(role).model().to_string(),
            (Some(_), None) => "offline".to_string(),
            (None, _) => "local".to_string(),
        };
        let is_budget = self.role.is_none();
        let is_nutrition = self.role == Some(AgentRole::Nutrition);
        AgentCard {
            name: self.name,
            description: self.description,
            version: env!("CARGO_PKG_VERSION"),
            model,
            capabilities: self.capabilities,
            supported_benefits: is_budget.then_some(BENEFITS),
            supported_stores: is_budget.then_some(STORES),
            supported_health_conditions: is_nutrition.then_some(CONDITIONS),
        }
    }
}

pub fn cards(router: Option<&ModelRouter>) -> Vec<AgentCard> {
    AGENTS.iter().map(|a| a.card(router)).collect()
}
