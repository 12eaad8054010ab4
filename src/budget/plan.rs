use crate::catalog::{self, CatalogItem, Category, Program, Store};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Coarse nutrition bucket used to report list balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryGroup {
    Protein,
    Produce,
    Grains,
    Other,
}

impl CategoryGroup {
    pub fn of(category: Category) -> Self {
        match category {
            Category::Dairy | Category::Meat | Category::Pantry => Self::Protein,
            Category::FreshProduce => Self::Produce,
            Category::Bakery => Self::Grains,
            Category::HealthWellness => Self::Other,
        }
    }
}

/// A catalog item placed on a shopping list, with the program that pays for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedItem {
    pub product_id: String,
    pub name: String,
    pub brand: String,
    pub size: String,
    pub price: Money,
    pub store: Store,
    pub category: Category,
    pub snap_eligible: bool,
    pub wic_eligible: bool,
    pub paid_with: Program,
    pub group: CategoryGroup,
}

impl PlannedItem {
    pub fn from_catalog(item: &CatalogItem, paid_with: Program) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            name: item.name.to_string(),
            brand: item.brand.to_string(),
            size: item.size.to_string(),
            price: item.price(),
            store: item.store,
            category: item.category,
            snap_eligible: item.snap_eligible,
            wic_eligible: item.wic_eligible,
            paid_with,
            group: CategoryGroup::of(item.category),
        }
    }

    pub fn display_name(&self) -> String {
        catalog::display_name(&self.brand, &self.name, &self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    SnapOnly,
    WicOnly,
    Combined,
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SnapOnly => write!(f, "snap_only"),
            Self::WicOnly => write!(f, "wic_only"),
            Self::Combined => write!(f, "combined"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub snap_budget: Money,
    pub wic_budget: Money,
    pub items: Vec<PlannedItem>,
}

impl Scenario {
    pub fn budget(&self) -> Money {
        self.snap_budget + self.wic_budget
    }

    pub fn total_cost(&self) -> Money {
        self.items.iter().map(|i| i.price).sum()
    }

    pub fn remaining(&self) -> Money {
        self.budget() - self.total_cost()
    }

    pub fn spent_with(&self, program: Program) -> Money {
        self.items
            .iter()
            .filter(|i| i.paid_with == program)
            .map(|i| i.price)
            .sum()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub snap_budget: Money,
    pub wic_budget: Money,
    pub snap_used: Money,
    pub wic_used: Money,
    pub total_cost: Money,
    pub remaining_snap: Money,
    pub remaining_wic: Money,
}

impl CostBreakdown {
    pub fn total_budget(&self) -> Money {
        self.snap_budget + self.wic_budget
    }

    pub fn total_remaining(&self) -> Money {
        self.remaining_snap + self.remaining_wic
    }
}

/// Every budget scenario for one request, plus the one recommended to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub snap_budget: Money,
    pub wic_budget: Money,
    pub scenarios: Vec<Scenario>,
    pub best: ScenarioKind,
    pub cost_breakdown: CostBreakdown,
    pub generated_at: DateTime<Utc>,
}

impl BudgetPlan {
    pub fn best_scenario(&self) -> Option<&Scenario> {
        self.scenario(self.best)
    }

    pub fn scenario(&self, kind: ScenarioKind) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.kind == kind)
    }

    pub fn shopping_list(&self) -> &[PlannedItem] {
        self.best_scenario().map(|s| s.items.as_slice()).unwrap_or(&[])
    }

    pub fn programs(&self) -> Vec<Program> {
        let mut programs = Vec::new();
        if self.snap_budget.is_positive() {
            programs.push(Program::Snap);
        }
        if self.wic_budget.is_positive() {
            programs.push(Program::Wic);
        }
        programs
    }
}

/// Build every applicable scenario; `None` when neither program has money.
pub fn plan(snap_budget: Money, wic_budget: Money) -> Option<BudgetPlan> {
    let has_snap = snap_budget.is_positive();
    let has_wic = wic_budget.is_positive();
    if !has_snap && !has_wic {
        return None;
    }

    let snap_items = catalog::eligible_items(Program::Snap);
    let wic_items = catalog::eligible_items(Program::Wic);

    let mut scenarios = Vec::new();
    if has_snap {
        scenarios.push(Scenario {
            kind: ScenarioKind::SnapOnly,
            snap_budget,
            wic_budget: Money::ZERO,
            items: optimize_selection(&snap_items, &[], snap_budget, Money::ZERO),
        });
    }
    if has_wic {
        scenarios.push(Scenario {
            kind: ScenarioKind::WicOnly,
            snap_budget: Money::ZERO,
            wic_budget,
            items: optimize_selection(&[], &wic_items, Money::ZERO, wic_budget),
        });
    }
    if has_snap && has_wic {
        scenarios.push(Scenario {
            kind: ScenarioKind::Combined,
            snap_budget,
            wic_budget,
            items: optimize_selection(&snap_items, &wic_items, snap_budget, wic_budget),
        });
    }

    let best = if has_snap && has_wic {
        ScenarioKind::Combined
    } else if snap_budget >= wic_budget {
        ScenarioKind::SnapOnly
    } else {
        ScenarioKind::WicOnly
    };

    let chosen = scenarios.iter().find(|s| s.kind == best)?;
    let snap_used = chosen.spent_with(Program::Snap);
    let wic_used = chosen.spent_with(Program::Wic);
    let cost_breakdown = CostBreakdown {
        snap_budget,
        wic_budget,
        snap_used,
        wic_used,
        total_cost: snap_used + wic_used,
        remaining_snap: snap_budget - snap_used,
        remaining_wic: wic_budget - wic_used,
    };

    info!(
        scenarios = ?scenarios.iter().map(|s| s.kind.to_string()).collect::<Vec<_>>(),
        best = %best,
        items = chosen.item_count(),
        total = %cost_breakdown.total_cost,
        "budget scenarios generated"
    );

    Some(BudgetPlan {
        snap_budget,
        wic_budget,
        scenarios,
        best,
        cost_breakdown,
        generated_at: Utc::now(),
    })
}

/// Greedy cheapest-first fill. WIC is allocated first because its item list is the
/// narrower one; SNAP then fills from items not already on the list.
pub fn optimize_selection(
    snap_items: &[&CatalogItem],
    wic_items: &[&CatalogItem],
    snap_budget: Money,
    wic_budget: Money,
) -> Vec<PlannedItem> {
    let mut list = Vec::new();
    let mut taken: HashSet<&str> = HashSet::new();

    let wic_spent = fill(wic_items, Program::Wic, wic_budget, &mut taken, &mut list);
    let snap_spent = fill(snap_items, Program::Snap, snap_budget, &mut taken, &mut list);

    debug!(
        items = list.len(),
        snap = %snap_spent,
        wic = %wic_spent,
        "selection complete"
    );
    list
}

fn fill<'a>(
    candidates: &[&'a CatalogItem],
    program: Program,
    budget: Money,
    taken: &mut HashSet<&'a str>,
    list: &mut Vec<PlannedItem>,
) -> Money {
    let mut sorted: Vec<&CatalogItem> = candidates
        .iter()
        .copied()
        .filter(|i| i.eligible_for(program))
        .collect();
    sorted.sort_by(|a, b| {
        a.price()
            .cmp(&b.price())
            .then_with(|| a.product_id.cmp(b.product_id))
    });

    let mut spent = Money::ZERO;
    for item in sorted {
        let price = item.price();
        if !price.is_positive() || taken.contains(item.product_id) {
            continue;
        }
        if spent + price <= budget {
            spent += price;
            taken.insert(item.product_id);
            list.push(PlannedItem::from_catalog(item, program));
        }
    }
    spent
}
