use super::plan::{BudgetPlan, PlannedItem};
use crate::catalog::{Category, Store};
use crate::money::Money;

pub const REDIRECT_MESSAGE: &str = "\
I don't handle nutrition questions. I'm the budget & price tracker only.

What I do:
- SNAP/WIC budget tracking (starting balance -> purchases -> remaining balance)
- Price comparison between Walmart and Target
- Store recommendations (which store saves more money)
- Shopping lists that fit within your benefit limits

For nutrition analysis, health recommendations, substitutions or meal planning,
ask the nutrition analyst (`grocerease nutrition ...`).

Try: \"I have SNAP $45 and WIC $20\"";

pub const NEEDS_BUDGET_MESSAGE: &str = "\
I need your benefit amounts. Tell me your SNAP and/or WIC budget, for example:
- \"I have SNAP $30 and WIC $10\"
- \"My SNAP is $50\"
- \"I have WIC $25\"
- \"SNAP: $40, WIC: $15\"

I'll show your starting balance, the best items from Walmart and Target,
a store comparison, and what is left on each benefit afterwards.";

pub const NO_ITEMS_MESSAGE: &str = "\
Unable to build a shopping list with that budget.

Try different amounts:
- SNAP: $20-$200
- WIC: $10-$50

Example: \"I have SNAP $45 and WIC $25\"";

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

struct StoreTotals {
    store: Store,
    cost: Money,
    items: Vec<String>,
}

impl StoreTotals {
    fn average(&self) -> Money {
        self.cost.average(self.items.len())
    }
}

fn store_totals(list: &[PlannedItem]) -> Vec<StoreTotals> {
    let mut totals: Vec<StoreTotals> = Vec::new();
    for item in list {
        let idx = totals.iter().position(|t| t.store == item.store);
        let idx = idx.unwrap_or_else(|| {
            totals.push(StoreTotals {
                store: item.store,
                cost: Money::ZERO,
                items: Vec::new(),
            });
            totals.len() - 1
        });
        let entry = &mut totals[idx];
        entry.cost += item.price;
        entry.items.push(format!("{} ({})", item.name, item.price));
    }
    totals
}

fn group_by_category(list: &[PlannedItem]) -> Vec<(Category, Vec<&PlannedItem>)> {
    let mut groups: Vec<(Category, Vec<&PlannedItem>)> = Vec::new();
    for item in list {
        match groups.iter().position(|(c, _)| *c == item.category) {
            Some(idx) => groups[idx].1.push(item),
            None => groups.push((item.category, vec![item])),
        }
    }
    groups
}

/// Plain-text shopping list with cost breakdown and store comparison.
pub fn render_plan(plan: &BudgetPlan) -> String {
    let list = plan.shopping_list();
    let cb = &plan.cost_breakdown;
    let mut out = String::new();

    out.push_str("SNAP/WIC SHOPPING LIST\n");
    out.push('\n');
    out.push_str("Your budget:\n");
    out.push_str(&format!("- SNAP: {}\n", cb.snap_budget));
    out.push_str(&format!("- WIC: {}\n", cb.wic_budget));
    out.push_str(&format!("- Total: {}\n", cb.total_budget()));
    out.push('\n');
    out.push_str(&format!("Benefits-eligible shopping list ({} items):", list.len()));

    for (category, items) in group_by_category(list) {
        out.push_str(&format!("\n\n{category}:"));
        for item in items {
            out.push_str(&format!(
                "\n  - {}\n    {} at {} | SNAP {} WIC {} | Paid with {}",
                item.display_name(),
                item.price,
                item.store.to_string().to_lowercase(),
                yes_no(item.snap_eligible),
                yes_no(item.wic_eligible),
                item.paid_with,
            ));
        }
    }

    out.push_str(&format!(
        "\n\nCost breakdown:\n- SNAP used: {}\n- WIC used: {}\n- Total cost: {}",
        cb.snap_used, cb.wic_used, cb.total_cost
    ));
    out.push_str(&format!(
        "\n\nRemaining balance:\n- SNAP remaining: {}\n- WIC remaining: {}\n- Total remaining: {}",
        cb.remaining_snap,
        cb.remaining_wic,
        cb.total_remaining()
    ));

    out.push_str("\n\nStore comparison & savings:");
    let totals = store_totals(list);
    let cheapest = totals
        .iter()
        .filter(|t| !t.items.is_empty())
        .min_by_key(|t| t.average())
        .map(|t| t.store);

    for t in &totals {
        let note = if Some(t.store) == cheapest {
            " (best average price)"
        } else {
            match t.store {
                Store::Walmart => " (largest selection)",
                Store::Target => " (quality focus)",
            }
        };
        out.push_str(&format!(
            "\n\n{}{note}:\n  {} items, {} total (avg: {}/item)\n  Items: {}",
            t.store,
            t.items.len(),
            t.cost,
            t.average(),
            t.items.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
        ));
        if t.items.len() > 3 {
            out.push_str(&format!(" + {} more", t.items.len() - 3));
        }
    }

    let walmart = totals.iter().find(|t| t.store == Store::Walmart);
    let target = totals.iter().find(|t| t.store == Store::Target);
    if let (Some(w), Some(t)) = (walmart, target) {
        let (w_avg, t_avg) = (w.average(), t.average());
        if w_avg < t_avg {
            out.push_str(&format!(
                "\n\nSavings analysis: Walmart averages {w_avg}/item vs Target {t_avg}/item\n  Save {} per item shopping at Walmart\n  Best for: budget shopping, everyday prices, wider selection",
                t_avg - w_avg
            ));
        } else if t_avg < w_avg {
            out.push_str(&format!(
                "\n\nQuality analysis: Target averages {t_avg}/item vs Walmart {w_avg}/item\n  Target saves {} per item\n  Best for: organic options, premium brands",
                w_avg - t_avg
            ));
        }
    }

    out.push_str(
        "\n\nStore access:\n\
         - Walmart: 4,700+ stores nationwide, extended hours, widest SNAP acceptance\n\
         - Target: 1,900+ stores, better organic selection\n\n\
         Shopping strategy:\n\
         1. Budget focus: shop Walmart first for maximum savings\n\
         2. Quality items: use Target for specific premium/organic needs\n\
         3. Convenience: choose the closest store to save on travel\n\
         4. SNAP/WIC: both stores accept benefits\n\n\
         Next: ask the nutrition analyst about nutrition content or substitutions.",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::plan::plan;

    #[test]
    fn groups_categories_in_first_seen_order() {
        let plan = plan(Money::from_cents(500), Money::ZERO).unwrap();
        let text = render_plan(&plan);
        let produce = text.find("Fresh Produce:").unwrap();
        let pantry = text.find("Pantry:").unwrap();
        assert!(produce < pantry);
        assert!(text.contains("Benefits-eligible shopping list (4 items)"));
        assert!(text.contains("$0.58 at walmart | SNAP yes WIC no | Paid with SNAP"));
    }

    #[test]
    fn savings_line_when_both_stores_present() {
        let plan = plan(Money::from_cents(500), Money::ZERO).unwrap();
        let text = render_plan(&plan);
        // Walmart avg (0.58 + 0.88) / 2 = 0.73, Target (0.69 + 1.29) / 2 = 0.99
        assert!(text.contains("Walmart averages $0.73/item vs Target $0.99/item"));
        assert!(text.contains("Save $0.26 per item"));
        assert!(text.contains("Walmart (best average price)"));
        assert!(text.contains("Target (quality focus)"));
    }

    #[test]
    fn store_average_rounds_to_nearest_cent() {
        let totals = StoreTotals {
            store: Store::Target,
            cost: Money::from_cents(203),
            items: vec!["a".into(), "b".into(), "c".into()],
        };
        assert_eq!(totals.average(), Money::from_cents(68));
    }
}
