use super::{NutritionOutcome, NutritionReport};

/// `96.3` stays as is, `45.0` prints as `45`.
pub fn score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

pub fn render_report(report: &NutritionReport) -> String {
    let mut out = String::from("NUTRITION ANALYSIS:");
    for item in &report.items {
        let ppd = item
            .protein_per_dollar
            .map(|p| format!("{p:.1}"))
            .unwrap_or_else(|| "n/a".into());
        out.push_str(&format!(
            "\n- {}: Score {}/100, Protein/$: {ppd}",
            item.name,
            score(item.nutrition_score)
        ));
    }
    out.push_str(&format!(
        "\n\nAverage score: {}/100\n\nTOTAL COST: {}",
        score(report.average_score),
        report.total_cost
    ));

    if !report.substitutions.is_empty() {
        out.push_str("\n\nSUBSTITUTIONS:");
        for s in &report.substitutions {
            out.push_str(&format!("\n- {s}"));
        }
    }

    out.push_str("\n\nHEALTH TIPS:");
    for tip in &report.health_tips {
        out.push_str(&format!("\n- {tip}"));
    }
    out
}

pub fn render_outcome(outcome: &NutritionOutcome) -> String {
    let mut out = render_report(&outcome.report);

    let with_facts: Vec<_> = outcome
        .details
        .iter()
        .filter_map(|d| d.facts.map(|f| (d, f)))
        .collect();
    if !with_facts.is_empty() {
        out.push_str("\n\nNUTRITION FACTS (per serving):");
        for (detail, facts) in with_facts {
            out.push_str(&format!(
                "\n- {} [{}]: {} cal, {}g protein, {}g fiber, {}g sugars",
                detail.name,
                facts.serving_size,
                facts.calories,
                facts.macros.protein,
                facts.macros.fiber,
                facts.macros.sugars
            ));
            if let Some(d) = &detail.density {
                out.push_str(&format!(
                    "\n    per $1: {:.1}g protein, {:.1}g fiber, {:.1}mg potassium",
                    d.protein_per_dollar, d.fiber_per_dollar, d.potassium_per_dollar
                ));
            }
        }
    }

    let usda: Vec<_> = outcome.details.iter().filter_map(|d| d.usda.as_ref()).collect();
    if !usda.is_empty() {
        out.push_str("\n\nUSDA DATA (per 100g):");
        for food in usda {
            let n = &food.nutrients;
            let g = |v: Option<f64>| v.map(|x| format!("{x}")).unwrap_or_else(|| "?".into());
            out.push_str(&format!(
                "\n- {}: protein {}g, fat {}g, carbs {}g, sodium {}mg ({})",
                food.name,
                g(n.protein),
                g(n.fat),
                g(n.carbs),
                g(n.sodium),
                food.data_source
            ));
        }
    }

    if let Some(narrative) = &outcome.narrative {
        out.push_str(&format!("\n\nANALYST NOTES:\n{narrative}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::analyze;

    #[test]
    fn score_formatting() {
        assert_eq!(score(96.3), "96.3");
        assert_eq!(score(45.0), "45");
        assert_eq!(score(100.0), "100");
    }

    #[test]
    fn report_sections() {
        let report = analyze(&["Chicken Breast", "White Bread", "Spinach"], &[]);
        let text = render_report(&report);
        assert!(text.starts_with("NUTRITION ANALYSIS:"));
        assert!(text.contains("- Chicken Breast: Score 96.3/100, Protein/$: 3.4"));
        assert!(text.contains("- White Bread: Score 45/100, Protein/$: 4.5"));
        assert!(text.contains("- Spinach: Score 88/100, Protein/$: 0.9"));
        assert!(text.contains("TOTAL COST: $14.47"));
        assert!(text.contains("SUBSTITUTIONS:\n- Substitute white bread"));
        assert!(text.contains("HEALTH TIPS:\n- Great protein sources selected"));
    }

    #[test]
    fn no_substitutions_section_when_empty() {
        let report = analyze(&["oats"], &[]);
        let text = render_report(&report);
        assert!(!text.contains("SUBSTITUTIONS"));
        assert!(text.contains("Protein/$: 3.7"));
    }

    #[test]
    fn unknown_items_show_na() {
        let report = analyze(&["Tofu"], &[]);
        assert!(render_report(&report).contains("- Tofu: Score 50/100, Protein/$: n/a"));
    }
}
