//! Per-serving nutrition facts for the staples the catalog actually sells.

use crate::money::Money;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Macros {
    pub protein: f64,
    pub carbohydrates: f64,
    pub fiber: f64,
    pub sugars: f64,
    pub fat: f64,
}

/// `(name, amount)`; units follow the usual label convention (mg, mcg, IU).
pub type Micro = (&'static str, f64);

#[derive(Debug, Clone, Serialize)]
pub struct FoodFacts {
    pub key: &'static str,
    pub name: &'static str,
    pub serving_size: &'static str,
    pub calories: u32,
    pub macros: Macros,
    pub vitamins: &'static [Micro],
    pub minerals: &'static [Micro],
    pub health_benefits: &'static [&'static str],
    pub dietary_flags: &'static [&'static str],
}

impl FoodFacts {
    fn micro(list: &[Micro], name: &str) -> f64 {
        list.iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    pub fn vitamin(&self, name: &str) -> f64 {
        Self::micro(self.vitamins, name)
    }

    pub fn mineral(&self, name: &str) -> f64 {
        Self::micro(self.minerals, name)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.dietary_flags.contains(&flag)
    }
}

pub static FACTS: &[FoodFacts] = &[
    FoodFacts {
        key: "bananas",
        name: "Fresh Bananas",
        serving_size: "1 medium (118g)",
        calories: 105,
        macros: Macros { protein: 1.3, carbohydrates: 27.0, fiber: 3.1, sugars: 14.4, fat: 0.4 },
        vitamins: &[("vitamin_c", 10.3), ("vitamin_b6", 0.4), ("folate", 24.0), ("vitamin_a", 76.0)],
        minerals: &[("potassium", 422.0), ("magnesium", 32.0), ("manganese", 0.3), ("copper", 0.1)],
        health_benefits: &[
            "Heart health (potassium)",
            "Digestive health (fiber)",
            "Energy metabolism (vitamin B6)",
            "Muscle function (potassium, magnesium)",
        ],
        dietary_flags: &["diabetes_friendly", "heart_healthy", "low_sodium", "cholesterol_free"],
    },
    FoodFacts {
        key: "oats",
        name: "Rolled Oats",
        serving_size: "1/2 cup dry (40g)",
        calories: 150,
        macros: Macros { protein: 5.0, carbohydrates: 27.0, fiber: 4.0, sugars: 1.0, fat: 3.0 },
        vitamins: &[("thiamine", 0.2), ("folate", 14.0), ("vitamin_e", 0.4), ("niacin", 1.0)],
        minerals: &[("manganese", 1.9), ("phosphorus", 180.0), ("magnesium", 63.0), ("iron", 2.1)],
        health_benefits: &[
            "High soluble fiber",
            "Cholesterol lowering",
            "Blood sugar control",
            "Heart healthy whole grain",
        ],
        dietary_flags: &["diabetes_friendly", "heart_healthy", "high_fiber"],
    },
    FoodFacts {
        key: "eggs",
        name: "Large Eggs",
        serving_size: "1 large egg (50g)",
        calories: 70,
        macros: Macros { protein: 6.3, carbohydrates: 0.4, fiber: 0.0, sugars: 0.2, fat: 4.8 },
        vitamins: &[
            ("vitamin_d", 44.0),
            ("vitamin_b12", 0.6),
            ("riboflavin", 0.3),
            ("folate", 22.0),
            ("vitamin_a", 270.0),
        ],
        minerals: &[("selenium", 15.4), ("phosphorus", 86.0), ("choline", 147.0), ("iron", 0.9)],
        health_benefits: &[
            "Complete protein source",
            "Brain development (choline)",
            "Eye health (lutein, zeaxanthin)",
            "Bone health (vitamin D)",
        ],
        dietary_flags: &["diabetes_friendly", "heart_healthy", "high_protein", "low_carb"],
    },
    FoodFacts {
        key: "chicken",
        name: "Chicken Breast",
        serving_size: "3 oz (85g) cooked",
        calories: 140,
        macros: Macros { protein: 26.0, carbohydrates: 0.0, fiber: 0.0, sugars: 0.0, fat: 3.0 },
        vitamins: &[
            ("niacin", 8.9),
            ("vitamin_b6", 0.5),
            ("vitamin_b12", 0.3),
            ("pantothenic_acid", 0.8),
        ],
        minerals: &[("phosphorus", 196.0), ("selenium", 20.6), ("potassium", 220.0), ("zinc", 0.9)],
        health_benefits: &[
            "Lean protein source",
            "Muscle building and repair",
            "Weight management",
            "Immune system support",
        ],
        dietary_flags: &[
            "diabetes_friendly",
            "heart_healthy",
            "high_protein",
            "low_carb",
            "keto_friendly",
        ],
    },
    FoodFacts {
        key: "black_beans",
        name: "Black Beans",
        serving_size: "1/2 cup (86g) cooked",
        calories: 114,
        macros: Macros { protein: 7.6, carbohydrates: 20.4, fiber: 7.5, sugars: 0.3, fat: 0.5 },
        vitamins: &[("folate", 128.0), ("thiamine", 0.2), ("vitamin_k", 2.8), ("vitamin_b6", 0.1)],
        minerals: &[
            ("iron", 1.8),
            ("magnesium", 60.0),
            ("potassium", 305.0),
            ("zinc", 0.9),
            ("manganese", 0.4),
        ],
        health_benefits: &[
            "Heart health (fiber, potassium)",
            "Blood sugar control (fiber, protein)",
            "Digestive health (fiber)",
            "Anemia prevention (iron, folate)",
        ],
        dietary_flags: &[
            "diabetes_friendly",
            "heart_healthy",
            "high_fiber",
            "plant_protein",
            "cholesterol_free",
        ],
    },
    FoodFacts {
        key: "ground_beef",
        name: "Ground Beef (93% lean)",
        serving_size: "3 oz (85g) cooked",
        calories: 164,
        macros: Macros { protein: 22.0, carbohydrates: 0.0, fiber: 0.0, sugars: 0.0, fat: 7.5 },
        vitamins: &[("vitamin_b12", 2.4), ("niacin", 4.9), ("vitamin_b6", 0.3), ("riboflavin", 0.2)],
        minerals: &[("zinc", 4.5), ("iron", 2.2), ("phosphorus", 177.0), ("selenium", 16.2)],
        health_benefits: &[
            "Complete protein source",
            "Iron absorption (heme iron)",
            "Immune system support (zinc)",
            "Energy metabolism (B vitamins)",
        ],
        dietary_flags: &["diabetes_friendly", "high_protein", "low_carb", "keto_friendly", "iron_rich"],
    },
    FoodFacts {
        key: "peanut_butter",
        name: "Natural Peanut Butter",
        serving_size: "2 tbsp (32g)",
        calories: 190,
        macros: Macros { protein: 8.0, carbohydrates: 6.0, fiber: 3.0, sugars: 2.0, fat: 16.0 },
        vitamins: &[("niacin", 4.2), ("vitamin_e", 2.9), ("folate", 18.0), ("vitamin_b6", 0.2)],
        minerals: &[("magnesium", 54.0), ("phosphorus", 107.0), ("potassium", 208.0), ("zinc", 0.9)],
        health_benefits: &[
            "Heart health (monounsaturated fats)",
            "Satiety (protein, fat, fiber)",
            "Energy sustained release",
            "Antioxidant protection (vitamin E)",
        ],
        dietary_flags: &["diabetes_friendly", "heart_healthy", "high_protein", "high_calorie"],
    },
];

/// Match on the underscore-joined, lower-cased name, containment either way.
pub fn lookup(food_name: &str) -> Option<&'static FoodFacts> {
    let key = food_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    if key.is_empty() {
        return None;
    }
    FACTS
        .iter()
        .find(|f| key.contains(f.key) || f.key.contains(key.as_str()))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NutrientDensity {
    pub protein_per_dollar: f64,
    pub fiber_per_dollar: f64,
    pub iron_per_dollar: f64,
    pub vitamin_c_per_dollar: f64,
    pub potassium_per_dollar: f64,
}

/// Nutrients per dollar of one serving; `None` for free or negative prices.
pub fn nutrient_density(facts: &FoodFacts, price: Money) -> Option<NutrientDensity> {
    if !price.is_positive() {
        return None;
    }
    let dollars = price.as_dollars();
    Some(NutrientDensity {
        protein_per_dollar: facts.macros.protein / dollars,
        fiber_per_dollar: facts.macros.fiber / dollars,
        iron_per_dollar: facts.mineral("iron") / dollars,
        vitamin_c_per_dollar: facts.vitamin("vitamin_c") / dollars,
        potassium_per_dollar: facts.mineral("potassium") / dollars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_resolve() {
        assert_eq!(lookup("Canned Black Beans").unwrap().key, "black_beans");
        assert_eq!(lookup("Fresh Ground Beef, 93% Lean").unwrap().key, "ground_beef");
        assert_eq!(lookup("Boneless Skinless Chicken Breasts").unwrap().key, "chicken");
        assert_eq!(lookup("Natural Peanut Butter").unwrap().key, "peanut_butter");
        assert!(lookup("Ground Turkey, 93% Lean").is_none());
        assert!(lookup("Whey Protein Powder, Vanilla").is_none());
    }

    #[test]
    fn short_query_matches_longer_key() {
        assert_eq!(lookup("egg").unwrap().key, "eggs");
    }

    #[test]
    fn density_per_dollar() {
        let beans = lookup("black beans").unwrap();
        let d = nutrient_density(beans, Money::from_cents(200)).unwrap();
        assert!((d.protein_per_dollar - 3.8).abs() < 1e-9);
        assert!((d.fiber_per_dollar - 3.75).abs() < 1e-9);
        assert!((d.iron_per_dollar - 0.9).abs() < 1e-9);
        assert_eq!(d.vitamin_c_per_dollar, 0.0);
        assert!(nutrient_density(beans, Money::ZERO).is_none());
    }

    #[test]
    fn flags() {
        let eggs = lookup("eggs").unwrap();
        assert!(eggs.has_flag("high_protein"));
        assert!(!eggs.has_flag("keto_friendly"));
    }
}
