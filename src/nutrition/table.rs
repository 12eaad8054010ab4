use crate::money::Money;
use crate::text::{is_match, word_regex};
use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Protein,
    Grain,
    Vegetable,
    Fruit,
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protein => write!(f, "protein"),
            Self::Grain => write!(f, "grain"),
            Self::Vegetable => write!(f, "vegetable"),
            Self::Fruit => write!(f, "fruit"),
        }
    }
}

/// Per-100 g profile with a fixed 0-100 nutrition score.
#[derive(Debug, Clone, Serialize)]
pub struct FoodProfile {
    pub name: &'static str,
    pub calories: u32,
    pub protein_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub sodium_mg: f64,
    pub category: FoodCategory,
    pub price: Money,
    pub nutrition_score: f64,
    pub protein_per_dollar: f64,
}

macro_rules! food {
    ($name:literal, $cal:literal, $protein:literal, $fiber:literal, $sugar:literal, $sodium:literal,
     $cat:ident, $cents:literal, $score:literal, $ppd:literal) => {
        FoodProfile {
            name: $name,
            calories: $cal,
            protein_g: $protein,
            fiber_g: $fiber,
            sugar_g: $sugar,
            sodium_mg: $sodium,
            category: FoodCategory::$cat,
            price: Money::from_cents($cents),
            nutrition_score: $score,
            protein_per_dollar: $ppd,
        }
    };
}

/// One whole-word pattern per word of each food name, in `FOODS` order.
static NAME_WORDS: LazyLock<Vec<Vec<Regex>>> = LazyLock::new(|| {
    FOODS
        .iter()
        .map(|f| f.name.split(' ').map(word_regex).collect())
        .collect()
});

pub static FOODS: &[FoodProfile] = &[
    food!("chicken breast", 165, 31.0, 0.0, 0.0, 74.0, Protein, 899, 96.3, 3.4),
    food!("lentils", 116, 9.0, 8.0, 2.0, 2.0, Protein, 249, 100.0, 3.6),
    food!("brown rice", 123, 3.0, 2.0, 0.0, 5.0, Grain, 325, 85.0, 0.9),
    food!("white bread", 265, 9.0, 2.0, 5.0, 477.0, Grain, 199, 45.0, 4.5),
    food!("spinach", 23, 3.0, 2.0, 0.0, 79.0, Vegetable, 349, 88.0, 0.9),
    food!("banana", 89, 1.0, 3.0, 12.0, 1.0, Fruit, 129, 72.0, 0.8),
    food!("whole wheat bread", 247, 13.0, 7.0, 4.0, 491.0, Grain, 279, 85.0, 4.7),
    food!("salmon", 208, 20.0, 0.0, 0.0, 59.0, Protein, 1299, 97.0, 1.5),
    food!("oats", 389, 17.0, 11.0, 1.0, 2.0, Grain, 459, 100.0, 3.7),
    food!("broccoli", 34, 3.0, 3.0, 2.0, 33.0, Vegetable, 299, 90.0, 1.0),
    food!("eggs", 155, 13.0, 0.0, 1.0, 124.0, Protein, 389, 89.0, 3.3),
    food!("quinoa", 368, 14.0, 7.0, 0.0, 5.0, Grain, 649, 100.0, 2.2),
];

impl FoodProfile {
    /// Table names are lower case; `Chicken Breast` for display.
    pub fn title(&self) -> String {
        self.name
            .split(' ')
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Longest table name contained in the item wins; otherwise the first entry
/// sharing a whole word with it.
pub fn lookup(item: &str) -> Option<&'static FoodProfile> {
    let item = item.trim().to_lowercase();
    if item.is_empty() {
        return None;
    }

    let full = FOODS
        .iter()
        .filter(|f| item.contains(f.name))
        .max_by_key(|f| f.name.len());
    if full.is_some() {
        return full;
    }

    FOODS
        .iter()
        .zip(NAME_WORDS.iter())
        .find(|(_, words)| words.iter().any(|re| is_match(re, &item)))
        .map(|(food, _)| food)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_foods_with_scores_in_range() {
        assert_eq!(FOODS.len(), 12);
        assert!(FOODS
            .iter()
            .all(|f| (0.0..=100.0).contains(&f.nutrition_score)));
    }

    #[test]
    fn exact_name_beats_shared_word() {
        assert_eq!(lookup("Whole Wheat Bread").unwrap().name, "whole wheat bread");
        assert_eq!(lookup("white bread").unwrap().name, "white bread");
    }

    #[test]
    fn plural_and_branded_names_match() {
        assert_eq!(lookup("Fresh Bananas, per lb").unwrap().name, "banana");
        assert_eq!(
            lookup("Great Value Boneless Skinless Chicken Breasts").unwrap().name,
            "chicken breast"
        );
        assert_eq!(lookup("Large White Eggs").unwrap().name, "eggs");
    }

    #[test]
    fn shared_word_fallback() {
        // no full name, but "rice" is a whole word
        assert_eq!(lookup("jasmine rice").unwrap().name, "brown rice");
        assert!(lookup("licorice").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn title_case() {
        assert_eq!(lookup("chicken breast").unwrap().title(), "Chicken Breast");
    }
}
