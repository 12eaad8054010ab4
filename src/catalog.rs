//! Static grocery catalog for the two supported stores.
//!
//! Prices are snapshot data, not live quotes. Each store carries the same seven
//! staples so the budget planner can compare like for like.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Store {
    Walmart,
    Target,
}

impl Store {
    pub const ALL: [Store; 2] = [Store::Walmart, Store::Target];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "walmart" => Some(Self::Walmart),
            "target" => Some(Self::Target),
            _ => None,
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walmart => write!(f, "Walmart"),
            Self::Target => write!(f, "Target"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Fresh Produce")]
    FreshProduce,
    Pantry,
    Dairy,
    #[serde(rename = "Health & Wellness")]
    HealthWellness,
    Meat,
    Bakery,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreshProduce => write!(f, "Fresh Produce"),
            Self::Pantry => write!(f, "Pantry"),
            Self::Dairy => write!(f, "Dairy"),
            Self::HealthWellness => write!(f, "Health & Wellness"),
            Self::Meat => write!(f, "Meat"),
            Self::Bakery => write!(f, "Bakery"),
        }
    }
}

/// Benefit program that can pay for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Program {
    Snap,
    Wic,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snap => write!(f, "SNAP"),
            Self::Wic => write!(f, "WIC"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogItem {
    pub product_id: &'static str,
    pub name: &'static str,
    pub brand: &'static str,
    pub size: &'static str,
    pub regular_price: Money,
    pub promo_price: Option<Money>,
    pub category: Category,
    pub snap_eligible: bool,
    pub wic_eligible: bool,
    pub store: Store,
}

impl CatalogItem {
    /// Promo price when one is running, otherwise the shelf price.
    pub fn price(&self) -> Money {
        self.promo_price.unwrap_or(self.regular_price)
    }

    pub fn eligible_for(&self, program: Program) -> bool {
        match program {
            Program::Snap => self.snap_eligible,
            Program::Wic => self.wic_eligible,
        }
    }

    pub fn display_name(&self) -> String {
        display_name(self.brand, self.name, self.size)
    }
}

/// `"{brand} {name}, {size}"`, dropping the generic `Fresh` brand.
pub fn display_name(brand: &str, name: &str, size: &str) -> String {
    let mut out = if brand.is_empty() || brand == "Fresh" {
        name.to_string()
    } else {
        format!("{brand} {name}")
    };
    if !size.is_empty() {
        out.push_str(", ");
        out.push_str(size);
    }
    out
}

const fn item(
    product_id: &'static str,
    name: &'static str,
    brand: &'static str,
    size: &'static str,
    regular_cents: i64,
    promo_cents: Option<i64>,
    category: Category,
    wic_eligible: bool,
    store: Store,
) -> CatalogItem {
    CatalogItem {
        product_id,
        name,
        brand,
        size,
        regular_price: Money::from_cents(regular_cents),
        promo_price: match promo_cents {
            Some(c) => Some(Money::from_cents(c)),
            None => None,
        },
        category,
        snap_eligible: true,
        wic_eligible,
        store,
    }
}

static WALMART: &[CatalogItem] = &[
    item("walmart_001", "Fresh Bananas", "Fresh", "per lb", 58, None, Category::FreshProduce, false, Store::Walmart),
    item("walmart_002", "Canned Black Beans", "Great Value", "15 oz", 108, Some(88), Category::Pantry, true, Store::Walmart),
    item("walmart_003", "Large White Eggs", "Great Value", "12 Count", 232, Some(198), Category::Dairy, true, Store::Walmart),
    item("walmart_004", "Whey Protein Powder, Vanilla", "Great Value", "1 lb", 300, None, Category::HealthWellness, false, Store::Walmart),
    item("walmart_005", "Peanut Butter, Creamy", "Great Value", "40 oz", 398, Some(348), Category::Pantry, true, Store::Walmart),
    item("walmart_006", "Fresh Ground Beef, 93% Lean", "Fresh", "per lb", 598, None, Category::Meat, false, Store::Walmart),
    item("walmart_007", "Boneless Skinless Chicken Breasts", "Great Value", "3 lb", 897, Some(748), Category::Meat, false, Store::Walmart),
];

static TARGET: &[CatalogItem] = &[
    item("target_001", "Fresh Organic Bananas", "Fresh", "per lb", 79, Some(69), Category::FreshProduce, false, Store::Target),
    item("target_002", "Organic Black Beans", "Good & Gather", "15 oz", 129, None, Category::Pantry, true, Store::Target),
    item("target_003", "Cage Free Large Eggs", "Good & Gather", "12 Count", 279, None, Category::Dairy, true, Store::Target),
    item("target_004", "Whey Protein Powder, Chocolate", "Good & Gather", "1 lb", 349, Some(299), Category::HealthWellness, false, Store::Target),
    item("target_005", "Natural Peanut Butter", "Good & Gather", "36 oz", 449, None, Category::Pantry, true, Store::Target),
    item("target_006", "Ground Turkey, 93% Lean", "Good & Gather", "per lb", 649, Some(599), Category::Meat, false, Store::Target),
    item("target_007", "Boneless Skinless Chicken Breast", "Good & Gather", "2.5 lb", 999, Some(849), Category::Meat, false, Store::Target),
];

pub fn store_items(store: Store) -> &'static [CatalogItem] {
    match store {
        Store::Walmart => WALMART,
        Store::Target => TARGET,
    }
}

/// Every catalog item, Walmart first.
pub fn all_items() -> impl Iterator<Item = &'static CatalogItem> {
    Store::ALL.into_iter().flat_map(store_items)
}

pub fn eligible_items(program: Program) -> Vec<&'static CatalogItem> {
    all_items().filter(|i| i.eligible_for(program)).collect()
}

pub fn find(product_id: &str) -> Option<&'static CatalogItem> {
    all_items().find(|i| i.product_id == product_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_items_per_store_all_snap_eligible() {
        for store in Store::ALL {
            let items = store_items(store);
            assert_eq!(items.len(), 7);
            assert!(items.iter().all(|i| i.snap_eligible && i.store == store));
        }
        assert_eq!(eligible_items(Program::Snap).len(), 14);
    }

    #[test]
    fn wic_covers_beans_eggs_peanut_butter() {
        let wic = eligible_items(Program::Wic);
        assert_eq!(wic.len(), 6);
        assert!(wic.iter().all(|i| matches!(i.category, Category::Pantry | Category::Dairy)));
    }

    #[test]
    fn promo_price_wins() {
        let eggs = find("walmart_003").unwrap();
        assert_eq!(eggs.price(), Money::from_cents(198));
        let bananas = find("walmart_001").unwrap();
        assert_eq!(bananas.price(), Money::from_cents(58));
    }

    #[test]
    fn display_name_skips_fresh_brand() {
        assert_eq!(find("walmart_001").unwrap().display_name(), "Fresh Bananas, per lb");
        assert_eq!(
            find("target_002").unwrap().display_name(),
            "Good & Gather Organic Black Beans, 15 oz"
        );
    }

    #[test]
    fn store_parse_is_case_insensitive() {
        assert_eq!(Store::parse("WALMART"), Some(Store::Walmart));
        assert_eq!(Store::parse(" target "), Some(Store::Target));
        assert_eq!(Store::parse("kroger"), None);
    }
}
