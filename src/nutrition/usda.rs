//! USDA FoodData Central lookups with built-in estimates when the API is unreachable.

use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const DEFAULT_API_KEY_ENV: &str = "USDA_API_KEY";
const DEMO_KEY: &str = "DEMO_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataSource {
    #[serde(rename = "USDA FoodData Central")]
    Usda,
    #[serde(rename = "Estimated (USDA API unavailable)")]
    Estimated,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usda => write!(f, "USDA FoodData Central"),
            Self::Estimated => write!(f, "Estimated (USDA API unavailable)"),
        }
    }
}

/// Amounts per 100 g. Micronutrients are only present when USDA reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Nutrients {
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub sodium: Option<f64>,
    pub calcium: Option<f64>,
    pub iron: Option<f64>,
    pub vitamin_c: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsdaFood {
    pub name: String,
    pub usda_id: Option<u64>,
    pub description: String,
    pub nutrients: Nutrients,
    pub serving_size: &'static str,
    pub data_source: DataSource,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchHit>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    fdc_id: u64,
}

/// `GET /food/{fdcId}` body, reduced to what we read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetail {
    pub fdc_id: Option<u64>,
    pub description: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
pub struct FoodNutrient {
    #[serde(default)]
    pub nutrient: NutrientInfo,
    pub amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NutrientInfo {
    #[serde(default)]
    pub name: String,
}

pub struct UsdaClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

impl UsdaClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(concat!("grocerease/", env!("CARGO_PKG_VERSION")))?,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Key from `api_key_env`, falling back to the public `DEMO_KEY`.
    pub fn from_env(api_key_env: &str, base_url: Option<String>) -> Result<Self> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| DEMO_KEY.into());
        Self::new(api_key, base_url)
    }

    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.http = self.http.with_retries(max_retries);
        self
    }

    /// Never fails: any API or parse problem yields the built-in estimate.
    pub async fn fetch(&self, food_name: &str) -> UsdaFood {
        match self.try_fetch(food_name).await {
            Ok(Some(food)) => food,
            Ok(None) => {
                debug!(food = food_name, "no USDA match, using estimate");
                estimate(food_name)
            }
            Err(e) => {
                warn!(food = food_name, error = %e, "USDA lookup failed, using estimate");
                estimate(food_name)
            }
        }
    }

    pub async fn try_fetch(&self, food_name: &str) -> Result<Option<UsdaFood>> {
        let search: SearchResponse = self
            .http
            .get_json_query(
                &format!("{}/foods/search", self.base_url),
                &[
                    ("api_key", self.api_key.as_str()),
                    ("query", food_name),
                    ("pageSize", "1"),
                    ("sortBy", "dataType"),
                    ("sortOrder", "asc"),
                ],
            )
            .await?;

        let Some(hit) = search.foods.first() else {
            return Ok(None);
        };

        let detail: FoodDetail = self
            .http
            .get_json_query(
                &format!("{}/food/{}", self.base_url, hit.fdc_id),
                &[("api_key", self.api_key.as_str())],
            )
            .await?;

        if detail.food_nutrients.is_empty() {
            return Err(Error::parse(format!(
                "USDA food {} has no nutrient data",
                hit.fdc_id
            )));
        }
        Ok(Some(from_detail(&detail, food_name)))
    }
}

/// Map USDA nutrient names onto our fields. The first reading of each nutrient wins.
pub fn from_detail(detail: &FoodDetail, food_name: &str) -> UsdaFood {
    let mut n = Nutrients::default();
    for entry in &detail.food_nutrients {
        let Some(amount) = entry.amount else {
            continue;
        };
        let name = entry.nutrient.name.to_lowercase();
        let slot = if name.contains("protein") {
            &mut n.protein
        } else if name.contains("fat") && (name.contains("total") || name.contains("lipid")) {
            &mut n.fat
        } else if name.contains("carbohydrate") {
            &mut n.carbs
        } else if name.contains("fiber") {
            &mut n.fiber
        } else if name.contains("sugar") && name.contains("total") {
            &mut n.sugar
        } else if name.contains("sodium") {
            &mut n.sodium
        } else if name.contains("calcium") {
            &mut n.calcium
        } else if name.contains("iron") {
            &mut n.iron
        } else if name.contains("vitamin c") {
            &mut n.vitamin_c
        } else {
            continue;
        };
        slot.get_or_insert(amount);
    }

    UsdaFood {
        name: food_name.to_string(),
        usda_id: detail.fdc_id,
        description: detail
            .description
            .clone()
            .unwrap_or_else(|| food_name.to_string()),
        nutrients: n,
        serving_size: "100g",
        data_source: DataSource::Usda,
    }
}

// (key, protein, fat, carbs, fiber, sugar, sodium)
const ESTIMATES: &[(&str, [f64; 6])] = &[
    ("chicken", [25.0, 3.0, 0.0, 0.0, 0.0, 70.0]),
    ("beef", [26.0, 15.0, 0.0, 0.0, 0.0, 60.0]),
    ("eggs", [13.0, 11.0, 1.0, 0.0, 0.0, 140.0]),
    ("milk", [3.0, 3.0, 5.0, 0.0, 5.0, 40.0]),
    ("bread", [9.0, 3.0, 49.0, 2.0, 5.0, 400.0]),
    ("rice", [7.0, 0.0, 28.0, 0.0, 0.0, 5.0]),
    ("banana", [1.0, 0.0, 23.0, 3.0, 12.0, 1.0]),
    ("carrots", [1.0, 0.0, 10.0, 3.0, 5.0, 69.0]),
    ("cheese", [25.0, 33.0, 1.0, 0.0, 0.0, 620.0]),
];
const DEFAULT_ESTIMATE: [f64; 6] = [5.0, 2.0, 10.0, 1.0, 2.0, 50.0];

/// Rough per-100 g values keyed on a substring of the food name.
pub fn estimate(food_name: &str) -> UsdaFood {
    let lower = food_name.to_lowercase();
    let [protein, fat, carbs, fiber, sugar, sodium] = ESTIMATES
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, v)| *v)
        .unwrap_or(DEFAULT_ESTIMATE);

    UsdaFood {
        name: food_name.to_string(),
        usda_id: None,
        description: format!("Estimated nutrition for {food_name}"),
        nutrients: Nutrients {
            protein: Some(protein),
            fat: Some(fat),
            carbs: Some(carbs),
            fiber: Some(fiber),
            sugar: Some(sugar),
            sodium: Some(sodium),
            ..Nutrients::default()
        },
        serving_size: "100g",
        data_source: DataSource::Estimated,
    }
}
