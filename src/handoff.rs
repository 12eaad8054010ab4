//! Hand-off file between the budget stage and the nutrition stage.

use crate::budget::BudgetPlan;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

fn grocerease_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".grocerease")
}

pub fn default_path() -> PathBuf {
    grocerease_dir().join("last_plan.json")
}

pub fn save_plan(plan: &BudgetPlan, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(plan)
        .map_err(|e| Error::parse(format!("serialize plan: {e}")))?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), items = plan.shopping_list().len(), "plan saved for nutrition stage");
    Ok(())
}

pub fn load_plan(path: &Path) -> Result<BudgetPlan> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "no saved plan at {} ({e}); run `grocerease budget` first",
            path.display()
        ))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| Error::parse(format!("saved plan {}: {e}", path.display())))
}
