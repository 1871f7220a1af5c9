use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::section::Category;

pub const MIN_REVIEWERS: usize = 1;
pub const MAX_REVIEWERS: usize = 5;

/// One reviewer's comments, one optional string per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewerOpinions {
    pub name: Option<String>,
    pub technical: Option<String>,
    pub business: Option<String>,
    pub budget_adjustment: Option<String>,
    pub other: Option<String>,
}

impl ReviewerOpinions {
    pub fn get(&self, category: Category) -> &str {
        let value = match category {
            Category::Technical => &self.technical,
            Category::Business => &self.business,
            Category::BudgetAdjustment => &self.budget_adjustment,
            Category::Other => &self.other,
        };
        value.as_deref().unwrap_or("")
    }

    pub fn set(&mut self, category: Category, text: impl Into<String>) {
        let slot = match category {
            Category::Technical => &mut self.technical,
            Category::Business => &mut self.business,
            Category::BudgetAdjustment => &mut self.budget_adjustment,
            Category::Other => &mut self.other,
        };
        *slot = Some(text.into());
    }
}

/// Every reviewer's input for one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpinionSheet {
    #[serde(default)]
    pub reviewers: Vec<ReviewerOpinions>,
}

impl OpinionSheet {
    /// Load a sheet from TOML, or from JSON when the extension is `.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Input(format!("failed to read {}: {e}", path.display())))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let sheet: Self = toml::from_str(content)
            .map_err(|e| Error::Input(format!("invalid opinion sheet: {e}")))?;
        sheet.validate()?;
        Ok(sheet)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let sheet: Self = serde_json::from_str(content)
            .map_err(|e| Error::Input(format!("invalid opinion sheet: {e}")))?;
        sheet.validate()?;
        Ok(sheet)
    }

    fn validate(&self) -> Result<()> {
        let count = self.reviewers.len();
        if !(MIN_REVIEWERS..=MAX_REVIEWERS).contains(&count) {
            return Err(Error::Input(format!(
                "expected {MIN_REVIEWERS} to {MAX_REVIEWERS} reviewers, found {count}"
            )));
        }
        Ok(())
    }

    /// Display name for the reviewer at `index`, defaulting to `위원N`.
    pub fn reviewer_name(&self, index: usize) -> String {
        self.reviewers
            .get(index)
            .and_then(|r| r.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("위원{}", index + 1))
    }

    /// Raw strings for `category`, in reviewer order. Missing entries are empty.
    pub fn opinions(&self, category: Category) -> Vec<&str> {
        self.reviewers.iter().map(|r| r.get(category)).collect()
    }
}
