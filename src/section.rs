use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grouping::group;
use crate::polarity::{Polarity, polarity};

pub const CONFLICT_LINE: &str = "⚠️ 위원 간 의견이 상이합니다:";
pub const BULLET: &str = "- ";

/// Evaluation categories, in draft order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Business,
    BudgetAdjustment,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Technical,
        Category::Business,
        Category::BudgetAdjustment,
        Category::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Business => "business",
            Category::BudgetAdjustment => "budget_adjustment",
            Category::Other => "other",
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            Category::Technical => "기술성",
            Category::Business => "사업성",
            Category::BudgetAdjustment => "연구개발비 조정",
            Category::Other => "기타사항",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Display labels for the four categories. Labels only affect rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryLabels {
    pub technical: String,
    pub business: String,
    pub budget_adjustment: String,
    pub other: String,
}

impl Default for CategoryLabels {
    fn default() -> Self {
        Self {
            technical: Category::Technical.default_label().to_string(),
            business: Category::Business.default_label().to_string(),
            budget_adjustment: Category::BudgetAdjustment.default_label().to_string(),
            other: Category::Other.default_label().to_string(),
        }
    }
}

impl CategoryLabels {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Technical => &self.technical,
            Category::Business => &self.business,
            Category::BudgetAdjustment => &self.budget_adjustment,
            Category::Other => &self.other,
        }
    }
}

/// Aggregated view of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionResult {
    pub category: Category,
    pub label: String,
    /// Group representatives in group order.
    pub display: Vec<String>,
    pub conflict: bool,
    pub section_text: String,
}

/// True when at least one polarity is positive and another is negative.
pub fn has_conflict<I: IntoIterator<Item = Polarity>>(labels: I) -> bool {
    let mut pos = false;
    let mut neg = false;
    for label in labels {
        match label {
            Polarity::Pos => pos = true,
            Polarity::Neg => neg = true,
            Polarity::Neu => {}
        }
    }
    pos && neg
}

/// Render the text block for one section.
pub fn render_section(label: &str, display: &[String], conflict: bool) -> String {
    let mut lines = Vec::with_capacity(display.len() + 2);
    lines.push(format!("[{label}]"));
    if conflict {
        lines.push(CONFLICT_LINE.to_string());
    }
    for rep in display {
        lines.push(format!("{BULLET}{rep}"));
    }
    lines.join("\n").trim().to_string()
}

/// Group one category's raw opinions and flag disagreement between groups.
pub fn build_section<S: AsRef<str>>(
    category: Category,
    label: &str,
    raw_opinions: &[S],
    threshold: f64,
) -> SectionResult {
    let groups = group(raw_opinions, threshold);
    let conflict = has_conflict(groups.iter().map(|g| polarity(&g.representative)));
    let representatives: Vec<String> = groups.into_iter().map(|g| g.representative).collect();

    debug!(%category, groups = representatives.len(), conflict, "built section");

    let section_text = render_section(label, &representatives, conflict);
    SectionResult {
        category,
        label: label.to_string(),
        display: representatives,
        conflict,
        section_text,
    }
}
