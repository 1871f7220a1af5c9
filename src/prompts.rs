use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::section::{Category, CategoryLabels};
use crate::sheet::OpinionSheet;

const DEFAULT_SUMMARIZE: &str = include_str!("default_prompts/summarize.md");

#[derive(Debug, Serialize)]
struct PromptOpinion {
    reviewer: String,
    text: String,
}

#[derive(Debug, Serialize)]
struct PromptCategory {
    key: &'static str,
    label: String,
    opinions: Vec<PromptOpinion>,
}

#[derive(Debug, Serialize)]
struct PromptContext {
    categories: Vec<PromptCategory>,
}

fn build_context(sheet: &OpinionSheet, labels: &CategoryLabels) -> PromptContext {
    let categories = Category::ALL
        .into_iter()
        .map(|category| PromptCategory {
            key: category.key(),
            label: labels.get(category).to_string(),
            opinions: sheet
                .reviewers
                .iter()
                .enumerate()
                .filter_map(|(i, r)| {
                    let text = normalize(r.get(category));
                    (!text.is_empty()).then(|| PromptOpinion {
                        reviewer: sheet.reviewer_name(i),
                        text,
                    })
                })
                .collect(),
        })
        .collect();
    PromptContext { categories }
}

/// Prompt template for the model summarizer, with an optional file override.
pub struct PromptEngine {
    override_path: Option<PathBuf>,
}

impl PromptEngine {
    pub fn new(override_path: Option<PathBuf>) -> Self {
        Self { override_path }
    }

    /// The override file when configured and present, else the built-in template.
    pub fn load_template(&self) -> Result<String> {
        if let Some(ref path) = self.override_path
            && path.exists()
        {
            return std::fs::read_to_string(path).map_err(|e| {
                Error::Prompt(format!(
                    "failed to read override template {}: {e}",
                    path.display()
                ))
            });
        }
        Ok(DEFAULT_SUMMARIZE.to_string())
    }

    /// Render the summarize prompt for every non-blank opinion on the sheet.
    pub fn render_summarize(
        &self,
        sheet: &OpinionSheet,
        labels: &CategoryLabels,
    ) -> Result<String> {
        let template = self.load_template()?;
        render_template(&template, &build_context(sheet, labels))
    }
}

/// Compile and render an `upon` template against a serializable context.
pub fn render_template<S: Serialize>(template: &str, ctx: &S) -> Result<String> {
    let engine = upon::Engine::new();
    let compiled = engine
        .compile(template)
        .map_err(|e| Error::Prompt(format!("invalid prompt template: {e}")))?;
    compiled
        .render(&engine, ctx)
        .to_string()
        .map_err(|e| Error::Prompt(format!("failed to render prompt: {e}")))
}
