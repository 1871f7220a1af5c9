use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::compress::compress;
use crate::config::Config;
use crate::draft::{byte_len, compose};
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::phrases::missing_phrases;
use crate::section::{Category, SectionResult, build_section, render_section};
use crate::sheet::OpinionSheet;
use crate::summarizer::{StructuredDraft, Summarizer};

/// Where the section content of a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftSource {
    Lexical,
    Model,
}

/// Conditions the secretary should look at before finalizing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    Conflict { category: Category, label: String },
    MissingPhrases { phrases: Vec<String> },
    OverBudget { byte_len: usize, byte_limit: usize },
    ModelFallback { reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Conflict { label, .. } => {
                write!(f, "⚠️ {label}: 위원 간 상이한 의견이 감지되었습니다.")
            }
            Warning::MissingPhrases { phrases } => {
                write!(f, "❌ 누락된 필수 문구: {}", phrases.join(", "))
            }
            Warning::OverBudget {
                byte_len,
                byte_limit,
            } => write!(f, "✂️ 글자수(byte) 한도 초과: {byte_len} / {byte_limit}"),
            Warning::ModelFallback { reason } => {
                write!(f, "ℹ️ 모델 초안 생성 실패, 기본 취합 결과를 사용합니다: {reason}")
            }
        }
    }
}

/// Result of one aggregation run. Owned by the caller; nothing is cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub source: DraftSource,
    pub sections: Vec<SectionResult>,
    pub draft: String,
    pub missing_phrases: Vec<String>,
    pub byte_len: usize,
    pub byte_limit: usize,
    pub has_conflict: bool,
    pub warnings: Vec<Warning>,
}

impl Report {
    pub fn over_budget(&self) -> bool {
        self.byte_len > self.byte_limit
    }

    /// Fraction of the byte budget in use, capped at 1.0.
    pub fn usage(&self) -> f64 {
        (self.byte_len as f64 / self.byte_limit.max(1) as f64).min(1.0)
    }

    /// Human-readable rendering for terminal output.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("== 항목별 취합 결과 ==\n");
        for section in &self.sections {
            out.push_str(&format!("\n{}\n", section.label));
            if section.conflict {
                out.push_str("  ⚠️ 위원 간 상이한 의견이 감지되었습니다.\n");
            }
            if section.display.is_empty() {
                out.push_str("  (입력된 의견이 없습니다.)\n");
            }
            for rep in &section.display {
                out.push_str(&format!("  - {rep}\n"));
            }
        }

        out.push_str("\n== 종합의견 초안 ==\n\n");
        out.push_str(&self.draft);
        out.push_str(&format!(
            "\n\n글자수(byte): {} / {} ({:.0}%)\n",
            self.byte_len,
            self.byte_limit,
            self.usage() * 100.0
        ));
        for warning in &self.warnings {
            out.push_str(&format!("{warning}\n"));
        }
        out
    }

    /// Pretty JSON of the report together with the text actually delivered,
    /// which differs from `draft` when the draft was compressed.
    pub fn to_json(&self, final_text: &str) -> Result<String> {
        let body = serde_json::json!({
            "report": self,
            "final_text": final_text,
        });
        serde_json::to_string_pretty(&body)
            .map_err(|e| Error::Output(format!("failed to serialize report: {e}")))
    }
}

/// A draft squeezed to the byte budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compressed {
    pub text: String,
    pub byte_len: usize,
    pub byte_limit: usize,
}

/// Runs the aggregation pipeline with validated settings.
pub struct Aggregator {
    config: Config,
    summarizer: Option<Box<dyn Summarizer>>,
    fallback_reason: Option<String>,
}

impl Aggregator {
    /// Validate `config` and build an aggregator using the lexical pipeline.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            summarizer: None,
            fallback_reason: None,
        })
    }

    /// Try `summarizer` first on every run; the lexical pipeline is the fallback.
    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Record that a requested summarizer could not be set up. Every run then
    /// reports a [`Warning::ModelFallback`] with `reason`.
    pub fn with_unavailable_summarizer(mut self, reason: impl Into<String>) -> Self {
        self.summarizer = None;
        self.fallback_reason = Some(reason.into());
        self
    }

    fn lexical_sections(&self, sheet: &OpinionSheet) -> Vec<SectionResult> {
        Category::ALL
            .into_iter()
            .map(|category| {
                build_section(
                    category,
                    self.config.labels.get(category),
                    &sheet.opinions(category),
                    self.config.similarity_threshold,
                )
            })
            .collect()
    }

    fn model_sections(&self, draft: &StructuredDraft) -> Vec<SectionResult> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let (lines, conflict) = draft.category(category);
                let display: Vec<String> = lines
                    .into_iter()
                    .map(normalize)
                    .filter(|l| !l.is_empty())
                    .collect();
                let label = self.config.labels.get(category);
                SectionResult {
                    category,
                    label: label.to_string(),
                    section_text: render_section(label, &display, conflict),
                    display,
                    conflict,
                }
            })
            .collect()
    }

    /// Aggregate every category of `sheet` into a report.
    pub fn run(&self, sheet: &OpinionSheet) -> Report {
        let mut warnings = Vec::new();

        let (source, sections) = match self.summarizer {
            Some(ref summarizer) => match summarizer.summarize(sheet) {
                Ok(structured) => (DraftSource::Model, self.model_sections(&structured)),
                Err(e) => {
                    warn!(error = %e, "model summarizer failed, using lexical pipeline");
                    warnings.push(Warning::ModelFallback {
                        reason: e.to_string(),
                    });
                    (DraftSource::Lexical, self.lexical_sections(sheet))
                }
            },
            None => {
                if let Some(ref reason) = self.fallback_reason {
                    warnings.push(Warning::ModelFallback {
                        reason: reason.clone(),
                    });
                }
                (DraftSource::Lexical, self.lexical_sections(sheet))
            }
        };

        let draft = compose(&sections);
        let missing = missing_phrases(&draft, &self.config.required_phrases);
        let draft_len = byte_len(&draft);
        let has_conflict = sections.iter().any(|s| s.conflict);

        for section in sections.iter().filter(|s| s.conflict) {
            warnings.push(Warning::Conflict {
                category: section.category,
                label: section.label.clone(),
            });
        }
        if !missing.is_empty() {
            warnings.push(Warning::MissingPhrases {
                phrases: missing.clone(),
            });
        }
        if draft_len > self.config.byte_limit {
            warnings.push(Warning::OverBudget {
                byte_len: draft_len,
                byte_limit: self.config.byte_limit,
            });
        }

        info!(
            ?source,
            byte_len = draft_len,
            byte_limit = self.config.byte_limit,
            has_conflict,
            missing = missing.len(),
            "aggregation complete"
        );

        Report {
            source,
            sections,
            draft,
            missing_phrases: missing,
            byte_len: draft_len,
            byte_limit: self.config.byte_limit,
            has_conflict,
            warnings,
        }
    }

    /// Compress any draft text to the configured byte budget.
    pub fn compress_text(&self, text: &str) -> Result<Compressed> {
        let compressed = compress(text, self.config.byte_limit, &self.config.keep_keywords)?;
        Ok(Compressed {
            byte_len: byte_len(&compressed),
            text: compressed,
            byte_limit: self.config.byte_limit,
        })
    }

    /// Compress a report's full draft. The report itself is left untouched.
    pub fn compress(&self, report: &Report) -> Result<Compressed> {
        self.compress_text(&report.draft)
    }

    /// Required phrases absent from `text`.
    pub fn check(&self, text: &str) -> Vec<String> {
        missing_phrases(text, &self.config.required_phrases)
    }
}
