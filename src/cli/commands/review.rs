//! Review CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use super::{description_service, open_database};
use crate::adapters::sqlite::{SqliteClassificationRepository, SqliteDescriptionCache};
use crate::adapters::taric::TaricSoapClient;
use crate::cli::output::{list_table, output, truncate, CommandOutput};
use crate::domain::models::{
    ClassificationRecord, Config, Evaluation, OfficialMatch, ReviewFilter, ReviewItem,
};
use crate::services::{ReviewDetail, ReviewService};

#[derive(Args, Debug)]
pub struct ReviewArgs {
    #[command(subcommand)]
    pub command: ReviewCommands,
}

#[derive(Subcommand, Debug)]
pub enum ReviewCommands {
    /// Store a classifier answer (JSON object) for review
    Import {
        /// Path to the JSON answer
        file: PathBuf,

        /// Name of the classified file (defaults to the JSON file name)
        #[arg(long)]
        filename: Option<String>,
    },
    /// List classifications, newest first
    List {
        /// Maximum number of rows
        #[arg(short, long, default_value = "100")]
        limit: u32,

        /// Only classifications without an evaluation
        #[arg(long, conflicts_with = "reviewed")]
        unreviewed: bool,

        /// Only classifications with an evaluation
        #[arg(long)]
        reviewed: bool,
    },
    /// Show a classification next to its official description
    Show {
        /// Classification id
        id: i64,

        /// Language of the official description
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Save the evaluation of a classification
    Save {
        /// Classification id
        id: i64,

        /// Number of leading digits that are correct (0-10)
        #[arg(long)]
        correct_digits: u8,

        #[arg(long)]
        reviewer: Option<String>,

        #[arg(long)]
        comment: Option<String>,

        /// Supervisor rating
        #[arg(long)]
        rating: Option<i64>,
    },
    /// Record how well a classification matches the official description
    OfficialMatch {
        /// Classification id
        id: i64,

        /// Agreement between 0.0 and 1.0
        #[arg(long)]
        score: f64,

        /// Short verdict, e.g. match, partial, mismatch
        #[arg(long)]
        label: String,

        #[arg(long)]
        reviewer: Option<String>,
    },
}

impl ReviewCommands {
    fn filter(unreviewed: bool, reviewed: bool) -> ReviewFilter {
        match (unreviewed, reviewed) {
            (true, _) => ReviewFilter::Unreviewed,
            (_, true) => ReviewFilter::Reviewed,
            _ => ReviewFilter::All,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ImportOutput {
    pub classification: ClassificationRecord,
}

impl CommandOutput for ImportOutput {
    fn to_human(&self) -> String {
        let c = &self.classification;
        format!(
            "Imported classification #{} for {} (TARIC {})",
            c.id,
            c.filename.as_deref().unwrap_or("-"),
            c.taric_code.as_deref().unwrap_or("-")
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ReviewListOutput {
    pub items: Vec<ReviewItem>,
    pub total: usize,
}

impl CommandOutput for ReviewListOutput {
    fn to_human(&self) -> String {
        if self.items.is_empty() {
            return "No classifications found.".to_string();
        }

        let mut table = list_table(&["id", "created", "file", "taric", "conf", "digits", "reviewer"]);
        for item in &self.items {
            let c = &item.classification;
            let evaluation = item.evaluation.as_ref().map(|e| &e.evaluation);
            table.add_row(vec![
                c.id.to_string(),
                c.created_at
                    .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
                truncate(c.filename.as_deref().unwrap_or("-"), 30),
                c.taric_code.clone().unwrap_or_else(|| "-".to_string()),
                c.confidence.map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
                evaluation.map_or_else(|| "-".to_string(), |e| e.correct_digits.to_string()),
                evaluation
                    .and_then(|e| e.reviewer.clone())
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }

        format!("{} classification(s):\n{table}", self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ReviewShowOutput {
    #[serde(flatten)]
    pub detail: ReviewDetail,
}

impl CommandOutput for ReviewShowOutput {
    fn to_human(&self) -> String {
        let c = &self.detail.item.classification;
        let mut lines = vec![
            format!("Classification #{}", c.id),
            format!("File: {}", c.filename.as_deref().unwrap_or("-")),
            format!(
                "Created: {}",
                c.created_at.map_or_else(|| "-".to_string(), |t| t.to_rfc3339())
            ),
            format!("TARIC: {}", c.taric_code.as_deref().unwrap_or("-")),
            format!("CN: {}", c.cn_code.as_deref().unwrap_or("-")),
            format!("HS chapter: {}", c.hs_chapter.as_deref().unwrap_or("-")),
        ];
        if let Some(confidence) = c.confidence {
            lines.push(format!("Confidence: {confidence:.2}"));
        }
        if let Some(reason) = &c.short_reason {
            lines.push(format!("Reason: {reason}"));
        }

        match &self.detail.official {
            Some(official) => {
                lines.push(format!("\nOfficial description ({}):", official.language));
                lines.push(if official.description.is_empty() {
                    "  (empty)".to_string()
                } else {
                    format!("  {}", official.description)
                });
            }
            None => lines.push("\nOfficial description: not available".to_string()),
        }

        if let Some(review) = &c.official_match {
            lines.push(format!(
                "Official match: {} (score {:.2})",
                review.official_match.label, review.official_match.score
            ));
        }

        match &self.detail.item.evaluation {
            Some(stored) => {
                let e = &stored.evaluation;
                lines.push(format!("\nEvaluation: {} correct digit(s)", e.correct_digits));
                if let Some(reviewer) = &e.reviewer {
                    lines.push(format!("Reviewer: {reviewer}"));
                }
                if let Some(rating) = e.supervisor_rating {
                    lines.push(format!("Supervisor rating: {rating}"));
                }
                if let Some(comment) = &e.comment {
                    lines.push(format!("Comment: {comment}"));
                }
            }
            None => lines.push("\nEvaluation: none".to_string()),
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ReviewActionOutput {
    pub success: bool,
    pub message: String,
    pub classification_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_id: Option<i64>,
}

impl CommandOutput for ReviewActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

type CliReviewService =
    ReviewService<SqliteClassificationRepository, SqliteDescriptionCache, TaricSoapClient>;

pub async fn execute(args: ReviewArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_database(config).await?;
    let descriptions = Arc::new(description_service(config, pool.clone())?);
    let repository = Arc::new(SqliteClassificationRepository::new(pool));
    let service: CliReviewService = ReviewService::new(repository, descriptions);

    match args.command {
        ReviewCommands::Import { file, filename } => {
            let body = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let response: serde_json::Value = serde_json::from_str(&body)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let filename = filename.unwrap_or_else(|| {
                file.file_name()
                    .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned())
            });

            let classification = service
                .import_model_response(&filename, &response)
                .await
                .context("Failed to import classification")?;
            output(&ImportOutput { classification }, json_mode);
        }

        ReviewCommands::List {
            limit,
            unreviewed,
            reviewed,
        } => {
            let items = service
                .list(ReviewCommands::filter(unreviewed, reviewed), limit)
                .await
                .context("Failed to list classifications")?;
            let out = ReviewListOutput {
                total: items.len(),
                items,
            };
            output(&out, json_mode);
        }

        ReviewCommands::Show { id, lang } => {
            let detail = service
                .show(id, lang.as_deref())
                .await
                .with_context(|| format!("Failed to load classification #{id}"))?;
            output(&ReviewShowOutput { detail }, json_mode);
        }

        ReviewCommands::Save {
            id,
            correct_digits,
            reviewer,
            comment,
            rating,
        } => {
            let evaluation = Evaluation {
                correct_digits,
                reviewer,
                comment,
                supervisor_rating: rating,
            };
            let evaluation_id = service
                .save_evaluation(id, &evaluation)
                .await
                .context("Failed to save evaluation")?;
            let out = ReviewActionOutput {
                success: true,
                message: format!("Evaluation saved for classification #{id}"),
                classification_id: id,
                evaluation_id: Some(evaluation_id),
            };
            output(&out, json_mode);
        }

        ReviewCommands::OfficialMatch {
            id,
            score,
            label,
            reviewer,
        } => {
            let official_match = OfficialMatch {
                score,
                label,
                reviewed_by: reviewer,
            };
            service
                .record_official_match(id, &official_match)
                .await
                .context("Failed to record official match")?;
            let out = ReviewActionOutput {
                success: true,
                message: format!("Official match recorded for classification #{id}"),
                classification_id: id,
                evaluation_id: None,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_flags() {
        assert_eq!(ReviewCommands::filter(false, false), ReviewFilter::All);
        assert_eq!(ReviewCommands::filter(true, false), ReviewFilter::Unreviewed);
        assert_eq!(ReviewCommands::filter(false, true), ReviewFilter::Reviewed);
    }

    #[test]
    fn test_empty_list_output() {
        let out = ReviewListOutput {
            items: vec![],
            total: 0,
        };
        assert_eq!(out.to_human(), "No classifications found.");
        assert_eq!(out.to_json()["total"], 0);
    }

    #[test]
    fn test_action_output_json_skips_missing_evaluation() {
        let out = ReviewActionOutput {
            success: true,
            message: "ok".to_string(),
            classification_id: 3,
            evaluation_id: None,
        };
        let json = out.to_json();
        assert_eq!(json["classification_id"], 3);
        assert!(json.get("evaluation_id").is_none());
    }
}
