//! Lint command - offline query checks

use crate::app::{LintArgs, OutputFormat};
use anyhow::Result;
use promptopt_core::optimizer::{
    intent_preserved, is_well_formed, validate_query, word_overlap_ratio, INTENT_THRESHOLD,
    MIN_WELL_FORMED_CHARS, MIN_WELL_FORMED_WORDS,
};
use promptopt_core::exit_codes;
use serde::Serialize;

#[derive(Serialize)]
struct LintReport {
    query: String,
    characters: usize,
    words: usize,
    well_formed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    intent_preserved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlap_ratio: Option<f64>,
}

pub fn run(args: LintArgs, format: OutputFormat) -> Result<i32> {
    let query = args.query.join(" ");
    validate_query(&query)?;

    let report = LintReport {
        characters: query.chars().count(),
        words: query.split_whitespace().count(),
        well_formed: is_well_formed(&query),
        intent_preserved: args.against.as_deref().map(|r| intent_preserved(&query, r)),
        overlap_ratio: args
            .against
            .as_deref()
            .and_then(|r| word_overlap_ratio(&query, r)),
        query,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Cli => {
            println!("Query:            {}", report.query);
            println!(
                "Characters:       {} (minimum {})",
                report.characters, MIN_WELL_FORMED_CHARS
            );
            println!(
                "Words:            {} (minimum {})",
                report.words, MIN_WELL_FORMED_WORDS
            );
            println!("Well-formed:      {}", yes_no(report.well_formed));
            if !report.well_formed {
                println!("  Hint: use a complete sentence ending in '.', '?' or '!'");
            }

            if let Some(preserved) = report.intent_preserved {
                println!();
                println!(
                    "Word overlap:     {:.0}% (threshold {:.0}%)",
                    report.overlap_ratio.unwrap_or(0.0) * 100.0,
                    INTENT_THRESHOLD * 100.0
                );
                println!("Intent preserved: {}", yes_no(preserved));
            }
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
