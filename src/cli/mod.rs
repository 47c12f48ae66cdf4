// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap. All
// business logic is delegated to Layer 2 — this layer only
// routes arguments and renders results.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;

use commands::{AskArgs, Commands};

use crate::application::answer_use_case::AnswerUseCase;
use crate::domain::answer::Prediction;

#[derive(Parser, Debug)]
#[command(
    name = "bert-qna",
    version,
    about = "Extract answer spans from a passage with a BERT-family model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Ask(args) => run_ask(args).await,
        }
    }
}

async fn run_ask(args: AskArgs) -> Result<()> {
    let passage = match (&args.passage, &args.passage_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read passage file '{}'", path.display()))?,
        (None, None) => anyhow::bail!("provide a passage with --passage or --passage-file"),
    };

    let use_case = AnswerUseCase::new(&args.model_config(), args.qna_config())?;
    let predictions = use_case
        .answer(&args.question, &passage, args.id.as_deref())
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&predictions)?);
        return Ok(());
    }

    if predictions.is_empty() {
        println!("No answer found.");
        return Ok(());
    }
    for (rank, prediction) in predictions.iter().enumerate() {
        match prediction {
            Prediction::Span(answer) => println!(
                "{}. {:<40} score {:.3}  [{}..{}]",
                rank + 1,
                answer.text,
                answer.score,
                answer.start_index,
                answer.end_index
            ),
            Prediction::NoAnswer { score } => {
                println!("{}. (no answer in window)          score {score:.3}", rank + 1)
            }
        }
    }
    Ok(())
}
