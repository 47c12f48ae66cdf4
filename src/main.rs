use anyhow::Result;
use clap::Parser;

use bert_qna::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bert_qna=info".parse()?),
        )
        .init();

    Cli::parse().run().await
}
