use std::fs;

use anyhow::Context;
use clap::Parser;

use scoreflow::cli::{Cli, Command};
use scoreflow::config::ScoreflowConfig;
use scoreflow::pipeline::Pipeline;
use scoreflow::report;
use scoreflow::ui::FetchProgress;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ScoreflowConfig::load()?;
    if cli.limit.is_some() {
        config.source.limit = cli.limit;
    }
    if cli.skip_failed {
        config.source.skip_failed = true;
    }

    match cli.command {
        Command::Build { output } => {
            let progress = FetchProgress::start("fetching roster");
            let pipeline = Pipeline::new(config);
            match pipeline.build(output.as_deref(), Some(&progress)).await {
                Ok(summary) => {
                    progress.complete(
                        true,
                        &format!("Report written to {}", summary.output.display()),
                    );
                    if cli.verbose {
                        progress.print_summary(&summary);
                    }
                }
                Err(err) => {
                    progress.complete(false, "Build failed");
                    return Err(err.into());
                }
            }
        }
        Command::Edges { format, output } => {
            let progress = FetchProgress::start("fetching roster");
            let pipeline = Pipeline::new(config);
            match pipeline.edge_table(Some(&progress)).await {
                Ok(edges) => {
                    progress.done();
                    let table = report::edges_table(&edges, format.separator());
                    match output {
                        Some(path) => {
                            fs::write(&path, table).with_context(|| {
                                format!("failed to write edge table to {}", path.display())
                            })?;
                            progress.complete(
                                true,
                                &format!("Edge table written to {}", path.display()),
                            );
                        }
                        None => print!("{table}"),
                    }
                }
                Err(err) => {
                    progress.complete(false, "Collection failed");
                    return Err(err.into());
                }
            }
        }
        Command::Demo { output } => {
            let pipeline = Pipeline::new(config);
            let (edges, summary) = pipeline.demo(output.as_deref()).await?;
            print!("{}", report::edges_table(&edges, ','));
            let progress = FetchProgress::hidden();
            progress.complete(
                true,
                &format!("Demo report written to {}", summary.output.display()),
            );
            if cli.verbose {
                progress.print_summary(&summary);
            }
        }
    }

    Ok(())
}
