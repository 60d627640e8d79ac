use anyhow::Result;
use clap::Parser;
use record_pipeline::cli::{describe_error, execute_run, Cli, RunConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("record_pipeline=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let quiet = cli.quiet;

    if !quiet {
        println!("📂 入力ファイル: {}", cli.input.display());
        println!("📄 出力ファイル: {}", cli.output.display());
    }

    let config = RunConfig {
        input: cli.input,
        output: cli.output,
        config_file: cli.config,
        quiet,
    };

    match execute_run(config).await {
        Ok(summary) => {
            if !quiet {
                println!("📊 処理結果:");
                println!("   - 入力レコード数: {}", summary.input_records);
                println!("   - 出力レコード数: {}", summary.survivors);
                println!("   - 除外レコード数: {}", summary.dropped);
                println!("   - スキップ行数: {}", summary.skipped_lines);
                println!("   - ワーカー数: {}", summary.worker_count);
                println!("   - バッファ最大使用数: {}", summary.buffer_high_water_mark);
                println!("   - 総処理時間: {}ms", summary.total_processing_time_ms);
            }
        }
        Err(error) => {
            eprintln!("❌ エラー: {}", describe_error(&error));
            std::process::exit(1);
        }
    }

    Ok(())
}
