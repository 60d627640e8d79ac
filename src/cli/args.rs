use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "record_pipeline")]
#[command(about = "Filter and rank records through a bounded concurrent pipeline")]
#[command(version)]
pub struct Cli {
    /// Input file with one `id,amount,name` record per line
    #[arg(default_value = "Employees.txt")]
    pub input: PathBuf,

    /// Output file for the ranked report
    #[arg(default_value = "Results.txt")]
    pub output: PathBuf,

    /// JSON configuration file (worker_count, buffer_capacity, ...)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}
