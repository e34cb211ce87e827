use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "triage",
    version,
    about = "Simulated on-call incident sessions for agent evaluation — budgeted diagnostic tools, deterministic rewards"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Host a session registry over line-delimited JSON on stdin/stdout
    Serve(ServeArgs),
    /// Run one scripted diagnosis session and print the transcript
    Demo(DemoArgs),
    /// Print the tool catalog as JSON
    Tools,
    /// Print the rendered default system prompt
    Prompt,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Optional YAML file overriding environment defaults
    #[arg(long, env = "TRIAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Back each session with a SQLite file in this directory instead of
    /// keeping log tables in memory
    #[arg(long)]
    pub db_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DemoArgs {
    /// Session key to use (default: generated)
    #[arg(long)]
    pub session_key: Option<String>,

    /// Diagnosis submitted at the end of the scripted run
    #[arg(long, default_value = "database connection pool exhausted")]
    pub diagnosis: String,
}
