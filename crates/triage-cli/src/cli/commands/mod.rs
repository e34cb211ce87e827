pub mod demo;
pub mod serve;

use anyhow::Result;

use super::args::{Cli, Command};
use triage_core::{prompt, tools};

pub fn dispatch(cli: Cli) -> Result<i32> {
    match cli.cmd {
        Command::Serve(args) => serve::run(args),
        Command::Demo(args) => demo::run(args),
        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(&tools::definitions())?);
            Ok(0)
        }
        Command::Prompt => {
            println!(
                "{}",
                prompt::render(prompt::DEFAULT_SYSTEM_PROMPT, &tools::definitions())
            );
            Ok(0)
        }
    }
}
