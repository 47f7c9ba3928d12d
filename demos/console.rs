//! Interactive console, or script runner.
//!
//! Run with: `cargo run --example console`
//! Replay a script: `cargo run --example console -- --script model.pas`

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use log::LevelFilter;

use pas_rs::console::Console;
use pas_rs::progress::LogObserver;

#[derive(Parser, Debug)]
#[command(name = "console")]
#[command(about = "Probabilistic argumentation console")]
struct Args {
    /// Script to run instead of reading standard input
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Separator of create-command parameters
    #[arg(long, default_value_t = ',')]
    separator: char,

    /// Log progress of every query
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    simplelog::TermLogger::init(
        if args.verbose { LevelFilter::Info } else { LevelFilter::Warn },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut console = Console::new().with_separator(args.separator);
    if args.verbose {
        console = console.with_observer(Rc::new(LogObserver::new()));
    }

    match args.script {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            for (i, line) in text.lines().enumerate() {
                match console.execute(line) {
                    Ok(Some(output)) => println!("{}", output),
                    Ok(None) => {}
                    Err(e) => {
                        return Err(color_eyre::eyre::eyre!("{}:{}: {}", path.display(), i + 1, e));
                    }
                }
            }
        }
        None => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            print!("> ");
            stdout.flush()?;
            for line in stdin.lock().lines() {
                let line = line?;
                match console.execute(&line) {
                    Ok(Some(output)) => println!("{}", output),
                    Ok(None) => {}
                    Err(e) => eprintln!("error: {}", e),
                }
                print!("> ");
                stdout.flush()?;
            }
            println!();
        }
    }

    Ok(())
}
