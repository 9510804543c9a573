use altre_flash::logging::{self, Logger};
use altre_flash::{FlashConfig, TuiApplication};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

const USAGE: &str = "usage: altre-flash [--config PATH] [--debug-log PATH] [FILE]";

const SAMPLE_TEXT: &str = "\
flash jumps to any visible match.
type f, then a few characters of the target,
then press the label shown over the match you want.
press Enter to jump to the next match after the cursor,
or F to toggle several cursors at once.";

#[derive(Debug, Default)]
struct RunOptions {
    config: Option<PathBuf>,
    debug_log: Option<PathBuf>,
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    if let Some(path) = &options.debug_log {
        logging::init(Logger::for_development().without_stderr().with_file_output(path.clone()));
    }

    let config = match &options.config {
        Some(path) => FlashConfig::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FlashConfig::load().context("failed to load config")?,
    };

    let text = match &options.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => SAMPLE_TEXT.to_string(),
    };

    let mut app = TuiApplication::new(config, &text);
    app.run()
}

fn parse_args(args: &[String]) -> Result<RunOptions> {
    let mut options = RunOptions::default();

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let Some(next) = iter.next_if(|next| !next.starts_with('-')) else {
                    bail!("--config requires a path\n{}", USAGE);
                };
                options.config = Some(PathBuf::from(next));
            }
            "--debug-log" => {
                let path = iter
                    .next_if(|next| !next.starts_with('-'))
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("flash-debug.log"));
                options.debug_log = Some(path);
            }
            other if !other.starts_with('-') => options.file = Some(PathBuf::from(other)),
            _ => {}
        }
    }

    Ok(options)
}
