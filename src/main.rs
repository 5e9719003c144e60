use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{LevelFilter, info};

use md2html::Config;

#[derive(Parser)]
#[command(name = "md2html")]
#[command(about = "Convert Markdown files to HTML")]
struct Cli {
    /// Input Markdown file (`-` for stdin)
    input: PathBuf,

    /// Output HTML file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to md2html.toml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wrap the output in a full HTML page
    #[arg(long)]
    standalone: bool,

    /// Log each step of the conversion
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = Config::resolve(cli.config.as_deref(), Path::new("."))
        .map_err(|e| e.to_string())?;
    if cli.standalone {
        config.output.standalone = true;
    }

    info!("Reading {}", cli.input.display());
    let markdown = read_input(&cli.input)
        .map_err(|e| format!("reading {}: {}", cli.input.display(), e))?;

    let body = md2html::markdown_to_html(&markdown).map_err(|e| e.to_string())?;
    let html = config.wrap(&body);

    match cli.output.filter(|path| path.as_os_str() != "-") {
        Some(output) => {
            info!("Writing {}", output.display());
            fs::write(&output, html).map_err(|e| format!("writing {}: {}", output.display(), e))
        }
        None => io::stdout()
            .write_all(html.as_bytes())
            .map_err(|e| format!("writing stdout: {}", e)),
    }
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut markdown = String::new();
        io::stdin().read_to_string(&mut markdown)?;
        Ok(markdown)
    } else {
        fs::read_to_string(path)
    }
}
