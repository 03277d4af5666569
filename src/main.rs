use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use life_screens::{
    config::Params,
    run::{self, StopReason},
    screen::{self, Backend, Rect},
    shapes::{Shape, ShapeLibrary},
};

/// Conway's Game of Life in the terminal or an SDL window.
#[derive(Debug, Parser)]
#[command(name = "life", version)]
struct Cli {
    #[arg(short, long, value_enum, default_value_t = Backend::Text)]
    backend: Backend,

    /// JSON shape library to seed from
    #[arg(long, value_name = "FILE")]
    shapes: Option<PathBuf>,

    /// Shape to place in the middle of the grid; asked for when omitted
    #[arg(long, requires = "shapes")]
    shape: Option<String>,

    /// Print the shapes in the library and exit
    #[arg(long, requires = "shapes")]
    list_shapes: bool,

    /// More logging, repeatable. Logs go to stderr, which the text screen
    /// shares, so redirect it (`2>life.log`) when using -vv or more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Parameter overrides, e.g. width=1024 cellSize=8 generations=500
    #[arg(value_name = "KEY=VALUE")]
    params: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (params, merged) = Params::from_args(&cli.params).context("bad parameters")?;
    info!("simulation parameters:\n{}", serde_json::to_string_pretty(&merged)?);

    let shape = match &cli.shapes {
        Some(path) => {
            let lib = ShapeLibrary::load(path)
                .with_context(|| format!("loading shapes from {}", path.display()))?;
            if cli.list_shapes {
                for name in lib.names() {
                    println!("{name}");
                }
                return Ok(());
            }
            Some(choose_shape(&lib, cli.shape.as_deref())?)
        }
        None => None,
    };

    let terminal = match cli.backend {
        Backend::Text => {
            let size = Rect::term_size().context("text screen needs a terminal")?;
            info!(rows = size.h(), columns = size.w(), "terminal size");
            Some(size)
        }
        Backend::Sdl => None,
    };
    let (rows, cols) = run::grid_dimensions(&params, cli.backend, terminal)?;
    let mut life = run::seed_automaton(&params, rows, cols, shape.as_ref())
        .with_context(|| format!("building a {rows}x{cols} grid"))?;

    let summary = {
        let mut screen = screen::open(cli.backend, &params)
            .with_context(|| format!("opening the {} screen", cli.backend.name()))?;
        run::simulate(&mut screen, &mut life, &params)?
    };

    let why = match summary.reason {
        StopReason::Finished => "generation limit reached",
        StopReason::Quit => "stopped by user",
        StopReason::Stable => "field is stable",
    };
    println!(
        "{why}: {} generations, {} live cells",
        summary.generations, summary.population
    );
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn choose_shape(lib: &ShapeLibrary, name: Option<&str>) -> anyhow::Result<Shape> {
    if let Some(name) = name {
        return Ok(lib.get(name)?);
    }

    println!("Available shapes:");
    for name in lib.names() {
        println!(" - {name}");
    }
    println!("\nTotal shapes loaded: {}", lib.len());
    print!("Enter shape name: ");
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin().lock().read_line(&mut choice)?;
    let choice = choice.trim();
    if choice.is_empty() {
        bail!("no shape chosen");
    }
    Ok(lib.get(choice)?)
}
