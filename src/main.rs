use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use preflop_trainer::grid::RangeGrid;
use preflop_trainer::hands::enumerate_hands;
use preflop_trainer::range::{RangeSummary, expand_with_order};
use preflop_trainer::scenario::{ChartBook, Facing, Position, Scenario, TableType};
use preflop_trainer::web;
use preflop_trainer::{Trainer, TrainerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "preflop-trainer",
    version,
    about = "Preflop range trainer and range notation expander",
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Trainer configuration file (JSON); replaces the flags below
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of hands to drill
    #[arg(long, default_value_t = 10)]
    hands: u32,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Hero position
    #[arg(long, default_value = "btn")]
    position: PositionArg,

    /// Effective stack depth in big blinds
    #[arg(long = "stack", default_value_t = 100)]
    stack_depth_bb: u32,

    /// Table format
    #[arg(long, default_value = "six-max")]
    table: TableArg,

    /// Action the hero is facing
    #[arg(long, default_value = "unopened")]
    facing: FacingArg,

    /// Chart book to use instead of the built-in charts
    #[arg(long, global = true)]
    chart: Option<PathBuf>,

    /// Disable ANSI colors in CLI output
    #[arg(long = "no-color", default_value_t = false)]
    no_color: bool,

    /// Answer every hand with the charted action (useful for smoke tests)
    #[arg(long, default_value_t = false)]
    auto: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        /// Address to bind (HOST:PORT)
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
    /// Expand a JSON range summary into the full 169-hand table
    Expand {
        /// Summary file, or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Print the 13x13 grid with per-action counts instead of the table
        #[arg(long, default_value_t = false)]
        grid: bool,
    },
    /// List the 169 canonical starting hands
    Hands,
}

#[derive(Debug, Clone, ValueEnum)]
enum PositionArg {
    Utg,
    Mp,
    Co,
    Btn,
    Sb,
    Bb,
}

impl From<PositionArg> for Position {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::Utg => Position::Utg,
            PositionArg::Mp => Position::Mp,
            PositionArg::Co => Position::Co,
            PositionArg::Btn => Position::Btn,
            PositionArg::Sb => Position::Sb,
            PositionArg::Bb => Position::Bb,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum TableArg {
    HeadsUp,
    SixMax,
    FullRing,
}

impl From<TableArg> for TableType {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::HeadsUp => TableType::HeadsUp,
            TableArg::SixMax => TableType::SixMax,
            TableArg::FullRing => TableType::FullRing,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum FacingArg {
    Unopened,
    Limp,
    Raise,
    ThreeBet,
}

impl From<FacingArg> for Facing {
    fn from(arg: FacingArg) -> Self {
        match arg {
            FacingArg::Unopened => Facing::Unopened,
            FacingArg::Limp => Facing::Limp,
            FacingArg::Raise => Facing::Raise,
            FacingArg::ThreeBet => Facing::ThreeBet,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = color_eyre::install();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { ref addr }) => run_server(addr, &cli).await?,
        Some(Commands::Expand { ref input, grid }) => run_expand(input, grid, &cli)?,
        Some(Commands::Hands) => run_hands(),
        None => run_cli(&cli)?,
    }

    Ok(())
}

fn trainer_config(cli: &Cli) -> Result<TrainerConfig> {
    if let Some(path) = &cli.config {
        let mut config = TrainerConfig::from_path(path)?;
        config.no_color |= cli.no_color;
        return Ok(config);
    }
    Ok(TrainerConfig {
        hands: cli.hands,
        seed: cli.seed,
        scenario: Scenario {
            position: cli.position.clone().into(),
            stack_depth_bb: cli.stack_depth_bb,
            table: cli.table.clone().into(),
            facing: cli.facing.clone().into(),
        },
        chart: cli.chart.clone(),
        no_color: cli.no_color,
        ..TrainerConfig::default()
    })
}

fn run_cli(cli: &Cli) -> Result<()> {
    let mut trainer = Trainer::new(trainer_config(cli)?)?;
    if cli.auto {
        let summary = trainer.autoplay()?;
        trainer.print_summary(&summary);
        Ok(())
    } else {
        trainer.run()
    }
}

fn run_expand(input: &str, grid: bool, cli: &Cli) -> Result<()> {
    let json = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))?
    };
    let summary: RangeSummary = serde_json::from_str(&json).context("parsing range summary")?;
    let order = trainer_config(cli)?.action_order;
    let table = expand_with_order(&summary, &order)?;

    if grid {
        let grid = RangeGrid::from_table(&table);
        for row in &grid.rows {
            let line = row
                .iter()
                .map(|cell| format!("{:<4}{:<7}", cell.label.to_string(), cell.action.to_string()))
                .collect::<String>();
            println!("{}", line.trim_end());
        }
        for share in grid.breakdown() {
            println!(
                "{}: {} hands, {} combos ({:.1}%)",
                share.action,
                share.hands,
                share.combos,
                share.combo_share * 100.0
            );
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&table)?);
    }
    Ok(())
}

fn run_hands() {
    for (label, class) in enumerate_hands() {
        println!("{label}\t{}", serde_json::json!(class).as_str().unwrap_or_default());
    }
}

async fn run_server(addr: &str, cli: &Cli) -> Result<()> {
    let addr: SocketAddr = addr.parse()?;
    let charts = match &cli.chart {
        Some(path) => ChartBook::from_path(path)?,
        None => ChartBook::builtin()?,
    };
    web::serve(addr, charts).await
}
