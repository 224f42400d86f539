use anyhow::{Context, Result, bail};
use clap::Parser;
use freecell_common::{
    board::{Board, TOTAL_COLUMNS, TOTAL_FOUNDATIONS, TOTAL_FREECELLS},
    step::{Location, apply_step, describe_step, format_steps},
};
use freecell_planner::{PlanRequest, plan, plan_foundation_sweep};

use std::{
    io::{IsTerminal, Read, stdin},
    path::PathBuf,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Number of cards to move as one unit
    #[arg(short, long, default_value_t = 1, value_name = "NUM")]
    num: usize,
    /// Source pile: t1-t8, c1-c4 or f1-f4 (f1=♣ f2=♦ f3=♠ f4=♥)
    #[arg(short, long, value_name = "PILE")]
    from: Option<String>,
    /// Destination pile, same names as --from
    #[arg(short, long, value_name = "PILE")]
    to: Option<String>,
    /// Send every safe card to the foundations instead of moving
    #[arg(long)]
    sweep: bool,
    /// Whether empty columns accept only Kings (overrides the board file)
    #[arg(short, long, value_name = "BOOL")]
    kings_only: Option<bool>,
    /// Preview the parsed board without planning
    #[arg(short, long)]
    preview: bool,
    /// Replay the plan step by step, printing each card moved
    #[arg(long)]
    trace: bool,
    /// Path to a board file to plan against
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let Cli {
        num,
        from,
        to,
        sweep,
        kings_only,
        preview,
        trace,
        file,
    } = Cli::parse();

    let mut board = if let Some(file) = file {
        let content = std::fs::read_to_string(file)?;
        Board::parse(&content).context("Failed to parse board")?
    } else if !stdin().is_terminal() {
        let mut content = String::new();
        stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        Board::parse(&content).context("Failed to parse board")?
    } else {
        bail!("No board `file` provided.");
    };
    if let Some(kings_only) = kings_only {
        board.set_kings_only_on_empty(kings_only);
    }
    if preview {
        println!("{}", board.to_pretty_string());
        return Ok(());
    }
    if !board.is_valid() {
        bail!("Invalid board state.");
    }

    let built = if sweep {
        plan_foundation_sweep(&board)
    } else {
        let (Some(from), Some(to)) = (from.as_deref(), to.as_deref()) else {
            bail!("Provide `--from` and `--to`, or `--sweep`.");
        };
        let request = PlanRequest::new(num, parse_location(from)?, parse_location(to)?);
        plan(&board, &request)?
    };

    if built.steps.is_empty() {
        println!("Nothing to move.");
        return Ok(());
    }
    print!("{}", format_steps(&built.steps));

    if trace {
        let mut board = board;
        for (i, step) in built.steps.iter().enumerate() {
            println!(
                "{:03}/{:03} {}",
                i + 1,
                built.steps.len(),
                describe_step(&board, step)
            );
            apply_step(&mut board, step);
        }
        println!("{}", board.to_pretty_string());
    }

    Ok(())
}

/// Parses a pile name like `t5`, `c2` or `f4` into a location. Numbers are
/// one-based, matching the plan output codes.
fn parse_location(value: &str) -> Result<Location> {
    let value = value.trim();
    let mut chars = value.chars();
    let location = match chars.next().map(|ch| ch.to_ascii_lowercase()) {
        Some('t') => Location::Tableau(parse_index(chars.as_str(), TOTAL_COLUMNS)?),
        Some('c') => Location::Freecell(parse_index(chars.as_str(), TOTAL_FREECELLS)?),
        Some('f') => Location::Foundation(parse_index(chars.as_str(), TOTAL_FOUNDATIONS)?),
        _ => bail!("Unknown pile `{value}`; use t<N>, c<N> or f<N>."),
    };
    Ok(location)
}

fn parse_index(value: &str, total: usize) -> Result<usize> {
    value
        .parse::<usize>()
        .ok()
        .and_then(|idx| idx.checked_sub(1))
        .filter(|&idx| idx < total)
        .with_context(|| format!("Pile number `{value}` is out of range."))
}
