mod commands;
mod reports;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write, stdout};
use std::num::NonZeroU32;
use std::path::PathBuf;

use commands::{HELP_TEXT, Session};
use reports::TrekReport;
use trek_game::{SaveRoller, TravelPace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary and adventure log
    Console,
    /// Full journey snapshot as JSON
    Json,
    /// Summary and log table as Markdown
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "trek", version)]
#[command(about = "Traveler's Trek - D&D 5e travel distance and forced march tracker")]
struct Args {
    /// Distance to the destination in miles
    #[arg(long, default_value = "100")]
    distance: NonZeroU32,

    /// Starting pace: fast, normal or slow
    #[arg(long, default_value = "normal")]
    pace: TravelPace,

    /// Commands to run instead of reading stdin, separated by `;`
    #[arg(long)]
    script: Option<String>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Roll a CON save automatically after every forced-march entry
    #[arg(long)]
    roll_saves: bool,

    /// CON save modifier used by --roll-saves
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    con_mod: i32,

    /// Seed for --roll-saves
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut session = build_session(&args);
    let mut feed = io::stderr();

    if let Some(script) = args.script.as_deref() {
        session.run_script(script, &mut feed)?;
    } else {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        if interactive {
            announce_banner(&mut feed)?;
        }
        session.run_lines(stdin.lock(), &mut feed, interactive)?;
    }

    write_report(&args, &session)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    env_logger::Builder::from_env(env).init();
}

fn build_session(args: &Args) -> Session {
    let roller = args
        .roll_saves
        .then(|| SaveRoller::from_user_seed(args.seed, args.con_mod));
    Session::new(args.distance, args.pace, roller)
}

fn announce_banner(feed: &mut dyn Write) -> Result<()> {
    writeln!(feed, "{}", "🧭 Traveler's Trek".bright_cyan().bold())?;
    writeln!(feed, "{}", "==================".cyan())?;
    writeln!(feed, "{HELP_TEXT}")?;
    Ok(())
}

fn write_report(args: &Args, session: &Session) -> Result<()> {
    let report = TrekReport::new(session.simulator().snapshot(), session.saves());
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, &report)?,
        ReportFormat::Markdown => {
            reports::generate_markdown_report(&mut output_target, &report)?;
        }
        ReportFormat::Console => reports::generate_console_report(&mut output_target, &report)?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
