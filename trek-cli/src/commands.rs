//! Textual travel intents and the session that applies them.

use std::io::{BufRead, Write};
use std::num::NonZeroU32;
use std::str::FromStr;

use anyhow::Result;
use colored::Colorize;
use thiserror::Error;
use trek_game::{
    LogEntry, SaveOutcome, SaveRoller, TravelError, TravelPace, TravelSimulator, UnknownPace,
    numbers::format_amount,
};

pub const HELP_TEXT: &str = "\
Commands:
  configure <miles>   set the destination distance (before setting out)
  pace <fast|normal|slow>
  travel [hours]      travel at the current pace (default 1 hour)
  day                 travel a normal day, or until arrival
  rest                take a long rest and start the next day
  reset [miles]       start a new journey (defaults to the current destination)
  save <total>        resolve the pending CON save with a rolled total
  status              show the journey so far
  log                 show the adventure log
  help                show this help
  quit                stop and write the report";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Configure(NonZeroU32),
    Pace(TravelPace),
    Travel(f64),
    Day,
    Rest,
    Reset(Option<NonZeroU32>),
    Save(i32),
    Status,
    Log,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid {what} `{value}`")]
    InvalidArgument { what: &'static str, value: String },
    #[error(transparent)]
    Pace(#[from] UnknownPace),
}

fn parse_miles(value: &str) -> Result<NonZeroU32, CommandError> {
    value
        .parse::<NonZeroU32>()
        .map_err(|_| CommandError::InvalidArgument {
            what: "distance",
            value: value.to_string(),
        })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next();
        match (verb.as_str(), arg) {
            ("configure" | "distance", Some(value)) => parse_miles(value).map(Self::Configure),
            ("configure" | "distance", None) => Err(CommandError::MissingArgument {
                command: "configure",
                expected: "a distance in miles",
            }),
            ("pace", Some(value)) => Ok(Self::Pace(value.parse()?)),
            ("pace", None) => Err(CommandError::MissingArgument {
                command: "pace",
                expected: "fast, normal or slow",
            }),
            ("travel" | "t", None) => Ok(Self::Travel(1.0)),
            ("travel" | "t", Some(value)) => value
                .parse::<f64>()
                .map(Self::Travel)
                .map_err(|_| CommandError::InvalidArgument {
                    what: "hours",
                    value: value.to_string(),
                }),
            ("day", _) => Ok(Self::Day),
            ("rest", _) => Ok(Self::Rest),
            ("reset", None) => Ok(Self::Reset(None)),
            ("reset", Some(value)) => parse_miles(value).map(|miles| Self::Reset(Some(miles))),
            ("save", Some(value)) => value
                .parse::<i32>()
                .map(Self::Save)
                .map_err(|_| CommandError::InvalidArgument {
                    what: "save total",
                    value: value.to_string(),
                }),
            ("save", None) => Err(CommandError::MissingArgument {
                command: "save",
                expected: "the rolled save total",
            }),
            ("status", _) => Ok(Self::Status),
            ("log", _) => Ok(Self::Log),
            ("help" | "?", _) => Ok(Self::Help),
            ("quit" | "exit" | "q", _) => Ok(Self::Quit),
            (other, _) => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Split a `--script` argument into individual command lines.
pub fn split_script(script: &str) -> Vec<String> {
    script
        .split([';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive journey: the simulator plus an optional save roller.
#[derive(Debug)]
pub struct Session {
    sim: TravelSimulator,
    roller: Option<SaveRoller>,
    saves: Vec<SaveOutcome>,
    /// Destination a bare `reset` starts over toward.
    destination: NonZeroU32,
}

impl Session {
    #[must_use]
    pub fn new(distance: NonZeroU32, pace: TravelPace, roller: Option<SaveRoller>) -> Self {
        let mut sim = TravelSimulator::new(distance);
        sim.set_pace(pace);
        Self {
            sim,
            roller,
            saves: Vec::new(),
            destination: distance,
        }
    }

    #[must_use]
    pub const fn simulator(&self) -> &TravelSimulator {
        &self.sim
    }

    /// Saves resolved since the journey last reset.
    #[must_use]
    pub fn saves(&self) -> &[SaveOutcome] {
        &self.saves
    }

    /// Parse and apply one command line. Parse errors and rejected intents
    /// are reported on `feed` and never end the session.
    pub fn execute_line(&mut self, line: &str, feed: &mut dyn Write) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }
        match line.parse::<Command>() {
            Ok(command) => self.execute(command, feed),
            Err(err) => {
                log::warn!("skipping `{line}`: {err}");
                writeln!(feed, "{} {err}", "⚠".yellow())?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: Command, feed: &mut dyn Write) -> Result<Flow> {
        match command {
            Command::Configure(miles) => match self.sim.configure(miles) {
                Ok(()) => {
                    self.destination = miles;
                    writeln!(feed, "Destination set to {miles} miles.")?;
                }
                Err(err) => warn(feed, &err)?,
            },
            Command::Pace(pace) => {
                self.sim.set_pace(pace);
                let profile = pace.profile();
                writeln!(
                    feed,
                    "Pace: {pace} ({} mph, {} mi/day). Effect: {}",
                    format_amount(profile.speed_mph),
                    format_amount(profile.daily_miles),
                    profile.effect
                )?;
            }
            Command::Travel(hours) => {
                let result = self.sim.advance(hours).cloned();
                self.after_travel(result, feed)?;
            }
            Command::Day => {
                let result = self.sim.advance_full_day().cloned();
                self.after_travel(result, feed)?;
            }
            Command::Rest => {
                let entry = self.sim.rest().clone();
                write_entry(feed, &entry)?;
            }
            Command::Reset(miles) => {
                let miles = miles.unwrap_or(self.destination);
                self.destination = miles;
                self.sim.reset(miles);
                self.saves.clear();
                writeln!(feed, "New journey: {miles} miles at Normal pace.")?;
            }
            Command::Save(total) => self.resolve_save(total, feed)?,
            Command::Status => write_status(feed, &self.sim)?,
            Command::Log => {
                let log = self.sim.journey().log();
                if log.is_empty() {
                    writeln!(feed, "The journey begins with a single step...")?;
                }
                for entry in log {
                    write_entry(feed, entry)?;
                }
            }
            Command::Help => writeln!(feed, "{HELP_TEXT}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Run every line from `reader` until EOF or `quit`.
    pub fn run_lines<R: BufRead>(
        &mut self,
        reader: R,
        feed: &mut dyn Write,
        prompt: bool,
    ) -> Result<()> {
        if prompt {
            write!(feed, "> ")?;
            feed.flush()?;
        }
        for line in reader.lines() {
            if self.execute_line(&line?, feed)? == Flow::Quit {
                break;
            }
            if prompt {
                write!(feed, "> ")?;
                feed.flush()?;
            }
        }
        Ok(())
    }

    /// Run the commands of a `--script` argument.
    pub fn run_script(&mut self, script: &str, feed: &mut dyn Write) -> Result<()> {
        for line in split_script(script) {
            if self.execute_line(&line, feed)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn after_travel(
        &mut self,
        result: Result<LogEntry, TravelError>,
        feed: &mut dyn Write,
    ) -> Result<()> {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => return warn(feed, &err),
        };
        write_entry(feed, &entry)?;
        if self.sim.journey().is_finished() {
            writeln!(
                feed,
                "{} You have reached your destination.",
                "Arrival!".green().bold()
            )?;
        }
        if entry.is_forced_march {
            if let Some(roller) = self.roller.as_mut() {
                let (die, total) = roller.roll();
                writeln!(
                    feed,
                    "Rolled d20 {die} {:+} = {total}",
                    roller.modifier()
                )?;
                self.resolve_save(total, feed)?;
            }
        }
        Ok(())
    }

    fn resolve_save(&mut self, total: i32, feed: &mut dyn Write) -> Result<()> {
        match self.sim.resolve_con_save(total) {
            Ok(outcome) => {
                if outcome.passed {
                    writeln!(
                        feed,
                        "{} CON save {} vs DC {}.",
                        "Passed".green(),
                        outcome.total,
                        format_amount(outcome.dc)
                    )?;
                } else {
                    writeln!(
                        feed,
                        "{} CON save {} vs DC {}. Exhaustion level {}.",
                        "Failed".red(),
                        outcome.total,
                        format_amount(outcome.dc),
                        outcome.exhaustion_level
                    )?;
                }
                self.saves.push(outcome);
                Ok(())
            }
            Err(err) => warn(feed, &err),
        }
    }
}

fn warn(feed: &mut dyn Write, err: &TravelError) -> Result<()> {
    writeln!(feed, "{} {err}", "⚠".yellow())?;
    Ok(())
}

pub fn entry_heading(entry: &LogEntry) -> String {
    format!(
        "Day {}, Hour {}",
        entry.day,
        format_amount(entry.hour_of_day)
    )
}

pub fn write_entry(feed: &mut dyn Write, entry: &LogEntry) -> Result<()> {
    let heading = entry_heading(entry);
    if entry.is_rest() {
        writeln!(feed, "{} {}", heading.blue().bold(), entry.description)?;
    } else if entry.is_forced_march {
        writeln!(feed, "{} {}", heading.red().bold(), entry.description.red())?;
    } else {
        writeln!(feed, "{} {}", heading.bold(), entry.description)?;
    }
    Ok(())
}

pub fn write_status(feed: &mut dyn Write, sim: &TravelSimulator) -> Result<()> {
    let journey = sim.journey();
    let profile = journey.pace_profile();
    writeln!(
        feed,
        "Day {} | Hour {} | {}/{} miles ({:.0}%) | {} pace, {} mph | safe hours left {} | exhaustion {}",
        journey.current_day(),
        format_amount(journey.hours_traveled_today()),
        format_amount(journey.traveled_distance_miles()),
        format_amount(journey.total_distance_miles()),
        journey.progress_percent(),
        journey.pace(),
        format_amount(profile.speed_mph),
        format_amount(journey.safe_hours_remaining()),
        journey.exhaustion_level()
    )?;
    if journey.is_finished() {
        writeln!(feed, "{}", "Arrived at the destination.".green())?;
    } else if journey.next_hour_is_forced() {
        writeln!(feed, "{}", "Next hour is a forced march (+1 hr).".red())?;
    }
    Ok(())
}
