use std::io::Write;

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;
use trek_game::numbers::{format_amount, round_f64_to_usize, usize_to_f64};
use trek_game::{
    FORCED_MARCH_BASE_DC, FORCED_MARCH_DC_INC, JourneyPhase, JourneySnapshot, MAX_TRAVEL_HOURS,
    PaceProfile, PacingConfig, SaveOutcome,
};

use crate::commands::entry_heading;

const BAR_WIDTH: usize = 40;

/// Rule constants shipped alongside the journey for display.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSummary {
    pub max_travel_hours: f64,
    pub forced_march_base_dc: f64,
    pub forced_march_dc_inc: f64,
    pub paces: Vec<PaceProfile>,
}

impl RuleSummary {
    #[must_use]
    pub fn current() -> Self {
        Self {
            max_travel_hours: MAX_TRAVEL_HOURS,
            forced_march_base_dc: FORCED_MARCH_BASE_DC,
            forced_march_dc_inc: FORCED_MARCH_DC_INC,
            paces: PacingConfig::shared().profiles(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrekReport {
    pub generated_at: String,
    pub journey: JourneySnapshot,
    pub saves: Vec<SaveOutcome>,
    pub rules: RuleSummary,
}

impl TrekReport {
    #[must_use]
    pub fn new(journey: JourneySnapshot, saves: &[SaveOutcome]) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            journey,
            saves: saves.to_vec(),
            rules: RuleSummary::current(),
        }
    }
}

/// Text progress bar with quarter markers on the untraveled stretch.
#[must_use]
pub fn progress_bar(percent: f64, width: usize) -> String {
    let width = width.max(4);
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = round_f64_to_usize(usize_to_f64(width) * ratio);
    let quarters = [width / 4, width / 2, width * 3 / 4];
    (0..width)
        .map(|i| {
            if i < filled {
                '#'
            } else if quarters.contains(&i) {
                '|'
            } else {
                '-'
            }
        })
        .collect()
}

const fn phase_label(phase: JourneyPhase) -> &'static str {
    match phase {
        JourneyPhase::NotStarted => "Not started",
        JourneyPhase::Traveling => "Traveling",
        JourneyPhase::Finished => "Arrived",
    }
}

pub fn generate_console_report(writer: &mut dyn Write, report: &TrekReport) -> Result<()> {
    let snap = &report.journey;
    let journey = &snap.journey;
    writeln!(writer)?;
    writeln!(writer, "{}", "🧭 Traveler's Trek".bright_cyan().bold())?;
    writeln!(writer, "{}", "==================".cyan())?;
    writeln!(
        writer,
        "Start [{}] Destination  {:.0}%",
        progress_bar(snap.progress_percent, BAR_WIDTH),
        snap.progress_percent
    )?;
    writeln!(
        writer,
        "Traveled: {} of {} miles ({} remaining)",
        format_amount(journey.traveled_distance_miles()),
        format_amount(journey.total_distance_miles()),
        format_amount(snap.remaining_distance_miles.max(0.0))
    )?;
    writeln!(writer, "Status: {}", phase_label(snap.phase))?;
    writeln!(
        writer,
        "Day {}, Hour {} | Safe hours left: {}",
        journey.current_day(),
        format_amount(journey.hours_traveled_today()),
        format_amount(snap.safe_hours_remaining)
    )?;
    writeln!(
        writer,
        "Pace: {} ({} mph). Effect: {}",
        snap.pace_profile.pace,
        format_amount(snap.pace_profile.speed_mph),
        snap.pace_profile.effect
    )?;
    writeln!(writer, "Exhaustion: {}", journey.exhaustion_level())?;
    writeln!(writer)?;

    writeln!(writer, "{}", "📜 Adventure Log".bright_yellow().bold())?;
    writeln!(writer, "{}", "===============".yellow())?;
    if journey.log().is_empty() {
        writeln!(writer, "The journey begins with a single step...")?;
    }
    for entry in journey.log() {
        let heading = entry_heading(entry);
        if entry.is_rest() {
            writeln!(writer, "{} {}", heading.blue().bold(), entry.description)?;
        } else if let Some(dc) = entry.con_save_dc {
            writeln!(
                writer,
                "{} [{}] {}",
                heading.red().bold(),
                format!("CON Save DC {}", format_amount(dc)).red(),
                entry.description
            )?;
        } else {
            writeln!(writer, "{} {}", heading.bold(), entry.description)?;
        }
    }

    if !report.saves.is_empty() {
        writeln!(writer)?;
        let failed = report.saves.iter().filter(|s| !s.passed).count();
        writeln!(
            writer,
            "CON saves: {} rolled, {} passed, {} failed",
            report.saves.len(),
            (report.saves.len() - failed).to_string().green(),
            failed.to_string().red()
        )?;
    }
    Ok(())
}

pub fn generate_json_report(writer: &mut dyn Write, report: &TrekReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(writer: &mut dyn Write, report: &TrekReport) -> Result<()> {
    let snap = &report.journey;
    let journey = &snap.journey;
    writeln!(writer, "# Traveler's Trek Journey Report\n")?;
    writeln!(writer, "_Generated {}_\n", report.generated_at)?;

    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Status**: {}", phase_label(snap.phase))?;
    writeln!(
        writer,
        "- **Distance**: {} / {} miles ({:.1}%)",
        format_amount(journey.traveled_distance_miles()),
        format_amount(journey.total_distance_miles()),
        snap.progress_percent
    )?;
    writeln!(
        writer,
        "- **Day**: {} (hour {})",
        journey.current_day(),
        format_amount(journey.hours_traveled_today())
    )?;
    writeln!(
        writer,
        "- **Pace**: {} ({} mph, {} mi/day)",
        snap.pace_profile.pace,
        format_amount(snap.pace_profile.speed_mph),
        format_amount(snap.pace_profile.daily_miles)
    )?;
    writeln!(writer, "- **Exhaustion**: {}\n", journey.exhaustion_level())?;

    writeln!(writer, "## Adventure Log\n")?;
    if journey.log().is_empty() {
        writeln!(writer, "_No travel recorded._")?;
        return Ok(());
    }
    writeln!(writer, "| Day | Hour | Miles | DC | Event |")?;
    writeln!(writer, "| --- | --- | --- | --- | --- |")?;
    for entry in journey.log() {
        let dc = entry
            .con_save_dc
            .map_or_else(String::new, format_amount);
        writeln!(
            writer,
            "| {} | {} | {} | {dc} | {} |",
            entry.day,
            format_amount(entry.hour_of_day),
            format_amount(entry.distance_delta),
            entry.description
        )?;
    }
    Ok(())
}
