use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use importer::csv_standards::read_standards_file;
use importer::{
    Config, ImportValidator, SwimmingResultsClient, SwimmingResultsImporter, TimesSource,
};
use storage::{AppState, SnapshotStore, db};
use swim_core::dto::{
    CompetitionRequest, CreateSwimmerRequest, GapToTarget, MissingReason, TimeEntryRequest,
};
use swim_core::services::personal_best::{personal_bests, recent_swims, staleness};
use swim_core::services::qualification::{gap_to_target, missing_races, target_races};
use swim_core::services::reconcile::ImportMode;
use swim_core::services::time_codec::format_time;
use swim_core::{AgeGroup, Course, Distance, LinearCourseFactor, Sex, Stroke, Tier};

#[derive(Parser)]
#[command(name = "swimqt")]
#[command(about = "Swim qualifying-time tracker", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    Swimmer {
        #[command(subcommand)]
        command: SwimmerCommand,
    },
    Time {
        #[command(subcommand)]
        command: TimeCommand,
    },
    /// Import the current swimmer's history from the results site
    Import {
        /// Membership number, defaults to the swimmer's profile
        #[arg(long)]
        member: Option<String>,

        /// Replace existing swims of the same day, stroke and distance
        /// instead of skipping duplicates
        #[arg(long)]
        overwrite: bool,

        #[arg(long)]
        dry_run: bool,
    },
    Standards {
        #[command(subcommand)]
        command: StandardsCommand,
    },
    Competition {
        #[command(subcommand)]
        command: CompetitionCommand,
    },
    /// Qualification report for the current swimmer
    Report {
        /// Limit to one competition instead of all entered ones
        #[arg(long)]
        competition: Option<String>,

        /// Course personal bests are shown in
        #[arg(long, default_value = "SCM")]
        course: Course,

        #[arg(long, default_value_t = 10)]
        recent: usize,

        /// Print target races, missing races and staleness as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SwimmerCommand {
    Create {
        name: String,

        #[arg(long)]
        sex: Sex,

        #[arg(long)]
        date_of_birth: Option<NaiveDate>,

        #[arg(long)]
        member: Option<String>,
    },
    List,
    Select {
        id: String,
    },
    /// Forget the selected swimmer
    Logout,
}

#[derive(Subcommand)]
enum TimeCommand {
    Add {
        #[arg(long)]
        stroke: Stroke,

        #[arg(long)]
        distance: u16,

        #[arg(long)]
        course: Course,

        /// `ss.hh` or `m:ss.hh`
        #[arg(long)]
        time: String,

        #[arg(long)]
        date: NaiveDate,

        #[arg(long)]
        meet: Option<String>,

        #[arg(long)]
        official: bool,
    },
    Delete {
        id: uuid::Uuid,
    },
}

#[derive(Subcommand)]
enum StandardsCommand {
    Show {
        #[arg(long, default_value = "County")]
        tier: Tier,

        #[arg(long)]
        sex: Sex,

        #[arg(long)]
        age_group: AgeGroup,
    },
    Reset,
}

#[derive(Subcommand)]
enum CompetitionCommand {
    Add {
        name: String,

        #[arg(long)]
        qualifying_start: Option<NaiveDate>,

        #[arg(long)]
        qualifying_end: Option<NaiveDate>,

        #[arg(long)]
        age_at_date: Option<NaiveDate>,

        #[arg(long, default_value = "LCM")]
        course: Course,
    },
    List,
    Enter {
        id: String,
    },
    Withdraw {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Replace a competition's standards with a spreadsheet export
    ImportCsv {
        id: String,

        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "swimqt={},importer={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    let pool = db::connect(&config.database_url)
        .await
        .with_context(|| format!("Cannot open database {}", config.database_url))?;
    let store = SnapshotStore::new(&pool);
    let (mut state, migration) = store.load().await.context("Cannot load saved data")?;
    if !migration.is_empty() {
        tracing::info!("Upgraded saved data: {:?}", migration.applied);
    }

    let changed = match cli.command {
        Commands::Swimmer { command } => handle_swimmer(&mut state, command)?,
        Commands::Time { command } => handle_time(&mut state, command)?,
        Commands::Import {
            member,
            overwrite,
            dry_run,
        } => handle_import(&mut state, &config, member, overwrite, dry_run).await?,
        Commands::Standards { command } => handle_standards(&mut state, command)?,
        Commands::Competition { command } => handle_competition(&mut state, command)?,
        Commands::Report {
            competition,
            course,
            recent,
            json,
        } => {
            if json {
                print_report_json(&state, &config, competition.as_deref(), course)?;
            } else {
                handle_report(&state, &config, competition.as_deref(), course, recent)?;
            }
            false
        }
    };

    if changed {
        store.save(&state).await.context("Cannot save data")?;
    }

    Ok(())
}

fn handle_swimmer(state: &mut AppState, command: SwimmerCommand) -> Result<bool> {
    match command {
        SwimmerCommand::Create {
            name,
            sex,
            date_of_birth,
            member,
        } => {
            let swimmer = state.create_swimmer(CreateSwimmerRequest {
                name,
                sex,
                date_of_birth,
                member_number: member,
            })?;
            tracing::info!("✓ Created swimmer {} ({})", swimmer.name, swimmer.id);
            Ok(true)
        }
        SwimmerCommand::List => {
            let current = state.session_id();
            for swimmer in state.swimmers() {
                let marker = if current == Some(swimmer.id.as_str()) { "*" } else { " " };
                tracing::info!(
                    "{} {} {} ({}, {} times)",
                    marker,
                    swimmer.id,
                    swimmer.name,
                    swimmer.sex,
                    swimmer.times.len()
                );
            }
            Ok(false)
        }
        SwimmerCommand::Select { id } => {
            let swimmer = state.select_swimmer(&id)?;
            tracing::info!("Selected {}", swimmer.name);
            Ok(true)
        }
        SwimmerCommand::Logout => {
            state.clear_session();
            Ok(true)
        }
    }
}

fn handle_time(state: &mut AppState, command: TimeCommand) -> Result<bool> {
    match command {
        TimeCommand::Add {
            stroke,
            distance,
            course,
            time,
            date,
            meet,
            official,
        } => {
            let record = state.add_time(TimeEntryRequest {
                date,
                time,
                stroke,
                distance: Distance::try_from(distance)?,
                course,
                meet_name: meet,
                is_official: official,
                notes: None,
            })?;
            tracing::info!(
                "✓ Added {} {} {} ({})",
                record.event.key().label(),
                record.event.course,
                record.formatted_time,
                record.id
            );
            Ok(true)
        }
        TimeCommand::Delete { id } => {
            let record = state.delete_time(id)?;
            tracing::info!("Deleted {} on {}", record.formatted_time, record.date);
            Ok(true)
        }
    }
}

async fn handle_import(
    state: &mut AppState,
    config: &Config,
    member: Option<String>,
    overwrite: bool,
    dry_run: bool,
) -> Result<bool> {
    let swimmer = state
        .current_swimmer()
        .context("No swimmer selected, run `swimqt swimmer select <id>` first")?;
    let member = member
        .or_else(|| swimmer.member_number.clone())
        .context("No membership number given or stored in the profile")?;

    let client = SwimmingResultsClient::new(config.results_base_url.as_str())?;
    let source = SwimmingResultsImporter::new(client, config.import_batch_size);
    tracing::info!("Fetching times from {} for member {}", source.name(), member);
    let candidates = source.fetch_times(&member).await?;

    let validator = ImportValidator::new(Local::now().date_naive());
    let (records, report) = validator.screen(candidates);
    report.log_errors();
    report.log_warnings();
    tracing::info!(
        "{} swims ready to import ({} dropped, {} warnings)",
        records.len(),
        report.errors.len(),
        report.warnings.len()
    );

    if dry_run {
        return Ok(false);
    }

    let mode = if overwrite {
        ImportMode::Overwrite
    } else {
        ImportMode::Merge
    };
    let count = state.import_times(mode, &records)?;
    match mode {
        ImportMode::Merge => tracing::info!("✓ Added {} new swims", count),
        ImportMode::Overwrite => {
            tracing::info!("✓ Wrote {} swims, replacing same-day entries", count)
        }
    }
    Ok(true)
}

fn handle_standards(state: &mut AppState, command: StandardsCommand) -> Result<bool> {
    match command {
        StandardsCommand::Show {
            tier,
            sex,
            age_group,
        } => {
            let set = state.standards().tier(tier);
            tracing::info!("{} {} - {} {}", set.name, set.year, sex, age_group);
            for (event, time_ms) in set.times.events(sex, age_group) {
                tracing::info!("  {:<24} {}", event.label(), format_time(time_ms)?);
            }
            Ok(false)
        }
        StandardsCommand::Reset => {
            state.reset_standards();
            tracing::info!("✓ Standards reset to defaults");
            Ok(true)
        }
    }
}

fn handle_competition(state: &mut AppState, command: CompetitionCommand) -> Result<bool> {
    match command {
        CompetitionCommand::Add {
            name,
            qualifying_start,
            qualifying_end,
            age_at_date,
            course,
        } => {
            let competition = state.add_competition(CompetitionRequest {
                name,
                qualifying_start,
                qualifying_end,
                age_at_date,
                course,
                requirements: None,
            })?;
            tracing::info!("✓ Added competition {} ({})", competition.name, competition.id);
            Ok(true)
        }
        CompetitionCommand::List => {
            let entered = state.current_swimmer().map(|swimmer| &swimmer.entered_competition_ids);
            for competition in state.competitions() {
                let marker = if entered.is_some_and(|ids| ids.contains(&competition.id)) {
                    "*"
                } else {
                    " "
                };
                let period = competition
                    .qualifying_period
                    .map(|period| format!("{} to {}", period.start(), period.end()))
                    .unwrap_or_else(|| "any date".to_string());
                tracing::info!(
                    "{} {} {} ({}, {}, {} standards)",
                    marker,
                    competition.id,
                    competition.name,
                    competition.course,
                    period,
                    competition.standards.len()
                );
            }
            Ok(false)
        }
        CompetitionCommand::Enter { id } => {
            state.set_entered(&id, true)?;
            Ok(true)
        }
        CompetitionCommand::Withdraw { id } => {
            state.set_entered(&id, false)?;
            Ok(true)
        }
        CompetitionCommand::Delete { id } => {
            let competition = state.delete_competition(&id)?;
            tracing::info!("Deleted {}", competition.name);
            Ok(true)
        }
        CompetitionCommand::ImportCsv { id, file } => {
            let import = read_standards_file(&file)
                .with_context(|| format!("Cannot read {}", file.display()))?;
            if import.imported == 0 {
                return Err(anyhow!("No valid qualifying times found in {}", file.display()));
            }
            let count = state.replace_competition_standards(&id, import.table)?;
            tracing::info!(
                "✓ Imported {} qualifying times ({} rows skipped)",
                count,
                import.skipped
            );
            Ok(true)
        }
    }
}

fn handle_report(
    state: &AppState,
    config: &Config,
    competition: Option<&str>,
    course: Course,
    recent: usize,
) -> Result<()> {
    let swimmer = state
        .current_swimmer()
        .context("No swimmer selected, run `swimqt swimmer select <id>` first")?;
    let converter = LinearCourseFactor::new(config.course_factor)?;
    let competitions = state.competitions();
    let today = Local::now().date_naive();

    tracing::info!("Personal bests ({}):", course);
    for best in personal_bests(&swimmer.times, course, &converter) {
        let event = best.event();
        let converted = if best.is_converted(course) { " (conv)" } else { "" };
        let target = match gap_to_target(swimmer, competitions, competition, event, course, &converter) {
            GapToTarget::Outstanding { gap_ms, .. } => format!("+{} to target", format_time(gap_ms)?),
            GapToTarget::QualifiedAll { .. } => "qualified".to_string(),
            GapToTarget::NoData => String::new(),
        };
        tracing::info!(
            "  {:<24} {}{} {}  {}",
            event.label(),
            format_time(best.time_ms)?,
            converted,
            best.record.date,
            target
        );
    }

    tracing::info!("Target races:");
    for race in target_races(swimmer, competitions, competition, &converter) {
        tracing::info!(
            "  {:<24} {:<28} {} vs {} (+{}, {:.2}%)",
            race.event.label(),
            race.competition_name,
            format_time(race.best_time_ms)?,
            format_time(race.qualifying_time_ms)?,
            format_time(race.gap_ms)?,
            race.gap_pct
        );
    }

    tracing::info!("Missing races:");
    for race in missing_races(swimmer, competitions, competition, &converter) {
        let detail = match race.reason {
            MissingReason::NoTimeRecorded => "no time recorded".to_string(),
            MissingReason::OutsidePeriod {
                best_time_ms,
                date,
                gap_ms,
                ..
            } if gap_ms <= 0 => format!(
                "best {} on {} is outside the window, already under QT",
                format_time(best_time_ms)?,
                date
            ),
            MissingReason::OutsidePeriod {
                best_time_ms,
                date,
                gap_ms,
                ..
            } => format!(
                "best {} on {} is outside the window, +{}",
                format_time(best_time_ms)?,
                date,
                format_time(gap_ms)?
            ),
        };
        tracing::info!(
            "  {:<24} {:<28} QT {} ({})",
            race.event.label(),
            race.competition_name,
            format_time(race.qualifying_time_ms)?,
            detail
        );
    }

    tracing::info!("Weeks since PB:");
    for entry in staleness(&swimmer.times, course, today, &converter) {
        let last = if entry.is_different {
            format!(", last swum {} weeks ago", entry.weeks_since_last)
        } else {
            String::new()
        };
        tracing::info!("  {:<24} {} weeks{}", entry.event.label(), entry.weeks_since_pb, last);
    }

    tracing::info!("Recent swims:");
    for record in recent_swims(&swimmer.times, recent) {
        tracing::info!(
            "  {} {:<24} {} {} {}",
            record.date,
            record.event.key().label(),
            record.event.course,
            record.formatted_time,
            record.meet_name.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

fn print_report_json(
    state: &AppState,
    config: &Config,
    competition: Option<&str>,
    course: Course,
) -> Result<()> {
    let swimmer = state
        .current_swimmer()
        .context("No swimmer selected, run `swimqt swimmer select <id>` first")?;
    let converter = LinearCourseFactor::new(config.course_factor)?;
    let competitions = state.competitions();

    let report = serde_json::json!({
        "swimmer": swimmer.name,
        "targetRaces": target_races(swimmer, competitions, competition, &converter),
        "missingRaces": missing_races(swimmer, competitions, competition, &converter),
        "staleness": staleness(&swimmer.times, course, Local::now().date_naive(), &converter),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overwrite_help_describes_same_day_replacement() {
        let command = Cli::command();
        let import = command.find_subcommand("import").unwrap();
        let overwrite = import
            .get_arguments()
            .find(|arg| arg.get_id() == "overwrite")
            .unwrap();
        let help = overwrite.get_help().unwrap().to_string();
        assert!(help.contains("same day, stroke and distance"));
        assert!(!help.contains("all existing"));
    }
}
