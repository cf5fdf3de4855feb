use anyhow::{Context, Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use dotenvy::dotenv;
use log::LevelFilter;
use std::path::PathBuf;
use uuid::Uuid;

use ironledger::analytics::{
    hot_streaks, personal_records, session_quick_stats, strength_trend, win_loss_table,
};
use ironledger::config::Config;
use ironledger::dashboard::{Dashboard, SessionRecap};
use ironledger::logging::{LogTarget, init_logger, parse_level};
use ironledger::matches::{NewMatch, Participants};
use ironledger::timestamp::{self, format_minute, now_minute};
use ironledger::workouts::{UpdateWeightEntry, WorkoutSession, parse_sets};

mod forms;
mod tui;

#[derive(Parser, Debug)]
#[command(version, about = "Iron Ledger - workout and match tracker", long_about = None)]
struct Args {
    /// SQLite file for players, games and matches
    #[arg(long, global = true)]
    database: Option<String>,
    /// JSON snapshot for workouts and weight entries
    #[arg(long, global = true)]
    workouts: Option<PathBuf>,
    #[arg(long, global = true)]
    user: Option<String>,
    /// off, error, warn, info, debug or trace
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tabbed dashboard
    Interactive,
    /// Log a workout session
    LogWorkout {
        #[arg(short, long)]
        routine: String,
        /// <weight>x<reps>, repeatable or comma separated
        #[arg(short, long = "set", required = true)]
        sets: Vec<String>,
        /// "YYYY-MM-DD HH:MM", defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    EditWorkout {
        id: Uuid,
        #[arg(short, long)]
        routine: Option<String>,
        #[arg(short, long = "set")]
        sets: Vec<String>,
    },
    DeleteWorkout {
        id: Uuid,
    },
    /// List sessions, newest first
    Workouts {
        #[arg(short, long, default_value = "")]
        filter: String,
    },
    LogWeight {
        #[arg(short, long)]
        weight: f64,
        #[arg(short, long, default_value = "Home")]
        location: String,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(long)]
        at: Option<String>,
    },
    EditWeight {
        id: Uuid,
        #[arg(short, long)]
        weight: Option<f64>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(long)]
        at: Option<String>,
    },
    DeleteWeight {
        id: Uuid,
    },
    Weights,
    /// Personal records per routine
    Records,
    /// Session maxima with a 30 day moving average
    Trend {
        #[arg(short, long)]
        routine: String,
    },
    /// Latest weight, last session and a week-ago recap
    Home,
    Player {
        #[command(subcommand)]
        action: RosterAction,
    },
    Game {
        #[command(subcommand)]
        action: RosterAction,
    },
    Match {
        #[command(subcommand)]
        action: MatchAction,
    },
    /// Top five win streaks across games
    Streaks,
    /// Wins in the current sitting
    QuickStats,
    Standings {
        #[arg(short, long)]
        game: String,
    },
    /// Fill the stores with generated records
    Demo {
        #[arg(long)]
        workouts: bool,
        #[arg(long)]
        matches: bool,
    },
    /// Drop and recreate the stores
    Reset {
        #[arg(long)]
        workouts: bool,
        #[arg(long)]
        matches: bool,
    },
}

#[derive(Subcommand, Debug)]
enum RosterAction {
    Add { name: String },
    Remove { name: String },
    List,
}

#[derive(ClapArgs, Debug)]
struct MatchFields {
    #[arg(short, long)]
    game: String,
    #[arg(short, long = "winner", required = true)]
    winners: Vec<String>,
    #[arg(short, long = "loser")]
    losers: Vec<String>,
    /// "YYYY-MM-DD", defaults to today
    #[arg(short, long)]
    date: Option<String>,
    #[arg(short, long, default_value = "")]
    time: String,
    #[arg(short, long)]
    scores: Option<String>,
    #[arg(short, long)]
    notes: Option<String>,
}

impl MatchFields {
    fn into_new_match(self) -> Result<NewMatch> {
        let date = match self.date {
            Some(raw) => timestamp::parse_date(&raw)?,
            None => now_minute().date(),
        };
        let split = |names: &[String]| -> Participants {
            Participants::new(names.iter().flat_map(|n| n.split(',')))
        };
        Ok(NewMatch::new(&self.game, date, split(&self.winners), split(&self.losers))
            .with_time(&self.time)
            .with_scores(self.scores)
            .with_notes(self.notes))
    }
}

#[derive(Subcommand, Debug)]
enum MatchAction {
    Add(MatchFields),
    Edit {
        id: i32,
        #[command(flatten)]
        fields: MatchFields,
    },
    Delete {
        id: i32,
    },
    /// Newest first
    List {
        #[arg(short, long)]
        limit: Option<i64>,
    },
}

fn parse_at(at: Option<String>) -> Result<chrono::NaiveDateTime> {
    match at {
        Some(raw) => Ok(timestamp::parse_minute(&raw)?),
        None => Ok(now_minute()),
    }
}

fn collect_sets(raw: &[String]) -> Result<Vec<ironledger::workouts::Set>> {
    Ok(parse_sets(&raw.join(","))?)
}

fn print_session(session: &WorkoutSession) {
    println!("{}  {} - {}", session.id, session.timestamp(), session.routine);
    for set in session.sets() {
        println!("\t- {}", set);
    }
}

fn print_recap(title: &str, recap: &SessionRecap) {
    let pb = if recap.personal_best { "  PB!" } else { "" };
    println!("{}: {} ({}){}", title, recap.session.routine, recap.session.timestamp(), pb);
    for set in recap.session.sets() {
        println!("\t- {}", set);
    }
    println!("\tTotal volume: {} lbs", recap.volume as i64);
}

fn run(dashboard: &mut Dashboard, command: Commands) -> Result<()> {
    match command {
        Commands::Interactive => {
            let terminal = ratatui::init();
            let result = tui::run_dashboard(terminal, dashboard);
            ratatui::restore();
            result?;
        }
        Commands::LogWorkout { routine, sets, at } => {
            let sets = collect_sets(&sets)?;
            let at = parse_at(at)?;
            let session = dashboard.workouts.log_session(at, &routine, sets)?.clone();
            dashboard.persist()?;
            print_session(&session);
        }
        Commands::EditWorkout { id, routine, sets } => {
            let current = dashboard.workouts.get_session(id)?.clone();
            let routine = routine.unwrap_or_else(|| current.routine.clone());
            let sets = if sets.is_empty() {
                current.sets().to_vec()
            } else {
                collect_sets(&sets)?
            };
            let session = dashboard.workouts.edit_session(id, &routine, sets)?.clone();
            dashboard.persist()?;
            print_session(&session);
        }
        Commands::DeleteWorkout { id } => {
            let removed = dashboard.workouts.delete_session(id)?;
            dashboard.persist()?;
            println!("Deleted {} session from {}", removed.routine, removed.timestamp());
        }
        Commands::Workouts { filter } => {
            for session in dashboard.workouts.search(&filter) {
                print_session(session);
            }
        }
        Commands::LogWeight {
            weight,
            location,
            notes,
            at,
        } => {
            let at = parse_at(at)?;
            let user = dashboard.user_name.clone();
            let entry = dashboard
                .workouts
                .log_weight(at, &user, weight, &location, notes)?
                .clone();
            dashboard.persist()?;
            println!("{}  {}  {} lbs at {}", entry.id, entry.timestamp(), entry.weight, entry.location);
        }
        Commands::EditWeight {
            id,
            weight,
            location,
            notes,
            at,
        } => {
            let recorded_at = at.map(|raw| timestamp::parse_minute(&raw)).transpose()?;
            let update = UpdateWeightEntry {
                recorded_at,
                weight,
                location,
                notes: notes.map(Some),
            };
            let entry = dashboard.workouts.edit_weight(id, update)?.clone();
            dashboard.persist()?;
            println!("{}  {}  {} lbs at {}", entry.id, entry.timestamp(), entry.weight, entry.location);
        }
        Commands::DeleteWeight { id } => {
            let removed = dashboard.workouts.delete_weight(id)?;
            dashboard.persist()?;
            println!("Deleted weight entry from {}", removed.timestamp());
        }
        Commands::Weights => {
            for entry in dashboard.workouts.weight_history() {
                println!(
                    "{}  {}  {:>6.1} lbs  {}  {}",
                    entry.id,
                    entry.timestamp(),
                    entry.weight,
                    entry.location,
                    entry.notes.as_deref().unwrap_or("")
                );
            }
        }
        Commands::Records => {
            let rows = personal_records(dashboard.workouts.sessions())?;
            println!(
                "{:<22} {:>10} {:>6} {:<17} {:>10} {:>6} {:<17}",
                "Routine", "Max", "Reps", "Date of Max", "Last Max", "Reps", "Last Logged"
            );
            for row in rows {
                println!(
                    "{:<22} {:>10} {:>6} {:<17} {:>10} {:>6} {:<17}",
                    row.routine,
                    format!("{} lbs", row.max_weight),
                    row.reps_at_max,
                    format_minute(&row.max_at),
                    format!("{} lbs", row.last_max_weight),
                    row.last_reps,
                    format_minute(&row.last_logged_at)
                );
            }
        }
        Commands::Trend { routine } => {
            let points = strength_trend(dashboard.workouts.sessions(), &routine);
            if points.is_empty() {
                bail!("no sessions logged for {}", routine);
            }
            for point in points {
                let average = point
                    .moving_average
                    .map(|a| format!("{:.1}", a))
                    .unwrap_or_else(|| "-".to_string());
                println!("{}  {:>8.1}  {:>8}", format_minute(&point.at), point.max_weight, average);
            }
        }
        Commands::Home => {
            let summary = dashboard.home(now_minute().date());
            println!("Dashboard: {}", dashboard.user_name);
            match &summary.latest_weight {
                Some(entry) => println!("Current weight: {} lbs", entry.weight),
                None => println!("Current weight: -"),
            }
            match &summary.week_ago {
                Some(recap) => print_recap("7 days ago", recap),
                None => println!("No session found 7 days ago."),
            }
            match &summary.last_session {
                Some(recap) => print_recap("Last session", recap),
                None => println!("No workouts logged."),
            }
        }
        Commands::Player { action } => match action {
            RosterAction::Add { name } => {
                let player = dashboard.matches.add_player(&name)?;
                println!("Added player {}", player.name);
            }
            RosterAction::Remove { name } => {
                dashboard.matches.delete_player(&name)?;
                println!("Removed player {}", name.trim());
            }
            RosterAction::List => {
                for player in dashboard.matches.players()? {
                    println!("{}", player.name);
                }
            }
        },
        Commands::Game { action } => match action {
            RosterAction::Add { name } => {
                let game = dashboard.matches.add_game(&name)?;
                println!("Added game {}", game.title);
            }
            RosterAction::Remove { name } => {
                dashboard.matches.delete_game(&name)?;
                println!("Removed game {}", name.trim());
            }
            RosterAction::List => {
                for game in dashboard.matches.games()? {
                    println!("{}", game.title);
                }
            }
        },
        Commands::Match { action } => match action {
            MatchAction::Add(fields) => {
                let recorded = dashboard.matches.record_match(&fields.into_new_match()?)?;
                println!("Recorded match #{}", recorded.id);
            }
            MatchAction::Edit { id, fields } => {
                let updated = dashboard.matches.update_match(id, &fields.into_new_match()?)?;
                println!("Updated match #{}", updated.id);
            }
            MatchAction::Delete { id } => {
                dashboard.matches.delete_match(id)?;
                println!("Deleted match #{}", id);
            }
            MatchAction::List { limit } => {
                for m in dashboard.matches.recent_matches(limit)? {
                    println!(
                        "#{:<4} {} {:<10} {:<12} W: {:<20} L: {}",
                        m.id,
                        m.date_label(),
                        m.time,
                        m.game,
                        m.winners,
                        m.losers
                    );
                }
            }
        },
        Commands::Streaks => {
            for streak in hot_streaks(&dashboard.matches.matches()?)? {
                println!("{} won {} straight in {}", streak.player, streak.count, streak.game);
            }
        }
        Commands::QuickStats => {
            let stats = session_quick_stats(&dashboard.matches.recent_matches(None)?)?;
            println!(
                "{}: {} matches with {}",
                stats.game,
                stats.matches_played(),
                stats.participants
            );
            for (player, wins) in stats.wins {
                println!("\t{:<20} {}", player, wins);
            }
        }
        Commands::Standings { game } => {
            let matches = dashboard.matches.matches_for_game(&game)?;
            let players = dashboard.matches.players()?;
            for record in win_loss_table(&game, &matches, &players)? {
                println!(
                    "{:<20} W {:>3}  L {:>3}  {:>4}",
                    record.player,
                    record.wins,
                    record.losses,
                    record.win_percentage()
                );
            }
        }
        Commands::Demo { workouts, matches } => {
            let (workouts, matches) = if workouts || matches { (workouts, matches) } else { (true, true) };
            let mut rng = rand::rng();
            let now = now_minute();
            if workouts {
                let generated = dashboard.populate_workouts(&mut rng, now)?;
                println!("Generated {} workout records", generated);
            }
            if matches {
                let generated = dashboard.populate_matches(&mut rng, now.date())?;
                println!("Generated {} matches", generated);
            }
        }
        Commands::Reset { workouts, matches } => {
            let (workouts, matches) = if workouts || matches { (workouts, matches) } else { (true, true) };
            if workouts {
                dashboard.reset_workouts()?;
                println!("Workout store cleared");
            }
            if matches {
                dashboard.reset_matches()?;
                println!("Match database recreated");
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(database) = args.database {
        config.database_url = database;
    }
    if let Some(workouts) = args.workouts {
        config.workout_file = workouts;
    }
    if let Some(user) = args.user {
        config.user_name = user;
    }
    if let Some(level) = args.log_level {
        config.log_level = parse_level(&level).with_context(|| format!("unknown log level '{}'", level))?;
    }

    let interactive = matches!(args.command, Commands::Interactive);
    if interactive {
        match &config.log_file {
            Some(path) => init_logger(config.log_level, LogTarget::File(path.clone())),
            None => init_logger(LevelFilter::Off, LogTarget::Stderr),
        }
    } else {
        init_logger(config.log_level, LogTarget::Stderr);
    }

    let mut dashboard = Dashboard::open(&config).with_context(|| {
        format!(
            "failed to open stores ({}, {})",
            config.database_url,
            config.workout_file.display()
        )
    })?;

    run(&mut dashboard, args.command)
}
