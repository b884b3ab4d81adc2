#![forbid(unsafe_code)]
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc, Weekday};
use clap::{Parser, Subcommand};
use oncall_rota::{
    assignment_counts,
    config::{parse_anchor_time, RotationConfig},
    export::{export_as, export_to_path, ExportFormat},
    find_active,
    io::{read_rows_from_path, CsvHolidays},
    week::to_local,
    HolidayIndex, ImportMode, JsonStore, RotationImporter, RotationStore, Scheduler, TeamId,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M %Z";

/// CLI de rotation d'astreinte hebdomadaire
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des fenêtres d'astreinte
    #[arg(long, global = true, default_value = "rotation.json")]
    store: String,

    /// Fichier JSON de configuration (fuseau, ancrage)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Fuseau IANA, ex. "America/Chicago"
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Jour de relève, ex. "Fri"
    #[arg(long, global = true)]
    anchor_weekday: Option<String>,

    /// Heure de relève locale, "HH:MM"
    #[arg(long, global = true)]
    anchor_time: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Afficher la fenêtre d'une semaine
    Window {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        week: u32,
    },

    /// Importer un CSV (manual: week,name,phone ; auto: name,phone)
    Import {
        #[arg(long)]
        team: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        csv: String,
        #[arg(long, default_value = "manual")]
        mode: String,
        /// CSV des jours fériés `date[,name]` (mode auto)
        #[arg(long)]
        holidays: Option<String>,
    },

    /// Exporter l'année d'une équipe
    Export {
        #[arg(long)]
        team: String,
        #[arg(long)]
        year: i32,
        #[arg(long, default_value = "json")]
        format: String,
        /// Fichier de sortie (stdout sinon)
        #[arg(long)]
        out: Option<String>,
    },

    /// Qui est d'astreinte maintenant (ou à `--at`)
    Now {
        #[arg(long)]
        team: Option<String>,
        /// RFC3339 UTC
        #[arg(long)]
        at: Option<String>,
    },

    /// Lister les fenêtres d'une équipe
    List {
        #[arg(long)]
        team: String,
        #[arg(long)]
        year: i32,
    },

    /// Échanger les titulaires de deux semaines
    Swap {
        #[arg(long)]
        team: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        week: u32,
        #[arg(long)]
        with: u32,
    },

    /// Nombre de semaines par personne
    Stats {
        #[arg(long)]
        team: String,
        #[arg(long)]
        year: i32,
    },
}

fn load_config(cli: &Cli) -> Result<RotationConfig> {
    let mut config = match &cli.config {
        Some(path) => RotationConfig::from_json_file(path)?,
        None => RotationConfig::default(),
    };
    if let Some(tz) = &cli.timezone {
        config.timezone = tz.clone();
    }
    if let Some(day) = &cli.anchor_weekday {
        config.anchor_weekday = day
            .parse::<Weekday>()
            .map_err(|_| anyhow!("invalid weekday: {day}"))?;
    }
    if let Some(time) = &cli.anchor_time {
        config.anchor_time = parse_anchor_time(time)?;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let config = load_config(&cli)?;
    let scheduler = Scheduler::new(&config)?;
    let tz = scheduler.tz();
    let mut store = JsonStore::open(&cli.store)?;

    let code = match cli.cmd {
        Commands::Window { year, week } => {
            let (start, end) = scheduler.week_window(year, week)?;
            println!(
                "{year}-W{week:02} | {} → {} | {} → {}",
                to_local(start, tz).format(LOCAL_FORMAT),
                to_local(end, tz).format(LOCAL_FORMAT),
                start.to_rfc3339(),
                end.to_rfc3339()
            );
            0
        }
        Commands::Import {
            team,
            year,
            csv,
            mode,
            holidays,
        } => {
            let mode: ImportMode = mode.parse()?;
            let rows = read_rows_from_path(&csv)?;
            let index = match holidays {
                Some(path) => HolidayIndex::for_year(&CsvHolidays::from_path(path)?, year)?,
                None => HolidayIndex::default(),
            };
            if !index.is_empty() {
                tracing::debug!(holidays = index.len(), year, "holiday index loaded");
            }
            let team = TeamId::new(team);
            let summary = RotationImporter::new(&scheduler)
                .import(&mut store, &team, year, mode, &rows, &index)
                .with_context(|| format!("importing {csv}"))?;
            match summary.mode {
                ImportMode::Manual => println!(
                    "Imported {csv}: {} created, {} updated (batch {})",
                    summary.created, summary.updated, summary.batch_id
                ),
                ImportMode::AutoGenerate => println!(
                    "Generated {} weeks for {team} {year} (batch {})",
                    summary.generated, summary.batch_id
                ),
            }
            0
        }
        Commands::Export {
            team,
            year,
            format,
            out,
        } => {
            let format: ExportFormat = format.parse()?;
            let windows = store.list(&TeamId::new(team), year)?;
            match out {
                Some(path) => export_to_path(&path, &windows, tz, format)?,
                None => {
                    let bytes = export_as(&windows, tz, format)?;
                    print!("{}", String::from_utf8_lossy(&bytes));
                }
            }
            0
        }
        Commands::Now { team, at } => {
            let now: DateTime<Utc> = match at {
                Some(raw) => raw.parse().context("--at RFC3339")?,
                None => Utc::now(),
            };
            let team = team.map(TeamId::new);
            let active = find_active(&store, now, team.as_ref())?;
            if active.is_empty() {
                eprintln!("No one on call at {}", now.to_rfc3339());
                // Code 3 = personne d'astreinte
                3
            } else {
                for w in &active {
                    println!(
                        "{} | {}-W{:02} | {} ({}) | until {}",
                        w.team_id,
                        w.year,
                        w.week_number,
                        w.assignee_name,
                        w.assignee_phone,
                        to_local(w.end_instant, tz).format(LOCAL_FORMAT)
                    );
                }
                0
            }
        }
        Commands::List { team, year } => {
            for w in store.list(&TeamId::new(team), year)? {
                println!(
                    "W{:02} | {} → {} | {} ({})",
                    w.week_number,
                    to_local(w.start_instant, tz).format(LOCAL_FORMAT),
                    to_local(w.end_instant, tz).format(LOCAL_FORMAT),
                    w.assignee_name,
                    w.assignee_phone
                );
            }
            0
        }
        Commands::Swap {
            team,
            year,
            week,
            with,
        } => {
            scheduler.swap_weeks(&mut store, &TeamId::new(team), year, week, with)?;
            println!("Swapped weeks {week} and {with}");
            0
        }
        Commands::Stats { team, year } => {
            let windows = store.list(&TeamId::new(team), year)?;
            for (name, count) in assignment_counts(&windows) {
                println!("{name}: {count}");
            }
            0
        }
    };

    std::process::exit(code);
}
