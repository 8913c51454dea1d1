#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::BufRead;
use swiftpass::{
    config::{load_config_from_file, GateConfig},
    io::{format_timestamp, write_file_atomically},
    ledger::{normalize_student_id, ExportRange, Gate},
    model::{Direction, LogEntry, Role},
    storage::JsonDirStore,
    SystemClock,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Registre des entrées/sorties de l'internat (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Répertoire d'état (rôle, registre, mode vacances)
    #[arg(long, global = true, default_value = ".swift-pass")]
    state_dir: String,

    /// Fichier JSON de réglages (seuils d'alerte, taille du fil)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Saisie manuelle d'un passage
    Record {
        #[arg(long)]
        student: String,
        #[arg(long, value_enum)]
        direction: DirectionArg,
    },

    /// Lit un identifiant par ligne sur stdin (douchette QR en mode clavier)
    Scan {
        #[arg(long, value_enum)]
        direction: DirectionArg,
    },

    /// Fil d'activité récent et élèves non rentrés
    Feed {
        /// Remplace la taille du fil configurée
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Élèves non rentrés (code 2 si la liste n'est pas vide)
    Unreturned,

    /// Mode vacances (désactive les alertes)
    Holiday {
        #[arg(value_enum, default_value_t = HolidayAction::Status)]
        action: HolidayAction,
    },

    /// Vue active : gardien ou surveillant
    Role {
        #[arg(value_enum, default_value_t = RoleAction::Status)]
        action: RoleAction,
    },

    /// Export CSV du registre complet
    Export {
        #[arg(value_enum)]
        range: RangeArg,
        /// Fichier de sortie (nom par défaut sinon)
        #[arg(long)]
        out: Option<String>,
    },

    /// QR code d'un élève
    #[cfg(feature = "qr")]
    Qr {
        #[arg(long)]
        student: String,
        #[arg(long, default_value = ".")]
        out_dir: String,
        /// Affiche seulement l'URL de l'image
        #[arg(long)]
        url_only: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DirectionArg {
    Entry,
    Exit,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Entry => Direction::Entry,
            DirectionArg::Exit => Direction::Exit,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HolidayAction {
    On,
    Off,
    Toggle,
    Status,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RoleAction {
    Guard,
    Warden,
    Status,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RangeArg {
    Today,
    Week,
}

fn print_entry(e: &LogEntry) {
    let alert = if e.alert.is_alert() { e.alert.label() } else { "-" };
    println!(
        "{} | {} | {} | {}",
        format_timestamp(&e.timestamp),
        e.student_id,
        e.direction,
        alert
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let config = match &cli.config {
        Some(path) => load_config_from_file(path)?,
        None => GateConfig::default(),
    };
    let store = JsonDirStore::open(&cli.state_dir)?;
    let mut gate = Gate::open(store, SystemClock)?
        .with_policy(config.policy())
        .with_display_limit(config.display_limit);

    let code = match cli.cmd {
        Commands::Record { student, direction } => {
            let student = normalize_student_id(&student)?;
            let entry = gate.record(&student, direction.into())?;
            print_entry(&entry);
            0
        }
        Commands::Scan { direction } => {
            let direction = Direction::from(direction);
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = line.context("reading scan input")?;
                // lignes vides : scan raté ou retour chariot en trop
                let Ok(student) = normalize_student_id(&line) else {
                    continue;
                };
                let entry = gate.record(&student, direction)?;
                print_entry(&entry);
            }
            0
        }
        Commands::Feed { limit } => {
            let gate = match limit {
                Some(n) => gate.with_display_limit(n),
                None => gate,
            };
            let unreturned = gate.unreturned();
            if !unreturned.is_empty() {
                println!("Unreturned students:");
                for id in &unreturned {
                    println!("  {id}");
                }
                println!();
            }
            let logs = gate.visible_logs();
            if logs.is_empty() {
                println!("No activity yet.");
            }
            for e in logs {
                print_entry(e);
            }
            0
        }
        Commands::Unreturned => {
            let unreturned = gate.unreturned();
            if unreturned.is_empty() {
                println!("OK: everyone is back");
                0
            } else {
                for id in &unreturned {
                    println!(
                        "{id}: did not return by {:02}:00",
                        gate.policy().late_entry_hour
                    );
                }
                eprintln!("{} student(s) not back", unreturned.len());
                // Code 2 = WARNING
                2
            }
        }
        Commands::Holiday { action } => {
            match action {
                HolidayAction::On => gate.set_holiday_mode(true)?,
                HolidayAction::Off => gate.set_holiday_mode(false)?,
                HolidayAction::Toggle => {
                    gate.toggle_holiday_mode()?;
                }
                HolidayAction::Status => {}
            }
            let state = if gate.holiday_mode() { "on" } else { "off" };
            println!("holiday mode: {state}");
            0
        }
        Commands::Role { action } => {
            match action {
                RoleAction::Guard => gate.set_role(Role::Guard)?,
                RoleAction::Warden => gate.set_role(Role::Warden)?,
                RoleAction::Status => {}
            }
            println!("role: {}", gate.role());
            0
        }
        Commands::Export { range, out } => {
            let range = match range {
                RangeArg::Today => ExportRange::Today,
                RangeArg::Week => ExportRange::LastSevenDays,
            };
            let path = out.unwrap_or_else(|| range.file_name(&gate.now()));
            let rows = write_file_atomically(&path, |file| Ok(gate.export_csv(range, file)?))?;
            println!("Exported {rows} row(s) to {path}");
            0
        }
        #[cfg(feature = "qr")]
        Commands::Qr {
            student,
            out_dir,
            url_only,
        } => {
            if url_only {
                println!("{}", swiftpass::qr::qr_code_url(&student)?);
            } else {
                let path = swiftpass::qr::download_qr(&student, &out_dir)?;
                println!("QR code saved to {}", path.display());
            }
            0
        }
    };

    std::process::exit(code);
}
