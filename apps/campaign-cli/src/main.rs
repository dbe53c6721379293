use anyhow::Context;
use campaign_common::{AppConfig, Language, Translator};
use campaign_kernel::{Character, CharacterKind, Scene, Session};
use campaign_persist::{Campaign, StoreConfig, StoreError, Version};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "campaign", about = "Manage tabletop campaign projects and their version history")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.campaign/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Display language (fr or en), overriding the config
    #[arg(long, global = true)]
    lang: Option<Language>,

    /// Campaign directory (defaults to the last opened campaign)
    #[arg(short = 'C', long = "campaign", global = true)]
    campaign: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new campaign
    New {
        dir: PathBuf,
        #[arg(short, long)]
        name: String,
    },
    /// Create a campaign from an exported project JSON file
    Import { json: PathBuf, dir: PathBuf },
    /// Write the current project to a JSON file that `import` accepts
    Export { file: PathBuf },
    /// Show a summary of the campaign
    Info,
    /// Add a character and save
    AddCharacter {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, value_enum, default_value_t = KindArg::Pc)]
        kind: KindArg,
    },
    /// Add a scene and save
    AddScene {
        #[arg(short, long)]
        title: String,
    },
    /// Add a session dated now and save
    AddSession {
        #[arg(short, long)]
        title: String,
        /// Mark as a planned session
        #[arg(long)]
        preparation: bool,
    },
    /// Record a version if anything changed
    Save {
        #[arg(short, long)]
        message: Option<String>,
        /// Record a version even when nothing changed
        #[arg(long)]
        force: bool,
    },
    /// List retained versions, oldest first
    History,
    /// Print the snapshot stored in a version
    Show {
        #[arg(allow_negative_numbers = true)]
        version: i64,
    },
    /// Restore a version and record it as the newest one
    Rollback {
        #[arg(allow_negative_numbers = true)]
        version: i64,
    },
    /// Set the display language in the config
    Language { language: Language },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Pc,
    Npc,
    Creature,
}

impl From<KindArg> for CharacterKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Pc => CharacterKind::Pc,
            KindArg::Npc => CharacterKind::Npc,
            KindArg::Creature => CharacterKind::Creature,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config_path = cli.config.clone().or_else(AppConfig::default_path);
    let mut config = match &config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let t = Translator::new(cli.lang.unwrap_or(config.language));
    let store_config = StoreConfig {
        retention: config.retention,
    };

    let opened = match cli.command {
        Commands::New { dir, name } => {
            let campaign = Campaign::create(&dir, &name, store_config)
                .map_err(|e| user_error(e, Operation::Save, &t))?;
            println!("{}: {}", t.text("campaign.created"), dir.display());
            Some(campaign)
        }
        Commands::Import { json, dir } => {
            let campaign = Campaign::import(&json, &dir, store_config)
                .map_err(|e| user_error(e, Operation::Save, &t))?;
            println!("{}: {}", t.text("campaign.imported"), dir.display());
            Some(campaign)
        }
        Commands::Export { file } => {
            let campaign = open(&cli.campaign, &config, store_config)?;
            campaign
                .export(&file)
                .map_err(|e| user_error(e, Operation::Export, &t))?;
            println!("{}: {}", t.text("campaign.exported"), file.display());
            Some(campaign)
        }
        Commands::Info => {
            let campaign = open(&cli.campaign, &config, store_config)?;
            let project = campaign.project();
            println!("{}: {}", t.text("campaign.name"), project.name);
            println!(
                "{}: {}",
                t.text("campaign.version"),
                campaign.versions().current_version_number()?
            );
            println!(
                "{}: {}",
                t.text("campaign.updated"),
                project.updated_at().to_rfc3339()
            );
            println!("{}: {}", t.text("campaign.characters"), project.characters().len());
            println!("{}: {}", t.text("campaign.scenes"), project.scenes().len());
            println!("{}: {}", t.text("campaign.sessions"), project.sessions().len());
            Some(campaign)
        }
        Commands::AddCharacter { name, kind } => {
            let mut campaign = open(&cli.campaign, &config, store_config)?;
            campaign
                .project_mut()
                .upsert_character(Character::new(name.as_str(), kind.into()));
            save(&mut campaign, Some(&format!("Add character {name}")), false, &t)?;
            println!("{}: {name}", t.text("character.added"));
            Some(campaign)
        }
        Commands::AddScene { title } => {
            let mut campaign = open(&cli.campaign, &config, store_config)?;
            campaign.project_mut().upsert_scene(Scene::new(title.as_str()));
            save(&mut campaign, Some(&format!("Add scene {title}")), false, &t)?;
            println!("{}: {title}", t.text("scene.added"));
            Some(campaign)
        }
        Commands::AddSession { title, preparation } => {
            let mut campaign = open(&cli.campaign, &config, store_config)?;
            let mut session = Session::new(title.as_str(), chrono::Utc::now());
            session.is_preparation = preparation;
            campaign.project_mut().upsert_session(session);
            save(&mut campaign, Some(&format!("Add session {title}")), false, &t)?;
            println!("{}: {title}", t.text("session.added"));
            Some(campaign)
        }
        Commands::Save { message, force } => {
            let mut campaign = open(&cli.campaign, &config, store_config)?;
            save(&mut campaign, message.as_deref(), force, &t)?;
            Some(campaign)
        }
        Commands::History => {
            let campaign = open(&cli.campaign, &config, store_config)?;
            let versions = campaign.versions().list_versions()?;
            println!("{}", t.text("history.title"));
            if versions.is_empty() {
                println!("  {}", t.text("history.empty"));
            }
            for version in &versions {
                println!("  {}", history_line(version, &t));
            }
            Some(campaign)
        }
        Commands::Show { version } => {
            let campaign = open(&cli.campaign, &config, store_config)?;
            let snapshot = campaign
                .versions()
                .rollback_to_version(version)
                .map_err(|e| user_error(e, Operation::Rollback, &t))?;
            println!("{}", serde_json::to_string_pretty(snapshot.as_value())?);
            Some(campaign)
        }
        Commands::Rollback { version } => {
            let mut campaign = open(&cli.campaign, &config, store_config)?;
            let created = campaign
                .rollback(version)
                .map_err(|e| user_error(e, Operation::Rollback, &t))?;
            println!(
                "{}: {version} -> {}",
                t.text("rollback.done"),
                created.version_number
            );
            Some(campaign)
        }
        Commands::Language { language } => {
            set_language(config_path.as_deref(), &mut config, language)?;
            println!("{}: {language}", Translator::new(language).text("language.set"));
            None
        }
    };

    // Remembering the last campaign is a convenience; failing to do so is not fatal.
    if let (Some(campaign), Some(path)) = (&opened, &config_path) {
        config.set_last_project(campaign.root());
        if let Err(e) = config.save(path) {
            tracing::warn!(path = %path.display(), "failed to save config: {e}");
        }
    }

    Ok(())
}

/// The campaign named with `-C`, or else the last opened one.
fn resolve_root(explicit: &Option<PathBuf>, config: &AppConfig) -> anyhow::Result<PathBuf> {
    explicit
        .clone()
        .or_else(|| config.last_project().map(Path::to_path_buf))
        .context("no campaign given (use -C <DIR>) and no previous campaign to reopen")
}

fn open(
    explicit: &Option<PathBuf>,
    config: &AppConfig,
    store_config: StoreConfig,
) -> anyhow::Result<Campaign> {
    let root = resolve_root(explicit, config)?;
    Campaign::open(&root, store_config)
        .with_context(|| format!("cannot open campaign at {}", root.display()))
}

/// Store `language` in the config file. Nothing is reported as set unless
/// the file was written.
fn set_language(
    path: Option<&Path>,
    config: &mut AppConfig,
    language: Language,
) -> anyhow::Result<()> {
    let path = path.context("no config file location (use --config <FILE>)")?;
    config.language = language;
    config
        .save(path)
        .with_context(|| format!("cannot save config to {}", path.display()))
}

fn save(
    campaign: &mut Campaign,
    description: Option<&str>,
    force: bool,
    t: &Translator,
) -> anyhow::Result<()> {
    match campaign
        .save(description, force)
        .map_err(|e| user_error(e, Operation::Save, t))?
    {
        Some(version) => println!("{}: {}", t.text("save.created"), version.version_number),
        None => println!("{}", t.text("save.unchanged")),
    }
    Ok(())
}

/// What the user asked for when a store call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Save,
    Rollback,
    Export,
}

/// Translation key for the message shown when a store operation fails.
fn failure_key(err: &StoreError, op: Operation) -> &'static str {
    match op {
        _ if err.is_not_found() => "error.rollback_not_found",
        Operation::Save => "error.save_failed",
        Operation::Rollback => "error.rollback_failed",
        Operation::Export => "error.export_failed",
    }
}

fn user_error(err: StoreError, op: Operation, t: &Translator) -> anyhow::Error {
    let message = t.text(failure_key(&err, op)).to_string();
    anyhow::Error::new(err).context(message)
}

fn history_line(version: &Version, t: &Translator) -> String {
    format!(
        "#{:<4} {}  {}",
        version.version_number,
        version.timestamp.format("%Y-%m-%d %H:%M:%S"),
        version
            .description
            .as_deref()
            .unwrap_or_else(|| t.text("history.no_description"))
    )
}
