use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::Receiver;
use directories::ProjectDirs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use linkdeckapp::api::{
    CardAction, CardSettings, CmdResult, ExportFormat, LinkDeckApi, LinkFilter, LinkUpdate,
};
use linkdeckapp::config::LinkDeckConfig;
use linkdeckapp::events::{AppEvent, EventBus};
use linkdeckapp::i18n::{keys, t, tf};
use linkdeckapp::model::OrderBy;
use linkdeckapp::store::fs::FileStore;

use super::render::{
    print_entries, print_languages, print_links, print_messages, print_preview_rows,
};
use super::setup::{
    CardArgs, CardCommands, Cli, Commands, ConfigCommands, DataCommands, ImportCommands,
    LinkCommands, MiscCommands,
};

struct AppContext {
    api: LinkDeckApi<FileStore>,
    config: LinkDeckConfig,
    data_dir: PathBuf,
    events: Receiver<AppEvent>,
}

/// Runs the CLI. `Ok(false)` means the command reported an error message.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = init_context(&cli)?;

    let outcome = match cli.command {
        Some(Commands::Link(cmd)) => match cmd {
            LinkCommands::Add {
                url,
                name,
                language,
            } => handle_add(&mut ctx, &name, &language, &url),
            LinkCommands::List {
                search,
                language,
                order,
                json,
            } => handle_list(&ctx, search, language, &order, json),
            LinkCommands::Edit {
                indexes,
                name,
                language,
                url,
            } => handle_edit(
                &mut ctx,
                &indexes,
                LinkUpdate {
                    name,
                    language,
                    url,
                },
            ),
            LinkCommands::Delete { indexes } => handle_delete(&mut ctx, &indexes),
            LinkCommands::Languages => handle_languages(&ctx),
            LinkCommands::Card(card) => match card {
                CardCommands::Render {
                    url,
                    title,
                    options,
                } => handle_card_render(&mut ctx, &title, &url, &options),
                CardCommands::Export { indexes, options } => {
                    handle_card_export(&mut ctx, &indexes, &options)
                }
            },
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Import(ImportCommands::Preview { file }) => {
                handle_import(&mut ctx, file.as_deref(), false)
            }
            DataCommands::Import(ImportCommands::Commit { file }) => {
                handle_import(&mut ctx, file.as_deref(), true)
            }
            DataCommands::Export {
                format,
                output,
                indexes,
            } => handle_export(&ctx, &format, output.as_deref(), &indexes),
        },
        Some(Commands::Misc(MiscCommands::Config(cmd))) => handle_config(&ctx, cmd),
        None => handle_list(&ctx, None, None, "newest", false),
    };

    drain_events(&ctx);
    outcome
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "linkdeck=debug,linkdeckapp=debug"
    } else {
        "linkdeck=warn,linkdeckapp=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// `--data-dir`/`LINKDECK_DATA_DIR`, else the OS data dir.
fn resolve_data_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.data_dir {
        return dir.clone();
    }
    ProjectDirs::from("", "", "linkdeck")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".linkdeck"))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli);
    let mut config = LinkDeckConfig::load(&data_dir)
        .with_context(|| format!("Failed to load {}", data_dir.display()))?;
    if let Some(user) = &cli.user {
        config.user = user.clone();
    }
    if let Some(lang) = &cli.lang {
        config.lang = lang.clone();
    }

    let lang = config.lang()?;
    let user = config.user_scope()?;
    let store = (!user.is_guest()).then(|| FileStore::new(data_dir.clone()));
    debug!(data_dir = %data_dir.display(), user = %user, %lang, "context ready");

    let mut bus = EventBus::new();
    let events = bus.subscribe();
    let api = LinkDeckApi::new(store, user, lang, bus)?;

    Ok(AppContext {
        api,
        config,
        data_dir,
        events,
    })
}

fn drain_events(ctx: &AppContext) {
    let lang = ctx.api.lang();
    for event in ctx.events.try_iter() {
        match event {
            AppEvent::GuestModeEntered => eprintln!("{}", t(lang, keys::GUEST_MODE)),
            AppEvent::UpdateAvailable { version } => {
                eprintln!("{}", tf(lang, keys::UPDATE_AVAILABLE, &[("version", &version)]))
            }
            other => debug!(event = ?other, "event"),
        }
    }
}

/// Prints the messages and reports whether the command succeeded.
fn finish(result: &CmdResult) -> Result<bool> {
    print_messages(&result.messages);
    Ok(!result.has_errors())
}

fn handle_add(ctx: &mut AppContext, name: &str, language: &str, url: &str) -> Result<bool> {
    let result = ctx.api.add_link(name, language, url)?;
    finish(&result)
}

fn handle_list(
    ctx: &AppContext,
    search: Option<String>,
    language: Option<String>,
    order: &str,
    json: bool,
) -> Result<bool> {
    let order: OrderBy = order.parse()?;
    let filter = LinkFilter { search, language };
    let result = ctx.api.list_links(order, &filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.listed_links)?);
        return Ok(true);
    }
    print_links(&result.listed_links);
    finish(&result)
}

fn handle_edit(ctx: &mut AppContext, indexes: &[String], update: LinkUpdate) -> Result<bool> {
    let result = ctx.api.edit_links(indexes, &update)?;
    finish(&result)
}

fn handle_delete(ctx: &mut AppContext, indexes: &[String]) -> Result<bool> {
    let result = ctx.api.delete_links(indexes)?;
    finish(&result)
}

fn handle_languages(ctx: &AppContext) -> Result<bool> {
    let result = ctx.api.languages()?;
    print_languages(&result.languages);
    finish(&result)
}

fn read_input(file: Option<&Path>) -> Result<(String, Option<String>)> {
    match file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let hint = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            Ok((raw, hint))
        }
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read stdin")?;
            Ok((raw, None))
        }
    }
}

fn handle_import(ctx: &mut AppContext, file: Option<&Path>, commit: bool) -> Result<bool> {
    let (raw, hint) = read_input(file)?;
    let preview = ctx.api.import_preview(&raw, hint.as_deref());
    print_preview_rows(&preview.preview_rows);
    print_messages(&preview.messages);
    if !commit || preview.has_errors() {
        return Ok(!preview.has_errors());
    }

    let result = ctx.api.import_commit(&preview.preview_rows)?;
    finish(&result)
}

fn handle_export(
    ctx: &AppContext,
    format: &str,
    output: Option<&Path>,
    indexes: &[String],
) -> Result<bool> {
    let format: ExportFormat = format.parse()?;
    let result = ctx.api.export_links(format, indexes, output)?;
    if let Some(text) = &result.output {
        print!("{}", text);
    }
    finish(&result)
}

fn card_settings(ctx: &AppContext, args: &CardArgs) -> Result<(CardSettings, CardAction)> {
    let mut config = ctx.config.clone();
    if let Some(size) = &args.size {
        config.card.size = size.clone();
    }
    if let Some(orientation) = &args.orientation {
        config.card.orientation = orientation.clone();
    }
    if let Some(font) = &args.font {
        config.card.font = font.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }

    let mut settings = CardSettings::from_config(&config)?;
    settings.open_preview = !args.no_open;
    Ok((settings, args.action.parse()?))
}

fn handle_card_render(ctx: &mut AppContext, title: &str, url: &str, args: &CardArgs) -> Result<bool> {
    let (settings, action) = card_settings(ctx, args)?;
    let result = ctx.api.render_card(&settings, title, url, action)?;
    finish(&result)
}

fn handle_card_export(ctx: &mut AppContext, indexes: &[String], args: &CardArgs) -> Result<bool> {
    let (settings, action) = card_settings(ctx, args)?;
    let result = ctx.api.export_cards(&settings, indexes, action)?;
    finish(&result)
}

fn handle_config(ctx: &AppContext, cmd: ConfigCommands) -> Result<bool> {
    match cmd {
        ConfigCommands::Show => print_entries(&ctx.config.entries()),
        ConfigCommands::Template => print!("{}", LinkDeckConfig::template()),
        ConfigCommands::Path => println!("{}", ctx.data_dir.display()),
    }
    Ok(true)
}
