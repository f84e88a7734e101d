// berri-launch - your recent files, straight from the shortcuts Windows leaves behind
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use anyhow::{bail, Context, Result};
use berri_launch_lib::{
    core::{EntryFilter, HistoryAggregator, HistoryIndex, Searcher, SortOrder},
    logging,
    store::{snapshot, Origin},
    Config, LaunchError,
};
use chrono::Local;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    // Grab whatever the user typed, minus the verbosity switch
    let (verbose, args): (Vec<String>, Vec<String>) = env::args()
        .skip(1)
        .partition(|arg| arg == "-v" || arg == "--verbose");
    logging::init(!verbose.is_empty());

    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    let result = match command.as_str() {
        "list" => handle_list(&args[1..]).await,
        "search" => handle_search(&args[1..]).await,
        "scan" => handle_scan(&args[1..]).await,
        "decode" => handle_decode(&args[1..]),
        "status" => handle_status().await,
        "version" | "--version" => {
            println!("berri-launch v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    // Library errors get the friendly wording, everything else as-is
    if let Err(e) = &result {
        if let Some(launch) = e.downcast_ref::<LaunchError>() {
            eprintln!("Error: {}", launch.user_message());
            std::process::exit(1);
        }
    }
    result
}

/// Pull the value following `flag`, if any
fn take_option(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

async fn load_config() -> Result<Config> {
    Ok(Config::load().await?)
}

async fn gather(config: &Config) -> Result<HistoryIndex> {
    let aggregator = HistoryAggregator::from_config(config)?;
    Ok(aggregator.gather(config).await?)
}

fn parse_filter(args: &[String]) -> Result<EntryFilter> {
    match take_option(args, "--filter") {
        Some(name) => match EntryFilter::parse(&name) {
            Some(filter) => Ok(filter),
            None => bail!("Unknown filter '{}'", name),
        },
        None => Ok(EntryFilter::All),
    }
}

async fn handle_list(args: &[String]) -> Result<()> {
    let order = match take_option(args, "--sort").as_deref() {
        None | Some("path") => SortOrder::Path,
        Some("time") | Some("recent") => SortOrder::Recency,
        Some(other) => bail!("Unknown sort order '{}' (use path or time)", other),
    };
    let filter = parse_filter(args)?;
    let save = args.iter().any(|arg| arg == "--save");

    let config = load_config().await?;
    let mut index = gather(&config).await?;

    if save {
        let path = config.history_path()?;
        snapshot::save(&index, &path)
            .await
            .with_context(|| format!("saving history to {}", path.display()))?;
    }

    index.sort(order);
    for entry in filter.apply(&index) {
        println!("{}", entry.path);
    }

    Ok(())
}

async fn handle_search(args: &[String]) -> Result<()> {
    let filter = parse_filter(args)?;

    // Everything that isn't the --filter pair is the query
    let mut words = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--filter" {
            i += 2;
            continue;
        }
        words.push(args[i].as_str());
        i += 1;
    }

    if words.is_empty() {
        eprintln!("Error: No search query provided");
        return Ok(());
    }
    let query = words.join(" ");

    let config = load_config().await?;
    let index = gather(&config).await?;
    let results = Searcher::new().search(&index, &query, &filter, 20);

    if results.is_empty() {
        println!("No entries found matching '{}'", query);
    } else {
        println!("\nFound {} entr(ies) matching '{}':", results.len(), query);
        println!("{}", "=".repeat(60));
        for (i, result) in results.iter().enumerate() {
            let marker = if result.entry.is_dir { "/" } else { " " };
            println!(
                "{:3}. {}{} ({})",
                i + 1,
                result.entry.path,
                marker,
                result
                    .entry
                    .last_access
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
            );
        }
        println!("{}", "=".repeat(60));
    }

    Ok(())
}

async fn handle_scan(args: &[String]) -> Result<()> {
    let mut dir: Option<&str> = None;
    let mut origin = Origin::User;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--origin" => {
                i += 1;
                if i < args.len() {
                    origin = args[i].parse().map_err(anyhow::Error::msg)?;
                }
            }
            arg => dir = Some(arg),
        }
        i += 1;
    }

    let Some(dir) = dir else {
        eprintln!("Error: No directory provided");
        return Ok(());
    };

    let config = load_config().await?;
    let resolver = config.resolver()?;
    let mut records = resolver.resolve_dir(PathBuf::from(dir), origin).await?;
    records.sort_by(|a, b| a.source_path.cmp(&b.source_path));

    if records.is_empty() {
        println!("No live shortcuts in {}", dir);
        return Ok(());
    }

    println!("\nShortcuts in {}:", dir);
    println!("{}", "=".repeat(60));
    for record in &records {
        let name = record
            .source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("  {}", name);
        println!("    -> {}", record.target().unwrap_or("?"));
        if !record.arguments.is_empty() {
            println!("       args: {}", record.arguments);
        }
    }
    println!("{}", "=".repeat(60));
    println!("{} resolved ({})", records.len(), origin);

    Ok(())
}

fn handle_decode(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: No shortcut file provided");
        return Ok(());
    }

    let decoder = Config::default().decoder()?;

    for arg in args {
        let path = Path::new(arg);
        println!("\n{}", path.display());

        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut reader = BufReader::new(file);

        let header = match decoder.read_header(&mut reader) {
            Ok(header) => header,
            Err(e) => {
                println!("  error: {}", e.user_message());
                continue;
            }
        };
        let flags = header.link_flags;
        println!(
            "  flags: id_list={} link_info={} unicode={} arguments={} directory={}",
            flags.has_link_target_id_list,
            flags.has_link_info,
            flags.is_unicode,
            flags.has_arguments,
            header.attributes.directory
        );

        match decoder.decode(&mut reader) {
            Ok(link) => {
                if let Some(local) = &link.local_path {
                    println!("  local:     {}", local);
                }
                if let Some(network) = &link.network_path {
                    println!("  network:   {}", network);
                }
                if !link.arguments.is_empty() {
                    println!("  arguments: {}", link.arguments);
                }
            }
            Err(e) => println!("  error: {}", e.user_message()),
        }
    }

    Ok(())
}

async fn handle_status() -> Result<()> {
    let config_path = Config::default_path()?;
    let config = load_config().await?;
    let history_path = config.history_path()?;
    let cached = snapshot::load(&history_path, config.merge_policy).await;

    let on_off = |enabled: bool| if enabled { "enabled" } else { "disabled" };

    println!("\nberri-launch Status");
    println!("{}", "=".repeat(60));

    println!("\nConfiguration:");
    println!("  File:      {}", config_path.display());
    println!("  Encoding:  {}", config.legacy_encoding()?.name());
    println!("  Merge:     {:?}", config.merge_policy);
    println!("  Workers:   {}", config.resolver()?.workers());

    println!("\nSources:");
    println!(
        "  Recent:    {} ({})",
        on_off(config.enable_recent),
        config.recent_dir()?.display()
    );
    println!(
        "  Folders:   {} ({} configured)",
        on_off(config.enable_user),
        config.folders.len()
    );
    println!("  History:   {}", on_off(config.enable_history));

    println!("\nHistory Snapshot:");
    println!("  File:      {}", history_path.display());
    println!("  Entries:   {}", cached.len());

    println!("{}", "=".repeat(60));

    Ok(())
}

fn print_usage() {
    println!(
        r#"berri-launch v{} - Your recent files, one keystroke away

USAGE:
    berri-launch [-v] <COMMAND> [OPTIONS]

COMMANDS:
    list [--sort path|time] [--filter NAME] [--save]
                           Print every known path
    search <query> [--filter NAME]
                           Fuzzy-search the history
    scan <dir> [--origin recent|user|cache]
                           Resolve the shortcuts in one folder
    decode <file.lnk>...   Show what a shortcut points at
    status                 Show configuration and sources
    version                Show version
    help                   Show this help

FILTERS:
    all, folder, excel, word, ppt, pdf, visio, txt, or a list like .csv,.md

EXAMPLES:
    berri-launch list --sort time | fzf
    berri-launch search budget --filter excel
    berri-launch decode report.lnk
    BERRI_LAUNCH_LOG=debug berri-launch list --save
"#,
        env!("CARGO_PKG_VERSION")
    );
}
