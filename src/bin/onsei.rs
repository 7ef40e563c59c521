use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use onsei_dl::{
    ApiClient, Config, DownloadConfig, Downloader, Error, SessionStats, format_bytes,
    format_duration,
};

fn print_usage() {
    eprintln!("Usage: onsei [OPTIONS] [RJ_ID]...");
    eprintln!();
    eprintln!("Downloads the media tree of each given work (e.g. RJ123456 or 123456).");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --page <N>          Download every work on catalog page N");
    eprintln!("  --all               Download every work in the catalog");
    eprintln!("  --subtitle <0|1>    Only unsubtitled (0) or subtitled (1) works");
    eprintln!("  -o, --output <DIR>  Download directory (overrides config)");
    eprintln!("  -j, --jobs <N>      Concurrent file transfers (overrides config)");
    eprintln!("  --force             Re-download files that already exist");
    eprintln!("  --config <FILE>     Config file path");
    eprintln!("  -h, --help          Show this help");
}

struct Args {
    ids: Vec<u64>,
    page: Option<u32>,
    all: bool,
    subtitle: Option<bool>,
    output: Option<PathBuf>,
    jobs: Option<usize>,
    force: bool,
    config_path: Option<PathBuf>,
}

fn parse_work_id(arg: &str) -> Option<u64> {
    arg.trim_start_matches("RJ")
        .trim_start_matches("rj")
        .parse()
        .ok()
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        ids: Vec::new(),
        page: None,
        all: false,
        subtitle: None,
        output: None,
        jobs: None,
        force: false,
        config_path: None,
    };

    let raw: Vec<String> = env::args().skip(1).collect();
    let mut i = 0;
    while i < raw.len() {
        match raw[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "--all" => args.all = true,
            "--force" => args.force = true,
            "--page" => {
                i += 1;
                let value = raw.get(i).ok_or("--page requires a value")?;
                args.page = Some(value.parse().map_err(|_| format!("invalid page: {value}"))?);
            }
            "--subtitle" => {
                i += 1;
                match raw.get(i).map(String::as_str) {
                    Some("0") => args.subtitle = Some(false),
                    Some("1") => args.subtitle = Some(true),
                    _ => return Err("--subtitle requires 0 or 1".to_string()),
                }
            }
            "-o" | "--output" => {
                i += 1;
                let value = raw.get(i).ok_or("--output requires a value")?;
                args.output = Some(PathBuf::from(value));
            }
            "-j" | "--jobs" => {
                i += 1;
                let value = raw.get(i).ok_or("--jobs requires a value")?;
                args.jobs = Some(value.parse().map_err(|_| format!("invalid jobs: {value}"))?);
            }
            "--config" => {
                i += 1;
                let value = raw.get(i).ok_or("--config requires a value")?;
                args.config_path = Some(PathBuf::from(value));
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}"));
            }
            other => {
                let id = parse_work_id(other).ok_or(format!("invalid work id: {other}"))?;
                args.ids.push(id);
            }
        }
        i += 1;
    }

    Ok(args)
}

/// Builds a configured HTTP client shared by the API and the transfers.
fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(60))
        .pool_max_idle_per_host(8)
        .tcp_keepalive(Duration::from_secs(30))
        .build()
}

fn print_summary(id: u64, outcomes: &[onsei_dl::FileOutcome], elapsed: Duration) {
    for outcome in outcomes {
        if let onsei_dl::Outcome::Failed(reason) = &outcome.outcome {
            eprintln!("  failed: {} ({reason})", outcome.path.display());
        }
    }
    let stats = SessionStats::from_outcomes(outcomes, elapsed);
    println!(
        "RJ{id}: {} downloaded ({}), {} skipped, {} failed in {} ({}/s avg)",
        stats.downloaded,
        format_bytes(stats.bytes),
        stats.skipped,
        stats.failed,
        format_duration(stats.elapsed),
        format_bytes(stats.average_speed()),
    );
}

#[tokio::main]
async fn main() -> onsei_dl::Result<()> {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if args.ids.is_empty() && args.page.is_none() && !args.all {
        print_usage();
        std::process::exit(0);
    }

    let config_path = args
        .config_path
        .clone()
        .or_else(Config::default_path)
        .ok_or_else(|| Error::Config("no config directory available".to_string()))?;
    let config = Config::load_or_create(&config_path)?;

    if !config.has_credentials() {
        return Err(Error::Config(format!(
            "account/password not set in {}",
            config_path.display()
        )));
    }

    let http = build_http_client()?;
    let mut api = ApiClient::new(http.clone());
    api.login(&config.account, &config.password).await?;

    let subtitle = args.subtitle.or(config.subtitle);
    let mut ids = args.ids.clone();
    if let Some(page) = args.page {
        let listing = api.work_page(page, subtitle).await?;
        ids.extend(listing.works.iter().map(|w| w.id));
    } else if args.all {
        let first = api.work_page(1, subtitle).await?;
        ids.extend(first.works.iter().map(|w| w.id));
        let total_pages = u32::try_from(first.pagination.total_pages()).unwrap_or(u32::MAX);
        for page in 2..=total_pages {
            match api.work_page(page, subtitle).await {
                Ok(listing) => ids.extend(listing.works.iter().map(|w| w.id)),
                Err(e) => log::error!("listing page {page} failed: {e}"),
            }
        }
    }

    let mut base_dir = args.output.unwrap_or_else(|| config.download_dir.clone());
    // Subtitled and unsubtitled runs mirror into separate subdirectories.
    match subtitle {
        Some(true) => base_dir.push("subtitle"),
        Some(false) => base_dir.push("nosubtitle"),
        None => {}
    }

    let download_config = DownloadConfig::new()
        .with_concurrent_files(args.jobs.unwrap_or(config.max_workers))
        .with_force_overwrite(args.force);
    let downloader = Downloader::new(http, download_config);

    println!("{} work(s) to download", ids.len());
    for id in ids {
        let tracks = match api.work_tracks(id).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log::error!("fetching tracks for RJ{id} failed: {e}");
                continue;
            }
        };

        let work_dir = base_dir.join(format!("RJ{id}"));
        let start = Instant::now();
        match downloader.download_item(&tracks, &work_dir).await {
            Ok(outcomes) => print_summary(id, &outcomes, start.elapsed()),
            Err(e) => log::error!("RJ{id} failed: {e}"),
        }
    }

    Ok(())
}
