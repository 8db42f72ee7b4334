use std::fs;
use std::io;
use std::path::PathBuf;

use resell_dashboard::api::{ChartBinding, DashboardConfig, RefreshScheduler};
use resell_dashboard::render::{JsonLinesRenderer, NullRenderer, Renderer};
use resell_dashboard::source::{DataSource, JsonFileSource};
use resell_dashboard::telemetry::init_default_tracing;

const USAGE: &str = "Usage: resell-dashboard (--file <records.json> | --url <endpoint>) \
[--config <config.json>] [--cycles <n>] [--frames]";

enum SourceArg {
    File(PathBuf),
    Url(String),
}

struct CliArgs {
    source: SourceArg,
    config_path: Option<PathBuf>,
    cycles: Option<u64>,
    emit_frames: bool,
}

fn main() {
    let _ = init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let config = match &args.config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            DashboardConfig::from_json_str(&raw).map_err(|err| err.to_string())?
        }
        None => DashboardConfig::default(),
    };

    let source = build_source(&args.source, &config)?;
    let renderer: Box<dyn Renderer> = if args.emit_frames {
        Box::new(JsonLinesRenderer::new(io::stdout()))
    } else {
        Box::new(NullRenderer::default())
    };
    let binding = ChartBinding::new(renderer, config).map_err(|err| err.to_string())?;
    let mut scheduler = RefreshScheduler::new(source, binding);

    let cycles = args.cycles;
    scheduler.run_blocking(|stats| cycles.is_some_and(|limit| stats.attempts >= limit));

    let stats = scheduler.stats();
    eprintln!(
        "refreshes: {} ok, {} failed, {} coalesced",
        stats.successes, stats.failures, stats.coalesced_ticks
    );
    if stats.successes == 0 {
        return Err(stats
            .last_error
            .clone()
            .unwrap_or_else(|| "no refresh completed".to_owned()));
    }
    Ok(())
}

fn build_source(source: &SourceArg, config: &DashboardConfig) -> Result<Box<dyn DataSource>, String> {
    match source {
        SourceArg::File(path) => Ok(Box::new(JsonFileSource::new(path))),
        #[cfg(feature = "http-source")]
        SourceArg::Url(url) => {
            let source = resell_dashboard::source::HttpJsonSource::new(
                url.clone(),
                config.fetch_timeout(),
            )
            .map_err(|err| err.to_string())?;
            Ok(Box::new(source))
        }
        #[cfg(not(feature = "http-source"))]
        SourceArg::Url(url) => {
            let _ = config;
            Err(format!(
                "--url `{url}` requires building with the `http-source` feature"
            ))
        }
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut source = None;
    let mut config_path = None;
    let mut cycles = None;
    let mut emit_frames = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --file".to_owned())?;
                source = Some(SourceArg::File(PathBuf::from(value)));
            }
            "--url" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --url".to_owned())?;
                source = Some(SourceArg::Url(value));
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                config_path = Some(PathBuf::from(value));
            }
            "--cycles" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --cycles".to_owned())?;
                let parsed = value
                    .parse::<u64>()
                    .map_err(|err| format!("invalid --cycles `{value}`: {err}"))?;
                cycles = Some(parsed);
            }
            "--frames" => emit_frames = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument `{arg}`"));
            }
        }
    }

    let source = source.ok_or_else(|| format!("a data source is required\n{USAGE}"))?;
    Ok(CliArgs {
        source,
        config_path,
        cycles,
        emit_frames,
    })
}
