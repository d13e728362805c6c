use clap::Parser;
use poolusage::{
    Config, DateRange, Format, GroupBy, PrometheusSource, Report, SeriesPolicy, Step, UsageQuery,
    DEFAULT_LABEL, DEFAULT_METRIC,
};
use std::{process::ExitCode, time::Duration};

/// Storage pool usage report from Prometheus (or Grafana's datasource proxy)
#[derive(Parser, Debug)]
#[command(name = "poolusage", version, about)]
struct Cli {
    /// ID of the pool
    #[arg(long)]
    pool_id: String,

    /// Start date, format YYYY-MM-DD (inclusive)
    #[arg(long)]
    from_date: String,

    /// End date, format YYYY-MM-DD (inclusive)
    #[arg(long)]
    to_date: String,

    /// Group by day or month
    #[arg(long, default_value = "day", value_parser = ["day", "month"])]
    group_by: String,

    /// Base URL of Prometheus, or of Grafana if --grafana-datasource is set
    #[arg(long, env = "POOLUSAGE_URL")]
    url: String,

    /// Query through Grafana's proxy for this datasource ID
    #[arg(long)]
    grafana_datasource: Option<u64>,

    /// Bearer token for the Authorization header
    #[arg(long, env = "GRAFANA_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Metric holding the bytes used
    #[arg(long, default_value = DEFAULT_METRIC)]
    metric: String,

    /// Label identifying the pool
    #[arg(long, default_value = DEFAULT_LABEL)]
    label: String,

    /// Query resolution, e.g. 1h, 30m, 1h30m
    #[arg(long, default_value = "1h")]
    step: Step,

    /// Request timeout, e.g. 30s, 2m
    #[arg(long, default_value = "30s", value_parser = parse_timeout)]
    timeout: Duration,

    /// What to do if more than one series matches: fail (single) or use the first one (first)
    #[arg(long, default_value = "single", value_parser = ["single", "first"])]
    series: String,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Print at most this many rows
    #[arg(long)]
    limit: Option<usize>,
}

fn parse_timeout(s: &str) -> poolusage::Result<Duration> {
    s.parse::<Step>().map(|step| step.as_duration())
}

fn run(cli: &Cli) -> poolusage::Result<()> {
    let group_by: GroupBy = cli.group_by.parse()?;
    let series_policy: SeriesPolicy = cli.series.parse()?;
    let format: Format = cli.format.parse()?;

    let range = DateRange::inclusive(&cli.from_date, &cli.to_date)?;

    let config = match cli.grafana_datasource {
        Some(datasource_id) => Config::grafana(&cli.url, datasource_id),
        None => Config::prometheus(&cli.url),
    }
    .metric(&cli.metric)
    .label(&cli.label)
    .step(cli.step)
    .timeout(cli.timeout)
    .token(cli.token.clone())
    .series_policy(series_policy);

    let source = PrometheusSource::new(config)?;

    log::info!(
        "pool {}: {range} by {group_by} from {}",
        cli.pool_id,
        source.config().backend().query_range_url()
    );

    let rows = UsageQuery::new(&source, &cli.pool_id, range)
        .step(source.step())
        .group_by(group_by)
        .run()?;

    Report {
        pool_id: &cli.pool_id,
        range: &range,
        group_by,
        rows: &rows,
    }
    .limit(cli.limit)
    .write(std::io::stdout().lock(), format)
}

fn main() -> ExitCode {
    env_logger::builder()
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("poolusage", log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
