//! dash-runner: headless runner for the merchant investigation dashboard.
//!
//! Usage:
//!   dash-runner --seed 12345 --timeframe 24h --threshold 2.5
//!   dash-runner --search payment --severity High --sort dateIdentified --desc
//!   dash-runner --config data/dashboard.json --ipc-mode

use anyhow::Result;
use merchant_risk_core::{
    activity::ActivityPeriod,
    clock::SystemClock,
    config::DashboardConfig,
    dashboard::Dashboard,
    filter::{FilterCriteria, SortSpec},
    notification::LogSink,
    series::{GeneratedSeries, Timeframe},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GenerateSeries {
        #[serde(default)]
        timeframe: Option<Timeframe>,
        #[serde(default)]
        threshold: Option<f64>,
    },
    FilterRisks {
        #[serde(default)]
        criteria: FilterCriteria,
        #[serde(default)]
        sort: Option<SortSpec>,
    },
    FilterEvents {
        #[serde(default)]
        criteria: FilterCriteria,
        #[serde(default)]
        sort: Option<SortSpec>,
    },
    Activity {
        timeframe: Timeframe,
    },
    Quit,
}

type RunnerDashboard = Dashboard<SystemClock, LogSink>;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let mut config = match str_arg(&args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);

    let timeframe: Timeframe = match str_arg(&args, "--timeframe") {
        Some(tf) => tf.parse()?,
        None => config.series.timeframe,
    };
    let threshold = parse_arg(&args, "--threshold", config.series.anomaly_threshold);

    if !ipc_mode {
        println!("Merchant Investigation Dashboard: dash-runner");
        println!("  seed:       {}", config.seed);
        println!("  timeframe:  {timeframe}");
        println!("  threshold:  {threshold}");
        println!();
    }

    let mut dashboard = Dashboard::new(config, SystemClock, LogSink);

    if ipc_mode {
        run_ipc_loop(&mut dashboard)?;
    } else {
        let series = dashboard.refresh_transaction_pattern(Some(timeframe), Some(threshold))?;
        print_series_summary(&series);
        print_risk_register(&dashboard, &args);
    }

    Ok(())
}

fn run_ipc_loop(dashboard: &mut RunnerDashboard) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("ipc: rejected command: {e}");
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GenerateSeries { timeframe, threshold } => {
                match dashboard.refresh_transaction_pattern(timeframe, threshold) {
                    Ok(series) => serde_json::to_value(&series)?,
                    Err(e) => serde_json::json!({ "error": e.to_string() }),
                }
            }
            IpcCommand::FilterRisks { criteria, sort } => {
                serde_json::to_value(dashboard.risk_register(&criteria, sort.as_ref()))?
            }
            IpcCommand::FilterEvents { criteria, sort } => {
                serde_json::to_value(dashboard.event_timeline(&criteria, sort.as_ref()))?
            }
            IpcCommand::Activity { timeframe } => {
                serde_json::to_value(dashboard.activity(ActivityPeriod::from(timeframe)))?
            }
        };
        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_series_summary(series: &GeneratedSeries) {
    println!("=== TRANSACTION PATTERN ===");
    println!("  points:     {}", series.len());
    println!("  mean:       ${:.2}", series.stats.mean);
    println!("  std dev:    ${:.2}", series.stats.std_dev);
    println!("  range:      ${:.2} - ${:.2}", series.stats.min, series.stats.max);
    println!(
        "  outlier:    #{} (x{})",
        series.outlier_index, series.outlier_multiplier
    );
    if series.anomaly_indices.is_empty() {
        println!("  (No anomalies above z={})", series.threshold);
    } else {
        for p in series.anomalies() {
            let z = series.stats.z_score(p.value);
            println!("  ⚠ {} | ${:.2} | z={z:.2}", p.label, p.value);
        }
    }
    println!();
}

fn print_risk_register(dashboard: &RunnerDashboard, args: &[String]) {
    let mut criteria = FilterCriteria::new();
    if let Some(term) = str_arg(args, "--search") {
        criteria = criteria.search(term);
    }
    for field in ["category", "severity", "status"] {
        if let Some(value) = str_arg(args, &format!("--{field}")) {
            criteria = criteria.with_filter(field, value);
        }
    }
    let sort = str_arg(args, "--sort").map(|key| {
        if args.iter().any(|a| a == "--desc") {
            SortSpec::desc(key)
        } else {
            SortSpec::asc(key)
        }
    });

    let risks = dashboard.risk_register(&criteria, sort.as_ref());
    println!("=== RISK REGISTER ({} of {}) ===", risks.len(), dashboard.risks().len());
    if risks.is_empty() {
        println!("  (No risks match)");
    }
    for r in &risks {
        println!(
            "  {} | {:<30} | {:<11} | {:<6} | {}",
            r.id,
            r.text("title").unwrap_or("-"),
            r.text("category").unwrap_or("-"),
            r.text("severity").unwrap_or("-"),
            r.text("status").unwrap_or("-"),
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
