//! Performance check
//!
//! Hammers one engine with random transfers from concurrent workers.
//!
//! Run with: cargo run --bin performance_check --release -- --accounts 10 --workers 20 --duration 10s

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger_engine::{
    AccountId, Config, Ledger, LedgerError, LogFormat, OperationContext, TransferRequest,
};

struct Args {
    accounts: usize,
    workers: usize,
    duration: Duration,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = std::env::args().collect();
    let flag = |name: &str| {
        args.iter()
            .position(|a| a == name)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };

    let accounts: usize = flag("--accounts")
        .map(|s| s.parse())
        .transpose()
        .context("--accounts must be a number")?
        .unwrap_or(10);
    let workers: usize = flag("--workers")
        .map(|s| s.parse())
        .transpose()
        .context("--workers must be a number")?
        .unwrap_or(20);
    let duration = parse_duration(&flag("--duration").unwrap_or_else(|| "10s".to_string()))?;

    if accounts < 2 {
        bail!("Need at least 2 accounts to perform transfers");
    }
    if workers == 0 {
        bail!("Need at least 1 worker");
    }

    Ok(Args {
        accounts,
        workers,
        duration,
    })
}

/// Parse `500ms`, `30s`, `5m` or `1h`
fn parse_duration(raw: &str) -> anyhow::Result<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .with_context(|| format!("Duration `{raw}` is missing a unit"))?;
    let (value, unit) = raw.split_at(split);
    let value: u64 = value
        .parse()
        .with_context(|| format!("Error parsing runtime duration `{raw}`"))?;

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 3600)),
        _ => bail!("Unknown duration unit `{unit}` in `{raw}`"),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ledger_engine=info,performance_check=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let args = parse_args()?;
    let ledger = Ledger::new(&config);
    tracing::info!(
        environment = %config.environment,
        accounts = args.accounts,
        workers = args.workers,
        "Starting performance check"
    );

    println!("Creating {} accounts", args.accounts);
    let mut account_ids: Vec<AccountId> = Vec::with_capacity(args.accounts);
    for _ in 0..args.accounts {
        let account = ledger.create_account("acct", "USD").await?;
        account_ids.push(account.id().clone());
    }
    let account_ids = Arc::new(account_ids);

    println!(
        "Starting {} workers to run transfers for {:?}",
        args.workers, args.duration
    );

    let completed = Arc::new(AtomicU64::new(0));
    let aborted = Arc::new(AtomicU64::new(0));
    let start = Instant::now();
    let deadline = start + args.duration;

    let mut handles = Vec::with_capacity(args.workers);
    for _ in 0..args.workers {
        let ledger = ledger.clone();
        let account_ids = Arc::clone(&account_ids);
        let completed = Arc::clone(&completed);
        let aborted = Arc::clone(&aborted);

        handles.push(tokio::spawn(async move {
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Ok::<(), LedgerError>(());
                }

                let (from, to, amount) = {
                    let mut rng = rand::thread_rng();
                    let mut pair = account_ids.choose_multiple(&mut rng, 2);
                    let (Some(from), Some(to)) = (pair.next(), pair.next()) else {
                        return Ok(());
                    };
                    (from.clone(), to.clone(), rng.gen_range(1..=u32::MAX))
                };

                let context = OperationContext::new().with_timeout(remaining);
                match ledger
                    .create_transfer_with_context(TransferRequest::new(from, to, amount), context)
                    .await
                {
                    Ok(_) => {
                        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        if done % 10_000 == 0 {
                            println!(
                                "- Completed {} transfers so far (elapsed: {} seconds)",
                                done,
                                start.elapsed().as_secs()
                            );
                        }
                    }
                    // cut off by the end of the run
                    Err(err) if err.is_retryable() => {
                        aborted.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(err) => return Err(err),
                }
            }
        }));
    }

    println!("Waiting for workers to finish (up to {:?})...", args.duration);
    for handle in handles {
        handle.await??;
    }
    let elapsed = start.elapsed();

    let mut total = Decimal::ZERO;
    for id in account_ids.iter() {
        total += ledger.get_account(id).await?.balance();
    }
    if !total.is_zero() {
        bail!("Ledger is unbalanced: accounts sum to {total}");
    }

    let total_completed = completed.load(Ordering::Relaxed);
    let seconds = elapsed.as_secs_f64();
    let per_second = if seconds > 0.0 {
        total_completed as f64 / seconds
    } else {
        0.0
    };
    let ms_per_transfer = if total_completed > 0 {
        elapsed.as_millis() as f64 / total_completed as f64 * args.workers as f64
    } else {
        0.0
    };

    println!("\n=== Performance Check Results ===");
    println!("Completed transfers: {}", total_completed);
    println!("Aborted at deadline: {}", aborted.load(Ordering::Relaxed));
    println!("Elapsed time in seconds: {:.1}", seconds);
    println!("Transfers/second: {:.1}", per_second);
    println!("Milliseconds/transfer: {:.1}", ms_per_transfer);
    println!("Sum of balances: {}", total);

    Ok(())
}
