mod config;
mod main_lib;
mod render;

use std::time::Duration;

use anyhow::bail;
use clap::{Parser, Subcommand};
use nexora_core::sync::{
    DashboardSync, HoldingsSync, LoadOutcome, LoadRefusal, ScrollMetrics, SearchSync,
    WithdrawalPrices,
};
use rust_decimal::Decimal;

use config::Config;
use main_lib::{build_context, init_tracing, wait_until, AppContext};

/// How long a one-shot command waits for its first fetch.
const FETCH_WAIT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(author, version, about = "Nexora market terminal", long_about = None)]
struct Cli {
    /// Print snapshots as JSON instead of tables
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Global stats and the market list, scrolled `pages` times
    Dashboard {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Keep the dashboard mounted and print every global stats refresh
    Watch {
        /// Access key to sign the session in with
        #[arg(long, env = "NEXORA_ACCESS_KEY")]
        access_key: String,
        /// Stop after this many refreshes (0 = until Ctrl-C)
        #[arg(long, default_value_t = 0)]
        ticks: u64,
    },
    /// Search the market; an empty query lists the top assets
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Synthetic holdings priced from the top of the market
    Portfolio,
    /// Withdrawal prices and balances, optionally checking an amount
    Prices {
        #[arg(long, requires = "amount")]
        asset: Option<String>,
        #[arg(long, requires = "asset")]
        amount: Option<Decimal>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(&config.log_format);
    let context = build_context(&config)?;

    match cli.command {
        Command::Dashboard { pages } => dashboard(&context, pages, cli.json).await,
        Command::Watch { access_key, ticks } => watch(&context, &access_key, ticks).await,
        Command::Search { query } => search(&context, &query, cli.json).await,
        Command::Portfolio => portfolio(&context, cli.json).await,
        Command::Prices { asset, amount } => prices(&context, asset.zip(amount)).await,
    }
}

async fn dashboard(context: &AppContext, pages: u32, json: bool) -> anyhow::Result<()> {
    let view = DashboardSync::new(
        context.provider.clone(),
        context.cache.clone(),
        context.sync.clone(),
    );
    let token = view.mount();

    // Global stats and the first page.
    if !wait_until(FETCH_WAIT, || view.snapshot().status.resolved >= 2).await {
        tracing::warn!("Timed out waiting for the dashboard, showing cached data");
    }

    // Each extra page is one scroll to the bottom of the list.
    let bottom = ScrollMetrics::new(0.0, 0.0, 0.0);
    for _ in 1..pages {
        let outcome = loop {
            match view.on_scroll(&token, bottom).await {
                Some(LoadOutcome::Refused(LoadRefusal::Throttled { remaining })) => {
                    tokio::time::sleep(remaining).await;
                }
                Some(LoadOutcome::Refused(LoadRefusal::InFlight)) => {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                other => break other,
            }
        };
        tracing::info!("Scroll load: {:?}", outcome);
        if view.snapshot().cursor.exhausted {
            break;
        }
    }

    let state = view.snapshot();
    view.unmount();

    if json {
        println!("{}", serde_json::to_string_pretty(&state.assets)?);
        return Ok(());
    }
    println!(
        "{}",
        render::global_summary(state.global.as_ref(), state.last_synced.as_deref())
    );
    println!("[{}]", render::status_line(&state.status));
    print!("{}", render::market_table(&state.assets));
    Ok(())
}

async fn watch(context: &AppContext, access_key: &str, ticks: u64) -> anyhow::Result<()> {
    context.session.sign_in(access_key)?;
    if context.session.should_show_welcome()? {
        println!(
            "Welcome to the Nexora terminal. Market data refreshes every {:?}.",
            context.sync.refresh_interval
        );
        context.session.dismiss_welcome()?;
    }

    let view = DashboardSync::new(
        context.provider.clone(),
        context.cache.clone(),
        context.sync.clone(),
    );
    view.mount();

    let mut seen = 0;
    let mut printed = 0;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(Duration::from_millis(200)) => {}
        }

        let state = view.snapshot();
        if state.status.resolved == seen {
            continue;
        }
        seen = state.status.resolved;
        println!(
            "{} [{}]",
            render::global_summary(state.global.as_ref(), state.last_synced.as_deref()),
            render::status_line(&state.status)
        );
        printed += 1;
        if ticks > 0 && printed >= ticks {
            break;
        }
    }

    view.unmount();
    context.session.sign_out()?;
    Ok(())
}

async fn search(context: &AppContext, query: &str, json: bool) -> anyhow::Result<()> {
    let view = SearchSync::new(
        context.provider.clone(),
        context.cache.clone(),
        context.sync.clone(),
    );
    let token = view.mount();
    let outcome = view.submit(&token, query).await;
    tracing::info!("Search '{}': {:?}", query, outcome);

    let state = view.snapshot();
    view.unmount();

    if json {
        println!("{}", serde_json::to_string_pretty(&state.results)?);
    } else {
        println!("[{}]", render::status_line(&state.status));
        print!("{}", render::market_table(&state.results));
    }
    Ok(())
}

async fn portfolio(context: &AppContext, json: bool) -> anyhow::Result<()> {
    let view = HoldingsSync::new(
        context.provider.clone(),
        context.cache.clone(),
        context.sync.clone(),
    );
    view.mount();
    if !wait_until(FETCH_WAIT, || view.snapshot().status.resolved >= 1).await {
        tracing::warn!("Timed out waiting for market data, showing cached holdings");
    }

    let state = view.snapshot();
    view.unmount();

    if json {
        println!("{}", serde_json::to_string_pretty(&state.holdings)?);
    } else {
        println!("[{}]", render::status_line(&state.status));
        print!("{}", render::holdings_table(&state.holdings));
    }
    Ok(())
}

async fn prices(context: &AppContext, check: Option<(String, Decimal)>) -> anyhow::Result<()> {
    let view = WithdrawalPrices::new(
        context.provider.clone(),
        context.cache.clone(),
        context.sync.clone(),
    );
    view.mount();
    if !wait_until(FETCH_WAIT, || view.snapshot().status.resolved >= 1).await {
        tracing::warn!("Timed out waiting for prices");
    }

    let state = view.snapshot();
    println!(
        "[{}] prices from {:?}",
        render::status_line(&state.status),
        state.source
    );
    for (symbol, price) in &state.prices {
        println!(
            "{:<5} ${:<12.2} available {} {}  fee {}",
            symbol,
            price,
            render::format_quantity(symbol, view.available_balance(symbol)),
            symbol,
            view.network_fee(symbol),
        );
    }

    let result = match check {
        Some((asset, amount)) => match view.check_amount(&asset, amount) {
            Ok(()) => {
                println!(
                    "{} {} is within limits (~${} USD)",
                    amount,
                    asset.to_uppercase(),
                    view.fiat_estimate(&asset, amount).round_dp(2)
                );
                Ok(())
            }
            Err(e) => Err(e),
        },
        None => Ok(()),
    };
    view.unmount();

    if let Err(e) = result {
        bail!("{}", e);
    }
    Ok(())
}
