#![allow(non_snake_case)]

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use schedulerCache::config::SchedulerConfig;
use schedulerCache::service::appointment_source::WebApiSource;
use schedulerCache::service::scheduler_cache::{FetchStatus, SchedulerCache};

/// Loads the appointment feed on demand and prints the subset visible in
/// one date window.
#[derive(Parser)]
struct Args {
    /// Appointment feed URL (overrides config and environment)
    #[arg(long)]
    url: Option<String>,

    /// First visible date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Number of days in the visible window
    #[arg(long, default_value_t = 7)]
    days: u32,

    /// KEY=VALUE config file
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = SchedulerConfig::load(args.config.as_deref())
        .expect("Unable to load configuration.");
    if let Some(url) = args.url {
        config.feed_url = url;
    }

    let first = args.from.unwrap_or_else(|| Local::now().date_naive());
    let mut window = Vec::new();
    let mut day = first;
    for _ in 0..args.days.max(1) {
        window.push(day);
        day = day.succ_opt().expect("date out of range");
    }
    let last = *window.last().unwrap();

    tracing::info!(url = %config.feed_url, %first, %last, "requesting visible window");

    let source = Arc::new(WebApiSource::new(config.feed_url));
    let cache = SchedulerCache::with_busy_hold(source, config.busy_hold);
    let mut status = cache.fetch_status();
    let appointments = cache.appointments();

    cache.on_window_changed(window).await;

    loop {
        match status.borrow_and_update().clone() {
            FetchStatus::Loaded => break,
            FetchStatus::Failed(reason) => {
                eprintln!("Feed load failed: {}", reason);
                break;
            }
            _ => {}
        }
        if status.changed().await.is_err() {
            break;
        }
    }

    let visible = appointments.borrow().clone();
    println!("{} appointment(s) between {} and {}", visible.len(), first, last);
    for appointment in &visible {
        println!(
            "  {}  {} - {}  {}{}",
            appointment.id,
            appointment.start_time.format("%Y-%m-%d %H:%M"),
            appointment.end_time.format("%Y-%m-%d %H:%M"),
            appointment.subject,
            if appointment.all_day { "  (all day)" } else { "" },
        );
    }
}
