use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use spa_booking::advisor::{self, ServiceAdvisor};
use spa_booking::calendar::{format_thai_date, thai_weekday};
use spa_booking::config::{app_dir, AppConfig};
use spa_booking::error::AppResult;
use spa_booking::mask::format_phone;
use spa_booking::wizard::{BookingWizard, NavigationResult, WizardStep};

const LOG_TARGET_STARTUP: &str = "spa_booking::startup";

/// Initialize tracing with file rotation
///
/// Logs are written to `<config_dir>/SpaBooking/logs/`, one file per day
/// (spa-booking.YYYY-MM-DD.log). Debug builds also log to the console.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = app_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| std::path::PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "spa-booking.log");

    // info level by default
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    // Console goes to stderr so it does not interleave with prompts
    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!(target: LOG_TARGET_STARTUP, "Log directory: {}", log_dir.display());
}

fn main() -> AppResult<()> {
    initialize_tracing();
    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Starting Spa Booking v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = AppConfig::load().context("Failed to load settings")?;
    let catalog = config.load_catalog().context("Failed to load catalog")?;
    let advisor: Arc<dyn ServiceAdvisor> = Arc::from(advisor::from_config(&config.advisor));
    let advisor_timeout = Duration::from_secs(config.advisor.timeout_secs);

    println!("===========================================");
    println!("  Spa Booking");
    println!("===========================================");
    println!("Commands: number to choose, b = back, r = restart, q = quit\n");

    let mut wizard = BookingWizard::new(catalog, config);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        render(&wizard);

        let Some(line) = prompt(&mut lines, "> ")? else {
            break;
        };
        let input = line.trim();

        match input {
            "q" => break,
            "r" => {
                wizard.reset();
                continue;
            }
            "b" => {
                match wizard.go_back() {
                    NavigationResult::Success(_) => {}
                    NavigationResult::Blocked { reason } => println!("✗ {}", reason),
                    NavigationResult::Completed => println!("✗ Booking complete, press r to start again"),
                }
                continue;
            }
            _ => {}
        }

        let result = match wizard.step() {
            WizardStep::BranchSelection if input == "h" => wizard.open_history().map(|_| ()),
            WizardStep::BranchSelection => match pick(input, wizard.branches().len()) {
                Some(i) => {
                    let id = wizard.branches()[i].id.clone();
                    wizard.select_branch(&id).map(|_| ())
                }
                None => wizard.next().map(|_| ()),
            },
            WizardStep::ServiceSelection => {
                if let Some(text) = input.strip_prefix('?') {
                    ask_advisor(&mut wizard, Arc::clone(&advisor), text, advisor_timeout);
                    Ok(())
                } else {
                    match pick(input, wizard.catalog().services.len()) {
                        Some(i) => {
                            let id = wizard.catalog().services[i].id.clone();
                            wizard.select_service(&id).map(|_| ())
                        }
                        None => wizard.next().map(|_| ()),
                    }
                }
            }
            WizardStep::DateSelection => {
                let options = wizard.date_options();
                match pick(input, options.len()) {
                    Some(i) => wizard.select_date(options[i].date).map(|_| ()),
                    None => wizard.next().map(|_| ()),
                }
            }
            WizardStep::TimeSelection => match pick(input, wizard.time_slots().len()) {
                Some(i) => {
                    let time = wizard.time_slots()[i].time.clone();
                    wizard.select_time_slot(&time).map(|_| ())
                }
                None => wizard.next().map(|_| ()),
            },
            WizardStep::StaffSelection => {
                let ids: Vec<String> = wizard.staff_options().iter().map(|o| o.staff.id.clone()).collect();
                match pick(input, ids.len()) {
                    Some(i) => wizard.select_staff(&ids[i]).map(|_| ()),
                    None => wizard.next().map(|_| ()),
                }
            }
            WizardStep::Confirmation => {
                let Some(name) = prompt(&mut lines, "Name: ")? else {
                    break;
                };
                let Some(phone) = prompt(&mut lines, "Phone: ")? else {
                    break;
                };
                println!("Submitting...");
                wizard.confirm(&name, &phone).map(|_| ())
            }
            WizardStep::MyBookings => {
                if wizard.history_search_ready(input) {
                    let records = wizard.search_history(input).unwrap_or_default();
                    if records.is_empty() {
                        println!("No bookings found for {}", format_phone(input));
                    }
                    for record in records {
                        println!(
                            "  {}  {} {}  {} / {} with {}  [{}]",
                            record.id,
                            format_thai_date(record.date),
                            record.time,
                            record.branch_name,
                            record.service_name,
                            record.staff_name,
                            record.status.label()
                        );
                    }
                } else {
                    println!("Enter a 10-digit phone number");
                }
                Ok(())
            }
            WizardStep::Success => Ok(()),
        };

        if let Err(e) = result {
            println!("✗ {}", e);
        }
    }

    tracing::info!(target: LOG_TARGET_STARTUP, "Exiting");
    Ok(())
}

fn render(wizard: &BookingWizard) {
    let step = wizard.step();
    match step.number() {
        Some(n) => println!("\n[{}/{}] {}", n, WizardStep::total_steps(), step.title()),
        None => println!("\n{}", step.title()),
    }
    if let Some(summary) = wizard.summary() {
        println!("  {}", summary);
    }

    match step {
        WizardStep::BranchSelection => {
            for (i, branch) in wizard.branches().iter().enumerate() {
                println!("  {}. {} ({})", i + 1, branch.name, branch.location);
            }
            println!("  h. My bookings");
        }
        WizardStep::ServiceSelection => {
            for (i, option) in wizard.service_options().iter().enumerate() {
                let service = option.service;
                let flag = if option.recommended { " ★" } else { "" };
                println!(
                    "  {}. {} - {} min, {} THB{}",
                    i + 1,
                    service.name,
                    service.duration,
                    service.price,
                    flag
                );
            }
            if let Some(r) = wizard.recommendation() {
                println!("  ★ {}", r.reasoning);
            }
            println!("  ?<text> describe how you feel for a suggestion");
        }
        WizardStep::DateSelection => {
            for (i, option) in wizard.date_options().iter().enumerate() {
                let closed = if option.holiday { " (closed)" } else { "" };
                println!(
                    "  {}. {} {}{}",
                    i + 1,
                    thai_weekday(option.date),
                    format_thai_date(option.date),
                    closed
                );
            }
        }
        WizardStep::TimeSelection => {
            for (i, slot) in wizard.time_slots().iter().enumerate() {
                let full = if slot.available { "" } else { " (full)" };
                println!("  {}. {}{}", i + 1, slot.time, full);
            }
        }
        WizardStep::StaffSelection => {
            for (i, option) in wizard.staff_options().iter().enumerate() {
                let note = option
                    .availability
                    .reason()
                    .map(|reason| format!(" ({})", reason.label()))
                    .unwrap_or_default();
                println!("  {}. {} - {}{}", i + 1, option.staff.name, option.staff.role, note);
            }
        }
        WizardStep::Confirmation => println!("  Press enter to enter your contact details"),
        WizardStep::Success => {
            if let Some(receipt) = wizard.receipt() {
                println!("  ✓ Ticket {}", receipt.ticket);
                println!(
                    "  {} / {} with {}",
                    receipt.branch_name, receipt.service_name, receipt.staff_name
                );
                println!(
                    "  {} {} น. - {} THB",
                    format_thai_date(receipt.date),
                    receipt.time,
                    receipt.price
                );
                println!("  {} {}", receipt.customer_name, format_phone(&receipt.customer_phone));
            }
            println!("  Press r to book again");
        }
        WizardStep::MyBookings => println!("  Enter your phone number"),
    }
}

fn ask_advisor(wizard: &mut BookingWizard, advisor: Arc<dyn ServiceAdvisor>, text: &str, timeout: Duration) {
    if !wizard.request_recommendation(advisor, text) {
        return;
    }

    let started = Instant::now();
    while wizard.poll_recommendation().is_pending() {
        if started.elapsed() >= timeout {
            println!("No suggestion right now");
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    if wizard.recommendation().is_none() {
        println!("No suggestion right now");
    }
}

/// 1-based menu choice
fn pick(input: &str, len: usize) -> Option<usize> {
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

fn prompt<B: BufRead>(lines: &mut io::Lines<B>, label: &str) -> AppResult<Option<String>> {
    print!("{}", label);
    io::stdout().flush().context("Failed to flush stdout")?;
    match lines.next() {
        Some(line) => Ok(Some(line.context("Failed to read input")?)),
        None => Ok(None),
    }
}
