use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portal_core::{
    config::{load_settings_from, SETTINGS_FILE},
    dashboard::format_gauge,
    DashboardState, FormSurface, KeyResponse, LeaveDecision, LoginController, Notifier,
    PageHandler, RandomDelays, Settings, SimulatedBackend,
};
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

use commands::{DashboardCommand, LoginCommand};
use terminal::TerminalPage;

type InputLines = Lines<BufReader<Stdin>>;

#[derive(Parser, Debug)]
#[command(about = "Campus portal pages driven from the terminal")]
struct Args {
    #[arg(long, default_value = SETTINGS_FILE)]
    settings: PathBuf,
    /// Print the effective settings as JSON and exit.
    #[arg(long)]
    print_settings: bool,
    #[command(subcommand)]
    page: Option<PageArg>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum PageArg {
    Login,
    Dashboard,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings_from(&args.settings)
        .with_context(|| format!("failed to load settings from {}", args.settings.display()))?;
    if args.print_settings {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let mut lines = BufReader::new(stdin()).lines();
    let page = args.page.unwrap_or(PageArg::Login);
    info!(?page, credentials = settings.credentials.len(), "opening page");
    match page {
        PageArg::Login => run_login(&settings, &mut lines).await,
        PageArg::Dashboard => run_dashboard(&settings, &mut lines).await,
    }
}

async fn confirm(lines: &mut InputLines, prompt: &str) -> Result<bool> {
    println!("{prompt} (y/n)");
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "yes"))
}

async fn run_login(settings: &Settings, lines: &mut InputLines) -> Result<()> {
    let (page, mut navigation) = TerminalPage::new("login");
    let page = Arc::new(page);
    let backend = SimulatedBackend::new(Arc::new(RandomDelays), settings.login_delay_range());
    let controller = LoginController::new(
        settings,
        page.clone(),
        Arc::new(backend),
        Notifier::new(page.clone(), settings.notification_ttl()),
        page.clone(),
    );

    println!("commands: focus|blur <field>, type|set <field> <text>, submit");
    println!("          enter, esc, key <combo>, leave, show, quit");
    println!("fields: username, studentNumber, phoneNumber");

    loop {
        let line = tokio::select! {
            changed = navigation.changed() => {
                changed?;
                return Ok(());
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match LoginCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        debug!(command = command.name(), "dispatching login command");

        match command {
            LoginCommand::Focus(field) => controller.on_focus(field),
            LoginCommand::Blur(field) => controller.on_blur(field),
            LoginCommand::Type { field, text } => {
                for c in text.chars() {
                    let mut value = page.field_value(field);
                    value.push(c);
                    page.set_field_value(field, &value);
                    controller.on_input(field);
                }
            }
            LoginCommand::Set { field, text } => {
                page.set_field_value(field, &text);
                controller.on_input(field);
            }
            LoginCommand::Submit => {
                let outcome = controller.submit().await;
                debug!(?outcome, "submit finished");
            }
            LoginCommand::Key(press) => {
                if controller.on_key(press) == KeyResponse::Submit {
                    let outcome = controller.submit().await;
                    debug!(?outcome, "submit finished");
                }
            }
            LoginCommand::Leave => {
                let leave = match controller.on_leave_attempt() {
                    LeaveDecision::Allow => true,
                    LeaveDecision::Confirm => {
                        confirm(lines, "입력한 내용이 사라집니다. 페이지를 떠나시겠습니까?").await?
                    }
                };
                if leave {
                    return Ok(());
                }
            }
            LoginCommand::Show => page.print_form(),
            LoginCommand::Quit => return Ok(()),
        }
    }
}

fn print_gauge(dashboard: &DashboardState) {
    const WIDTH: usize = 20;
    let filled = (dashboard.fill_percent() / 100.0 * WIDTH as f64).round() as usize;
    println!(
        "온도 {}°C [{}{}]",
        format_gauge(dashboard.value()),
        "#".repeat(filled),
        "-".repeat(WIDTH - filled)
    );
}

async fn run_dashboard(settings: &Settings, lines: &mut InputLines) -> Result<()> {
    let (page, mut navigation) = TerminalPage::new("mypage");
    let page = Arc::new(page);
    let dashboard = Arc::new(DashboardState::new(
        settings,
        Notifier::new(page.clone(), settings.notification_ttl()),
        page.clone(),
        Arc::new(RandomDelays),
    ));

    let _welcome = dashboard.spawn_welcome();
    let drift = dashboard.spawn_drift();
    print_gauge(&dashboard);
    println!("commands: inc <delta>, drift, nav <page>, action <tab|-> [page]");
    println!("          key <combo>, logout, show, quit");

    let result: Result<()> = loop {
        let line = tokio::select! {
            changed = navigation.changed() => {
                break changed.map_err(Into::into);
            }
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(err) => break Err(err.into()),
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match DashboardCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        debug!(command = command.name(), "dispatching dashboard command");

        match command {
            DashboardCommand::Increment(delta) => {
                dashboard.increment(delta);
                print_gauge(&dashboard);
            }
            DashboardCommand::Drift => {
                dashboard.perturb();
                print_gauge(&dashboard);
            }
            DashboardCommand::Nav(target) => {
                dashboard.open_nav_item(Some(target.as_str()));
            }
            DashboardCommand::Action { tab, page } => {
                if !dashboard.open_quick_action(tab.as_deref(), page.as_deref()) {
                    eprintln!("action has no destination");
                }
            }
            DashboardCommand::Key(press) => {
                dashboard.on_key(press);
            }
            DashboardCommand::Logout => match confirm(lines, "정말 로그아웃하시겠습니까?").await {
                Ok(confirmed) => {
                    dashboard.logout(confirmed);
                }
                Err(err) => break Err(err),
            },
            DashboardCommand::Show => print_gauge(&dashboard),
            DashboardCommand::Quit => break Ok(()),
        }
    };

    drift.abort();
    result
}
