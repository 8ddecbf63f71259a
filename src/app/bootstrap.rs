use std::io::{self, Write};

use log::{info, LevelFilter};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::app::command::ShellCommand;
use crate::app::controller::{AppController, CommandOutcome};
use crate::cli::{self, Cli};
use crate::config::validator::validate_app_config;
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::services::Repositories;
use crate::ui::browser::InMemoryHistory;
use crate::ui::navigation::Route;
use crate::ui::screens::ViewModelFactory;

/// Entry point used by `main` to bootstrap the controller stack.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::resolve(cli.config.as_deref())?;
    cli.apply_overrides(&mut config)?;
    validate_app_config(&config)?;
    init_logging(config.logging.level);

    let mut controller = build_controller(&config, cli.hash.as_deref())?;
    cli::show_banner();
    controller.refresh_current(false).await;
    println!("{}", controller.render_current());

    run_shell(&mut controller, BufReader::new(tokio::io::stdin())).await
}

/// Wire repositories, router and browser history from the configuration.
pub fn build_controller(config: &AppConfig, initial_hash: Option<&str>) -> Result<AppController> {
    let policy = config.navigation.param_policy;
    let start = Route::parse(&config.navigation.start_route, policy)
        .map_err(|err| AppError::message(format!("navigation.start_route: {err}")))?;
    let repos = Repositories::from_config(&config.backend)?;
    let history = InMemoryHistory::with_initial_hash(initial_hash.unwrap_or_default());

    info!("Starting at `{start}` with {policy:?} parameter policy");
    Ok(AppController::new(
        ViewModelFactory::new(repos),
        start,
        policy,
        history,
    ))
}

fn init_logging(level: LevelFilter) {
    // RUST_LOG, when set, overrides the configured level.
    if let Err(err) = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
    {
        eprintln!("Logger already initialised: {err}");
    }
}

/// Read commands line by line until `exit` or end of input.
async fn run_shell<R>(controller: &mut AppController, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        print!("{}> ", controller.router().current_route());
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match controller.execute(command).await {
            Ok(CommandOutcome::Continue(output)) => {
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Ok(CommandOutcome::Exit) => break,
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use std::time::Duration;

    fn mock_config(start_route: &str) -> AppConfig {
        let mut config = AppConfig::builtin();
        config.backend = BackendConfig::Mock {
            latency: Duration::ZERO,
        };
        config.navigation.start_route = start_route.to_string();
        config
    }

    #[test]
    fn initial_hash_reaches_the_router() {
        let controller = build_controller(&mock_config("dashboard"), Some("#/teams")).unwrap();
        assert_eq!(controller.router().current_route(), "teams");
        assert_eq!(controller.router().depth(), 2);
    }

    #[test]
    fn unknown_start_route_fails_fast() {
        assert!(build_controller(&mock_config("warehouse"), None).is_err());
    }

    #[tokio::test]
    async fn shell_runs_commands_until_exit() {
        let mut controller = build_controller(&mock_config("dashboard"), None).unwrap();
        let input: &[u8] = b"go teams\n\nfly\ngo team_detail/2\nexit\ngo projects\n";
        run_shell(&mut controller, input).await.unwrap();

        assert_eq!(controller.router().current_route(), "team_detail/2");
        assert_eq!(controller.router().subscriber_count(), 0);
    }

    #[tokio::test]
    async fn shell_stops_at_end_of_input() {
        let mut controller = build_controller(&mock_config("dashboard"), None).unwrap();
        run_shell(&mut controller, &b"go documents"[..]).await.unwrap();
        assert_eq!(controller.router().current_route(), "documents");
    }
}
