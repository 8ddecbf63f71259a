use std::str::FromStr;

use crate::error::AppError;
use crate::utils::split_command_line;

/// One line typed into the navigation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Go { route: String, single_top: bool },
    Back,
    BackTo { route: String, inclusive: bool },
    /// Browser back button: move the history cursor, then pop the router.
    BrowserBack,
    Where,
    Stack,
    History,
    Refresh,
    Login { username: String, password: String },
    Logout,
    Help,
    Exit,
}

pub const HELP: &str = "\
Commands:
  go <route> [--single-top]       open a screen, e.g. go project_detail/2
  back                            return to the previous screen
  back-to <route> [--inclusive]   pop screens until <route> is on top
  browser-back                    press the browser back button
  where                           print the current route
  stack                           list the back stack, bottom first
  history                         list browser history entries
  refresh                         reload the current screen
  login <user> <password>         sign in and open the dashboard
  logout                          sign out and return to the login screen
  help                            show this list
  exit                            quit";

impl FromStr for ShellCommand {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words = split_command_line(line);
        let Some((name, args)) = words.split_first() else {
            return Err(AppError::message("empty command"));
        };

        let command = match name.to_lowercase().as_str() {
            "go" | "open" => {
                let (route, flags) = route_and_flags(name, args)?;
                ShellCommand::Go {
                    route,
                    single_top: take_flag(&flags, "--single-top", name)?,
                }
            }
            "back" => no_args(name, args, ShellCommand::Back)?,
            "back-to" => {
                let (route, flags) = route_and_flags(name, args)?;
                ShellCommand::BackTo {
                    route,
                    inclusive: take_flag(&flags, "--inclusive", name)?,
                }
            }
            "browser-back" => no_args(name, args, ShellCommand::BrowserBack)?,
            "where" | "pwd" => no_args(name, args, ShellCommand::Where)?,
            "stack" => no_args(name, args, ShellCommand::Stack)?,
            "history" => no_args(name, args, ShellCommand::History)?,
            "refresh" => no_args(name, args, ShellCommand::Refresh)?,
            "login" => match args {
                [username, password] => ShellCommand::Login {
                    username: username.clone(),
                    password: password.clone(),
                },
                _ => return Err(AppError::message("usage: login <user> <password>")),
            },
            "logout" => no_args(name, args, ShellCommand::Logout)?,
            "help" | "?" => ShellCommand::Help,
            "exit" | "quit" => ShellCommand::Exit,
            other => {
                return Err(AppError::message(format!(
                    "unknown command `{other}`, type `help` for the list"
                )))
            }
        };
        Ok(command)
    }
}

fn no_args(name: &str, args: &[String], command: ShellCommand) -> Result<ShellCommand, AppError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(AppError::message(format!("`{name}` takes no arguments")))
    }
}

fn route_and_flags<'a>(
    name: &str,
    args: &'a [String],
) -> Result<(String, Vec<&'a str>), AppError> {
    let mut route = None;
    let mut flags = Vec::new();
    for arg in args {
        if arg.starts_with("--") {
            flags.push(arg.as_str());
        } else if route.is_none() {
            route = Some(arg.clone());
        } else {
            return Err(AppError::message(format!("`{name}` takes a single route")));
        }
    }
    let route = route.ok_or_else(|| AppError::message(format!("usage: {name} <route>")))?;
    Ok((route, flags))
}

fn take_flag(flags: &[&str], expected: &str, name: &str) -> Result<bool, AppError> {
    match flags {
        [] => Ok(false),
        [flag] if *flag == expected => Ok(true),
        _ => Err(AppError::message(format!(
            "`{name}` only accepts {expected}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_commands() {
        assert_eq!(
            "go project_detail/4 --single-top".parse::<ShellCommand>().unwrap(),
            ShellCommand::Go {
                route: "project_detail/4".to_string(),
                single_top: true,
            }
        );
        assert_eq!(
            "BACK-TO --inclusive projects".parse::<ShellCommand>().unwrap(),
            ShellCommand::BackTo {
                route: "projects".to_string(),
                inclusive: true,
            }
        );
        assert_eq!("browser-back".parse::<ShellCommand>().unwrap(), ShellCommand::BrowserBack);
    }

    #[test]
    fn keeps_empty_route_argument() {
        assert_eq!(
            "go \"\"".parse::<ShellCommand>().unwrap(),
            ShellCommand::Go {
                route: String::new(),
                single_top: false,
            }
        );
    }

    #[test]
    fn rejects_bad_input() {
        for line in ["", "go", "go a b", "go teams --fast", "back now", "login admin", "fly"] {
            assert!(line.parse::<ShellCommand>().is_err(), "{line}");
        }
    }

    #[test]
    fn login_takes_quoted_password() {
        assert_eq!(
            "login admin \"two words\"".parse::<ShellCommand>().unwrap(),
            ShellCommand::Login {
                username: "admin".to_string(),
                password: "two words".to_string(),
            }
        );
    }
}
