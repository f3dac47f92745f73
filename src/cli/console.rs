//! Line-oriented console commands for the interactive host.
//!
//! The run subcommand reads newline-delimited commands from stdin. Each
//! line is tokenized shell-style and parsed with the same clap derive
//! machinery as the argv surface, so the grammar, the `help` screen, and
//! every usage error come from one declaration.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::peer::PeerState;

// ============================================================================
// ConsoleCommand
// ============================================================================

/// Grammar anchor for one console line.
///
/// `try_parse_from` wants a top-level command to hang the subcommands on;
/// the host never shows this wrapper beyond the usage strings.
#[derive(Debug, Parser)]
#[command(name = "timer", about = "Interactive timer console")]
struct ConsoleLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

/// One parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum ConsoleCommand {
    /// Start the countdown, optionally with a fresh duration
    Start {
        /// Duration in seconds; omitted reuses the armed duration
        seconds: Option<u32>,
    },
    /// Freeze the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Abort the countdown
    Cancel,
    /// Arm a duration for the next start
    Set {
        /// Duration in seconds
        seconds: u32,
    },
    /// Print the current snapshot as JSON
    Status,
    /// Drive the in-process peer, as the remote human would
    Ha {
        /// Peer state to report
        #[arg(value_parser = parse_peer_state)]
        state: PeerState,
        /// Peer remaining seconds; omitted keeps the last value
        remaining: Option<u32>,
    },
    /// Stop the timer and leave
    #[command(alias = "exit")]
    Quit,
}

impl ConsoleCommand {
    /// Parses one console line.
    ///
    /// # Errors
    ///
    /// Returns a rendered clap error for unknown commands, malformed
    /// arguments, unbalanced quotes, and help requests (`help`, `--help`).
    pub fn parse(line: &str) -> Result<Self, clap::Error> {
        let mut args = shlex::split(line).ok_or_else(|| {
            clap::Error::raw(
                ErrorKind::InvalidValue,
                "unbalanced quotes in console line\n",
            )
        })?;
        args.insert(0, "timer".to_string());
        ConsoleLine::try_parse_from(args).map(|parsed| parsed.command)
    }
}

fn parse_peer_state(raw: &str) -> Result<PeerState, String> {
    PeerState::parse(raw)
        .ok_or_else(|| "not a peer state (idle, active, paused)".to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_start_bare() {
            assert_eq!(
                ConsoleCommand::parse("start").unwrap(),
                ConsoleCommand::Start { seconds: None }
            );
        }

        #[test]
        fn test_parse_start_with_seconds() {
            assert_eq!(
                ConsoleCommand::parse("start 90").unwrap(),
                ConsoleCommand::Start { seconds: Some(90) }
            );
        }

        #[test]
        fn test_parse_simple_commands() {
            assert_eq!(
                ConsoleCommand::parse("pause").unwrap(),
                ConsoleCommand::Pause
            );
            assert_eq!(
                ConsoleCommand::parse("resume").unwrap(),
                ConsoleCommand::Resume
            );
            assert_eq!(
                ConsoleCommand::parse("cancel").unwrap(),
                ConsoleCommand::Cancel
            );
            assert_eq!(
                ConsoleCommand::parse("status").unwrap(),
                ConsoleCommand::Status
            );
            assert_eq!(ConsoleCommand::parse("quit").unwrap(), ConsoleCommand::Quit);
        }

        #[test]
        fn test_parse_exit_is_quit_alias() {
            assert_eq!(ConsoleCommand::parse("exit").unwrap(), ConsoleCommand::Quit);
        }

        #[test]
        fn test_parse_set() {
            assert_eq!(
                ConsoleCommand::parse("set 300").unwrap(),
                ConsoleCommand::Set { seconds: 300 }
            );
        }

        #[test]
        fn test_parse_ha_state_only() {
            assert_eq!(
                ConsoleCommand::parse("ha paused").unwrap(),
                ConsoleCommand::Ha {
                    state: PeerState::Paused,
                    remaining: None
                }
            );
        }

        #[test]
        fn test_parse_ha_with_remaining() {
            assert_eq!(
                ConsoleCommand::parse("ha active 45").unwrap(),
                ConsoleCommand::Ha {
                    state: PeerState::Active,
                    remaining: Some(45)
                }
            );
        }

        #[test]
        fn test_parse_tolerates_extra_whitespace() {
            assert_eq!(
                ConsoleCommand::parse("  start   25  ").unwrap(),
                ConsoleCommand::Start { seconds: Some(25) }
            );
        }

        #[test]
        fn test_parse_quoted_argument() {
            assert_eq!(
                ConsoleCommand::parse("set \"300\"").unwrap(),
                ConsoleCommand::Set { seconds: 300 }
            );
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_parse_empty_line_is_error() {
            assert!(ConsoleCommand::parse("").is_err());
        }

        #[test]
        fn test_parse_unknown_command() {
            let err = ConsoleCommand::parse("launch").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }

        #[test]
        fn test_parse_set_without_seconds() {
            let err = ConsoleCommand::parse("set").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }

        #[test]
        fn test_parse_set_with_bad_number() {
            let err = ConsoleCommand::parse("set soon").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation);
        }

        #[test]
        fn test_parse_start_with_negative_number() {
            assert!(ConsoleCommand::parse("start -5").is_err());
        }

        #[test]
        fn test_parse_ha_without_state() {
            let err = ConsoleCommand::parse("ha").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }

        #[test]
        fn test_parse_ha_with_unknown_state() {
            let err = ConsoleCommand::parse("ha running").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation);
            assert!(err.to_string().contains("not a peer state"));
        }

        #[test]
        fn test_parse_trailing_input() {
            assert!(ConsoleCommand::parse("pause now").is_err());
        }

        #[test]
        fn test_parse_unbalanced_quotes() {
            let err = ConsoleCommand::parse("set \"300").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidValue);
        }

        #[test]
        fn test_help_renders_the_command_list() {
            let err = ConsoleCommand::parse("help").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);

            let rendered = err.to_string();
            assert!(rendered.contains("start"));
            assert!(rendered.contains("quit"));
        }

        #[test]
        fn test_subcommand_help_is_also_clap_rendered() {
            let err = ConsoleCommand::parse("help set").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
            assert!(err.to_string().contains("Arm a duration"));
        }
    }
}
