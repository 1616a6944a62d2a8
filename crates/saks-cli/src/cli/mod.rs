use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `saks` binary.
#[derive(Debug, Parser)]
#[command(name = "saks", version, about = "Saks - board case register and meeting minutes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Database file (overrides database.path from config)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Acting user recorded in the audit trail (overrides general.default_actor)
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            db: self.db.clone(),
            actor: self.actor.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{
        AttachmentCommands, CaseCommands, CommentCommands, MeetingCommands, MinutesCommands,
        MoveDirection, PdfCommands,
    };
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "saks", "--format", "raw", "--db", "/tmp/board.db", "--verbose", "case", "list",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert_eq!(cli.db.as_deref(), Some("/tmp/board.db"));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Case {
                action: CaseCommands::List {
                    all: false,
                    status: None,
                    assignee: None
                }
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["saks", "case", "get", "4", "--actor", "chair", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.actor.as_deref(), Some("chair"));
        assert!(matches!(
            cli.command,
            Commands::Case {
                action: CaseCommands::Get { id: 4 }
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["saks", "--format", "table", "case", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn meeting_move_takes_direction() {
        let cli = Cli::try_parse_from(["saks", "meeting", "move", "12", "down"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Meeting {
                action: MeetingCommands::Move {
                    item_id: 12,
                    direction: MoveDirection::Down
                }
            }
        ));
    }

    #[test]
    fn meeting_create_parses_date() {
        let cli = Cli::try_parse_from([
            "saks", "meeting", "create", "--date", "2026-03-10", "--sequence", "3",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Meeting {
                action: MeetingCommands::Create { date, sequence, .. },
            } => {
                assert_eq!(date.to_string(), "2026-03-10");
                assert_eq!(sequence, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn pdf_allocate_requires_document_type() {
        assert!(Cli::try_parse_from(["saks", "pdf", "allocate", "5"]).is_err());
        let cli = Cli::try_parse_from(["saks", "pdf", "allocate", "5", "--type", "agenda"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Pdf {
                action: PdfCommands::Allocate { meeting_id: 5, .. }
            }
        ));
    }

    #[test]
    fn case_list_filters_by_assignee() {
        let cli = Cli::try_parse_from(["saks", "case", "list", "--assignee", "ola", "--all"])
            .expect("cli should parse");
        match cli.command {
            Commands::Case {
                action: CaseCommands::List { all, assignee, .. },
            } => {
                assert!(all);
                assert_eq!(assignee.as_deref(), Some("ola"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(
            Cli::try_parse_from(["saks", "case", "list", "--all", "--status", "open"]).is_err()
        );
    }

    #[test]
    fn comment_edit_takes_id_and_text() {
        let cli = Cli::try_parse_from(["saks", "comment", "edit", "7", "Quote accepted"])
            .expect("cli should parse");
        match cli.command {
            Commands::Comment {
                action: CommentCommands::Edit { id, text },
            } => {
                assert_eq!(id, 7);
                assert_eq!(text, "Quote accepted");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn meeting_edit_item_date_and_clear_conflict() {
        let cli = Cli::try_parse_from([
            "saks", "meeting", "edit-item", "4", "--deadline-date", "2026-05-01", "--follow-up", "",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Meeting {
                action:
                    MeetingCommands::EditItem {
                        item_id,
                        deadline_date,
                        follow_up,
                        ..
                    },
            } => {
                assert_eq!(item_id, 4);
                assert_eq!(deadline_date.map(|d| d.to_string()).as_deref(), Some("2026-05-01"));
                assert_eq!(follow_up.as_deref(), Some(""));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(
            Cli::try_parse_from([
                "saks",
                "meeting",
                "edit-item",
                "4",
                "--deadline-date",
                "2026-05-01",
                "--clear-deadline-date",
            ])
            .is_err()
        );
    }

    #[test]
    fn minutes_update_parses_header_fields() {
        let cli = Cli::try_parse_from([
            "saks",
            "minutes",
            "update",
            "3",
            "--attendance",
            "Kari, Ola",
            "--next-meeting-date",
            "2026-05-12",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Minutes {
                action:
                    MinutesCommands::Update {
                        meeting_id,
                        attendance,
                        next_meeting_date,
                        absence,
                        ..
                    },
            } => {
                assert_eq!(meeting_id, 3);
                assert_eq!(attendance.as_deref(), Some("Kari, Ola"));
                assert!(next_meeting_date.is_some());
                assert!(absence.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn signed_minutes_default_to_pdf() {
        let cli = Cli::try_parse_from([
            "saks", "minutes", "record-signed", "3", "--file-name", "signed.pdf", "--size-bytes", "900",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Minutes {
                action: MinutesCommands::RecordSigned { content_type, .. },
            } => assert_eq!(content_type, "application/pdf"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn attachment_add_requires_metadata() {
        assert!(Cli::try_parse_from(["saks", "attachment", "add", "comment", "7"]).is_err());
        let cli = Cli::try_parse_from([
            "saks",
            "attachment",
            "add",
            "agenda-item",
            "4",
            "--file-name",
            "quote.pdf",
            "--content-type",
            "application/pdf",
            "--size-bytes",
            "1200",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Attachment {
                action: AttachmentCommands::Add {
                    target_id: 4,
                    size_bytes: 1200,
                    ..
                }
            }
        ));
    }
}
