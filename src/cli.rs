//! Command-line surface of the `brewlog` binary: read the journal, print
//! JSON, and the two destructive cleanups.

use clap::{Parser, Subcommand};
use serde::Serialize;

use brewlog::drink_types::known_drink_type;
use brewlog::{ExperienceDimension, Journal, JournalError};

#[derive(Parser)]
#[command(name = "brewlog")]
#[command(about = "Inspect a brewlog cafe journal")]
#[command(after_help = "Environment:\n  BREWLOG_DB          Database path\n  BREWLOG_LOG         Log filter (e.g. brewlog=debug)\n  BREWLOG_LOG_FORMAT  Set to `json` for JSON logs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Journal-wide summary.
    Stats,
    /// Every cafe with visit aggregates.
    Cafes,
    /// Visit timeline, optionally for one cafe.
    Visits {
        #[arg(long)]
        cafe: Option<String>,
    },
    /// One visit with its cafe, drinks and photos.
    Visit { id: String },
    /// Leaderboards.
    Rank {
        #[command(subcommand)]
        board: RankCommand,
    },
    /// Delete a cafe and everything logged there.
    DeleteCafe { id: String },
    /// Delete one visit with its drinks and photos.
    DeleteVisit { id: String },
}

#[derive(Subcommand)]
pub enum RankCommand {
    /// Average of per-visit averages across all dimensions.
    Overall,
    /// One experience dimension, e.g. `vibe` or `coffee_quality`.
    Dimension {
        #[arg(value_parser = parse_dimension)]
        key: ExperienceDimension,
    },
    /// Drinks of one type, e.g. "flat white".
    Drinks { drink_type: String },
}

fn parse_dimension(key: &str) -> Result<ExperienceDimension, JournalError> {
    key.parse()
}

/// Execute `command` and print its result as pretty JSON.
pub fn run(journal: &Journal, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Stats => print_json(&journal.stats()?),
        Command::Cafes => print_json(&journal.cafes_with_stats()?),
        Command::Visits { cafe: Some(cafe_id) } => print_json(&journal.visits_for_cafe(&cafe_id)?),
        Command::Visits { cafe: None } => print_json(&journal.visits_with_details()?),
        Command::Visit { id } => match journal.visit_with_details(&id)? {
            Some(visit) => print_json(&visit),
            None => anyhow::bail!("visit {id} not found"),
        },
        Command::Rank { board } => match board {
            RankCommand::Overall => print_json(&journal.rank_cafes_overall()?),
            RankCommand::Dimension { key } => print_json(&journal.rank_cafes_by_dimension(key)?),
            RankCommand::Drinks { drink_type } => {
                let drink_type = known_drink_type(&drink_type).unwrap_or(drink_type.as_str());
                print_json(&journal.rank_drinks_by_type(drink_type)?)
            }
        },
        Command::DeleteCafe { id } => {
            journal.delete_cafe(&id)?;
            tracing::info!(cafe_id = %id, "cafe deleted");
            Ok(())
        }
        Command::DeleteVisit { id } => {
            journal.delete_visit(&id)?;
            tracing::info!(visit_id = %id, "visit deleted");
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dimension_keys_are_validated_at_parse_time() {
        let cli = Cli::try_parse_from(["brewlog", "rank", "dimension", "work_friendliness"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Rank {
                board: RankCommand::Dimension {
                    key: ExperienceDimension::WorkFriendliness
                }
            }
        ));

        assert!(Cli::try_parse_from(["brewlog", "rank", "dimension", "ambience"]).is_err());
    }
}
