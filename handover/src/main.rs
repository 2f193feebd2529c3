// Handover board - shift handover notes for the front desk
// Entry point: command-line front end over the board services

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use handover_board::app::{data_dir_from_env, AppState};
use handover_board::config::{DAY_KEY_FORMAT, DUE_TIME_FORMAT};
use handover_board::database::{Category, NewHandover, Shift};
use handover_board::view::{CategoryFilter, QuickFilter, SortMode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "handover-board", version, about = "Shift handover notes for the front desk")]
struct Cli {
    /// Shows today's board when omitted
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a day's board
    Show(ShowArgs),
    /// Add a note
    Add(AddArgs),
    /// Flip the completed flag of notes
    Toggle {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete notes
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Move a note to a position in the day's custom order
    Move {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        id: String,
        index: usize,
    },
    /// Set or clear a day's schedule
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    /// Manage the staff roster
    #[command(subcommand)]
    Person(PersonCommand),
}

#[derive(Debug, Default, Args)]
struct ShowArgs {
    /// Day to show (YYYY-MM-DD), today when omitted
    #[arg(value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Overrides the saved sort mode
    #[arg(long, value_enum, ignore_case = true)]
    sort: Option<SortMode>,
    /// Overrides the saved filter
    #[arg(long, value_enum, ignore_case = true)]
    filter: Option<CategoryFilter>,
    /// Overrides the saved quick filter
    #[arg(long, value_enum, ignore_case = true)]
    quick: Option<QuickFilter>,
    #[arg(long, default_value = "")]
    search: String,
    /// Print the board as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Day the note belongs to (YYYY-MM-DD), today when omitted
    #[arg(value_parser = parse_date)]
    date: Option<NaiveDate>,
    #[arg(long)]
    text: String,
    #[arg(long, value_enum, ignore_case = true)]
    category: Option<Category>,
    #[arg(long, default_value = "")]
    room: String,
    #[arg(long, default_value = "")]
    guest: String,
    /// What was promised to the guest
    #[arg(long)]
    promised: Option<String>,
    #[arg(long)]
    followup: bool,
    /// Due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    due: Option<NaiveDate>,
    /// Due time (HH:MM)
    #[arg(long, value_parser = parse_time, requires = "due")]
    at: Option<NaiveTime>,
}

#[derive(Debug, Subcommand)]
enum ScheduleCommand {
    /// Assign the shift on duty and the people working it
    Set {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        #[arg(value_enum, ignore_case = true)]
        shift: Shift,
        people: Vec<String>,
    },
    /// Remove a day's schedule
    Clear {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
}

#[derive(Debug, Subcommand)]
enum PersonCommand {
    /// List the staff roster
    List,
    /// Add someone to the roster
    Add { name: String, color: Option<String> },
    /// Rename or recolor someone
    Update {
        id: String,
        #[arg(long, required_unless_present = "color")]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove someone from the roster
    Remove { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handover_board=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let state = AppState::initialize(data_dir_from_env())
        .await
        .context("failed to open the handover board")?;

    match cli.command.unwrap_or_else(|| Command::Show(ShowArgs::default())) {
        Command::Show(args) => show(&state, args).await,
        Command::Add(args) => add(&state, args).await,
        Command::Toggle { ids } => {
            let toggled = state.notes.bulk_toggle_complete(&ids).await?;
            println!("Toggled {} note(s)", toggled);
            Ok(())
        }
        Command::Delete { ids } => {
            let deleted = state.notes.bulk_delete(&ids).await?;
            println!("Deleted {} note(s)", deleted);
            Ok(())
        }
        Command::Move { date, id, index } => {
            let order = state.notes.move_note(date, &id, index).await?;
            println!("{}", order.join("\n"));
            Ok(())
        }
        Command::Schedule(command) => schedule(&state, command).await,
        Command::Person(command) => person(&state, command).await,
    }
}

async fn show(state: &AppState, args: ShowArgs) -> anyhow::Result<()> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let mut view = state.board.initial_view(date).await?.with_search(args.search);
    if let Some(sort) = args.sort {
        view = view.with_sort(sort);
    }
    if let Some(category) = args.filter {
        view = view.with_category(category);
    }
    if let Some(quick) = args.quick {
        view = view.with_quick(quick);
    }

    let board = state.board.render(date, view).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print!("{}", board);
    }
    Ok(())
}

async fn add(state: &AppState, args: AddArgs) -> anyhow::Result<()> {
    let draft = NewHandover {
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        category: args.category.unwrap_or_default(),
        room: args.room,
        guest_name: args.guest,
        text: args.text,
        followup: args.followup,
        promised: args.promised.is_some(),
        promise_text: args.promised.unwrap_or_default(),
        due_date: args.due,
        due_time: args.at,
        ..Default::default()
    };

    let note = state.notes.create_note(draft).await?;
    println!("Created note {}", note.id);
    Ok(())
}

async fn schedule(state: &AppState, command: ScheduleCommand) -> anyhow::Result<()> {
    match command {
        ScheduleCommand::Set {
            date,
            shift,
            people,
        } => {
            let schedule = state.schedule.set_day_schedule(date, shift, people).await?;
            println!(
                "{}: shift {} ({})",
                schedule.date,
                schedule.shift,
                schedule.people.join(", ")
            );
        }
        ScheduleCommand::Clear { date } => {
            state.schedule.clear_day_schedule(date).await?;
            println!("Cleared schedule for {}", date);
        }
    }
    Ok(())
}

async fn person(state: &AppState, command: PersonCommand) -> anyhow::Result<()> {
    match command {
        PersonCommand::List => {
            for person in state.schedule.list_people().await? {
                println!("{}  {}  {}", person.id, person.color, person.name);
            }
        }
        PersonCommand::Add { name, color } => {
            let person = state.schedule.add_person(&name, color.as_deref()).await?;
            println!("Added {} ({})", person.name, person.id);
        }
        PersonCommand::Update { id, name, color } => {
            let person = state
                .schedule
                .update_person(&id, name.as_deref(), color.as_deref())
                .await?;
            println!("Updated {} ({})", person.name, person.color);
        }
        PersonCommand::Remove { id } => {
            state.schedule.remove_person(&id).await?;
            println!("Removed {}", id);
        }
    }
    Ok(())
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DAY_KEY_FORMAT)
        .map_err(|_| format!("invalid date {:?}, expected YYYY-MM-DD", value))
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, DUE_TIME_FORMAT)
        .map_err(|_| format!("invalid time {:?}, expected HH:MM", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("handover-board").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_shows_today() {
        let cli = parse(&[]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_show_parses_modes() {
        let cli = parse(&[
            "show",
            "2024-03-01",
            "--sort",
            "dueDate",
            "--filter",
            "OVERDUE",
            "--quick",
            "myShift",
            "--search",
            "301",
        ])
        .unwrap();

        let Some(Command::Show(args)) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(args.sort, Some(SortMode::DueDate));
        assert_eq!(args.filter, Some(CategoryFilter::Overdue));
        assert_eq!(args.quick, Some(QuickFilter::MyShift));
        assert_eq!(args.search, "301");
        assert!(!args.json);
    }

    #[test]
    fn test_misspelled_flag_is_rejected() {
        let err = parse(&["show", "2024-03-01", "--serach", "301"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = parse(&["add", "--text", "Taxi", "--sorta", "x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = parse(&["show", "--sort", "alphabetical"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_due_time_requires_due_date() {
        let err = parse(&["add", "2024-03-01", "--text", "Taxi", "--at", "11:00"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let cli = parse(&[
            "add",
            "2024-03-01",
            "--text",
            "Taxi",
            "--category",
            "late-checkout",
            "--due",
            "2024-03-01",
            "--at",
            "11:00",
        ])
        .unwrap();
        let Some(Command::Add(args)) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.category, Some(Category::LateCheckout));
        assert_eq!(args.at, NaiveTime::from_hms_opt(11, 0, 0));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let err = parse(&["show", "03/01/2024"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_schedule_and_person_commands() {
        let cli = parse(&["schedule", "set", "2024-03-01", "b", "Ana", "Ben"]).unwrap();
        let Some(Command::Schedule(ScheduleCommand::Set { shift, people, .. })) = cli.command
        else {
            panic!("expected schedule set");
        };
        assert_eq!(shift, Shift::B);
        assert_eq!(people, vec!["Ana", "Ben"]);

        assert!(parse(&["schedule", "clear", "2024-03-01"]).is_ok());
        assert!(parse(&["person", "update", "p1", "--color", "#112233"]).is_ok());

        let err = parse(&["person", "update", "p1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
