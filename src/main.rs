use anyhow::Result;
use clap::{Parser, Subcommand};

use bookkeeper::cli::{handle_budget_command, handle_category_command, handle_expense_command};
use bookkeeper::config::{BookkeeperPaths, Settings};
use bookkeeper::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "bookkeeper",
    version,
    about = "Track expenses by category against daily, weekly and monthly budgets"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, database and default categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(bookkeeper::cli::CategoryCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(bookkeeper::cli::ExpenseCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(bookkeeper::cli::BudgetCommands),
}

fn main() -> Result<()> {
    bookkeeper::init_tracing();
    let cli = Cli::parse();

    let paths = BookkeeperPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing bookkeeper at: {}", paths.base_dir().display());
            let storage = initialize_storage(&paths)?;
            let categories = storage.category_service().list(None)?;
            println!("Initialization complete!");
            println!();
            print!("{}", bookkeeper::display::format_category_tree(&categories));
            println!();
            println!("Run 'bookkeeper budget list' to see your budgets.");
        }
        Some(Commands::Config) => {
            let store = settings.store_config(&paths);
            println!("Bookkeeper Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Database:       {}", store.db_path.display());
            println!();
            println!("Settings:");
            println!("  Default period:  {}", settings.default_period);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Busy timeout:    {} ms", settings.busy_timeout_ms);
        }
        Some(Commands::Category(cmd)) => {
            let storage = open_storage(&paths, &settings)?;
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            let storage = open_storage(&paths, &settings)?;
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            let storage = open_storage(&paths, &settings)?;
            handle_budget_command(&storage, &settings, cmd)?;
        }
        None => {
            println!("Bookkeeper - expense tracking by category and budget");
            println!();
            println!("Run 'bookkeeper init' to get started.");
            println!("Run 'bookkeeper --help' for usage information.");
        }
    }

    Ok(())
}

fn open_storage(paths: &BookkeeperPaths, settings: &Settings) -> Result<Storage> {
    paths.ensure_directories()?;
    Ok(Storage::open(&settings.store_config(paths))?)
}
