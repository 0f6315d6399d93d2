//! # famly
//!
//! A household organiser for the terminal: shared chore lists that reset on a schedule,
//! shopping lists, a recipe book and a weekly meal planner, all scoped to a family
//! that others join with a short code.
//!
//! ## Usage
//!
//! ```bash
//! famly login alice --name "Alice" --email alice@example.com
//! famly family create "The Smiths"      # prints the join code
//! famly family join K7Q2ZD              # as another user
//!
//! famly tasks add "Kitchen" --reset daily
//! famly tasks item add 1 "Empty dishwasher"
//! famly tasks item toggle 1 1
//! famly tasks reset                     # clear lists whose reset is due
//!
//! famly shopping add "Groceries"
//! famly shopping item add 1 "Milk"
//!
//! famly recipes add "Lasagne" --link https://example.com/lasagne
//! famly meals set 2025-03-14 1
//! famly meals week
//!
//! famly home                            # dashboard
//! famly                                 # interactive TUI
//! ```
//!
//! ## Reset Intervals
//!
//! *   `daily`: resets at midnight.
//! *   `weekly` (default): resets at the start of the next Sunday; on a Sunday, a week later.
//! *   `monthly`: same day next month, clamped to the month's last day.
//! *   `custom`: never resets on its own.
//!
//! ## Data Storage
//!
//! Data lives in `store.json` and `session.json` in your local data directory
//! (`~/.local/share/famly/` on Linux). Set `FAMLY_DB` to use another store file;
//! the session is kept beside it. `FAMLY_LOG` sets the log filter (e.g. `debug`).

mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use famly::commands::*;
use famly::logging;
use tui::run_tui;

#[derive(Parser)]
#[command(name = "famly")]
#[command(about = "Household lists, chores and meal planning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in (registers the user on first use)
    Login {
        /// User id
        uid: String,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Sign out
    Logout,
    /// Create, join and switch families
    Family {
        #[command(subcommand)]
        command: FamilyCommands,
    },
    /// Manage chore lists
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage shopping lists
    Shopping {
        #[command(subcommand)]
        command: ShoppingCommands,
    },
    /// Manage the recipe book
    Recipes {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Plan meals
    Meals {
        #[command(subcommand)]
        command: MealCommands,
    },
    /// Show the family dashboard
    Home,
    /// Delete all stored data
    Wipe {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum FamilyCommands {
    /// Create a family and make it current
    Create {
        name: String,
    },
    /// Join a family with its join code
    Join {
        code: String,
    },
    /// Switch the current family
    Use {
        id: u64,
    },
    /// List your families
    List,
    /// List members of the current family
    Members,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a task list
    Add {
        title: String,
        /// Reset interval (daily, weekly, monthly, custom)
        #[arg(short, long)]
        reset: Option<String>,
    },
    /// List task lists
    List,
    /// Show the items of a task list
    Show {
        list: u64,
    },
    /// Remove a task list and its items
    Remove {
        list: u64,
    },
    /// Change a list's reset interval
    Interval {
        list: u64,
        /// daily, weekly, monthly or custom
        interval: String,
    },
    /// Reset a list now, or every list that is due when no list is given
    Reset {
        list: Option<u64>,
    },
    /// Manage the items of a task list
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
}

#[derive(Subcommand)]
enum ShoppingCommands {
    /// Add a shopping list
    Add {
        title: String,
    },
    /// List shopping lists
    List,
    /// Show the items of a shopping list
    Show {
        list: u64,
    },
    /// Remove a shopping list and its items
    Remove {
        list: u64,
    },
    /// Manage the items of a shopping list
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Add an item
    Add {
        list: u64,
        name: String,
    },
    /// Check or uncheck an item
    Toggle {
        list: u64,
        item: u64,
    },
    /// Remove an item
    Remove {
        list: u64,
        item: u64,
    },
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// Add a recipe
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        link: Option<String>,
    },
    /// List recipes
    List,
    /// Remove a recipe
    Remove {
        id: u64,
    },
}

#[derive(Subcommand)]
enum MealCommands {
    /// Plan a recipe for a date (YYYY-MM-DD); omit the recipe to clear the date
    Set {
        date: String,
        recipe: Option<u64>,
    },
    /// Show the week's meal plan
    Week {
        /// Any date in the week (YYYY-MM-DD), default today
        #[arg(short, long)]
        date: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(matches!(cli.command, None | Some(Commands::Ui)));
    match cli.command {
        Some(Commands::Login { uid, name, email }) => cmd_login(uid, name, email, false),
        Some(Commands::Logout) => cmd_logout(false),
        Some(Commands::Family { command }) => match command {
            FamilyCommands::Create { name } => cmd_family_create(name, false),
            FamilyCommands::Join { code } => cmd_family_join(code, false),
            FamilyCommands::Use { id } => cmd_family_use(id, false),
            FamilyCommands::List => cmd_family_list(),
            FamilyCommands::Members => cmd_family_members(),
        },
        Some(Commands::Tasks { command }) => match command {
            TaskCommands::Add { title, reset } => cmd_tasks_add(title, reset, false),
            TaskCommands::List => cmd_tasks_list(),
            TaskCommands::Show { list } => cmd_tasks_show(list),
            TaskCommands::Remove { list } => cmd_tasks_remove(list, false),
            TaskCommands::Interval { list, interval } => cmd_tasks_interval(list, interval, false),
            TaskCommands::Reset { list } => cmd_tasks_reset(list, false),
            TaskCommands::Item { command } => match command {
                ItemCommands::Add { list, name } => cmd_task_add(list, name, false),
                ItemCommands::Toggle { list, item } => cmd_task_toggle(list, item, false),
                ItemCommands::Remove { list, item } => cmd_task_remove(list, item, false),
            },
        },
        Some(Commands::Shopping { command }) => match command {
            ShoppingCommands::Add { title } => cmd_shopping_add(title, false),
            ShoppingCommands::List => cmd_shopping_list(),
            ShoppingCommands::Show { list } => cmd_shopping_show(list),
            ShoppingCommands::Remove { list } => cmd_shopping_remove(list, false),
            ShoppingCommands::Item { command } => match command {
                ItemCommands::Add { list, name } => cmd_shopping_item_add(list, name, false),
                ItemCommands::Toggle { list, item } => cmd_shopping_item_toggle(list, item, false),
                ItemCommands::Remove { list, item } => cmd_shopping_item_remove(list, item, false),
            },
        },
        Some(Commands::Recipes { command }) => match command {
            RecipeCommands::Add { title, description, link } => cmd_recipe_add(title, description, link, false),
            RecipeCommands::List => cmd_recipe_list(),
            RecipeCommands::Remove { id } => cmd_recipe_remove(id, false),
        },
        Some(Commands::Meals { command }) => match command {
            MealCommands::Set { date, recipe } => cmd_meal_set(date, recipe, false),
            MealCommands::Week { date } => cmd_meal_week(date),
        },
        Some(Commands::Home) => cmd_home(),
        Some(Commands::Wipe { force }) => cmd_wipe(force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "famly", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui() {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
