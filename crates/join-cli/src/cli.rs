use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "joinboard")]
#[command(about = "A kanban task board with drag-and-drop columns", long_about = None)]
#[command(version, arg_required_else_help = true)]
pub struct Cli {
    /// Path to board data file (or set JOINBOARD_FILE env var)
    #[arg(value_name = "FILE", env = "JOINBOARD_FILE")]
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Task operations
    Task(TaskCommand),
    /// Contact operations
    Contact(ContactCommand),
    /// Board summary metrics
    Summary,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add(TaskAddArgs),
    /// List tasks grouped by column
    List(TaskListArgs),
    /// Get a specific task
    Get {
        #[arg(long)]
        id: String,
    },
    /// Update a task
    Update(TaskUpdateArgs),
    /// Drag a task to a column position
    Move {
        #[arg(long)]
        id: String,
        /// Destination column
        #[arg(long)]
        to: String,
        /// Index within the destination column; appends when omitted
        #[arg(long)]
        position: Option<usize>,
    },
    /// Step a task to an adjacent column, menu-style
    SetStatus {
        #[arg(long)]
        id: String,
        #[arg(long)]
        status: String,
    },
    /// Delete a task
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Args)]
pub struct TaskAddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Due date, YYYY-MM-DD
    #[arg(long)]
    pub due_date: String,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub category: String,
    #[arg(long, value_delimiter = ',')]
    pub assigned: Vec<String>,
    /// Repeatable; each occurrence adds one subtask
    #[arg(long = "subtask")]
    pub subtasks: Vec<String>,
    /// Column the task starts in (default: todo)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct TaskListArgs {
    #[arg(long)]
    pub status: Option<String>,
    /// Case-insensitive substring match on title and description
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct TaskUpdateArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long)]
    pub due_date: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, value_delimiter = ',')]
    pub assigned: Option<Vec<String>>,
}

#[derive(Args)]
pub struct ContactCommand {
    #[command(subcommand)]
    pub action: ContactAction,
}

#[derive(Subcommand)]
pub enum ContactAction {
    /// List contacts with their badge initials and colors
    List,
}
