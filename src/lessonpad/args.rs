use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lessonpad")]
#[command(about = "Plan lessons, with AI-assisted drafting", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Lesson fields settable from the command line.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Lesson topic
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Subject (e.g. Math)
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Grade level
    #[arg(short, long)]
    pub grade: Option<String>,

    /// Lesson date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Short summary
    #[arg(long)]
    pub summary: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new lesson plan
    #[command(alias = "n")]
    New {
        #[command(flatten)]
        fields: FieldArgs,

        /// Skip opening the editor
        #[arg(long)]
        no_editor: bool,
    },

    /// List lesson plans, newest first
    #[command(alias = "ls")]
    List,

    /// View one or more lesson plans
    #[command(alias = "v")]
    View {
        /// Indexes or id prefixes (e.g. 1 3-5 a1b2c3)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Edit a lesson plan (opens the editor unless fields are given)
    #[command(alias = "e")]
    Edit {
        /// Index or id prefix
        index: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Ask the AI service to fill in a lesson plan
    #[command(alias = "s")]
    Suggest {
        /// Index or id prefix of a stored lesson (omit to start a new one)
        index: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,

        /// Apply the suggestion without asking
        #[arg(short, long, conflicts_with = "dry_run")]
        yes: bool,

        /// Show the suggestion without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete one or more lesson plans
    #[command(alias = "rm")]
    Delete {
        /// Indexes or id prefixes (e.g. 1 3-5 a1b2c3)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Migrate legacy entries and report unreadable ones
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., ai-model)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
