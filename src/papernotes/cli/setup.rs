use clap::{Args, Parser, Subcommand};
use papernotes::model::{Field, PaperFields, RecordPatch};

/// Returns the version string, including the git hash for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "papers", bin_name = "papers", version = get_version())]
#[command(about = "Keep notes on the research papers you read", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a paper
    #[command(alias = "a", display_order = 1)]
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// List papers
    #[command(alias = "ls", display_order = 2)]
    List {
        /// Only papers whose fields contain this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Only papers whose field equals a value, e.g. --where year=2017
        #[arg(short = 'w', long = "where", value_name = "FIELD=VALUE")]
        constraints: Vec<String>,
    },

    /// Show one or more papers in full
    #[command(alias = "v", display_order = 3)]
    View {
        /// Positions or ids of the papers (e.g. 1 3 6f1c1ad4)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Change fields of a paper
    #[command(alias = "e", display_order = 4)]
    Edit {
        /// Position or id of the paper
        selector: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete one or more papers
    #[command(alias = "rm", display_order = 5)]
    Delete {
        /// Positions or ids of the papers (e.g. 1 3 6f1c1ad4)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Write the whole database as JSON (stdout unless a file is given)
    #[command(display_order = 10)]
    Export {
        /// Output file
        file: Option<String>,

        /// Write to the configured export-file when no file is given
        #[arg(long)]
        save: bool,
    },

    /// Replace the database with a previously exported JSON file
    #[command(display_order = 11)]
    Import {
        /// Input file
        file: String,
    },

    /// Copy the database to the backup slot
    #[command(display_order = 12)]
    Backup,

    /// Replace the database with the backup copy
    #[command(display_order = 13)]
    Restore,

    /// Delete every paper
    #[command(display_order = 14)]
    Purge {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Write the CSV report (stdout unless a file is given)
    #[command(display_order = 15)]
    Csv {
        /// Output file
        file: Option<String>,

        /// Write to the configured csv-file when no file is given
        #[arg(long)]
        save: bool,
    },

    /// Get or set configuration
    #[command(display_order = 20)]
    Config {
        /// Configuration key (csv-file, export-file, backup-before-import)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// One flag per paper field, shared by `add` and `edit`.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub authors: Option<String>,

    #[arg(short, long)]
    pub year: Option<String>,

    /// Where the paper came from
    #[arg(short, long)]
    pub found: Option<String>,

    #[arg(short, long)]
    pub notes: Option<String>,

    /// Points to come back to
    #[arg(short, long)]
    pub points: Option<String>,

    /// Link to the original document
    #[arg(long)]
    pub org_link: Option<String>,

    /// Link to the highlighted copy
    #[arg(long)]
    pub hl_link: Option<String>,
}

impl FieldArgs {
    fn pairs(self) -> [(Field, Option<String>); 8] {
        [
            (Field::Title, self.title),
            (Field::Authors, self.authors),
            (Field::Year, self.year),
            (Field::Found, self.found),
            (Field::Notes, self.notes),
            (Field::Points, self.points),
            (Field::OrgLink, self.org_link),
            (Field::HlLink, self.hl_link),
        ]
    }

    /// Fields for a new record; missing flags become empty strings.
    pub fn into_fields(self) -> PaperFields {
        let mut fields = PaperFields::default();
        for (field, value) in self.pairs() {
            if let Some(value) = value {
                fields.set(field, value);
            }
        }
        fields
    }

    /// Only the flags that were given.
    pub fn into_patch(self) -> RecordPatch {
        self.pairs()
            .into_iter()
            .fold(RecordPatch::default(), |patch, (field, value)| match value {
                Some(value) => patch.with(field, value),
                None => patch,
            })
    }
}
