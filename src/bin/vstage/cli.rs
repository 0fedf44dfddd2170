use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vstage",
    about = "Stage VASP input files from a calculation queue",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write POSCAR, INCAR, and auxiliary inputs for an entry
    #[command(visible_alias = "w")]
    Write(WriteArgs),

    /// Import a POSCAR/INCAR pair into the queue as a new entry
    #[command(visible_alias = "a")]
    Add(AddArgs),

    /// List the entries stored in a queue
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Summarize one entry without writing anything
    Show(ShowArgs),
}

impl Command {
    pub fn quiet(&self) -> bool {
        match self {
            Command::Write(args) => args.queue.quiet,
            Command::Add(args) => args.queue.quiet,
            Command::List(args) => args.queue.quiet,
            Command::Show(args) => args.queue.quiet,
        }
    }
}

/// Queue selection shared by all commands.
#[derive(Args)]
pub struct QueueOptions {
    /// Queue directory holding one <ENTRY>.toml per entry
    #[arg(short = 'q', long = "queue", value_name = "DIR")]
    pub root: PathBuf,

    /// Suppress banner, progress, and tables (for scripting)
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Args)]
#[command(next_help_heading = "POSCAR Output")]
pub struct PoscarOptions {
    /// Write Cartesian instead of direct (fractional) coordinates
    #[arg(long)]
    pub cartesian: bool,

    /// Omit the species line (VASP 4 layout)
    #[arg(long)]
    pub no_species: bool,

    /// Decimal places for lattice vectors and positions
    #[arg(
        long,
        value_name = "N",
        default_value = "10",
        value_parser = clap::value_parser!(u8).range(1..=16)
    )]
    pub precision: u8,
}

#[derive(Args)]
pub struct WriteArgs {
    #[command(flatten)]
    pub queue: QueueOptions,

    /// Entry identifier
    #[arg(value_name = "ENTRY")]
    pub entry: String,

    /// Destination: a directory, a file inside one, or a path to create
    /// (current directory if omitted)
    #[arg(value_name = "DEST")]
    pub destination: Option<PathBuf>,

    #[command(flatten)]
    pub poscar: PoscarOptions,
}

#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub queue: QueueOptions,

    /// Entry identifier (replaces an existing entry of the same name)
    #[arg(value_name = "ENTRY")]
    pub entry: String,

    /// Structure file in POSCAR format
    #[arg(long, value_name = "FILE")]
    pub poscar: PathBuf,

    /// Tag file in INCAR format
    #[arg(long, value_name = "FILE")]
    pub incar: PathBuf,

    #[command(flatten)]
    pub kpoints: KpointsOptions,
}

#[derive(Args)]
#[command(next_help_heading = "K-Points")]
pub struct KpointsOptions {
    /// Automatic mesh subdivisions along a, b, c
    #[arg(long = "kpoints-grid", value_name = "N", num_args = 3)]
    pub grid: Option<Vec<u32>>,

    /// Gamma-centred mesh instead of Monkhorst-Pack
    #[arg(long, requires = "grid")]
    pub gamma: bool,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub queue: QueueOptions,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub queue: QueueOptions,

    /// Entry identifier
    #[arg(value_name = "ENTRY")]
    pub entry: String,
}

pub fn parse() -> Cli {
    Cli::parse()
}
