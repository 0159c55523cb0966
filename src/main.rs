use anyhow::Result;
use clap::{Parser, Subcommand};
use minigit::LOG_ENV;
use minigit::areas::lock::RepositoryLock;
use minigit::areas::repository::Repository;
use minigit::commands::porcelain::log::LogOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "minigit",
    version = "0.1.0",
    about = "A minimal version control system",
    long_about = "A minimal content-addressed version control system with branches, \
    a greedy line diff and three-way merges. Repository data lives in a .minigit \
    directory next to the working files.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory \
        or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "add",
        about = "Add files to the staging area",
        long_about = "This command stores the content of the given files as blobs and \
        stages them for the next commit. Directories are added recursively."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files or directories to add")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged files on top of the current commit \
        and advances the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "log",
        about = "Show commit history",
        long_about = "This command lists commits starting from HEAD, following first parents."
    )]
    Log {
        #[arg(long, help = "Show one line per commit")]
        oneline: bool,
    },
    #[command(
        name = "branch",
        about = "Create, list, or delete branches",
        long_about = "Without a name this command lists branches. With a name it creates \
        a branch at HEAD, or deletes it when --delete is given."
    )]
    Branch {
        #[arg(index = 1, help = "The branch name")]
        name: Option<String>,
        #[arg(short, long, help = "List branches")]
        list: bool,
        #[arg(short, long, requires = "name", help = "Delete the branch")]
        delete: bool,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or detach HEAD at a commit",
        long_about = "This command replaces the tracked files of the working tree with the \
        snapshot of a branch tip or of a commit given by its full object id."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch name or commit id")]
        target: String,
    },
    #[command(
        name = "merge",
        about = "Merge a branch into the current branch",
        long_about = "This command performs a three-way merge using a common ancestor. \
        Conflicting files are written with conflict markers and no commit is created."
    )]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
    #[command(
        name = "diff",
        about = "Show changes between commits or against the working tree",
        long_about = "With no argument this command compares HEAD to the working tree. \
        With one revision it compares that commit to the working tree, with two it \
        compares the commits."
    )]
    Diff {
        #[arg(index = 1, num_args = 0..=2, help = "Up to two revisions to compare")]
        revisions: Vec<String>,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command lists staged changes, unstaged changes and untracked files."
    )]
    Status,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let pwd = std::env::current_dir()?;

    if let Commands::Init { path } = &cli.command {
        let path = path.clone().unwrap_or(pwd);
        let repository = Repository::new(&path, Box::new(std::io::stdout()))?;

        return repository.init();
    }

    let repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;
    if !repository.is_initialized() {
        anyhow::bail!(
            "not a minigit repository: {} (run `minigit init` first)",
            repository.path().display()
        );
    }
    let _lock = RepositoryLock::acquire(&repository.metadata_path())?;

    match &cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Add { paths } => repository.add(paths),
        Commands::Commit { message } => repository.commit(message),
        Commands::Log { oneline } => repository.log(&LogOptions { oneline: *oneline }),
        Commands::Branch { name, list, delete } => match name {
            Some(name) if *delete => repository.delete_branch(name),
            Some(name) if !*list => repository.branch(name),
            _ => repository.list_branches(),
        },
        Commands::Checkout { target } => repository.checkout(target),
        Commands::Merge { branch } => repository.merge(branch),
        Commands::Diff { revisions } => repository.diff(
            revisions.first().map(String::as_str),
            revisions.get(1).map(String::as_str),
        ),
        Commands::Status => repository.status(),
    }
}

fn main() {
    init_tracing();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(error) = run(Cli::parse()) {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
