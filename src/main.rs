use anyhow::Result;
use bit_diff::areas::repository::Repository;
use bit_diff::artifacts::diff::diff_list::DiffList;
use bit_diff::artifacts::diff::options::{
    DEFAULT_CONTEXT_LINES, DEFAULT_INTERHUNK_LINES, DiffFlags, DiffOptions,
};
use bit_diff::artifacts::diff::print::{DiffSink, PatchPrinter, WriterSink};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "bit-diff",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Compare git trees, staged entries and blobs",
    long_about = "This tool compares two trees, the staged entries against a tree, \
    or two blobs of a git repository, and prints the result as a unified patch \
    or as a compact status listing.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        global = true,
        value_name = "PATH",
        help = "Run as if started in PATH instead of the current directory"
    )]
    repository: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Log progress to stderr (repeat for more detail)"
    )]
    verbose: u8,
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = ColorChoice::Auto,
        help = "When to colorize the output"
    )]
    color: ColorChoice,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "trees",
        about = "Show changes between two trees",
        long_about = "This command compares two trees. Either side may be given as a \
        full or abbreviated tree or commit id; commits are peeled to their tree."
    )]
    Trees {
        #[arg(index = 1, help = "The old tree")]
        old: String,
        #[arg(index = 2, help = "The new tree")]
        new: String,
        #[command(flatten)]
        args: DiffArgs,
        #[arg(index = 3, last = true, help = "Limit the output to these paths")]
        paths: Vec<String>,
    },
    #[command(
        name = "cached",
        about = "Show changes between a tree and the staged entries",
        long_about = "This command compares a tree, the old side, against the entries \
        staged in the index, the new side."
    )]
    Cached {
        #[arg(index = 1, help = "The tree to compare the index against")]
        tree: String,
        #[command(flatten)]
        args: DiffArgs,
        #[arg(index = 2, last = true, help = "Limit the output to these paths")]
        paths: Vec<String>,
    },
    #[command(
        name = "blobs",
        about = "Show the hunks between two blobs",
        long_about = "This command compares the content of two blobs and prints only \
        their hunks, without any file header."
    )]
    Blobs {
        #[arg(index = 1, help = "The old blob")]
        old: String,
        #[arg(index = 2, help = "The new blob")]
        new: String,
        #[command(flatten)]
        args: DiffArgs,
    },
}

#[derive(Args)]
struct DiffArgs {
    #[arg(long = "name-status", help = "Show only the status and path of each change")]
    name_status: bool,
    #[arg(short = 'R', help = "Swap the old and new sides")]
    reverse: bool,
    #[arg(short = 'a', long = "text", help = "Treat all files as text")]
    text: bool,
    #[arg(
        short = 'U',
        long = "unified",
        default_value_t = DEFAULT_CONTEXT_LINES,
        help = "Number of context lines around each change"
    )]
    unified: usize,
    #[arg(
        long = "inter-hunk-context",
        default_value_t = DEFAULT_INTERHUNK_LINES,
        help = "Merge hunks separated by up to this many extra lines"
    )]
    inter_hunk_context: usize,
    #[arg(short = 'w', long = "ignore-all-space", help = "Ignore whitespace when comparing lines")]
    ignore_all_space: bool,
    #[arg(short = 'b', long = "ignore-space-change", help = "Ignore changes in amount of whitespace")]
    ignore_space_change: bool,
    #[arg(long = "ignore-space-at-eol", help = "Ignore whitespace changes at line end")]
    ignore_space_at_eol: bool,
    #[arg(long = "src-prefix", help = "Prefix of old-side paths instead of \"a/\"")]
    src_prefix: Option<String>,
    #[arg(long = "dst-prefix", help = "Prefix of new-side paths instead of \"b/\"")]
    dst_prefix: Option<String>,
}

impl DiffArgs {
    fn flags(&self) -> DiffFlags {
        [
            (self.reverse, DiffFlags::REVERSE),
            (self.text, DiffFlags::FORCE_TEXT),
            (self.ignore_all_space, DiffFlags::IGNORE_WHITESPACE),
            (self.ignore_space_change, DiffFlags::IGNORE_WHITESPACE_CHANGE),
            (self.ignore_space_at_eol, DiffFlags::IGNORE_WHITESPACE_EOL),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(DiffFlags::empty(), |flags, (_, flag)| flags | flag)
    }

    fn to_options(&self, paths: &[String]) -> DiffOptions {
        let mut builder = DiffOptions::builder()
            .flags(self.flags())
            .context_lines(self.unified)
            .interhunk_lines(self.inter_hunk_context)
            .pathspec(paths.iter().cloned());

        if let Some(prefix) = &self.src_prefix {
            builder = builder.src_prefix(prefix.clone());
        }
        if let Some(prefix) = &self.dst_prefix {
            builder = builder.dst_prefix(prefix.clone());
        }

        builder.build()
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print(mut diff: DiffList<'_>, name_status: bool, sink: &mut impl DiffSink) -> Result<()> {
    if name_status {
        diff.print_compact(sink)?;
    } else {
        diff.print_patch(sink)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal(),
    };
    colored::control::set_override(color);

    let path = match cli.repository {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let repository = Repository::open(&path)?;
    let mut sink = WriterSink::new(std::io::stdout().lock(), color);

    match &cli.command {
        Commands::Trees {
            old,
            new,
            args,
            paths,
        } => {
            let old = repository.resolve_tree(old)?;
            let new = repository.resolve_tree(new)?;
            let diff = repository.diff_tree_to_tree(&old, &new, args.to_options(paths))?;

            print(diff, args.name_status, &mut sink)?
        }
        Commands::Cached { tree, args, paths } => {
            let tree = repository.resolve_tree(tree)?;
            let diff = repository.diff_index_to_tree(&tree, args.to_options(paths))?;

            print(diff, args.name_status, &mut sink)?
        }
        Commands::Blobs { old, new, args } => {
            let old = repository.resolve_object(old)?;
            let new = repository.resolve_object(new)?;
            let options = args.to_options(&[]);

            repository.diff_blobs(
                Some(&old),
                Some(&new),
                &options,
                &mut PatchPrinter::new(&mut sink, &options),
            )?
        }
    }

    Ok(())
}
