use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use latree::{analyze_formula, canonical};
use latree_ast::{permutations, TreePrinter};
use latree_parser::parser::{render_snippet, Diagnostic};
use latree_parser::{BuilderConfig, EqualPrecedence, TreeBuilder};

#[derive(Debug, Parser)]
#[command(
    name = "latree",
    version,
    about = "Build expression trees from LaTeX-flavoured algebraic formulas",
    long_about = "latree reads a formula such as \\left(a-b\\right)\\times\\left(a+b\\right)=a^2-b^2\n\
        and builds its n-ary expression tree in a single pass.\n\n\
        EXAMPLES:\n\
        \n  latree parse 'a+b*c'                  Print the tree as an outline\n\
        \n  latree render --file formula.tex      Check that the formula round-trips\n\
        \n  latree json 'x^2=4'                   Emit a JSON report\n\
        \n  echo 'a+b+c' | latree permute         List commutative reorderings",
    after_help = "Builder defaults can also be set with LATREE_EQUAL_PRECEDENCE,\n\
        LATREE_MERGE_ALTERNATES and LATREE_MAX_DEPTH."
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the tree of a formula as an indented outline
    Parse(InputArgs),

    /// Build a formula and render it back, failing if the text changes
    #[command(
        long_about = "Builds the formula and renders the tree back to text.\n\n\
            Exits with status 3 when the rendering differs from the input\n\
            (whitespace aside)."
    )]
    Render(InputArgs),

    /// Output the tree and any error as JSON
    Json(InputArgs),

    /// List the formulas obtained by reordering commutative operands
    Permute(PermuteArgs),
}

#[derive(Debug, Args, Clone)]
struct InputArgs {
    /// Formula text (reads --file or stdin if not provided)
    #[arg(value_name = "FORMULA")]
    formula: Option<String>,

    /// Read the formula from a file
    #[arg(short, long, value_name = "FILE", conflicts_with = "formula")]
    file: Option<PathBuf>,

    #[command(flatten)]
    builder: BuilderArgs,
}

#[derive(Debug, Args, Clone, Default)]
struct BuilderArgs {
    /// Refuse different operators of equal precedence instead of applying them left to right
    #[arg(long)]
    reject_equal_precedence: bool,

    /// Keep `-` and `/` out of `+` and `*` chains
    #[arg(long)]
    no_merge_alternates: bool,

    /// Deepest tree accepted
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_depth: Option<u32>,
}

impl BuilderArgs {
    /// Environment defaults with command-line flags on top.
    fn config(&self, base: BuilderConfig) -> BuilderConfig {
        let mut config = base;
        if self.reject_equal_precedence {
            config = config.equal_precedence(EqualPrecedence::Reject);
        }
        if self.no_merge_alternates {
            config = config.merge_alternates(false);
        }
        if let Some(depth) = self.max_depth {
            config = config.max_depth(depth as usize);
        }
        config
    }
}

#[derive(Debug, Args, Clone)]
struct PermuteArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Maximum number of formulas to print
    #[arg(long, value_name = "N", default_value_t = 64)]
    limit: usize,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn read_formula(args: &InputArgs) -> Result<String, String> {
    if let Some(formula) = &args.formula {
        return Ok(formula.clone());
    }
    let text = if let Some(path) = &args.file {
        fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {e}", path.display()))?
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read from stdin: {e}"))?;
        buf
    };
    Ok(text.trim_end().to_string())
}

fn report_failure(err: &latree_parser::ParseError, source: &str) -> i32 {
    eprintln!(
        "{}",
        render_snippet(&Diagnostic::from_parse_error(err, source), source)
    );
    1
}

fn run_parse(source: &str, config: BuilderConfig) -> i32 {
    match TreeBuilder::new().with_config(config).build(source) {
        Ok(tree) => match TreePrinter::new().print(&tree) {
            Ok(outline) => {
                print!("{outline}");
                0
            }
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        },
        Err(err) => report_failure(&err, source),
    }
}

fn run_render(source: &str, config: BuilderConfig) -> i32 {
    match TreeBuilder::new().with_config(config).build(source) {
        Ok(tree) => {
            let rendered = tree.render();
            println!("{rendered}");
            if rendered == canonical(source) {
                0
            } else {
                eprintln!("error: rendering does not reproduce the formula");
                3
            }
        }
        Err(err) => report_failure(&err, source),
    }
}

fn run_json(source: &str, config: BuilderConfig) -> i32 {
    let report = analyze_formula(source, &config);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: failed to serialize report: {e}");
            return 1;
        }
    }
    if report.error.is_some() {
        1
    } else {
        0
    }
}

fn run_permute(source: &str, config: BuilderConfig, limit: usize) -> i32 {
    match TreeBuilder::new().with_config(config).build(source) {
        Ok(tree) => {
            let found = permutations(&tree, limit);
            log::info!("{} arrangement(s) of `{source}`", found.len());
            for tree in found {
                println!("{}", tree.render());
            }
            0
        }
        Err(err) => report_failure(&err, source),
    }
}

fn run_cli(cli: Cli) -> i32 {
    init_logger(cli.verbose);

    let input = match &cli.command {
        Command::Parse(args) | Command::Render(args) | Command::Json(args) => args,
        Command::Permute(args) => &args.input,
    };
    let source = match read_formula(input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let config = input.builder.config(BuilderConfig::from_env());
    log::debug!("builder configuration: {config:?}");

    match &cli.command {
        Command::Parse(_) => run_parse(&source, config),
        Command::Render(_) => run_render(&source, config),
        Command::Json(_) => run_json(&source, config),
        Command::Permute(args) => run_permute(&source, config, args.limit),
    }
}

fn main() {
    std::process::exit(run_cli(Cli::parse()));
}
