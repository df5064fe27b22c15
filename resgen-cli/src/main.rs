mod debug;

use std::{io, path::PathBuf, process};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use resgen::{Generator, Include, RunReport};
use tracing_subscriber::EnvFilter;

use resgen_cli::{
    ConfigFile, expand_includes,
    validation::{ValidationContext, validate_context},
};

use crate::debug::run_debug_command;

#[derive(Parser, Debug)]
#[command(name = "resgen", author, version, about, long_about = None)]
struct Args {
    /// Log debug details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate Java, C++ and .properties files from resource bundles.
    Generate(GenerateArgs),

    /// Load a resource bundle and print it as JSON.
    Debug {
        /// The resource bundle to load
        #[arg(short, long)]
        input: String,

        /// Write the JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Include files or glob patterns, relative to the source directory
    includes: Vec<String>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backends to generate: java (managed), c++ (cpp, native) or all
    #[arg(long)]
    mode: Option<String>,

    /// Source directory
    #[arg(long)]
    srcdir: Option<PathBuf>,

    /// Output directory for generated source files
    #[arg(long)]
    destdir: Option<PathBuf>,

    /// Output directory for generated .properties files
    #[arg(long)]
    resdir: Option<PathBuf>,

    /// Comma-separated locales, e.g. en_US,fr_FR
    #[arg(long)]
    locales: Option<String>,

    /// Java code style: dynamic (direct) or functor
    #[arg(long)]
    style: Option<String>,

    /// Regenerate files even when they are up to date
    #[arg(long)]
    force: bool,

    /// Comment style: normal or scm-safe
    #[arg(long)]
    comment_style: Option<String>,

    /// Java class name of the single include
    #[arg(long)]
    class_name: Option<String>,

    /// Java base class of the single include
    #[arg(long)]
    base_class_name: Option<String>,

    /// C++ class name of the single include
    #[arg(long)]
    cpp_class_name: Option<String>,

    /// C++ base class of the single include
    #[arg(long)]
    cpp_base_class_name: Option<String>,
}

impl GenerateArgs {
    fn has_include_overrides(&self) -> bool {
        self.class_name.is_some()
            || self.base_class_name.is_some()
            || self.cpp_class_name.is_some()
            || self.cpp_base_class_name.is_some()
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "resgen=debug" } else { "resgen=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_generate(args: GenerateArgs) -> Result<RunReport, String> {
    let mut config = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let options = &mut config.options;
    if let Some(dir) = &args.srcdir {
        options.src_dir = dir.clone();
    }
    if let Some(dir) = &args.destdir {
        options.dest_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.resdir {
        options.res_dir = Some(dir.clone());
    }
    if let Some(locales) = &args.locales {
        options.locales = Some(locales.clone());
    }
    options.force |= args.force;

    let mut patterns: Vec<String> = config.includes.iter().map(|i| i.name.clone()).collect();
    patterns.extend(args.includes.iter().cloned());
    let names = expand_includes(&config.options.src_dir, &patterns)?;

    let mut context = ValidationContext::new()
        .with_src_dir(config.options.src_dir.clone())
        .with_include_overrides(args.has_include_overrides());
    for name in &names {
        context = context.with_include(name.clone());
    }
    if let Some(locales) = &config.options.locales {
        context = context.with_locales(locales.clone());
    }
    if let Some(mode) = &args.mode {
        context = context.with_mode(mode.clone());
    }
    if let Some(style) = &args.style {
        context = context.with_style(style.clone());
    }
    if let Some(style) = &args.comment_style {
        context = context.with_comment_style(style.clone());
    }
    validate_context(&context)?;

    let options = &mut config.options;
    if let Some(mode) = &args.mode {
        options.mode = mode.trim().parse()?;
    }
    if let Some(style) = &args.style {
        options.style = style.trim().parse()?;
    }
    if let Some(style) = &args.comment_style {
        options.comment_style = style.trim().parse()?;
    }

    // Configured includes keep their per-file settings; everything else
    // takes the command-line overrides.
    let includes: Vec<Include> = names
        .into_iter()
        .map(|name| {
            match config.includes.iter().find(|i| i.name == name) {
                Some(configured) => configured.clone(),
                None => Include {
                    name,
                    class_name: args.class_name.clone(),
                    base_class_name: args.base_class_name.clone(),
                    cpp_class_name: args.cpp_class_name.clone(),
                    cpp_base_class_name: args.cpp_base_class_name.clone(),
                },
            }
        })
        .collect();

    let generator = Generator::with_shapes(config.options.clone(), config.shape_table());
    Ok(generator.run(&includes))
}

fn print_report(report: &RunReport) {
    for outcome in &report.outcomes {
        match &outcome.error {
            None => println!(
                "✅ {} ({} generated, {} up to date)",
                outcome.path.display(),
                outcome.generated.len(),
                outcome.up_to_date.len()
            ),
            Some(e) => {
                println!("❌ {}", outcome.path.display());
                eprintln!("Error: {}", e);
            }
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.commands {
        Commands::Generate(generate) => match run_generate(generate) {
            Ok(report) => {
                print_report(&report);
                if report.has_errors() {
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Commands::Debug { input, output } => {
            if let Err(e) = run_debug_command(input, output) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Commands::Completions { shell } => {
            let mut command = Args::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        }
    }
}
