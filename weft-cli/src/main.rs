use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weft_cli::{Config, Format, RenderArgs, bundle_cmd, compile_cmd, render_cmd, unparse_cmd};

#[derive(Parser)]
#[command(name = "weft", version, about = "Weft template compiler and renderer")]
struct Cli {
    /// TOML config with [compile] and [render] tables (default: ./weft.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Raise log verbosity; repeat for more
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compiled tree as JSON.
    Compile {
        input: PathBuf,
        /// Keep whitespace around standalone directives
        #[arg(long)]
        no_elide: bool,
    },
    /// Print source equivalent to the compiled template.
    Unparse { input: PathBuf },
    /// Render a template against JSON data.
    Render {
        input: PathBuf,
        /// JSON data file (default: empty object)
        #[arg(long)]
        data: Option<PathBuf>,
        /// Bundle file whose templates become partials
        #[arg(long)]
        partials: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,
        /// Hand slots over to this host in vtree output
        #[arg(long)]
        host: Option<String>,
    },
    /// List the templates in a bundle file.
    Bundle { input: PathBuf },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut config = Config::load(cli.config.as_deref())?;

    let out = match cli.command {
        Commands::Compile { input, no_elide } => {
            if no_elide {
                config.compile.elide_standalone = false;
            }
            compile_cmd(&input, &config.compile)?
        }
        Commands::Unparse { input } => unparse_cmd(&input, &config.compile)?,
        Commands::Render {
            input,
            data,
            partials,
            format,
            host,
        } => {
            let args = RenderArgs {
                data,
                partials,
                format,
                host,
            };
            render_cmd(&input, &args, &config)?
        }
        Commands::Bundle { input } => bundle_cmd(&input)?,
    };
    print!("{out}");
    if !out.ends_with('\n') {
        println!();
    }
    Ok(())
}
