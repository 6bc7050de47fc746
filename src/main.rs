use anyhow::Result;
use clap::Parser;
use pkgdesc::commands::{self, config::Config};
use pkgdesc::package::ManifestFormat;
use std::path::PathBuf;

/// pkgdesc - package descriptor tool
///
/// Validate a declarative package descriptor, discover the packages below a
/// project root and emit the manifest consumed by installer tooling.
///
/// Examples:
///   pkgdesc check                       # Validate ./package.toml
///   pkgdesc emit --format pkg-info      # Print core metadata
#[derive(Parser, Debug)]
#[command(author, version = env!("PKGDESC_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root (defaults to the current directory; also via PKGDESC_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "PKGDESC_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub project_root: Option<PathBuf>,

    /// Descriptor file (defaults to <root>/package.toml; also via PKGDESC_FILE)
    #[arg(
        long = "file",
        short = 'f',
        env = "PKGDESC_FILE",
        value_name = "PATH",
        global = true
    )]
    pub file: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate the descriptor and check entry-point targets
    Check,

    /// List the packages discovered below the project root
    Packages,

    /// Render the descriptor for installer tooling
    Emit(EmitArgs),

    /// Show a summary of the descriptor
    Show,
}

#[derive(clap::Args, Debug)]
pub struct EmitArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ManifestFormat::Json)]
    pub format: ManifestFormat,

    /// Write to this file instead of standard output
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config::new(pkgdesc::runtime::RealRuntime, cli.project_root, cli.file)?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Check => commands::check(&config, &mut stdout)?,
        Commands::Packages => commands::packages(&config, &mut stdout)?,
        Commands::Emit(args) => {
            commands::emit(&config, args.format, args.output.as_deref(), &mut stdout)?
        }
        Commands::Show => commands::show(&config, &mut stdout)?,
    }
    Ok(())
}
