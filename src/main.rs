use anyhow::Result;
use clap::Parser;
use qipi_install::config::{Config, Options};
use qipi_install::error::{CARGO_FALLBACK, InstallError};
use qipi_install::install::{install, target_for};
use std::path::PathBuf;
use std::process::ExitCode;

/// qipi-install - installer for the Qipi package manager binary (qp)
///
/// Downloads the prebuilt `qp` release asset for this platform and places it
/// in the install directory with executable permission.
///
/// Examples:
///   qipi-install                          # Install the bundled version into ~/.qipi/bin
///   qipi-install --release-version 0.2.0  # Install a specific release
///   qipi-install --print-target           # Show the asset target for this host
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Release version to install (defaults to this installer's version)
    #[arg(long = "release-version", env = "QIPI_VERSION", value_name = "VERSION")]
    release_version: Option<String>,

    /// Directory to place the binary in (defaults to $QIPI_HOME/bin or ~/.qipi/bin)
    #[arg(long = "dest", short = 'd', env = "QIPI_INSTALL_DIR", value_name = "PATH")]
    install_dir: Option<PathBuf>,

    /// Release host (defaults to https://github.com)
    #[arg(long = "base-url", env = "QIPI_RELEASE_BASE_URL", value_name = "URL")]
    base_url: Option<String>,

    /// Seconds before a stalled download is aborted
    #[arg(long, env = "QIPI_TIMEOUT", value_name = "SECS")]
    timeout: Option<u64>,

    /// Extra attempts after a timed-out download
    #[arg(long, env = "QIPI_RETRIES", value_name = "N")]
    retries: Option<usize>,

    /// Override the detected operating system (windows, linux, macos)
    #[arg(long, value_name = "OS")]
    os: Option<String>,

    /// Override the detected architecture (x64, arm64, x86)
    #[arg(long, value_name = "ARCH")]
    arch: Option<String>,

    /// Print the resolved target triple and exit without downloading
    #[arg(long)]
    print_target: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            version: self.release_version.clone(),
            install_dir: self.install_dir.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
            retries: self.retries,
            os: self.os.clone(),
            arch: self.arch.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.print_target {
        println!("{}", target_for(cli.os.as_deref(), cli.arch.as_deref())?);
        return Ok(());
    }

    let runtime = qipi_install::runtime::RealRuntime;
    let config = Config::new(&runtime, cli.options())?;

    let triple = target_for(config.os.as_deref(), config.arch.as_deref())?;
    println!("Installing Qipi (qp) v{}...", config.version);
    println!(
        "Downloading from: {}",
        config.source.download_url(&config.version, &triple)
    );
    let path = install(runtime, &config).await?;

    println!("Qipi installed successfully!");
    println!("Binary location: {}", path.display());
    println!("Try running: qp --help");
    Ok(())
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<InstallError>() {
        Some(e) => {
            eprintln!("Installation failed ({}): {}", e.kind(), e);
            eprintln!("{}", e.hint());
        }
        None => {
            eprintln!("Installation failed: {:#}", error);
            eprintln!("You can try installing via Cargo instead: {}", CARGO_FALLBACK);
        }
    }
}
