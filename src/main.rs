use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

use pihole_preflight::config::UnknownArchitecturePolicy;
use pihole_preflight::core::validation::is_valid_ipv4;
use pihole_preflight::ftl::FtlDownloader;
use pihole_preflight::probe::{HostPackages, HostProbe, SystemProbe};
use pihole_preflight::status::{ConsoleSink, RecordingSink, StatusSink};
use pihole_preflight::{logging, InstallerConfig, InstallerError, Preflight, Result};

#[derive(Parser)]
#[command(name = "pihole-preflight")]
#[command(version)]
#[command(about = "Pi-hole installer environment checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, help = "Enable verbose output", global = true)]
    verbose: bool,

    #[arg(long, value_name = "PATH", help = "Configuration file", global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Answer yes to every prompt", global = true)]
    yes: bool,

    #[arg(
        long,
        help = "Continue without FTL on unknown architectures",
        global = true
    )]
    skip_unknown_arch: bool,

    #[arg(long, help = "Do not refresh the package cache", global = true)]
    no_cache_update: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run every preflight check in order")]
    Check {
        #[arg(long, help = "Print a JSON report instead of status lines")]
        json: bool,

        #[arg(long, help = "Record the IPv6 decision in setupVars.conf")]
        write_setup_vars: bool,
    },

    #[command(about = "Check that the distribution is supported")]
    Distro,

    #[command(about = "Check the SELinux enforcement mode")]
    Selinux,

    #[command(about = "Detect the CPU architecture and install FTL")]
    Arch {
        #[arg(long, help = "Only report the matching FTL binary")]
        no_install: bool,
    },

    #[command(about = "Choose the IPv6 address used for blocking")]
    Ipv6,

    #[command(about = "Exit 0 if ADDRESS is a valid IPv4 address, 1 otherwise")]
    ValidIp {
        #[arg(help = "Address to validate")]
        address: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("{} {e:#}", "⚠".yellow());
    }

    if let Commands::ValidIp { address } = &cli.command {
        let valid = is_valid_ipv4(address);
        tracing::debug!(address = %address, valid, "IPv4 validation");
        return if valid {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn load_config(cli: &Cli) -> Result<InstallerConfig> {
    let mut config = InstallerConfig::load(cli.config.as_deref())?;
    if cli.yes {
        config.assume_yes = true;
    }
    if cli.skip_unknown_arch {
        config.unknown_architecture = UnknownArchitecturePolicy::Skip;
    }
    if cli.no_cache_update {
        config.update_package_cache = false;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let probe = HostProbe::new();
    let packages = HostPackages::new(probe.package_manager());
    let artifacts = FtlDownloader::new(&config);
    let preflight = Preflight::new(&config, &probe, &packages, &artifacts);

    let mut console = ConsoleSink;
    match &cli.command {
        Commands::Check {
            json: true,
            write_setup_vars,
        } => run_check_json(&preflight, *write_setup_vars),
        Commands::Check {
            json: false,
            write_setup_vars,
        } => {
            let report = preflight.run(&mut console)?;
            if *write_setup_vars {
                preflight.write_setup_vars(&report.ipv6)?;
                console.info(&format!(
                    "Saved IPv6 setting to {}",
                    config.setup_vars_path.display()
                ));
            }
            Ok(())
        }
        Commands::Distro => preflight.check_distribution(&mut console).map(|_| ()),
        Commands::Selinux => preflight.check_selinux(&mut console).map(|_| ()),
        Commands::Arch { no_install } => preflight
            .check_architecture(!no_install, &mut console)
            .map(|_| ()),
        Commands::Ipv6 => {
            let selection = preflight.select_ipv6(&mut console)?;
            if let Some(address) = selection.address() {
                println!("{address}");
            }
            Ok(())
        }
        Commands::ValidIp { .. } => Ok(()),
    }
}

fn run_check_json(preflight: &Preflight<'_>, write_setup_vars: bool) -> Result<()> {
    colored::control::set_override(false);

    let mut recorder = RecordingSink::new();
    let outcome = preflight.run(&mut recorder).and_then(|report| {
        if write_setup_vars {
            preflight.write_setup_vars(&report.ipv6)?;
        }
        Ok(report)
    });

    let document = match &outcome {
        Ok(report) => serde_json::json!({
            "outcome": "continue",
            "report": report,
            "lines": recorder.lines(),
        }),
        Err(e) => serde_json::json!({
            "outcome": "abort",
            "error": { "kind": e.kind(), "message": e.to_string().trim_end() },
            "lines": recorder.lines(),
        }),
    };

    let rendered = serde_json::to_string_pretty(&document)
        .map_err(|e| InstallerError::Other(anyhow::Error::new(e)))?;
    println!("{rendered}");

    outcome.map(|_| ())
}
