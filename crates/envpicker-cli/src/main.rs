mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_CONSTRAINT_ERROR, EXIT_FAILURE, EXIT_STORE_ERROR};
use envpicker_manager::EnvRegistry;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Dispatch;

#[derive(Debug, Parser)]
#[command(
    name = "envpicker",
    version,
    about = "Register Python environments and check their dependencies against version constraints"
)]
struct Cli {
    /// Registry directory (defaults to $ENV_MANAGER_PATH, then ~/.env_manager).
    #[arg(long, global = true)]
    root: Option<String>,

    /// Environment manager to use; repeat to give a preference order.
    #[arg(long = "manager", value_name = "NAME", global = true)]
    managers: Vec<String>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register one environment directory.
    Register {
        /// Environment directory.
        path: PathBuf,
        /// Python interpreter (defaults to bin/python inside the environment).
        #[arg(long)]
        python: Option<PathBuf>,
        /// Display name (defaults to the directory name).
        #[arg(long)]
        name: Option<String>,
        /// Replace an existing registration for the same path.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Register every environment the selected manager knows about.
    RegisterAll,
    /// List registered environments.
    List,
    /// Show a registered environment with its dependencies.
    Inspect {
        /// Environment directory.
        path: PathBuf,
    },
    /// Check an environment's installed package against a constraint.
    Check {
        /// Environment directory.
        path: PathBuf,
        /// Constraint such as "numpy>=1.20,<2".
        constraint: String,
    },
    /// Evaluate a constraint against a version.
    Match {
        /// Constraint such as ">=1.1,<2.0" or "numpy>=1.1".
        constraint: String,
        /// Version to test.
        version: String,
    },
    /// Show which environment managers are available.
    Managers,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[allow(clippy::too_many_lines)]
fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("ENVPICKER_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);

    let root = cli.root.as_deref().map(expand_tilde);
    let open_registry = || -> Result<EnvRegistry, String> {
        EnvRegistry::open(root.as_deref())
            .map(|registry| registry.with_dispatch(dispatch.clone()))
            .map_err(|e| e.to_string())
    };
    let preferences: Vec<&str> = cli.managers.iter().map(String::as_str).collect();
    let preferences = (!preferences.is_empty()).then_some(preferences.as_slice());
    let json_output = cli.json;

    let result = match cli.command {
        Commands::Register {
            path,
            python,
            name,
            force,
        } => open_registry().and_then(|registry| {
            commands::register::run(
                &registry,
                preferences,
                &path,
                python.as_deref(),
                name.as_deref(),
                force,
                json_output,
            )
        }),
        Commands::RegisterAll => open_registry().and_then(|registry| {
            commands::register_all::run(&registry, preferences, json_output)
        }),
        Commands::List => {
            open_registry().and_then(|registry| commands::list::run(&registry, json_output))
        }
        Commands::Inspect { path } => open_registry().and_then(|registry| {
            commands::inspect::run(&registry, preferences, &path, json_output)
        }),
        Commands::Check { path, constraint } => open_registry().and_then(|registry| {
            commands::check::run(&registry, preferences, &path, &constraint, json_output)
        }),
        Commands::Match {
            constraint,
            version,
        } => commands::matches::run(&constraint, &version, json_output),
        Commands::Managers => open_registry()
            .and_then(|registry| commands::managers::run(&registry, preferences, json_output)),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("constraint error:") {
                EXIT_CONSTRAINT_ERROR
            } else if msg.starts_with("store error:") {
                EXIT_STORE_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn manager_flag_repeats_in_order() {
        let cli = Cli::parse_from([
            "envpicker",
            "--manager",
            "venv",
            "--manager",
            "mock",
            "list",
        ]);
        assert_eq!(cli.managers, ["venv", "mock"]);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["envpicker", "list", "--json", "--root", "/tmp/reg"]);
        assert!(cli.json);
        assert_eq!(cli.root.as_deref(), Some("/tmp/reg"));
    }

    #[test]
    fn register_arguments() {
        let cli = Cli::parse_from([
            "envpicker",
            "register",
            "/envs/ml",
            "--python",
            "/envs/ml/bin/python3",
            "--name",
            "ml",
            "--force",
        ]);
        match cli.command {
            Commands::Register {
                path,
                python,
                name,
                force,
            } => {
                assert_eq!(path, PathBuf::from("/envs/ml"));
                assert_eq!(python, Some(PathBuf::from("/envs/ml/bin/python3")));
                assert_eq!(name.as_deref(), Some("ml"));
                assert!(force);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("rel"), PathBuf::from("rel"));
    }
}
