use super::EXIT_SUCCESS;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

/// Write the completion script for `shell` to `out`, named after the command itself.
pub fn render<C: CommandFactory>(shell: Shell, out: &mut dyn Write) {
    let mut command = C::command();
    let bin_name = command.get_name().to_owned();
    clap_complete::generate(shell, &mut command, bin_name, out);
}

#[allow(clippy::unnecessary_wraps)]
pub fn run<C: CommandFactory>(shell: Shell) -> Result<u8, String> {
    render::<C>(shell, &mut std::io::stdout());
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Parser, Subcommand};

    #[allow(dead_code)]
    #[derive(Parser)]
    #[command(name = "picker-demo")]
    struct Demo {
        #[command(subcommand)]
        command: DemoCommand,
    }

    #[derive(Subcommand)]
    enum DemoCommand {
        Inspect,
    }

    #[test]
    fn script_uses_command_name_and_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let mut out = Vec::new();
            render::<Demo>(shell, &mut out);
            let script = String::from_utf8(out).unwrap();
            assert!(script.contains("picker-demo"), "{shell}: {script}");
            assert!(script.contains("inspect"), "{shell}: {script}");
        }
    }
}
