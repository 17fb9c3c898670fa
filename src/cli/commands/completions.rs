//! Shell completions generation.
//!
//! Generates shell completion scripts for bash, zsh, fish, PowerShell and
//! elvish.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::FrontlineError;

/// Execute the completions command.
///
/// # Errors
///
/// Returns an error for an unsupported shell name.
pub fn completions(shell: &str, install: bool) -> Result<String, FrontlineError> {
    let shell_type = shell_from_str(shell).ok_or_else(|| {
        FrontlineError::Config(format!(
            "Unknown shell: {shell}. Supported: bash, zsh, fish, powershell, elvish"
        ))
    })?;

    if install {
        Ok(completion_install_instructions(shell_type))
    } else {
        generate_completions(shell_type)
    }
}

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, FrontlineError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "frontline", &mut buf);
    String::from_utf8(buf).map_err(|e| FrontlineError::Config(format!("UTF-8 error: {e}")))
}

/// Get shell from string name.
#[must_use]
pub fn shell_from_str(s: &str) -> Option<Shell> {
    match s.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "powershell" | "ps" | "pwsh" => Some(Shell::PowerShell),
        "elvish" => Some(Shell::Elvish),
        _ => None,
    }
}

/// Get installation instructions for shell completions.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc:
source <(frontline completions bash)
"
        .to_string(),
        Shell::Zsh => r"# Save to your fpath:
frontline completions zsh > ~/.zsh/completions/_frontline
# Then add to ~/.zshrc:
fpath=(~/.zsh/completions $fpath)
autoload -Uz compinit && compinit
"
        .to_string(),
        Shell::Fish => r"# Save to fish completions directory:
frontline completions fish > ~/.config/fish/completions/frontline.fish
"
        .to_string(),
        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
frontline completions powershell | Out-String | Invoke-Expression
"
        .to_string(),
        Shell::Elvish => r"# Save to elvish completions directory:
frontline completions elvish > ~/.config/elvish/lib/frontline.elv
"
        .to_string(),
        _ => format!("# Completions for {shell} are not documented"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_from_str() {
        assert_eq!(shell_from_str("bash"), Some(Shell::Bash));
        assert_eq!(shell_from_str("ZSH"), Some(Shell::Zsh));
        assert_eq!(shell_from_str("pwsh"), Some(Shell::PowerShell));
        assert_eq!(shell_from_str("tcsh"), None);
    }

    #[test]
    fn test_generate_completions_mentions_commands() {
        let script = generate_completions(Shell::Bash).unwrap();
        assert!(script.contains("frontline"));
        assert!(script.contains("enqueue"));
    }

    #[test]
    fn test_unknown_shell_is_config_error() {
        assert!(matches!(
            completions("tcsh", false),
            Err(FrontlineError::Config(_))
        ));
    }

    #[test]
    fn test_install_instructions() {
        let text = completions("fish", true).unwrap();
        assert!(text.contains("frontline.fish"));
    }
}
