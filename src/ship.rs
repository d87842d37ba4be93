//! Delegation to an external manifest-update command.
//!
//! The command string is operator-supplied and split shell-style; the image
//! tag (and optional manifest path) are appended as flags. Output is
//! captured and reported, not streamed.

use anyhow::{anyhow, Context, Result};
use std::process::Command;

#[derive(Debug)]
pub struct ScriptOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ScriptOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `command --image-tag <tag> [--file-path <path>]` to completion.
pub fn run_update_script(
    command: &str,
    image_tag: &str,
    file_path: Option<&str>,
) -> Result<ScriptOutput> {
    if image_tag.is_empty() {
        return Err(anyhow!("an image tag is required"));
    }
    let mut args =
        shell_words::split(command).with_context(|| format!("parse command: {command}"))?;
    if args.is_empty() {
        return Err(anyhow!("update command is empty"));
    }
    let program = args.remove(0);

    let mut invocation = Command::new(&program);
    invocation.args(&args).arg("--image-tag").arg(image_tag);
    if let Some(path) = file_path {
        invocation.arg("--file-path").arg(path);
    }

    let output = invocation
        .output()
        .with_context(|| format!("spawn {program}"))?;
    let exit_code = output.status.code().unwrap_or(-1);
    tracing::info!(program = %program, image_tag, exit_code, "update script finished");

    Ok(ScriptOutput {
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_image_tag_flag_and_captures_stdout() {
        let output = run_update_script("echo updating", "demo:02", None).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "updating --image-tag demo:02");
    }

    #[test]
    fn file_path_flag_is_optional() {
        let output = run_update_script("echo", "demo:02", Some("serve.yaml")).unwrap();
        assert!(output
            .stdout
            .contains("--file-path serve.yaml"));
    }

    #[test]
    fn nonzero_exit_is_reported_not_an_error() {
        let output = run_update_script("sh -c exit\\ 3 --", "demo:02", None);
        // `sh -c 'exit 3'` ignores the extra flags passed after --.
        let output = output.unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, 3);
    }

    #[test]
    fn empty_command_and_empty_tag_are_rejected() {
        assert!(run_update_script("", "demo:02", None).is_err());
        assert!(run_update_script("   ", "demo:02", None).is_err());
        assert!(run_update_script("echo", "", None).is_err());
    }
}
