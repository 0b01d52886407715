use std::env;
use std::path::Path;
use std::process::Command;

use arboard::Clipboard;
use shell_words::split;

use super::App;

impl App {
    /// Copy the selected file path to the clipboard.
    pub fn copy_selected_path(&mut self) {
        let Some(scored) = self.selected() else {
            self.ui.error = Some("No file selected to copy".to_string());
            self.ui.dirty = true;
            return;
        };
        let rel = scored.candidate.rel.clone();

        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(rel.as_str().to_string()) {
                    self.ui.error = Some(format!("Clipboard error: {}", e));
                } else {
                    self.ui.status = Some(format!("Copied {} to clipboard", rel));
                }
            }
            Err(e) => {
                self.ui.error = Some(format!("Clipboard unavailable: {}", e));
            }
        }

        self.ui.dirty = true;
    }
}

/// Resolve the editor command line from the environment.
fn editor_command() -> Result<Vec<String>, String> {
    for key in ["QUICKJUMP_EDITOR", "VISUAL", "EDITOR"] {
        if let Ok(value) = env::var(key) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            match split(trimmed) {
                Ok(parts) if !parts.is_empty() => return Ok(parts),
                Ok(_) => continue,
                Err(e) => {
                    return Err(format!("Failed to parse ${}: {}", key, e));
                }
            }
        }
    }
    Err("Set $QUICKJUMP_EDITOR, $VISUAL, or $EDITOR to open files".to_string())
}

/// Launch the external editor on an accepted file.
///
/// Called by the main loop after the terminal has been restored, so no
/// suspend/resume dance is needed. vi-family editors get a `+line` argument.
pub fn launch_editor(abs: &Path, line: u32) -> Result<(), String> {
    let parts = editor_command()?;
    let (program, args) = parts
        .split_first()
        .expect("editor command is non-empty");

    let mut cmd = Command::new(program);
    cmd.args(args);

    let base = Path::new(program)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(program);
    if matches!(base, "vi" | "vim" | "nvim") {
        cmd.arg(format!("+{}", line + 1));
    }
    cmd.arg(abs);

    match cmd.status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("Editor exited with code {:?}", status.code())),
        Err(e) => Err(format!("Failed to launch editor: {}", e)),
    }
}
