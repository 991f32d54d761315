use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{info, warn};

use crate::error::AdvisoryError;

/// Program used for "Open in editor" unless configured otherwise.
pub const DEFAULT_EDITOR: &str = "darktable";

/// Opens a resolved base file in an external program.
pub trait EditorLauncher {
    fn program(&self) -> &str;

    /// Launches the program on `base_file` without waiting for it.
    fn launch(&self, base_file: &Path) -> Result<(), AdvisoryError>;
}

/// Launches a program found on `PATH`, passing the base file as the last
/// argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
}

impl CommandLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn darktable() -> Self {
        Self::new(DEFAULT_EDITOR)
    }

    /// The platform's default file opener.
    pub fn system_opener() -> Self {
        if cfg!(target_os = "windows") {
            Self::new("cmd").with_arg("/C").with_arg("start").with_arg("")
        } else if cfg!(target_os = "macos") {
            Self::new("open")
        } else {
            Self::new("xdg-open")
        }
    }
}

impl EditorLauncher for CommandLauncher {
    fn program(&self) -> &str {
        &self.program
    }

    fn launch(&self, base_file: &Path) -> Result<(), AdvisoryError> {
        if !base_file.exists() {
            return Err(AdvisoryError::BaseFileMissing {
                path: base_file.to_path_buf(),
            });
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(base_file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| {
                warn!(program = %self.program, error = %source, "Editor launch failed");
                match source.kind() {
                    ErrorKind::NotFound => AdvisoryError::EditorNotFound {
                        program: self.program.clone(),
                    },
                    _ => AdvisoryError::LaunchFailed {
                        program: self.program.clone(),
                        source,
                    },
                }
            })?;

        info!(program = %self.program, ?base_file, "Launched external editor");
        // Reap the child in the background so it never lingers as a zombie.
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_program_is_editor_not_found() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("IMG_0001.CR3");
        fs::write(&base, b"raw").unwrap();

        let launcher = CommandLauncher::new("kestrel-no-such-editor-binary");
        match launcher.launch(&base) {
            Err(AdvisoryError::EditorNotFound { program }) => {
                assert_eq!(program, "kestrel-no-such-editor-binary")
            }
            other => panic!("expected EditorNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_base_file() {
        let dir = tempdir().unwrap();
        let launcher = CommandLauncher::darktable();
        let err = launcher.launch(&dir.path().join("gone.CR3")).unwrap_err();
        assert!(matches!(err, AdvisoryError::BaseFileMissing { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_existing_program() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("IMG_0002.CR3");
        fs::write(&base, b"raw").unwrap();

        assert!(CommandLauncher::new("true").launch(&base).is_ok());
    }

    #[test]
    fn test_editor_not_found_message() {
        let err = AdvisoryError::EditorNotFound {
            program: DEFAULT_EDITOR.to_string(),
        };
        assert!(err.to_string().starts_with("darktable executable not found"));
    }

    #[test]
    fn test_system_opener_has_program() {
        assert!(!CommandLauncher::system_opener().program().is_empty());
    }
}
