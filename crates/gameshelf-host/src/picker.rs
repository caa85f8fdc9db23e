//! Native file picker
//!
//! Runs `zenity`, or `kdialog` when zenity is missing. A non-zero exit from
//! the dialog means the user cancelled.

use crate::HostError;
use gameshelf_config::PickerConfig;
use std::path::PathBuf;
use std::process::Stdio;

/// What the user is picking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickKind {
    Executable,
    Image,
}

impl PickKind {
    fn title(self) -> &'static str {
        match self {
            PickKind::Executable => "Select executable",
            PickKind::Image => "Select image",
        }
    }

    fn filter_name(self) -> &'static str {
        match self {
            PickKind::Executable => "Executables",
            PickKind::Image => "Images",
        }
    }
}

/// File picker configured with extension filters
#[derive(Debug, Clone)]
pub struct FilePicker {
    executable_extensions: Vec<String>,
    image_extensions: Vec<String>,
}

impl Default for FilePicker {
    fn default() -> Self {
        Self::from_config(&PickerConfig::default())
    }
}

impl FilePicker {
    pub fn from_config(config: &PickerConfig) -> Self {
        Self {
            executable_extensions: config.executable_extensions.clone(),
            image_extensions: config.image_extensions.clone(),
        }
    }

    /// Glob patterns for `kind`, e.g. `*.png *.jpg`
    pub fn patterns(&self, kind: PickKind) -> String {
        let extensions = match kind {
            PickKind::Executable => &self.executable_extensions,
            PickKind::Image => &self.image_extensions,
        };

        extensions
            .iter()
            .map(|ext| format!("*.{}", ext.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn zenity_args(&self, kind: PickKind) -> Vec<String> {
        let mut args = vec![
            "--file-selection".to_string(),
            format!("--title={}", kind.title()),
            format!("--file-filter={} | {}", kind.filter_name(), self.patterns(kind)),
        ];
        if kind == PickKind::Executable {
            args.push("--file-filter=All file types | *".to_string());
        }
        args
    }

    fn kdialog_args(&self, kind: PickKind) -> Vec<String> {
        vec![
            "--title".to_string(),
            kind.title().to_string(),
            "--getopenfilename".to_string(),
            ".".to_string(),
            format!("{} ({})", kind.filter_name(), self.patterns(kind)),
        ]
    }

    /// Show the dialog; `Ok(None)` when cancelled
    pub async fn pick(&self, kind: PickKind) -> Result<Option<PathBuf>, HostError> {
        let (program, args) = if let Ok(path) = which::which("zenity") {
            (path, self.zenity_args(kind))
        } else if let Ok(path) = which::which("kdialog") {
            (path, self.kdialog_args(kind))
        } else {
            return Err(HostError::PickerUnavailable);
        };

        tracing::debug!("Opening file picker {}", program.display());

        let output = tokio::process::Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| HostError::Picker(e.to_string()))?;

        if !output.status.success() {
            return Ok(None);
        }

        let selected = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if selected.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(selected)))
        }
    }
}
