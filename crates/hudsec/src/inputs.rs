// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of command-line paths into the files a run needs.
//!
//! | Arguments                                  | Mode                        |
//! |--------------------------------------------|-----------------------------|
//! | `<home>`                                   | file, layout under `<home>` |
//! | `-i <home>`                                | interactive, keys under `<home>` |
//! | `<master.key> <hudson.util.Secret>`        | interactive                 |
//! | `<master.key> <hudson.util.Secret> <doc>`  | file                        |

use std::path::{Path, PathBuf};

use hudsec_config::model::LayoutConfig;
use thiserror::Error;

/// What to do once the key is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Extract and decrypt every token in this document.
    File(PathBuf),
    /// Read tokens from the terminal until end of input.
    Interactive,
}

/// Input files and mode for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub master_key: PathBuf,
    pub wrapped_key: PathBuf,
    pub mode: Mode,
}

#[derive(Debug, Error)]
pub enum PlanError {
    /// Arguments do not form any of the supported invocations.
    #[error("{0}")]
    Usage(String),

    /// Files the layout requires are absent from the home directory.
    #[error("failed finding required files where they were expected: {}", display_paths(.0))]
    MissingFiles(Vec<PathBuf>),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Usage text listing every supported invocation.
pub fn usage() -> String {
    [
        "Usage:",
        "\thudsec <server_home>",
        "or:",
        "\thudsec <master.key> <hudson.util.Secret> [credentials.xml]",
        "or:",
        "\thudsec -i <server_home> (interactive mode)",
    ]
    .join("\n")
}

/// Build the run plan from positional paths.
///
/// Home-directory invocations check that every required file exists before
/// anything is read. Explicit key file paths are not checked here; reading
/// them reports any problem.
pub fn plan(
    paths: &[PathBuf],
    interactive: bool,
    layout: &LayoutConfig,
) -> Result<RunPlan, PlanError> {
    match (paths, interactive) {
        ([home], _) => plan_home(home, interactive, layout),
        ([master_key, wrapped_key], _) => Ok(RunPlan {
            master_key: master_key.clone(),
            wrapped_key: wrapped_key.clone(),
            mode: Mode::Interactive,
        }),
        ([master_key, wrapped_key, document], false) => Ok(RunPlan {
            master_key: master_key.clone(),
            wrapped_key: wrapped_key.clone(),
            mode: Mode::File(document.clone()),
        }),
        ([_, _, _], true) => Err(PlanError::Usage(
            "interactive mode takes a server home or two key files, not a document".to_string(),
        )),
        _ => Err(PlanError::Usage(format!("expected 1 to 3 paths, got {}", paths.len()))),
    }
}

fn plan_home(home: &Path, interactive: bool, layout: &LayoutConfig) -> Result<RunPlan, PlanError> {
    if !home.is_dir() {
        return Err(PlanError::Usage(format!("{} is not a directory", home.display())));
    }

    let master_key = home.join(&layout.master_key_file);
    let wrapped_key = home.join(&layout.confidentiality_key_file);
    let mode = if interactive {
        Mode::Interactive
    } else {
        Mode::File(home.join(&layout.credentials_file))
    };

    let mut required = vec![&master_key, &wrapped_key];
    if let Mode::File(document) = &mode {
        required.push(document);
    }
    let missing: Vec<PathBuf> = required
        .into_iter()
        .filter(|p| !p.is_file())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(PlanError::MissingFiles(missing));
    }

    Ok(RunPlan {
        master_key,
        wrapped_key,
        mode,
    })
}
