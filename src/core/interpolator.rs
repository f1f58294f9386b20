// src/core/interpolator.rs

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\$\{([^{}]+)\}").expect("static regex");
}

/// Substituted for `${buildType}` when the context has none.
pub const DEFAULT_BUILD_TYPE: &str = "Debug";

/// The placeholders this module knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder<'a> {
    WorkspaceRoot,
    WorkspaceFolderName,
    Toolset,
    BuildType,
    Env(&'a str),
}

impl<'a> Placeholder<'a> {
    fn parse(name: &'a str) -> Option<Self> {
        if let Some(var) = name.strip_prefix("env:") {
            return Some(Self::Env(var));
        }
        match name {
            "workspaceRoot" | "workspaceFolder" => Some(Self::WorkspaceRoot),
            "workspaceRootFolderName" | "workspaceFolderBasename" => Some(Self::WorkspaceFolderName),
            "toolset" => Some(Self::Toolset),
            "buildType" => Some(Self::BuildType),
            _ => None,
        }
    }
}

/// A read-only snapshot of the values placeholders resolve to.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionContext {
    workspace_root: Option<String>,
    folder_name: Option<String>,
    toolset: Option<String>,
    build_type: Option<String>,
    env: HashMap<String, String>,
}

impl SubstitutionContext {
    /// Context rooted at `root`, with the folder name taken from its last
    /// component. Windows verbatim prefixes are stripped.
    pub fn from_workspace(root: &Path) -> Self {
        let clean = dunce::simplified(root).to_string_lossy().to_string();
        Self::default().with_workspace_root(clean)
    }

    pub fn with_workspace_root(mut self, root: impl Into<String>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    pub fn with_folder_name(mut self, name: impl Into<String>) -> Self {
        self.folder_name = Some(name.into());
        self
    }

    pub fn with_toolset(mut self, toolset: impl Into<String>) -> Self {
        self.toolset = Some(toolset.into());
        self
    }

    pub fn with_build_type(mut self, build_type: impl Into<String>) -> Self {
        self.build_type = Some(build_type.into());
        self
    }

    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Copies the current process environment into the snapshot.
    pub fn with_process_env(self) -> Self {
        self.with_env(std::env::vars())
    }

    fn resolve(&self, placeholder: Placeholder<'_>) -> Option<String> {
        match placeholder {
            Placeholder::WorkspaceRoot => self.workspace_root.clone(),
            Placeholder::WorkspaceFolderName => self
                .folder_name
                .clone()
                .or_else(|| self.workspace_root.as_deref().and_then(last_component)),
            Placeholder::Toolset => self.toolset.clone(),
            Placeholder::BuildType => Some(
                self.build_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BUILD_TYPE.to_string()),
            ),
            Placeholder::Env(name) => Some(self.env.get(name).cloned().unwrap_or_default()),
        }
    }
}

/// Replaces every `${name}` placeholder in one pass.
///
/// Unknown names, and known names with neither a value nor a default, are
/// left exactly as written. Substituted text is never scanned again, so a
/// value that itself looks like a placeholder stays literal.
pub fn substitute(template: &str, context: &SubstitutionContext) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let name = caps.get(1).map_or("", |m| m.as_str());
            match Placeholder::parse(name).and_then(|p| context.resolve(p)) {
                Some(value) => value,
                None => {
                    log::debug!("Leaving unresolved placeholder '{}' in place", whole);
                    whole.to_string()
                }
            }
        })
        .into_owned()
}

fn last_component(path: &str) -> Option<String> {
    path.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}
