//! Reattach command template resolution.
//!
//! The template comes from the first source that yields one:
//! 1. `attach-command-template` under `[pipe-menu]` in `~/.config/openbox/tmux.ini`
//! 2. A terminal emulator (`urxvt`, then `xterm`) found on the search path
//!
//! Configuration problems of any kind fall through to the path search.

use anyhow::{Context, Result};
use ini::{Ini, ParseOption};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shell::shell_quote;
use crate::tmux::attach_template;

const CONFIG_SECTION: &str = "pipe-menu";
const CONFIG_KEY: &str = "attach-command-template";
const TERMINALS: &[&str] = &["urxvt", "xterm"];
const DEFAULT_SEARCH_PATH: &str = "/bin:/usr/bin";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no terminal emulator found")]
    NoTerminalFound,
}

/// Shell command line with `%s` standing in for the quoted session name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReattachTemplate(String);

impl ReattachTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replace every `%s` with `arg`. `%%` is a literal `%`; other `%` sequences are kept.
    pub fn substitute(&self, arg: &str) -> String {
        let mut out = String::with_capacity(self.0.len() + arg.len());
        let mut chars = self.0.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some('s') => {
                    chars.next();
                    out.push_str(arg);
                }
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                _ => out.push('%'),
            }
        }
        out
    }
}

/// One way of coming up with a template
pub trait TemplateSource {
    fn name(&self) -> &'static str;
    fn resolve(&self) -> Option<String>;
}

/// Default location of the user configuration file
pub fn default_config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("openbox").join("tmux.ini"))
}

/// Template configured in the INI file
pub struct ConfigFileSource {
    path: PathBuf,
}

impl ConfigFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TemplateSource for ConfigFileSource {
    fn name(&self) -> &'static str {
        "config file"
    }

    fn resolve(&self) -> Option<String> {
        match read_configured_template(&self.path) {
            Ok(template) => template,
            Err(e) => {
                tracing::debug!("ignoring config: {:#}", e);
                None
            }
        }
    }
}

fn read_configured_template(path: &Path) -> Result<Option<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    // Values are taken verbatim: no quote stripping, no escapes
    let opt = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    };
    let conf = Ini::load_from_str_opt(&contents, opt)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    // Option names are case-insensitive, section names are not
    let template = conf.section(Some(CONFIG_SECTION)).and_then(|props| {
        props
            .iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(CONFIG_KEY))
            .map(|(_, value)| value.trim().to_string())
    });
    Ok(template)
}

/// Template built around the first terminal emulator found on the search path
pub struct TerminalSearch {
    search_path: Option<OsString>,
    candidates: Vec<String>,
}

impl TerminalSearch {
    pub fn new(search_path: Option<OsString>) -> Self {
        Self::with_candidates(search_path, TERMINALS)
    }

    pub fn with_candidates(search_path: Option<OsString>, candidates: &[&str]) -> Self {
        Self {
            search_path,
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Earlier candidates beat later ones regardless of where they sit on the path
    pub fn find(&self) -> Option<PathBuf> {
        let search_path = self
            .search_path
            .as_deref()
            .unwrap_or_else(|| OsStr::new(DEFAULT_SEARCH_PATH));

        self.candidates.iter().find_map(|name| {
            std::env::split_paths(search_path)
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(|dir| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }
}

impl TemplateSource for TerminalSearch {
    fn name(&self) -> &'static str {
        "terminal search"
    }

    fn resolve(&self) -> Option<String> {
        let terminal = self.find()?;
        let quoted = shell_quote(&terminal.to_string_lossy()).replace('%', "%%");
        Some(attach_template(&quoted))
    }
}

/// Ordered chain of template sources, first hit wins
pub struct TemplateResolver {
    sources: Vec<Box<dyn TemplateSource>>,
}

impl TemplateResolver {
    pub fn new(sources: Vec<Box<dyn TemplateSource>>) -> Self {
        Self { sources }
    }

    /// Standard chain: config file (if a path is known), then terminal search
    pub fn from_env(config_path: Option<PathBuf>, search_path: Option<OsString>) -> Self {
        let mut sources: Vec<Box<dyn TemplateSource>> = Vec::new();
        if let Some(path) = config_path {
            sources.push(Box::new(ConfigFileSource::new(path)));
        }
        sources.push(Box::new(TerminalSearch::new(search_path)));
        Self::new(sources)
    }

    pub fn resolve(&self) -> Result<ReattachTemplate, ConfigError> {
        for source in &self.sources {
            if let Some(template) = source.resolve() {
                tracing::debug!(source = source.name(), %template, "resolved reattach template");
                return Ok(ReattachTemplate::new(template));
            }
        }
        Err(ConfigError::NoTerminalFound)
    }
}
