//! Fill settings and the process-wide reflow mode set.
//!
//! [`FillOptions`] are document-local and read by the break strategies.
//! The reflow mode set is a single process-wide value, empty at startup,
//! that the mode dispatcher consults on every call unless it was built with
//! a fixed set.

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::env::VarError;
use std::sync::{OnceLock, RwLock};

/// Environment variable holding a comma-separated list of reflow modes.
pub const REFLOW_MODES_ENV: &str = "FLOWTEXT_REFLOW_MODES";

/// Default fill column.
pub const DEFAULT_FILL_COLUMN: usize = 70;

/// Document-local fill settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillOptions {
    /// Column past which the fill algorithm breaks lines.
    pub fill_column: usize,
    /// Text inserted at the start of each wrapped line.
    pub fill_prefix: Option<String>,
    /// Left margin used when a break carries no margin attribute.
    pub left_margin: u16,
    /// Never leave an inserted break invisible.
    pub nobreak_invisible: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            fill_column: DEFAULT_FILL_COLUMN,
            fill_prefix: None,
            left_margin: 0,
            nobreak_invisible: false,
        }
    }
}

impl FillOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fill column; zero is rejected.
    pub fn fill_column(mut self, column: usize) -> Result<Self> {
        if column == 0 {
            return Err(Error::InvalidFillColumn(column));
        }
        self.fill_column = column;
        Ok(self)
    }

    #[must_use]
    pub fn fill_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fill_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn left_margin(mut self, column: u16) -> Self {
        self.left_margin = column;
        self
    }

    #[must_use]
    pub fn nobreak_invisible(mut self, enabled: bool) -> Self {
        self.nobreak_invisible = enabled;
        self
    }

    /// The fill prefix when set and non-empty.
    #[must_use]
    pub fn active_prefix(&self) -> Option<&str> {
        self.fill_prefix.as_deref().filter(|p| !p.is_empty())
    }
}

/// A set of editing-mode identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeSet {
    modes: BTreeSet<String>,
}

impl ModeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from identifiers, validating each one.
    pub fn from_modes<I, S>(modes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for mode in modes {
            set.insert(mode.as_ref())?;
        }
        Ok(set)
    }

    /// Parse a comma-separated list; blank entries are skipped.
    pub fn parse(list: &str) -> Result<Self> {
        Self::from_modes(list.split(',').map(str::trim).filter(|m| !m.is_empty()))
    }

    /// Read the set from [`REFLOW_MODES_ENV`]; unset means empty.
    pub fn from_env() -> Result<Self> {
        Self::from_env_value(std::env::var(REFLOW_MODES_ENV))
    }

    /// Build the set from an environment lookup result. A missing or
    /// non-unicode variable yields the empty set.
    pub fn from_env_value(value: std::result::Result<String, VarError>) -> Result<Self> {
        match value {
            Ok(list) => Self::parse(&list),
            Err(_) => Ok(Self::new()),
        }
    }

    /// Add a mode identifier.
    pub fn insert(&mut self, mode: &str) -> Result<bool> {
        if mode.is_empty() || mode.chars().any(char::is_whitespace) {
            return Err(Error::InvalidMode(mode.to_string()));
        }
        Ok(self.modes.insert(mode.to_string()))
    }

    pub fn remove(&mut self, mode: &str) -> bool {
        self.modes.remove(mode)
    }

    #[must_use]
    pub fn contains(&self, mode: &str) -> bool {
        self.modes.contains(mode)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.modes.iter().map(String::as_str)
    }
}

fn reflow_mode_store() -> &'static RwLock<ModeSet> {
    static MODES: OnceLock<RwLock<ModeSet>> = OnceLock::new();
    MODES.get_or_init(|| RwLock::new(ModeSet::new()))
}

/// Replace the process-wide reflow mode set.
pub fn set_reflow_modes(modes: ModeSet) {
    let mut guard = match reflow_mode_store().write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = modes;
}

/// Snapshot of the process-wide reflow mode set.
#[must_use]
pub fn reflow_modes() -> ModeSet {
    match reflow_mode_store().read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Whether `mode` is in the process-wide reflow mode set.
#[must_use]
pub fn is_reflow_mode(mode: &str) -> bool {
    match reflow_mode_store().read() {
        Ok(guard) => guard.contains(mode),
        Err(poisoned) => poisoned.into_inner().contains(mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_options_builder() {
        let opts = FillOptions::new()
            .fill_column(40)
            .unwrap()
            .fill_prefix("> ")
            .left_margin(2)
            .nobreak_invisible(true);
        assert_eq!(opts.fill_column, 40);
        assert_eq!(opts.active_prefix(), Some("> "));
        assert_eq!(opts.left_margin, 2);
        assert!(opts.nobreak_invisible);
    }

    #[test]
    fn test_fill_column_zero_rejected() {
        assert_eq!(
            FillOptions::new().fill_column(0),
            Err(Error::InvalidFillColumn(0))
        );
    }

    #[test]
    fn test_empty_prefix_is_inactive() {
        let opts = FillOptions::new().fill_prefix("");
        assert_eq!(opts.active_prefix(), None);
    }

    #[test]
    fn test_mode_set_parse() {
        let set = ModeSet::parse("text-mode, message-mode,,mail-mode ").unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains("message-mode"));
        assert!(!set.contains("prog-mode"));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["mail-mode", "message-mode", "text-mode"]
        );
    }

    #[test]
    fn test_mode_set_rejects_bad_identifiers() {
        assert!(matches!(
            ModeSet::from_modes(["text mode"]),
            Err(Error::InvalidMode(_))
        ));
        let mut set = ModeSet::new();
        assert!(set.insert("").is_err());
        assert!(set.insert("text-mode").unwrap());
        assert!(!set.insert("text-mode").unwrap());
        assert!(set.remove("text-mode"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_mode_set_from_env_value() {
        assert!(ModeSet::from_env_value(Err(VarError::NotPresent)).unwrap().is_empty());

        let set = ModeSet::from_env_value(Ok("text-mode,mail-mode".to_string())).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("text-mode"));
        assert!(set.contains("mail-mode"));

        match ModeSet::from_env_value(Ok("text mode".to_string())) {
            Err(Error::InvalidMode(mode)) => assert_eq!(mode, "text mode"),
            other => panic!("expected InvalidMode, got {other:?}"),
        }
    }
}
