//! Issuer registry: built-in definitions embedded from TOML, plus user
//! overrides loaded at runtime.
//!
//! Each `.toml` file in `packages/issuer/issuers/` is baked into the binary
//! via [`include_str!`]. Adding a built-in issuer means adding a TOML file,
//! a [`BuiltinIssuer`] variant, and its entry in [`BuiltinIssuer::toml`].

use std::collections::BTreeMap;
use std::path::Path;

use strum::IntoEnumIterator as _;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::{IssuerDefinition, IssuerError, IssuerId, parse_issuer_toml};

/// Issuers whose configurations ship with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BuiltinIssuer {
    /// Endowus fund platform statements.
    Endowus,
    /// SGX CDP account statements.
    Sgx,
    /// Saxo Markets portfolio statements.
    Saxo,
}

impl BuiltinIssuer {
    /// The embedded TOML document for this issuer.
    #[must_use]
    pub const fn toml(self) -> &'static str {
        match self {
            Self::Endowus => include_str!("../issuers/endowus.toml"),
            Self::Sgx => include_str!("../issuers/sgx.toml"),
            Self::Saxo => include_str!("../issuers/saxo.toml"),
        }
    }

    /// Parses this issuer's embedded definition.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (the configs are compiled
    /// in, so this is covered by the registry tests).
    #[must_use]
    pub fn definition(self) -> IssuerDefinition {
        parse_issuer_toml(&format!("{self}.toml"), self.toml())
            .unwrap_or_else(|e| panic!("Failed to parse embedded issuer {self}: {e}"))
    }
}

/// A validated mapping from issuer identifier to its definition.
#[derive(Debug, Clone, Default)]
pub struct IssuerRegistry {
    issuers: BTreeMap<IssuerId, IssuerDefinition>,
}

impl IssuerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every [`BuiltinIssuer`].
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for issuer in BuiltinIssuer::iter() {
            registry.insert(issuer.definition());
        }
        registry
    }

    /// Adds `definition`, returning the definition it replaced, if any.
    pub fn insert(&mut self, definition: IssuerDefinition) -> Option<IssuerDefinition> {
        let id = definition.issuer_id();
        let replaced = self.issuers.insert(id, definition);
        if let Some(old) = &replaced {
            log::debug!("Issuer '{}' overridden by user config", old.id);
        }
        replaced
    }

    /// Loads one issuer TOML file, overriding any issuer with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::Io`] if the file cannot be read or
    /// [`IssuerError::Parse`] if it is not a valid issuer definition.
    pub fn load_file(&mut self, path: &Path) -> Result<IssuerId, IssuerError> {
        let text = std::fs::read_to_string(path).map_err(|source| IssuerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let definition = parse_issuer_toml(&path.display().to_string(), &text)?;
        let id = definition.issuer_id();

        log::info!("Loaded issuer '{id}' from {}", path.display());
        self.insert(definition);

        Ok(id)
    }

    /// Loads every `*.toml` file in `dir` (non-recursive), in file name
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::DuplicateId`] if two files in `dir` declare
    /// the same id, or the first read/parse error encountered.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<IssuerId>, IssuerError> {
        let io_err = |source| IssuerError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded: Vec<IssuerId> = Vec::with_capacity(paths.len());
        for path in &paths {
            let id = self.load_file(path)?;
            if loaded.contains(&id) {
                return Err(IssuerError::DuplicateId(id.to_string()));
            }
            loaded.push(id);
        }

        Ok(loaded)
    }

    /// Looks up the issuer named `issuer`.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::ConfigNotFound`] if no issuer has that id.
    pub fn resolve(&self, issuer: &str) -> Result<&IssuerDefinition, IssuerError> {
        self.issuers
            .get(&IssuerId::new(issuer))
            .ok_or_else(|| IssuerError::ConfigNotFound {
                issuer: issuer.to_owned(),
                available: self.ids().map(|id| id.to_string()).collect(),
            })
    }

    /// Configured identifiers, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &IssuerId> {
        self.issuers.keys()
    }

    /// Configured definitions, sorted by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &IssuerDefinition> {
        self.issuers.values()
    }

    /// Number of configured issuers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issuers.len()
    }

    /// Whether no issuers are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issuers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;
    use std::sync::atomic::{AtomicU32, Ordering};

    use holdings_extract_table_models::MatchMode;

    use super::*;

    const EXPECTED_BUILTIN_COUNT: usize = 3;

    /// A fresh directory per call; tests run on parallel threads of one
    /// process, so the pid alone is not unique.
    fn temp_dir(name: &str) -> std::path::PathBuf {
        static NEXT: AtomicU32 = AtomicU32::new(0);

        let dir = std::env::temp_dir().join(format!(
            "holdings_extract_issuer_{name}_{}_{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const ACME: &str = r#"
        id = "acme"
        name = "Acme"

        [trigger]
        phrases = ["Holding"]
        key = "Holding"

        [stop]
        phrases = ["Total"]
    "#;

    #[test]
    fn loads_all_builtin_issuers() {
        let registry = IssuerRegistry::builtin();
        assert_eq!(registry.len(), EXPECTED_BUILTIN_COUNT);
    }

    #[test]
    fn builtin_ids_match_enum_names() {
        for issuer in BuiltinIssuer::iter() {
            assert_eq!(issuer.definition().issuer_id().as_str(), issuer.as_ref());
        }
    }

    #[test]
    fn builtin_issuer_parses_case_insensitively() {
        assert_eq!(BuiltinIssuer::from_str("SGX").unwrap(), BuiltinIssuer::Sgx);
        assert!(BuiltinIssuer::from_str("unknown").is_err());
    }

    #[test]
    fn endowus_matches_known_layout() {
        let registry = IssuerRegistry::builtin();
        let endowus = registry.resolve("Endowus").unwrap();

        assert_eq!(endowus.name, "Endowus");
        assert_eq!(endowus.table.trigger.key, "Fund name");
        assert_eq!(endowus.table.trigger.rule.phrases, vec!["Fund name", "Units"]);
        assert!(endowus.table.trigger.rule.case_sensitive);
        assert!(endowus.table.trigger.rule.enforce_order);
        assert_eq!(endowus.table.stop.rule, MatchMode::Any);
        assert_eq!(
            endowus.table.stop.phrases,
            vec!["Total", "No assets", "No activity"]
        );
    }

    #[test]
    fn unknown_issuer_is_config_not_found() {
        let registry = IssuerRegistry::builtin();
        let err = registry.resolve("Vanguard").unwrap_err();

        match err {
            IssuerError::ConfigNotFound { issuer, available } => {
                assert_eq!(issuer, "Vanguard");
                assert_eq!(available, vec!["endowus", "saxo", "sgx"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn insert_overrides_existing_issuer() {
        let mut registry = IssuerRegistry::builtin();
        let mut custom = BuiltinIssuer::Saxo.definition();
        custom.name = "Saxo (custom)".to_owned();

        let replaced = registry.insert(custom);

        assert!(replaced.is_some());
        assert_eq!(registry.len(), EXPECTED_BUILTIN_COUNT);
        assert_eq!(registry.resolve("saxo").unwrap().name, "Saxo (custom)");
    }

    #[test]
    fn load_dir_reads_only_toml_files() {
        let dir = temp_dir("load_dir");
        std::fs::write(dir.join("acme.toml"), ACME).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a config").unwrap();

        let mut registry = IssuerRegistry::builtin();
        let loaded = registry.load_dir(&dir).unwrap();

        assert_eq!(loaded, vec![IssuerId::new("acme")]);
        assert_eq!(registry.len(), EXPECTED_BUILTIN_COUNT + 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_dir_rejects_duplicate_ids() {
        let dir = temp_dir("duplicates");
        std::fs::write(dir.join("a.toml"), ACME).unwrap();
        std::fs::write(dir.join("b.toml"), ACME).unwrap();

        let err = IssuerRegistry::new().load_dir(&dir).unwrap_err();

        assert!(matches!(err, IssuerError::DuplicateId(id) if id == "acme"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn temp_dirs_are_unique_per_call() {
        let first = temp_dir("same_name");
        let second = temp_dir("same_name");

        assert_ne!(first, second);
        assert!(first.is_dir() && second.is_dir());

        std::fs::remove_dir_all(&first).ok();
        std::fs::remove_dir_all(&second).ok();
    }

    #[test]
    fn load_file_reports_missing_path() {
        let err = IssuerRegistry::new()
            .load_file(Path::new("/nonexistent/issuer.toml"))
            .unwrap_err();

        assert!(matches!(err, IssuerError::Io { .. }));
    }
}
