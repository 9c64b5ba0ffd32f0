//! Run configuration from `declass.toml` and the command line.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [stylesheet] [classes] [hooks] [markup] [output]
//! ├── types/         # ConfigError, diagnostics, FieldPath, field status
//! └── mod.rs         # DeclassConfig (this file)
//! ```
//!
//! The config file is optional. Paths inside it are relative to the file's
//! directory; paths given on the command line are relative to the cwd.
//! Command-line values extend (lists) or override (scalars) file values.

pub mod section;
pub mod types;

pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use section::{ClassesConfig, HooksConfig, MarkupConfig, OutputConfig, StylesheetConfig};

use crate::allowlist::{ClassList, PRESET_VERSION, PRESETS, PresetToggle};
use crate::classify::HookSpec;
use crate::cli::Cli;
use crate::engine::EngineSettings;
use crate::log;
use crate::utils::path::{normalize_path, resolve_against};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Config file looked up in the cwd when `-C` is not given.
pub const DEFAULT_CONFIG: &str = "declass.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing declass.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclassConfig {
    /// Absolute path to the config file, if one was read (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory config paths are relative to (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Dotted paths of the keys the user set, in the file or on the command
    /// line (internal use only)
    #[serde(skip)]
    pub set_keys: Vec<String>,

    #[serde(default)]
    pub stylesheet: StylesheetConfig,

    #[serde(default)]
    pub classes: ClassesConfig,

    #[serde(default)]
    pub hooks: HooksConfig,

    #[serde(default)]
    pub markup: MarkupConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl DeclassConfig {
    /// Load configuration for this invocation.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(cli, &cwd)
    }

    fn load_from(cli: &Cli, cwd: &Path) -> Result<Self> {
        let path = cwd.join(&cli.config);

        let mut config = if path.is_file() {
            let mut config = Self::from_path(&path)?;
            config.config_path = Some(normalize_path(&path));
            config
        } else if cli.config != Path::new(DEFAULT_CONFIG) {
            // An explicit `-C` must exist; the default one is optional.
            bail!(ConfigError::Io(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no such file")
            ));
        } else {
            Self::default()
        };

        let root = config
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
        config.root = normalize_path(&root);

        config.normalize_paths();
        config.apply_cli(cli, cwd);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let mut config: Self = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;

        let table: toml::Table = toml::from_str(content)?;
        collect_keys(&table, "", &mut config.set_keys);
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_cli(&mut self, cli: &Cli, cwd: &Path) {
        let from_cwd = |p: &PathBuf| resolve_against(p, cwd);

        self.stylesheet.files.extend(cli.css.iter().map(from_cwd));
        self.markup.files.extend(cli.inputs.iter().map(from_cwd));

        if !cli.classes.is_empty() {
            let mut tokens: Vec<String> = self
                .classes
                .custom
                .tokens()
                .into_iter()
                .map(str::to_owned)
                .collect();
            tokens.extend(
                cli.classes
                    .iter()
                    .flat_map(|s| s.split_whitespace())
                    .map(str::to_owned),
            );
            self.classes.custom = ClassList::List(tokens);
        }

        for name in &cli.presets {
            match self.classes.presets.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(PresetToggle::Enabled(true));
                }
                // An explicit list in the file stays in effect.
                Entry::Occupied(mut slot) => {
                    if matches!(slot.get(), PresetToggle::Enabled(false)) {
                        slot.insert(PresetToggle::Enabled(true));
                    }
                }
            }
        }

        if cli.no_js_hooks {
            self.hooks.js = HookSpec::Enabled(false);
        } else if !cli.hook_prefixes.is_empty() {
            self.hooks.js = HookSpec::Prefixes(cli.hook_prefixes.clone());
        }

        Self::update_option(&mut self.markup.template_guard, cli.template_guard.as_ref());
        if cli.template_guard.is_some() {
            self.set_keys
                .push(MarkupConfig::FIELDS.template_guard.as_str().to_owned());
        }
        if let Some(dir) = &cli.output {
            self.output.dir = Some(from_cwd(dir));
        }
        self.output.dry_run |= cli.dry_run;
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve file-relative paths against the config root.
    fn normalize_paths(&mut self) {
        let root = self.root.clone();
        let resolve = |p: &PathBuf| resolve_against(p, &root);

        self.stylesheet.files = self.stylesheet.files.iter().map(resolve).collect();
        self.markup.files = self.markup.files.iter().map(resolve).collect();
        if let Some(dir) = self.output.dir.take() {
            self.output.dir = Some(resolve(&dir));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::with_present(self.set_keys.iter().cloned());

        self.stylesheet.validate_field_status(&mut diag);
        self.classes.validate_field_status(&mut diag);
        self.hooks.validate_field_status(&mut diag);
        self.markup.validate_field_status(&mut diag);
        self.output.validate_field_status(&mut diag);

        self.classes.validate(&mut diag);
        self.hooks.validate(&mut diag);
        self.output.validate(&mut diag);

        diag.print_hints_and_warnings();
        diag.into_result()
    }

    // ========================================================================
    // derived views
    // ========================================================================

    /// Settings for [`crate::engine::Engine::build`].
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            separator: self.stylesheet.separator.clone(),
            custom: self.classes.custom.clone(),
            presets: self.classes.presets.clone(),
            hooks: self.hooks.js.clone(),
            predicate: self.classes.predicate(),
            template_guard: self.markup.template_guard,
        }
    }

    /// Commented default configuration, led by the built-in preset list.
    pub fn template() -> String {
        let mut out = format!("# Built-in presets (version {PRESET_VERSION}):\n");
        for preset in PRESETS {
            out.push_str(&format!("#   {:<10} {}\n", preset.name, preset.description));
        }
        out.push('\n');
        out.push_str(
            &[
                StylesheetConfig::template_with_header(),
                ClassesConfig::template_with_header(),
                HooksConfig::template_with_header(),
                MarkupConfig::template_with_header(),
                OutputConfig::template_with_header(),
            ]
            .join("\n"),
        );
        out
    }
}

/// Push the dotted path of every key in `table`, tables included.
fn collect_keys(table: &toml::Table, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if let toml::Value::Table(inner) = value {
            collect_keys(inner, &path, out);
        }
        out.push(path);
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text. Panics on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> DeclassConfig {
    let (parsed, ignored) = DeclassConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("declass").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = DeclassConfig::parse_with_ignored("[stylesheet\nfiles = []");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[stylesheet]\nseparator = \"\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = DeclassConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.stylesheet.separator, "");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_missing_default_config_is_fine() {
        let dir = TempDir::new().unwrap();
        let config = DeclassConfig::load_from(&cli(&[]), dir.path()).unwrap();
        assert!(config.config_path.is_none());
        assert_eq!(config.root, normalize_path(dir.path()));
        assert_eq!(config.hooks.js, HookSpec::Enabled(true));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        let result = DeclassConfig::load_from(&cli(&["-C", "other.toml"]), dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_paths_resolve_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site");
        fs::create_dir(&site).unwrap();
        fs::write(
            site.join("declass.toml"),
            "[stylesheet]\nfiles = [\"main.css\"]\n[output]\ndir = \"dist\"",
        )
        .unwrap();

        let config =
            DeclassConfig::load_from(&cli(&["-C", "site/declass.toml", "--css", "x.css"]), dir.path())
                .unwrap();

        let site = normalize_path(&site);
        assert_eq!(
            config.stylesheet.files,
            vec![site.join("main.css"), dir.path().join("x.css")]
        );
        assert_eq!(config.output.dir, Some(site.join("dist")));
    }

    #[test]
    fn test_cli_overrides() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("declass.toml"),
            "[classes]\ncustom = \"a\"\n[classes.presets]\nbootstrap = false\nh5bp = [\"no-js\"]\n",
        )
        .unwrap();

        let config = DeclassConfig::load_from(
            &cli(&[
                "--keep",
                "b c",
                "-p",
                "bootstrap",
                "-p",
                "h5bp",
                "--no-js-hooks",
                "--template-guard",
                "--dry-run",
            ]),
            dir.path(),
        )
        .unwrap();

        assert_eq!(config.classes.custom.tokens(), ["a", "b", "c"]);
        assert_eq!(
            config.classes.presets.get("bootstrap"),
            Some(&PresetToggle::Enabled(true))
        );
        assert_eq!(
            config.classes.presets.get("h5bp"),
            Some(&PresetToggle::Classes(ClassList::List(vec!["no-js".into()])))
        );
        assert_eq!(config.hooks.js, HookSpec::Enabled(false));
        assert!(config.markup.template_guard);
        assert!(config.output.dry_run);
    }

    #[test]
    fn test_set_keys_from_file_and_cli() {
        let config = test_parse_config("[markup]\ntemplate_guard = true\n[classes.presets]\nh5bp = true");
        for key in ["markup", "markup.template_guard", "classes", "classes.presets.h5bp"] {
            assert!(config.set_keys.iter().any(|k| k == key), "missing {key}");
        }
        assert!(!config.set_keys.iter().any(|k| k == "markup.files"));

        let dir = TempDir::new().unwrap();
        let config =
            DeclassConfig::load_from(&cli(&["--template-guard", "false"]), dir.path()).unwrap();
        assert_eq!(config.set_keys, vec!["markup.template_guard"]);
    }

    #[test]
    fn test_custom_classes_shape_is_checked() {
        for custom in ["5", "{ a = 1 }", "[1, 2]", "true"] {
            let dir = TempDir::new().unwrap();
            fs::write(
                dir.path().join("declass.toml"),
                format!("[classes]\ncustom = {custom}\n"),
            )
            .unwrap();
            let result = DeclassConfig::load_from(&cli(&[]), dir.path());
            assert!(result.is_err(), "custom = {custom} was accepted");
        }
    }

    #[test]
    fn test_custom_classes_accepted_shapes() {
        for (custom, count) in [(r#""a b""#, 2), (r#"["a", "b c"]"#, 3)] {
            let config = test_parse_config(&format!("[classes]\ncustom = {custom}"));
            assert_eq!(config.classes.custom.tokens().len(), count);
        }
    }

    #[test]
    fn test_hook_prefix_flag() {
        let dir = TempDir::new().unwrap();
        let config =
            DeclassConfig::load_from(&cli(&["--hook-prefix", "hook-"]), dir.path()).unwrap();
        assert_eq!(config.hooks.js.prefixes(), vec!["hook-"]);
    }

    #[test]
    fn test_unknown_preset_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = DeclassConfig::load_from(&cli(&["--preset", "tailwind"]), dir.path());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("tailwind"));
    }

    #[test]
    fn test_engine_settings() {
        let config = test_parse_config(
            "[stylesheet]\nseparator = \" \"\n[classes]\nfilter = [\"^x-\"]\n[markup]\ntemplate_guard = true",
        );
        let settings = config.engine_settings();
        assert_eq!(settings.separator, " ");
        assert!(settings.predicate.is_some());
        assert!(settings.template_guard);
    }

    #[test]
    fn test_template_lists_every_section() {
        let template = DeclassConfig::template();
        for section in ["[stylesheet]", "[classes]", "[hooks]", "[markup]", "[output]"] {
            assert!(template.contains(section), "missing {section}");
        }
        assert!(template.starts_with(&format!("# Built-in presets (version {PRESET_VERSION})")));
        assert!(template.contains("#   bootstrap "));
        assert!(template.contains("#   h5bp "));
    }
}
