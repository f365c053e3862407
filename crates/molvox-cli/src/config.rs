use crate::cli::GridArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use molvox::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialGridConfig {
    voxel_size: Option<f64>,
    tracked_elements: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialOutputConfig {
    channels_first: Option<bool>,
}

/// Settings as read from a TOML file; every field optional.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    grid: Option<PartialGridConfig>,
    output: Option<PartialOutputConfig>,
}

/// Fully resolved settings for one CLI invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub core: core_config::VoxelizationConfig,
    pub channels_first: bool,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the file named by `--config`, or starts empty.
    pub fn load(args: &GridArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final configuration.
    ///
    /// Precedence, highest first: dedicated CLI flags, `--set` values, the
    /// config file, built-in defaults.
    pub fn merge_with_cli(mut self, args: &GridArgs, cli_channels_first: bool) -> Result<AppConfig> {
        self.apply_set_values(&args.set_values)?;

        let grid = self.grid.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let mut builder = core_config::VoxelizationConfigBuilder::new();

        if let Some(size) = args.voxel_size.or(grid.voxel_size) {
            builder = builder.voxel_size(size);
        }

        let elements = match (&args.elements, &grid.tracked_elements) {
            (Some(cli), _) => Some(parser::parse_element_list(cli.as_slice())),
            (None, Some(file)) => Some(parser::parse_element_list(file.as_slice())),
            (None, None) => None,
        };
        if let Some(parsed) = elements {
            let parsed = parsed.map_err(|e| CliError::Config(e.to_string()))?;
            builder = builder.tracked_elements(parsed);
        }

        let core = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;
        let channels_first = cli_channels_first || output.channels_first.unwrap_or(false);

        debug!(?core, channels_first, "Resolved configuration.");
        Ok(AppConfig {
            core,
            channels_first,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key.trim() {
                "grid.voxel-size" => {
                    self.grid.get_or_insert_with(Default::default).voxel_size =
                        Some(value_str.trim().parse().map_err(|_| {
                            CliError::Config(format!(
                                "Invalid float value for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                "grid.tracked-elements" => {
                    let symbols = parser::parse_element_csv(value_str)
                        .map_err(|e| CliError::Config(format!("{}: {}", key, e)))?
                        .iter()
                        .map(|element| element.symbol().to_string())
                        .collect();
                    self.grid.get_or_insert_with(Default::default).tracked_elements =
                        Some(symbols);
                }
                "output.channels-first" => {
                    self.output
                        .get_or_insert_with(Default::default)
                        .channels_first = Some(
                        parser::parse_bool(value_str)
                            .map_err(|e| CliError::Config(format!("{}: {}", key, e)))?,
                    );
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molvox::core::models::element::Element;
    use std::fs;
    use tempfile::tempdir;

    fn args() -> GridArgs {
        GridArgs::default()
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let config = PartialConfig::default().merge_with_cli(&args(), false).unwrap();
        assert_eq!(config.core, core_config::VoxelizationConfig::default());
        assert!(!config.channels_first);
    }

    #[test]
    fn file_values_are_used() {
        let partial = PartialConfig::from_toml_str(
            r#"
            [grid]
            voxel-size = 0.5
            tracked-elements = ["O", "N"]

            [output]
            channels-first = true
            "#,
        )
        .unwrap();
        let config = partial.merge_with_cli(&args(), false).unwrap();
        assert_eq!(config.core.voxel_size, 0.5);
        assert_eq!(config.core.tracked_elements, vec![Element::O, Element::N]);
        assert!(config.channels_first);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = PartialConfig::from_toml_str("[grid]\nvoxel_size = 1.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn set_values_override_file_and_flags_override_set_values() {
        let partial = PartialConfig::from_toml_str("[grid]\nvoxel-size = 0.5\n").unwrap();
        let mut grid_args = args();
        grid_args.set_values = vec![
            "grid.voxel-size=2.0".to_string(),
            "grid.tracked-elements=S,Se".to_string(),
        ];
        let config = partial.clone().merge_with_cli(&grid_args, false).unwrap();
        assert_eq!(config.core.voxel_size, 2.0);
        assert_eq!(config.core.tracked_elements, vec![Element::S, Element::Se]);

        grid_args.voxel_size = Some(1.5);
        grid_args.elements = Some(vec!["C".to_string()]);
        let config = partial.merge_with_cli(&grid_args, false).unwrap();
        assert_eq!(config.core.voxel_size, 1.5);
        assert_eq!(config.core.tracked_elements, vec![Element::C]);
    }

    #[test]
    fn invalid_values_surface_as_config_errors() {
        let mut grid_args = args();
        grid_args.voxel_size = Some(0.0);
        assert!(matches!(
            PartialConfig::default().merge_with_cli(&grid_args, false),
            Err(CliError::Config(_))
        ));

        let mut grid_args = args();
        grid_args.elements = Some(vec!["C".to_string(), "C".to_string()]);
        assert!(matches!(
            PartialConfig::default().merge_with_cli(&grid_args, false),
            Err(CliError::Config(_))
        ));

        let mut grid_args = args();
        grid_args.elements = Some(vec!["Zz".to_string()]);
        assert!(matches!(
            PartialConfig::default().merge_with_cli(&grid_args, false),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["grid.voxel-size", "grid.voxel-size=abc", "grid.unknown=1", "output.channels-first=maybe"] {
            let mut grid_args = args();
            grid_args.set_values = vec![bad.to_string()];
            assert!(
                matches!(
                    PartialConfig::default().merge_with_cli(&grid_args, false),
                    Err(CliError::Config(_))
                ),
                "expected rejection of {}",
                bad
            );
        }
    }

    #[test]
    fn from_file_reports_parse_errors_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[grid\n").unwrap();
        assert!(matches!(
            PartialConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn load_without_config_path_is_empty() {
        let partial = PartialConfig::load(&args()).unwrap();
        assert!(partial.grid.is_none());
        assert!(partial.output.is_none());
    }
}
