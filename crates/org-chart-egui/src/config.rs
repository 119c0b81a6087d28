//! Visual and interaction settings
//!
//! Loaded from `config/org_chart.yaml`. Every field has a default, so a
//! partial file (or none at all) is fine. `global_settings()` hands out the
//! process-wide copy; `init_global_settings` must run before the first frame
//! if a file should be used.

use org_chart_core::connector::ConnectorStyle;
use org_chart_core::hierarchy::HierarchyBuilder;
use org_chart_core::layout::{
    LayoutSpacing, CARD_HEIGHT, CARD_WIDTH, COMPACT_CARD_HEIGHT, COMPACT_CARD_WIDTH, H_SPACING,
    V_SPACING,
};
use org_chart_core::model::Role;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid org chart settings: {0}")]
    Invalid(String),
}

// =============================================================================
// SETTINGS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgChartSettings {
    pub card: CardSettings,
    pub spacing: SpacingSettings,
    pub connector: ConnectorSettings,
    pub hierarchy: HierarchySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSettings {
    pub width: f32,
    pub height: f32,
    pub compact_width: f32,
    pub compact_height: f32,
    pub corner_radius: f32,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            compact_width: COMPACT_CARD_WIDTH,
            compact_height: COMPACT_CARD_HEIGHT,
            corner_radius: 6.0,
        }
    }
}

impl CardSettings {
    pub fn size(&self, compact: bool) -> egui::Vec2 {
        if compact {
            egui::vec2(self.compact_width, self.compact_height)
        } else {
            egui::vec2(self.width, self.height)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingSettings {
    /// Gap between sibling subtrees
    pub horizontal: f32,
    /// Gap between levels
    pub vertical: f32,
    /// Margin around the chart inside its scroll area
    pub margin: f32,
    /// Width of the unassigned side panel
    pub panel_width: f32,
}

impl Default for SpacingSettings {
    fn default() -> Self {
        Self {
            horizontal: H_SPACING,
            vertical: V_SPACING,
            margin: 24.0,
            panel_width: 220.0,
        }
    }
}

impl SpacingSettings {
    pub fn layout(&self) -> LayoutSpacing {
        LayoutSpacing {
            horizontal: self.horizontal,
            vertical: self.vertical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorSettings {
    pub style: ConnectorStyle,
    pub width: f32,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            style: ConnectorStyle::Elbow,
            width: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchySettings {
    /// Role tags that make a member without reports a root
    pub leadership_roles: Vec<Role>,
}

impl Default for HierarchySettings {
    fn default() -> Self {
        Self {
            leadership_roles: vec![Role::BusinessOwner, Role::Executive],
        }
    }
}

impl HierarchySettings {
    pub fn builder(&self) -> HierarchyBuilder {
        HierarchyBuilder::new().with_leadership_roles(self.leadership_roles.clone())
    }
}

impl OrgChartSettings {
    pub fn from_yaml(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml(&yaml, path)?;
        tracing::info!("Loaded org chart settings from {}", path.display());
        Ok(settings)
    }

    /// Load, or log why not and use defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("{e}; using default org chart settings");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("card.width", self.card.width),
            ("card.height", self.card.height),
            ("card.compact_width", self.card.compact_width),
            ("card.compact_height", self.card.compact_height),
            ("connector.width", self.connector.width),
            ("spacing.panel_width", self.spacing.panel_width),
        ];
        for (name, value) in sizes {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let gaps = [
            ("spacing.horizontal", self.spacing.horizontal),
            ("spacing.vertical", self.spacing.vertical),
            ("spacing.margin", self.spacing.margin),
        ];
        for (name, value) in gaps {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// GLOBAL
// =============================================================================

static SETTINGS: OnceLock<OrgChartSettings> = OnceLock::new();

/// Load settings from `path` into the global slot. Later calls keep the
/// first value.
pub fn init_global_settings(path: impl AsRef<Path>) -> &'static OrgChartSettings {
    SETTINGS.get_or_init(|| OrgChartSettings::load_or_default(path))
}

/// Process-wide settings, defaults if never initialised
pub fn global_settings() -> &'static OrgChartSettings {
    SETTINGS.get_or_init(OrgChartSettings::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "card:\n  width: 200\nconnector:\n  style: curved\n";
        let settings = OrgChartSettings::from_yaml(yaml, Path::new("inline")).unwrap();
        assert_eq!(settings.card.width, 200.0);
        assert_eq!(settings.card.height, CARD_HEIGHT);
        assert_eq!(settings.connector.style, ConnectorStyle::Curved);
        assert_eq!(settings.spacing, SpacingSettings::default());
    }

    #[test]
    fn non_positive_size_is_invalid() {
        let yaml = "card:\n  height: 0\n";
        let err = OrgChartSettings::from_yaml(yaml, Path::new("inline")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = OrgChartSettings::from_yaml("card: [", Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn missing_file_falls_back() {
        let settings = OrgChartSettings::load_or_default("/definitely/not/here.yaml");
        assert_eq!(settings, OrgChartSettings::default());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "spacing:\n  horizontal: 12\n  vertical: 30").unwrap();
        let settings = OrgChartSettings::load(file.path()).unwrap();
        assert_eq!(
            settings.spacing.layout(),
            LayoutSpacing {
                horizontal: 12.0,
                vertical: 30.0
            }
        );
    }

    #[test]
    fn panel_width_must_be_positive() {
        for yaml in ["spacing:\n  panel_width: -10\n", "spacing:\n  panel_width: .nan\n"] {
            let err = OrgChartSettings::from_yaml(yaml, Path::new("inline")).unwrap_err();
            assert!(err.to_string().contains("spacing.panel_width"), "{err}");
        }
    }

    #[test]
    fn leadership_roles_are_configurable() {
        let yaml = "hierarchy:\n  leadership_roles: [founder]\n";
        let settings = OrgChartSettings::from_yaml(yaml, Path::new("inline")).unwrap();
        assert_eq!(settings.hierarchy.leadership_roles, vec![Role::from_str("founder")]);
        assert_eq!(
            OrgChartSettings::default().hierarchy.leadership_roles,
            vec![Role::BusinessOwner, Role::Executive]
        );
    }
}
