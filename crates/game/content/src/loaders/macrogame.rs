//! Macrogame definition loader.

use std::path::Path;

use macrogame_core::MacrogameDefinition;

use crate::loaders::{LoadResult, read_file};

/// Loader for a single macrogame definition from a RON file.
pub struct MacrogameLoader;

impl MacrogameLoader {
    pub fn load(path: &Path) -> LoadResult<MacrogameDefinition> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MacrogameDefinition> {
        let definition: MacrogameDefinition = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse macrogame RON: {}", e))?;

        if definition.flow.is_empty() {
            tracing::warn!(
                target: "content::macrogame",
                macrogame = %definition.id,
                "definition has an empty flow"
            );
        }

        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macrogame_core::ScreenFlowType;

    #[test]
    fn parses_minimal_definition() {
        let definition = MacrogameLoader::parse(
            r#"(
                id: "summer",
                flow: [
                    (microgame_id: "catch"),
                    (microgame_id: "dodge", variant_id: Some("night"), point_rules: Some({"win": 25})),
                ],
                config: (screen_flow_type: Combined),
                point_costs: {"M3": 15},
            )"#,
        )
        .unwrap();

        assert_eq!(definition.flow.len(), 2);
        assert_eq!(definition.config.screen_flow_type, ScreenFlowType::Combined);
        assert_eq!(definition.config.title_screen_duration_ms, 2_000);
        assert_eq!(definition.point_costs.get(&"M3".into()), Some(&15));
        assert!(!definition.intro_screen.enabled);
    }

    #[test]
    fn malformed_definition_is_an_error() {
        assert!(MacrogameLoader::parse("(flow: 3)").is_err());
    }
}
