//! Keyed list scenario corpus.
//!
//! A manifest is a TOML file:
//!
//! ```toml
//! format = "blockdom-list-scenarios-v1"
//!
//! [[cases]]
//! id = "reverse"
//! before = ["a", "b", "c"]
//! after = ["c", "b", "a"]
//! created = 0
//! removed = 0
//! ```
//!
//! `created`/`removed` are exact counts of node creations and removals the
//! patch must perform. `max_moves` optionally bounds relocations.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const LIST_SCENARIOS_FORMAT_V1: &str = "blockdom-list-scenarios-v1";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ListScenarioManifest {
    pub format: String,
    #[serde(default)]
    pub cases: Vec<ListScenario>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ListScenario {
    pub id: String,
    pub before: Vec<String>,
    pub after: Vec<String>,
    /// Mount the list as the only content of its container.
    #[serde(default)]
    pub only_child: bool,
    pub created: usize,
    pub removed: usize,
    #[serde(default)]
    pub max_moves: Option<usize>,
    /// Expected whole-parent clears.
    #[serde(default)]
    pub clears: usize,
}

pub fn parse_list_scenarios(content: &str, origin: &str) -> Result<Vec<ListScenario>, String> {
    let manifest: ListScenarioManifest = toml::from_str(content)
        .map_err(|err| format!("failed to parse list scenarios {origin}: {err}"))?;
    if manifest.format != LIST_SCENARIOS_FORMAT_V1 {
        return Err(format!(
            "unsupported list scenario format '{}' in {origin}",
            manifest.format
        ));
    }
    let mut ids = BTreeSet::new();
    for case in &manifest.cases {
        if !ids.insert(case.id.as_str()) {
            return Err(format!("duplicate scenario id '{}' in {origin}", case.id));
        }
        for (side, keys) in [("before", &case.before), ("after", &case.after)] {
            let mut seen = BTreeSet::new();
            if let Some(dup) = keys.iter().find(|key| !seen.insert(key.as_str())) {
                return Err(format!(
                    "scenario '{}' repeats key '{dup}' in `{side}`",
                    case.id
                ));
            }
        }
    }
    Ok(manifest.cases)
}

pub fn load_list_scenarios(path: &Path) -> Vec<ListScenario> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read list scenarios {path:?}: {err}"));
    parse_list_scenarios(&content, &format!("{path:?}")).unwrap_or_else(|err| panic!("{err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_manifest() {
        let cases = parse_list_scenarios(
            r#"
format = "blockdom-list-scenarios-v1"

[[cases]]
id = "append"
before = ["a"]
after = ["a", "b"]
created = 1
removed = 0
"#,
            "inline",
        )
        .unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].after, vec!["a", "b"]);
        assert!(!cases[0].only_child);
        assert_eq!(cases[0].max_moves, None);
    }

    #[test]
    fn rejects_duplicate_keys_and_ids() {
        let dup_key = parse_list_scenarios(
            r#"
format = "blockdom-list-scenarios-v1"
[[cases]]
id = "x"
before = ["a", "a"]
after = []
created = 0
removed = 2
"#,
            "inline",
        );
        assert_eq!(
            dup_key,
            Err("scenario 'x' repeats key 'a' in `before`".to_string())
        );

        let dup_id = parse_list_scenarios(
            r#"
format = "blockdom-list-scenarios-v1"
[[cases]]
id = "x"
before = []
after = []
created = 0
removed = 0
[[cases]]
id = "x"
before = []
after = []
created = 0
removed = 0
"#,
            "inline",
        );
        assert_eq!(dup_id, Err("duplicate scenario id 'x' in inline".to_string()));
    }

    #[test]
    fn rejects_unknown_format() {
        let err = parse_list_scenarios("format = \"v0\"\n", "inline").unwrap_err();
        assert!(err.contains("unsupported list scenario format 'v0'"));
    }
}
