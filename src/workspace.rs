//! Workspace loading and the recently-opened bookkeeping behind the
//! workspace switcher.

use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::model::{ReadinessStatus, SystemNode, TestAsset, Workspace};

const RECENT_KEY: &str = "workspaces.recent";
const SORT_KEY: &str = "workspaces.sort";
const MAX_RECENTS: usize = 8;

/// Key-value persistence behind the switcher; the host decides where it
/// lives (browser storage, a dotfile, memory in tests).
pub trait RecentStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store, used in tests and as the default when the host wires
/// nothing up.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl RecentStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Recent,
    Name,
}

fn recents(store: &dyn RecentStore) -> Vec<String> {
    store
        .get(RECENT_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

/// Record that a workspace was just opened; it moves to the front of the
/// recents list, which is capped.
pub fn touch_workspace(store: &mut dyn RecentStore, id: &str) {
    let mut list = recents(store);
    list.retain(|entry| entry != id);
    list.insert(0, id.to_string());
    list.truncate(MAX_RECENTS);
    if let Ok(raw) = serde_json::to_string(&list) {
        store.set(RECENT_KEY, &raw);
    }
}

pub fn sort_order(store: &dyn RecentStore) -> SortOrder {
    store
        .get(SORT_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn set_sort_order(store: &mut dyn RecentStore, order: SortOrder) {
    if let Ok(raw) = serde_json::to_string(&order) {
        store.set(SORT_KEY, &raw);
    }
}

/// Order workspaces for the switcher. `Recent` puts recently opened ones
/// first (untouched workspaces keep their relative order at the end);
/// `Name` is a case-insensitive name sort.
pub fn sort_workspaces(workspaces: &mut [Workspace], store: &dyn RecentStore) {
    match sort_order(store) {
        SortOrder::Recent => {
            let list = recents(store);
            let position = |ws: &Workspace| {
                list.iter()
                    .position(|id| *id == ws.id)
                    .unwrap_or(usize::MAX)
            };
            workspaces.sort_by_key(position);
        }
        SortOrder::Name => {
            workspaces.sort_by_key(|ws| ws.name.to_lowercase());
        }
    }
}

/// Load a workspace from a JSON5 file. A file holding a bare system tree is
/// also accepted; id and name then come from the file stem.
pub fn load_workspace(path: &Path) -> anyhow::Result<Workspace> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading workspace file {}", path.display()))?;
    if let Ok(workspace) = json5::from_str::<Workspace>(&contents) {
        return Ok(workspace);
    }
    let root: SystemNode = json5::from_str(&contents)
        .with_context(|| format!("parsing workspace file {}", path.display()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.id.clone());
    Ok(Workspace {
        id: format!("ws-{stem}"),
        name: stem,
        root,
    })
}

fn asset(id: &str, name: &str, status: ReadinessStatus, deps: &[&str], owner: &str) -> TestAsset {
    TestAsset {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        status,
        depends_on: deps.iter().map(|d| d.to_string()).collect(),
        owner: Some(owner.to_string()),
    }
}

fn system(
    id: &str,
    name: &str,
    owner: &str,
    status: ReadinessStatus,
    test_assets: Vec<TestAsset>,
    subsystems: Vec<SystemNode>,
) -> SystemNode {
    SystemNode {
        id: id.to_string(),
        name: name.to_string(),
        owner: Some(owner.to_string()),
        status,
        test_assets,
        subsystems,
    }
}

/// Built-in demo workspaces, shown when the host has nothing else to open.
pub static SAMPLE_WORKSPACES: Lazy<Vec<Workspace>> = Lazy::new(|| {
    use ReadinessStatus::{Available, Deferred, InProgress, NotMade};
    vec![
        Workspace {
            id: "ws-example-lunar-base".to_string(),
            name: "Lunar Base".to_string(),
            root: system(
                "LUN-001",
                "Artemis Lunar Base",
                "Sarah Kerman",
                InProgress,
                vec![asset(
                    "LT-001",
                    "Airlock Seal Test",
                    Available,
                    &[],
                    "Jebediah Kerman",
                )],
                vec![system(
                    "LSS-001",
                    "Life Support System",
                    "Bill Wilson",
                    InProgress,
                    vec![asset(
                        "LT-002",
                        "O2 Scrubber Bench",
                        InProgress,
                        &[],
                        "Jebediah Kerman",
                    )],
                    vec![system(
                        "H2O-001",
                        "Water Reclamation",
                        "Linda Sue",
                        NotMade,
                        vec![asset(
                            "LT-003",
                            "Centrifuge Test",
                            NotMade,
                            &[],
                            "Jebediah Kerman",
                        )],
                        vec![],
                    )],
                )],
            ),
        },
        Workspace {
            id: "ws-example-mars-rover".to_string(),
            name: "Mars Rover".to_string(),
            root: system(
                "ROV-001",
                "Mars Rover",
                "Marcus Thorne",
                InProgress,
                vec![asset(
                    "T-001",
                    "Chassis Stress Stand",
                    Available,
                    &[],
                    "Alice Vance",
                )],
                vec![system(
                    "MCU-001",
                    "Main Control Unit",
                    "Sarah Chen",
                    Available,
                    vec![asset(
                        "T-002",
                        "Software Integration Bench",
                        Available,
                        &[],
                        "Kevin Flynn",
                    )],
                    vec![system(
                        "AUX-012",
                        "Auxiliary Battery Unit",
                        "Elena Volkov",
                        InProgress,
                        vec![
                            asset("T-004", "Li-Ion Cell Stack A", Available, &[], "Miles Dyson"),
                            asset("T-005", "BMS Control Board", InProgress, &[], "Miles Dyson"),
                            asset(
                                "T-003",
                                "Main Test Stand - Alpha",
                                Available,
                                &["T-004", "T-005"],
                                "Gordon Freeman",
                            ),
                            asset(
                                "T-006",
                                "Encapsulation Gasket",
                                NotMade,
                                &["T-003"],
                                "Gordon Freeman",
                            ),
                            asset(
                                "T-021",
                                "Thermal Cycling Validation",
                                Deferred,
                                &["T-006"],
                                "Gordon Freeman",
                            ),
                        ],
                        vec![system(
                            "SSR-882",
                            "Solid State Relay Matrix",
                            "Elena Volkov",
                            NotMade,
                            vec![asset(
                                "T-011",
                                "High-Speed Cycle Stress",
                                NotMade,
                                &[],
                                "Miles Dyson",
                            )],
                            vec![],
                        )],
                    )],
                )],
            ),
        },
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_moves_to_front_and_dedupes() {
        let mut store = MemoryStore::default();
        touch_workspace(&mut store, "a");
        touch_workspace(&mut store, "b");
        touch_workspace(&mut store, "a");
        assert_eq!(recents(&store), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn recents_list_is_capped() {
        let mut store = MemoryStore::default();
        for i in 0..20 {
            touch_workspace(&mut store, &format!("ws-{i}"));
        }
        let list = recents(&store);
        assert_eq!(list.len(), MAX_RECENTS);
        assert_eq!(list[0], "ws-19");
    }

    #[test]
    fn recent_sort_puts_touched_first() {
        let mut store = MemoryStore::default();
        let mut workspaces = SAMPLE_WORKSPACES.clone();
        touch_workspace(&mut store, "ws-example-mars-rover");
        sort_workspaces(&mut workspaces, &store);
        assert_eq!(workspaces[0].id, "ws-example-mars-rover");
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let mut store = MemoryStore::default();
        set_sort_order(&mut store, SortOrder::Name);
        let mut workspaces = SAMPLE_WORKSPACES.clone();
        workspaces.reverse();
        sort_workspaces(&mut workspaces, &store);
        assert_eq!(workspaces[0].name, "Lunar Base");
    }

    #[test]
    fn corrupt_store_values_fall_back_to_defaults() {
        let mut store = MemoryStore::default();
        store.set(RECENT_KEY, "not json");
        store.set(SORT_KEY, "42");
        assert!(recents(&store).is_empty());
        assert_eq!(sort_order(&store), SortOrder::Recent);
    }

    #[test]
    fn sample_workspaces_lay_out_cleanly() {
        use crate::config::WorkflowConfig;
        use crate::layout::compute_workflow_layout;
        use crate::model::SelectionState;

        fn check(node: &SystemNode, config: &WorkflowConfig) {
            compute_workflow_layout(node, &SelectionState::default(), config)
                .unwrap_or_else(|err| panic!("{}: {err}", node.id));
            for sub in &node.subsystems {
                check(sub, config);
            }
        }

        for workspace in SAMPLE_WORKSPACES.iter() {
            let mut assets = Vec::new();
            workspace.root.collect_assets(&mut assets);
            let ids: std::collections::HashSet<_> =
                assets.iter().map(|a| a.id.as_str()).collect();
            assert_eq!(ids.len(), assets.len(), "duplicate asset id");
            check(&workspace.root, &WorkflowConfig::default());
        }
    }

    #[test]
    fn bare_system_file_becomes_a_workspace() {
        let dir = std::env::temp_dir();
        let path = dir.join("orbital_tug.json5");
        std::fs::write(
            &path,
            r#"{
                // comments are fine in workspace files
                id: "TUG-001",
                name: "Orbital Tug",
                status: "NOT_MADE",
            }"#,
        )
        .unwrap();
        let workspace = load_workspace(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(workspace.id, "ws-orbital_tug");
        assert_eq!(workspace.name, "orbital_tug");
        assert_eq!(workspace.root.id, "TUG-001");
    }
}
