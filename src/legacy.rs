//! Migration of older persisted documents.
//!
//! Documents are JSON objects `{ "version", "tasks", "config" }`. A missing
//! version means the first layout. Migrations run in order on the raw
//! [`serde_json::Value`] so that typed deserialization only ever sees the
//! current shape.
//!
//! | Version | Change |
//! |---------|--------|
//! | 1 → 2 | Team members stored as bare names become structured members (8h/day) |
//! | 1 → 2 | Top-level `sprints` move into a synthetic `default` squad |
//! | 1 → 2 | Task classification `0` (unset) becomes `null` |
//! | 1 → 2 | Missing task flags default to `false`, `usType` to `item` |

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::{GanttError, Result};
use crate::models::DEFAULT_CAPACITY_HOURS;

/// Layout produced by this crate.
pub const CURRENT_VERSION: u64 = 2;

/// Id of the squad that receives top-level sprints.
pub const DEFAULT_SQUAD_ID: &str = "default";

/// Reads the document version; absent means 1.
pub fn document_version(doc: &Value) -> Result<u64> {
    match doc.get("version") {
        None | Some(Value::Null) => Ok(1),
        Some(v) => v
            .as_u64()
            .ok_or_else(|| GanttError::Malformed(format!("version must be an integer, got {v}"))),
    }
}

/// Brings a document to [`CURRENT_VERSION`] and stamps the version.
///
/// # Errors
/// - [`GanttError::Malformed`] if the document is not an object.
/// - [`GanttError::UnsupportedVersion`] for versions newer than this crate.
pub fn migrate(mut doc: Value) -> Result<Value> {
    let version = document_version(&doc)?;
    if version > CURRENT_VERSION {
        return Err(GanttError::UnsupportedVersion {
            found: version,
            supported: CURRENT_VERSION,
        });
    }

    let root = doc
        .as_object_mut()
        .ok_or_else(|| GanttError::Malformed("document must be a JSON object".into()))?;

    if version < 2 {
        debug!(from = version, to = 2, "migrating document");
        if let Some(config) = root.get_mut("config").and_then(Value::as_object_mut) {
            migrate_members(config);
            migrate_sprints(config);
        }
        if let Some(tasks) = root.get_mut("tasks").and_then(Value::as_array_mut) {
            tasks
                .iter_mut()
                .filter_map(Value::as_object_mut)
                .for_each(migrate_task);
        }
    }

    root.insert("version".into(), json!(CURRENT_VERSION));
    Ok(doc)
}

fn migrate_members(config: &mut Map<String, Value>) {
    let Some(members) = config.get_mut("teamMembers").and_then(Value::as_array_mut) else {
        return;
    };
    for member in members.iter_mut() {
        if let Some(name) = member.as_str().map(str::to_owned) {
            *member = json!({
                "name": name,
                "capacity": DEFAULT_CAPACITY_HOURS,
                "daysOff": [],
                "sector": "",
                "squadIds": [],
            });
        }
    }
    members.retain(|m| {
        let ok = m.get("name").and_then(Value::as_str).is_some();
        if !ok {
            warn!(member = %m, "dropping team member without a name");
        }
        ok
    });
}

fn migrate_sprints(config: &mut Map<String, Value>) {
    let sprints = match config.remove("sprints") {
        Some(Value::Array(sprints)) if !sprints.is_empty() => sprints,
        _ => return,
    };

    let skip_weekends = config_skip_weekends(config);
    let squads = config
        .entry("squads")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !squads.is_array() {
        *squads = Value::Array(Vec::new());
    }
    let Some(squads) = squads.as_array_mut() else {
        return;
    };

    let existing = squads
        .iter()
        .position(|s| s.get("id").and_then(Value::as_str) == Some(DEFAULT_SQUAD_ID));
    let index = match existing {
        Some(i) => i,
        None => {
            squads.push(json!({
                "id": DEFAULT_SQUAD_ID,
                "name": "Default",
                "color": "",
                "startDate": "",
                "deadline": "",
                "skipWeekends": skip_weekends,
                "holidays": [],
                "sprints": [],
            }));
            squads.len() - 1
        }
    };

    let Some(target) = squads[index]
        .as_object_mut()
        .and_then(|s| s.entry("sprints").or_insert_with(|| json!([])).as_array_mut())
    else {
        return;
    };
    for mut sprint in sprints {
        if let Some(obj) = sprint.as_object_mut() {
            obj.insert("squadId".into(), json!(DEFAULT_SQUAD_ID));
        }
        target.push(sprint);
    }
    target.sort_by(|a, b| sprint_start(a).cmp(sprint_start(b)));
}

fn config_skip_weekends(config: &Map<String, Value>) -> bool {
    config
        .get("skipWeekends")
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

fn sprint_start(sprint: &Value) -> &str {
    sprint.get("startDate").and_then(Value::as_str).unwrap_or("")
}

fn migrate_task(task: &mut Map<String, Value>) {
    for flag in ["isNotPlanned", "isCompleted", "isMilestone"] {
        if !matches!(task.get(flag), Some(Value::Bool(_))) {
            task.insert(flag.into(), Value::Bool(false));
        }
    }
    if !matches!(task.get("usType"), Some(Value::String(s)) if !s.is_empty()) {
        task.insert("usType".into(), json!("item"));
    }
    let unranked = match task.get("classification") {
        Some(v) => v.as_u64().map_or(true, |rank| rank == 0),
        None => false,
    };
    if unranked {
        task.insert("classification".into(), Value::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_detection() {
        assert_eq!(document_version(&json!({})).unwrap(), 1);
        assert_eq!(document_version(&json!({"version": 2})).unwrap(), 2);
        assert!(matches!(
            document_version(&json!({"version": "two"})),
            Err(GanttError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_future_version() {
        let err = migrate(json!({"version": 9})).unwrap_err();
        assert!(matches!(
            err,
            GanttError::UnsupportedVersion {
                found: 9,
                supported: CURRENT_VERSION
            }
        ));
        assert!(matches!(migrate(json!([1, 2])), Err(GanttError::Malformed(_))));
    }

    #[test]
    fn test_bare_member_names() {
        let doc = migrate(json!({
            "config": {
                "projectStartDate": "2024-01-01",
                "teamMembers": ["Ana", {"name": "Rui", "capacity": 6}, {"capacity": 4}]
            }
        }))
        .unwrap();

        let members = doc["config"]["teamMembers"].as_array().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0]["name"], "Ana");
        assert_eq!(members[0]["capacity"], 8.0);
        assert_eq!(members[1]["capacity"], 6);
        assert_eq!(doc["version"], CURRENT_VERSION);
    }

    #[test]
    fn test_top_level_sprints_into_default_squad() {
        let doc = migrate(json!({
            "config": {
                "projectStartDate": "2024-01-01",
                "skipWeekends": false,
                "sprints": [
                    {"id": "s2", "name": "S2", "startDate": "2024-01-15", "endDate": "2024-01-26"},
                    {"id": "s1", "name": "S1", "startDate": "2024-01-01", "endDate": "2024-01-12"}
                ],
                "squads": [{"id": "web", "sprints": []}]
            }
        }))
        .unwrap();

        let config = &doc["config"];
        assert!(config.get("sprints").is_none());
        let squads = config["squads"].as_array().unwrap();
        assert_eq!(squads.len(), 2);
        let default = &squads[1];
        assert_eq!(default["id"], DEFAULT_SQUAD_ID);
        assert_eq!(default["skipWeekends"], false);
        assert_eq!(default["sprints"][0]["id"], "s1");
        assert_eq!(default["sprints"][1]["squadId"], DEFAULT_SQUAD_ID);
    }

    #[test]
    fn test_task_defaults() {
        let doc = migrate(json!({
            "tasks": [
                {"id": "a", "classification": 0},
                {"id": "b", "classification": 3, "usType": "goal", "isCompleted": true}
            ]
        }))
        .unwrap();

        let a = &doc["tasks"][0];
        assert_eq!(a["isMilestone"], false);
        assert_eq!(a["usType"], "item");
        assert!(a["classification"].is_null());
        let b = &doc["tasks"][1];
        assert_eq!(b["classification"], 3);
        assert_eq!(b["usType"], "goal");
        assert_eq!(b["isCompleted"], true);
    }

    #[test]
    fn test_current_version_untouched() {
        let doc = json!({"version": 2, "tasks": [{"id": "a", "classification": 0}]});
        let migrated = migrate(doc.clone()).unwrap();
        assert_eq!(migrated, doc);
    }
}
