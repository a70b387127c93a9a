use serde::{Serialize, Serializer, ser::SerializeMap};

/// Terminal result recorded for a single task.
///
/// Exactly one outcome exists per task after the batch completes. Remote
/// errors, deadline expiry and panicking invocations all land in `Failure`
/// and never abort the batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome<V> {
    /// The invocation settled with a value before its deadline.
    Success { value: V },
    /// The invocation returned an error, timed out or panicked.
    Failure { reason: String },
}

impl<V> TaskOutcome<V> {
    pub fn success(value: V) -> Self {
        TaskOutcome::Success { value }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        TaskOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TaskOutcome::Failure { .. })
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            TaskOutcome::Success { value } => Some(value),
            TaskOutcome::Failure { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            TaskOutcome::Success { .. } => None,
            TaskOutcome::Failure { reason } => Some(reason),
        }
    }
}

/// Report shape: a success serializes as its bare value, a failure as
/// `{"error": reason}`.
impl<V: Serialize> Serialize for TaskOutcome<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TaskOutcome::Success { value } => value.serialize(serializer),
            TaskOutcome::Failure { reason } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", reason)?;
                map.end()
            }
        }
    }
}

/// Ordered outcomes of one batch run.
///
/// Entries are `(task id, outcome)` pairs in task-source order, never in
/// completion order, with exactly one entry per input task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchResult<V> {
    entries: Vec<(String, TaskOutcome<V>)>,
}

impl<V> BatchResult<V> {
    pub fn new(entries: Vec<(String, TaskOutcome<V>)>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, TaskOutcome<V>)> {
        self.entries.iter()
    }

    /// First outcome recorded under `id`.
    pub fn outcome(&self, id: &str) -> Option<&TaskOutcome<V>> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn into_entries(self) -> Vec<(String, TaskOutcome<V>)> {
        self.entries
    }
}

impl<V: Serialize> BatchResult<V> {
    /// The persisted report: a JSON object mapping each task id to its
    /// success value or to `{"error": reason}`.
    pub fn to_report(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut map = serde_json::Map::new();
        for (id, outcome) in &self.entries {
            map.insert(id.clone(), serde_json::to_value(outcome)?);
        }
        Ok(serde_json::Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_as_bare_value() {
        let outcome = TaskOutcome::success(json!({"apr": 12.5}));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({"apr": 12.5}));
    }

    #[test]
    fn failure_serializes_as_error_object() {
        let outcome: TaskOutcome<serde_json::Value> =
            TaskOutcome::failure("Timeout after 20000ms (id=7)");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({"error": "Timeout after 20000ms (id=7)"}));
    }

    #[test]
    fn predicates() {
        let ok: TaskOutcome<u32> = TaskOutcome::success(1);
        let bad: TaskOutcome<u32> = TaskOutcome::failure("boom");

        assert!(ok.is_success() && !ok.is_failure());
        assert!(bad.is_failure() && !bad.is_success());
        assert_eq!(ok.value(), Some(&1));
        assert_eq!(bad.reason(), Some("boom"));
    }

    #[test]
    fn report_maps_ids_to_values_and_errors() {
        let result = BatchResult::new(vec![
            ("1".to_string(), TaskOutcome::success(json!(0.07))),
            ("2".to_string(), TaskOutcome::failure("no route")),
        ]);

        let report = result.to_report().unwrap();
        assert_eq!(
            report,
            json!({
                "1": 0.07,
                "2": {"error": "no route"},
            })
        );
    }

    #[test]
    fn lookup_by_id() {
        let result = BatchResult::new(vec![
            ("a".to_string(), TaskOutcome::success(1u32)),
            ("b".to_string(), TaskOutcome::failure("nope")),
        ]);
        assert_eq!(result.len(), 2);
        assert!(result.outcome("a").unwrap().is_success());
        assert!(result.outcome("b").unwrap().is_failure());
        assert!(result.outcome("c").is_none());
    }
}
