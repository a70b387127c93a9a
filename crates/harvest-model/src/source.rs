use thiserror::Error;

use crate::Task;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("invalid id range: from={from} to={to}")]
    InvalidRange { from: i64, to: i64 },
}

/// Tasks for an inclusive numeric id range.
///
/// Each task's input is its own id string, which suits lookup-style calls
/// where the identifier is the whole request.
pub fn tasks_from_range(from: i64, to: i64) -> Result<Vec<Task<String>>, SourceError> {
    if from > to {
        return Err(SourceError::InvalidRange { from, to });
    }
    Ok((from..=to)
        .enumerate()
        .map(|(index, id)| Task::new(index, id.to_string(), id.to_string()))
        .collect())
}

/// Tasks for an explicit identifier list, in the given order.
///
/// An empty list is legal and yields an empty batch.
pub fn tasks_from_ids<S>(ids: impl IntoIterator<Item = S>) -> Vec<Task<String>>
where
    S: Into<String>,
{
    ids.into_iter()
        .enumerate()
        .map(|(index, id)| {
            let id = id.into();
            Task::new(index, id.clone(), id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive_and_ordered() {
        let tasks = tasks_from_range(1, 4).unwrap();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
        assert_eq!(
            tasks.iter().map(|t| t.index).collect::<Vec<_>>(),
            [0, 1, 2, 3]
        );
    }

    #[test]
    fn single_element_range() {
        let tasks = tasks_from_range(7, 7).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "7");
        assert_eq!(tasks[0].index, 0);
    }

    #[test]
    fn inverted_range_rejected() {
        assert_eq!(
            tasks_from_range(5, 3),
            Err(SourceError::InvalidRange { from: 5, to: 3 })
        );
    }

    #[test]
    fn id_list_keeps_order_and_duplicates() {
        let tasks = tasks_from_ids(["10", "0", "10"]);
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["10", "0", "10"]);
        assert_eq!(tasks[2].index, 2);
    }

    #[test]
    fn empty_id_list_is_legal() {
        let tasks = tasks_from_ids(Vec::<String>::new());
        assert!(tasks.is_empty());
    }
}
