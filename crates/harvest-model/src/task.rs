/// One unit of independent work in a batch.
///
/// Identity is `index`: the task's stable 0-based position in the input
/// sequence, which is also the position its outcome occupies in the batch
/// result. `id` is the caller-facing label used in logs and reports and may
/// simply duplicate `index` as a string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task<I> {
    pub index: usize,
    pub id: String,
    pub input: I,
}

impl<I> Task<I> {
    pub fn new(index: usize, id: impl Into<String>, input: I) -> Self {
        Self {
            index,
            id: id.into(),
            input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_positional() {
        let task = Task::new(3, "42", "payload");
        assert_eq!(task.index, 3);
        assert_eq!(task.id, "42");
        assert_eq!(task.input, "payload");
    }
}
