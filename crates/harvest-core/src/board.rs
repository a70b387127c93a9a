use std::sync::OnceLock;

use harvest_model::TaskOutcome;

use crate::error::BatchError;

/// Write-once slot array, pre-sized to the task count.
///
/// This is what makes output order independent of completion order: each
/// worker writes the slot of the index it claimed, and `finalize` reads the
/// slots back in index order. Every slot has exactly one writer, so the
/// lock-free `OnceLock` is sufficient.
pub struct SlotBoard<V> {
    slots: Vec<OnceLock<TaskOutcome<V>>>,
}

impl<V> SlotBoard<V> {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Record the outcome for `index`. A second write to the same slot is an
    /// executor bug and fails loudly.
    pub fn set(&self, index: usize, outcome: TaskOutcome<V>) -> Result<(), BatchError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get(index)
            .ok_or(BatchError::SlotOutOfRange { index, len })?;
        slot.set(outcome)
            .map_err(|_| BatchError::SlotAlreadySet { index })
    }

    pub fn unset_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_none()).count()
    }

    /// Outcomes in index order. Fails if any slot was never written.
    pub fn finalize(self) -> Result<Vec<TaskOutcome<V>>, BatchError> {
        let missing = self.unset_count();
        if missing > 0 {
            return Err(BatchError::IncompleteBatch { missing });
        }
        Ok(self
            .slots
            .into_iter()
            .filter_map(OnceLock::into_inner)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_come_back_in_index_order() {
        let board: SlotBoard<u32> = SlotBoard::new(3);
        // written out of order, read back in order
        board.set(2, TaskOutcome::success(20)).unwrap();
        board.set(0, TaskOutcome::success(0)).unwrap();
        board.set(1, TaskOutcome::failure("mid")).unwrap();

        let outcomes = board.finalize().unwrap();
        assert_eq!(outcomes[0], TaskOutcome::success(0));
        assert_eq!(outcomes[1], TaskOutcome::failure("mid"));
        assert_eq!(outcomes[2], TaskOutcome::success(20));
    }

    #[test]
    fn double_write_is_an_invariant_violation() {
        let board: SlotBoard<u32> = SlotBoard::new(1);
        board.set(0, TaskOutcome::success(1)).unwrap();
        let err = board.set(0, TaskOutcome::success(2)).unwrap_err();
        assert!(matches!(err, BatchError::SlotAlreadySet { index: 0 }));
    }

    #[test]
    fn out_of_range_write_is_rejected() {
        let board: SlotBoard<u32> = SlotBoard::new(2);
        let err = board.set(5, TaskOutcome::success(1)).unwrap_err();
        assert!(matches!(err, BatchError::SlotOutOfRange { index: 5, len: 2 }));
    }

    #[test]
    fn unset_slot_fails_finalize() {
        let board: SlotBoard<u32> = SlotBoard::new(2);
        board.set(0, TaskOutcome::success(1)).unwrap();
        let err = board.finalize().unwrap_err();
        assert!(matches!(err, BatchError::IncompleteBatch { missing: 1 }));
    }

    #[test]
    fn empty_board_finalizes_empty() {
        let board: SlotBoard<u32> = SlotBoard::new(0);
        assert!(board.is_empty());
        assert!(board.finalize().unwrap().is_empty());
    }
}
