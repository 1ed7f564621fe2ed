use crate::error::{MoError, Result};

/// Answers slotted by query id, independent of the order they arrive in.
#[derive(Clone, Debug)]
pub struct Answers<T> {
    slots: Vec<Option<T>>,
}

impl<T> Answers<T> {
    pub fn with_len(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn record(&mut self, id: usize, value: T) {
        debug_assert!(self.slots[id].is_none(), "query #{id} answered twice");
        self.slots[id] = Some(value);
    }

    /// Answers in submission order.
    pub fn finish(self) -> Result<Vec<T>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(id, slot)| slot.ok_or(MoError::MissingAnswer { id }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Answers;
    use crate::error::MoError;

    #[test]
    fn restores_submission_order() {
        let mut answers = Answers::with_len(3);
        answers.record(2, "c");
        answers.record(0, "a");
        answers.record(1, "b");
        assert_eq!(answers.finish(), Ok(vec!["a", "b", "c"]));
    }

    #[test]
    fn missing_slot_is_reported() {
        let mut answers = Answers::with_len(2);
        answers.record(0, 1_u64);
        assert_eq!(answers.finish(), Err(MoError::MissingAnswer { id: 1 }));
    }
}
