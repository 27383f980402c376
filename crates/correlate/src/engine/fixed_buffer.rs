/// A fixed-capacity append buffer reused across the batches of one
/// resolution call.
///
/// `len` marks the logically filled prefix. Slots past it keep whatever a
/// previous batch left there until [`FixedBuffer::clear_tail`] resets them.
#[derive(Debug)]
pub(crate) struct FixedBuffer<T> {
    slots: Box<[T]>,
    len: usize,
}

impl<T: Clone + Default> FixedBuffer<T> {
    #[track_caller]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "fixed buffer capacity must be at least 1");

        Self {
            slots: vec![T::default(); capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Appends a value.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is full.
    #[track_caller]
    pub(crate) fn push(&mut self, value: T) {
        assert!(!self.is_full(), "fixed buffer overflow; capacity={}", self.capacity());
        self.slots[self.len] = value;
        self.len += 1;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// The logically filled entries.
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.slots[..self.len]
    }

    /// Every slot, including the tail past `len`.
    pub(crate) fn padded(&self) -> &[T] {
        &self.slots
    }

    /// Resets the unused slots to their default.
    pub(crate) fn clear_tail(&mut self) {
        for slot in &mut self.slots[self.len..] {
            *slot = T::default();
        }
    }

    /// Sets the logical size to zero. Slot contents are kept.
    pub(crate) fn reset(&mut self) {
        self.len = 0;
    }
}
