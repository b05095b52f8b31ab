use super::{Record, Recorder};
use std::{cell::RefCell, rc::Rc};

/// Buffered recorder.
///
/// Keeps every record in memory. Clones share the same buffer, so a clone
/// can be handed to a [`Trainer`](crate::Trainer) while the original is
/// kept for reading.
#[derive(Debug, Default, Clone)]
pub struct BufferedRecorder {
    buf: Rc<RefCell<Vec<Record>>>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the records written so far.
    pub fn records(&self) -> Vec<Record> {
        self.buf.borrow().clone()
    }

    /// The number of records written so far.
    pub fn len(&self) -> usize {
        self.buf.borrow().len()
    }

    /// Returns `true` if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.borrow_mut().push(record);
    }
}
