use super::{Record, Recorder};

/// Buffered recorder.
///
/// Keeps every written record in memory, in writing order.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// The number of records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Takes the records out of the recorder.
    pub fn drain(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.buf)
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_recorder_keeps_order() {
        let mut recorder = BufferedRecorder::new();
        for i in 0..3 {
            recorder.write(Record::from_scalar("i", i as f32));
        }
        let values = recorder
            .iter()
            .map(|r| r.get_scalar("i").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(values, vec![0.0, 1.0, 2.0]);
        assert_eq!(recorder.drain().len(), 3);
        assert!(recorder.is_empty());
    }
}
