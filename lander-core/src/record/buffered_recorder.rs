use super::{Record, Recorder};

/// Keeps records in memory.
///
/// This is used for inspecting training metrics in tests and evaluation runs.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self { buf: Vec::default() }
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Number of records kept so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether no record has been kept.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }

    fn store(&mut self, record: Record) {
        self.buf.push(record);
    }

    fn flush(&mut self, _step: i64) {}
}
