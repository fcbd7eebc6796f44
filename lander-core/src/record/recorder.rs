use super::Record;

/// Writes records to an output destination.
///
/// Implementations either write records immediately with [`Recorder::write`]
/// or buffer them with [`Recorder::store`] and emit aggregated values on
/// [`Recorder::flush`].
pub trait Recorder {
    /// Writes a record immediately.
    fn write(&mut self, record: Record);

    /// Stores the record for later aggregation.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records at the given step.
    fn flush(&mut self, step: i64);
}
