use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);

    /// Flushes buffered output, if any. Does nothing by default.
    fn flush(&mut self) {}
}

impl<R: Recorder + ?Sized> Recorder for Box<R> {
    fn write(&mut self, record: Record) {
        (**self).write(record)
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}
