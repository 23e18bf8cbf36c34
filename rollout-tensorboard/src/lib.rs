//! Writes diagnostics records as TensorBoard scalars.
use log::{trace, warn};
use rollout_core::record::{Record, RecordValue, Recorder};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Key of the step count in records written by
/// [`DefaultEvaluator`](rollout_core::DefaultEvaluator).
pub const ENV_STEPS: &str = "env_steps";

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
    ignore_unsupported_value: bool,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: ENV_STEPS.to_string(),
            ignore_unsupported_value: true,
        }
    }

    /// Construct a [`TensorboardRecorder`] warning about values other than scalars.
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new_with_check_unsupported_value<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            ignore_unsupported_value: false,
            ..Self::new(logdir)
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [Record] into a TFRecord.
    ///
    /// This method handles [RecordValue::Scalar] in the [Record].
    /// Other variants will be ignored, as are records without the step count.
    fn write(&mut self, record: Record) {
        let step = match record.get(&self.step_key) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            _ => {
                warn!("Record without {} is discarded", self.step_key);
                return;
            }
        };

        for (k, v) in record.iter() {
            if *k != self.step_key {
                match v {
                    RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                    _ => {
                        if !self.ignore_unsupported_value {
                            warn!("Unsupported value: {:?}", (k, v));
                        }
                    }
                };
            }
        }
        trace!("Wrote record at step {}", step);
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_write_records() -> Result<()> {
        let dir = TempDir::new("tensorboard")?;
        let mut recorder = TensorboardRecorder::new_with_check_unsupported_value(dir.path());

        let mut record = Record::from_scalar(ENV_STEPS, 10.0);
        record.insert("global/episode_reward", RecordValue::Scalar(3.0));
        record.insert("diagnostics/action_lag", RecordValue::Array1(vec![0.1, 0.2]));
        recorder.write(record);
        recorder.write(Record::from_scalar("global/episode_length", 5.0));
        recorder.flush();

        let n_files = std::fs::read_dir(dir.path())?.count();
        assert!(n_files > 0);
        Ok(())
    }
}
