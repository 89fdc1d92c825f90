use std::{path::PathBuf, time::Duration};

use crate::error::ConvertError;

pub enum Update {
    Message(String),
    StartProcessing(PathBuf),
    /// Ok carries the number of frames written for the file.
    FinishedProcessing(PathBuf, Result<usize, ConvertError>, Duration),
    QueueCompleted(Duration),
}
