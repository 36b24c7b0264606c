use crate::error::{ImportError, RowFormatError};
use crate::transaction::RawRow;

use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::mem;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

pub type RowResult = Result<RawRow, RowFormatError>;

enum ReaderState<R> {
    /// First physical line not consumed yet.
    Pending(BufReader<R>),
    Records(StringRecordsIntoIter<BufReader<R>>),
    Done,
}

/// Lazily reads data rows, skipping the first line whatever it contains.
pub struct RowReader<R> {
    state: ReaderState<R>,
}

impl<R: Read> RowReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            state: ReaderState::Pending(BufReader::new(reader)),
        }
    }

    /// Drops the first physical line, blank or not, then switches to csv
    /// records for the rest of the input.
    fn skip_header(
        mut reader: BufReader<R>,
    ) -> Result<StringRecordsIntoIter<BufReader<R>>, csv::Error> {
        let mut header = Vec::new();
        reader.read_until(b'\n', &mut header)?;

        let rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        Ok(rdr.into_records())
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<RawRow, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                ReaderState::Records(ref mut records) => {
                    return records
                        .next()
                        .map(|record| record.map(|record| RawRow::from_record(&record)));
                }
                ReaderState::Done => return None,
                ReaderState::Pending(_) => {
                    let ReaderState::Pending(reader) =
                        mem::replace(&mut self.state, ReaderState::Done)
                    else {
                        return None;
                    };
                    match Self::skip_header(reader) {
                        Ok(records) => self.state = ReaderState::Records(records),
                        Err(err) => return Some(Err(err)),
                    }
                }
            }
        }
    }
}

pub async fn open_rows(path: &Path) -> Result<RowReader<File>, ImportError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| ImportError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(RowReader::from_reader(file.into_std().await))
}

/// Drives `rows` on the blocking pool and forwards each row over a bounded
/// channel. The channel closes when the reader is exhausted or fails; the
/// returned handle reports how the reader ended.
pub fn spawn_row_stream<R>(
    rows: RowReader<R>,
    path: PathBuf,
    capacity: usize,
) -> (mpsc::Receiver<RowResult>, JoinHandle<Result<(), ImportError>>)
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<RowResult>(capacity.max(1));

    let handle = tokio::task::spawn_blocking(move || {
        for row in rows {
            let item = match row {
                Ok(raw) => Ok(raw),
                Err(err) => {
                    let line = err.position().map(|pos| pos.line());
                    let message = err.to_string();
                    match err.into_kind() {
                        csv::ErrorKind::Io(source) => {
                            return Err(ImportError::FileAccess { path, source });
                        }
                        _ => {
                            debug!("Skipping malformed line {:?}: {}", line, message);
                            Err(RowFormatError::Malformed { line, message })
                        }
                    }
                }
            };

            if tx.blocking_send(item).is_err() {
                // Collector went away, nobody wants the rest
                break;
            }
        }
        Ok(())
    });

    (rx, handle)
}
