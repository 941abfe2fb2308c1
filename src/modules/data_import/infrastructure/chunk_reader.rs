/// Streaming spreadsheet reader
///
/// Parsing runs on a blocking thread and hands batches to the async side over a
/// bounded channel, so at most one batch waits in memory while the previous one
/// is processed. Row 1 is the header; every later row becomes a [`RawRow`].
use crate::modules::data_import::domain::{normalize_header, RawRow};
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_error};
use calamine::{open_workbook, DataRef, Reader, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

type BatchMessage = AppResult<Vec<RawRow>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => Ok(SheetFormat::Xlsx),
            Some("csv") => Ok(SheetFormat::Csv),
            _ => Err(AppError::MalformedInput(format!(
                "Unsupported spreadsheet format: {}",
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChunkReader {
    chunk_size: usize,
}

impl ChunkReader {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Start reading `path`. Nothing is parsed until the stream is polled;
    /// an unreadable file surfaces as an error from the first `next_batch`.
    pub fn open(&self, path: impl Into<PathBuf>) -> AppResult<ChunkStream> {
        let path = path.into();
        let format = SheetFormat::from_path(&path)?;
        let chunk_size = self.chunk_size;
        let (tx, rx) = mpsc::channel::<BatchMessage>(1);

        log_debug!(
            "Reading {} as {:?} in batches of {}",
            path.display(),
            format,
            chunk_size
        );

        let handle = tokio::task::spawn_blocking(move || {
            let mut sink = BatchSink::new(&tx, chunk_size);
            let result = match format {
                SheetFormat::Xlsx => stream_xlsx(&path, &mut sink),
                SheetFormat::Csv => stream_csv(&path, &mut sink),
            };

            match result {
                Ok(()) => sink.finish(),
                Err(e) => {
                    let _ = tx.blocking_send(Err(e));
                }
            }
        });

        Ok(ChunkStream {
            receiver: rx,
            handle: Some(handle),
        })
    }
}

/// Lazy, finite, single-pass sequence of row batches.
pub struct ChunkStream {
    receiver: mpsc::Receiver<BatchMessage>,
    handle: Option<JoinHandle<()>>,
}

impl ChunkStream {
    /// Next batch, or `None` once the file is exhausted
    pub async fn next_batch(&mut self) -> AppResult<Option<Vec<RawRow>>> {
        match self.receiver.recv().await {
            Some(Ok(batch)) => Ok(Some(batch)),
            Some(Err(e)) => Err(e),
            None => {
                // Channel closed: either the reader finished or its thread died
                if let Some(handle) = self.handle.take() {
                    handle.await.map_err(|e| {
                        log_error!("Spreadsheet reader thread failed: {}", e);
                        AppError::InternalError(format!("Spreadsheet reader failed: {}", e))
                    })?;
                }
                Ok(None)
            }
        }
    }
}

/// Collects rows into batches and ships them to the async side.
///
/// Blank rows are held back until a non-blank row follows, so trailing blank
/// rows never reach the importer while interior ones keep their line numbers.
struct BatchSink<'a> {
    tx: &'a mpsc::Sender<BatchMessage>,
    chunk_size: usize,
    batch: Vec<RawRow>,
    pending_blank: usize,
    closed: bool,
}

impl<'a> BatchSink<'a> {
    fn new(tx: &'a mpsc::Sender<BatchMessage>, chunk_size: usize) -> Self {
        Self {
            tx,
            chunk_size,
            batch: Vec::with_capacity(chunk_size),
            pending_blank: 0,
            closed: false,
        }
    }

    /// Returns false once the receiving side is gone
    fn push(&mut self, row: RawRow) -> bool {
        if row.is_empty() {
            self.pending_blank += 1;
            return !self.closed;
        }

        while self.pending_blank > 0 {
            self.pending_blank -= 1;
            self.append(RawRow::new());
        }
        self.append(row);
        !self.closed
    }

    fn append(&mut self, row: RawRow) {
        if self.closed {
            return;
        }
        self.batch.push(row);
        if self.batch.len() >= self.chunk_size {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.batch.is_empty() || self.closed {
            return;
        }
        let batch = std::mem::replace(&mut self.batch, Vec::with_capacity(self.chunk_size));
        if self.tx.blocking_send(Ok(batch)).is_err() {
            log_debug!("Batch receiver dropped, stopping spreadsheet read");
            self.closed = true;
        }
    }

    fn finish(mut self) {
        self.flush();
    }
}

fn stream_csv(path: &Path, sink: &mut BatchSink<'_>) -> AppResult<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| normalize_header(&String::from_utf8_lossy(h)))
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::MalformedInput(format!(
            "Missing header row in {}",
            path.display()
        )));
    }

    // Cells are decoded lossily; bad bytes fail validation on their own line
    for record in reader.byte_records() {
        let record = record?;
        let mut row = RawRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            if !header.is_empty() {
                row.insert(header, String::from_utf8_lossy(value));
            }
        }
        if !sink.push(row) {
            break;
        }
    }

    Ok(())
}

fn stream_xlsx(path: &Path, sink: &mut BatchSink<'_>) -> AppResult<()> {
    let mut workbook: Xlsx<BufReader<File>> = open_workbook(path)?;
    let sheet_name = workbook.sheet_names().first().cloned().ok_or_else(|| {
        AppError::MalformedInput(format!("Workbook {} has no worksheets", path.display()))
    })?;
    let mut cells = workbook.worksheet_cells_reader(&sheet_name)?;

    let mut headers: Vec<String> = Vec::new();
    let mut current: Option<(u32, RawRow)> = None;
    // Next sheet row expected to reach the sink; gaps become blank rows
    let mut next_row: u32 = 1;

    while let Some(cell) = cells.next_cell()? {
        let (row_index, column) = cell.get_position();
        let Some(value) = render_cell(cell.get_value()) else {
            continue;
        };

        if row_index == 0 {
            let column = column as usize;
            if headers.len() <= column {
                headers.resize(column + 1, String::new());
            }
            headers[column] = normalize_header(&value);
            continue;
        }

        if headers.iter().all(|h| h.is_empty()) {
            return Err(AppError::MalformedInput(format!(
                "Missing header row in {}",
                path.display()
            )));
        }

        let starts_new_row = current.as_ref().map_or(true, |(index, _)| *index != row_index);
        if starts_new_row {
            if let Some((index, row)) = current.take() {
                if !emit_sheet_row(sink, &mut next_row, index, row) {
                    return Ok(());
                }
            }
            current = Some((row_index, RawRow::new()));
        }

        if let (Some((_, row)), Some(header)) = (current.as_mut(), headers.get(column as usize)) {
            if !header.is_empty() {
                row.insert(header, value);
            }
        }
    }

    if let Some((index, row)) = current.take() {
        emit_sheet_row(sink, &mut next_row, index, row);
    } else if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::MalformedInput(format!(
            "Missing header row in {}",
            path.display()
        )));
    }

    Ok(())
}

fn emit_sheet_row(sink: &mut BatchSink<'_>, next_row: &mut u32, index: u32, row: RawRow) -> bool {
    while *next_row < index {
        if !sink.push(RawRow::new()) {
            return false;
        }
        *next_row += 1;
    }
    *next_row = index + 1;
    sink.push(row)
}

/// Text form of a cell as the validator expects it; `None` for empty cells.
fn render_cell(value: &DataRef<'_>) -> Option<String> {
    match value {
        DataRef::Empty => None,
        DataRef::Int(value) => Some(value.to_string()),
        DataRef::Float(value) => Some(render_float(*value)),
        DataRef::String(value) => Some(value.clone()),
        DataRef::SharedString(value) => Some(value.to_string()),
        DataRef::Bool(value) => Some(value.to_string()),
        DataRef::DateTime(value) => Some(
            value
                .as_datetime()
                .map(|dt| dt.format(DISPLAY_DATE_FORMAT).to_string())
                .unwrap_or_else(|| render_float(value.as_f64())),
        ),
        DataRef::DateTimeIso(value) => Some(value.clone()),
        DataRef::DurationIso(value) => Some(value.clone()),
        DataRef::Error(value) => Some(value.to_string()),
    }
}

/// Whole numbers print without a fractional part, so id cells read as digits
fn render_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
