pub mod chunk_reader;
pub mod report_writer;

pub use chunk_reader::{ChunkReader, ChunkStream, SheetFormat};
pub use report_writer::ReportWriter;
