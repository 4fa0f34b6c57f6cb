// Append-only registry of generated letters.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use csv::WriterBuilder;
use log::debug;

use servel_letters::{LogRow, LogSink};

const HEADER: [&str; 7] = [
    "Número de Reclamo",
    "Fecha y Hora",
    "Caso",
    "Comuna",
    "RUT",
    "Dígito Verificador",
    "Respuesta Generada",
];

/// A file-backed [`LogSink`].
///
/// Rows are written through the csv writer so that letters containing the
/// delimiter or newlines stay on one logical row. Each append serializes
/// and flushes the full row while holding the writer exclusively (the
/// `&mut` receiver), so writers cannot interleave or lose rows.
pub struct FileRegistry {
    writer: csv::Writer<std::fs::File>,
}

impl FileRegistry {
    /// Opens the registry file, creating it with a header row when missing
    /// or empty.
    pub fn open(path: &str, delimiter: u8) -> io::Result<FileRegistry> {
        let is_new = match std::fs::metadata(Path::new(path)) {
            Ok(m) => m.len() == 0,
            Err(_) => true,
        };
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_writer(file);
        if is_new {
            debug!("registry: writing header to new file {:?}", path);
            writer.write_record(HEADER).map_err(to_io)?;
            writer.flush()?;
        }
        Ok(FileRegistry { writer })
    }
}

impl LogSink for FileRegistry {
    fn append(&mut self, row: &LogRow) -> io::Result<()> {
        self.writer
            .write_record([
                &row.claim_number,
                &row.timestamp,
                &row.case,
                &row.commune,
                &row.rut_body,
                &row.check_digit,
                &row.text,
            ])
            .map_err(to_io)?;
        self.writer.flush()
    }
}

fn to_io(e: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}
