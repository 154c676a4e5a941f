use crate::core::errors::{Error, Result};
use log::info;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

/// Write one item per line, each line newline-terminated.
pub fn write_items<W: Write, S: AsRef<str>>(writer: &mut W, items: &[S]) -> io::Result<()> {
    for item in items {
        writeln!(writer, "{}", item.as_ref())?;
    }
    writer.flush()
}

/// Write the items to `path`, truncating an existing file or, with `append`, adding the items
/// after its current content.
pub fn write_to_file<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    items: &[S],
    append: bool,
) -> Result<()> {
    let path = path.as_ref();
    let output_error = |source: io::Error| Error::Output {
        path: path.to_path_buf(),
        source,
    };

    let file = OpenOptions::new()
        .create(true)
        .write(!append)
        .truncate(!append)
        .append(append)
        .open(path)
        .map_err(output_error)?;

    let mut writer = BufWriter::new(file);
    write_items(&mut writer, items).map_err(output_error)?;

    info!("Wrote {} item(s) to {:?}", items.len(), path);
    Ok(())
}

/// Write the items to standard output.
pub fn write_to_stdout<S: AsRef<str>>(items: &[S]) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    write_items(&mut writer, items).map_err(|source| Error::Output {
        path: "<stdout>".into(),
        source,
    })
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
