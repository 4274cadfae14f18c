use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{session_directory, FilesError, TempFile};

/// Writes `data` as json and returns where it went.
///
/// Without a `path` the data lands in a new `.json` file inside the
/// [`session_directory`]. Parent directories of `path` are created.
pub fn json_dump<T>(data: &T, path: Option<&Path>) -> Result<PathBuf, FilesError>
where
    T: Serialize + ?Sized,
{
    let path = match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut writer = BufWriter::new(File::create(path)?);
            json_dump_to(data, &mut writer)?;
            writer.flush()?;
            path.to_path_buf()
        }
        None => {
            let session = session_directory();
            fs::create_dir_all(session)?;
            let mut file = TempFile::builder()
                .suffix(".json")
                .root(session)
                .delete(false)
                .create()?;
            json_dump_to(data, &mut file)?;
            file.flush()?;
            file.path().to_path_buf()
        }
    };

    debug!(path = %path.display(), "dumped json");
    Ok(path)
}

pub fn json_dump_to<T, W>(data: &T, writer: W) -> Result<(), FilesError>
where
    T: Serialize + ?Sized,
    W: Write,
{
    serde_json::to_writer_pretty(writer, data)?;
    Ok(())
}

pub fn json_load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, FilesError> {
    json_load_from(File::open(path)?)
}

/// Reads json from `reader`, which is dropped (and so closed) afterwards.
pub fn json_load_from<T: DeserializeOwned, R: Read>(reader: R) -> Result<T, FilesError> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}
