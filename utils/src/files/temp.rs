use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use super::{tempdir, FilesError};

/// A named temporary file, removed on drop unless built with
/// `delete(false)`.
#[derive(Debug)]
pub struct TempFile {
    inner: Inner,
}

#[derive(Debug)]
enum Inner {
    Deleting(NamedTempFile),
    Kept { file: File, path: PathBuf },
}

impl TempFile {
    pub fn builder<'a>() -> TempFileBuilder<'a> {
        TempFileBuilder {
            prefix: "tmp",
            suffix: "",
            root: None,
            delete: true,
        }
    }

    pub fn path(&self) -> &Path {
        match &self.inner {
            Inner::Deleting(named) => named.path(),
            Inner::Kept { path, .. } => path,
        }
    }

    pub fn file(&self) -> &File {
        match &self.inner {
            Inner::Deleting(named) => named.as_file(),
            Inner::Kept { file, .. } => file,
        }
    }

    fn file_mut(&mut self) -> &mut File {
        match &mut self.inner {
            Inner::Deleting(named) => named.as_file_mut(),
            Inner::Kept { file, .. } => file,
        }
    }
}

impl Write for TempFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file_mut().flush()
    }
}

#[derive(Debug, Clone)]
pub struct TempFileBuilder<'a> {
    prefix: &'a str,
    suffix: &'a str,
    root: Option<&'a Path>,
    delete: bool,
}

impl<'a> TempFileBuilder<'a> {
    pub fn prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn suffix(mut self, suffix: &'a str) -> Self {
        self.suffix = suffix;
        self
    }

    /// Directory to create the file in. Defaults to a fresh [`tempdir`].
    pub fn root(mut self, root: &'a Path) -> Self {
        self.root = Some(root);
        self
    }

    pub fn delete(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }

    pub fn create(self) -> Result<TempFile, FilesError> {
        let root = match self.root {
            Some(root) => root.to_path_buf(),
            None => tempdir(false, None)?,
        };

        let named = tempfile::Builder::new()
            .prefix(self.prefix)
            .suffix(self.suffix)
            .tempfile_in(&root)?;

        let inner = if self.delete {
            Inner::Deleting(named)
        } else {
            let (file, path) = named.keep().map_err(|err| FilesError::Io(err.error))?;
            Inner::Kept { file, path }
        };
        Ok(TempFile { inner })
    }
}
