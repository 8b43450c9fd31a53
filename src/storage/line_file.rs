//! Line File - low-level I/O for line-addressed text files.
//!
//! The [`LineFile`] handles all direct file operations on the index:
//! - Reading a single line by number
//! - Overwriting (or appending) a line by number
//! - Managing the index file handle

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::common::Result;

/// Manages I/O for a single UTF-8 file addressed by 1-based line number.
///
/// # File Layout
/// ```text
/// line 1 \n
/// line 2 \n
/// ...
/// line N \n
/// ```
///
/// Lines are variable length, so a write cannot be done in place: the
/// file is read, the target line replaced, and the whole file rewritten.
/// Writing past the end pads the gap with empty lines.
///
/// # Thread Safety
/// `LineFile` is **single-threaded**. The node cache is its only user.
///
/// # Durability
/// With `sync` enabled, every write is followed by `fsync()`.
pub struct LineFile {
    file: File,
    path: PathBuf,
    sync: bool,
}

impl LineFile {
    /// Create a new, empty file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P, sync: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;

        Ok(Self {
            file,
            path: path.as_ref().to_path_buf(),
            sync,
        })
    }

    /// Open an existing file.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, sync: bool) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        Ok(Self {
            file,
            path: path.as_ref().to_path_buf(),
            sync,
        })
    }

    /// Open an existing file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P, sync: bool) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path, sync)
        } else {
            Self::create(path, sync)
        }
    }

    /// Path this file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read line `line_number` (1-based).
    ///
    /// Returns `None` if the file has fewer lines.
    pub fn read_line(&mut self, line_number: usize) -> Result<Option<String>> {
        self.file.seek(SeekFrom::Start(0))?;
        read_nth_line(BufReader::new(&self.file), line_number)
    }

    /// Overwrite line `line_number` (1-based) with `content`.
    ///
    /// `content` must not contain a newline.
    pub fn write_line(&mut self, line_number: usize, content: &str) -> Result<()> {
        self.write_lines(line_number, &[content])
    }

    /// Overwrite consecutive lines starting at `first_line` (1-based).
    pub fn write_lines<S: AsRef<str>>(&mut self, first_line: usize, contents: &[S]) -> Result<()> {
        debug_assert!(first_line >= 1, "line numbers are 1-based");

        let mut lines = self.read_all_lines()?;
        let last = first_line + contents.len() - 1;
        if lines.len() < last {
            lines.resize(last, String::new());
        }
        for (offset, content) in contents.iter().enumerate() {
            lines[first_line - 1 + offset] = content.as_ref().to_string();
        }

        let mut buf = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in &lines {
            buf.push_str(line);
            buf.push('\n');
        }

        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(buf.as_bytes())?;
        if self.sync {
            self.file.sync_all()?; // fsync for durability
        }

        Ok(())
    }

    /// Number of lines in the file.
    pub fn line_count(&mut self) -> Result<usize> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut count = 0;
        for line in BufReader::new(&self.file).lines() {
            line?;
            count += 1;
        }
        Ok(count)
    }

    /// Whether the file holds no bytes at all.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.file.metadata()?.len() == 0)
    }

    fn read_all_lines(&mut self) -> Result<Vec<String>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut content = String::new();
        self.file.read_to_string(&mut content)?;
        Ok(content.lines().map(str::to_string).collect())
    }
}

/// Read line `line_number` (1-based) from `reader`.
///
/// Returns `None` for line 0 or a line past the end.
pub fn read_nth_line<R: BufRead>(reader: R, line_number: usize) -> Result<Option<String>> {
    if line_number == 0 {
        return Ok(None);
    }
    match reader.lines().nth(line_number - 1) {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_create_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.txt");

        let mut lf = LineFile::create(&path, false).unwrap();
        assert_eq!(lf.line_count().unwrap(), 0);
        assert!(lf.is_empty().unwrap());
        assert_eq!(lf.path(), path.as_path());
    }

    #[test]
    fn test_create_existing_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.txt");

        LineFile::create(&path, false).unwrap();
        assert!(LineFile::create(&path, false).is_err());
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.txt");

        assert!(LineFile::open(&path, false).is_err());
    }

    #[test]
    fn test_write_and_read_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.txt");

        let mut lf = LineFile::create(&path, false).unwrap();
        lf.write_line(1, "first").unwrap();
        lf.write_line(2, "second").unwrap();

        assert_eq!(lf.read_line(1).unwrap().as_deref(), Some("first"));
        assert_eq!(lf.read_line(2).unwrap().as_deref(), Some("second"));
        assert_eq!(lf.read_line(3).unwrap(), None);
        assert_eq!(lf.read_line(0).unwrap(), None);
    }

    #[test]
    fn test_write_past_end_pads_with_empty_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.txt");

        let mut lf = LineFile::create(&path, false).unwrap();
        lf.write_line(4, "fourth").unwrap();

        assert_eq!(lf.line_count().unwrap(), 4);
        assert_eq!(lf.read_line(2).unwrap().as_deref(), Some(""));
        assert_eq!(fs::read_to_string(&path).unwrap(), "\n\n\nfourth\n");
    }

    #[test]
    fn test_overwrite_keeps_other_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.txt");

        let mut lf = LineFile::create(&path, false).unwrap();
        lf.write_lines(1, &["a", "b", "c"]).unwrap();
        lf.write_line(2, "a much longer replacement").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "a\na much longer replacement\nc\n"
        );

        lf.write_line(2, "x").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nx\nc\n");
    }

    #[test]
    fn test_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.txt");

        {
            let mut lf = LineFile::create(&path, true).unwrap();
            lf.write_lines(1, &["ROOT_ID:0", "NEXT_NODE_ID:1"]).unwrap();
        }

        {
            let mut lf = LineFile::open(&path, true).unwrap();
            assert_eq!(lf.line_count().unwrap(), 2);
            assert_eq!(lf.read_line(2).unwrap().as_deref(), Some("NEXT_NODE_ID:1"));
        }
    }

    #[test]
    fn test_open_or_create() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.txt");

        // First call creates
        {
            let mut lf = LineFile::open_or_create(&path, false).unwrap();
            assert_eq!(lf.line_count().unwrap(), 0);
            lf.write_line(1, "hello").unwrap();
        }

        // Second call opens existing
        {
            let mut lf = LineFile::open_or_create(&path, false).unwrap();
            assert_eq!(lf.line_count().unwrap(), 1);
        }
    }

    #[test]
    fn test_read_nth_line_from_reader() {
        let data = "id,name\n1,alpha\n2,beta\n";
        assert_eq!(
            read_nth_line(data.as_bytes(), 3).unwrap().as_deref(),
            Some("2,beta")
        );
        assert_eq!(read_nth_line(data.as_bytes(), 4).unwrap(), None);
    }
}
