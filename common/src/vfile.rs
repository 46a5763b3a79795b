use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Raw bytes of a container file, exactly as they sit on disk.
#[derive(Default, Debug)]
pub struct VFile {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

impl VFile {
    /// Read the whole file. An empty file is rejected, there is nothing to decode in it.
    pub fn load(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;

        if data.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is empty", path.display()),
            ));
        }

        log::info!("Read {} bytes from {:?}", data.len(), path);

        Ok(Self {
            path: path.to_owned(),
            data,
        })
    }

    /// File name without its extension, used to name output directories.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
    }
}

#[cfg(test)]
mod vfile_tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_bytes_and_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("goblin_base.ftl");
        fs::File::create(&path)
            .unwrap()
            .write_all(&[1, 2, 3])
            .unwrap();

        let file = VFile::load(&path).unwrap();
        assert_eq!(file.data, [1, 2, 3]);
        assert_eq!(file.stem(), "goblin_base");
    }

    #[test]
    fn empty_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.ftl");
        fs::File::create(&path).unwrap();

        let err = VFile::load(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
