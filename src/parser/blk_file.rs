use crate::iter::{BlockReader, ReaderOptions};
use crate::parser::errors::{OpError, OpResult};
use crate::parser::proto::Block;
use log::info;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Holds the paths of all `blkNNNNN.dat` files of a blocks directory
#[derive(Debug, Clone)]
pub struct BlkFile {
    files: BTreeMap<i32, PathBuf>,
}

impl BlkFile {
    pub fn new(path: &Path) -> OpResult<BlkFile> {
        let files = BlkFile::scan_path(path)?;
        info!("found {} blk files in {}", files.len(), path.display());
        Ok(BlkFile { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, n_file: i32) -> OpResult<&Path> {
        self.files
            .get(&n_file)
            .map(PathBuf::as_path)
            .ok_or_else(|| OpError::NotFound(format!("blk file {}", n_file)))
    }

    /// `(index, path)` in ascending file index
    pub fn paths(&self) -> impl Iterator<Item = (i32, &Path)> {
        self.files.iter().map(|(i, p)| (*i, p.as_path()))
    }

    ///
    /// Read the blocks of one file.
    ///
    pub fn read_file(&self, n_file: i32, options: ReaderOptions) -> OpResult<BlockReader> {
        BlockReader::with_options(self.get(n_file)?, options)
    }

    ///
    /// Chain the blocks of every file in file index order.
    ///
    /// Files are opened one at a time; an unopenable file is yielded
    /// as an error and skipped.
    ///
    pub fn iter_blocks(&self, options: ReaderOptions) -> impl Iterator<Item = OpResult<Block>> + '_ {
        self.files
            .values()
            .flat_map(move |path| -> Box<dyn Iterator<Item = OpResult<Block>>> {
                match BlockReader::with_options(path, options.clone()) {
                    Ok(reader) => Box::new(reader),
                    Err(e) => Box::new(std::iter::once(Err(e))),
                }
            })
    }

    ///
    /// Run `f` over every file in parallel, each with its own reader.
    ///
    /// Results come back in file index order.
    ///
    pub fn par_for_each_file<T, F>(&self, options: &ReaderOptions, f: F) -> Vec<(i32, OpResult<T>)>
    where
        T: Send,
        F: Fn(BlockReader) -> OpResult<T> + Sync + Send,
    {
        let files: Vec<(i32, &PathBuf)> = self.files.iter().map(|(i, p)| (*i, p)).collect();
        files
            .into_par_iter()
            .map(|(index, path)| {
                let result = BlockReader::with_options(path, options.clone()).and_then(&f);
                (index, result)
            })
            .collect()
    }

    fn scan_path(path: &Path) -> OpResult<BTreeMap<i32, PathBuf>> {
        let mut collected = BTreeMap::new();
        for entry in fs::read_dir(path)? {
            // keep the entry's own name, `is_file` follows symlinks
            let path = entry?.path();
            if !path.is_file() {
                continue;
            };
            if let Some(file_name) = path.as_path().file_name() {
                if let Some(file_name) = file_name.to_str() {
                    if let Some(index) = BlkFile::parse_blk_index(file_name) {
                        collected.insert(index, path);
                    }
                }
            }
        }
        if collected.is_empty() {
            Err(OpError::NotFound(format!(
                "no blk files in {}",
                path.display()
            )))
        } else {
            Ok(collected)
        }
    }

    fn parse_blk_index(file_name: &str) -> Option<i32> {
        let prefix = "blk";
        let ext = ".dat";
        if file_name.starts_with(prefix) && file_name.ends_with(ext) {
            file_name[prefix.len()..(file_name.len() - ext.len())]
                .parse::<i32>()
                .ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::test_utils::{block_170_bytes, genesis_bytes};
    use std::fs::File;
    use std::io::Write;
    use tempdir::TempDir;

    #[test]
    fn test_parse_blk_index() {
        assert_eq!(0, BlkFile::parse_blk_index("blk00000.dat").unwrap());
        assert_eq!(6, BlkFile::parse_blk_index("blk6.dat").unwrap());
        assert_eq!(1202, BlkFile::parse_blk_index("blk1202.dat").unwrap());
        assert_eq!(
            13412451,
            BlkFile::parse_blk_index("blk13412451.dat").unwrap()
        );
        assert_eq!(true, BlkFile::parse_blk_index("blkindex.dat").is_none());
        assert_eq!(true, BlkFile::parse_blk_index("invalid.dat").is_none());
        assert_eq!(true, BlkFile::parse_blk_index("rev00000.dat").is_none());
    }

    fn blocks_dir() -> TempDir {
        let dir = TempDir::new("blk_file").unwrap();
        let mut first = genesis_bytes();
        first.extend(block_170_bytes());
        File::create(dir.path().join("blk00000.dat"))
            .unwrap()
            .write_all(&first)
            .unwrap();
        File::create(dir.path().join("blk00001.dat"))
            .unwrap()
            .write_all(&block_170_bytes())
            .unwrap();
        File::create(dir.path().join("rev00000.dat"))
            .unwrap()
            .write_all(b"undo")
            .unwrap();
        dir
    }

    #[test]
    fn test_scan_and_iterate() {
        let dir = blocks_dir();
        let blk = BlkFile::new(dir.path()).unwrap();
        assert_eq!(blk.len(), 2);
        assert_eq!(blk.paths().map(|(i, _)| i).collect::<Vec<_>>(), vec![0, 1]);
        let sizes: Vec<u32> = blk
            .iter_blocks(ReaderOptions::strict())
            .map(|b| b.unwrap().header.block_size)
            .collect();
        assert_eq!(sizes, vec![285, 490, 490]);
        assert_eq!(blk.read_file(1, ReaderOptions::strict()).unwrap().count(), 1);
        assert!(matches!(blk.get(7), Err(OpError::NotFound(_))));
    }

    #[test]
    fn test_par_for_each_file() {
        let dir = blocks_dir();
        let blk = BlkFile::new(dir.path()).unwrap();
        let counts = blk.par_for_each_file(&ReaderOptions::strict(), |reader| {
            let mut n = 0usize;
            for block in reader {
                n += block?.transactions.len();
            }
            Ok(n)
        });
        let counts: Vec<(i32, usize)> = counts.into_iter().map(|(i, r)| (i, r.unwrap())).collect();
        assert_eq!(counts, vec![(0, 3), (1, 2)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_symlink() {
        let dir = blocks_dir();
        std::os::unix::fs::symlink("blk00001.dat", dir.path().join("blk00002.dat")).unwrap();
        // dangling links are not blk files
        std::os::unix::fs::symlink("missing.dat", dir.path().join("blk00003.dat")).unwrap();

        let blk = BlkFile::new(dir.path()).unwrap();
        assert_eq!(blk.paths().map(|(i, _)| i).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(blk.get(2).unwrap().ends_with("blk00002.dat"));
        let blocks: Vec<_> = blk
            .read_file(2, ReaderOptions::strict())
            .unwrap()
            .map(|b| b.unwrap())
            .collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header.block_size, 490);
        assert_eq!(blk.iter_blocks(ReaderOptions::strict()).count(), 4);
    }

    #[test]
    fn test_empty_dir() {
        let dir = TempDir::new("blk_file").unwrap();
        assert!(matches!(BlkFile::new(dir.path()), Err(OpError::NotFound(_))));
    }
}
