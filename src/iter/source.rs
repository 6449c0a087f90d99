use crate::parser::errors::OpResult;
use log::debug;
use memmap2::{Mmap, MmapOptions};
use std::fs::File;

///
/// Random access to the bytes a `BlockReader` walks through.
///
pub(crate) trait Source {
    fn len(&self) -> u64;

    ///
    /// Bytes starting at `offset`, at least `min_len` of them unless
    /// the data ends first. Past the end an empty slice is returned.
    ///
    fn window(&mut self, offset: u64, min_len: usize) -> OpResult<&[u8]>;

    /// drop file handles, mappings and buffers
    fn release(&mut self);
}

struct Window {
    start: u64,
    map: Mmap,
}

impl Window {
    #[inline]
    fn covers(&self, start: u64, end: u64) -> bool {
        self.start <= start && end <= self.start + self.map.len() as u64
    }
}

///
/// A file mapped one bounded window at a time.
///
/// The window is replaced whenever a request runs past its end,
/// so memory use stays around `window_size` whatever the file size.
///
pub(crate) struct MappedFile {
    file: Option<File>,
    len: u64,
    window_size: usize,
    window: Option<Window>,
}

impl MappedFile {
    pub(crate) fn new(file: File, window_size: usize) -> OpResult<Self> {
        let len = file.metadata()?.len();
        Ok(MappedFile {
            file: Some(file),
            len,
            window_size,
            window: None,
        })
    }

    fn remap(&mut self, offset: u64, min_len: usize) -> OpResult<()> {
        // release the old mapping first
        self.window = None;
        let map_len = (self.window_size.max(min_len) as u64).min(self.len - offset) as usize;
        if let Some(file) = &self.file {
            debug!("mapping {} bytes at offset {}", map_len, offset);
            // the mapping is read only and owned by this struct
            let map = unsafe { MmapOptions::new().offset(offset).len(map_len).map(file)? };
            self.window = Some(Window { start: offset, map });
        }
        Ok(())
    }
}

impl Source for MappedFile {
    #[inline]
    fn len(&self) -> u64 {
        self.len
    }

    fn window(&mut self, offset: u64, min_len: usize) -> OpResult<&[u8]> {
        if offset >= self.len {
            return Ok(&[]);
        }
        let end = self.len.min(offset.saturating_add(min_len as u64));
        let covered = matches!(&self.window, Some(w) if w.covers(offset, end));
        if !covered {
            self.remap(offset, min_len)?;
        }
        match &self.window {
            Some(w) => Ok(&w.map[(offset - w.start) as usize..]),
            None => Ok(&[]),
        }
    }

    fn release(&mut self) {
        self.window = None;
        self.file = None;
    }
}

///
/// Data already held in memory.
///
pub(crate) struct InMemory {
    data: Vec<u8>,
}

impl InMemory {
    pub(crate) fn new(data: Vec<u8>) -> Self {
        InMemory { data }
    }
}

impl Source for InMemory {
    #[inline]
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn window(&mut self, offset: u64, _min_len: usize) -> OpResult<&[u8]> {
        Ok(self.data.get(offset as usize..).unwrap_or(&[]))
    }

    fn release(&mut self) {
        self.data = Vec::new();
    }
}
