use std::io::{self, Read};

/// Reports the cumulative number of bytes pulled through the wrapped reader.
pub struct ProgressReader<R, F> {
    inner: R,
    bytes_read: u64,
    on_progress: F,
}

impl<R, F> ProgressReader<R, F>
where
    R: Read,
    F: FnMut(u64),
{
    pub fn new(inner: R, on_progress: F) -> Self {
        Self {
            inner,
            bytes_read: 0,
            on_progress,
        }
    }

    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

impl<R, F> Read for ProgressReader<R, F>
where
    R: Read,
    F: FnMut(u64),
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        if read > 0 {
            self.bytes_read += read as u64;
            (self.on_progress)(self.bytes_read);
        }
        Ok(read)
    }
}
