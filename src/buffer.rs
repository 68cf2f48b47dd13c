use bytes::Bytes;

use crate::helpers;

/// A read cursor over a fully buffered request body.
///
/// Every read hands out a [`Bytes`] slice of the same underlying buffer, so
/// carving parts out of the body never copies payload bytes.
#[derive(Debug)]
pub(crate) struct BodyBuffer {
    buf: Bytes,
    pos: usize,
}

impl BodyBuffer {
    pub fn new(buf: Bytes) -> Self {
        BodyBuffer { buf, pos: 0 }
    }

    /// Moves the cursor past the next occurrence of `pattern`. Returns `false`
    /// and leaves the cursor alone when the pattern doesn't occur.
    pub fn skip_past(&mut self, pattern: &[u8]) -> bool {
        match helpers::find_from(&self.buf, pattern, self.pos) {
            Some(idx) => {
                self.pos = idx + pattern.len();
                true
            }
            None => false,
        }
    }

    /// Returns the bytes up to the next occurrence of `pattern` and moves the
    /// cursor past the pattern.
    pub fn read_until(&mut self, pattern: &[u8]) -> Option<Bytes> {
        helpers::find_from(&self.buf, pattern, self.pos).map(|idx| {
            let bytes = self.buf.slice(self.pos..idx);
            self.pos = idx + pattern.len();
            bytes
        })
    }

    /// Like [`read_until`](BodyBuffer::read_until), but only accepts an
    /// occurrence of `pattern` that is followed by `suffix` or ends the buffer.
    /// The suffix itself is left unread.
    pub fn read_until_closing(&mut self, pattern: &[u8], suffix: &[u8]) -> Option<Bytes> {
        let mut from = self.pos;

        while let Some(idx) = helpers::find_from(&self.buf, pattern, from) {
            let end = idx + pattern.len();
            let tail = &self.buf[end..];

            if tail.is_empty() || tail.starts_with(suffix) {
                let bytes = self.buf.slice(self.pos..idx);
                self.pos = end;
                return Some(bytes);
            }

            from = idx + 1;
        }

        None
    }

    /// Returns everything after the cursor and moves the cursor to the end.
    pub fn read_to_end(&mut self) -> Bytes {
        let bytes = self.buf.slice(self.pos..);
        self.pos = self.buf.len();
        bytes
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_until() {
        let mut buffer = BodyBuffer::new(Bytes::from_static(b"one--two--three"));
        assert_eq!(buffer.read_until(b"--"), Some(Bytes::from_static(b"one")));
        assert_eq!(buffer.read_until(b"--"), Some(Bytes::from_static(b"two")));
        assert_eq!(buffer.read_until(b"--"), None);
        assert_eq!(buffer.remaining(), 5);
        assert_eq!(buffer.read_to_end(), Bytes::from_static(b"three"));
        assert_eq!(buffer.remaining(), 0);
        assert_eq!(buffer.read_to_end(), Bytes::new());
    }

    #[test]
    fn test_read_until_closing() {
        let mut buffer = BodyBuffer::new(Bytes::from_static(b"a--X--b\r\nc--X--\r\nepilogue"));
        assert_eq!(buffer.read_until_closing(b"--X--", b"\r\n"), Some(Bytes::from_static(b"a--X--b\r\nc")));
        assert_eq!(buffer.read_to_end(), Bytes::from_static(b"\r\nepilogue"));

        let mut buffer = BodyBuffer::new(Bytes::from_static(b"tail--X--"));
        assert_eq!(buffer.read_until_closing(b"--X--", b"\r\n"), Some(Bytes::from_static(b"tail")));

        let mut buffer = BodyBuffer::new(Bytes::from_static(b"x--X--y"));
        assert_eq!(buffer.read_until_closing(b"--X--", b"\r\n"), None);
        assert_eq!(buffer.remaining(), 7);
    }

    #[test]
    fn test_skip_past() {
        let mut buffer = BodyBuffer::new(Bytes::from_static(b"preamble\r\n--X\r\nbody"));
        assert!(!buffer.skip_past(b"--Y\r\n"));
        assert_eq!(buffer.remaining(), 19);
        assert!(buffer.skip_past(b"--X\r\n"));
        assert_eq!(buffer.read_to_end(), Bytes::from_static(b"body"));
    }

    #[test]
    fn test_reads_share_the_buffer() {
        let body = Bytes::from(b"abc|def".to_vec());
        let mut buffer = BodyBuffer::new(body.clone());
        let head = buffer.read_until(b"|").unwrap();
        assert_eq!(head.as_ptr(), body.as_ptr());
    }
}
