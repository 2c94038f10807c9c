/// Owned file contents returned by `AtomicFile::read_fully`.
///
/// Released on drop. `into_vec`/`into_boxed_slice` hand the bytes across a boundary without copying.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferData {
    buffer: Vec<u8>,
}

impl BufferData {
    #[must_use]
    pub fn new(buffer: Vec<u8>) -> Self {
        Self { buffer }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }

    #[must_use]
    pub fn into_boxed_slice(self) -> Box<[u8]> {
        self.buffer.into_boxed_slice()
    }
}

impl AsRef<[u8]> for BufferData {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

impl From<BufferData> for Vec<u8> {
    fn from(b: BufferData) -> Self {
        b.buffer
    }
}
