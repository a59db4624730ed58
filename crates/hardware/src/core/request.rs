//! Generic single-beat request interface.
//!
//! A [`Request`] is what a bus adapter hands the controller: a read or a write of
//! one data word. It is immutable once accepted and held by the scheduler until
//! its command completes (write) or its response is delivered (read).

/// Direction of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Read one word.
    Read,
    /// Write one word under a byte enable.
    Write,
}

/// One single-beat access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    /// Read or write.
    pub kind: RequestKind,
    /// Flat word address: `{bank, row, column}`.
    pub address: u64,
    /// Data to write; ignored for reads.
    pub write_data: u64,
    /// Byte enable, one bit per byte lane; set means the lane is written.
    pub byte_enable: u8,
}

impl Request {
    /// A read of `address`.
    pub const fn read(address: u64) -> Self {
        Self {
            kind: RequestKind::Read,
            address,
            write_data: 0,
            byte_enable: 0,
        }
    }

    /// A write of `data` to `address` with the given byte enable.
    pub const fn write(address: u64, data: u64, byte_enable: u8) -> Self {
        Self {
            kind: RequestKind::Write,
            address,
            write_data: data,
            byte_enable,
        }
    }

    /// Returns `true` for writes.
    pub const fn is_write(&self) -> bool {
        matches!(self.kind, RequestKind::Write)
    }
}

/// Response channel for one cycle. No backpressure: the consumer always accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Response {
    /// Asserted one cycle before `valid`.
    pub early_valid: bool,
    /// Read data is presented this cycle.
    pub valid: bool,
    /// Read data; meaningful only while `valid`.
    pub data: u64,
}
