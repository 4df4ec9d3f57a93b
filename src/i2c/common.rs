//! Shared types of the I2C client (slave-side) protocol engine.

/// Event delivered to the registered client handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferEvent {
    /// Our address was recognised; return `true` to accept the transaction.
    AddressMatch,
    /// The host is reading and the transmit register is empty; load the
    /// next byte with `write_byte`.
    TxReady,
    /// The host wrote a byte; drain it with `read_byte`.  The return value
    /// becomes the ACK/NACK for that byte.
    RxReady,
    /// Stop condition seen on the bus.
    StopBitReceived,
    /// A collision was latched; see [`ClientError`].
    Error,
}

/// Direction of the current transaction, from the host's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    /// Host writes, client receives.
    Write,
    /// Host reads, client transmits.
    Read,
}

impl TransferDirection {
    /// Direction encoded in bit 0 of an address byte.
    pub const fn from_address_byte(raw: u8) -> Self {
        if raw & 0x01 != 0 { Self::Read } else { Self::Write }
    }
}

/// Acknowledge value of the last byte handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckStatus {
    Ack,
    Nack,
}

/// Latched hardware fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientError {
    BusCollision,
    WriteCollision,
}

impl core::fmt::Display for ClientError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BusCollision => write!(f, "bus collision"),
            Self::WriteCollision => write!(f, "write collision"),
        }
    }
}

/// Where the engine is within a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolState {
    /// No transaction in progress.
    #[default]
    Idle,
    /// Our address matched; the handler is deciding.
    AddressPending,
    /// Accepted, host reads.
    Reading,
    /// Accepted, host writes.
    Writing,
    /// Transaction addressed elsewhere or declined; dropped until Stop.
    Ignoring,
    /// A collision aborted the transaction; dropped until Stop.
    Faulted,
}

/// Snapshot of the client status flags, sampled once per interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientStatus {
    /// Stop condition detected.
    pub stop: bool,
    /// The byte in the buffer is an address, not data.
    pub address_phase: bool,
    /// Read/not-write bit of the current transaction.
    pub host_reads: bool,
    /// Buffer holds a byte (received, or loaded and not yet shifted out).
    pub buffer_full: bool,
    /// The client's own acknowledge bit is set to NACK.
    pub nack_pending: bool,
}

impl ClientStatus {
    pub const fn direction(&self) -> TransferDirection {
        if self.host_reads {
            TransferDirection::Read
        } else {
            TransferDirection::Write
        }
    }
}
