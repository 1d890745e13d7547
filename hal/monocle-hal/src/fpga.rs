//! FPGA register bus abstractions
//!
//! The display controller exposes memory-mapped command registers. Every
//! transaction addresses one 16-bit register and carries at most
//! [`MAX_WRITE_LEN`] bytes; the device rejects anything larger.

/// Largest payload accepted by a single register write
pub const MAX_WRITE_LEN: usize = 255;

/// Largest response accepted by a single register read
pub const MAX_READ_LEN: usize = 255;

/// Errors from register bus transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Write payload exceeds [`MAX_WRITE_LEN`]
    PayloadTooLarge,
    /// Read length outside `1..=MAX_READ_LEN`
    InvalidLength,
    /// The underlying transport failed
    Transport,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BusError::PayloadTooLarge => write!(f, "payload exceeds {} bytes", MAX_WRITE_LEN),
            BusError::InvalidLength => write!(f, "read length must be 1..={}", MAX_READ_LEN),
            BusError::Transport => f.write_str("bus transport failure"),
        }
    }
}

/// Check a write payload against the device transfer limit
pub fn validate_write(payload: &[u8]) -> Result<(), BusError> {
    if payload.len() > MAX_WRITE_LEN {
        return Err(BusError::PayloadTooLarge);
    }
    Ok(())
}

/// Check a read buffer against the device transfer limits
pub fn validate_read(buf: &[u8]) -> Result<(), BusError> {
    if buf.is_empty() || buf.len() > MAX_READ_LEN {
        return Err(BusError::InvalidLength);
    }
    Ok(())
}

/// FPGA command register bus
///
/// Writes and reads are synchronous and blocking. Implementations are
/// expected to call [`validate_write`] / [`validate_read`] so that size
/// violations surface identically on every platform.
pub trait FpgaBus {
    /// Write `payload` to the register at `address`
    ///
    /// An empty payload is a valid strobe write.
    fn write(&mut self, address: u16, payload: &[u8]) -> Result<(), BusError>;

    /// Read `buf.len()` bytes from the register at `address`
    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), BusError>;

    /// Write a command buffer of any length to one register
    ///
    /// Command registers are streaming: a buffer longer than one transfer
    /// is sent as consecutive writes of at most [`MAX_WRITE_LEN`] bytes to
    /// the same address. An empty buffer is sent as a single empty write.
    fn write_all(&mut self, address: u16, payload: &[u8]) -> Result<(), BusError> {
        if payload.is_empty() {
            return self.write(address, payload);
        }
        for chunk in payload.chunks(MAX_WRITE_LEN) {
            self.write(address, chunk)?;
        }
        Ok(())
    }
}

impl<T: FpgaBus + ?Sized> FpgaBus for &mut T {
    fn write(&mut self, address: u16, payload: &[u8]) -> Result<(), BusError> {
        (**self).write(address, payload)
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), BusError> {
        (**self).read(address, buf)
    }
}
