//! Recording test doubles
//!
//! `RecordingBus` captures every register write in order so frame tests can
//! assert on exact byte streams; `RecordingDelay` accumulates requested
//! delays instead of sleeping.

use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::fpga::{validate_read, validate_write, BusError, FpgaBus};

/// One captured register write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    /// Register address
    pub address: u16,
    /// Bytes written
    pub payload: Vec<u8>,
}

/// Bus double that records writes and answers reads from a fixed register
#[derive(Debug, Default)]
pub struct RecordingBus {
    writes: Vec<Write>,
    read_address: u16,
    read_data: Vec<u8>,
    fail_after: Option<usize>,
}

impl RecordingBus {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer reads of `address` with `data` (zero-filled elsewhere)
    pub fn with_register(mut self, address: u16, data: &[u8]) -> Self {
        self.read_address = address;
        self.read_data = data.to_vec();
        self
    }

    /// Fail every write after the first `count` with [`BusError::Transport`]
    pub fn fail_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// All writes captured so far
    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    /// Concatenated payloads of every write to `address`
    pub fn stream(&self, address: u16) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|w| w.address == address)
            .flat_map(|w| w.payload.iter().copied())
            .collect()
    }

    /// Register addresses in write order
    pub fn addresses(&self) -> Vec<u16> {
        self.writes.iter().map(|w| w.address).collect()
    }

    /// Forget captured writes
    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl FpgaBus for RecordingBus {
    fn write(&mut self, address: u16, payload: &[u8]) -> Result<(), BusError> {
        validate_write(payload)?;
        if let Some(limit) = self.fail_after {
            if self.writes.len() >= limit {
                return Err(BusError::Transport);
            }
        }
        self.writes.push(Write {
            address,
            payload: payload.to_vec(),
        });
        Ok(())
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), BusError> {
        validate_read(buf)?;
        buf.fill(0);
        if address == self.read_address {
            let n = buf.len().min(self.read_data.len());
            buf[..n].copy_from_slice(&self.read_data[..n]);
        }
        Ok(())
    }
}

/// Delay double that sums requested nanoseconds
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordingDelay {
    /// Total requested delay
    pub total_ns: u64,
    /// Number of delay calls
    pub calls: u32,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }
}
