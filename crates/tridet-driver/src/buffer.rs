//! Accelerator-visible buffers.
//!
//! The TD16 is a RoCC coprocessor: it shares the hart's address space and
//! performs coherent DMA through the core's page-table walker, so the
//! device-visible address of a buffer is simply its virtual address. What the
//! hardware does require is burst alignment ([`dma::INPUT_ALIGN`]) and
//! fixed-width transfers, which the raw allocation layer guarantees.
//!
//! On top of the raw block sit two typed views. [`VectorBuffer`] holds the
//! `i16` lanes of one staged vector and checks every lane index against the
//! matrix order; [`ResultBuffer`] holds the scalar the accelerator writes
//! back and reads it at the configured register width. Nothing outside this
//! module touches the allocation pointer.

use crate::error::{DriverError, Result};
use std::alloc::Layout;
use tridet_chip::dma::{self, ResultWidth};

/// Raw aligned allocation, zero-initialised, released on drop.
#[derive(Debug)]
struct DmaBlock {
    ptr: *mut u8,
    layout: Layout,
}

impl DmaBlock {
    fn new(size: usize, align: usize) -> Result<Self> {
        let layout = Layout::from_size_align(size, align)
            .map_err(|e| DriverError::buffer_allocation(format!("invalid layout: {e}")))?;

        // SAFETY: raw alloc_zeroed is required for burst-aligned DMA memory.
        // Invariants: (1) layout comes from from_size_align with size > 0;
        // (2) alloc_zeroed returns a pointer valid for layout.size() bytes or
        // null on OOM; (3) dealloc in Drop uses this same layout.
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        if ptr.is_null() {
            return Err(DriverError::buffer_allocation(format!(
                "allocator returned null for {size} bytes"
            )));
        }

        tracing::debug!("acquired DMA block: addr={ptr:p}, size={size}, align={align}");
        Ok(Self { ptr, layout })
    }

    fn as_slice(&self) -> &[u8] {
        // SAFETY: (1) ptr from alloc_zeroed in new(), valid for layout.size();
        // (2) we own the allocation; (3) &self forbids concurrent mutation.
        unsafe { std::slice::from_raw_parts(self.ptr, self.layout.size()) }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: (1) ptr valid for layout.size(); (2) &mut self gives
        // exclusive access, so no aliasing.
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.layout.size()) }
    }

    fn addr(&self) -> u64 {
        self.ptr as u64
    }
}

impl Drop for DmaBlock {
    fn drop(&mut self) {
        // SAFETY: ptr was returned by alloc_zeroed in new() with this exact
        // layout and has not been deallocated; no views outlive self.
        unsafe { std::alloc::dealloc(self.ptr, self.layout) };
        tracing::debug!("released DMA block at {:p}", self.ptr);
    }
}

// SAFETY: DmaBlock owns its allocation exclusively.
unsafe impl Send for DmaBlock {}

// SAFETY: writes require &mut self; shared reads of owned memory are safe.
unsafe impl Sync for DmaBlock {}

/// One staged input vector: `order` lanes of `i16`, burst-aligned.
///
/// Every lane access is checked against the matrix order, so a staging or
/// corruption-injection bug surfaces as [`DriverError::IndexOutOfBounds`]
/// instead of writing past the transfer window.
#[derive(Debug)]
pub struct VectorBuffer {
    block: DmaBlock,
    lanes: usize,
}

impl VectorBuffer {
    /// Allocate a zeroed buffer for one vector of the given matrix order.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidSystem`] for orders below the device
    /// minimum and [`DriverError::BufferAllocation`] when the allocator
    /// fails.
    pub fn new(order: usize) -> Result<Self> {
        if order < dma::MIN_ORDER {
            return Err(DriverError::invalid_system(format!(
                "order {order} below device minimum {}",
                dma::MIN_ORDER
            )));
        }
        let block = DmaBlock::new(dma::transfer_bytes(order), dma::INPUT_ALIGN)?;
        Ok(Self { block, lanes: order })
    }

    /// Number of lanes (the matrix order).
    pub const fn lanes(&self) -> usize {
        self.lanes
    }

    /// DMA footprint in bytes (order × lane width).
    pub const fn byte_len(&self) -> usize {
        self.lanes * dma::LANE_BYTES
    }

    /// Device-visible address of the first lane.
    pub fn addr(&self) -> u64 {
        self.block.addr()
    }

    /// Write one lane, checked against the order.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::IndexOutOfBounds`] when `index >= lanes`.
    pub fn set(&mut self, index: usize, value: i16) -> Result<()> {
        if index >= self.lanes {
            return Err(DriverError::IndexOutOfBounds {
                index,
                capacity: self.lanes,
            });
        }
        bytemuck::cast_slice_mut::<u8, i16>(self.block.as_mut_slice())[index] = value;
        Ok(())
    }

    /// Read one lane, checked against the order.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::IndexOutOfBounds`] when `index >= lanes`.
    pub fn get(&self, index: usize) -> Result<i16> {
        if index >= self.lanes {
            return Err(DriverError::IndexOutOfBounds {
                index,
                capacity: self.lanes,
            });
        }
        Ok(bytemuck::cast_slice::<u8, i16>(self.block.as_slice())[index])
    }

    /// All lanes in device order, exactly what one load command transfers.
    pub fn as_lanes(&self) -> &[i16] {
        bytemuck::cast_slice(self.block.as_slice())
    }
}

/// The scalar the accelerator writes back, at the configured register width.
#[derive(Debug)]
pub struct ResultBuffer {
    block: DmaBlock,
    width: ResultWidth,
}

impl ResultBuffer {
    /// Allocate a zeroed result register buffer.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::BufferAllocation`] when the allocator fails.
    pub fn new(width: ResultWidth) -> Result<Self> {
        let block = DmaBlock::new(width.bytes(), width.align())?;
        Ok(Self { block, width })
    }

    /// Register width this buffer was allocated for.
    pub const fn width(&self) -> ResultWidth {
        self.width
    }

    /// Device-visible address named in START_COMP.
    pub fn addr(&self) -> u64 {
        self.block.addr()
    }

    /// Read the register at its width and sign-extend to `i64`.
    ///
    /// The device writes little-endian, the byte order of every supported
    /// host.
    pub fn read(&self) -> i64 {
        let raw = self.block.as_slice();
        match self.width {
            ResultWidth::W32 => i64::from(bytemuck::pod_read_unaligned::<i32>(&raw[..4])),
            ResultWidth::W64 => bytemuck::pod_read_unaligned::<i64>(&raw[..8]),
        }
    }

    /// Write the register, truncating to the buffer's width.
    ///
    /// This is the coprocessor side of the contract: hardware writes through
    /// DMA, software implementations write through this method. The driver
    /// itself never writes the result region.
    #[allow(clippy::cast_possible_truncation)] // truncation is the register semantics
    pub fn write(&mut self, value: i64) {
        let raw = self.block.as_mut_slice();
        match self.width {
            ResultWidth::W32 => raw[..4].copy_from_slice(&(value as i32).to_le_bytes()),
            ResultWidth::W64 => raw[..8].copy_from_slice(&value.to_le_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_buffer_is_burst_aligned_and_zeroed() {
        let buf = VectorBuffer::new(16).unwrap();
        assert_eq!(buf.addr() % dma::INPUT_ALIGN as u64, 0);
        assert_eq!(buf.lanes(), 16);
        assert_eq!(buf.byte_len(), 32);
        assert!(buf.as_lanes().iter().all(|&l| l == 0));
    }

    #[test]
    fn lane_access_is_bounds_checked() {
        let mut buf = VectorBuffer::new(4).unwrap();
        buf.set(3, -7).unwrap();
        assert_eq!(buf.get(3).unwrap(), -7);

        let err = buf.set(4, 1).unwrap_err();
        assert!(matches!(
            err,
            DriverError::IndexOutOfBounds { index: 4, capacity: 4 }
        ));
        assert!(buf.get(4).is_err());
    }

    #[test]
    fn order_below_minimum_is_rejected() {
        assert!(VectorBuffer::new(0).is_err());
        assert!(VectorBuffer::new(1).is_err());
        assert!(VectorBuffer::new(2).is_ok());
    }

    #[test]
    fn result_buffer_round_trips_at_both_widths() {
        let mut r32 = ResultBuffer::new(ResultWidth::W32).unwrap();
        assert_eq!(r32.read(), 0, "zeroed on allocation");
        r32.write(-3216);
        assert_eq!(r32.read(), -3216);
        assert_eq!(r32.addr() % 4, 0);

        let mut r64 = ResultBuffer::new(ResultWidth::W64).unwrap();
        r64.write(56_874_039_553_217);
        assert_eq!(r64.read(), 56_874_039_553_217);
        assert_eq!(r64.addr() % 8, 0);
    }

    #[test]
    fn narrow_result_register_truncates() {
        // A 32-bit register keeps only the low word, sign-extended on read.
        let mut r32 = ResultBuffer::new(ResultWidth::W32).unwrap();
        r32.write(56_874_039_553_217);
        assert_eq!(r32.read(), 82_619_585);
    }
}
