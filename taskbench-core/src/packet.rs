//! Data Packet
//!
//! Untyped byte buffers exchanged between caller and task. Each buffer is
//! paired with an element count at the same index. The packet does not check
//! that pairing itself; a task's `validate` decides what shape it accepts.

use bytemuck::Pod;

/// Input and output buffers with parallel element counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataPacket {
    /// Input buffers, filled by the caller before validation
    pub inputs: Vec<Vec<u8>>,
    /// Element count of each input buffer
    pub inputs_count: Vec<usize>,
    /// Output buffers, read by the caller after finalization
    pub outputs: Vec<Vec<u8>>,
    /// Element count of each output buffer
    pub outputs_count: Vec<usize>,
}

impl DataPacket {
    /// Create an empty packet
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an input buffer holding a copy of `data`
    pub fn push_input<T: Pod>(&mut self, data: &[T]) -> &mut Self {
        self.inputs.push(bytemuck::cast_slice(data).to_vec());
        self.inputs_count.push(data.len());
        self
    }

    /// Append a zeroed output buffer sized for `count` elements of `T`
    pub fn push_output<T: Pod>(&mut self, count: usize) -> &mut Self {
        self.outputs.push(vec![0u8; count * std::mem::size_of::<T>()]);
        self.outputs_count.push(count);
        self
    }

    /// Whether every buffer has a count and vice versa
    pub fn is_well_formed(&self) -> bool {
        self.inputs.len() == self.inputs_count.len()
            && self.outputs.len() == self.outputs_count.len()
    }

    /// Copy input `index` out as elements of `T`.
    ///
    /// Returns `None` if the buffer does not exist or its length is not a
    /// whole number of `T`.
    pub fn input_as<T: Pod>(&self, index: usize) -> Option<Vec<T>> {
        decode(self.inputs.get(index)?)
    }

    /// Copy output `index` out as elements of `T`
    pub fn output_as<T: Pod>(&self, index: usize) -> Option<Vec<T>> {
        decode(self.outputs.get(index)?)
    }

    /// Overwrite output `index` with `data`.
    ///
    /// Returns `false` if the buffer does not exist or has a different byte length.
    pub fn write_output<T: Pod>(&mut self, index: usize, data: &[T]) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        match self.outputs.get_mut(index) {
            Some(buffer) if buffer.len() == bytes.len() => {
                buffer.copy_from_slice(bytes);
                true
            }
            _ => false,
        }
    }
}

fn decode<T: Pod>(bytes: &[u8]) -> Option<Vec<T>> {
    let size = std::mem::size_of::<T>();
    if size == 0 || bytes.len() % size != 0 {
        return None;
    }
    Some(bytemuck::pod_collect_to_vec(bytes))
}
