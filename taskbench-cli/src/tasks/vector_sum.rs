//! Sum of a vector of `i64`

use taskbench_core::{DataPacket, Task, TaskDef};

/// Sums its single input buffer into a one-element output
#[derive(Debug, Default)]
pub struct VectorSum {
    values: Vec<i64>,
    total: i64,
}

impl VectorSum {
    /// Packet with `size` values in `-8..=8`
    pub fn packet(size: usize) -> DataPacket {
        let values: Vec<i64> = (0..size as i64).map(|i| i % 17 - 8).collect();
        let mut packet = DataPacket::new();
        packet.push_input(&values).push_output::<i64>(1);
        packet
    }

    /// Whether the output holds the sum of the input
    pub fn check(packet: &DataPacket) -> bool {
        match (packet.input_as::<i64>(0), packet.output_as::<i64>(0)) {
            (Some(values), Some(output)) => output == [values.iter().sum::<i64>()],
            _ => false,
        }
    }
}

impl Task for VectorSum {
    fn name(&self) -> &str {
        "vector_sum"
    }

    fn validate(&self, packet: &DataPacket) -> bool {
        packet.is_well_formed()
            && packet.inputs.len() == 1
            && packet.inputs_count[0] > 0
            && packet.inputs[0].len() == packet.inputs_count[0] * std::mem::size_of::<i64>()
            && packet.outputs_count == [1]
    }

    fn prepare(&mut self, packet: &DataPacket) -> bool {
        self.total = 0;
        match packet.input_as::<i64>(0) {
            Some(values) => {
                self.values = values;
                true
            }
            None => false,
        }
    }

    fn execute(&mut self) -> bool {
        self.total = self.values.iter().sum();
        true
    }

    fn finalize(&mut self, packet: &mut DataPacket) -> bool {
        packet.write_output(0, &[self.total])
    }
}

inventory::submit! {
    TaskDef {
        id: "vector_sum",
        description: "sum of an i64 vector",
        make_packet: VectorSum::packet,
        make_task: || Box::new(VectorSum::default()),
        check: VectorSum::check,
    }
}
