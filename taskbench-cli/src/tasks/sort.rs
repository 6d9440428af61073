//! Ascending sort of `i32` values

use rand::prelude::*;
use taskbench_core::{DataPacket, Task, TaskDef};

const SEED: u64 = 0x2545_f491;

/// Sorts its input buffer into an output buffer of the same length
#[derive(Debug, Default)]
pub struct SortTask {
    values: Vec<i32>,
}

impl SortTask {
    /// Packet with `size` seeded random values
    pub fn packet(size: usize) -> DataPacket {
        let mut rng = StdRng::seed_from_u64(SEED);
        let values: Vec<i32> = (0..size).map(|_| rng.gen_range(-5_000..5_000)).collect();
        let mut packet = DataPacket::new();
        packet.push_input(&values).push_output::<i32>(size);
        packet
    }

    /// Whether the output is the sorted input
    pub fn check(packet: &DataPacket) -> bool {
        match (packet.input_as::<i32>(0), packet.output_as::<i32>(0)) {
            (Some(mut expected), Some(output)) => {
                expected.sort_unstable();
                output == expected
            }
            _ => false,
        }
    }
}

impl Task for SortTask {
    fn name(&self) -> &str {
        "sort"
    }

    fn validate(&self, packet: &DataPacket) -> bool {
        packet.is_well_formed()
            && packet.inputs.len() == 1
            && packet.outputs.len() == 1
            && packet.inputs_count[0] == packet.outputs_count[0]
            && packet.inputs[0].len() == packet.outputs[0].len()
    }

    fn prepare(&mut self, packet: &DataPacket) -> bool {
        match packet.input_as::<i32>(0) {
            Some(values) => {
                self.values = values;
                true
            }
            None => false,
        }
    }

    fn execute(&mut self) -> bool {
        self.values.sort_unstable();
        true
    }

    fn finalize(&mut self, packet: &mut DataPacket) -> bool {
        packet.write_output(0, &self.values)
    }
}

inventory::submit! {
    TaskDef {
        id: "sort",
        description: "ascending sort of i32 values",
        make_packet: SortTask::packet,
        make_task: || Box::new(SortTask::default()),
        check: SortTask::check,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskbench_core::BoundTask;

    #[test]
    fn test_cycle_sorts() {
        let mut packet = SortTask::packet(257);
        let mut task = BoundTask::new(SortTask::default(), &mut packet);
        assert!(task.run_cycle().unwrap());

        let output = task.packet().output_as::<i32>(0).unwrap();
        assert!(output.windows(2).all(|w| w[0] <= w[1]));
        assert!(SortTask::check(task.packet()));
    }

    #[test]
    fn test_packet_is_seeded() {
        let first = SortTask::packet(64).input_as::<i32>(0).unwrap();
        let second = SortTask::packet(64).input_as::<i32>(0).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|v| (-5_000..5_000).contains(v)));
        assert!(first.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_rejects_mismatched_output() {
        let mut packet = SortTask::packet(8);
        packet.outputs[0].truncate(4);
        assert!(!SortTask::default().validate(&packet));
    }
}
