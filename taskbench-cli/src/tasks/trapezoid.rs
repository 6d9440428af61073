//! Trapezoid-rule integration of x² over an interval

use rayon::prelude::*;
use taskbench_core::{DataPacket, Task, TaskDef};

fn integrand(x: f64) -> f64 {
    x * x
}

/// Integrates x² over `[a, b]` with `n` panels, panels summed in parallel.
///
/// Inputs: `[a, b]` as `f64`, `[n]` as `u64`. Output: `[area]` as `f64`.
#[derive(Debug, Default)]
pub struct TrapezoidTask {
    a: f64,
    b: f64,
    panels: u64,
    area: f64,
}

impl TrapezoidTask {
    /// Packet integrating over `[0, 3]` with `size` panels
    pub fn packet(size: usize) -> DataPacket {
        let mut packet = DataPacket::new();
        packet
            .push_input(&[0.0f64, 3.0])
            .push_input(&[size as u64])
            .push_output::<f64>(1);
        packet
    }

    /// Whether the output is within the trapezoid rule's error bound of the exact area
    pub fn check(packet: &DataPacket) -> bool {
        let (Some(bounds), Some(n), Some(area)) = (
            packet.input_as::<f64>(0),
            packet.input_as::<u64>(1),
            packet.output_as::<f64>(0),
        ) else {
            return false;
        };
        let (a, b) = (bounds[0], bounds[1]);
        let h = (b - a) / n[0] as f64;
        let exact = (b.powi(3) - a.powi(3)) / 3.0;
        // |error| = (b - a) h² f''/12 with f'' = 2
        let bound = (b - a) * h * h / 6.0;
        (area[0] - exact).abs() <= bound + 1e-9 * exact.abs().max(1.0)
    }
}

impl Task for TrapezoidTask {
    fn name(&self) -> &str {
        "trapezoid"
    }

    fn validate(&self, packet: &DataPacket) -> bool {
        packet.is_well_formed()
            && packet.inputs_count == [2, 1]
            && packet.outputs_count == [1]
            && packet.input_as::<u64>(1).is_some_and(|n| n.len() == 1 && n[0] > 0)
            && packet
                .input_as::<f64>(0)
                .is_some_and(|ab| ab.len() == 2 && ab[0].is_finite() && ab[1].is_finite())
    }

    fn prepare(&mut self, packet: &DataPacket) -> bool {
        let (Some(bounds), Some(n)) = (packet.input_as::<f64>(0), packet.input_as::<u64>(1)) else {
            return false;
        };
        self.a = bounds[0];
        self.b = bounds[1];
        self.panels = n[0];
        self.area = 0.0;
        true
    }

    fn execute(&mut self) -> bool {
        let h = (self.b - self.a) / self.panels as f64;
        let a = self.a;
        let interior: f64 = (1..self.panels)
            .into_par_iter()
            .map(|i| integrand(a + i as f64 * h))
            .sum();
        self.area = h * ((integrand(self.a) + integrand(self.b)) / 2.0 + interior);
        self.area.is_finite()
    }

    fn finalize(&mut self, packet: &mut DataPacket) -> bool {
        packet.write_output(0, &[self.area])
    }
}

inventory::submit! {
    TaskDef {
        id: "trapezoid",
        description: "trapezoid integration of x^2 over [0, 3]",
        make_packet: TrapezoidTask::packet,
        make_task: || Box::new(TrapezoidTask::default()),
        check: TrapezoidTask::check,
    }
}
