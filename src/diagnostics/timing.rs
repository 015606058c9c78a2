use serde::Serialize;
use std::time::Instant;

/// Wall-clock time spent in one pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: &'static str,
    pub elapsed_ms: f64,
}

/// Ordered stage timings for one run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    /// Run `f`, record its duration under `label` and pass its value through.
    pub fn measure<T>(&mut self, label: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.stages.push(StageTiming { label, elapsed_ms });
        self.total_ms += elapsed_ms;
        value
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_records_stages_in_order() {
        let mut timings = TimingBreakdown::default();
        let v = timings.measure("load", || 2 + 2);
        timings.measure("segment", || ());
        assert_eq!(v, 4);
        let labels: Vec<_> = timings.stages.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["load", "segment"]);
        assert!(timings.get("load").is_some());
        assert!(timings.get("render").is_none());
    }
}
