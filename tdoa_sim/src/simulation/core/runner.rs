// tdoa_sim/src/simulation/core/runner.rs

//! Drives one simulated run.
//!
//! A producer thread plays the two external collaborators, the fixed-cadence
//! predict scheduler and the ranging transport, and merges their events by
//! timestamp into a bounded queue. A single worker thread owns the filter and
//! drains the queue, so every `predict`/`update` is serialized through it.

use std::collections::BTreeMap;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread;

use tracing::{debug, info, trace, warn};

use tdoa_core::prelude::{FilterInput, FilterStats, StateEstimator, TdoaEkf};
use tdoa_core::types::Position;

use crate::error::SimError;
use crate::simulation::core::config::ScenarioConfig;
use crate::simulation::core::prng::SimulationRng;
use crate::simulation::sensors::tdoa::TdoaSensor;
use crate::simulation::trajectory::WaypointTrajectory;

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Inputs the producer put on the queue.
    pub inputs_sent: u64,
    pub stats: FilterStats,
    /// Refused updates, by `FilterError::kind`.
    pub rejections: BTreeMap<&'static str, u64>,
    pub final_estimate: Position,
    pub final_truth: Position,
    /// Horizontal (x-y) error of the final estimate.
    pub final_horizontal_error: f64,
    /// RMS horizontal error over every accepted update.
    pub rms_horizontal_error: f64,
}

/// Runs `config` to completion and reports how well the filter tracked the truth.
pub fn run_scenario(config: &ScenarioConfig) -> Result<RunReport, SimError> {
    config.validate()?;

    let filter = TdoaEkf::from_config(&config.filter)?;
    let sensor = TdoaSensor::new(&config.sensor, filter.anchors())?;
    let trajectory = WaypointTrajectory::from_config(&config.trajectory);
    let rng = SimulationRng::new(config.simulation.seed);

    info!(
        duration = config.simulation.duration_seconds,
        predict_rate_hz = config.simulation.predict_rate_hz,
        sensor_rate_hz = config.sensor.rate_hz,
        seed = ?config.simulation.seed,
        "starting TDOA simulation"
    );

    let (tx, rx) = sync_channel::<FilterInput>(config.simulation.queue_capacity);
    let schedule = Schedule {
        duration: config.simulation.duration_seconds,
        predict_period: 1.0 / config.simulation.predict_rate_hz,
    };

    let (inputs_sent, worker_result) = thread::scope(|scope| {
        let trajectory = &trajectory;

        let producer = thread::Builder::new()
            .name("producer".into())
            .spawn_scoped(scope, move || produce(schedule, sensor, trajectory, rng, tx))
            .map_err(|_| SimError::Worker("producer"))?;
        let worker = thread::Builder::new()
            .name("filter".into())
            .spawn_scoped(scope, move || consume(filter, trajectory, rx))
            .map_err(|_| SimError::Worker("filter"))?;

        let inputs_sent = producer
            .join()
            .map_err(|_| SimError::Worker("producer"))??;
        let worker_result = worker.join().map_err(|_| SimError::Worker("filter"))?;
        Ok::<_, SimError>((inputs_sent, worker_result))
    })?;

    let report = RunReport {
        inputs_sent,
        ..worker_result
    };
    info!(
        predictions = report.stats.predictions,
        updates = report.stats.updates,
        rejected = report.stats.rejected_updates,
        final_error = report.final_horizontal_error,
        rms_error = report.rms_horizontal_error,
        "simulation finished"
    );
    Ok(report)
}

#[derive(Debug, Clone, Copy)]
struct Schedule {
    duration: f64,
    predict_period: f64,
}

/// Emits predict ticks and sensor samples in timestamp order until `duration`.
fn produce(
    schedule: Schedule,
    mut sensor: TdoaSensor,
    trajectory: &WaypointTrajectory,
    mut rng: SimulationRng,
    tx: SyncSender<FilterInput>,
) -> Result<u64, SimError> {
    let mut sent = 0u64;
    let mut tick = 1u64;

    loop {
        let next_predict = tick as f64 * schedule.predict_period;
        let next_sample = sensor.next_sample_time();

        let input = if next_predict <= next_sample {
            if next_predict > schedule.duration {
                break;
            }
            tick += 1;
            FilterInput::TimeStep {
                current_time: next_predict,
            }
        } else {
            if next_sample > schedule.duration {
                break;
            }
            let truth = trajectory.position_at(next_sample);
            FilterInput::Measurement(sensor.sample(&truth, &mut rng))
        };

        // Blocks while the queue is full; fails only if the worker is gone.
        tx.send(input).map_err(|_| SimError::Worker("filter"))?;
        sent += 1;
    }

    debug!(sent, "producer finished");
    Ok(sent)
}

/// Owns the filter for the whole run and applies inputs one at a time.
fn consume(
    mut filter: TdoaEkf,
    trajectory: &WaypointTrajectory,
    rx: Receiver<FilterInput>,
) -> RunReport {
    let mut rejections = BTreeMap::new();
    let mut squared_error_sum = 0.0;
    let mut scored = 0u64;
    let mut last_time = 0.0;

    for input in rx {
        last_time = input.timestamp();
        match filter.process(&input) {
            Ok(Some(report)) => {
                let truth = trajectory.position_at(last_time);
                let error = horizontal_distance(&filter.position(), &truth);
                squared_error_sum += error * error;
                scored += 1;
                trace!(
                    t = last_time,
                    innovation = report.innovation,
                    nis = report.normalized_innovation(),
                    error,
                    "update applied"
                );
            }
            Ok(None) => {}
            Err(err) => {
                if !err.is_measurement_rejection() {
                    warn!(t = last_time, %err, "filter refused input");
                }
                *rejections.entry(err.kind()).or_insert(0) += 1;
            }
        }
    }

    let final_truth = trajectory.position_at(last_time);
    let final_estimate = filter.position();
    RunReport {
        inputs_sent: 0,
        stats: filter.stats(),
        rejections,
        final_estimate,
        final_truth,
        final_horizontal_error: horizontal_distance(&final_estimate, &final_truth),
        rms_horizontal_error: if scored > 0 {
            (squared_error_sum / scored as f64).sqrt()
        } else {
            0.0
        },
    }
}

fn horizontal_distance(a: &Position, b: &Position) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
