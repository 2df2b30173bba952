//! Sweep controller: drives the servo, the vision gate, and the sinks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::{
    Detector, FrameSource, MeasurementRecord, MeasurementSink, RigError, ShutdownFlag, Sleeper,
};
use observability::{record_measurement_dispatched, record_reading, MetricsSummary, SweepMetricsAggregator};
use protocol::Message;
use tracing::{debug, info, warn};
use transport::{SerialLink, Session, TransportError};
use vision::{acquire_stable, GateConfig, RegionTracker, VisionError};

use crate::plan::SweepPlan;

/// Where the controller currently is in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPhase {
    /// No run in progress
    Idle,
    /// Driving the servo to the home position
    Homing,
    /// Walking the commanded range
    Stepping,
    /// Run finished, sinks flushed
    Done,
}

/// What a run produced
#[derive(Debug)]
pub struct SweepOutcome {
    /// Accepted measurements in sweep order
    pub records: Vec<MeasurementRecord>,
    /// Aggregated step statistics
    pub summary: MetricsSummary,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

/// Owns one measurement run end to end.
///
/// The loop is strictly sequential: one servo command, one settle, one
/// gate cycle, one dispatch, then the next step. A step whose move is
/// never acknowledged, or whose gate never stabilizes, is skipped; the
/// sweep itself only stops early on shutdown.
pub struct SweepController<L: SerialLink> {
    session: Session<L>,
    hardware_address: u8,
    plan: SweepPlan,
    settle: Duration,
    sweeps: u32,
    gate: GateConfig,
    tracker: RegionTracker,
    sleeper: Arc<dyn Sleeper>,
    shutdown: ShutdownFlag,
    phase: SweepPhase,
}

impl<L: SerialLink> SweepController<L> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: Session<L>,
        hardware_address: u8,
        plan: SweepPlan,
        settle: Duration,
        sweeps: u32,
        gate: GateConfig,
        tracker: RegionTracker,
        sleeper: Arc<dyn Sleeper>,
        shutdown: ShutdownFlag,
    ) -> Self {
        Self {
            session,
            hardware_address,
            plan,
            settle,
            sweeps,
            gate,
            tracker,
            sleeper,
            shutdown,
            phase: SweepPhase::Idle,
        }
    }

    /// Current run phase
    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    /// Run the configured number of sweeps.
    ///
    /// Sinks are flushed before returning, whether the run completed or
    /// was shut down early. Sink write failures are logged and counted
    /// but never abort the sweep; the bench keeps moving.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        detector: &dyn Detector,
        sinks: &mut [Box<dyn MeasurementSink>],
    ) -> Result<SweepOutcome, RigError> {
        let started = Instant::now();
        let mut records = Vec::new();
        let mut aggregator = SweepMetricsAggregator::new();

        'sweeps: for sweep_no in 1..=self.sweeps {
            info!(sweep = sweep_no, of = self.sweeps, "sweep starting");
            self.tracker.reset();

            self.phase = SweepPhase::Homing;
            if !self.home()? {
                break 'sweeps;
            }

            self.phase = SweepPhase::Stepping;
            let positions: Vec<u16> = self.plan.positions().collect();
            for angle in positions {
                if self.shutdown.is_requested() {
                    info!(angle, "shutdown requested, ending sweep early");
                    break 'sweeps;
                }
                match self.step(angle, source, detector, sinks, &mut aggregator)? {
                    StepOutcome::Recorded(record) => records.push(record),
                    StepOutcome::Skipped => {}
                    StepOutcome::Shutdown => break 'sweeps,
                }
            }
        }

        self.flush_sinks(sinks);
        self.tracker.reset();
        self.phase = SweepPhase::Done;

        let summary = aggregator.summary();
        info!(duration_ms = started.elapsed().as_millis() as u64, "sweep run finished\n{summary}");

        Ok(SweepOutcome {
            records,
            summary,
            duration: started.elapsed(),
        })
    }

    /// Drive the servo to the home position. Returns false on shutdown.
    fn home(&mut self) -> Result<bool, RigError> {
        let message = Message::RotateServo {
            hardware_address: self.hardware_address,
            angle: self.plan.home_angle,
        };
        match self.session.send_and_wait(&message) {
            Ok(_) => {
                debug!(angle = self.plan.home_angle, "homed");
                self.sleeper.sleep(self.settle);
                Ok(true)
            }
            Err(TransportError::AckTimeout) => {
                // proceed anyway: the first step re-commands the servo
                warn!(angle = self.plan.home_angle, "home move not acknowledged");
                self.sleeper.sleep(self.settle);
                Ok(true)
            }
            Err(TransportError::ShutdownRequested) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn step(
        &mut self,
        angle: u16,
        source: &mut dyn FrameSource,
        detector: &dyn Detector,
        sinks: &mut [Box<dyn MeasurementSink>],
        aggregator: &mut SweepMetricsAggregator,
    ) -> Result<StepOutcome, RigError> {
        let message = Message::RotateServo {
            hardware_address: self.hardware_address,
            angle,
        };
        match self.session.send_and_wait(&message) {
            Ok(_) => {}
            Err(TransportError::AckTimeout) => {
                warn!(angle, "move not acknowledged, skipping step");
                aggregator.record_skip(true);
                return Ok(StepOutcome::Skipped);
            }
            Err(TransportError::ShutdownRequested) => return Ok(StepOutcome::Shutdown),
            Err(err) => return Err(err.into()),
        }

        self.sleeper.sleep(self.settle);

        match acquire_stable(source, detector, &mut self.tracker, &self.gate) {
            Ok(reading) => {
                let record = MeasurementRecord {
                    position: reading.position,
                    commanded_index: angle,
                    attempts: reading.attempts,
                };
                record_reading(angle, record.position.x_mm, record.attempts);
                aggregator.record_reading(record.position.x_mm, record.attempts);
                self.dispatch(&record, sinks);
                Ok(StepOutcome::Recorded(record))
            }
            Err(VisionError::NoStableReading { attempts }) => {
                warn!(angle, attempts, "no stable reading, skipping step");
                aggregator.record_skip(false);
                Ok(StepOutcome::Skipped)
            }
        }
    }

    fn dispatch(&self, record: &MeasurementRecord, sinks: &mut [Box<dyn MeasurementSink>]) {
        for sink in sinks.iter_mut() {
            match sink.record(record) {
                Ok(()) => record_measurement_dispatched(sink.name(), true),
                Err(err) => {
                    warn!(sink = sink.name(), error = %err, "sink write failed");
                    record_measurement_dispatched(sink.name(), false);
                }
            }
        }
    }

    fn flush_sinks(&self, sinks: &mut [Box<dyn MeasurementSink>]) {
        for sink in sinks.iter_mut() {
            if let Err(err) = sink.flush() {
                warn!(sink = sink.name(), error = %err, "sink flush failed");
            }
        }
    }
}

enum StepOutcome {
    Recorded(MeasurementRecord),
    Skipped,
    Shutdown,
}
