use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use mirrorframe_capture::{
    AcquirerState, CaptureCadence, CaptureEngine, CaptureError, CaptureResult, CaptureStats,
    CaptureTarget, Frame, MirrorLoop, TickOutcome,
};

#[derive(Default)]
struct EngineLog {
    /// Frame widths to hand out; `None` is an empty capture. Runs dry as empty.
    captures: VecDeque<Option<u32>>,
    init_ok: bool,
    init_calls: u32,
    capture_calls: u32,
    released: u32,
}

struct ScriptedEngine {
    log: Rc<RefCell<EngineLog>>,
    target: CaptureTarget,
    state: AcquirerState,
    stats: CaptureStats,
}

impl CaptureEngine for ScriptedEngine {
    fn initialize(&mut self) -> CaptureResult<()> {
        let mut log = self.log.borrow_mut();
        log.init_calls += 1;
        if log.init_ok {
            self.state = AcquirerState::Ready;
            Ok(())
        } else {
            Err(CaptureError::TargetUnavailable("scripted".to_string()))
        }
    }

    fn capture_screen(&mut self) -> Option<Frame> {
        let mut frame = Frame::empty();
        self.capture_into(&mut frame).ok()?;
        Some(frame)
    }

    fn capture_into(&mut self, frame: &mut Frame) -> CaptureResult<()> {
        let mut log = self.log.borrow_mut();
        log.capture_calls += 1;
        match log.captures.pop_front().flatten() {
            Some(width) => {
                frame.width = width;
                frame.height = 1;
                frame.data = vec![0; width as usize * 3];
                self.stats.frames_captured += 1;
                Ok(())
            }
            None => {
                self.stats.empty_results += 1;
                Err(CaptureError::TargetLost)
            }
        }
    }

    fn state(&self) -> AcquirerState {
        self.state
    }

    fn target(&self) -> Option<&CaptureTarget> {
        Some(&self.target)
    }

    fn stats(&self) -> CaptureStats {
        self.stats
    }

    fn release(&mut self) {
        self.log.borrow_mut().released += 1;
        self.state = AcquirerState::Released;
    }
}

fn mirror(
    captures: &[Option<u32>],
    cadence: CaptureCadence,
) -> (MirrorLoop, Rc<RefCell<EngineLog>>) {
    let log = Rc::new(RefCell::new(EngineLog {
        captures: captures.iter().copied().collect(),
        init_ok: true,
        ..Default::default()
    }));
    let engine = ScriptedEngine {
        log: Rc::clone(&log),
        target: CaptureTarget::PrimaryDisplay,
        state: AcquirerState::Uninitialized,
        stats: CaptureStats::default(),
    };
    (MirrorLoop::new(Box::new(engine), cadence), log)
}

#[test]
fn only_every_nth_tick_captures() {
    let (mut mirror, log) = mirror(&[Some(1), Some(2), Some(3)], CaptureCadence::new(2, 10));
    mirror.start().unwrap();

    let outcomes: Vec<_> = (0..6).map(|_| mirror.tick()).collect();
    assert_eq!(
        outcomes,
        vec![
            TickOutcome::Skipped,
            TickOutcome::Captured,
            TickOutcome::Skipped,
            TickOutcome::Captured,
            TickOutcome::Skipped,
            TickOutcome::Captured,
        ]
    );
    assert_eq!(log.borrow().capture_calls, 3);
}

#[test]
fn latest_frame_survives_empty_captures() {
    let (mut mirror, _log) = mirror(&[Some(5), None, None], CaptureCadence::new(1, 10));
    assert!(mirror.latest_frame().is_none());

    assert_eq!(mirror.tick(), TickOutcome::Captured);
    assert_eq!(mirror.tick(), TickOutcome::Empty);
    assert_eq!(mirror.tick(), TickOutcome::Empty);

    let frame = mirror.latest_frame().unwrap();
    assert_eq!(frame.width, 5);
}

#[test]
fn empty_streak_triggers_reinitialize() {
    let (mut mirror, log) = mirror(&[], CaptureCadence::new(1, 3));
    mirror.start().unwrap();
    assert_eq!(log.borrow().init_calls, 1);

    assert_eq!(mirror.tick(), TickOutcome::Empty);
    assert_eq!(mirror.tick(), TickOutcome::Empty);
    assert_eq!(
        mirror.tick(),
        TickOutcome::Reinitialized { success: true }
    );
    assert_eq!(log.borrow().init_calls, 2);
    assert_eq!(mirror.reinit_attempts(), 1);

    // streak starts over after a re-initialize
    assert_eq!(mirror.tick(), TickOutcome::Empty);
}

#[test]
fn failed_start_is_retried_on_cadence() {
    let (mut mirror, log) = mirror(&[], CaptureCadence::new(1, 2));
    log.borrow_mut().init_ok = false;

    assert!(mirror.start().is_err());
    assert_eq!(mirror.tick(), TickOutcome::Empty);
    assert_eq!(
        mirror.tick(),
        TickOutcome::Reinitialized { success: false }
    );

    log.borrow_mut().init_ok = true;
    log.borrow_mut().captures.extend([None, Some(9)]);
    assert_eq!(mirror.tick(), TickOutcome::Empty);
    assert_eq!(mirror.tick(), TickOutcome::Captured);
    assert_eq!(mirror.latest_frame().map(|f| f.width), Some(9));
    assert_eq!(log.borrow().init_calls, 2);
}

#[test]
fn shutdown_releases_engine() {
    let (mut mirror, log) = mirror(&[Some(1)], CaptureCadence::default());
    mirror.start().unwrap();
    mirror.shutdown();

    assert_eq!(log.borrow().released, 1);
    assert_eq!(mirror.engine().state(), AcquirerState::Released);
}
