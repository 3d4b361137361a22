// Gesture lifecycle: idle -> pending -> tracking -> releasing -> idle.
//
// The machine never talks to the host directly. Each transition returns at
// most one `Command` which the controller carries out.

use crate::config::ZoomConfig;
use crate::geometry::{contains_point, next_overlay_frame};
use crate::model::{
    BoundingBox, GestureSnapshot, OverlayLayout, PhaseKind, PinchSample, TouchPair, TouchPoint,
};

/// Identifies one bounds query; resolutions carrying an older ticket are stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundsTicket(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Measure the tracked view and report back with the same ticket.
    RequestBounds(BoundsTicket),
    /// Call `frame` once after the delay.
    ScheduleFrame { delay_ms: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartDecision {
    /// Whether the gesture owns the touch stream after this event.
    pub claimed: bool,
    pub command: Option<Command>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ReleaseStage {
    Shrinking { step: u32 },
    /// Modal hidden; the overlay unmounts on the next frame.
    Hiding,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ReleaseAnimation {
    /// Per-step decrement of (x, y, w, h).
    delta: BoundingBox,
    /// Step count and cadence fixed when the release starts.
    frames: u32,
    interval_ms: u32,
    stage: ReleaseStage,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Pending {
        ticket: BoundsTicket,
        touches: TouchPair,
    },
    Tracking {
        layout: OverlayLayout,
        pinch: PinchSample,
    },
    Releasing {
        layout: OverlayLayout,
        animation: ReleaseAnimation,
    },
}

#[derive(Debug)]
pub struct GestureMachine {
    config: ZoomConfig,
    phase: Phase,
    show_modal: Option<bool>,
    next_ticket: u64,
}

pub fn touch_pair(touches: &[TouchPoint]) -> Option<TouchPair> {
    match touches {
        [a, b] => Some([*a, *b]),
        _ => None,
    }
}

impl GestureMachine {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            config: config.sanitized(),
            phase: Phase::Idle,
            show_modal: None,
            next_ticket: 0,
        }
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Takes effect from the next gesture step. A running release keeps the
    /// step count and cadence it started with.
    pub fn set_config(&mut self, config: ZoomConfig) {
        self.config = config.sanitized();
    }

    pub fn phase(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::Pending { .. } => PhaseKind::Pending,
            Phase::Tracking { .. } => PhaseKind::Tracking,
            Phase::Releasing { .. } => PhaseKind::Releasing,
        }
    }

    pub fn layout(&self) -> Option<OverlayLayout> {
        match self.phase {
            Phase::Tracking { layout, .. } | Phase::Releasing { layout, .. } => Some(layout),
            Phase::Idle | Phase::Pending { .. } => None,
        }
    }

    pub fn snapshot(&self) -> GestureSnapshot {
        GestureSnapshot {
            phase: self.phase(),
            layout: self.layout(),
            show_modal: self.show_modal,
        }
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) -> StartDecision {
        match self.phase {
            Phase::Idle => {}
            Phase::Pending { .. } | Phase::Tracking { .. } => {
                return StartDecision {
                    claimed: true,
                    command: None,
                };
            }
            Phase::Releasing { .. } => {
                log::debug!("start ignored while release animation runs");
                return StartDecision {
                    claimed: false,
                    command: None,
                };
            }
        }
        let Some(touches) = touch_pair(touches) else {
            return StartDecision {
                claimed: false,
                command: None,
            };
        };
        self.next_ticket = self.next_ticket.wrapping_add(1);
        let ticket = BoundsTicket(self.next_ticket);
        self.phase = Phase::Pending { ticket, touches };
        log::debug!("two-finger start, measuring view (ticket {})", ticket.0);
        StartDecision {
            claimed: true,
            command: Some(Command::RequestBounds(ticket)),
        }
    }

    /// Commits the pending activation if the resolution is still current.
    /// Returns whether tracking began.
    pub fn bounds_resolved(
        &mut self,
        ticket: BoundsTicket,
        frame: BoundingBox,
        active_touches: usize,
    ) -> bool {
        let Phase::Pending {
            ticket: expected,
            touches,
        } = self.phase
        else {
            log::debug!("dropping bounds for ticket {}: no pending start", ticket.0);
            return false;
        };
        if expected != ticket {
            log::debug!("dropping stale bounds for ticket {}", ticket.0);
            return false;
        }
        if active_touches != 2 {
            log::debug!("bounds arrived with {active_touches} touches active, not activating");
            self.phase = Phase::Idle;
            return false;
        }
        if !contains_point(&frame, &touches[1]) {
            log::debug!("second touch outside {frame:?}, not activating");
            self.phase = Phase::Idle;
            return false;
        }
        self.phase = Phase::Tracking {
            layout: OverlayLayout::at_rest(frame),
            pinch: PinchSample::seeded(touches),
        };
        self.show_modal = Some(true);
        log::debug!("tracking started at {frame:?}");
        true
    }

    /// The bounds query could not be issued or answered.
    pub fn bounds_failed(&mut self, ticket: BoundsTicket) {
        if let Phase::Pending { ticket: expected, .. } = self.phase
            && expected == ticket
        {
            self.phase = Phase::Idle;
        }
    }

    /// Returns whether the overlay frame changed.
    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> bool {
        let Phase::Tracking { layout, pinch } = &mut self.phase else {
            return false;
        };
        let Some(touches) = touch_pair(touches) else {
            return false;
        };
        layout.current = next_overlay_frame(&pinch.current, &touches, layout, &self.config);
        *pinch = pinch.roll(touches);
        true
    }

    /// Shared by touch end, termination and rejection.
    pub fn release(&mut self) -> Option<Command> {
        match self.phase {
            Phase::Idle | Phase::Releasing { .. } => None,
            Phase::Pending { ticket, .. } => {
                log::debug!("gesture ended before bounds arrived (ticket {})", ticket.0);
                self.phase = Phase::Idle;
                None
            }
            Phase::Tracking { layout, .. } => {
                let frames = self.config.release_frames;
                let steps = f64::from(frames);
                let OverlayLayout { initial, current } = layout;
                let delta = BoundingBox {
                    x: (current.x - initial.x) / steps,
                    y: (current.y - initial.y) / steps,
                    w: (current.w - initial.w) / steps,
                    h: (current.h - initial.h) / steps,
                };
                log::debug!("release from {current:?}");
                self.phase = Phase::Releasing {
                    layout,
                    animation: ReleaseAnimation {
                        delta,
                        frames,
                        interval_ms: self.config.frame_interval_ms,
                        stage: ReleaseStage::Shrinking { step: 0 },
                    },
                };
                self.advance_release()
            }
        }
    }

    /// One tick of the release timer. Ticks outside a release are ignored.
    pub fn frame(&mut self) -> Option<Command> {
        self.advance_release()
    }

    /// Drops straight to idle, used when the host cannot run the animation.
    pub fn finish_release(&mut self) {
        if matches!(self.phase, Phase::Releasing { .. }) {
            self.phase = Phase::Idle;
            self.show_modal = Some(false);
        }
    }

    /// The gesture keeps the touch stream for as long as it is active.
    pub fn allows_termination(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    fn advance_release(&mut self) -> Option<Command> {
        let Phase::Releasing { layout, animation } = &mut self.phase else {
            return None;
        };
        let frames = animation.frames;
        let schedule = Some(Command::ScheduleFrame {
            delay_ms: animation.interval_ms,
        });
        let stage = animation.stage;
        match stage {
            ReleaseStage::Shrinking { step } => {
                let step = step + 1;
                if layout.current.w > layout.initial.w && step <= frames {
                    if step == frames {
                        layout.current = layout.initial;
                    } else {
                        let d = animation.delta;
                        layout.current.x -= d.x;
                        layout.current.y -= d.y;
                        layout.current.w -= d.w;
                        layout.current.h -= d.h;
                    }
                    animation.stage = ReleaseStage::Shrinking { step };
                } else {
                    animation.stage = ReleaseStage::Hiding;
                    self.show_modal = Some(false);
                }
                schedule
            }
            ReleaseStage::Hiding => {
                self.phase = Phase::Idle;
                self.show_modal = Some(false);
                log::debug!("release finished");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(ax: f64, ay: f64, bx: f64, by: f64) -> [TouchPoint; 2] {
        [TouchPoint::at(ax, ay), TouchPoint::at(bx, by)]
    }

    fn frame() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 300.0, 200.0)
    }

    fn tracking_machine(touches: [TouchPoint; 2]) -> GestureMachine {
        let mut m = GestureMachine::new(ZoomConfig::default());
        let decision = m.touch_start(&touches);
        let Some(Command::RequestBounds(ticket)) = decision.command else {
            panic!("expected a bounds request, got {decision:?}");
        };
        assert!(m.bounds_resolved(ticket, frame(), 2));
        m
    }

    #[test]
    fn single_touch_does_not_claim() {
        let mut m = GestureMachine::new(ZoomConfig::default());
        let d = m.touch_start(&[TouchPoint::at(10.0, 10.0)]);
        assert!(!d.claimed);
        assert_eq!(d.command, None);
        assert_eq!(m.phase(), PhaseKind::Idle);
    }

    #[test]
    fn activation_seeds_layout_and_modal() {
        let m = tracking_machine(pair(100.0, 100.0, 200.0, 100.0));
        let snap = m.snapshot();
        assert_eq!(snap.phase, PhaseKind::Tracking);
        assert_eq!(snap.layout, Some(OverlayLayout::at_rest(frame())));
        assert_eq!(snap.show_modal, Some(true));
    }

    #[test]
    fn second_touch_outside_box_never_tracks() {
        let mut m = GestureMachine::new(ZoomConfig::default());
        let d = m.touch_start(&pair(100.0, 100.0, 400.0, 100.0));
        let Some(Command::RequestBounds(ticket)) = d.command else {
            panic!("expected request");
        };
        assert!(!m.bounds_resolved(ticket, frame(), 2));
        assert_eq!(m.phase(), PhaseKind::Idle);
        assert_eq!(m.snapshot().show_modal, None);
    }

    #[test]
    fn resolution_after_fingers_lifted_is_dropped() {
        let mut m = GestureMachine::new(ZoomConfig::default());
        let d = m.touch_start(&pair(100.0, 100.0, 200.0, 100.0));
        let Some(Command::RequestBounds(ticket)) = d.command else {
            panic!("expected request");
        };
        assert_eq!(m.release(), None);
        assert!(!m.bounds_resolved(ticket, frame(), 0));
        assert_eq!(m.snapshot(), GestureSnapshot::default());
    }

    #[test]
    fn resolution_with_wrong_touch_count_is_dropped() {
        let mut m = GestureMachine::new(ZoomConfig::default());
        let d = m.touch_start(&pair(100.0, 100.0, 200.0, 100.0));
        let Some(Command::RequestBounds(ticket)) = d.command else {
            panic!("expected request");
        };
        assert!(!m.bounds_resolved(ticket, frame(), 3));
        assert_eq!(m.phase(), PhaseKind::Idle);
    }

    #[test]
    fn older_ticket_does_not_commit_newer_gesture() {
        let mut m = GestureMachine::new(ZoomConfig::default());
        let first = m.touch_start(&pair(100.0, 100.0, 200.0, 100.0));
        m.release();
        let second = m.touch_start(&pair(100.0, 100.0, 200.0, 100.0));
        let (Some(Command::RequestBounds(old)), Some(Command::RequestBounds(new))) =
            (first.command, second.command)
        else {
            panic!("expected two requests");
        };
        assert_ne!(old, new);
        assert!(!m.bounds_resolved(old, frame(), 2));
        assert_eq!(m.phase(), PhaseKind::Pending);
        assert!(m.bounds_resolved(new, frame(), 2));
    }

    #[test]
    fn moves_are_ignored_until_tracking() {
        let mut m = GestureMachine::new(ZoomConfig::default());
        m.touch_start(&pair(100.0, 100.0, 200.0, 100.0));
        assert!(!m.touch_move(&pair(100.0, 100.0, 300.0, 100.0)));
        assert_eq!(m.layout(), None);
    }

    #[test]
    fn move_with_three_touches_is_ignored() {
        let mut m = tracking_machine(pair(100.0, 100.0, 200.0, 100.0));
        let three = [
            TouchPoint::at(0.0, 0.0),
            TouchPoint::at(1.0, 1.0),
            TouchPoint::at(2.0, 2.0),
        ];
        assert!(!m.touch_move(&three));
        assert_eq!(m.layout().map(|l| l.current), Some(frame()));
    }

    #[test]
    fn widening_gap_grows_overlay() {
        // 100px gap widened to 150px: dw = 150 on a 300 wide box.
        let mut m = tracking_machine(pair(100.0, 100.0, 200.0, 100.0));
        assert!(m.touch_move(&pair(100.0, 100.0, 250.0, 100.0)));
        let current = m.layout().map(|l| l.current);
        assert_eq!(current, Some(BoundingBox::new(-75.0, -50.0, 450.0, 300.0)));
    }

    #[test]
    fn huge_spread_is_rejected_at_ceiling() {
        let mut m = tracking_machine(pair(100.0, 100.0, 200.0, 100.0));
        // 700px spread change would push width to 2400, past 7 * 300.
        assert!(m.touch_move(&pair(100.0, 100.0, 900.0, 100.0)));
        let layout = m.layout().unwrap();
        assert_eq!(layout.current.w, 300.0);
    }

    #[test]
    fn pinch_sample_rolls_between_moves() {
        let mut m = tracking_machine(pair(100.0, 100.0, 200.0, 100.0));
        m.touch_move(&pair(100.0, 100.0, 250.0, 100.0));
        // Same spread again: no further growth, deltas are incremental.
        m.touch_move(&pair(100.0, 100.0, 250.0, 100.0));
        assert_eq!(m.layout().unwrap().current.w, 450.0);
    }

    #[test]
    fn release_animation_walks_back_in_six_steps() {
        let mut m = GestureMachine::new(ZoomConfig::default());
        m.phase = Phase::Tracking {
            layout: OverlayLayout {
                initial: BoundingBox::new(0.0, 0.0, 300.0, 200.0),
                current: BoundingBox::new(0.0, 0.0, 600.0, 400.0),
            },
            pinch: PinchSample::seeded(pair(0.0, 0.0, 1.0, 1.0)),
        };
        m.show_modal = Some(true);

        let schedule = Some(Command::ScheduleFrame { delay_ms: 17 });
        assert_eq!(m.release(), schedule);
        let mut widths = vec![m.layout().unwrap().current.w];
        for _ in 0..5 {
            assert_eq!(m.frame(), schedule);
            widths.push(m.layout().unwrap().current.w);
        }
        assert_eq!(widths, vec![550.0, 500.0, 450.0, 400.0, 350.0, 300.0]);
        assert_eq!(m.snapshot().show_modal, Some(true));

        // Loop stops: modal hides, overlay stays mounted one more frame.
        assert_eq!(m.frame(), schedule);
        assert_eq!(m.phase(), PhaseKind::Releasing);
        assert_eq!(m.snapshot().show_modal, Some(false));
        assert_eq!(m.layout().unwrap().current, m.layout().unwrap().initial);

        assert_eq!(m.frame(), None);
        assert_eq!(m.phase(), PhaseKind::Idle);
        assert_eq!(m.layout(), None);
        assert_eq!(m.snapshot().show_modal, Some(false));
    }

    #[test]
    fn config_change_mid_release_keeps_original_cadence() {
        let mut m = GestureMachine::new(ZoomConfig::default());
        m.phase = Phase::Tracking {
            layout: OverlayLayout {
                initial: BoundingBox::new(0.0, 0.0, 300.0, 200.0),
                current: BoundingBox::new(0.0, 0.0, 600.0, 400.0),
            },
            pinch: PinchSample::seeded(pair(0.0, 0.0, 1.0, 1.0)),
        };
        m.show_modal = Some(true);

        m.release();
        m.frame();
        assert_eq!(m.layout().unwrap().current.w, 500.0);
        m.set_config(ZoomConfig {
            release_frames: 2,
            frame_interval_ms: 40,
            ..ZoomConfig::default()
        });

        let mut shrink_frames = 0;
        while m.snapshot().modal_visible() {
            assert_eq!(m.frame(), Some(Command::ScheduleFrame { delay_ms: 17 }));
            shrink_frames += 1;
            assert!(shrink_frames < 16, "release never hid the modal");
        }
        // Four more shrink steps, then the step that hides the modal.
        assert_eq!(shrink_frames, 5);
        let layout = m.layout().unwrap();
        assert_eq!(layout.current, layout.initial);
        assert_eq!(m.frame(), None);
        assert_eq!(m.phase(), PhaseKind::Idle);
    }

    #[test]
    fn release_without_zoom_hides_immediately() {
        let mut m = tracking_machine(pair(100.0, 100.0, 200.0, 100.0));
        assert!(m.release().is_some());
        assert_eq!(m.snapshot().show_modal, Some(false));
        assert_eq!(m.phase(), PhaseKind::Releasing);
        assert_eq!(m.frame(), None);
        assert_eq!(m.phase(), PhaseKind::Idle);
    }

    #[test]
    fn release_is_not_reentrant() {
        let mut m = tracking_machine(pair(100.0, 100.0, 200.0, 100.0));
        m.touch_move(&pair(100.0, 100.0, 250.0, 100.0));
        assert!(m.release().is_some());
        let before = m.snapshot();
        assert_eq!(m.release(), None);
        assert_eq!(m.snapshot(), before);
    }

    #[test]
    fn no_activation_or_moves_during_release() {
        let mut m = tracking_machine(pair(100.0, 100.0, 200.0, 100.0));
        m.touch_move(&pair(100.0, 100.0, 250.0, 100.0));
        m.release();
        let before = m.snapshot();
        assert!(!m.touch_start(&pair(100.0, 100.0, 200.0, 100.0)).claimed);
        assert!(!m.touch_move(&pair(0.0, 0.0, 500.0, 0.0)));
        assert_eq!(m.snapshot(), before);
    }

    #[test]
    fn stray_frames_outside_release_do_nothing() {
        let mut m = GestureMachine::new(ZoomConfig::default());
        assert_eq!(m.frame(), None);
        let mut m = tracking_machine(pair(100.0, 100.0, 200.0, 100.0));
        assert_eq!(m.frame(), None);
        assert_eq!(m.phase(), PhaseKind::Tracking);
    }

    #[test]
    fn termination_refused_while_active() {
        let mut m = GestureMachine::new(ZoomConfig::default());
        assert!(m.allows_termination());
        m.touch_start(&pair(100.0, 100.0, 200.0, 100.0));
        assert!(!m.allows_termination());
    }

    #[test]
    fn finish_release_clears_everything() {
        let mut m = tracking_machine(pair(100.0, 100.0, 200.0, 100.0));
        m.touch_move(&pair(100.0, 100.0, 250.0, 100.0));
        m.release();
        m.finish_release();
        assert_eq!(m.phase(), PhaseKind::Idle);
        assert_eq!(m.layout(), None);
        assert_eq!(m.snapshot().show_modal, Some(false));
    }
}
