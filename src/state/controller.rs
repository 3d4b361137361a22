// Glue between responder hooks, the gesture machine and the host.

use crate::config::ZoomConfig;
use crate::host::{HostError, ZoomHost};
use crate::model::{BoundingBox, GestureSnapshot, TouchPoint};
use crate::presenter::{ZoomNotification, ZoomNotifier};

use super::gesture::{BoundsTicket, Command, GestureMachine};

pub struct ZoomController<H: ZoomHost> {
    machine: GestureMachine,
    host: H,
    notifier: ZoomNotifier,
    published: GestureSnapshot,
    /// Fingers currently down, as reported by the latest event.
    active_touches: usize,
}

impl<H: ZoomHost> ZoomController<H> {
    pub fn new(host: H, config: ZoomConfig) -> Self {
        Self {
            machine: GestureMachine::new(config),
            host,
            notifier: ZoomNotifier::default(),
            published: GestureSnapshot::default(),
            active_touches: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn snapshot(&self) -> GestureSnapshot {
        self.machine.snapshot()
    }

    pub fn config(&self) -> &ZoomConfig {
        self.machine.config()
    }

    pub fn set_config(&mut self, config: ZoomConfig) {
        self.machine.set_config(config);
    }

    /// Returns whether the gesture claims the touch stream.
    pub fn on_start(&mut self, touches: &[TouchPoint]) -> bool {
        self.active_touches = touches.len();
        let decision = self.machine.touch_start(touches);
        self.run(decision.command);
        self.sync();
        decision.claimed
    }

    pub fn on_move(&mut self, touches: &[TouchPoint]) {
        self.active_touches = touches.len();
        if self.machine.touch_move(touches) {
            self.sync();
        }
    }

    pub fn on_end(&mut self, remaining: usize) {
        self.active_touches = remaining;
        self.release();
    }

    pub fn on_terminate(&mut self) {
        self.active_touches = 0;
        self.release();
    }

    pub fn on_rejected(&mut self) {
        self.release();
    }

    pub fn on_termination_request(&self) -> bool {
        self.machine.allows_termination()
    }

    pub fn bounds_resolved(&mut self, ticket: BoundsTicket, frame: BoundingBox) {
        self.machine.bounds_resolved(ticket, frame, self.active_touches);
        self.sync();
    }

    pub fn bounds_failed(&mut self, ticket: BoundsTicket, err: &HostError) {
        log::warn!("bounds query failed: {err}");
        self.machine.bounds_failed(ticket);
        self.sync();
    }

    /// Release timer tick.
    pub fn frame(&mut self) {
        let command = self.machine.frame();
        self.run(command);
        self.sync();
    }

    fn release(&mut self) {
        let command = self.machine.release();
        self.run(command);
        self.sync();
    }

    fn run(&mut self, command: Option<Command>) {
        match command {
            None => {}
            Some(Command::RequestBounds(ticket)) => {
                if let Err(err) = self.host.request_bounds(ticket) {
                    log::warn!("could not measure view: {err}");
                    self.machine.bounds_failed(ticket);
                }
            }
            Some(Command::ScheduleFrame { delay_ms }) => {
                if let Err(err) = self.host.schedule_frame(delay_ms) {
                    log::warn!("could not schedule release frame: {err}");
                    self.machine.finish_release();
                }
            }
        }
    }

    fn sync(&mut self) {
        let snapshot = self.machine.snapshot();
        if snapshot == self.published {
            return;
        }
        self.published = snapshot;
        self.host.publish(&snapshot);
        match self.notifier.observe(snapshot.show_modal) {
            Some(ZoomNotification::Begin) => self.host.zoom_began(),
            Some(ZoomNotification::End) => self.host.zoom_ended(),
            None => {}
        }
    }
}
