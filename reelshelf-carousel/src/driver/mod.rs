//! Tokio driver
//!
//! Runs one [`Carousel`] inside a single task. The task is the carousel's
//! only thread of control: it sleeps until the next timer deadline, applies
//! host commands and sequence changes as they arrive, and publishes a
//! [`CarouselSnapshot`] after every step.

pub mod messages;

use std::ops::ControlFlow;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant as TokioInstant, sleep_until};

use crate::carousel::{
    Carousel, CarouselHost, CarouselSnapshot, Direction, InputEvent, Sequence,
};
pub use messages::CarouselCommand;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("carousel driver has stopped")]
    Closed,

    #[error("carousel driver task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn now() -> std::time::Instant {
    TokioInstant::now().into_std()
}

struct CarouselDriver<T, H> {
    carousel: Carousel<T, H>,
    commands: mpsc::UnboundedReceiver<CarouselCommand>,
    sequences: watch::Receiver<Sequence<T>>,
    snapshots: watch::Sender<CarouselSnapshot>,
}

impl<T, H> CarouselDriver<T, H>
where
    T: Send + Sync + 'static,
    H: CarouselHost + Send + 'static,
{
    async fn run(mut self) {
        let initial = self.sequences.borrow_and_update().clone();
        self.carousel.set_sequence(initial, now());
        self.publish();

        let mut source_open = true;
        loop {
            let deadline = self.carousel.next_deadline();
            let wake = deadline
                .map(TokioInstant::from_std)
                .unwrap_or_else(TokioInstant::now);

            tokio::select! {
                biased;

                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    if self.apply(command).is_break() {
                        break;
                    }
                }

                changed = self.sequences.changed(), if source_open => {
                    if changed.is_ok() {
                        let sequence = self.sequences.borrow_and_update().clone();
                        self.carousel.set_sequence(sequence, now());
                    } else {
                        log::debug!("Sequence source closed; keeping last sequence");
                        source_open = false;
                    }
                }

                _ = sleep_until(wake), if deadline.is_some() => {
                    self.carousel.advance(now());
                }
            }
            self.publish();
        }

        self.carousel.shutdown();
        self.publish();
    }

    /// Apply one host command; `Break` ends the run loop.
    fn apply(&mut self, command: CarouselCommand) -> ControlFlow<()> {
        let now = now();
        match command {
            CarouselCommand::Page(direction) => {
                let outcome = self.carousel.page(direction, now);
                log::trace!("Page {direction}: {outcome:?}");
            }
            CarouselCommand::ViewportResized(width) => {
                self.carousel.set_viewport_width(width, now);
            }
            CarouselCommand::Input(event) => self.carousel.handle_input(event),
            CarouselCommand::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.carousel.snapshot());
    }
}

/// Host-side handle to a spawned driver. Dropping it aborts the task.
#[derive(Debug)]
pub struct CarouselHandle {
    commands: mpsc::UnboundedSender<CarouselCommand>,
    snapshots: watch::Receiver<CarouselSnapshot>,
    task: Option<JoinHandle<()>>,
}

/// Spawn `carousel` on the current tokio runtime, fed by `sequences`.
pub fn spawn<T, H>(
    carousel: Carousel<T, H>,
    sequences: watch::Receiver<Sequence<T>>,
) -> CarouselHandle
where
    T: Send + Sync + 'static,
    H: CarouselHost + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(carousel.snapshot());
    let driver = CarouselDriver {
        carousel,
        commands: command_rx,
        sequences,
        snapshots: snapshot_tx,
    };
    let task = tokio::spawn(driver.run());
    CarouselHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
        task: Some(task),
    }
}

impl CarouselHandle {
    fn send(&self, command: CarouselCommand) -> Result<(), DriverError> {
        self.commands.send(command).map_err(|_| DriverError::Closed)
    }

    pub fn page(&self, direction: Direction) -> Result<(), DriverError> {
        self.send(CarouselCommand::Page(direction))
    }

    pub fn set_viewport_width(&self, width: f32) -> Result<(), DriverError> {
        self.send(CarouselCommand::ViewportResized(width))
    }

    pub fn input(&self, event: InputEvent) -> Result<(), DriverError> {
        self.send(CarouselCommand::Input(event))
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> CarouselSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.snapshots.clone()
    }

    /// Tear the carousel down and wait for the task to finish.
    pub async fn shutdown(mut self) -> Result<(), DriverError> {
        let _ = self.commands.send(CarouselCommand::Shutdown);
        match self.task.take() {
            Some(task) => task.await.map_err(DriverError::from),
            None => Ok(()),
        }
    }
}

impl Drop for CarouselHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
