//! # Task Management System
//!
//! A pool of worker threads for executing chunk work off the main thread.
//!
//! ## Architecture Overview
//!
//! - [`TaskManager`]: central coordinator for task distribution.
//! - [`task::Task`]: a unit of work, a boxed closure producing one result.
//! - `TaskChannel`: the per-worker pair of mpsc channels.
//!
//! ## Task Lifecycle
//!
//! 1. The main thread publishes tasks via [`TaskManager::publish_task`].
//! 2. The manager distributes them across worker channels round-robin,
//!    queueing when every channel is at capacity.
//! 3. Workers run each closure and send its result back on their channel.
//! 4. The main thread collects results with
//!    [`TaskManager::drain_completed_tasks`] once per frame and calls
//!    [`TaskManager::process_queued_tasks`] to refill freed channels.
//!
//! Results carry no callbacks; the engine loop interprets them and decides
//! what (if anything) to do next. A result whose chunk has since been
//! unloaded is simply dropped there, which is how in-flight work for
//! abandoned chunks gets cancelled.

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, info};

use task::Task;

/// Maximum number of tasks in flight per worker channel.
///
/// Kept at 1 so each worker finishes its task before receiving the next;
/// queued tasks wait in the manager, where scheduling order stays visible.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// A communication channel between the main thread and one worker thread.
///
/// The worker handle is held only to keep the thread alive for the channel's
/// lifetime; dropping the channel closes `task_sender`, which ends the
/// worker's receive loop.
struct TaskChannel<R> {
    task_sender: Sender<Task<R>>,
    result_receiver: Receiver<R>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// Generic over the result type `R`; the engine instantiates it with an enum
/// covering every kind of background work it schedules.
pub struct TaskManager<R: Send + 'static> {
    channels: Vec<TaskChannel<R>>,
    queued_tasks: VecDeque<Task<R>>,
    current_channel: usize,
}

impl<R: Send + 'static> TaskManager<R> {
    /// Creates a manager with the specified number of worker threads.
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        info!(
            "spawning {} workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        let mut channels = Vec::with_capacity(num_workers);
        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Task<R>>();
            let (result_tx, result_rx) = channel::<R>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let _ = result_tx.send(task());
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of tasks waiting for a free worker.
    pub fn queued_task_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Number of tasks currently running on workers.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// Attempts to send a task to a specific worker channel, returning the
    /// task on failure so it can be requeued.
    fn try_send_task(&mut self, task: Task<R>, channel_idx: usize) -> Result<(), Task<R>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(send_error) => Err(send_error.0),
        }
    }

    /// Finds a worker channel below its in-flight cap, round-robin from the
    /// last used channel so load spreads evenly.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }
        let start_channel = self.current_channel;
        let mut current = start_channel;
        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Publishes a task for background execution.
    ///
    /// Returns `true` if the task went straight to a worker, `false` if every
    /// channel was at capacity and it was queued. Queued tasks are flushed by
    /// [`TaskManager::process_queued_tasks`].
    pub fn publish_task(&mut self, task: Task<R>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    debug!("worker channel disconnected, queueing task");
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto workers freed since the last frame. FIFO, and
    /// stops as soon as every channel is at capacity again.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                return;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                }
                Err(task) => {
                    self.queued_tasks.push_front(task);
                    return;
                }
            }
        }
    }

    /// Collects every result workers have finished since the last call.
    ///
    /// Must be called from the main thread; freeing in-flight slots here is
    /// what lets [`TaskManager::process_queued_tasks`] make progress.
    pub fn drain_completed_tasks(&mut self) -> Vec<R> {
        let mut results = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                results.push(result);
            }
        }
        results
    }
}
