use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Unit of work marshaled onto a dispatch context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Execution context a target's handlers must run on.
///
/// Callers that are already on the context run jobs synchronously instead
/// of queueing, so navigation from the UI thread never self-deadlocks.
pub trait Dispatch: Send + Sync + 'static {
	/// True when the calling thread is this dispatch context.
	fn is_current(&self) -> bool;

	/// Queues `job` to run on the context. Dropping the job without running
	/// it is allowed once the context is gone; it must never be run twice.
	fn run(&self, job: Job);
}

/// Dispatch context that runs every job immediately on the calling thread.
///
/// Suits headless embedders and tests where no thread affinity exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatch;

impl Dispatch for InlineDispatch {
	fn is_current(&self) -> bool {
		true
	}

	fn run(&self, job: Job) {
		job();
	}
}

struct QueueShared {
	owner: Mutex<Option<ThreadId>>,
}

/// Sender half of a single-consumer dispatch queue.
///
/// Hand clones of this to targets as their dispatcher; drain jobs from the
/// paired [`DispatchRunner`] on the thread that owns the context.
#[derive(Clone)]
pub struct DispatchQueue {
	tx: mpsc::UnboundedSender<Job>,
	shared: Arc<QueueShared>,
}

/// Consumer half of a [`DispatchQueue`].
pub struct DispatchRunner {
	rx: mpsc::UnboundedReceiver<Job>,
	shared: Arc<QueueShared>,
}

impl DispatchQueue {
	/// Creates a queue and its runner.
	pub fn new() -> (DispatchQueue, DispatchRunner) {
		let (tx, rx) = mpsc::unbounded_channel();
		let shared = Arc::new(QueueShared {
			owner: Mutex::new(None),
		});
		(
			DispatchQueue {
				tx,
				shared: Arc::clone(&shared),
			},
			DispatchRunner { rx, shared },
		)
	}
}

impl Dispatch for DispatchQueue {
	fn is_current(&self) -> bool {
		*self.shared.owner.lock() == Some(thread::current().id())
	}

	fn run(&self, job: Job) {
		if self.tx.send(job).is_err() {
			// Runner is gone; the dropped job's reply channel reports this.
			tracing::debug!("dispatch.queue.closed");
		}
	}
}

impl DispatchRunner {
	/// Marks the calling thread as the owner of this context.
	pub fn claim(&self) {
		*self.shared.owner.lock() = Some(thread::current().id());
	}

	/// Runs queued jobs without waiting. Returns how many ran.
	pub fn run_pending(&mut self) -> usize {
		self.claim();
		let mut ran = 0;
		while let Ok(job) = self.rx.try_recv() {
			job();
			ran += 1;
		}
		ran
	}

	/// Runs jobs until every [`DispatchQueue`] clone is dropped.
	pub async fn run(mut self) {
		self.claim();
		while let Some(job) = self.rx.recv().await {
			job();
		}
	}
}
