use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::broadcast;

use crate::error::RegistryError;
use crate::lifecycle::LifecycleManager;
use crate::path::RegionName;
use crate::target::RegionTarget;

const EVENT_CAPACITY: usize = 64;

/// Registry change notification.
#[derive(Clone)]
pub enum RegistryEvent {
	/// A target was installed under `region`.
	Registered {
		region: RegionName,
		target: Arc<dyn RegionTarget>,
	},
	/// The target registered under `region` was removed.
	Unregistered {
		region: RegionName,
		target: Arc<dyn RegionTarget>,
	},
}

impl RegistryEvent {
	/// Name the event is about.
	pub fn region(&self) -> &RegionName {
		match self {
			Self::Registered { region, .. } | Self::Unregistered { region, .. } => region,
		}
	}
}

impl std::fmt::Debug for RegistryEvent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let kind = match self {
			Self::Registered { .. } => "Registered",
			Self::Unregistered { .. } => "Unregistered",
		};
		f.debug_tuple(kind).field(&self.region().as_str()).finish()
	}
}

struct Inner {
	regions: Mutex<FxHashMap<RegionName, Arc<dyn RegionTarget>>>,
	events: broadcast::Sender<RegistryEvent>,
	lifecycle: LifecycleManager,
}

/// Thread-safe name → target association table.
///
/// An explicit, constructible instance: coordinators hold a clone, tests
/// build as many independent registries as they like. All map access goes
/// through one mutex; events are sent while it is held so subscribers
/// observe them in registry-operation order (the broadcast channel never
/// runs subscriber code inside `send`, so there is no reentrancy hazard).
#[derive(Clone)]
pub struct RegionRegistry {
	inner: Arc<Inner>,
}

impl Default for RegionRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl RegionRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		let (events, _) = broadcast::channel(EVENT_CAPACITY);
		Self {
			inner: Arc::new(Inner {
				regions: Mutex::new(FxHashMap::default()),
				events,
				lifecycle: LifecycleManager::new(),
			}),
		}
	}

	/// Installs `target` under `name` and starts watching its attachment.
	///
	/// Re-registering the same underlying resource is an idempotent no-op.
	/// Re-registering a different resource under a live name replaces it
	/// silently: targets get recreated and re-registered before the old
	/// instance's detach signal has fired, and the last writer wins.
	pub fn register(&self, name: &str, target: Arc<dyn RegionTarget>) -> Result<(), RegistryError> {
		let region = RegionName::parse(name).map_err(RegistryError::InvalidName)?;
		self.register_name(region, target);
		Ok(())
	}

	/// Registers `target` and returns a guard that unregisters on drop.
	///
	/// The scoped form adapters use at their attachment point; explicit
	/// detach signals still remove the entry early if they fire first.
	pub fn register_scoped(
		&self,
		name: &str,
		target: Arc<dyn RegionTarget>,
	) -> Result<RegionGuard, RegistryError> {
		let region = RegionName::parse(name).map_err(RegistryError::InvalidName)?;
		self.register_name(region.clone(), target);
		Ok(RegionGuard {
			registry: self.clone(),
			region,
		})
	}

	fn register_name(&self, region: RegionName, target: Arc<dyn RegionTarget>) {
		let mut regions = self.inner.regions.lock();
		if let Some(existing) = regions.get(&region) {
			if existing.same_target(&target) {
				tracing::trace!(region = %region, "registry.register.idempotent");
				return;
			}
			tracing::warn!(region = %region, "registry.register.replace");
			self.inner.lifecycle.stop_managing(&region);
		}
		regions.insert(region.clone(), Arc::clone(&target));
		self.start_watch(region.clone(), Arc::clone(&target));
		tracing::debug!(region = %region, "registry.register");
		let _ = self.inner.events.send(RegistryEvent::Registered { region, target });
	}

	/// Removes the entry for `name`, if present. No-op otherwise.
	pub fn unregister(&self, name: &str) {
		let Ok(region) = RegionName::parse(name) else {
			// Invalid names can never be registered; nothing to remove.
			return;
		};
		self.unregister_name(&region);
	}

	/// Returns the registered target, never blocking.
	pub fn try_get(&self, name: &str) -> Option<Arc<dyn RegionTarget>> {
		let region = RegionName::parse(name).ok()?;
		self.try_get_name(&region)
	}

	/// Subscribes to registration changes from this point onward.
	pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
		self.inner.events.subscribe()
	}

	/// Number of registered regions.
	pub fn len(&self) -> usize {
		self.inner.regions.lock().len()
	}

	/// True when nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.inner.regions.lock().is_empty()
	}

	/// Live subscriptions to the event channel.
	#[cfg(test)]
	pub(crate) fn event_receiver_count(&self) -> usize {
		self.inner.events.receiver_count()
	}

	pub(crate) fn try_get_name(&self, region: &RegionName) -> Option<Arc<dyn RegionTarget>> {
		self.inner.regions.lock().get(region).cloned()
	}

	pub(crate) fn unregister_name(&self, region: &RegionName) {
		let mut regions = self.inner.regions.lock();
		let Some(target) = regions.remove(region) else {
			return;
		};
		self.inner.lifecycle.stop_managing(region);
		tracing::debug!(region = %region, "registry.unregister");
		let _ = self.inner.events.send(RegistryEvent::Unregistered {
			region: region.clone(),
			target,
		});
	}

	fn start_watch(&self, region: RegionName, target: Arc<dyn RegionTarget>) {
		let weak = Arc::downgrade(&self.inner);
		let detach_region = region.clone();
		let detach_target = Arc::clone(&target);
		self.inner.lifecycle.manage(
			region,
			target,
			Box::new(move || {
				Inner::remove_if_current(&weak, &detach_region, &detach_target);
			}),
		);
	}
}

impl Inner {
	/// Detach-driven removal. Only removes when `target` is still the
	/// registered instance; a detach from an already-replaced target is
	/// stale and ignored.
	fn remove_if_current(weak: &Weak<Inner>, region: &RegionName, target: &Arc<dyn RegionTarget>) {
		let Some(inner) = weak.upgrade() else {
			return;
		};
		let mut regions = inner.regions.lock();
		match regions.get(region) {
			Some(current) if current.same_target(target) => {}
			_ => {
				tracing::trace!(region = %region, "registry.detach.stale");
				return;
			}
		}
		let Some(removed) = regions.remove(region) else {
			return;
		};
		inner.lifecycle.stop_managing(region);
		tracing::debug!(region = %region, "registry.unregister.detached");
		let _ = inner.events.send(RegistryEvent::Unregistered {
			region: region.clone(),
			target: removed,
		});
	}
}

/// Unregisters its region when dropped.
#[must_use = "dropping the guard unregisters the region"]
pub struct RegionGuard {
	registry: RegionRegistry,
	region: RegionName,
}

impl RegionGuard {
	/// Name this guard is responsible for.
	pub fn region(&self) -> &RegionName {
		&self.region
	}
}

impl Drop for RegionGuard {
	fn drop(&mut self) {
		self.registry.unregister_name(&self.region);
	}
}
