//! Broadcast channel carrying flow events.

use gasless_types::FlowEvent;
use tokio::sync::broadcast;

/// Fan-out bus for `FlowEvent`s. Cloning shares the same channel.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<FlowEvent>,
}

impl EventBus {
	/// Creates a bus buffering up to `capacity` events per lagging subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to current subscribers.
	///
	/// Fails only when nobody is subscribed; callers may ignore that.
	pub fn publish(
		&self,
		event: FlowEvent,
	) -> Result<usize, broadcast::error::SendError<FlowEvent>> {
		self.sender.send(event)
	}
}
