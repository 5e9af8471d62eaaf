// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{
    fix::Fix,
    location_target::{LocationTarget, SavedRoute},
    notification::Notification,
    playback_state::PlaybackState,
    settings::Settings,
};
use std::sync::Arc;
use strum_macros::EnumDiscriminants;

/// Represents a high-level event in the system.
///
/// Each `Event` wraps an [`EventKind`], which defines the actual type
/// and data carried by the event.
///
/// This structure is designed to be passed through an [`EventBus`]
/// between asynchronous modules.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The inner event type and associated data.
    pub kind: EventKind,
}

impl Event {
    /// Returns the discriminant of the wrapped [`EventKind`].
    pub fn event_type(&self) -> EventKindType {
        EventKindType::from(&self.kind)
    }
}

/// A request sent over the [`EventBus`] to another module.
///
/// `id` and `sender_addr` are echoed in the matching [`Response`] so the
/// requester can pick its answer out of the broadcast stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Request<T> {
    pub id: u64,
    pub sender_addr: u64,
    pub data: T,
}

impl Request<()> {
    pub fn empty_request(id: u64, sender_addr: u64) -> Self {
        Request {
            id,
            sender_addr,
            data: (),
        }
    }
}

/// The answer to a [`Request`].
#[derive(Clone, Debug, PartialEq)]
pub struct Response<T> {
    pub id: u64,
    pub receiver_addr: u64,
    pub data: T,
}

impl<T> Response<T> {
    pub fn new(id: u64, receiver_addr: u64, data: T) -> Self {
        Response {
            id,
            receiver_addr,
            data,
        }
    }
}

/// What a mock location request asks for: the target and the travel speed.
#[derive(Clone, Debug, PartialEq)]
pub struct MockTarget {
    pub target: LocationTarget,
    /// Speed in meters per second, only used for routes.
    pub speed: f64,
}

/// A thread-safe, reference-counted pointer to a [`Fix`].
///
/// Every mocked fix is broadcast to all subscribers, the [`Arc`] avoids
/// copying it for each of them.
pub type FixPtr = Arc<Fix>;
pub type NotificationPtr = Arc<Notification>;
pub type EmptyRequestPtr = Arc<Request<()>>;
pub type StartMockRequestPtr = Arc<Request<MockTarget>>;
pub type LoadSettingsResponsePtr = Arc<Response<Settings>>;
pub type SaveSettingsRequestPtr = Arc<Request<Settings>>;
pub type LoadSavedRoutesResponsePtr = Arc<Response<Arc<Vec<SavedRoute>>>>;
pub type RouteRequestPtr = Arc<Request<SavedRoute>>;
/// Result of a storage write, the error kind of the failed I/O operation otherwise.
pub type StorageResponsePtr = Arc<Response<Result<(), std::io::ErrorKind>>>;

/// Enumerates the different kinds of events that can be emitted
/// and transmitted via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKindType), derive(Hash))]
pub enum EventKind {
    /// Indicates that a module shall terminate.
    QuitEvent,

    /// Start mocking the given target, replacing a running playback.
    StartMockRequestEvent(StartMockRequestPtr),

    /// Freeze the position of a running playback.
    PauseMockEvent,

    /// Continue a paused playback.
    ResumeMockEvent,

    /// Stop mocking and unregister the mock location provider.
    StopMockEvent,

    /// Change the travel speed (m/s) of the playback.
    SetSpeedEvent(f64),

    /// A fix was handed to the mock location provider.
    MockFixEvent(FixPtr),

    /// The playback state changed.
    PlaybackStateEvent(PlaybackState),

    /// The playback reached the last point of the route.
    RouteFinishedEvent,

    /// A message for the user.
    NotificationEvent(NotificationPtr),

    LoadSettingsRequestEvent(EmptyRequestPtr),
    LoadSettingsResponseEvent(LoadSettingsResponsePtr),
    SaveSettingsRequestEvent(SaveSettingsRequestPtr),
    SaveSettingsResponseEvent(StorageResponsePtr),
    LoadSavedRoutesRequestEvent(EmptyRequestPtr),
    LoadSavedRoutesResponseEvent(LoadSavedRoutesResponsePtr),
    SaveRouteRequestEvent(RouteRequestPtr),
    SaveRouteResponseEvent(StorageResponsePtr),
    DeleteRouteRequestEvent(RouteRequestPtr),
    DeleteRouteResponseEvent(StorageResponsePtr),
}

/// Borrows the payload of an [`EventKind`] variant.
///
/// Evaluates to `Some(&payload)` if `$kind` is the variant `$variant`,
/// otherwise to `None`.
///
/// ```
/// use module_core::{EventKind, payload_ref};
///
/// let kind = EventKind::SetSpeedEvent(12.0);
/// assert_eq!(payload_ref!(kind, EventKind::SetSpeedEvent), Some(&12.0));
/// assert_eq!(payload_ref!(kind, EventKind::MockFixEvent), None);
/// ```
#[macro_export]
macro_rules! payload_ref {
    ($kind:expr, $variant:path) => {
        match &$kind {
            $variant(payload) => Some(payload),
            _ => None,
        }
    };
}

/// A simple asynchronous event bus for publishing and subscribing to [`Event`]s.
///
/// The event bus uses a [`tokio::sync::broadcast::channel`] under the hood,
/// allowing multiple receivers to listen for the same stream of events.
///
/// Each published event is cloned and distributed to all active subscribers.
/// If no subscribers exist at the time of publication, the event is discarded silently.
pub struct EventBus {
    /// The broadcast sender used internally to distribute events.
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new [`EventBus`] with a fixed buffer capacity of 100 messages.
    ///
    /// When the buffer is full, the oldest messages are dropped automatically
    /// as new ones are published.
    pub fn new() -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(100);
        EventBus { sender }
    }

    /// Subscribes to the event bus and returns a [`tokio::sync::broadcast::Receiver`].
    ///
    /// The returned receiver will receive all future events published after the
    /// subscription is created.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes an [`Event`] to all active subscribers.
    ///
    /// If no subscribers exist, the event is discarded silently.
    pub fn publish(&self, event: &Event) {
        let _ = self.sender.send(event.clone());
    }

    /// Returns a sender handle that outlives borrows of the bus, e.g. for signal handlers.
    pub fn sender(&self) -> tokio::sync::broadcast::Sender<Event> {
        self.sender.clone()
    }

    /// Creates a [`ModuleCtx`] bound to this [`EventBus`].
    ///
    /// The returned context can be used by modules implementing [`Module`]
    /// to send and receive events within their execution scope.
    pub fn context(&self) -> ModuleCtx {
        ModuleCtx::new(self)
    }
}

/// Provides a default instance of [`EventBus`].
impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Defines the common interface for an asynchronous module
/// that can be executed and communicate via the [`EventBus`].
#[async_trait::async_trait]
pub trait Module {
    /// Runs the module asynchronously until completion.
    ///
    /// This function typically contains the module's main event loop,
    /// reacting to messages received through the [`ModuleCtx`].
    async fn run(&mut self) -> Result<(), ()>;
}

/// Provides a module-scoped context for interacting with the [`EventBus`].
///
/// Each `ModuleCtx` owns both a sender and a receiver, allowing the module
/// to both publish and listen for events concurrently.
pub struct ModuleCtx {
    /// The broadcast sender used to publish events.
    pub sender: tokio::sync::broadcast::Sender<Event>,

    /// The broadcast receiver used to listen for events.
    pub receiver: tokio::sync::broadcast::Receiver<Event>,
}

impl ModuleCtx {
    /// Constructs a new [`ModuleCtx`] from the given [`EventBus`].
    ///
    /// Clones the internal broadcast sender and creates a new receiver.
    pub fn new(event_bus: &EventBus) -> Self {
        ModuleCtx {
            sender: event_bus.sender.clone(),
            receiver: event_bus.subscribe(),
        }
    }

    /// Wraps `kind` into an [`Event`] and publishes it.
    ///
    /// Returns the number of subscribers the event was delivered to, or an
    /// error if nobody is subscribed.
    pub fn publish_event(
        &self,
        kind: EventKind,
    ) -> Result<usize, tokio::sync::broadcast::error::SendError<Event>> {
        self.sender.send(Event { kind })
    }
}

pub mod test_helper;
