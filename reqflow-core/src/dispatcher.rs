//! Ordered, stoppable event dispatch.
//!
//! The dispatcher holds an ordered listener list per stage name and
//! publishes one event at a time: listeners run in priority order (higher
//! first), insertion order within equal priority, until the event's stop
//! flag is set. The (possibly mutated) event is always handed back to the
//! caller, and a listener failure propagates instead of being swallowed.
//!
//! Registration takes `&mut self` while dispatch takes `&self`, so the
//! listener list cannot be mutated during an in-flight dispatch: the
//! registration phase ends before the serving phase starts, by
//! construction.

use std::{any::Any, collections::HashMap, marker::PhantomData, sync::Arc};

use crate::{
    error::BoxError,
    event::{EventName, KernelEvent, Stoppable},
};

/// A listener for one concrete stage event type.
pub trait Listener<E>: Send + Sync {
    /// Observe and possibly mutate the event.
    fn on_event(&self, event: &mut E) -> Result<(), BoxError>;
}

impl<E, F> Listener<E> for F
where
    F: Fn(&mut E) -> Result<(), BoxError> + Send + Sync,
{
    fn on_event(&self, event: &mut E) -> Result<(), BoxError> {
        self(event)
    }
}

/// An object that registers a table of listeners at startup.
///
/// This is the explicit, call-based replacement for static "subscribed
/// events" metadata: implementors call [`EventDispatcher::add_listener`]
/// once per stage they care about.
pub trait Subscriber: Send + Sync {
    /// Register this subscriber's listeners.
    fn subscribe(&self, dispatcher: &mut EventDispatcher);
}

/// Object-safe shim that downcasts the erased event back to its concrete
/// payload type.
trait ErasedListener: Send + Sync {
    fn call_dyn(&self, event: &mut dyn Any) -> Result<(), BoxError>;
}

struct TypedListener<E, L> {
    listener: L,
    _marker: PhantomData<fn(E)>,
}

impl<E, L> ErasedListener for TypedListener<E, L>
where
    E: KernelEvent,
    L: Listener<E>,
{
    fn call_dyn(&self, event: &mut dyn Any) -> Result<(), BoxError> {
        // Registrations are keyed by E::NAME, so the payload type always
        // matches the registration list it came from.
        match event.downcast_mut::<E>() {
            Some(event) => self.listener.on_event(event),
            None => Ok(()),
        }
    }
}

struct Registration {
    priority: i32,
    listener: Arc<dyn ErasedListener>,
}

/// Publishes stage events to an ordered set of listeners per stage name.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: HashMap<EventName, Vec<Registration>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the stage of event type `E`.
    ///
    /// Higher `priority` runs earlier; listeners at equal priority run in
    /// registration order.
    pub fn add_listener<E, L>(&mut self, listener: L, priority: i32)
    where
        E: KernelEvent,
        L: Listener<E> + 'static,
    {
        let regs = self.listeners.entry(E::NAME).or_default();
        let at = regs.partition_point(|reg| reg.priority >= priority);
        regs.insert(
            at,
            Registration {
                priority,
                listener: Arc::new(TypedListener {
                    listener,
                    _marker: PhantomData,
                }),
            },
        );
    }

    /// Register every listener a subscriber declares.
    pub fn add_subscriber(&mut self, subscriber: &dyn Subscriber) {
        subscriber.subscribe(self);
    }

    /// Number of listeners registered for a stage. Inspection only.
    pub fn listener_count(&self, name: EventName) -> usize {
        self.listeners.get(&name).map_or(0, Vec::len)
    }

    /// Publish `event` to its stage's listeners, in order, honoring the
    /// stop flag.
    ///
    /// Returns the event as last mutated. Dispatching a stage with no
    /// listeners is a no-op. A listener failure propagates to the caller
    /// unswallowed.
    pub fn dispatch<E: KernelEvent>(&self, mut event: E) -> Result<E, BoxError> {
        let Some(regs) = self.listeners.get(&E::NAME) else {
            return Ok(event);
        };
        tracing::trace!(event = %E::NAME, listeners = regs.len(), "dispatching event");
        for reg in regs {
            if event.is_propagation_stopped() {
                break;
            }
            reg.listener.call_dyn(&mut event)?;
        }
        Ok(event)
    }
}
