//! # Messages and Payloads
//!
//! Everything that travels through a mailbox is a [`Message`]. A message is an
//! immutable envelope around exactly one payload:
//!
//! - On the **result lane** the payload is a [`Payload`], an opaque value that
//!   the receiving behavior downcasts to whatever type it expects.
//! - On the **exception lane** the payload is a [`Fault`], a shared error value.
//!
//! Both payload types are `Arc`-backed, so broadcasting one message to many
//! downstream actors only bumps a reference count.

use crate::framework::mailbox::Mailbox;
use crate::framework::behavior::ActorBehavior;
use crate::framework::output::Output;
use async_trait::async_trait;
use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// An immutable envelope carrying a single payload.
#[derive(Clone, Debug)]
pub struct Message<T = Payload> {
    payload: T,
}

/// A message travelling on the result lane.
pub type ResultMessage = Message<Payload>;

/// A message travelling on the exception lane.
pub type ExceptionMessage = Message<Fault>;

impl<T> Message<T> {
    /// Wraps an already-built payload.
    pub fn from_payload(payload: T) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl Message<Payload> {
    /// Builds a result message from any value.
    ///
    /// ```rust
    /// use dataflow_actors::framework::Message;
    ///
    /// let message = Message::new("11,22,3b3");
    /// assert_eq!(message.payload().as_str(), Some("11,22,3b3"));
    /// ```
    pub fn new<V: Any + Send + Sync>(value: V) -> Self {
        Self::from_payload(Payload::new(value))
    }
}

impl Message<Fault> {
    /// Builds an exception message from an error (or an existing [`Fault`]).
    pub fn failure(fault: impl Into<Fault>) -> Self {
        Self::from_payload(fault.into())
    }
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// A type-erased, cheaply clonable value.
///
/// Behaviors recover the concrete value with [`Payload::downcast_ref`]. The
/// name of the wrapped type is kept around for logging and for error
/// messages when a behavior receives something it does not understand.
#[derive(Clone)]
pub struct Payload {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Payload {
    /// Wraps `value`. Wrapping a `Payload` returns it unchanged.
    pub fn new<V: Any + Send + Sync>(value: V) -> Self {
        let type_name = std::any::type_name::<V>();
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
        match boxed.downcast::<Payload>() {
            Ok(payload) => *payload,
            Err(other) => Self {
                value: Arc::from(other),
                type_name,
            },
        }
    }

    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.value.downcast_ref::<V>()
    }

    pub fn is<V: Any>(&self) -> bool {
        self.value.is::<V>()
    }

    /// Text view over `String` and `&'static str` payloads.
    pub fn as_str(&self) -> Option<&str> {
        if let Some(text) = self.downcast_ref::<String>() {
            return Some(text.as_str());
        }
        self.downcast_ref::<&'static str>().copied()
    }

    /// Fully qualified name of the wrapped type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => f.debug_tuple("Payload").field(&text).finish(),
            None => f.debug_tuple("Payload").field(&self.type_name).finish(),
        }
    }
}

// =============================================================================
// FAULT
// =============================================================================

/// A shared error value carried on the exception lane.
///
/// Any `std::error::Error` converts into a `Fault`, so hooks can use `?` on
/// fallible calls and `save_exception` accepts errors directly.
#[derive(Clone)]
pub struct Fault(Arc<dyn StdError + Send + Sync>);

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct FaultMessage(String);

impl Fault {
    pub fn new<E: StdError + Send + Sync + 'static>(error: E) -> Self {
        Self(Arc::new(error))
    }

    /// A fault that only carries a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(FaultMessage(message.into()))
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    pub fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }
}

impl<E: StdError + Send + Sync + 'static> From<E> for Fault {
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

// =============================================================================
// LANES
// =============================================================================

/// The two kinds of output an actor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Result,
    Exception,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Result => f.write_str("result"),
            OutputKind::Exception => f.write_str("exception"),
        }
    }
}

/// A pair of mailboxes, one per lane.
///
/// Actors own three of these: their inbox, their staging buffers and their
/// persisted outputs.
#[derive(Debug, Default)]
pub struct Lanes {
    pub results: Mailbox<ResultMessage>,
    pub exceptions: Mailbox<ExceptionMessage>,
}

impl Lanes {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Ties a payload type to its lane and to the hook that consumes it.
///
/// Implemented for [`Payload`] (result lane) and [`Fault`] (exception lane).
/// The processing loop, the flush step and the sink streams are written once,
/// generically over this trait.
#[async_trait]
pub trait LaneKind: Clone + Send + Sync + fmt::Debug + 'static {
    const KIND: OutputKind;

    fn lane(lanes: &Lanes) -> &Mailbox<Message<Self>>;

    async fn invoke(behavior: &dyn ActorBehavior, payload: Self) -> Result<Output, Fault>;
}

#[async_trait]
impl LaneKind for Payload {
    const KIND: OutputKind = OutputKind::Result;

    fn lane(lanes: &Lanes) -> &Mailbox<Message<Self>> {
        &lanes.results
    }

    async fn invoke(behavior: &dyn ActorBehavior, payload: Self) -> Result<Output, Fault> {
        behavior.process_result(payload).await
    }
}

#[async_trait]
impl LaneKind for Fault {
    const KIND: OutputKind = OutputKind::Exception;

    fn lane(lanes: &Lanes) -> &Mailbox<Message<Self>> {
        &lanes.exceptions
    }

    async fn invoke(behavior: &dyn ActorBehavior, payload: Self) -> Result<Output, Fault> {
        behavior.process_exception(payload).await
    }
}
