/// Errors from [`Collection::on`](`crate::Collection::on`), [`off`](`crate::Collection::off`) and [`once`](`crate::Collection::once`).
///
/// Selector errors raised by queries are not wrapped; they are the [`Host::Error`](`crate::Host::Error`) itself.
#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
	#[error("no event type was given")]
	NoEventTypes,
	#[error("invalid event type {0:?}: event types must be non-empty and contain no whitespace")]
	InvalidEventType(String),
	#[error("the host rejected a listener change: {0:?}")]
	Host(E),
}
