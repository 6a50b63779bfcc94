//! A lightweight DOM query and event delegation helper.
//!
//! [`Dom::select`] builds a [`Collection`] of elements from a CSS selector, which can then be narrowed with
//! [`filter`](`Collection::filter`) and [`find`](`Collection::find`) and subscribed to with
//! [`on`](`Collection::on`), [`once`](`Collection::once`) and [`off`](`Collection::off`).
//!
//! Delegated listeners are tracked per [`Dom`] in a [`ListenerRegistry`](`registry::ListenerRegistry`),
//! so that they can be removed again by element and delegation selector.
//!
//! The document itself is provided by a [`Host`]: [`web::WebHost`] for the browser, or [`memory::MemoryDom`].

#![doc(html_root_url = "https://docs.rs/brief-dom/0.0.1")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod closure_map;
mod collection;
mod dom;
mod error;
mod event_types;
mod events;
mod host;
mod listener;
pub mod memory;
pub mod registry;
pub mod web;

pub use collection::Collection;
pub use dom::{Context, Dom};
pub use error::Error;
pub use event_types::EventTypes;
pub use host::Host;
pub use listener::{Listener, ListenerOptions};
