//! Input dispatch: backend-neutral key, text and mouse events mapped to
//! [`Intent`](tilehop_common::Intent)s.
//!
//! # Invariants
//! - Handlers only enqueue intents; nothing here touches world or render state.
//! - The window backend and the headless script runner feed the same queue.

pub mod action;
pub mod event;
pub mod script;

pub use action::{InputDispatcher, IntentQueue, KeyBindings};
pub use event::{InputEvent, Key, KeyPhase, MouseButton};
pub use script::{MAX_SCRIPT_FRAMES, ScriptError, parse_script};
