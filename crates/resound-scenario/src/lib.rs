//! resound scenario model: timed events, scenario scripts, and the
//! built-in catalog.
//!
//! A [`Scenario`] is a declarative, replayable script: a name plus an
//! ordered sequence of [`Event`]s, each carrying a millisecond offset and a
//! set of typed parameter changes. Replaying the same scenario against a
//! freshly reset engine applies the same events in the same order, every
//! time; whether the *audio* comes out identical is the engine's
//! determinism contract, not this crate's.
//!
//! The parameter vocabulary ([`Param`]) is a closed enumeration with typed
//! values and an `Ext` escape hatch for engine-specific extensions, so a
//! malformed script fails when it is constructed rather than deep inside
//! the engine.

pub mod catalog;
pub mod error;
pub mod event;
pub mod scenario;

pub use catalog::catalog;
pub use error::ScenarioError;
pub use event::{Breakpoints, ControlCoefs, Event, FilterKind, ModTarget, Param, Waveform};
pub use scenario::Scenario;
