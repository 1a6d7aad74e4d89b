pub mod aggregator;
pub mod chord;
pub mod composition;
pub mod config;
pub mod error;
pub mod event;
pub mod midi;
pub mod note;
pub mod player;
pub mod sequence;
pub mod time;
pub mod timeline;

pub use crate::composition::{CompiledTrack, Composition};
pub use crate::error::{Error, Result};
pub use crate::event::{Event, EventKind};
pub use crate::note::{Anchor, Note, NoteTime, Pitch};
pub use crate::sequence::{CompileOptions, DelayPolicy, Sequence, TrackId};
