pub mod clock;
pub mod tempo;
pub mod ticks;

pub use self::clock::ClockTime;
pub use self::tempo::{Seconds, Tempo};
pub use self::ticks::{TicksPerBeat, TicksTime, DEFAULT_TICKS_PER_BEAT};
