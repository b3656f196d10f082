#![forbid(unsafe_code)]

//! Typewriter text cycler.
//!
//! Types each phrase of a fixed list one grapheme at a time, pauses, deletes
//! it one grapheme at a time, then moves on to the next phrase, wrapping
//! around forever.
//!
//! # State machine
//!
//! ```text
//!            full phrase shown                pause elapsed
//!  Typing ─────────────────────▶ Pausing ─────────────────────▶ Deleting
//!    ▲                                                              │
//!    └──────────────── text empty: next phrase ─────────────────────┘
//! ```
//!
//! Each [`Typewriter::tick`] performs exactly one step. The step that finds
//! the phrase complete (or the text empty) only changes phase, so a phrase
//! of `n` graphemes takes `n + 1` typing ticks and `n + 1` deleting ticks.
//!
//! # Invariants
//!
//! 1. The displayed text is always a prefix of the current phrase.
//! 2. A tick changes the displayed length by at most one grapheme.
//! 3. `phrase_index < phrase_count()`.
//!
//! # Failure Modes
//!
//! - Empty phrase list: construction fails with [`TypewriterError::NoPhrases`].
//! - Empty phrase: allowed; it pauses once and moves on.

use std::fmt;
use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

/// Default per-grapheme typing delay.
pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(100);
/// Default per-grapheme deleting delay.
pub const DEFAULT_DELETING_DELAY: Duration = Duration::from_millis(50);
/// Default pause between finishing a phrase and deleting it.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(1000);
/// Shortest gap between two ticks; zero timings are clamped to it.
pub const MIN_TICK_DELAY: Duration = Duration::from_nanos(1);

/// Errors raised when configuring a [`Typewriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypewriterError {
    /// The phrase list is empty.
    NoPhrases,
}

impl fmt::Display for TypewriterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPhrases => write!(f, "typewriter needs at least one phrase"),
        }
    }
}

impl std::error::Error for TypewriterError {}

/// Phase of the typewriter state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterPhase {
    /// Appending graphemes.
    Typing,
    /// Full phrase shown, waiting before deleting.
    PausingBeforeDelete,
    /// Removing graphemes.
    Deleting,
}

/// Delays driving the typewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    /// Delay before each typing tick.
    pub typing: Duration,
    /// Delay before each deleting tick.
    pub deleting: Duration,
    /// Delay between the phrase completing and deletion starting.
    pub pause: Duration,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            typing: DEFAULT_TYPING_DELAY,
            deleting: DEFAULT_DELETING_DELAY,
            pause: DEFAULT_PAUSE,
        }
    }
}

impl TypewriterTiming {
    /// Create a timing triple.
    pub const fn new(typing: Duration, deleting: Duration, pause: Duration) -> Self {
        Self {
            typing,
            deleting,
            pause,
        }
    }
}

/// A phrase with precomputed grapheme boundaries.
#[derive(Debug, Clone)]
struct Phrase {
    text: String,
    /// Byte offsets of grapheme ends; `ends[k - 1]` is the byte length of the first `k` graphemes.
    ends: Vec<usize>,
}

impl Phrase {
    fn new(text: String) -> Self {
        let ends = text
            .grapheme_indices(true)
            .map(|(start, g)| start + g.len())
            .collect();
        Self { text, ends }
    }

    fn len(&self) -> usize {
        self.ends.len()
    }

    fn prefix(&self, graphemes: usize) -> &str {
        match graphemes {
            0 => "",
            n => &self.text[..self.ends[n - 1]],
        }
    }
}

/// Typewriter state machine.
#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<Phrase>,
    timing: TypewriterTiming,
    phrase_index: usize,
    /// Number of graphemes of the current phrase on display.
    shown: usize,
    phase: TypewriterPhase,
    /// Time accumulated towards the next tick (used by [`advance`](Self::advance)).
    pending: Duration,
    ticks: u64,
}

impl Typewriter {
    /// Create a typewriter over `phrases`.
    pub fn new<I, S>(phrases: I, timing: TypewriterTiming) -> Result<Self, TypewriterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<Phrase> = phrases
            .into_iter()
            .map(|p| Phrase::new(p.into()))
            .collect();
        if phrases.is_empty() {
            return Err(TypewriterError::NoPhrases);
        }
        Ok(Self {
            phrases,
            timing,
            phrase_index: 0,
            shown: 0,
            phase: TypewriterPhase::Typing,
            pending: Duration::ZERO,
            ticks: 0,
        })
    }

    /// Perform one step of the state machine and return the new phase.
    pub fn tick(&mut self) -> TypewriterPhase {
        let len = self.phrases[self.phrase_index].len();
        match self.phase {
            TypewriterPhase::Typing => {
                if self.shown < len {
                    self.shown += 1;
                } else {
                    self.phase = TypewriterPhase::PausingBeforeDelete;
                }
            }
            TypewriterPhase::PausingBeforeDelete => {
                self.phase = TypewriterPhase::Deleting;
            }
            TypewriterPhase::Deleting => {
                if self.shown > 0 {
                    self.shown -= 1;
                } else {
                    self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
                    self.phase = TypewriterPhase::Typing;
                }
            }
        }
        self.ticks += 1;
        self.phase
    }

    /// Delay until the next tick, chosen by the current phase.
    ///
    /// Never shorter than [`MIN_TICK_DELAY`], so schedulers always make
    /// progress.
    pub fn next_delay(&self) -> Duration {
        let delay = match self.phase {
            TypewriterPhase::Typing => self.timing.typing,
            TypewriterPhase::PausingBeforeDelete => self.timing.pause,
            TypewriterPhase::Deleting => self.timing.deleting,
        };
        delay.max(MIN_TICK_DELAY)
    }

    /// Accumulate frame time and fire every tick that became due.
    ///
    /// Each tick is scheduled relative to the previous one, so a large `dt`
    /// replays the same sequence as many small ones. Returns the number of
    /// ticks fired.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.pending = self.pending.saturating_add(dt);
        let mut fired = 0;
        loop {
            let delay = self.next_delay();
            if self.pending < delay {
                break;
            }
            self.pending -= delay;
            self.tick();
            fired += 1;
        }
        fired
    }

    /// Text currently on display (without any caret).
    pub fn displayed(&self) -> &str {
        self.phrases[self.phrase_index].prefix(self.shown)
    }

    /// The phrase being typed or deleted.
    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.phrase_index].text
    }

    /// Index of the current phrase.
    #[inline]
    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    /// Number of configured phrases.
    #[inline]
    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    /// Configured delays.
    #[inline]
    pub fn timing(&self) -> TypewriterTiming {
        self.timing
    }

    /// Total ticks performed since construction or reset.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Return to the initial state: first phrase, empty text, typing.
    pub fn reset(&mut self) {
        self.phrase_index = 0;
        self.shown = 0;
        self.phase = TypewriterPhase::Typing;
        self.pending = Duration::ZERO;
        self.ticks = 0;
    }
}
