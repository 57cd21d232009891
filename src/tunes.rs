//! The two fixed jingles, as literal frequency/duration tables.

/// One tone: frequency in Hz, duration in milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Note {
    pub freq: u16,
    pub ms: u16,
}

const fn note(freq: u16, ms: u16) -> Note {
    Note { freq, ms }
}

/// Played when a level is won.
pub const WIN_JINGLE: [Note; 9] = [
    note(2349, 270),
    note(2489, 270),
    note(2794, 270),
    note(2489, 270),
    note(2349, 270),
    note(2093, 270),
    note(2349, 270),
    note(2489, 270),
    note(2349, 600),
];

/// Played when the countdown runs out.
pub const GAME_OVER_JINGLE: [Note; 5] = [
    note(3136, 300),
    note(2637, 300),
    note(2093, 400),
    note(1568, 400),
    note(1047, 600),
];
