//! Compact single-character ARPAbet transcription

use crate::lexicon::Lexicon;

/// ARPAbet symbol and its one-character form
const TABLE: [(&str, char); 39] = [
    ("AA", 'a'),
    ("AE", '@'),
    ("AH", 'A'),
    ("AO", 'c'),
    ("AW", 'W'),
    ("AY", 'Y'),
    ("EH", 'E'),
    ("ER", 'R'),
    ("EY", 'e'),
    ("IH", 'I'),
    ("IY", 'i'),
    ("OW", 'o'),
    ("OY", 'O'),
    ("UH", 'U'),
    ("UW", 'u'),
    ("B", 'b'),
    ("CH", 'B'),
    ("D", 'd'),
    ("DH", 'D'),
    ("F", 'f'),
    ("G", 'g'),
    ("HH", 'h'),
    ("JH", 'J'),
    ("K", 'k'),
    ("L", 'l'),
    ("M", 'm'),
    ("N", 'n'),
    ("NG", 'G'),
    ("P", 'p'),
    ("R", 'r'),
    ("S", 's'),
    ("SH", 'S'),
    ("T", 't'),
    ("TH", 'T'),
    ("V", 'v'),
    ("W", 'w'),
    ("Y", 'y'),
    ("Z", 'z'),
    ("ZH", 'Z'),
];

/// One-character form of an ARPAbet symbol (without stress digit)
pub fn to_single_char(symbol: &str) -> Option<char> {
    TABLE.iter().find(|(s, _)| *s == symbol).map(|&(_, c)| c)
}

/// ARPAbet symbol for a one-character form
pub fn from_single_char(c: char) -> Option<&'static str> {
    TABLE.iter().find(|(_, ch)| *ch == c).map(|&(s, _)| s)
}

impl Lexicon {
    /// The word's pronunciation with one character per phone
    ///
    /// `None` if the word is not in the lexicon or uses a phone outside the table.
    pub fn compact_transcription(&self, word: &str) -> Option<String> {
        self.phones_with_stress(word)?
            .iter()
            .map(|phone| to_single_char(&phone.symbol))
            .collect()
    }
}
