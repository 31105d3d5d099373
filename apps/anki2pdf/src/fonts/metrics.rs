//! Static advance-width tables for the PDF standard Helvetica family.
//!
//! Used when the external fonts are unavailable: the standard 14 fonts need no
//! embedding, so the only thing the layout engine needs is their widths.
//! Widths are in 1/1000 em (PDF glyph space), taken from the Adobe AFM files.
//! Tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

/// Width table and encoding data for one built-in face.
#[derive(Debug)]
pub struct BuiltinMetrics {
    /// PostScript name written as the PDF `BaseFont`.
    pub base_font: &'static str,
    widths: [u16; 95],
    /// Width of WinAnsi 0x95 (bullet).
    bullet_width: u16,
    /// Fallback width for Latin-1 characters outside ASCII.
    pub average_char_width: u16,
}

/// Byte substituted for characters WinAnsi cannot encode.
const REPLACEMENT: u8 = b'?';

impl BuiltinMetrics {
    /// Advance width of `c` in 1/1000 em after WinAnsi substitution.
    pub fn width(&self, c: char) -> u16 {
        match to_winansi(c) {
            Some(b @ 0x20..=0x7E) => self.widths[(b - 0x20) as usize],
            Some(0x95) => self.bullet_width,
            Some(0xA0) => self.widths[0],
            Some(_) => self.average_char_width,
            None => self.widths[(REPLACEMENT - 0x20) as usize],
        }
    }

    /// Encodes `text` as WinAnsi bytes, replacing unencodable characters with `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|c| to_winansi(c).unwrap_or(REPLACEMENT))
            .collect()
    }
}

/// Maps a character to its WinAnsiEncoding byte, if it has one.
pub fn to_winansi(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '€' => Some(0x80),
            '‚' => Some(0x82),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '‘' => Some(0x91),
            '’' => Some(0x92),
            '“' => Some(0x93),
            '”' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '™' => Some(0x99),
            _ => None,
        },
    }
}

/// Helvetica (regular).
pub static HELVETICA: BuiltinMetrics = BuiltinMetrics {
    base_font: "Helvetica",
    #[rustfmt::skip]
    widths: [
        // sp    !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    bullet_width: 350,
    average_char_width: 556,
};

/// Helvetica-Bold.
pub static HELVETICA_BOLD: BuiltinMetrics = BuiltinMetrics {
    base_font: "Helvetica-Bold",
    #[rustfmt::skip]
    widths: [
        // sp    !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    bullet_width: 350,
    average_char_width: 584,
};
