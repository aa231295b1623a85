//! USB HID keycodes used by the macropad.
//! See USB HID Usage Tables, Keyboard/Keypad Page (0x07).

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Keycode {
    // Letters
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,

    // Numbers
    N1 = 0x1E,
    N2 = 0x1F,
    N3 = 0x20,
    N4 = 0x21,
    N5 = 0x22,
    N6 = 0x23,
    N7 = 0x24,
    N8 = 0x25,
    N9 = 0x26,
    N0 = 0x27,

    // Control keys
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    LBracket = 0x2F,
    RBracket = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Grave = 0x35,
    Comma = 0x36,
    Dot = 0x37,
    Slash = 0x38,

    // Function keys
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,

    // Keypad
    KpSlash = 0x54,
    KpAsterisk = 0x55,
    KpMinus = 0x56,
    KpPlus = 0x57,
    KpEnter = 0x58,
    Kp1 = 0x59,
    Kp2 = 0x5A,
    Kp3 = 0x5B,
    Kp4 = 0x5C,
    Kp5 = 0x5D,
    Kp6 = 0x5E,
    Kp7 = 0x5F,
    Kp8 = 0x60,
    Kp9 = 0x61,
    Kp0 = 0x62,
    KpDot = 0x63,

    // Media (keyboard page aliases)
    Mute = 0x7F,
    VolumeUp = 0x80,
    VolumeDown = 0x81,

    // Modifiers
    LCtrl = 0xE0,
    LShift = 0xE1,
    LAlt = 0xE2,
    LGui = 0xE3,
    RCtrl = 0xE4,
    RShift = 0xE5,
    RAlt = 0xE6,
    RGui = 0xE7,
}

impl Keycode {
    /// Raw HID usage id
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Check if this keycode is a modifier (LCtrl..RGui).
    pub const fn is_modifier(self) -> bool {
        let v = self as u8;
        v >= 0xE0 && v <= 0xE7
    }

    /// Keycode and shift state that type `ch` on a US layout.
    pub const fn from_ascii(ch: char) -> Option<(Keycode, bool)> {
        use Keycode::*;

        const LETTERS: [Keycode; 26] = [
            A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
        ];
        const DIGITS: [Keycode; 10] = [N0, N1, N2, N3, N4, N5, N6, N7, N8, N9];

        let found = match ch {
            'a'..='z' => (LETTERS[ch as usize - 'a' as usize], false),
            'A'..='Z' => (LETTERS[ch as usize - 'A' as usize], true),
            '0'..='9' => (DIGITS[ch as usize - '0' as usize], false),
            '\n' => (Enter, false),
            '\t' => (Tab, false),
            ' ' => (Space, false),
            '-' => (Minus, false),
            '_' => (Minus, true),
            '=' => (Equal, false),
            '+' => (Equal, true),
            '[' => (LBracket, false),
            '{' => (LBracket, true),
            ']' => (RBracket, false),
            '}' => (RBracket, true),
            '\\' => (Backslash, false),
            '|' => (Backslash, true),
            ';' => (Semicolon, false),
            ':' => (Semicolon, true),
            '\'' => (Quote, false),
            '"' => (Quote, true),
            '`' => (Grave, false),
            '~' => (Grave, true),
            ',' => (Comma, false),
            '<' => (Comma, true),
            '.' => (Dot, false),
            '>' => (Dot, true),
            '/' => (Slash, false),
            '?' => (Slash, true),
            '!' => (N1, true),
            '@' => (N2, true),
            '#' => (N3, true),
            '$' => (N4, true),
            '%' => (N5, true),
            '^' => (N6, true),
            '&' => (N7, true),
            '*' => (N8, true),
            '(' => (N9, true),
            ')' => (N0, true),
            _ => return None,
        };
        Some(found)
    }
}
