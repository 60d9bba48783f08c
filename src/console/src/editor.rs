//! Line editor.
//!
//! Reads keys until Enter, editing the line in place on the [`Screen`].
//! The buffer always matches what is shown: typing in the middle of the
//! line inserts and redraws the tail, Backspace removes the character
//! before the cursor.
//!
//! | Key             | Effect                                          |
//! |-----------------|-------------------------------------------------|
//! | Backspace       | erase one character                             |
//! | Ctrl+Backspace  | erase the whole line                            |
//! | Left / Right    | move one character                              |
//! | Ctrl+Left, Home | jump to the start of the line                   |
//! | Ctrl+Right, End | jump to the recorded end of the line            |
//! | Up / Down       | walk the command history                        |
//! | Ctrl+Up/Down    | page the view through scrollback                |
//! | PgUp / PgDn     | same as Ctrl+Up/Down                            |

use crate::color::Cell;
use crate::history::History;
use crate::key::Key;
use crate::screen::Screen;
use crate::SCREEN_WIDTH;
use alloc::string::String;
use alloc::vec::Vec;
use myos_hal::TextBuffer;

const BACKSPACE: u8 = 0x08;

/// Where the line editor gets its keys from.
pub trait KeySource {
    /// Returns the next key, waiting as long as it takes.
    fn next_key(&mut self) -> Key;

    /// Returns true while ctrl is held.
    fn ctrl_held(&self) -> bool;
}

/// State of one line read.
struct Session<'a, B> {
    screen: &'a mut Screen<B>,
    buf: String,
    pos: usize,
    /// Longest line accepted, in characters.
    limit: usize,
    /// Screen position of the first character.
    origin: (usize, usize),
    /// Grid scroll count when `origin` was last adjusted.
    scrolls: u64,
}

impl<'a, B: TextBuffer> Session<'a, B> {
    fn new(screen: &'a mut Screen<B>, max_len: usize) -> Self {
        let origin = screen.cursor();
        let scrolls = screen.scrolls();
        Self {
            screen,
            buf: String::new(),
            pos: 0,
            limit: max_len.saturating_sub(1),
            origin,
            scrolls,
        }
    }

    fn has_room(&self) -> bool {
        self.buf.len() < self.limit
    }

    fn next_key<K: KeySource + ?Sized>(&mut self, keys: &mut K) -> Key {
        self.screen.invert_cursor_cell();
        let key = keys.next_key();
        self.screen.invert_cursor_cell();
        key
    }

    /// Screen position of the first character, following grid scrolls.
    fn origin(&mut self) -> (usize, usize) {
        let scrolled = self.screen.scrolls() - self.scrolls;
        if scrolled > 0 {
            self.origin.1 = self.origin.1.saturating_sub(scrolled as usize);
            self.scrolls = self.screen.scrolls();
        }
        self.origin
    }

    /// Screen position of buffer index `pos`.
    fn locate(&mut self, pos: usize) -> (usize, usize) {
        let (ocol, orow) = self.origin();
        let cell = ocol + pos;
        (cell % SCREEN_WIDTH, orow + cell / SCREEN_WIDTH)
    }

    fn move_to(&mut self, pos: usize) {
        let (col, row) = self.locate(pos);
        self.screen.set_cursor(col, row);
    }

    fn insert(&mut self, c: u8) {
        let old_len = self.buf.len();
        self.buf.insert(self.pos, c as char);
        self.pos += 1;
        if self.pos == self.buf.len() {
            self.screen.put_char(c);
        } else {
            self.redraw_from(self.pos - 1, old_len);
        }
    }

    fn backspace(&mut self) {
        if self.pos == 0 {
            return;
        }
        let old_len = self.buf.len();
        self.pos -= 1;
        self.buf.remove(self.pos);
        self.redraw_from(self.pos, old_len);
    }

    /// Erases the whole line. Cells left of the origin survive.
    fn clear(&mut self) {
        let (ocol, orow) = self.origin();
        let prefix: Vec<Cell> = (0..ocol)
            .filter_map(|col| self.screen.cell_at(col, orow))
            .collect();
        let (_, last_row) = self.locate(self.buf.len());
        for row in orow..=last_row {
            self.screen.set_cursor(0, row);
            self.screen.clear_current_line();
        }

        self.screen.set_cursor(0, orow);
        let saved = self.screen.style();
        for cell in prefix {
            self.screen.set_color(cell.style.fg, cell.style.bg);
            self.screen.put_char(cell.ch);
        }
        self.screen.set_color(saved.fg, saved.bg);

        self.buf.clear();
        self.pos = 0;
        self.move_to(0);
    }

    /// Redraws the buffer from `from` onward, blanking what is left of a
    /// line that used to be `old_len` long.
    fn redraw_from(&mut self, from: usize, old_len: usize) {
        self.move_to(from);
        for c in self.buf[from..].bytes() {
            self.screen.put_char(c);
        }
        for pos in (self.buf.len()..old_len).rev() {
            self.erase_at(pos);
        }
        self.move_to(self.pos);
    }

    fn erase_at(&mut self, pos: usize) {
        let (col, row) = self.locate(pos + 1);
        if col > 0 {
            self.screen.set_cursor(col, row);
            self.screen.put_char(BACKSPACE);
        } else if row > 0 {
            // Backspace does not cross rows.
            self.screen.set_cursor(SCREEN_WIDTH - 1, row - 1);
            self.screen.put_char(b' ');
        }
    }

    /// Buffer position of the end of the line as the screen recorded it.
    fn line_end(&mut self) -> usize {
        let (ocol, orow) = self.origin();
        let (_, row) = self.locate(self.buf.len());
        self.screen.set_cursor(0, row);
        let end = (row - orow) * SCREEN_WIDTH + self.screen.line_length();
        self.move_to(self.pos);
        end.saturating_sub(ocol).min(self.buf.len())
    }

    fn left(&mut self) {
        if self.pos > 0 {
            self.pos -= 1;
            self.move_to(self.pos);
        }
    }

    fn right(&mut self) {
        if self.pos < self.line_end() {
            self.pos += 1;
            self.move_to(self.pos);
        }
    }

    fn home(&mut self) {
        self.pos = 0;
        self.move_to(0);
    }

    fn end(&mut self) {
        self.pos = self.line_end();
        self.move_to(self.pos);
    }

    /// Replaces the line with `text`, cursor at its end.
    fn replace_line(&mut self, text: &str) {
        let (ocol, orow) = self.origin();
        self.screen.set_cursor(ocol, orow);
        let shown = self.screen.line_length().saturating_sub(ocol);
        let old_len = self.buf.len().max(shown);

        self.buf.clear();
        self.buf.extend(
            text.bytes()
                .filter(|c| (0x20..=0x7e).contains(c))
                .take(self.limit)
                .map(char::from),
        );
        self.pos = self.buf.len();
        self.redraw_from(0, old_len);
    }

    /// Echoes the terminating newline and hands the line over.
    fn finish(mut self) -> String {
        self.move_to(self.buf.len());
        self.screen.put_char(b'\n');
        self.buf
    }
}

/// Reads one line with editing, history recall and scrollback paging.
///
/// At most `max_len - 1` characters are accepted; the read ends early when
/// that many have been typed. The line is returned without its newline.
pub fn read_line<B, K>(
    screen: &mut Screen<B>,
    keys: &mut K,
    max_len: usize,
    history: &History,
) -> String
where
    B: TextBuffer,
    K: KeySource + ?Sized,
{
    let mut session = Session::new(screen, max_len);
    // Steps back into history; 0 while editing the live line.
    let mut back = 0;
    let mut draft = String::new();

    while session.has_room() {
        let key = session.next_key(keys);
        let ctrl = keys.ctrl_held();
        match key {
            Key::Newline => break,
            Key::Char(c) => {
                // The draft is abandoned; what is on screen is the line now.
                back = 0;
                session.insert(c);
            }
            Key::Backspace if ctrl => session.clear(),
            Key::Backspace => session.backspace(),
            Key::Up if ctrl => session.screen.scroll_view(1),
            Key::Down if ctrl => session.screen.scroll_view(-1),
            Key::PageUp => session.screen.scroll_view(1),
            Key::PageDown => session.screen.scroll_view(-1),
            Key::Up => {
                if history.is_empty() || back >= history.len() {
                    continue;
                }
                if back == 0 {
                    draft.clone_from(&session.buf);
                }
                back += 1;
                if let Some(entry) = history.recall(back) {
                    session.replace_line(entry);
                }
            }
            Key::Down => {
                if back == 0 {
                    continue;
                }
                back -= 1;
                if back == 0 {
                    session.replace_line(&draft);
                } else if let Some(entry) = history.recall(back) {
                    session.replace_line(entry);
                }
            }
            Key::Left if ctrl => session.home(),
            Key::Right if ctrl => session.end(),
            Key::Home => session.home(),
            Key::End => session.end(),
            Key::Left => session.left(),
            Key::Right => session.right(),
            Key::Delete => {}
        }
    }

    session.finish()
}

/// Reads one line accepting only characters, Backspace and Enter.
pub fn read_line_plain<B, K>(screen: &mut Screen<B>, keys: &mut K, max_len: usize) -> String
where
    B: TextBuffer,
    K: KeySource + ?Sized,
{
    let mut session = Session::new(screen, max_len);
    while session.has_room() {
        match session.next_key(keys) {
            Key::Newline => break,
            Key::Char(c) => session.insert(c),
            Key::Backspace => session.backspace(),
            _ => {}
        }
    }
    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::testutil::{MockBuffer, ScriptedKeys};
    use crate::{MAX_LINE_LENGTH, SCREEN_HEIGHT};
    use proptest::prelude::*;

    fn prompted_screen() -> Box<Screen<MockBuffer>> {
        let mut screen = Box::new(Screen::new(MockBuffer::new()));
        screen.clear();
        screen.write_color("> ", Color::LightCyan, Color::Black);
        screen
    }

    fn history(entries: &[&str]) -> History {
        let mut history = History::new();
        for entry in entries {
            history.push(entry);
        }
        history
    }

    fn read(screen: &mut Screen<MockBuffer>, keys: ScriptedKeys, history: &History) -> String {
        let mut keys = keys;
        read_line(screen, &mut keys, MAX_LINE_LENGTH, history)
    }

    #[test]
    fn test_returns_typed_text() {
        let mut s = prompted_screen();
        let line = read(&mut s, ScriptedKeys::new().text("echo hi").enter(), &History::new());
        assert_eq!(line, "echo hi");
        assert_eq!(s.buffer().row_text(0), "> echo hi");
        assert_eq!(s.cursor(), (0, 1));
    }

    #[test]
    fn test_stops_at_length_limit() {
        let mut s = prompted_screen();
        let mut keys = ScriptedKeys::new().text("abcdefg");
        let line = read_line(&mut *s, &mut keys, 5, &History::new());
        assert_eq!(line, "abcd");
        assert_eq!(keys.remaining(), 3);
        assert_eq!(s.cursor(), (0, 1));
    }

    #[test]
    fn test_cursor_inversion_leaves_no_trace() {
        let mut s = prompted_screen();
        read(&mut s, ScriptedKeys::new().text("ab").key(Key::Left).enter(), &History::new());
        let cyan = u16::from(Color::LightCyan as u8) << 8;
        assert_eq!(s.buffer().cells[0] & 0xff00, cyan);
        for col in 2..SCREEN_WIDTH {
            assert_eq!(s.buffer().cells[col] & 0xff00, 0x0700);
        }
    }

    #[test]
    fn test_backspace_at_end() {
        let mut s = prompted_screen();
        let keys = ScriptedKeys::new().text("abc").key(Key::Backspace).enter();
        assert_eq!(read(&mut s, keys, &History::new()), "ab");
        assert_eq!(s.buffer().row_text(0), "> ab");
    }

    #[test]
    fn test_backspace_on_empty_line_is_ignored() {
        let mut s = prompted_screen();
        let keys = ScriptedKeys::new().key(Key::Backspace).text("x").enter();
        assert_eq!(read(&mut s, keys, &History::new()), "x");
        assert_eq!(s.buffer().row_text(0), "> x");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut s = prompted_screen();
        let keys = ScriptedKeys::new()
            .text("ac")
            .key(Key::Left)
            .text("b")
            .enter();
        assert_eq!(read(&mut s, keys, &History::new()), "abc");
        assert_eq!(s.buffer().row_text(0), "> abc");
    }

    #[test]
    fn test_backspace_in_middle() {
        let mut s = prompted_screen();
        let keys = ScriptedKeys::new()
            .text("abxc")
            .key(Key::Left)
            .key(Key::Backspace)
            .enter();
        assert_eq!(read(&mut s, keys, &History::new()), "abc");
        assert_eq!(s.buffer().row_text(0), "> abc");
    }

    #[test]
    fn test_ctrl_backspace_erases_line_but_not_prompt() {
        let mut s = prompted_screen();
        let keys = ScriptedKeys::new()
            .text("hello")
            .ctrl(Key::Backspace)
            .text("hi")
            .enter();
        assert_eq!(read(&mut s, keys, &History::new()), "hi");
        assert_eq!(s.buffer().row_text(0), "> hi");
        assert_eq!(
            s.cell_at(0, 0).map(|c| c.style.fg),
            Some(Color::LightCyan)
        );
    }

    #[test]
    fn test_line_jumps() {
        let mut s = prompted_screen();
        let keys = ScriptedKeys::new()
            .text("world")
            .key(Key::Home)
            .text("hello ")
            .key(Key::End)
            .text("!")
            .ctrl(Key::Left)
            .text("[")
            .ctrl(Key::Right)
            .text("]")
            .enter();
        assert_eq!(read(&mut s, keys, &History::new()), "[hello world!]");
    }

    #[test]
    fn test_arrows_stay_inside_line() {
        let mut s = prompted_screen();
        let keys = ScriptedKeys::new()
            .text("ab")
            .key(Key::Right)
            .text("c")
            .key(Key::Left)
            .key(Key::Left)
            .key(Key::Left)
            .key(Key::Left)
            .text("_")
            .key(Key::Right)
            .text("-")
            .enter();
        assert_eq!(read(&mut s, keys, &History::new()), "_a-bc");
    }

    #[test]
    fn test_history_up_then_down_restores_draft() {
        let mut s = prompted_screen();
        let history = history(&["first", "second"]);
        let keys = ScriptedKeys::new()
            .text("draft")
            .key(Key::Up)
            .key(Key::Down)
            .enter();
        assert_eq!(read(&mut s, keys, &history), "draft");
        assert_eq!(s.buffer().row_text(0), "> draft");
    }

    #[test]
    fn test_history_walk_is_bounded() {
        let mut s = prompted_screen();
        let history = history(&["first", "a much longer second entry"]);
        let keys = ScriptedKeys::new()
            .key(Key::Up)
            .key(Key::Up)
            .key(Key::Up)
            .enter();
        assert_eq!(read(&mut s, keys, &history), "first");
        assert_eq!(s.buffer().row_text(0), "> first");

        let keys = ScriptedKeys::new()
            .key(Key::Up)
            .key(Key::Up)
            .key(Key::Down)
            .key(Key::Down)
            .key(Key::Down)
            .enter();
        assert_eq!(read(&mut s, keys, &history), "");
    }

    #[test]
    fn test_history_keys_without_history_are_ignored() {
        let mut s = prompted_screen();
        let keys = ScriptedKeys::new()
            .text("ls")
            .key(Key::Up)
            .key(Key::Down)
            .enter();
        assert_eq!(read(&mut s, keys, &History::new()), "ls");
    }

    #[test]
    fn test_typing_during_history_walk_keeps_recalled_text() {
        let mut s = prompted_screen();
        let history = history(&["first", "second"]);
        let keys = ScriptedKeys::new()
            .text("dr")
            .key(Key::Up)
            .text("x")
            .key(Key::Down)
            .enter();
        assert_eq!(read(&mut s, keys, &history), "secondx");
        assert_eq!(s.buffer().row_text(0), "> secondx");
    }

    #[test]
    fn test_scrollback_keys_page_the_view() {
        let mut s = prompted_screen();
        s.activate_scrollback();
        for i in 0..30 {
            s.write(&format!("L{}\n", i));
        }
        s.write("> ");
        let keys = ScriptedKeys::new()
            .ctrl(Key::Up)
            .key(Key::PageUp)
            .ctrl(Key::Down)
            .text("ok")
            .enter();
        assert_eq!(read(&mut s, keys, &History::new()), "ok");
        assert!(s.is_at_bottom());
        assert_eq!(s.buffer().row_text(SCREEN_HEIGHT - 2), "> ok");
    }

    #[test]
    fn test_wrapped_line_edits_after_scroll() {
        let mut s = prompted_screen();
        for _ in 0..SCREEN_HEIGHT - 1 {
            s.write("\n");
        }
        s.write("> ");
        let long = "y".repeat(SCREEN_WIDTH + 10);
        let keys = ScriptedKeys::new()
            .text(&long)
            .key(Key::Home)
            .text("X")
            .enter();
        let line = read(&mut s, keys, &History::new());
        assert_eq!(line, format!("X{}", long));
        assert!(s.scrolls() >= 2);
        assert!(s.buffer().row_text(SCREEN_HEIGHT - 3).starts_with("> Xyyy"));
        assert_eq!(s.buffer().row_text(SCREEN_HEIGHT - 2), "y".repeat(13));
    }

    #[test]
    fn test_plain_read_ignores_navigation() {
        let mut s = prompted_screen();
        let mut keys = ScriptedKeys::new()
            .text("ab")
            .key(Key::Left)
            .key(Key::Up)
            .ctrl(Key::Backspace)
            .text("c")
            .enter();
        let line = read_line_plain(&mut *s, &mut keys, MAX_LINE_LENGTH);
        assert_eq!(line, "ac");
        assert_eq!(s.buffer().row_text(0), "> ac");
    }

    proptest! {
        #[test]
        fn prop_printable_input_round_trips(text in "[ -~]{0,254}") {
            let mut s = prompted_screen();
            let line = read(&mut s, ScriptedKeys::new().text(&text).enter(), &History::new());
            prop_assert_eq!(line, text);
        }
    }
}
