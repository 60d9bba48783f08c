//! Built-in shell commands.

use super::Shell;
use crate::allocator;
use crate::arch::x86_64::vga::{self, Color};
use crate::arch::x86_64::{keyboard, timer};
use crate::println;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use myos_console::{HISTORY_SIZE, SCROLLBACK_LINES};
use myos_hal::Timer;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the commands.
    Help,
    /// Clear the screen. Scrollback is kept.
    Clear,
    /// Print the arguments.
    Echo {
        /// Arguments joined by single spaces.
        text: String,
    },
    /// List remembered commands, oldest first.
    History,
    /// Show terminal and memory statistics.
    Info,
    /// Show time since boot.
    Uptime,
    /// Change the output colors.
    Color {
        /// Foreground color.
        fg: Color,
        /// Background color; unchanged if absent.
        bg: Option<Color>,
    },
    /// Show scrollback state.
    Scrollback,
    /// Reset the machine.
    Reboot,
    /// Wait for a number of seconds.
    Sleep {
        /// Between 1 and [`MAX_SLEEP_SECS`].
        secs: u64,
    },
    /// Show heap usage.
    Meminfo,
    /// Known command with bad arguments; carries the usage text.
    Usage(&'static str),
    /// Anything else.
    Unknown(String),
}

const HELP: &[(&str, &str)] = &[
    ("help", "show this list"),
    ("clear", "clear the screen"),
    ("echo <text>", "print text"),
    ("history", "list previous commands"),
    ("info", "terminal and memory statistics"),
    ("uptime", "time since boot"),
    ("color <fg> [bg]", "set text colors, e.g. color yellow blue"),
    ("scrollback", "scrollback status"),
    ("reboot", "restart the machine"),
    ("sleep <secs>", "wait 1 to 60 seconds"),
    ("meminfo", "heap usage"),
];

/// Longest accepted `sleep`.
pub const MAX_SLEEP_SECS: u64 = 60;

const COLOR_USAGE: &str = "Usage: color <fg> [bg]
Colors: black blue green cyan red magenta brown light_gray dark_gray
        light_blue light_green light_cyan light_red pink yellow white";

const SLEEP_USAGE: &str = "Usage: sleep <seconds>, between 1 and 60";

impl Command {
    /// Parses a whitespace-separated command line.
    ///
    /// Returns `None` for blank lines. Parsing has no side effects; bad
    /// arguments become [`Command::Usage`].
    pub fn parse(line: &str) -> Option<Command> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let args: Vec<&str> = parts.collect();

        match name {
            "help" | "?" => Some(Command::Help),
            "clear" | "cls" => Some(Command::Clear),
            "echo" => Some(Command::Echo {
                text: args.join(" "),
            }),
            "history" => Some(Command::History),
            "info" => Some(Command::Info),
            "uptime" => Some(Command::Uptime),
            "color" => Some(parse_color(&args)),
            "scrollback" => Some(Command::Scrollback),
            "reboot" => Some(Command::Reboot),
            "sleep" => Some(parse_sleep(&args)),
            "meminfo" | "mem" => Some(Command::Meminfo),
            _ => Some(Command::Unknown(name.to_string())),
        }
    }

    /// Runs the command against the live console.
    pub fn execute(self, shell: &Shell) {
        log::debug!("shell: running {:?}", self);
        match self {
            Command::Help => cmd_help(),
            Command::Clear => vga::clear_screen(),
            Command::Echo { text } => println!("{}", text),
            Command::History => cmd_history(shell),
            Command::Info => cmd_info(shell),
            Command::Uptime => cmd_uptime(),
            Command::Color { fg, bg } => {
                let bg = bg.unwrap_or_else(|| vga::screen().lock().style().bg);
                vga::set_color(fg, bg);
            }
            Command::Scrollback => cmd_scrollback(),
            Command::Reboot => {
                println!("Rebooting...");
                log::info!("shell: reboot requested");
                crate::arch::reboot();
            }
            Command::Sleep { secs } => cmd_sleep(secs),
            Command::Meminfo => cmd_meminfo(),
            Command::Usage(text) => println!("{}", text),
            Command::Unknown(name) => {
                vga::write_color("Unknown command: ", Color::LightRed, Color::Black);
                vga::write_color(&name, Color::LightRed, Color::Black);
                println!();
            }
        }
    }
}

fn parse_color(args: &[&str]) -> Command {
    let fg = args.first().and_then(|name| Color::from_name(name));
    match (fg, args.get(1), args.len()) {
        (Some(fg), None, 1) => Command::Color { fg, bg: None },
        (Some(fg), Some(bg), 2) => match Color::from_name(bg) {
            Some(bg) => Command::Color { fg, bg: Some(bg) },
            None => Command::Usage(COLOR_USAGE),
        },
        _ => Command::Usage(COLOR_USAGE),
    }
}

fn parse_sleep(args: &[&str]) -> Command {
    match args {
        [secs] => match secs.parse::<u64>() {
            Ok(secs) if (1..=MAX_SLEEP_SECS).contains(&secs) => Command::Sleep { secs },
            _ => Command::Usage(SLEEP_USAGE),
        },
        _ => Command::Usage(SLEEP_USAGE),
    }
}

fn cmd_help() {
    println!("Commands:");
    for (usage, what) in HELP {
        vga::write_color("  ", Color::White, Color::Black);
        vga::write_color(usage, Color::Yellow, Color::Black);
        println!("{:width$}{}", "", what, width = 18usize.saturating_sub(usage.len()));
    }
    println!("Keys: Up/Down history, Left/Right/Home/End move, PgUp/PgDn or Ctrl+Up/Down scroll");
}

fn cmd_history(shell: &Shell) {
    let history = shell.history();
    if history.is_empty() {
        println!("(no history)");
        return;
    }
    for (n, line) in history.iter().enumerate() {
        println!("{:>3}  {}", n + 1, line);
    }
}

fn cmd_info(shell: &Shell) {
    let (retained, active, offset) = {
        let screen = vga::screen().lock();
        (
            screen.retained_rows(),
            screen.is_scrollback_active(),
            screen.scroll_offset(),
        )
    };
    let (used, free) = allocator::usage();

    println!("MyOS v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "  scrollback   {} ({}/{} rows, offset {})",
        if active { "on" } else { "off" },
        retained,
        SCROLLBACK_LINES,
        offset
    );
    println!("  history      {}/{} entries", shell.history().len(), HISTORY_SIZE);
    println!("  keys dropped {}", keyboard::KEYBOARD.dropped());
    println!("  modifiers    {:?}", keyboard::KEYBOARD.modifiers());
    println!("  heap         {} B used, {} B free", used, free);
    println!("  uptime       {} s", timer::uptime_secs(&timer::Pit));
}

fn cmd_sleep(secs: u64) {
    crate::print!("Sleeping for {} seconds...", secs);
    timer::sleep_secs(&timer::Pit, secs);
    vga::write_color(" Done!", Color::LightGreen, Color::Black);
    println!();
}

fn cmd_meminfo() {
    let (used, free) = allocator::usage();
    vga::write_color("Heap", Color::Yellow, Color::Black);
    println!();
    println!("  total  {:>7} B", allocator::HEAP_SIZE);
    println!("  used   {:>7} B", used);
    println!("  free   {:>7} B", free);
}

fn cmd_uptime() {
    let secs = timer::uptime_secs(&timer::Pit);
    println!(
        "up {}:{:02}:{:02} ({} ticks)",
        secs / 3600,
        secs / 60 % 60,
        secs % 60,
        timer::Pit.current_ticks()
    );
}

fn cmd_scrollback() {
    let (active, retained, offset) = {
        let screen = vga::screen().lock();
        (
            screen.is_scrollback_active(),
            screen.retained_rows(),
            screen.scroll_offset(),
        )
    };
    if !active {
        println!("Scrollback inactive");
        return;
    }
    println!(
        "Scrollback: {} of {} rows retained, viewing offset {}",
        retained, SCROLLBACK_LINES, offset
    );
    println!("Use PgUp/PgDn or Ctrl+Up/Ctrl+Down at the prompt to page.");
}
