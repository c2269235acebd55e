//! Leader-only textual diagnostics with optional ANSI styling.

use crate::parallel::ExecutionContext;

/// Foreground colours understood by [`info_out`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colour {
    Red,
    Yellow,
    Green,
    Blue,
    Purple,
    Orange,
}

impl Colour {
    fn code(self) -> &'static str {
        match self {
            Colour::Red => "\x1b[91m",
            Colour::Yellow => "\x1b[93m",
            Colour::Green => "\x1b[92m",
            Colour::Blue => "\x1b[94m",
            Colour::Purple => "\x1b[95m",
            Colour::Orange => "\x1b[33m",
        }
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const UNDERLINE: &str = "\x1b[4m";

/// How a console message is decorated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    pub colour: Option<Colour>,
    pub bold: bool,
    pub underline: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        colour: None,
        bold: false,
        underline: false,
    };

    pub fn colour(colour: Colour) -> Self {
        Self {
            colour: Some(colour),
            ..Self::PLAIN
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

/// Wrap `msg` in the escape sequences for `style`.
pub fn styled(msg: &str, style: Style) -> String {
    let mut out = match style.colour {
        Some(c) => format!("{}{msg}{RESET}", c.code()),
        None => msg.to_string(),
    };
    if style.bold {
        out = format!("{BOLD}{out}{RESET}");
    }
    if style.underline {
        out = format!("{UNDERLINE}{out}{RESET}");
    }
    out
}

/// Print a message on the leader only. Other workers stay silent.
///
/// The plain text is also emitted as a `tracing` event so that log
/// collectors see it without escape codes.
pub fn info_out(ctx: ExecutionContext, msg: &str, style: Style) {
    if !ctx.is_leader() {
        return;
    }
    tracing::info!(target: "peryton::console", "{msg}");
    println!("{}", styled(msg, style));
}
