// ── Device skins ──
//
// Two ways of drawing the same `SessionView` as plain text: a
// touchscreen smartphone dialog and a keypad feature phone with an LCD.
// Skins only draw; every decision about what the screen says was made
// by the session controller.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::screen::Screen;
use super::session::SessionView;
use crate::model::Language;

/// Inner width of the drawn display, in characters.
const WIDTH: usize = 28;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DeviceSkin {
    #[default]
    Touchscreen,
    FeaturePhone,
}

/// Handset chrome labels.
struct Chrome {
    loading: &'static str,
    dial_prompt: &'static str,
    input: &'static str,
    cancel: &'static str,
    clear: &'static str,
    select: &'static str,
    menu: &'static str,
}

fn chrome(lang: Language) -> Chrome {
    match lang {
        Language::En => Chrome {
            loading: "Loading...",
            dial_prompt: "Dial *808# for AgriConnect",
            input: "Input",
            cancel: "Cancel",
            clear: "Clear",
            select: "Select",
            menu: "Menu",
        },
        Language::Am => Chrome {
            loading: "በመጫን ላይ...",
            dial_prompt: "ለአግሪ-ኮኔክት *808# ይደውሉ",
            input: "ግብዓት",
            cancel: "ሰርዝ",
            clear: "አጥፋ",
            select: "ምረጥ",
            menu: "ማውጫ",
        },
    }
}

impl DeviceSkin {
    /// Draw `view`. `clock` is the status-bar time, e.g. `"09:41"`.
    pub fn draw(self, view: &SessionView, clock: &str) -> String {
        match self {
            Self::Touchscreen => touchscreen(view, clock),
            Self::FeaturePhone => feature_phone(view, clock),
        }
    }
}

fn pad(text: &str) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        text.chars().take(WIDTH).collect()
    } else {
        format!("{text}{}", " ".repeat(WIDTH - len))
    }
}

fn right(text: &str) -> String {
    let len = text.chars().count().min(WIDTH);
    format!("{}{text}", " ".repeat(WIDTH - len))
}

fn spread(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = WIDTH.saturating_sub(used).max(1);
    format!("{left}{}{right}", " ".repeat(gap))
}

/// Word-wrap one display line to the frame width.
fn wrap(line: &str) -> Vec<String> {
    if line.chars().count() <= WIDTH {
        return vec![line.to_owned()];
    }
    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > WIDTH && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    out.push(current);
    out
}

fn framed(rows: &[String], top: char, side: char) -> String {
    let border = top.to_string().repeat(WIDTH + 2);
    let mut out = String::new();
    let _ = writeln!(out, "{border}");
    for row in rows {
        let _ = writeln!(out, "{side}{}{side}", pad(row));
    }
    let _ = write!(out, "{border}");
    out
}

fn body_rows(text: &str) -> Vec<String> {
    text.lines().flat_map(wrap).collect()
}

fn touchscreen(view: &SessionView, clock: &str) -> String {
    let labels = chrome(view.language);
    let mut rows = vec![spread("EthioTel", &format!("4G {clock}")), String::new()];

    if !view.is_active {
        rows.push(right(&view.dial_buffer));
        rows.push(String::new());
        rows.push(labels.dial_prompt.into());
        rows.push(String::new());
        rows.push(spread("[Call]", if view.dial_buffer.is_empty() { "" } else { "[Del]" }));
        return framed(&rows, '-', '|');
    }

    if view.loading {
        rows.push("USSD code running...".into());
        return framed(&rows, '-', '|');
    }

    rows.push("USSD Response".into());
    rows.extend(body_rows(&view.text));
    if view.screen != Screen::Result {
        rows.push(String::new());
        if view.session_buffer.is_empty() {
            rows.push("_ Enter response...".into());
        } else {
            rows.push(format!("{}_", view.session_buffer));
        }
    }
    rows.push(String::new());
    rows.push(spread("[Cancel]", "[Send]"));
    framed(&rows, '-', '|')
}

fn feature_phone(view: &SessionView, clock: &str) -> String {
    let labels = chrome(view.language);
    let clock_col = (WIDTH / 2).saturating_sub(clock.chars().count() / 2);
    let status = format!("4G{}{clock}", " ".repeat(clock_col.saturating_sub(2)));
    let mut rows = vec![spread(&status, "85%")];

    if view.loading {
        rows.push(labels.loading.into());
    } else if view.is_active {
        rows.extend(body_rows(&view.text));
        rows.push(spread(&format!("{}:", labels.input), &format!("{}_", view.session_buffer)));
    } else {
        rows.push(String::new());
        rows.push(right(&view.dial_buffer));
        rows.push(labels.dial_prompt.into());
    }

    let (left_key, right_key) = if view.is_active {
        (labels.cancel, labels.select)
    } else {
        (labels.clear, labels.menu)
    };
    let mut out = framed(&rows, '=', '#');
    let _ = write!(out, "\n {}", spread(&format!("[{left_key}]"), &format!("[{right_key}]")));
    out
}
