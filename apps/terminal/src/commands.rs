//! Line commands typed into the terminal host.

use anyhow::{anyhow, bail, Context, Result};
use shared::domain::{FieldId, Key, KeyPress};

pub enum LoginCommand {
    Focus(FieldId),
    Blur(FieldId),
    /// Appends text one keystroke at a time.
    Type { field: FieldId, text: String },
    /// Replaces the whole value, like a paste.
    Set { field: FieldId, text: String },
    Submit,
    Key(KeyPress),
    Leave,
    Show,
    Quit,
}

pub enum DashboardCommand {
    Increment(f64),
    Drift,
    Nav(String),
    Action { tab: Option<String>, page: Option<String> },
    Key(KeyPress),
    Logout,
    Show,
    Quit,
}

impl LoginCommand {
    pub fn name(&self) -> &'static str {
        match self {
            LoginCommand::Focus(_) => "focus",
            LoginCommand::Blur(_) => "blur",
            LoginCommand::Type { .. } => "type",
            LoginCommand::Set { .. } => "set",
            LoginCommand::Submit => "submit",
            LoginCommand::Key(_) => "key",
            LoginCommand::Leave => "leave",
            LoginCommand::Show => "show",
            LoginCommand::Quit => "quit",
        }
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (verb, rest) = split_verb(line);
        let command = match verb {
            "focus" => LoginCommand::Focus(parse_field(rest)?),
            "blur" => LoginCommand::Blur(parse_field(rest)?),
            "type" | "set" => {
                let (field, text) = split_verb(rest);
                let field = parse_field(field)?;
                let text = text.to_string();
                if verb == "type" {
                    LoginCommand::Type { field, text }
                } else {
                    LoginCommand::Set { field, text }
                }
            }
            "submit" => LoginCommand::Submit,
            "key" => LoginCommand::Key(parse_key(rest)?),
            "enter" => LoginCommand::Key(KeyPress::plain(Key::Enter)),
            "esc" => LoginCommand::Key(KeyPress::plain(Key::Escape)),
            "leave" => LoginCommand::Leave,
            "show" => LoginCommand::Show,
            "quit" | "exit" => LoginCommand::Quit,
            other => bail!("unknown login command '{other}'"),
        };
        Ok(command)
    }
}

impl DashboardCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardCommand::Increment(_) => "inc",
            DashboardCommand::Drift => "drift",
            DashboardCommand::Nav(_) => "nav",
            DashboardCommand::Action { .. } => "action",
            DashboardCommand::Key(_) => "key",
            DashboardCommand::Logout => "logout",
            DashboardCommand::Show => "show",
            DashboardCommand::Quit => "quit",
        }
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (verb, rest) = split_verb(line);
        let command = match verb {
            "inc" => DashboardCommand::Increment(
                rest.parse()
                    .with_context(|| format!("'{rest}' is not a number"))?,
            ),
            "drift" => DashboardCommand::Drift,
            "nav" if !rest.is_empty() => DashboardCommand::Nav(rest.to_string()),
            "action" => {
                let (tab, page) = split_verb(rest);
                DashboardCommand::Action {
                    tab: non_placeholder(tab),
                    page: non_placeholder(page),
                }
            }
            "key" => DashboardCommand::Key(parse_key(rest)?),
            "logout" => DashboardCommand::Logout,
            "show" => DashboardCommand::Show,
            "quit" | "exit" => DashboardCommand::Quit,
            other => bail!("unknown dashboard command '{other}'"),
        };
        Ok(command)
    }
}

fn split_verb(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (line, ""),
    }
}

/// `-` stands for an absent attribute.
fn non_placeholder(value: &str) -> Option<String> {
    match value.trim() {
        "" | "-" => None,
        value => Some(value.to_string()),
    }
}

fn parse_field(raw: &str) -> Result<FieldId> {
    Ok(raw.trim().parse::<FieldId>()?)
}

pub fn parse_key(raw: &str) -> Result<KeyPress> {
    let raw = raw.trim().to_ascii_lowercase();
    let mut press = KeyPress::plain(Key::Enter);
    let mut key = None;

    for part in raw.split('+') {
        match part {
            "ctrl" => press.ctrl = true,
            "shift" => press.shift = true,
            "alt" => press.alt = true,
            "enter" => key = Some(Key::Enter),
            "esc" | "escape" => key = Some(Key::Escape),
            single if single.chars().count() == 1 => key = single.chars().next().map(Key::Char),
            other => bail!("unknown key '{other}'"),
        }
    }

    press.key = key.ok_or_else(|| anyhow!("no key in '{raw}'"))?;
    Ok(press)
}
