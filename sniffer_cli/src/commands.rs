//! Interactive commands read from stdin while a monitor runs.

use sniffer_traits::Setting;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Stop,
    Toggle,
    Quit,
    Stats,
    /// Store raw text for a live setting; parsing happens on the next tick.
    Set(Setting, String),
    /// Forget a live setting so the default applies again.
    Reset(Setting),
}

/// Parse one line. Blank lines yield `Ok(None)`.
///
/// Settings accept `w 0.6`, `w=0.6` or a bare `w` to reset.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(|c: char| c == '=' || c.is_whitespace()) {
        Some((h, r)) => (h.trim(), Some(r.trim())),
        None => (line, None),
    };

    let cmd = match (head.to_ascii_lowercase().as_str(), rest) {
        ("start", None) => Command::Start,
        ("stop", None) => Command::Stop,
        ("toggle", None) => Command::Toggle,
        ("quit" | "exit" | "q", None) => Command::Quit,
        ("stats", None) => Command::Stats,
        (key, value) => {
            let setting = Setting::from_key(key).ok_or_else(|| format!("unknown command: {line}"))?;
            match value {
                Some(v) if !v.is_empty() => Command::Set(setting, v.to_string()),
                _ => Command::Reset(setting),
            }
        }
    };
    Ok(Some(cmd))
}
