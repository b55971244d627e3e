use std::fmt;

use crate::shell::shell_quote;
use crate::template::ReattachTemplate;
use crate::tmux::SessionRecord;

/// Label shown when tmux has no sessions
pub const NO_SESSIONS: &str = "no sessions";

/// One entry in the pipe menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    /// Shell command line run by the `Execute` action, if any
    pub command: Option<String>,
}

/// A complete `<openbox_pipe_menu>` document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuDocument {
    pub items: Vec<MenuItem>,
}

impl MenuDocument {
    /// Single inert item, used for "no sessions" and for errors
    pub fn message(label: impl Into<String>) -> Self {
        Self {
            items: vec![MenuItem {
                label: label.into(),
                command: None,
            }],
        }
    }

    /// One reattach item per session, in listing order
    pub fn render(sessions: &[SessionRecord], template: &ReattachTemplate) -> Self {
        if sessions.is_empty() {
            return Self::message(NO_SESSIONS);
        }

        let items = sessions
            .iter()
            .map(|session| MenuItem {
                label: session_label(session),
                // Openbox splits this with a shell-argument parser, so the name must be quoted
                command: Some(template.substitute(&shell_quote(&session.name))),
            })
            .collect();

        Self { items }
    }
}

fn session_label(session: &SessionRecord) -> String {
    let mut label = format!("{} started at {}", session.name, session.created_at_local());
    if session.attached {
        label.push_str(" (attached)");
    }
    label
}

impl fmt::Display for MenuDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<openbox_pipe_menu>")?;
        for item in &self.items {
            write!(f, "<item label=\"{}\"", escape_attr(&item.label))?;
            match &item.command {
                Some(command) => write!(
                    f,
                    "><action name=\"Execute\"><command>{}</command></action></item>",
                    escape_text(command)
                )?,
                None => f.write_str(" />")?,
            }
        }
        f.write_str("</openbox_pipe_menu>")
    }
}

/// Characters XML 1.0 does not allow anywhere in a document
fn is_xml_char(c: char) -> bool {
    !matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

fn escape_text(s: &str) -> String {
    s.chars()
        .filter(|&c| is_xml_char(c))
        .collect::<String>()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#09;")
}
