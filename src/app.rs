use crate::error::Error;
use crate::menu::{MenuDocument, NO_SESSIONS};
use crate::template::TemplateResolver;
use crate::tmux::{parse_sessions, CommandRunner, TmuxClient};

/// One run of the pipe menu: list, parse, resolve, render
pub struct App<R> {
    client: TmuxClient<R>,
    resolver: TemplateResolver,
}

impl<R: CommandRunner> App<R> {
    pub fn new(client: TmuxClient<R>, resolver: TemplateResolver) -> Self {
        Self { client, resolver }
    }

    /// Build the session menu, stopping at the first failure
    pub fn build_menu(&self) -> Result<MenuDocument, Error> {
        let output = self.client.list_sessions()?;
        let sessions = parse_sessions(&output)?;
        tracing::debug!(count = sessions.len(), "parsed tmux sessions");

        // No template needed when there is nothing to attach to
        if sessions.is_empty() {
            return Ok(MenuDocument::message(NO_SESSIONS));
        }

        let template = self.resolver.resolve()?;
        tracing::debug!(template = template.as_str(), "rendering session menu");
        Ok(MenuDocument::render(&sessions, &template))
    }

    /// The menu to show, with any failure turned into a one-item error menu
    pub fn menu(&self) -> MenuDocument {
        self.build_menu().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "rendering error menu");
            MenuDocument::message(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuItem;
    use crate::template::{ConfigError, TemplateSource};
    use crate::tmux::RawOutput;
    use chrono::{Local, TimeZone};
    use std::io;

    struct MockRunner(io::Result<RawOutput>);

    impl CommandRunner for MockRunner {
        fn run(&self, _program: &str, _args: &[&str]) -> io::Result<RawOutput> {
            match &self.0 {
                Ok(output) => Ok(output.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    struct Fixed(Option<&'static str>);

    impl TemplateSource for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn resolve(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    struct Unreachable;

    impl TemplateSource for Unreachable {
        fn name(&self) -> &'static str {
            "unreachable"
        }

        fn resolve(&self) -> Option<String> {
            panic!("template resolved for an empty listing")
        }
    }

    fn make_app(result: io::Result<RawOutput>, source: Box<dyn TemplateSource>) -> App<MockRunner> {
        App::new(
            TmuxClient::with_runner(MockRunner(result)),
            TemplateResolver::new(vec![source]),
        )
    }

    fn exited(code: i32, stdout: &str, stderr: &str) -> io::Result<RawOutput> {
        Ok(RawOutput {
            success: code == 0,
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        })
    }

    fn local(secs: i64) -> String {
        Local
            .timestamp_opt(secs, 0)
            .unwrap()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    }

    #[test]
    fn test_two_sessions() {
        let app = make_app(
            exited(0, "0 1700000000 work\n1 1700000100 chat\n", ""),
            Box::new(Fixed(Some("xterm -e tmux attach -d -t %s"))),
        );

        let menu = app.menu();
        assert_eq!(
            menu.items,
            vec![
                MenuItem {
                    label: format!("work started at {}", local(1_700_000_000)),
                    command: Some("xterm -e tmux attach -d -t work".to_string()),
                },
                MenuItem {
                    label: format!("chat started at {} (attached)", local(1_700_000_100)),
                    command: Some("xterm -e tmux attach -d -t chat".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_no_sessions_skips_template() {
        let app = make_app(exited(0, "", ""), Box::new(Unreachable));
        let menu = app.menu();
        assert_eq!(menu, MenuDocument::message("no sessions"));
        assert_eq!(
            menu.to_string(),
            "<openbox_pipe_menu><item label=\"no sessions\" /></openbox_pipe_menu>"
        );

        let app = make_app(
            exited(1, "", "no server running on /tmp/tmux-1000/default\n"),
            Box::new(Unreachable),
        );
        assert_eq!(app.menu(), MenuDocument::message("no sessions"));
    }

    #[test]
    fn test_command_failure_becomes_error_item() {
        let app = make_app(exited(1, "", "some error\n"), Box::new(Unreachable));
        let menu = app.menu();

        assert_eq!(menu.items.len(), 1);
        assert!(menu.items[0].command.is_none());
        assert!(menu.items[0].label.contains("command failed"));
        assert!(menu.items[0].label.contains("some error"));
    }

    #[test]
    fn test_spawn_failure_becomes_error_item() {
        let app = make_app(
            Err(io::Error::new(io::ErrorKind::NotFound, "no tmux here")),
            Box::new(Unreachable),
        );
        let menu = app.menu();
        assert_eq!(menu.items.len(), 1);
        assert!(menu.items[0].label.contains("no tmux here"));
    }

    #[test]
    fn test_malformed_line_discards_listing() {
        let app = make_app(
            exited(0, "0 1700000000 work\nnot a session\n", ""),
            Box::new(Fixed(Some("xterm -e tmux attach -d -t %s"))),
        );
        assert_eq!(
            app.menu(),
            MenuDocument::message("malformed session line: not a session")
        );
    }

    #[test]
    fn test_missing_terminal_becomes_error_item() {
        let app = make_app(exited(0, "0 1700000000 work\n", ""), Box::new(Fixed(None)));
        assert!(matches!(
            app.build_menu(),
            Err(Error::Config(ConfigError::NoTerminalFound))
        ));
        assert_eq!(app.menu(), MenuDocument::message("no terminal emulator found"));
    }
}
