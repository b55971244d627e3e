use std::io::{self, Write};

mod app;
mod error;
mod menu;
mod shell;
mod template;
mod tmux;

use app::App;
use template::{default_config_path, TemplateResolver};
use tmux::TmuxClient;

fn main() {
    // Initialize logging. Stdout belongs to Openbox, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let resolver = TemplateResolver::from_env(default_config_path(), std::env::var_os("PATH"));
    let app = App::new(TmuxClient::new(), resolver);
    let menu = app.menu();

    // Openbox ignores the exit status, so a failed write is only logged
    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", menu).and_then(|_| stdout.flush()) {
        tracing::error!(error = %e, "failed to write menu");
    }
}
