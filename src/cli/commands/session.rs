//! Session command implementation.

use super::Context;
use crate::cli::args::{OutputFormat, SessionCommands};
use crate::error::FrontlineError;
use crate::features::session::{AuthSession, Role};
use crate::output::format_session;

/// Execute session subcommands.
///
/// # Errors
///
/// Returns `FrontlineError::Auth` for an unknown role.
pub fn session(ctx: &Context, cmd: SessionCommands, format: OutputFormat) -> Result<String, FrontlineError> {
    let mut session = AuthSession::restore(ctx.store.clone());

    match cmd {
        SessionCommands::Show => {},
        SessionCommands::Login { role } => session.login(Role::parse(&role)?),
        SessionCommands::Logout => session.logout(),
    }

    format_session(session.role(), format)
}
