use std::process::ExitCode;

use anyhow::{Context, Result};
use kilo_common::EchoExt;
use libc::c_int;
use stdfiles::{StdinError, StdinRaw};

pub mod stdfiles;

/// Exit status once the read loop is over.
///
/// After a trapped signal the terminal may already be gone (a hangup makes restoring fail with
/// EIO), so a failed restore is only logged and the status stays `128 + signo`.
fn exit_status(caught: Option<c_int>, restored: Result<(), StdinError>) -> Result<u8> {
    match caught {
        None => {
            restored.context("Leaving raw mode")?;
            Ok(0)
        }
        Some(signal) => {
            if let Err(err) = restored {
                log::warn!("couldn't leave raw mode after signal {signal}: {err}");
            }
            Ok((128 + signal) as u8)
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let mut stdin = StdinRaw::new().context("Entering raw mode")?;
    let mut stdout = std::io::stdout().lock();

    let stop = stdin
        .echo_until_sentinel(&mut stdout)
        .context("Reading from stdin")?;
    log::debug!("stopped: {stop:?}");

    let restored = stdin.restore();
    Ok(ExitCode::from(exit_status(stdin.caught_signal(), restored)?))
}
