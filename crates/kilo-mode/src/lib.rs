use nix::sys::termios::{LocalFlags, SetArg, Termios};

use kilo_common::TermiosExt;

#[derive(thiserror::Error, Debug)]
pub enum ModeError {
    #[error("standard input is not a terminal: {0}")]
    TerminalNotInteractive(#[source] std::io::Error),
    #[error("the terminal rejected raw mode: {0}")]
    ModeApplyFailed(#[source] std::io::Error),
    #[error("the terminal rejected its original mode: {0}")]
    RestoreFailed(#[source] std::io::Error),
}

/// `original` with echo and canonical input turned off, everything else left as is.
pub fn raw_attributes(original: &Termios) -> Termios {
    let mut raw = original.clone();
    raw.local_flags.remove(LocalFlags::ECHO | LocalFlags::ICANON);
    raw
}

/// A device held in raw mode. Dropping it puts the original attributes back.
///
/// Mode changes use `TCSAFLUSH`: queued output is sent first and unread input is discarded.
pub struct RawMode<D: TermiosExt> {
    device: D,
    original: Termios,
    active: bool,
}

impl<D: TermiosExt> RawMode<D> {
    pub fn enable(device: D) -> Result<Self, ModeError> {
        let original = device
            .get_termios()
            .map_err(ModeError::TerminalNotInteractive)?;

        device
            .set_termios(&raw_attributes(&original), SetArg::TCSAFLUSH)
            .map_err(ModeError::ModeApplyFailed)?;
        log::debug!("raw mode enabled");

        Ok(Self {
            device,
            original,
            active: true,
        })
    }

    /// Restores the attributes captured by [`RawMode::enable`]. Does nothing once it succeeded.
    pub fn disable(&mut self) -> Result<(), ModeError> {
        if !self.active {
            return Ok(());
        }

        self.device
            .set_termios(&self.original, SetArg::TCSAFLUSH)
            .map_err(ModeError::RestoreFailed)?;
        self.active = false;
        log::debug!("raw mode disabled");
        Ok(())
    }

    pub fn original(&self) -> &Termios {
        &self.original
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}

impl<D: TermiosExt> Drop for RawMode<D> {
    fn drop(&mut self) {
        if let Err(err) = self.disable() {
            log::warn!("{err}");
        }
    }
}
