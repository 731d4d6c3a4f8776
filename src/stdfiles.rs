use std::{
    io::{self, Read},
    os::fd::{AsRawFd, RawFd},
};

use libc::c_int;
use mio::{unix::SourceFd, Events, Interest, Poll, Token};
use nix::{
    errno::Errno,
    fcntl::{fcntl, FcntlArg, OFlag},
    unistd,
};
use signal_hook::consts as sigconsts;
use signal_hook_mio::v0_8::Signals;

use kilo_mode::{ModeError, RawMode};

const STDIN: Token = Token(0);
const SIGNALS: Token = Token(1);

/// Signals that end the read loop instead of killing the process in raw mode.
pub const TRAPPED_SIGNALS: [c_int; 4] = [
    sigconsts::SIGHUP,
    sigconsts::SIGINT,
    sigconsts::SIGQUIT,
    sigconsts::SIGTERM,
];

#[derive(thiserror::Error, Debug)]
pub enum StdinError {
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error("Couldn't change stdin file flags: {0}")]
    Fcntl(#[from] nix::Error),
    #[error("Couldn't watch stdin: {0}")]
    Poll(#[from] io::Error),
}

/// An unbuffered, raw, reader from stdin
///
/// Reads block in a poll that also listens for [`TRAPPED_SIGNALS`]. Once one arrives every read
/// reports end of input, and [`StdinRaw::caught_signal`] says which signal it was.
pub struct StdinRaw {
    mode: RawMode<RawFd>,
    fcntl_flags: OFlag,
    poll: Poll,
    events: Events,
    signals: Signals,
    caught: Option<c_int>,
}

impl StdinRaw {
    pub fn new() -> Result<Self, StdinError> {
        let fd = io::stdin().as_raw_fd();

        let mut signals = Signals::new(TRAPPED_SIGNALS)?;
        let mode = RawMode::enable(fd)?;

        let poll = Poll::new()?;
        poll.registry()
            .register(&mut SourceFd(&fd), STDIN, Interest::READABLE)?;
        poll.registry()
            .register(&mut signals, SIGNALS, Interest::READABLE)?;

        // mio is edge triggered, reads must never block
        let fcntl_flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
        fcntl(fd, FcntlArg::F_SETFL(fcntl_flags | OFlag::O_NONBLOCK))?;

        Ok(Self {
            mode,
            fcntl_flags,
            poll,
            events: Events::with_capacity(8),
            signals,
            caught: None,
        })
    }

    pub fn fd(&self) -> RawFd {
        *self.mode.device()
    }

    pub fn caught_signal(&self) -> Option<c_int> {
        self.caught
    }

    /// Puts stdin back the way [`StdinRaw::new`] found it, reporting failures that `Drop` can't.
    pub fn restore(&mut self) -> Result<(), StdinError> {
        // a hangup can end the loop as EIO or end of input before its SIGHUP was looked at
        self.check_signals();
        fcntl(self.fd(), FcntlArg::F_SETFL(self.fcntl_flags))?;
        self.mode.disable()?;
        Ok(())
    }

    fn check_signals(&mut self) {
        for signal in self.signals.pending() {
            log::info!("caught signal {signal}, stopping");
            self.caught.get_or_insert(signal);
        }
    }

    fn wait(&mut self) -> io::Result<()> {
        match self.poll.poll(&mut self.events, None) {
            Ok(()) => (),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => (),
            Err(err) => return Err(err),
        }

        for event in &self.events {
            log::trace!("woken by {:?}", event.token());
        }
        Ok(())
    }
}

impl Read for StdinRaw {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            self.check_signals();
            if self.caught.is_some() || buf.is_empty() {
                return Ok(0);
            }

            match unistd::read(self.fd(), buf) {
                Ok(size) => return Ok(size),
                Err(Errno::EAGAIN) => self.wait()?,
                Err(Errno::EINTR) => (),
                Err(errno) => return Err(errno.into()),
            }
        }
    }
}

impl Drop for StdinRaw {
    fn drop(&mut self) {
        let _ = fcntl(self.fd(), FcntlArg::F_SETFL(self.fcntl_flags));
    }
}
