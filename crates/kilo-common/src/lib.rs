use std::os::fd::RawFd;

use nix::sys::termios::{self, SetArg, Termios};

pub mod echo;

pub use echo::{EchoExt, Stop};

/// Anything whose terminal attributes can be queried and replaced.
pub trait TermiosExt {
    fn get_termios(&self) -> std::io::Result<Termios>;
    fn set_termios(&self, termios: &Termios, when: SetArg) -> std::io::Result<()>;
}

impl TermiosExt for RawFd {
    fn get_termios(&self) -> std::io::Result<Termios> {
        Ok(termios::tcgetattr(*self)?)
    }

    fn set_termios(&self, termios: &Termios, when: SetArg) -> std::io::Result<()> {
        Ok(termios::tcsetattr(*self, when, termios)?)
    }
}

impl<T: TermiosExt + ?Sized> TermiosExt for &T {
    fn get_termios(&self) -> std::io::Result<Termios> {
        (**self).get_termios()
    }

    fn set_termios(&self, termios: &Termios, when: SetArg) -> std::io::Result<()> {
        (**self).set_termios(termios, when)
    }
}
