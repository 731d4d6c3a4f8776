use std::os::fd::RawFd;

use nix::{
    pty::{openpty, OpenptyResult, Winsize},
    sys::termios::{LocalFlags, Termios},
    unistd::close,
};

use kilo_common::TermiosExt;
use kilo_mode::{ModeError, RawMode};

/// Both ends of a fresh pseudo terminal, closed on drop.
struct Pty {
    master: RawFd,
    slave: RawFd,
}

impl Pty {
    fn open() -> Self {
        let OpenptyResult { master, slave } =
            openpty(None::<&Winsize>, None::<&Termios>).expect("openpty");
        Self { master, slave }
    }
}

impl Drop for Pty {
    fn drop(&mut self) {
        let _ = close(self.slave);
        let _ = close(self.master);
    }
}

fn assert_same(a: &Termios, b: &Termios) {
    assert_eq!(a.input_flags, b.input_flags);
    assert_eq!(a.output_flags, b.output_flags);
    assert_eq!(a.control_flags, b.control_flags);
    assert_eq!(a.local_flags, b.local_flags);
    assert_eq!(a.control_chars, b.control_chars);
}

#[test]
fn enable_disable_round_trips_on_a_pty() {
    let pty = Pty::open();
    let before = pty.slave.get_termios().unwrap();

    let mut mode = RawMode::enable(pty.slave).unwrap();
    let raw = pty.slave.get_termios().unwrap();
    assert!(!raw.local_flags.contains(LocalFlags::ECHO));
    assert!(!raw.local_flags.contains(LocalFlags::ICANON));
    assert_eq!(raw.input_flags, before.input_flags);
    assert_eq!(raw.output_flags, before.output_flags);
    assert_eq!(raw.control_chars, before.control_chars);

    mode.disable().unwrap();
    assert_same(&pty.slave.get_termios().unwrap(), &before);
}

#[test]
fn dropping_the_guard_restores_the_pty() {
    let pty = Pty::open();
    let before = pty.slave.get_termios().unwrap();

    drop(RawMode::enable(pty.slave).unwrap());

    assert_same(&pty.slave.get_termios().unwrap(), &before);
}

#[test]
fn a_pipe_is_not_interactive() {
    let (read, write) = nix::unistd::pipe().unwrap();

    let err = RawMode::enable(read).err().unwrap();
    assert!(matches!(err, ModeError::TerminalNotInteractive(_)));

    close(read).unwrap();
    close(write).unwrap();
}
