//! # Serial Transport
//!
//! Raw tty link to a USB-serial or RS-232 thermal printer.
//!
//! ## Line Settings
//!
//! - Fixed baud rate, same in both directions
//! - 8 data bits, no parity, 1 stop bit
//! - No hardware (RTS/CTS) or software (XON/XOFF) flow control
//! - Raw mode: no input or output processing, no echo, non-canonical
//! - `VMIN = 0`, `VTIME = 20` in termios; this handle is opened `O_NONBLOCK`
//!   and never reads, so they only matter to other users of the tty
//!
//! Writes wait at most [`WRITE_TIMEOUT`] for the port to accept data. A write
//! that times out returns `Ok(0)`, which the job loop reports as
//! [`PrintError::WriteTimeout`].
//!
//! ```bash
//! # Typical device names
//! /dev/ttyUSB0     # USB-serial adapter (Linux)
//! /dev/ttyACM0     # CDC-ACM printer (Linux)
//! /dev/cu.usbserial-0001   # macOS
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::time::{Duration, Instant};

use super::Link;
use crate::error::PrintError;

/// Default baud rate for receipt printers.
pub const DEFAULT_BAUD: u32 = 9600;

/// Longest a single write may wait for the port.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// `VTIME` written to termios, in tenths of a second.
const VTIME_DECISECONDS: u8 = 20;

/// Baud rates the port can be opened at.
pub const SUPPORTED_BAUDS: [u32; 9] = [
    1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200, 230400,
];

/// An open serial port, closed on drop.
///
/// ```no_run
/// use escpos_raster::transport::{Link, SerialPort};
/// use escpos_raster::protocol::commands;
///
/// let mut port = SerialPort::open("/dev/ttyUSB0", 9600)?;
/// port.clear_buffers()?;
/// port.write(&commands::init())?;
/// port.flush()?;
/// # Ok::<(), escpos_raster::PrintError>(())
/// ```
#[derive(Debug)]
pub struct SerialPort {
    file: File,
    device: String,
    write_timeout: Duration,
}

impl SerialPort {
    /// Open `device` at `baud`, 8-N-1, no flow control.
    ///
    /// ## Errors
    ///
    /// - [`PrintError::InvalidParameter`] if `baud` is not in [`SUPPORTED_BAUDS`]
    /// - [`PrintError::SerialOpen`] if the device cannot be opened or configured
    pub fn open(device: &str, baud: u32) -> Result<Self, PrintError> {
        let speed = baud_constant(baud)
            .ok_or_else(|| PrintError::invalid("baud", baud, "unsupported baud rate"))?;

        let open_err = |source| PrintError::SerialOpen {
            device: device.to_string(),
            source,
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
            .open(device)
            .map_err(open_err)?;

        configure_tty_raw(file.as_raw_fd(), speed).map_err(open_err)?;

        Ok(Self {
            file,
            device: device.to_string(),
            write_timeout: WRITE_TIMEOUT,
        })
    }

    /// Path the port was opened from.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Change how long a write may wait for the port.
    pub fn set_write_timeout(&mut self, timeout: Duration) {
        self.write_timeout = timeout;
    }

    /// Wait until the port accepts data. `Ok(false)` on timeout.
    fn wait_writable(&self, timeout: Duration) -> Result<bool, PrintError> {
        let mut pfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLOUT,
            revents: 0,
        };
        let millis = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;

        let result = unsafe { libc::poll(&mut pfd, 1, millis) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(true);
            }
            return Err(PrintError::SerialCommunication(err));
        }
        if pfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Err(PrintError::SerialCommunication(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("{}: device hung up", self.device),
            )));
        }
        Ok(result > 0)
    }
}

impl Link for SerialPort {
    fn write(&mut self, data: &[u8]) -> Result<usize, PrintError> {
        if data.is_empty() {
            return Ok(0);
        }

        let deadline = Instant::now() + self.write_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !self.wait_writable(remaining)? {
                return Ok(0);
            }
            match self.file.write(data) {
                Ok(n) => return Ok(n),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) =>
                {
                    if Instant::now() >= deadline {
                        return Ok(0);
                    }
                }
                Err(e) => return Err(PrintError::SerialCommunication(e)),
            }
        }
    }

    fn flush(&mut self) -> Result<(), PrintError> {
        let result = unsafe { libc::tcdrain(self.file.as_raw_fd()) };
        if result != 0 {
            return Err(PrintError::SerialCommunication(io::Error::last_os_error()));
        }
        Ok(())
    }

    fn clear_buffers(&mut self) -> Result<(), PrintError> {
        let result = unsafe { libc::tcflush(self.file.as_raw_fd(), libc::TCIOFLUSH) };
        if result != 0 {
            return Err(PrintError::SerialCommunication(io::Error::last_os_error()));
        }
        Ok(())
    }
}

/// Map a numeric baud rate to its termios speed constant.
pub fn baud_constant(baud: u32) -> Option<libc::speed_t> {
    let speed = match baud {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        230400 => libc::B230400,
        _ => return None,
    };
    Some(speed)
}

/// Put a tty into raw 8-N-1 mode at `speed`.
///
/// IXON/IXOFF/IXANY must stay off: 0x11 and 0x13 show up in raster data.
fn configure_tty_raw(fd: i32, speed: libc::speed_t) -> io::Result<()> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    // 8N1, receiver on, modem lines ignored
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB | libc::CSTOPB | libc::CRTSCTS);
    termios.c_cflag |= libc::CS8 | libc::CLOCAL | libc::CREAD;

    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = VTIME_DECISECONDS as libc::cc_t;

    unsafe {
        if libc::cfsetispeed(&mut termios, speed) != 0 || libc::cfsetospeed(&mut termios, speed) != 0
        {
            return Err(io::Error::last_os_error());
        }
        if libc::tcsetattr(fd, libc::TCSANOW, &termios) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
