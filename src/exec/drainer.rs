// src/exec/drainer.rs

//! Reading the child's output pipes to end-of-stream.
//!
//! Both pipes must be serviced at the same time: a child that fills the
//! stderr pipe while we sit in a blocking read on stdout never gets to write
//! the stdout data we are waiting for. Two strategies are offered:
//!
//! - [`DrainStrategy::Threads`]: stderr on a scoped thread, stdout on the
//!   calling thread, joined before returning. Falls back to polling when
//!   the thread cannot be started.
//! - [`DrainStrategy::Poll`]: a single `poll(2)` loop that services whichever
//!   descriptor is ready.

use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{AsRawFd, OwnedFd};
use std::thread;

use tracing::{debug, trace};

use crate::config::ExecConfig;
use crate::types::DrainStrategy;

/// Everything the child wrote, frozen at end-of-stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Read `reader` in `chunk_size` pieces until a zero-length read.
///
/// `EINTR` is retried; any other error aborts and the partial data is dropped.
pub fn drain_all<R: Read>(reader: &mut R, chunk_size: usize) -> io::Result<Vec<u8>> {
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut out = Vec::new();
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(out),
            Ok(n) => out.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Drain both read ends concurrently according to `config`.
///
/// The descriptors are consumed and closed on every path, so a failed drain
/// leaves the child writing into a closed pipe rather than blocking forever.
pub fn drain_streams(
    stdout: OwnedFd,
    stderr: Option<OwnedFd>,
    config: &ExecConfig,
) -> io::Result<Captured> {
    let chunk_size = config.chunk_size();

    let captured = match stderr {
        None => Captured {
            stdout: drain_all(&mut File::from(stdout), chunk_size)?,
            stderr: Vec::new(),
        },
        Some(stderr) => match config.drain_strategy() {
            DrainStrategy::Threads => drain_threaded(stdout, stderr, chunk_size, stderr_reader())?,
            DrainStrategy::Poll => drain_polled(stdout, stderr, chunk_size)?,
        },
    };

    trace!(
        stdout_bytes = captured.stdout.len(),
        stderr_bytes = captured.stderr.len(),
        "drained child output"
    );
    Ok(captured)
}

fn drain_threaded(
    stdout: OwnedFd,
    stderr: OwnedFd,
    chunk_size: usize,
    reader: thread::Builder,
) -> io::Result<Captured> {
    let stderr = File::from(stderr);

    let threaded = thread::scope(|s| {
        let stderr_task = match reader.spawn_scoped(s, || drain_all(&mut &stderr, chunk_size)) {
            Ok(task) => task,
            Err(err) => return Err((stdout, err)),
        };

        // Dropping the stdout file right away on error lets the child hit
        // EPIPE, which in turn lets the stderr thread see end-of-stream.
        let stdout = drain_all(&mut File::from(stdout), chunk_size);

        let stderr = match stderr_task.join() {
            Ok(res) => res,
            Err(panic) => std::panic::resume_unwind(panic),
        };

        Ok(match (stdout, stderr) {
            (Ok(stdout), Ok(stderr)) => Ok(Captured { stdout, stderr }),
            (Err(err), _) | (_, Err(err)) => Err(err),
        })
    });

    match threaded {
        Ok(captured) => captured,
        Err((stdout, err)) => {
            debug!(error = %err, "no thread for stderr, draining with poll instead");
            drain_polled(stdout, OwnedFd::from(stderr), chunk_size)
        }
    }
}

fn stderr_reader() -> thread::Builder {
    thread::Builder::new().name("pawnexec-stderr".into())
}

struct PolledStream {
    file: Option<File>,
    data: Vec<u8>,
}

impl PolledStream {
    fn new(fd: OwnedFd) -> Self {
        Self {
            file: Some(File::from(fd)),
            data: Vec::new(),
        }
    }

    /// One read after readiness; closes the descriptor at end-of-stream.
    fn service(&mut self, chunk: &mut [u8]) -> io::Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        match file.read(chunk) {
            Ok(0) => self.file = None,
            Ok(n) => self.data.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

fn drain_polled(stdout: OwnedFd, stderr: OwnedFd, chunk_size: usize) -> io::Result<Captured> {
    let mut streams = [PolledStream::new(stdout), PolledStream::new(stderr)];
    let mut chunk = vec![0u8; chunk_size.max(1)];

    loop {
        let mut fds = Vec::with_capacity(streams.len());
        let mut owners = Vec::with_capacity(streams.len());
        for (idx, stream) in streams.iter().enumerate() {
            if let Some(file) = &stream.file {
                fds.push(libc::pollfd {
                    fd: file.as_raw_fd(),
                    events: libc::POLLIN,
                    revents: 0,
                });
                owners.push(idx);
            }
        }
        if fds.is_empty() {
            break;
        }

        // SAFETY: fds is a valid array of `fds.len()` pollfd entries.
        let ret = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1) };
        if ret < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }

        for (pfd, idx) in fds.iter().zip(owners) {
            if pfd.revents & libc::POLLNVAL != 0 {
                return Err(io::Error::from_raw_os_error(libc::EBADF));
            }
            if pfd.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0 {
                streams[idx].service(&mut chunk)?;
            }
        }
    }

    let [stdout, stderr] = streams;
    Ok(Captured {
        stdout: stdout.data,
        stderr: stderr.data,
    })
}
