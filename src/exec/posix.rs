// src/exec/posix.rs

//! Thin RAII wrappers over the libc pieces the spawner needs.
//!
//! Every object here releases its OS resource in `Drop`, so early returns
//! through `?` never leak a descriptor, a file-action list or an attribute
//! object.

use std::ffi::{CStr, CString};
use std::io;
use std::mem::MaybeUninit;
use std::os::fd::{FromRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::ptr;

/// Map a `-1`-on-error libc return into `io::Result`.
pub(crate) fn cvt(ret: libc::c_int) -> io::Result<libc::c_int> {
    if ret == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret)
    }
}

/// The `posix_spawn*` family returns the error number instead of setting errno.
fn check_spawn(ret: libc::c_int) -> io::Result<()> {
    if ret == 0 {
        Ok(())
    } else {
        Err(io::Error::from_raw_os_error(ret))
    }
}

/// Unidirectional pipe; both ends are close-on-exec.
///
/// Apple has no `pipe2`, so the flag is set afterwards. A spawn racing in
/// between is covered by `POSIX_SPAWN_CLOEXEC_DEFAULT` in [`SpawnAttr`].
#[derive(Debug)]
pub(crate) struct Pipe {
    pub(crate) read: OwnedFd,
    pub(crate) write: OwnedFd,
}

impl Pipe {
    pub(crate) fn new() -> io::Result<Self> {
        let mut fds: [RawFd; 2] = [-1, -1];

        // SAFETY: pipe/pipe2 write two descriptors into a valid two-element array.
        #[cfg(not(target_vendor = "apple"))]
        let ret = unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) };
        #[cfg(target_vendor = "apple")]
        let ret = unsafe { libc::pipe(fds.as_mut_ptr()) };
        cvt(ret)?;

        // SAFETY: on success both descriptors are open and owned by nobody else.
        let (read, write) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };

        #[cfg(target_vendor = "apple")]
        {
            set_cloexec(&read)?;
            set_cloexec(&write)?;
        }

        Ok(Self { read, write })
    }
}

#[cfg(target_vendor = "apple")]
fn set_cloexec(fd: &OwnedFd) -> io::Result<()> {
    use std::os::fd::AsRawFd;

    let raw = fd.as_raw_fd();
    // SAFETY: raw is a valid open descriptor for the lifetime of `fd`.
    let flags = cvt(unsafe { libc::fcntl(raw, libc::F_GETFD) })?;
    cvt(unsafe { libc::fcntl(raw, libc::F_SETFD, flags | libc::FD_CLOEXEC) })?;
    Ok(())
}

/// Declarative descriptor actions applied by the OS between fork and exec.
pub(crate) struct FileActions {
    inner: Box<MaybeUninit<libc::posix_spawn_file_actions_t>>,
}

impl FileActions {
    pub(crate) fn new() -> io::Result<Self> {
        let mut inner = Box::new(MaybeUninit::uninit());
        // SAFETY: init accepts uninitialized storage; the box keeps the address stable.
        check_spawn(unsafe { libc::posix_spawn_file_actions_init(inner.as_mut_ptr()) })?;
        Ok(Self { inner })
    }

    /// In the child, make `target` a duplicate of `fd`.
    pub(crate) fn add_dup2(&mut self, fd: RawFd, target: RawFd) -> io::Result<()> {
        // SAFETY: inner was initialized in `new`.
        check_spawn(unsafe { libc::posix_spawn_file_actions_adddup2(self.inner.as_mut_ptr(), fd, target) })
    }

    /// Keep `fd` open in the child as-is.
    ///
    /// Only needed on Apple, where `POSIX_SPAWN_CLOEXEC_DEFAULT` closes every
    /// descriptor not named by a file action. Closed descriptors are skipped.
    #[cfg(target_vendor = "apple")]
    pub(crate) fn add_inherit(&mut self, fd: RawFd) -> io::Result<()> {
        // SAFETY: F_GETFD only inspects the descriptor table.
        if unsafe { libc::fcntl(fd, libc::F_GETFD) } == -1 {
            return Ok(());
        }
        self.add_dup2(fd, fd)
    }

    #[cfg(not(target_vendor = "apple"))]
    pub(crate) fn add_inherit(&mut self, _fd: RawFd) -> io::Result<()> {
        Ok(())
    }

    /// In the child, close `fd`.
    pub(crate) fn add_close(&mut self, fd: RawFd) -> io::Result<()> {
        // SAFETY: inner was initialized in `new`.
        check_spawn(unsafe { libc::posix_spawn_file_actions_addclose(self.inner.as_mut_ptr(), fd) })
    }

    fn as_ptr(&self) -> *const libc::posix_spawn_file_actions_t {
        self.inner.as_ptr()
    }
}

impl Drop for FileActions {
    fn drop(&mut self) {
        // SAFETY: inner was initialized in `new` and is destroyed exactly once.
        unsafe { libc::posix_spawn_file_actions_destroy(self.inner.as_mut_ptr()) };
    }
}

/// Spawn attributes.
///
/// The host may ignore `SIGPIPE` (Rust binaries do) and ignored dispositions
/// survive exec, so children get `SIGPIPE` reset to default and an empty
/// signal mask. On Apple every descriptor is also close-on-exec by default.
pub(crate) struct SpawnAttr {
    inner: Box<MaybeUninit<libc::posix_spawnattr_t>>,
}

impl SpawnAttr {
    pub(crate) fn with_default_signals() -> io::Result<Self> {
        let mut inner = Box::new(MaybeUninit::uninit());
        // SAFETY: init accepts uninitialized storage; the box keeps the address stable.
        check_spawn(unsafe { libc::posix_spawnattr_init(inner.as_mut_ptr()) })?;
        let mut attr = Self { inner };

        // SAFETY: sigemptyset fully initializes the set before it is read.
        let mut set = unsafe {
            let mut set = MaybeUninit::<libc::sigset_t>::uninit();
            cvt(libc::sigemptyset(set.as_mut_ptr()))?;
            set.assume_init()
        };

        // SAFETY: attr is initialized and `set` is a valid sigset for each call.
        unsafe {
            check_spawn(libc::posix_spawnattr_setsigmask(attr.inner.as_mut_ptr(), &set))?;
            cvt(libc::sigaddset(&mut set, libc::SIGPIPE))?;
            check_spawn(libc::posix_spawnattr_setsigdefault(attr.inner.as_mut_ptr(), &set))?;

            #[cfg(not(target_vendor = "apple"))]
            let flags = libc::POSIX_SPAWN_SETSIGDEF | libc::POSIX_SPAWN_SETSIGMASK;
            #[cfg(target_vendor = "apple")]
            let flags = libc::POSIX_SPAWN_SETSIGDEF
                | libc::POSIX_SPAWN_SETSIGMASK
                | libc::POSIX_SPAWN_CLOEXEC_DEFAULT;
            check_spawn(libc::posix_spawnattr_setflags(
                attr.inner.as_mut_ptr(),
                flags as libc::c_short,
            ))?;
        }

        Ok(attr)
    }

    fn as_ptr(&self) -> *const libc::posix_spawnattr_t {
        self.inner.as_ptr()
    }
}

impl Drop for SpawnAttr {
    fn drop(&mut self) {
        // SAFETY: inner was initialized in `with_default_signals`.
        unsafe { libc::posix_spawnattr_destroy(self.inner.as_mut_ptr()) };
    }
}

/// NULL-terminated `char *[]` backed by owned `CString`s.
pub(crate) struct CStringArray {
    _items: Vec<CString>,
    ptrs: Vec<*mut libc::c_char>,
}

impl CStringArray {
    pub(crate) fn new(items: Vec<CString>) -> Self {
        let mut ptrs: Vec<*mut libc::c_char> = items
            .iter()
            .map(|s| s.as_ptr() as *mut libc::c_char)
            .collect();
        ptrs.push(ptr::null_mut());
        Self {
            _items: items,
            ptrs,
        }
    }

    fn as_ptr(&self) -> *const *mut libc::c_char {
        self.ptrs.as_ptr()
    }
}

/// Snapshot of the current process environment as `KEY=VALUE` strings.
pub(crate) fn current_environ() -> CStringArray {
    let entries = std::env::vars_os()
        .filter_map(|(key, value)| {
            let mut entry = key.as_bytes().to_vec();
            entry.push(b'=');
            entry.extend_from_slice(value.as_bytes());
            CString::new(entry).ok()
        })
        .collect();
    CStringArray::new(entries)
}

/// `posix_spawnp`: resolve `program` through `PATH` and exec it in a new child.
pub(crate) fn spawnp(
    program: &CStr,
    actions: &FileActions,
    attr: &SpawnAttr,
    argv: &CStringArray,
    envp: &CStringArray,
) -> io::Result<libc::pid_t> {
    let mut pid: libc::pid_t = 0;

    // SAFETY: every pointer refers to initialized data that outlives the call;
    // argv and envp are NULL-terminated.
    check_spawn(unsafe {
        libc::posix_spawnp(
            &mut pid,
            program.as_ptr(),
            actions.as_ptr(),
            attr.as_ptr(),
            argv.as_ptr(),
            envp.as_ptr(),
        )
    })?;

    Ok(pid)
}

/// Blocking `waitpid` returning the raw status word; retried on `EINTR`.
pub(crate) fn waitpid(pid: libc::pid_t) -> io::Result<libc::c_int> {
    let mut status: libc::c_int = 0;
    loop {
        // SAFETY: status is a valid out-pointer.
        match cvt(unsafe { libc::waitpid(pid, &mut status, 0) }) {
            Ok(_) => return Ok(status),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{Read, Write};

    #[test]
    fn pipe_carries_bytes_and_reports_eof() {
        let Pipe { read, write } = Pipe::new().unwrap();
        let mut writer = File::from(write);
        writer.write_all(b"ping").unwrap();
        drop(writer);

        let mut out = Vec::new();
        File::from(read).read_to_end(&mut out).unwrap();
        assert_eq!(out, b"ping");
    }

    #[test]
    fn pipe_ends_are_close_on_exec() {
        use std::os::fd::AsRawFd;

        let pipe = Pipe::new().unwrap();
        for fd in [pipe.read.as_raw_fd(), pipe.write.as_raw_fd()] {
            let flags = cvt(unsafe { libc::fcntl(fd, libc::F_GETFD) }).unwrap();
            assert_ne!(flags & libc::FD_CLOEXEC, 0);
        }
    }

    #[cfg(target_vendor = "apple")]
    #[test]
    fn apple_spawns_default_to_close_on_exec() {
        let attr = SpawnAttr::with_default_signals().unwrap();
        let mut flags: libc::c_short = 0;
        let ret = unsafe { libc::posix_spawnattr_getflags(attr.as_ptr(), &mut flags) };
        assert_eq!(ret, 0);
        assert_ne!(i32::from(flags) & libc::POSIX_SPAWN_CLOEXEC_DEFAULT, 0);
    }

    #[test]
    fn inherit_of_a_closed_descriptor_is_skipped() {
        let mut actions = FileActions::new().unwrap();
        actions.add_inherit(RawFd::MAX).unwrap();
    }

    #[test]
    fn cstring_array_is_null_terminated() {
        let arr = CStringArray::new(vec![CString::new("a").unwrap(), CString::new("b").unwrap()]);
        assert_eq!(arr.ptrs.len(), 3);
        assert!(arr.ptrs[2].is_null());
    }

    #[test]
    fn environ_contains_path() {
        let env = current_environ();
        let has_path = env._items.iter().any(|e| e.as_bytes().starts_with(b"PATH="));
        assert_eq!(has_path, std::env::var_os("PATH").is_some());
    }

    #[test]
    fn waitpid_on_foreign_pid_fails_with_echild() {
        // pid 1 is never our child.
        let err = waitpid(1).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ECHILD));
    }
}
