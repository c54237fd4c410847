//! The optional in-memory "character device" surface from spec.md §6: the
//! shape a kernel driver would wrap around the same Command Log, expressed
//! here as a plain synchronous API with POSIX-flavored error codes instead
//! of an actual `file_operations` table.

use crate::error::AesdError;
use crate::log::CommandLog;

/// Errno-flavored outcomes for the character-device surface, per spec.md
/// §6's mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    ENoMem,
    EInval,
    EFault,
    ENoTty,
    EIntr,
}

impl From<&AesdError> for Errno {
    fn from(err: &AesdError) -> Self {
        match err {
            AesdError::OutOfMemory { .. } => Errno::ENoMem,
            AesdError::Invalid { .. } => Errno::EInval,
            AesdError::Interrupted => Errno::EIntr,
            // `Io`/`Fatal` have no direct analogue in spec.md's ioctl/lseek
            // table; a user-memory copy failure is the closest fit for any
            // I/O-flavored failure reaching this surface.
            AesdError::Io { .. } | AesdError::Fatal { .. } => Errno::EFault,
        }
    }
}

/// `lseek`'s three addressing modes, `End` resolving against the append
/// cursor `A` rather than `total_bytes()` (they coincide whenever no open
/// tail is mid-extension, which is always true between critical sections).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
    Set(u64),
    Current(i64),
    End,
}

/// The `{write_cmd, write_cmd_offset}` payload of the one `SEEKTO` ioctl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekToArgs {
    pub write_cmd: u32,
    pub write_cmd_offset: u32,
}

/// The only ioctl command number this surface recognizes, matching
/// `AESDCHAR_IOCSEEKTO` in the original driver's `aesd_ioctl.h`.
pub const AESDCHAR_IOCSEEKTO: u32 = 1;

/// A single open "file description" over a [`CommandLog`]: owns its own
/// position, mirroring how the kernel driver's `file->f_pos` (or this
/// design's per-connection cursor `P`) is private per opener.
pub struct CharDevice<'a, const N: usize> {
    log: &'a mut CommandLog<N>,
    cursor: u64,
    position: u64,
}

impl<'a, const N: usize> CharDevice<'a, N> {
    pub fn new(log: &'a mut CommandLog<N>, append_cursor: u64) -> Self {
        Self {
            log,
            cursor: append_cursor,
            position: 0,
        }
    }

    /// Reads from `position`, advancing it by the number of bytes
    /// returned. A short read is end-of-log, not `EFAULT`.
    pub fn read(&mut self, max: usize) -> Vec<u8> {
        let out = self.log.read_at(self.position, max);
        self.position += out.len() as u64;
        out
    }

    /// Appends via the shared append path, updating the append cursor the
    /// same way [`crate::guard::LogGuard::append_and_advance_cursor`] does.
    pub fn write(&mut self, bytes: &[u8]) -> Result<u64, Errno> {
        let evicted = self.log.append(bytes).map_err(|e| Errno::from(&e))?;
        self.cursor = self.cursor - evicted as u64 + bytes.len() as u64;
        Ok(self.cursor)
    }

    pub fn lseek(&mut self, from: SeekFrom) -> Result<u64, Errno> {
        let new_pos = match from {
            SeekFrom::Set(off) => off as i64,
            SeekFrom::Current(delta) => self.position as i64 + delta,
            SeekFrom::End => self.cursor as i64,
        };
        if new_pos < 0 {
            return Err(Errno::EInval);
        }
        self.position = new_pos as u64;
        Ok(self.position)
    }

    /// The one recognized ioctl: `SEEKTO`, resolving `{write_cmd,
    /// write_cmd_offset}` to a position via `find_by_command`.
    pub fn ioctl_seekto(&mut self, args: SeekToArgs) -> Result<u64, Errno> {
        let flat = self
            .log
            .find_by_command(args.write_cmd as u64, args.write_cmd_offset as u64)
            .map_err(|e| Errno::from(&e))?;
        self.position = flat;
        Ok(self.position)
    }

    /// Generic ioctl dispatch: `cmd` must equal [`AESDCHAR_IOCSEEKTO`], any
    /// other code is `ENOTTY`, matching `aesd_ioctl`'s
    /// `cmd != AESDCHAR_IOCSEEKTO` check in the original driver.
    pub fn ioctl(&mut self, cmd: u32, args: SeekToArgs) -> Result<u64, Errno> {
        if cmd != AESDCHAR_IOCSEEKTO {
            return Err(Errno::ENoTty);
        }
        self.ioctl_seekto(args)
    }
}
