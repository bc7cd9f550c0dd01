// zipkeep-core/src/owner.rs
use std::ffi::CString;
use std::mem::MaybeUninit;
use std::path::Path;
use std::ptr;

use tracing::debug;
use zipkeep_common::error::{Result, ZipkeepError};

/// Numeric ids applied to a freshly written artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipSpec {
    pub uid: u32,
    pub gid: u32,
}

/// Turns user/group spellings into numeric ids. A spelling that parses as
/// an integer is used directly, without consulting the identity database.
pub trait IdentityResolver {
    fn resolve_user(&self, name: &str) -> Option<u32>;
    fn resolve_group(&self, name: &str) -> Option<u32>;
}

/// Resolver backed by the host's passwd/group databases.
pub struct SystemIdentityResolver;

impl IdentityResolver for SystemIdentityResolver {
    fn resolve_user(&self, name: &str) -> Option<u32> {
        if let Ok(uid) = name.parse::<u32>() {
            return Some(uid);
        }
        lookup_uid(name)
    }

    fn resolve_group(&self, name: &str) -> Option<u32> {
        if let Ok(gid) = name.parse::<u32>() {
            return Some(gid);
        }
        lookup_gid(name)
    }
}

pub fn apply_ownership(path: &Path, spec: &OwnershipSpec) -> Result<()> {
    debug!(
        "Setting ownership of {} to uid {}, gid {}",
        path.display(),
        spec.uid,
        spec.gid
    );
    std::os::unix::fs::chown(path, Some(spec.uid), Some(spec.gid)).map_err(|e| {
        ZipkeepError::Ownership(format!(
            "{} (uid {}, gid {}): {}",
            path.display(),
            spec.uid,
            spec.gid,
            e
        ))
    })
}

fn lookup_uid(name: &str) -> Option<u32> {
    let c_name = CString::new(name).ok()?;
    let mut pwd = MaybeUninit::<libc::passwd>::uninit();
    let mut result: *mut libc::passwd = ptr::null_mut();
    let cap = usize::try_from(unsafe { libc::sysconf(libc::_SC_GETPW_R_SIZE_MAX) })
        .unwrap_or(16_384);
    let mut buf = vec![0 as libc::c_char; cap];
    let rc = unsafe {
        libc::getpwnam_r(
            c_name.as_ptr(),
            pwd.as_mut_ptr(),
            buf.as_mut_ptr(),
            buf.len(),
            &mut result,
        )
    };
    if rc != 0 || result.is_null() {
        return None;
    }
    Some(unsafe { pwd.assume_init() }.pw_uid)
}

fn lookup_gid(name: &str) -> Option<u32> {
    let c_name = CString::new(name).ok()?;
    let mut grp = MaybeUninit::<libc::group>::uninit();
    let mut result: *mut libc::group = ptr::null_mut();
    let cap = usize::try_from(unsafe { libc::sysconf(libc::_SC_GETGR_R_SIZE_MAX) })
        .unwrap_or(16_384);
    let mut buf = vec![0 as libc::c_char; cap];
    let rc = unsafe {
        libc::getgrnam_r(
            c_name.as_ptr(),
            grp.as_mut_ptr(),
            buf.as_mut_ptr(),
            buf.len(),
            &mut result,
        )
    };
    if rc != 0 || result.is_null() {
        return None;
    }
    Some(unsafe { grp.assume_init() }.gr_gid)
}
