//! CSPICE-backed ephemeris queries against the DE421 kernel set.
//!
//! CSPICE keeps process-global state, so kernels are furnished once per process
//! and every toolkit call goes through [`SPICE_LOCK`].

use std::ffi::{CStr, CString, c_char};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use chrono::NaiveDateTime;
use cspice_sys::{
    SpiceBoolean, SpiceDouble, SpiceInt, erract_c, et2utc_c, failed_c, furnsh_c, getmsg_c,
    kclear_c, reset_c, spkezr_c, str2et_c,
};
use orrery_core::units::km_to_au;
use orrery_core::vector::Vector3;
use tracing::{debug, info};

use crate::kernels::{KERNEL_CATALOG, KernelDescriptor};
use crate::{Body, EphemerisError, PositionSource};

/// Frame used for every heliocentric query.
pub const REFERENCE_FRAME: &str = "ECLIPJ2000";
/// Geometric states; no light-time or stellar aberration correction.
pub const ABERRATION_CORRECTION: &str = "NONE";
/// Observer for heliocentric positions.
pub const OBSERVER: &str = "SUN";

static LOADED_DIR: OnceLock<PathBuf> = OnceLock::new();
static SPICE_LOCK: Mutex<()> = Mutex::new(());

/// Basic metadata describing a local SPICE kernel.
#[derive(Debug)]
pub struct KernelSummary {
    pub descriptor: &'static KernelDescriptor,
    pub path: PathBuf,
    pub file_size_bytes: u64,
}

/// Position, velocity, and light-time returned from SPICE.
#[derive(Debug, Clone, Copy)]
pub struct StateVector {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
    pub light_time_seconds: f64,
}

/// Heliocentric position source backed by the CSPICE toolkit.
#[derive(Debug, Clone)]
pub struct SpiceEphemeris {
    kernel_dir: PathBuf,
}

impl SpiceEphemeris {
    /// Furnish the kernel catalog from `kernel_dir` and return a handle to it.
    pub fn load(kernel_dir: impl AsRef<Path>) -> Result<Self, EphemerisError> {
        let kernel_dir = kernel_dir.as_ref().to_path_buf();
        load_kernels(&kernel_dir)?;
        Ok(Self { kernel_dir })
    }

    pub fn kernel_dir(&self) -> &Path {
        &self.kernel_dir
    }
}

impl PositionSource for SpiceEphemeris {
    fn heliocentric_position_au(
        &self,
        body: Body,
        epoch: NaiveDateTime,
    ) -> Result<Vector3, EphemerisError> {
        let et = utc_to_et(epoch)?;
        let state = state_vector_et(body.spice_target(), OBSERVER, REFERENCE_FRAME, et)?;
        Ok(state.position_km.map(km_to_au))
    }

    fn label(&self) -> &'static str {
        "spice"
    }
}

/// Load every catalog kernel from `dir`. Repeated calls with the same directory are no-ops.
pub fn load_kernels(dir: &Path) -> Result<(), EphemerisError> {
    if let Some(loaded) = LOADED_DIR.get() {
        return check_same_dir(loaded, dir);
    }
    let _lock = lock_spice();
    if let Some(loaded) = LOADED_DIR.get() {
        return check_same_dir(loaded, dir);
    }
    initialize_spice(dir)?;
    let _ = LOADED_DIR.set(dir.to_path_buf());
    info!(dir = %dir.display(), "SPICE kernels loaded");
    Ok(())
}

/// Load the catalog from the default `data/spice` directory.
pub fn load_default_kernels() -> Result<(), EphemerisError> {
    load_kernels(Path::new(crate::kernels::LOCAL_SPICE_DIR))
}

/// Summarize the kernel set in `dir` with file sizes and descriptions.
pub fn kernel_summaries(dir: &Path) -> Result<Vec<KernelSummary>, EphemerisError> {
    validate_kernel_paths(dir)?;
    KERNEL_CATALOG
        .iter()
        .map(|descriptor| {
            let path = descriptor.path_in(dir);
            let metadata = fs::metadata(&path).map_err(|source| EphemerisError::Io {
                name: descriptor.filename,
                source,
            })?;
            Ok(KernelSummary {
                descriptor,
                path,
                file_size_bytes: metadata.len(),
            })
        })
        .collect()
}

/// Convert a UTC calendar instant into ephemeris seconds past J2000.
pub fn utc_to_et(epoch: NaiveDateTime) -> Result<f64, EphemerisError> {
    epoch_seconds(&epoch.format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
}

/// Convert a time string understood by SPICE into ephemeris seconds past J2000.
pub fn epoch_seconds(epoch: &str) -> Result<f64, EphemerisError> {
    ensure_loaded()?;
    let epoch_c = CString::new(epoch).map_err(|_| EphemerisError::InvalidEpoch {
        epoch: epoch.to_string(),
    })?;
    let _lock = lock_spice();
    let mut et: SpiceDouble = 0.0;
    unsafe {
        str2et_c(epoch_c.as_ptr() as *mut _, &mut et);
    }
    check_for_spice_error()?;
    Ok(et)
}

/// Format an ephemeris time (seconds past J2000) into a UTC calendar string.
pub fn format_epoch(et: f64) -> Result<String, EphemerisError> {
    ensure_loaded()?;
    let _lock = lock_spice();
    let mut buffer: Vec<c_char> = vec![0; 64];
    let fmt = c_string("C")?;
    unsafe {
        et2utc_c(
            et,
            fmt.as_ptr() as *mut _,
            3,
            buffer.len() as SpiceInt,
            buffer.as_mut_ptr(),
        );
    }
    check_for_spice_error()?;
    let c_str = unsafe { CStr::from_ptr(buffer.as_ptr()) };
    Ok(c_str.to_string_lossy().trim().to_string())
}

/// Query the state vector of a target relative to an observer at ephemeris time `et`.
pub fn state_vector_et(
    target: &str,
    observer: &str,
    reference_frame: &str,
    et: f64,
) -> Result<StateVector, EphemerisError> {
    ensure_loaded()?;
    let target_c = c_string(target)?;
    let observer_c = c_string(observer)?;
    let frame_c = c_string(reference_frame)?;
    let aberration_c = c_string(ABERRATION_CORRECTION)?;

    let _lock = lock_spice();
    let mut state: [SpiceDouble; 6] = [0.0; 6];
    let mut light_time: SpiceDouble = 0.0;
    unsafe {
        spkezr_c(
            target_c.as_ptr() as *mut _,
            et,
            frame_c.as_ptr() as *mut _,
            aberration_c.as_ptr() as *mut _,
            observer_c.as_ptr() as *mut _,
            state.as_mut_ptr(),
            &mut light_time,
        );
    }
    check_for_spice_error()?;
    debug!(target, observer, et, "spkezr");

    Ok(StateVector {
        position_km: [state[0], state[1], state[2]],
        velocity_km_s: [state[3], state[4], state[5]],
        light_time_seconds: light_time,
    })
}

fn ensure_loaded() -> Result<(), EphemerisError> {
    if LOADED_DIR.get().is_some() {
        Ok(())
    } else {
        load_default_kernels()
    }
}

fn check_same_dir(loaded: &Path, requested: &Path) -> Result<(), EphemerisError> {
    if same_dir(loaded, requested) {
        Ok(())
    } else {
        Err(EphemerisError::KernelDirMismatch {
            loaded: loaded.to_path_buf(),
            requested: requested.to_path_buf(),
        })
    }
}

/// Compare directories after resolving `.`/`..` and symlinks; paths that
/// cannot be resolved are compared as written.
fn same_dir(a: &Path, b: &Path) -> bool {
    let resolve = |p: &Path| fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
    a == b || resolve(a) == resolve(b)
}

fn lock_spice() -> MutexGuard<'static, ()> {
    SPICE_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn initialize_spice(dir: &Path) -> Result<(), EphemerisError> {
    validate_kernel_paths(dir)?;
    unsafe {
        kclear_c();
    }
    configure_error_handling();
    for descriptor in KERNEL_CATALOG {
        let c_path = path_to_cstring(descriptor, dir)?;
        unsafe {
            furnsh_c(c_path.as_ptr() as *mut _);
        }
        check_for_spice_error()?;
    }
    Ok(())
}

fn validate_kernel_paths(dir: &Path) -> Result<(), EphemerisError> {
    for descriptor in KERNEL_CATALOG {
        let path = descriptor.path_in(dir);
        if !path.exists() {
            return Err(EphemerisError::MissingKernel {
                name: descriptor.filename,
                path,
            });
        }
        if path.to_str().is_none() {
            return Err(EphemerisError::InvalidKernelPath {
                name: descriptor.filename,
                path,
            });
        }
    }
    Ok(())
}

fn path_to_cstring(descriptor: &KernelDescriptor, dir: &Path) -> Result<CString, EphemerisError> {
    let path = descriptor.path_in(dir);
    let path_str = path
        .to_str()
        .ok_or_else(|| EphemerisError::InvalidKernelPath {
            name: descriptor.filename,
            path: path.clone(),
        })?;
    CString::new(path_str).map_err(|_| EphemerisError::InvalidKernelPath {
        name: descriptor.filename,
        path,
    })
}

fn c_string(value: &str) -> Result<CString, EphemerisError> {
    CString::new(value).map_err(|_| EphemerisError::Spice {
        message: format!("argument `{value}` contains an interior NUL byte"),
    })
}

fn configure_error_handling() {
    const SET: &[u8] = b"SET\0";
    const RETURN_MODE: &[u8] = b"RETURN\0";
    unsafe {
        erract_c(
            SET.as_ptr() as *mut _,
            0 as SpiceInt,
            RETURN_MODE.as_ptr() as *mut _,
        );
    }
}

fn check_for_spice_error() -> Result<(), EphemerisError> {
    unsafe {
        if failed_c() != 0 as SpiceBoolean {
            const LONG: &[u8] = b"LONG\0";
            let mut buffer: Vec<c_char> = vec![0; 1024];
            getmsg_c(
                LONG.as_ptr() as *mut _,
                buffer.len() as SpiceInt,
                buffer.as_mut_ptr(),
            );
            reset_c();
            let message = CStr::from_ptr(buffer.as_ptr())
                .to_string_lossy()
                .trim()
                .to_string();
            return Err(EphemerisError::Spice { message });
        }
    }
    Ok(())
}
