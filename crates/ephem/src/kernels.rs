use std::path::{Path, PathBuf};

/// Location where the project's helper expects SPICE kernels to live.
pub const LOCAL_SPICE_DIR: &str = "data/spice";

/// Enumerates the SPICE kernel families the calculator loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelKind {
    /// SPK: Solar System ephemerides (positions and velocities).
    Spk,
    /// LSK: Leap seconds kernel (UTC ↔ TDB/ET conversions).
    Lsk,
}

impl KernelKind {
    /// Returns the lowercase kernel kind identifier used by SPICE utilities.
    pub fn kdata_kind(self) -> &'static str {
        match self {
            Self::Spk => "spk",
            Self::Lsk => "lsk",
        }
    }

    /// Returns a human-readable label for this kernel type.
    pub fn label(self) -> &'static str {
        match self {
            Self::Spk => "SPK (ephemeris)",
            Self::Lsk => "LSK (leap seconds)",
        }
    }
}

/// Metadata describing a SPICE kernel we expect to manage.
#[derive(Debug, Clone, Copy)]
pub struct KernelDescriptor {
    pub filename: &'static str,
    pub url: &'static str,
    pub kind: KernelKind,
    pub description: &'static str,
}

impl KernelDescriptor {
    /// Returns the on-disk path in the default kernel directory.
    pub fn local_path(self) -> PathBuf {
        self.path_in(Path::new(LOCAL_SPICE_DIR))
    }

    /// Returns the on-disk path inside `dir`.
    pub fn path_in(self, dir: &Path) -> PathBuf {
        dir.join(self.filename)
    }
}

/// Kernel set needed for heliocentric planet positions at UTC epochs.
pub const KERNEL_CATALOG: &[KernelDescriptor] = &[
    KernelDescriptor {
        filename: "de421.bsp",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/a_old_versions/de421.bsp",
        kind: KernelKind::Spk,
        description: "JPL DE421: barycentric positions/velocities for the Sun, planets and Moon (1900–2050).",
    },
    KernelDescriptor {
        filename: "naif0012.tls",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/lsk/naif0012.tls",
        kind: KernelKind::Lsk,
        description: "NAIF leap seconds kernel: UTC↔TDB conversion table with historical and predicted leap seconds.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_ephemeris_and_leap_seconds() {
        assert!(KERNEL_CATALOG.iter().any(|k| k.kind == KernelKind::Spk));
        assert!(KERNEL_CATALOG.iter().any(|k| k.kind == KernelKind::Lsk));
        for kernel in KERNEL_CATALOG {
            assert!(kernel.url.ends_with(kernel.filename));
        }
    }

    #[test]
    fn paths_resolve_under_requested_directory() {
        let de421 = KERNEL_CATALOG[0];
        assert_eq!(de421.local_path(), Path::new("data/spice/de421.bsp"));
        assert_eq!(
            de421.path_in(Path::new("/tmp/kernels")),
            Path::new("/tmp/kernels/de421.bsp")
        );
        assert_eq!(KernelKind::Lsk.kdata_kind(), "lsk");
    }
}
