//! User-scope toolchain modules for hpcsmith.
//!
//! Python, OpenMPI and GCC built from source under the invoking user's
//! home, with PATH wiring through the shell profile. None of this
//! requires root.

pub mod builder;
pub mod gcc;
pub mod module;
pub mod openmpi;
pub mod profile;
pub mod python;
pub mod remove;
pub mod versions;

pub use builder::ModuleError;
pub use gcc::GccInstaller;
pub use module::{GCC, Module, OPENMPI, PYTHON};
pub use openmpi::OpenMpiInstaller;
pub use python::PythonInstaller;
pub use remove::ModuleRemover;
pub use versions::{VersionError, latest_gcc_release, latest_python_release};
