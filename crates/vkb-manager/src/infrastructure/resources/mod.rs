//! Layout resources read from the file system.
//!
//! [`directory::DirectoryResources`] lets users ship their own layout files
//! without rebuilding; the bundled set in `vkb_core` remains the default.

pub mod directory;
