//! Domain entities for the device session.
//!
//! Pure data and rules only.  Nothing in here talks to the driver layer or
//! the OS permission service; those live behind traits in `pos-terminal`.

/// OS capabilities and permission sets.
pub mod capability;

/// Driver initialisation status, notices, and readiness.
pub mod session;
