//! Domain entities for the virtual keyboard layout engine.
//!
//! Pure value types with no I/O: key descriptors, the legacy layout table,
//! layout elements, requests, locales, and resolved keyboards.
//!
//! # Two coordinate conventions, one type (for beginners)
//!
//! Older callers described keys with the gap *included* in the width and let
//! the table builder subtract it.  The engine now hands out keys with the gap
//! already *excluded*.  Rather than carry two descriptor types, there is one
//! [`key::KeyDescriptor`] whose `width`/`height` are always gap-excluded, and
//! the legacy builder became a plain adapter that never subtracts anything.

pub mod element;
pub mod error;
pub mod key;
pub mod keyboard;
pub mod legacy;
pub mod locale;
pub mod request;
