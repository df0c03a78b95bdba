//! Annotation flag bits (`/F` entry of an annotation dictionary)

pub const INVISIBLE: u32 = 1 << 0;
pub const HIDDEN: u32 = 1 << 1;
pub const PRINT: u32 = 1 << 2;
pub const NO_ZOOM: u32 = 1 << 3;
pub const NO_ROTATE: u32 = 1 << 4;
pub const NO_VIEW: u32 = 1 << 5;
pub const READ_ONLY: u32 = 1 << 6;
pub const LOCKED: u32 = 1 << 7;
pub const TOGGLE_NO_VIEW: u32 = 1 << 8;
pub const LOCKED_CONTENTS: u32 = 1 << 9;

/// Flags carried by every signature widget: printed, and not movable or deletable
pub const SIGNATURE_WIDGET: u32 = PRINT | LOCKED;
