//! Component-interaction plumbing.
//!
//! All button presses funnel through the normalized dispatcher in
//! `crate::dispatch`; this module only owns the `custom_id` vocabulary and
//! its parse helpers.

pub mod ids;
