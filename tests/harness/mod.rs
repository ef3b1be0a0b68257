// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for contact form abuse simulation.
//!
//! Drives the rate limiter and validator with scripted traffic on a
//! manual clock, so a 15 minute window costs no wall time.

pub mod generators;
pub mod tally;
