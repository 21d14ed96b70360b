// SPDX-License-Identifier: Apache-2.0

//! In-place rewriting passes.

pub mod inverter_optimization;
