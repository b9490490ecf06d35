// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream MPSK resource API: wire types and the authenticated client.

pub mod client;
pub mod types;
