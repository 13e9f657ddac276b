// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # merit-tests
//!
//! Integration test support for the MERIT backend. The shared fixtures
//! in [`common`] seed an in-memory deployment and drive the router
//! directly, without binding a socket.

pub mod common;
