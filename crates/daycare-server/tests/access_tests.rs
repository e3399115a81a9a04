// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access-control tests entry point.
//!
//! Builds all access tests as a single integration test binary.

mod access;
