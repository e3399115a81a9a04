// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod admin;
mod gatekeeper;
mod messaging;
mod pages;
mod support;
