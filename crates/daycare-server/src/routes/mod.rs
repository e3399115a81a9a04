// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod admin;
pub mod docs;
pub mod health;
pub mod messages;
pub mod pages;
