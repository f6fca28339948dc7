// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic independent of the UI: payload decoding, document assembly,
//! webhook delivery, and text rendering.

pub mod docx;
pub mod payload;
pub mod render;
pub mod webhook;
